//! Configuration schema structures with serde support

use super::env::has_placeholder;
use super::error::{ConfigError, ValidationError, ValidationErrorKind};
use super::secrets::SecretString;
use crate::http::RequestOptions;
use crate::providers::workersai::{GeneratorConfig, DEFAULT_BASE_URL};
use serde::{Deserialize, Serialize};
use std::collections::HashSet;
use std::time::Duration;

/// Root configuration for the Workers AI adapter
#[derive(Debug, Clone, Deserialize, Serialize)]
#[serde(deny_unknown_fields)]
pub struct WorkersAiConfig {
    /// Cloudflare account id (supports environment variable interpolation)
    pub account_id: String,

    /// API token (supports environment variable interpolation)
    pub api_token: SecretString,

    /// API root
    #[serde(default = "default_base_url")]
    pub base_url: String,

    /// Per-turn deadline in seconds
    #[serde(default = "default_timeout_secs")]
    pub timeout_secs: u64,

    /// Log request and response bodies
    #[serde(default)]
    pub debug: bool,

    /// Models this configuration may be used with; empty allows any model
    #[serde(default)]
    pub models: Vec<String>,
}

fn default_base_url() -> String {
    DEFAULT_BASE_URL.to_string()
}

fn default_timeout_secs() -> u64 {
    30
}

impl WorkersAiConfig {
    /// Create a configuration with defaults for everything but credentials
    pub fn new(account_id: impl Into<String>, api_token: impl Into<SecretString>) -> Self {
        Self {
            account_id: account_id.into(),
            api_token: api_token.into(),
            base_url: default_base_url(),
            timeout_secs: default_timeout_secs(),
            debug: false,
            models: Vec::new(),
        }
    }

    /// Validate the configuration
    pub fn validate(&self) -> Result<(), ValidationError> {
        if self.account_id.trim().is_empty() || has_placeholder(&self.account_id) {
            return Err(ValidationError::required("account_id"));
        }

        if self.api_token.is_empty() || has_placeholder(self.api_token.expose_secret()) {
            return Err(ValidationError::required("api_token"));
        }

        match url::Url::parse(&self.base_url) {
            Ok(url) => {
                if url.scheme() != "http" && url.scheme() != "https" {
                    return Err(ValidationError::invalid_url(
                        "base_url",
                        format!("URL scheme must be http or https, got: {}", url.scheme()),
                    ));
                }
            }
            Err(e) => return Err(ValidationError::invalid_url("base_url", e.to_string())),
        }

        if self.timeout_secs == 0 {
            return Err(ValidationError::out_of_range(
                "timeout_secs",
                "Timeout must be at least one second",
            ));
        }

        let mut seen = HashSet::new();
        for (i, model) in self.models.iter().enumerate() {
            if model.trim().is_empty() {
                return Err(ValidationError::required(format!("models[{}]", i)));
            }
            if !seen.insert(model) {
                return Err(ValidationError::new(
                    format!("models[{}]", i),
                    ValidationErrorKind::DuplicateValue {
                        value: model.clone(),
                    },
                ));
            }
        }

        Ok(())
    }

    /// Per-turn deadline
    pub fn timeout(&self) -> Duration {
        Duration::from_secs(self.timeout_secs)
    }

    /// Generator configuration for one model
    pub fn generator_config(&self, model: &str) -> Result<GeneratorConfig, ConfigError> {
        if !self.models.is_empty() && !self.models.iter().any(|m| m == model) {
            return Err(ConfigError::Invalid {
                message: format!("model '{}' is not listed in models", model),
            });
        }

        Ok(GeneratorConfig::new(model, self.account_id.clone(), self.api_token.clone())
            .with_base_url(self.base_url.clone())
            .with_timeout(self.timeout())
            .with_debug(self.debug))
    }

    /// Request options carrying the configured deadline
    pub fn request_options(&self) -> RequestOptions {
        RequestOptions::new().with_timeout(self.timeout())
    }
}
