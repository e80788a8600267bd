//! Configuration module for the Workers AI adapter
//!
//! Credentials and endpoint settings are loaded once, validated, and turned
//! into an immutable [`GeneratorConfig`](crate::providers::workersai::GeneratorConfig)
//! per model.

mod env;
mod error;
mod schema;
mod secrets;

pub use error::{ConfigError, ValidationError, ValidationErrorKind};
pub use schema::WorkersAiConfig;
pub use secrets::SecretString;

use std::fs;
use std::path::Path;

/// Load a configuration from a YAML file
pub fn load_from_yaml<P: AsRef<Path>>(path: P) -> Result<WorkersAiConfig, ConfigError> {
    let path = path.as_ref();
    let content = read(path)?;
    parse_yaml(&content, &path.to_string_lossy())
}

/// Load a configuration from a JSON file
pub fn load_from_json<P: AsRef<Path>>(path: P) -> Result<WorkersAiConfig, ConfigError> {
    let path = path.as_ref();
    let content = read(path)?;
    parse_json(&content, &path.to_string_lossy())
}

/// Parse a YAML configuration document
pub fn parse_yaml(content: &str, origin: &str) -> Result<WorkersAiConfig, ConfigError> {
    // Interpolate environment variables before parsing
    let interpolated = env::interpolate_env_vars(content)?;

    let config: WorkersAiConfig =
        serde_yaml::from_str(&interpolated).map_err(|e| ConfigError::ParseError {
            path: origin.to_string(),
            line: e.location().map(|l| l.line()),
            column: e.location().map(|l| l.column()),
            message: e.to_string(),
        })?;

    config.validate()?;
    Ok(config)
}

/// Parse a JSON configuration document
pub fn parse_json(content: &str, origin: &str) -> Result<WorkersAiConfig, ConfigError> {
    let interpolated = env::interpolate_env_vars(content)?;

    let config: WorkersAiConfig =
        serde_json::from_str(&interpolated).map_err(|e| ConfigError::ParseError {
            path: origin.to_string(),
            line: Some(e.line()),
            column: Some(e.column()),
            message: e.to_string(),
        })?;

    config.validate()?;
    Ok(config)
}

fn read(path: &Path) -> Result<String, ConfigError> {
    fs::read_to_string(path).map_err(|e| ConfigError::IoError {
        path: path.to_string_lossy().to_string(),
        source: e,
    })
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_parse_valid_yaml() {
        let yaml = r#"
account_id: acct-123
api_token: token-abc
timeout_secs: 10
models:
  - "@cf/meta/llama-3.3-70b-instruct-fp8-fast"
"#;
        let config = parse_yaml(yaml, "inline").unwrap();
        assert_eq!(config.account_id, "acct-123");
        assert_eq!(config.timeout_secs, 10);
        assert!(!config.debug);
    }

    #[test]
    fn test_unknown_fields_are_rejected() {
        let yaml = "account_id: a\napi_token: t\nretries: 3\n";
        assert!(matches!(
            parse_yaml(yaml, "inline"),
            Err(ConfigError::ParseError { .. })
        ));
    }

    #[test]
    fn test_parse_json_validates() {
        let json = r#"{"account_id": "", "api_token": "t"}"#;
        assert!(matches!(
            parse_json(json, "inline"),
            Err(ConfigError::ValidationError(_))
        ));
    }
}
