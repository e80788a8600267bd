//! Known Workers AI models and per-model encoding dispatch

/// Provider name used in model references
pub const PROVIDER: &str = "workersai";

pub const MISTRAL_SMALL_3_1_24B_INSTRUCT: &str = "@cf/mistralai/mistral-small-3.1-24b-instruct";
pub const LLAMA_3_3_70B_INSTRUCT_FP8_FAST: &str = "@cf/meta/llama-3.3-70b-instruct-fp8-fast";
pub const LLAMA_4_SCOUT_17B_16E_INSTRUCT: &str = "@cf/meta/llama-4-scout-17b-16e-instruct";
pub const QWEN3_30B_A3B_FP8: &str = "@cf/qwen/qwen3-30b-a3b-fp8";

/// Chat models known to accept tools
pub const KNOWN_MODELS: &[&str] = &[
    MISTRAL_SMALL_3_1_24B_INSTRUCT,
    LLAMA_3_3_70B_INSTRUCT_FP8_FAST,
    LLAMA_4_SCOUT_17B_16E_INSTRUCT,
    QWEN3_30B_A3B_FP8,
];

/// Model families that accept structured `messages`, matched anywhere in the id
const CHAT_FAMILIES: &[&str] = &["llama", "mistral", "qwen", "gemma", "hermes", "deepseek"];

/// Short family names, matched only at the start of an id segment
const CHAT_FAMILY_PREFIXES: &[&str] = &["phi"];

/// Whether the model accepts structured chat messages
///
/// Anything else gets the whole history flattened into one prompt.
pub fn supports_structured_chat(model: &str) -> bool {
    let model = model.to_lowercase();
    if CHAT_FAMILIES.iter().any(|family| model.contains(family)) {
        return true;
    }

    model
        .split(|c: char| !c.is_ascii_alphanumeric())
        .any(|segment| CHAT_FAMILY_PREFIXES.iter().any(|prefix| segment.starts_with(prefix)))
}

/// Fully qualified reference for a model, e.g. `workersai/@cf/qwen/qwen3-30b-a3b-fp8`
pub fn model_ref(name: &str) -> String {
    format!("{}/{}", PROVIDER, name)
}
