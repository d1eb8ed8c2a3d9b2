//! Typed data for the Bedrock node and plugin.
//!
//! This module defines the node's persisted fields, the plugin config and
//! the constants shared by the payload builder and the node.

use serde::{Deserialize, Serialize};

/// Plugin identifier registered with the host
pub const PLUGIN_ID: &str = "aws-bedrock-plugin";

/// Node type tag
pub const NODE_TYPE: &str = "bedrockNode";

/// Context menu group the node is listed under
pub const CONTEXT_MENU_GROUP: &str = "aws-bedrock";

/// Claude 3 Sonnet Bedrock model ID
pub const DEFAULT_MODEL: &str = "anthropic.claude-3-sonnet-20240229-v1:0";

/// Default AWS region for Bedrock
pub const DEFAULT_REGION: &str = "us-east-1";

pub const DEFAULT_PROMPT: &str = "Tell me a short story";
pub const DEFAULT_TEMPERATURE: f64 = 0.7;
pub const DEFAULT_MAX_TOKENS: u32 = 512;

pub const MIN_MAX_TOKENS: u32 = 1;
pub const MAX_MAX_TOKENS: u32 = 4096;

/// API version Bedrock expects in Anthropic message payloads
pub const ANTHROPIC_VERSION: &str = "bedrock-2023-05-31";

/// Models offered in the model dropdown, as (label, model ID)
pub const KNOWN_MODELS: &[(&str, &str)] = &[
    ("Claude 3 Sonnet", "anthropic.claude-3-sonnet-20240229-v1:0"),
    ("Claude 3 Haiku", "anthropic.claude-3-haiku-20240307-v1:0"),
    ("Claude 3 Opus", "anthropic.claude-3-opus-20240229-v1:0"),
    ("Claude 2", "anthropic.claude-v2:1"),
    ("Titan Text", "amazon.titan-text-express-v1"),
    ("Llama 2 13B", "meta.llama2-13b-chat-v1"),
    ("Llama 2 70B", "meta.llama2-70b-chat-v1"),
];

/// Friendly label for a known model ID
pub fn model_label(model_id: &str) -> Option<&'static str> {
    KNOWN_MODELS
        .iter()
        .find(|(_, id)| *id == model_id)
        .map(|(label, _)| *label)
}

/// Persisted fields of a Bedrock node.
///
/// Fields missing from saved data take their `Default` values.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default, rename_all = "camelCase")]
pub struct BedrockNodeData {
    pub prompt: String,
    pub model_id: String,
    pub temperature: f64,
    pub max_tokens: u32,
    #[serde(default)]
    pub region: String,
    /// Used together with `secret_access_key` when local credentials are off
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub access_key_id: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub secret_access_key: Option<String>,
    #[serde(default = "default_true")]
    pub use_local_credentials: bool,

    #[serde(default)]
    pub use_prompt_input: bool,
    #[serde(default)]
    pub use_model_id_input: bool,
    #[serde(default)]
    pub use_temperature_input: bool,
    #[serde(default)]
    pub use_max_tokens_input: bool,
}

impl Default for BedrockNodeData {
    fn default() -> Self {
        Self {
            prompt: DEFAULT_PROMPT.to_string(),
            model_id: DEFAULT_MODEL.to_string(),
            temperature: DEFAULT_TEMPERATURE,
            max_tokens: DEFAULT_MAX_TOKENS,
            region: DEFAULT_REGION.to_string(),
            access_key_id: Some(String::new()),
            secret_access_key: Some(String::new()),
            use_local_credentials: true,
            use_prompt_input: false,
            use_model_id_input: false,
            use_temperature_input: false,
            use_max_tokens_input: false,
        }
    }
}

fn default_true() -> bool {
    true
}

/// Values the user configured for the plugin in the host.
#[derive(Debug, Clone, Default, PartialEq, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct BedrockPluginConfig {
    /// Region used when a node leaves its own region empty
    #[serde(default)]
    pub region: Option<String>,
    /// Initial "use local credentials" setting for new nodes
    #[serde(default)]
    pub use_local_credentials: Option<bool>,
}

/// Keep a temperature within [0, 1].
pub fn clamp_temperature(value: f64) -> f64 {
    if value.is_finite() {
        value.clamp(0.0, 1.0)
    } else {
        DEFAULT_TEMPERATURE
    }
}

/// Round a token count and keep it within the supported range.
pub fn clamp_max_tokens(value: f64) -> u32 {
    if !value.is_finite() {
        return DEFAULT_MAX_TOKENS;
    }
    value
        .round()
        .clamp(MIN_MAX_TOKENS as f64, MAX_MAX_TOKENS as f64) as u32
}
