//! Model families and the request/result types of one invocation.

use serde_json::Value;

use crate::credentials::CredentialSelection;

/// Vendor family of a Bedrock model, which fixes its payload shapes.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ModelFamily {
    Claude,
    Titan,
    Llama,
    Unrecognized,
}

impl ModelFamily {
    /// Classify a model identifier by its vendor prefix.
    pub fn of(model_id: &str) -> Self {
        if model_id.starts_with("anthropic.claude") {
            ModelFamily::Claude
        } else if model_id.starts_with("amazon.titan") {
            ModelFamily::Titan
        } else if model_id.starts_with("meta.llama") {
            ModelFamily::Llama
        } else {
            ModelFamily::Unrecognized
        }
    }
}

/// Everything needed for one invocation, after inputs have been resolved.
#[derive(Debug, Clone, PartialEq)]
pub struct InvocationRequest {
    pub prompt: String,
    pub model_id: String,
    pub temperature: f64,
    pub max_tokens: u32,
    pub region: String,
    pub credentials: CredentialSelection,
}

/// Normalized outcome of one invocation.
#[derive(Debug, Clone, PartialEq)]
pub struct InvocationResult {
    /// Generated text, empty when the response carried none
    pub response_text: String,
    /// The complete parsed response document
    pub raw_response: Value,
}
