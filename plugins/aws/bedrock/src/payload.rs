//! Request bodies for each model family.

use serde_json::{Value, json};

use crate::data::ANTHROPIC_VERSION;
use crate::error::{BedrockNodeError, Result};
use crate::model::{InvocationRequest, ModelFamily};

/// Build the JSON body Bedrock expects for `family`.
///
/// Unrecognized families are rejected here, before anything is sent.
pub fn build(family: ModelFamily, request: &InvocationRequest) -> Result<Value> {
    let body = match family {
        ModelFamily::Claude => json!({
            "anthropic_version": ANTHROPIC_VERSION,
            "max_tokens": request.max_tokens,
            "temperature": request.temperature,
            "messages": [{
                "role": "user",
                "content": request.prompt
            }]
        }),
        ModelFamily::Titan => json!({
            "inputText": request.prompt,
            "textGenerationConfig": {
                "maxTokenCount": request.max_tokens,
                "temperature": request.temperature
            }
        }),
        ModelFamily::Llama => json!({
            "prompt": format!("<s>[INST] {} [/INST]", request.prompt),
            "max_gen_len": request.max_tokens,
            "temperature": request.temperature
        }),
        ModelFamily::Unrecognized => {
            return Err(BedrockNodeError::UnsupportedModel(request.model_id.clone()));
        }
    };

    Ok(body)
}
