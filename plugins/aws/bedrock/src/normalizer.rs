//! Extraction of generated text from each family's response document.

use serde_json::Value;
use tracing::debug;

use crate::error::{BedrockNodeError, Result};
use crate::model::{InvocationResult, ModelFamily};

/// Parse a raw response body and pull out the generated text.
///
/// Missing or mistyped text fields yield an empty string. Only bodies
/// that are not UTF-8 JSON are treated as errors.
pub fn parse(family: ModelFamily, raw: &[u8]) -> Result<InvocationResult> {
    let text = std::str::from_utf8(raw)
        .map_err(|e| BedrockNodeError::Invocation(format!("Failed to parse response: {}", e)))?;
    let document: Value = serde_json::from_str(text)
        .map_err(|e| BedrockNodeError::Invocation(format!("Failed to parse response: {}", e)))?;

    debug!(bytes = raw.len(), ?family, "Parsed Bedrock response");

    let response_text = match family {
        ModelFamily::Claude => text_at(&document, "/content/0/text"),
        ModelFamily::Titan => text_at(&document, "/results/0/outputText"),
        ModelFamily::Llama => text_at(&document, "/generation"),
        // Families added to parsing ahead of the payload builder surface the raw body
        ModelFamily::Unrecognized => document.to_string(),
    };

    Ok(InvocationResult {
        response_text,
        raw_response: document,
    })
}

fn text_at(document: &Value, pointer: &str) -> String {
    document
        .pointer(pointer)
        .and_then(Value::as_str)
        .unwrap_or_default()
        .to_string()
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn test_titan_output_text() {
        let result = parse(ModelFamily::Titan, br#"{"results":[{"outputText":"hi"}]}"#).unwrap();
        assert_eq!(result.response_text, "hi");

        let result = parse(ModelFamily::Titan, br#"{"results":[]}"#).unwrap();
        assert_eq!(result.response_text, "");
        assert_eq!(result.raw_response, json!({"results": []}));
    }

    #[test]
    fn test_claude_first_content_block() {
        let raw = br#"{"content":[{"type":"text","text":"Once upon a time"},{"type":"text","text":"ignored"}],"stop_reason":"end_turn"}"#;
        let result = parse(ModelFamily::Claude, raw).unwrap();

        assert_eq!(result.response_text, "Once upon a time");
        assert_eq!(result.raw_response["stop_reason"], "end_turn");
    }

    #[test]
    fn test_claude_missing_or_empty_content() {
        let result = parse(ModelFamily::Claude, br#"{"content":[]}"#).unwrap();
        assert_eq!(result.response_text, "");

        let result = parse(ModelFamily::Claude, br#"{"id":"msg_1","type":"message"}"#).unwrap();
        assert_eq!(result.response_text, "");
        assert_eq!(result.raw_response["id"], "msg_1");

        let result = parse(ModelFamily::Claude, br#"{"content":[{"type":"tool_use"}]}"#).unwrap();
        assert_eq!(result.response_text, "");
    }

    #[test]
    fn test_llama_generation() {
        let result = parse(ModelFamily::Llama, br#"{"generation":" Hello there","stop_reason":"stop"}"#).unwrap();
        assert_eq!(result.response_text, " Hello there");

        let result = parse(ModelFamily::Llama, br#"{"generation":42}"#).unwrap();
        assert_eq!(result.response_text, "");
    }

    #[test]
    fn test_unrecognized_returns_document_text() {
        let result = parse(ModelFamily::Unrecognized, br#"{"foo":"bar"}"#).unwrap();
        assert_eq!(result.response_text, r#"{"foo":"bar"}"#);
    }

    #[test]
    fn test_non_json_body_is_an_invocation_error() {
        let err = parse(ModelFamily::Claude, b"<html>gateway timeout</html>").unwrap_err();
        assert!(matches!(err, BedrockNodeError::Invocation(message) if message.starts_with("Failed to parse response")));

        let err = parse(ModelFamily::Claude, &[0xff, 0xfe]).unwrap_err();
        assert!(matches!(err, BedrockNodeError::Invocation(_)));
    }
}
