//! Error types for the Bedrock node.

use thiserror::Error;

/// Failures of a single Bedrock invocation.
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum BedrockNodeError {
    /// The model identifier does not belong to a known model family
    #[error("Unsupported model: {0}")]
    UnsupportedModel(String),

    /// Transport, authentication, throttling or service-side failure
    #[error("{0}")]
    Invocation(String),

    /// Node data could not be read
    #[error("Invalid node data: {0}")]
    InvalidData(String),
}

/// Result type alias for Bedrock operations
pub type Result<T> = std::result::Result<T, BedrockNodeError>;
