//! Error types for the graph plugin contract.

use serde::{Deserialize, Serialize};
use thiserror::Error;

/// Main error type for plugin and node operations.
#[derive(Error, Debug, Clone, Serialize, Deserialize)]
pub enum GraphError {
    /// Node data or port values did not have the expected shape
    #[error("Invalid input: {0}")]
    InvalidInput(String),

    /// No node definition is registered under the requested type
    #[error("Node not found: {0}")]
    NodeNotFound(String),

    /// Serialization or deserialization error
    #[error("Serialization error: {0}")]
    Serialization(String),
}

/// Result type alias for graph plugin operations
pub type Result<T> = std::result::Result<T, GraphError>;

impl From<serde_json::Error> for GraphError {
    fn from(err: serde_json::Error) -> Self {
        GraphError::Serialization(err.to_string())
    }
}
