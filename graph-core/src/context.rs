//! Execution context handed to a node while it processes.

use serde::de::DeserializeOwned;
use serde_json::{Map, Value};

use crate::error::Result;

/// Per-execution information supplied by the host.
#[derive(Debug, Clone)]
pub struct ProcessContext {
    /// Values the user entered for the plugin's config spec
    plugin_config: Value,
}

impl Default for ProcessContext {
    fn default() -> Self {
        Self {
            plugin_config: Value::Object(Map::new()),
        }
    }
}

impl ProcessContext {
    pub fn new() -> Self {
        Self::default()
    }

    /// Create a context carrying the given plugin config object.
    pub fn with_plugin_config(plugin_config: Value) -> Self {
        let plugin_config = match plugin_config {
            Value::Null => Value::Object(Map::new()),
            other => other,
        };
        Self { plugin_config }
    }

    /// Deserialize the whole plugin config into a typed structure.
    pub fn plugin_config<T: DeserializeOwned>(&self) -> Result<T> {
        Ok(serde_json::from_value(self.plugin_config.clone())?)
    }
}
