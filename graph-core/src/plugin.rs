//! Plugin registration types.
//!
//! A plugin describes itself with a [`PluginSpec`] and hands its node
//! definitions to the host through a [`NodeRegistry`].

use serde::{Deserialize, Serialize};
use std::collections::{BTreeMap, HashMap};

use crate::error::{GraphError, Result};
use crate::node::NodeDefinition;

/// Static description of a plugin.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct PluginSpec {
    /// Unique plugin identifier
    pub id: String,

    /// Display name in the host UI
    pub name: String,

    /// Settings the user can configure for the plugin
    #[serde(default)]
    pub config_spec: BTreeMap<String, ConfigEntry>,

    /// Additional context menu groups
    #[serde(default)]
    pub context_menu_groups: Vec<ContextMenuGroup>,
}

/// One configurable plugin setting.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(tag = "type", rename_all = "lowercase", rename_all_fields = "camelCase")]
pub enum ConfigEntry {
    String {
        label: String,
        #[serde(default, skip_serializing_if = "Option::is_none")]
        description: Option<String>,
        #[serde(default, skip_serializing_if = "Option::is_none")]
        helper_text: Option<String>,
    },
    Boolean {
        label: String,
        #[serde(default, skip_serializing_if = "Option::is_none")]
        description: Option<String>,
    },
}

/// A group in the host's "add node" context menu.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ContextMenuGroup {
    pub id: String,
    pub label: String,
}

/// Sink that plugins register their node definitions into.
pub trait NodeRegistry {
    fn register(&mut self, definition: NodeDefinition);
}

/// Core trait for all plugins.
pub trait Plugin: Send + Sync {
    /// Get the plugin's spec.
    fn spec(&self) -> &PluginSpec;

    /// Register every node this plugin provides.
    fn register(&self, registry: &mut dyn NodeRegistry);
}

/// In-memory registry of loaded plugins and their nodes.
#[derive(Debug, Default)]
pub struct Registry {
    plugins: Vec<PluginSpec>,
    nodes: HashMap<String, NodeDefinition>,
}

impl Registry {
    pub fn new() -> Self {
        Self::default()
    }

    /// Load a plugin, keeping its spec and registering its nodes.
    ///
    /// Loading the same plugin ID twice is rejected.
    pub fn load(&mut self, plugin: &dyn Plugin) -> Result<()> {
        let spec = plugin.spec();
        if self.plugins.iter().any(|p| p.id == spec.id) {
            return Err(GraphError::InvalidInput(format!("Plugin already loaded: {}", spec.id)));
        }

        self.plugins.push(spec.clone());
        plugin.register(self);
        Ok(())
    }

    /// Find a plugin spec by its ID
    pub fn plugin(&self, id: &str) -> Option<&PluginSpec> {
        self.plugins.iter().find(|p| p.id == id)
    }

    /// Find a node definition by its type tag
    pub fn node(&self, node_type: &str) -> Result<&NodeDefinition> {
        self.nodes
            .get(node_type)
            .ok_or_else(|| GraphError::NodeNotFound(node_type.to_string()))
    }

    /// Registered node types, sorted
    pub fn node_types(&self) -> Vec<&str> {
        let mut types: Vec<&str> = self.nodes.keys().map(String::as_str).collect();
        types.sort_unstable();
        types
    }
}

impl NodeRegistry for Registry {
    fn register(&mut self, definition: NodeDefinition) {
        self.nodes.insert(definition.node_type().to_string(), definition);
    }
}
