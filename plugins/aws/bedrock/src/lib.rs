//! AWS Bedrock plugin for graph editors.
//!
//! This crate provides a single node that sends a prompt to an AWS Bedrock
//! foundation model and exposes the generated text plus the full response
//! document as outputs.

pub mod credentials;
pub mod data;
pub mod error;
pub mod invoker;
pub mod model;
pub mod node;
pub mod normalizer;
pub mod payload;

use std::collections::BTreeMap;
use std::sync::Arc;

use graph_core::{
    ConfigEntry, ContextMenuGroup, HostLibrary, NodeDefinition, NodeRegistry, Plugin, PluginSpec,
};

pub use credentials::{CredentialSelection, select_credentials};
pub use data::{BedrockNodeData, BedrockPluginConfig};
pub use error::BedrockNodeError;
pub use invoker::{BedrockInvoker, InferenceInvoker};
pub use model::{InvocationRequest, InvocationResult, ModelFamily};
pub use node::BedrockNode;

/// Plugin exposing the Bedrock node.
pub struct BedrockPlugin {
    spec: PluginSpec,
    node: NodeDefinition,
}

impl BedrockPlugin {
    /// Create the plugin with the SDK-backed invoker.
    pub fn new(library: Arc<dyn HostLibrary>) -> Self {
        Self::with_invoker(library, Arc::new(BedrockInvoker::new()))
    }

    /// Create the plugin with a custom invoker.
    pub fn with_invoker(library: Arc<dyn HostLibrary>, invoker: Arc<dyn InferenceInvoker>) -> Self {
        Self {
            spec: plugin_spec(),
            node: NodeDefinition::new(BedrockNode::with_invoker(library, invoker), "AWS Bedrock"),
        }
    }
}

impl Plugin for BedrockPlugin {
    fn spec(&self) -> &PluginSpec {
        &self.spec
    }

    fn register(&self, registry: &mut dyn NodeRegistry) {
        registry.register(self.node.clone());
    }
}

fn plugin_spec() -> PluginSpec {
    let mut config_spec = BTreeMap::new();
    config_spec.insert(
        "region".to_string(),
        ConfigEntry::String {
            label: "Default AWS Region".to_string(),
            description: Some("The default AWS region to use".to_string()),
            helper_text: Some(format!("Default: {}", data::DEFAULT_REGION)),
        },
    );
    config_spec.insert(
        "useLocalCredentials".to_string(),
        ConfigEntry::Boolean {
            label: "Use Local AWS Credentials by Default".to_string(),
            description: Some(
                "Whether to use your local AWS credentials by default. Enable to use credentials from your ~/.aws/credentials file"
                    .to_string(),
            ),
        },
    );

    PluginSpec {
        id: data::PLUGIN_ID.to_string(),
        name: "AWS Bedrock Plugin".to_string(),
        config_spec,
        context_menu_groups: vec![ContextMenuGroup {
            id: data::CONTEXT_MENU_GROUP.to_string(),
            label: "AWS Bedrock".to_string(),
        }],
    }
}

// Export a function to create a new instance
// This will be used by the dynamic loading system
#[unsafe(no_mangle)]
pub fn create_plugin(library: Arc<dyn HostLibrary>) -> Box<dyn Plugin> {
    Box::new(BedrockPlugin::new(library))
}
