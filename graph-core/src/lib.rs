//! Core types for graph editor plugins.
//!
//! This crate defines the contract between a host graph editor and the plugins
//! it loads: plugin and config specs, node definitions with their ports and
//! editors, typed port values, and the capability library the host injects.

mod context;
mod data;
mod editor;
mod error;
mod library;
mod node;
mod plugin;

// Re-export core types
pub use context::ProcessContext;
pub use data::{DataType, DataValue, Inputs, NodeId, Outputs, PortId};
pub use editor::{DropdownOption, EditorDefinition};
pub use error::{GraphError, Result};
pub use library::{HostLibrary, StandardLibrary, dedent, input_toggle_key};
pub use node::{
    ChartNode, NodeDefinition, NodeInputDefinition, NodeOutputDefinition, NodeUIData,
    PluginNodeImpl, VisualData,
};
pub use plugin::{ConfigEntry, ContextMenuGroup, NodeRegistry, Plugin, PluginSpec, Registry};
