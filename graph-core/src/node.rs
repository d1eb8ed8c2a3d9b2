//! Node interface for graph plugins.
//!
//! A plugin implements [`PluginNodeImpl`] against its own strongly typed data.
//! The host only ever sees JSON node data, so implementations are wrapped in a
//! [`NodeDefinition`] that converts between the two at the boundary.

use std::sync::Arc;

use async_trait::async_trait;
use serde::de::DeserializeOwned;
use serde::{Deserialize, Serialize};
use serde_json::Value;

use crate::context::ProcessContext;
use crate::data::{DataType, Inputs, NodeId, Outputs, PortId};
use crate::editor::EditorDefinition;
use crate::error::Result;

/// A node instance placed in a graph.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ChartNode<D> {
    pub id: NodeId,
    #[serde(rename = "type")]
    pub node_type: String,
    pub title: String,
    pub data: D,
    pub visual_data: VisualData,
}

/// Position and size of a node on the canvas.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct VisualData {
    pub x: f64,
    pub y: f64,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub width: Option<f64>,
}

/// Declaration of an input port.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct NodeInputDefinition {
    pub id: PortId,
    pub data_type: DataType,
    pub title: String,
}

/// Declaration of an output port.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct NodeOutputDefinition {
    pub id: PortId,
    pub data_type: DataType,
    pub title: String,
}

/// Presentation metadata for menus and info boxes.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct NodeUIData {
    pub context_menu_title: String,
    pub group: String,
    pub info_box_body: String,
    pub info_box_title: String,
}

/// Behaviour a plugin supplies for one node type.
#[async_trait]
pub trait PluginNodeImpl: Send + Sync {
    /// Persisted per-node data
    type Data: Serialize + DeserializeOwned + Send + Sync;

    /// Type tag stored in [`ChartNode::node_type`].
    fn node_type(&self) -> &str;

    /// Create a new node instance with default data.
    fn create(&self) -> ChartNode<Self::Data>;

    /// Input ports for the current data.
    fn input_definitions(&self, data: &Self::Data) -> Vec<NodeInputDefinition>;

    /// Output ports for the current data.
    fn output_definitions(&self, data: &Self::Data) -> Vec<NodeOutputDefinition>;

    fn ui_data(&self) -> NodeUIData;

    /// Fields shown in the host's property editor.
    fn editors(&self, data: &Self::Data) -> Vec<EditorDefinition>;

    /// Summary text rendered in the node body.
    fn body(&self, data: &Self::Data) -> Option<String>;

    /// Run the node for one graph execution.
    async fn process(
        &self,
        data: &Self::Data,
        inputs: &Inputs,
        context: &ProcessContext,
    ) -> Result<Outputs>;
}

#[async_trait]
trait ErasedNode: Send + Sync {
    fn node_type(&self) -> &str;
    fn create(&self) -> Result<ChartNode<Value>>;
    fn input_definitions(&self, data: &Value) -> Result<Vec<NodeInputDefinition>>;
    fn output_definitions(&self, data: &Value) -> Result<Vec<NodeOutputDefinition>>;
    fn ui_data(&self) -> NodeUIData;
    fn editors(&self, data: &Value) -> Result<Vec<EditorDefinition>>;
    fn body(&self, data: &Value) -> Result<Option<String>>;
    async fn process(&self, data: &Value, inputs: &Inputs, context: &ProcessContext) -> Result<Outputs>;
}

struct TypedNode<N>(N);

impl<N: PluginNodeImpl> TypedNode<N> {
    fn data(data: &Value) -> Result<N::Data> {
        Ok(serde_json::from_value(data.clone())?)
    }
}

#[async_trait]
impl<N: PluginNodeImpl> ErasedNode for TypedNode<N> {
    fn node_type(&self) -> &str {
        self.0.node_type()
    }

    fn create(&self) -> Result<ChartNode<Value>> {
        let node = self.0.create();
        Ok(ChartNode {
            id: node.id,
            node_type: node.node_type,
            title: node.title,
            data: serde_json::to_value(node.data)?,
            visual_data: node.visual_data,
        })
    }

    fn input_definitions(&self, data: &Value) -> Result<Vec<NodeInputDefinition>> {
        Ok(self.0.input_definitions(&Self::data(data)?))
    }

    fn output_definitions(&self, data: &Value) -> Result<Vec<NodeOutputDefinition>> {
        Ok(self.0.output_definitions(&Self::data(data)?))
    }

    fn ui_data(&self) -> NodeUIData {
        self.0.ui_data()
    }

    fn editors(&self, data: &Value) -> Result<Vec<EditorDefinition>> {
        Ok(self.0.editors(&Self::data(data)?))
    }

    fn body(&self, data: &Value) -> Result<Option<String>> {
        Ok(self.0.body(&Self::data(data)?))
    }

    async fn process(&self, data: &Value, inputs: &Inputs, context: &ProcessContext) -> Result<Outputs> {
        let data = Self::data(data)?;
        self.0.process(&data, inputs, context).await
    }
}

/// A registered node type, as the host sees it.
#[derive(Clone)]
pub struct NodeDefinition {
    display_name: String,
    node: Arc<dyn ErasedNode>,
}

impl NodeDefinition {
    /// Wrap a typed node implementation under a human-readable name.
    pub fn new<N: PluginNodeImpl + 'static>(node: N, display_name: &str) -> Self {
        Self {
            display_name: display_name.to_string(),
            node: Arc::new(TypedNode(node)),
        }
    }

    pub fn display_name(&self) -> &str {
        &self.display_name
    }

    pub fn node_type(&self) -> &str {
        self.node.node_type()
    }

    pub fn create(&self) -> Result<ChartNode<Value>> {
        self.node.create()
    }

    pub fn input_definitions(&self, data: &Value) -> Result<Vec<NodeInputDefinition>> {
        self.node.input_definitions(data)
    }

    pub fn output_definitions(&self, data: &Value) -> Result<Vec<NodeOutputDefinition>> {
        self.node.output_definitions(data)
    }

    pub fn ui_data(&self) -> NodeUIData {
        self.node.ui_data()
    }

    pub fn editors(&self, data: &Value) -> Result<Vec<EditorDefinition>> {
        self.node.editors(data)
    }

    pub fn body(&self, data: &Value) -> Result<Option<String>> {
        self.node.body(data)
    }

    /// Process the node with JSON data as stored by the host.
    ///
    /// Fails only when `data` does not match the node's data shape; failures
    /// inside the node are the node's own business.
    pub async fn process(&self, data: &Value, inputs: &Inputs, context: &ProcessContext) -> Result<Outputs> {
        self.node.process(data, inputs, context).await
    }
}

impl std::fmt::Debug for NodeDefinition {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("NodeDefinition")
            .field("node_type", &self.node_type())
            .field("display_name", &self.display_name)
            .finish()
    }
}
