//! Port values exchanged between nodes in a graph.
//!
//! Every value carries its type tag on the wire, so a port value serializes as
//! `{"type": "string", "value": "..."}`.

use serde::{Deserialize, Serialize};
use serde_json::Value;
use std::collections::HashMap;
use std::fmt;

/// Identifier of a node within a graph.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(transparent)]
pub struct NodeId(pub String);

/// Identifier of an input or output port on a node.
#[derive(Debug, Clone, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(transparent)]
pub struct PortId(pub String);

impl From<&str> for PortId {
    fn from(id: &str) -> Self {
        PortId(id.to_string())
    }
}

impl fmt::Display for PortId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

impl fmt::Display for NodeId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

/// Values arriving on a node's input ports.
pub type Inputs = HashMap<PortId, DataValue>;

/// Values a node publishes on its output ports.
pub type Outputs = HashMap<PortId, DataValue>;

/// The type of a port.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum DataType {
    String,
    Number,
    Boolean,
    Object,
}

/// A typed value on a port.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(tag = "type", content = "value", rename_all = "lowercase")]
pub enum DataValue {
    String(String),
    Number(f64),
    Boolean(bool),
    Object(Value),
}

impl DataValue {
    /// The type tag of this value
    pub fn data_type(&self) -> DataType {
        match self {
            DataValue::String(_) => DataType::String,
            DataValue::Number(_) => DataType::Number,
            DataValue::Boolean(_) => DataType::Boolean,
            DataValue::Object(_) => DataType::Object,
        }
    }

    pub fn as_str(&self) -> Option<&str> {
        match self {
            DataValue::String(s) => Some(s),
            _ => None,
        }
    }

    pub fn as_number(&self) -> Option<f64> {
        match self {
            DataValue::Number(n) => Some(*n),
            _ => None,
        }
    }

    pub fn as_bool(&self) -> Option<bool> {
        match self {
            DataValue::Boolean(b) => Some(*b),
            _ => None,
        }
    }

    /// Convert this value to the requested type.
    ///
    /// Returns `None` when no sensible conversion exists, e.g. a string that
    /// does not parse as a number.
    pub fn coerce(&self, target: DataType) -> Option<DataValue> {
        match (self, target) {
            (value, target) if value.data_type() == target => Some(value.clone()),
            (DataValue::Number(n), DataType::String) => Some(DataValue::String(n.to_string())),
            (DataValue::Boolean(b), DataType::String) => Some(DataValue::String(b.to_string())),
            (DataValue::Object(v), DataType::String) => Some(DataValue::String(v.to_string())),
            (DataValue::String(s), DataType::Number) => s.trim().parse().ok().map(DataValue::Number),
            (DataValue::Boolean(b), DataType::Number) => Some(DataValue::Number(if *b { 1.0 } else { 0.0 })),
            (DataValue::String(s), DataType::Boolean) => match s.trim() {
                "true" => Some(DataValue::Boolean(true)),
                "false" => Some(DataValue::Boolean(false)),
                _ => None,
            },
            (DataValue::Number(n), DataType::Boolean) => Some(DataValue::Boolean(*n != 0.0)),
            (value, DataType::Object) => serde_json::to_value(value.clone())
                .ok()
                .and_then(|v| v.get("value").cloned())
                .map(DataValue::Object),
            _ => None,
        }
    }

    /// Read a plain JSON value (as stored in node data) as a port value of the given type.
    pub fn from_json(value: &Value, target: DataType) -> Option<DataValue> {
        let untyped = match value {
            Value::Null => return None,
            Value::String(s) => DataValue::String(s.clone()),
            Value::Number(n) => DataValue::Number(n.as_f64()?),
            Value::Bool(b) => DataValue::Boolean(*b),
            other => DataValue::Object(other.clone()),
        };
        untyped.coerce(target)
    }
}
