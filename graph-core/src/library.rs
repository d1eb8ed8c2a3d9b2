//! Capabilities the host application lends to plugins.
//!
//! Plugins never generate IDs or coalesce inputs on their own. They receive a
//! `HostLibrary` when they are created and call back into it.

use serde_json::Value;
use uuid::Uuid;

use crate::data::{DataType, DataValue, Inputs, NodeId, PortId};

/// Capability bundle injected into plugins by the host.
pub trait HostLibrary: Send + Sync {
    /// Generate a fresh node identifier.
    fn new_id(&self) -> NodeId;

    /// Strip the common leading indentation from a multi-line string.
    fn dedent(&self, text: &str) -> String;

    /// Read `key` from the connected input port when its toggle is enabled,
    /// otherwise from the node's own data.
    ///
    /// The toggle is the boolean data field `use<Key>Input`, e.g. `usePromptInput`
    /// for the `prompt` key.
    fn get_input_or_data(
        &self,
        data: &Value,
        inputs: &Inputs,
        key: &str,
        data_type: DataType,
    ) -> Option<DataValue>;
}

/// Default library implementation.
#[derive(Debug, Clone, Default)]
pub struct StandardLibrary;

impl StandardLibrary {
    pub fn new() -> Self {
        Self
    }
}

impl HostLibrary for StandardLibrary {
    fn new_id(&self) -> NodeId {
        NodeId(Uuid::new_v4().to_string())
    }

    fn dedent(&self, text: &str) -> String {
        dedent(text)
    }

    fn get_input_or_data(
        &self,
        data: &Value,
        inputs: &Inputs,
        key: &str,
        data_type: DataType,
    ) -> Option<DataValue> {
        let use_input = data
            .get(input_toggle_key(key))
            .and_then(Value::as_bool)
            .unwrap_or(false);

        if use_input {
            if let Some(value) = inputs.get(&PortId::from(key)).and_then(|v| v.coerce(data_type)) {
                return Some(value);
            }
        }

        data.get(key).and_then(|v| DataValue::from_json(v, data_type))
    }
}

/// Name of the data field that switches `key` over to its input port.
pub fn input_toggle_key(key: &str) -> String {
    let mut chars = key.chars();
    match chars.next() {
        Some(first) => format!("use{}{}Input", first.to_uppercase(), chars.as_str()),
        None => "useInput".to_string(),
    }
}

/// Remove the indentation shared by all non-blank lines.
///
/// A leading blank line and trailing whitespace are dropped, so indented
/// multi-line literals render flush left.
pub fn dedent(text: &str) -> String {
    let text = text.strip_prefix('\n').unwrap_or(text);
    let lines: Vec<&str> = text.trim_end().lines().collect();

    let indent = lines
        .iter()
        .filter(|line| !line.trim().is_empty())
        .map(|line| leading_indent(line, usize::MAX))
        .min()
        .unwrap_or(0);

    lines
        .iter()
        .map(|line| &line[leading_indent(line, indent)..])
        .collect::<Vec<_>>()
        .join("\n")
}

/// Number of leading ASCII space/tab bytes, at most `limit`.
///
/// Only single-byte whitespace counts as indent, so the result is always a
/// char boundary.
fn leading_indent(line: &str, limit: usize) -> usize {
    line.bytes()
        .take(limit)
        .take_while(|b| *b == b' ' || *b == b'\t')
        .count()
}
