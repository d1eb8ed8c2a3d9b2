//! Property editor definitions shown by the host for a selected node.

use serde::{Deserialize, Serialize};

/// One selectable entry of a dropdown editor.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct DropdownOption {
    pub label: String,
    pub value: String,
}

impl DropdownOption {
    pub fn new(label: impl Into<String>, value: impl Into<String>) -> Self {
        Self {
            label: label.into(),
            value: value.into(),
        }
    }
}

/// Editor widget bound to a field of the node's data.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(tag = "type", rename_all = "lowercase", rename_all_fields = "camelCase")]
pub enum EditorDefinition {
    String {
        data_key: String,
        #[serde(default, skip_serializing_if = "Option::is_none")]
        use_input_toggle_data_key: Option<String>,
        label: String,
        #[serde(default, skip_serializing_if = "Option::is_none")]
        placeholder: Option<String>,
    },
    Dropdown {
        data_key: String,
        #[serde(default, skip_serializing_if = "Option::is_none")]
        use_input_toggle_data_key: Option<String>,
        label: String,
        options: Vec<DropdownOption>,
    },
    Number {
        data_key: String,
        #[serde(default, skip_serializing_if = "Option::is_none")]
        use_input_toggle_data_key: Option<String>,
        label: String,
        #[serde(default, skip_serializing_if = "Option::is_none")]
        min: Option<f64>,
        #[serde(default, skip_serializing_if = "Option::is_none")]
        max: Option<f64>,
        #[serde(default, skip_serializing_if = "Option::is_none")]
        step: Option<f64>,
    },
    Toggle {
        data_key: String,
        label: String,
    },
}

impl EditorDefinition {
    pub fn string(data_key: &str, label: &str) -> Self {
        EditorDefinition::String {
            data_key: data_key.to_string(),
            use_input_toggle_data_key: None,
            label: label.to_string(),
            placeholder: None,
        }
    }

    pub fn dropdown(data_key: &str, label: &str, options: Vec<DropdownOption>) -> Self {
        EditorDefinition::Dropdown {
            data_key: data_key.to_string(),
            use_input_toggle_data_key: None,
            label: label.to_string(),
            options,
        }
    }

    pub fn number(data_key: &str, label: &str, min: f64, max: f64, step: f64) -> Self {
        EditorDefinition::Number {
            data_key: data_key.to_string(),
            use_input_toggle_data_key: None,
            label: label.to_string(),
            min: Some(min),
            max: Some(max),
            step: Some(step),
        }
    }

    pub fn toggle(data_key: &str, label: &str) -> Self {
        EditorDefinition::Toggle {
            data_key: data_key.to_string(),
            label: label.to_string(),
        }
    }

    /// Let the field be driven by an input port, switched by the boolean `toggle_key`.
    ///
    /// Toggle editors cannot be driven by a port and are returned unchanged.
    pub fn with_input_toggle(mut self, toggle_key: &str) -> Self {
        match &mut self {
            EditorDefinition::String { use_input_toggle_data_key, .. }
            | EditorDefinition::Dropdown { use_input_toggle_data_key, .. }
            | EditorDefinition::Number { use_input_toggle_data_key, .. } => {
                *use_input_toggle_data_key = Some(toggle_key.to_string());
            }
            EditorDefinition::Toggle { .. } => {}
        }
        self
    }

    /// Set the placeholder of a string editor.
    pub fn with_placeholder(mut self, text: &str) -> Self {
        if let EditorDefinition::String { placeholder, .. } = &mut self {
            *placeholder = Some(text.to_string());
        }
        self
    }

    /// The data field this editor writes to
    pub fn data_key(&self) -> &str {
        match self {
            EditorDefinition::String { data_key, .. }
            | EditorDefinition::Dropdown { data_key, .. }
            | EditorDefinition::Number { data_key, .. }
            | EditorDefinition::Toggle { data_key, .. } => data_key,
        }
    }
}
