//! The Bedrock graph node.
//!
//! Resolves prompt and model settings from inputs and node data, then runs
//! build → invoke → parse. Every failure becomes ordinary error outputs so a
//! failed call never aborts the surrounding graph.

use std::sync::Arc;

use async_trait::async_trait;
use graph_core::{
    ChartNode, DataType, DataValue, DropdownOption, EditorDefinition, HostLibrary, Inputs,
    NodeInputDefinition, NodeOutputDefinition, NodeUIData, Outputs, PluginNodeImpl, PortId,
    ProcessContext, Result, VisualData,
};
use serde_json::{Value, json};
use tracing::{debug, warn};

use crate::credentials::select_credentials;
use crate::data::{
    BedrockNodeData, BedrockPluginConfig, DEFAULT_REGION, KNOWN_MODELS, NODE_TYPE,
    clamp_max_tokens, clamp_temperature, model_label,
};
use crate::error::BedrockNodeError;
use crate::invoker::{BedrockInvoker, InferenceInvoker};
use crate::model::{InvocationRequest, InvocationResult, ModelFamily};
use crate::{normalizer, payload};

pub const RESPONSE_PORT: &str = "response";
pub const FULL_RESPONSE_PORT: &str = "fullResponse";

/// Longest prompt excerpt shown in the node body
const PROMPT_PREVIEW_CHARS: usize = 20;

const USING_INPUT: &str = "(Using Input)";

/// Node that sends a prompt to an AWS Bedrock model.
pub struct BedrockNode {
    library: Arc<dyn HostLibrary>,
    invoker: Arc<dyn InferenceInvoker>,
}

impl BedrockNode {
    /// Create a node backed by the AWS SDK.
    pub fn new(library: Arc<dyn HostLibrary>) -> Self {
        Self::with_invoker(library, Arc::new(BedrockInvoker::new()))
    }

    pub fn with_invoker(library: Arc<dyn HostLibrary>, invoker: Arc<dyn InferenceInvoker>) -> Self {
        Self { library, invoker }
    }

    /// Create a node instance seeded from the plugin config.
    pub fn create_with_config(&self, config: &BedrockPluginConfig) -> ChartNode<BedrockNodeData> {
        let mut node = self.create();
        if let Some(region) = config.region.as_deref().filter(|r| !r.trim().is_empty()) {
            node.data.region = region.trim().to_string();
        }
        if let Some(use_local) = config.use_local_credentials {
            node.data.use_local_credentials = use_local;
        }
        node
    }

    /// Resolve the request from node data, connected inputs and plugin config.
    pub fn resolve_request(
        &self,
        data: &BedrockNodeData,
        inputs: &Inputs,
        context: &ProcessContext,
    ) -> std::result::Result<InvocationRequest, BedrockNodeError> {
        let raw = serde_json::to_value(data).map_err(|e| BedrockNodeError::InvalidData(e.to_string()))?;

        let prompt = self
            .string_value(&raw, inputs, "prompt")
            .unwrap_or_else(|| data.prompt.clone());
        let model_id = self
            .string_value(&raw, inputs, "modelId")
            .unwrap_or_else(|| data.model_id.clone());
        let temperature = self
            .number_value(&raw, inputs, "temperature")
            .map(clamp_temperature)
            .unwrap_or_else(|| clamp_temperature(data.temperature));
        let max_tokens = self
            .number_value(&raw, inputs, "maxTokens")
            .map(clamp_max_tokens)
            .unwrap_or_else(|| clamp_max_tokens(data.max_tokens as f64));

        Ok(InvocationRequest {
            prompt,
            model_id,
            temperature,
            max_tokens,
            region: resolve_region(data, context),
            credentials: select_credentials(
                data.use_local_credentials,
                data.access_key_id.as_deref(),
                data.secret_access_key.as_deref(),
            ),
        })
    }

    /// Run one invocation end to end.
    pub async fn invoke(&self, request: &InvocationRequest) -> std::result::Result<InvocationResult, BedrockNodeError> {
        let family = ModelFamily::of(&request.model_id);
        let document = payload::build(family, request)?;

        let raw = self
            .invoker
            .invoke(&request.region, &request.credentials, &request.model_id, &document)
            .await?;

        normalizer::parse(family, &raw)
    }

    fn string_value(&self, raw: &Value, inputs: &Inputs, key: &str) -> Option<String> {
        self.library
            .get_input_or_data(raw, inputs, key, DataType::String)
            .and_then(|v| v.as_str().map(String::from))
    }

    fn number_value(&self, raw: &Value, inputs: &Inputs, key: &str) -> Option<f64> {
        self.library
            .get_input_or_data(raw, inputs, key, DataType::Number)
            .and_then(|v| v.as_number())
    }
}

/// Region order: the node's own, then the plugin default, then us-east-1.
fn resolve_region(data: &BedrockNodeData, context: &ProcessContext) -> String {
    let own = data.region.trim();
    if !own.is_empty() {
        return own.to_string();
    }

    let config: BedrockPluginConfig = context.plugin_config().unwrap_or_else(|e| {
        debug!(error = %e, "Ignoring unreadable plugin config");
        BedrockPluginConfig::default()
    });

    config
        .region
        .map(|r| r.trim().to_string())
        .filter(|r| !r.is_empty())
        .unwrap_or_else(|| DEFAULT_REGION.to_string())
}

fn success_outputs(result: InvocationResult) -> Outputs {
    let mut outputs = Outputs::new();
    outputs.insert(PortId::from(RESPONSE_PORT), DataValue::String(result.response_text));
    outputs.insert(PortId::from(FULL_RESPONSE_PORT), DataValue::Object(result.raw_response));
    outputs
}

fn error_outputs(error: &BedrockNodeError) -> Outputs {
    let message = error.to_string();
    let mut outputs = Outputs::new();
    outputs.insert(PortId::from(RESPONSE_PORT), DataValue::String(format!("Error: {}", message)));
    outputs.insert(PortId::from(FULL_RESPONSE_PORT), DataValue::Object(json!({ "error": message })));
    outputs
}

fn input(id: &str, data_type: DataType, title: &str) -> NodeInputDefinition {
    NodeInputDefinition {
        id: PortId::from(id),
        data_type,
        title: title.to_string(),
    }
}

/// Join multi-line text so it stays on its own line of the body summary.
fn single_line(text: &str) -> String {
    text.lines().collect::<Vec<_>>().join(" ")
}

fn prompt_preview(prompt: &str) -> String {
    let prompt = single_line(prompt);
    if prompt.chars().count() > PROMPT_PREVIEW_CHARS {
        let head: String = prompt.chars().take(PROMPT_PREVIEW_CHARS).collect();
        format!("{}...", head)
    } else {
        prompt
    }
}

#[async_trait]
impl PluginNodeImpl for BedrockNode {
    type Data = BedrockNodeData;

    fn node_type(&self) -> &str {
        NODE_TYPE
    }

    fn create(&self) -> ChartNode<BedrockNodeData> {
        ChartNode {
            id: self.library.new_id(),
            node_type: NODE_TYPE.to_string(),
            title: "AWS Bedrock".to_string(),
            data: BedrockNodeData::default(),
            visual_data: VisualData {
                x: 0.0,
                y: 0.0,
                width: Some(200.0),
            },
        }
    }

    fn input_definitions(&self, data: &BedrockNodeData) -> Vec<NodeInputDefinition> {
        let mut inputs = Vec::new();

        if data.use_prompt_input {
            inputs.push(input("prompt", DataType::String, "Prompt"));
        }
        if data.use_model_id_input {
            inputs.push(input("modelId", DataType::String, "Model ID"));
        }
        if data.use_temperature_input {
            inputs.push(input("temperature", DataType::Number, "Temperature"));
        }
        if data.use_max_tokens_input {
            inputs.push(input("maxTokens", DataType::Number, "Max Tokens"));
        }

        inputs
    }

    fn output_definitions(&self, _data: &BedrockNodeData) -> Vec<NodeOutputDefinition> {
        vec![
            NodeOutputDefinition {
                id: PortId::from(RESPONSE_PORT),
                data_type: DataType::String,
                title: "Response".to_string(),
            },
            NodeOutputDefinition {
                id: PortId::from(FULL_RESPONSE_PORT),
                data_type: DataType::Object,
                title: "Full Response".to_string(),
            },
        ]
    }

    fn ui_data(&self) -> NodeUIData {
        NodeUIData {
            context_menu_title: "AWS Bedrock".to_string(),
            group: "AWS Bedrock".to_string(),
            info_box_body: "Send prompts to AWS Bedrock AI models and get responses.".to_string(),
            info_box_title: "AWS Bedrock Node".to_string(),
        }
    }

    fn editors(&self, _data: &BedrockNodeData) -> Vec<EditorDefinition> {
        let models = KNOWN_MODELS
            .iter()
            .map(|(label, id)| DropdownOption::new(*label, *id))
            .collect();

        vec![
            EditorDefinition::string("prompt", "Prompt")
                .with_input_toggle("usePromptInput")
                .with_placeholder("Enter your prompt here"),
            EditorDefinition::dropdown("modelId", "Model ID", models).with_input_toggle("useModelIdInput"),
            EditorDefinition::number("temperature", "Temperature", 0.0, 1.0, 0.01)
                .with_input_toggle("useTemperatureInput"),
            EditorDefinition::number("maxTokens", "Max Tokens", 1.0, 4096.0, 1.0)
                .with_input_toggle("useMaxTokensInput"),
            EditorDefinition::string("region", "AWS Region"),
            EditorDefinition::toggle("useLocalCredentials", "Use Local AWS Credentials"),
            EditorDefinition::string("accessKeyId", "AWS Access Key ID"),
            EditorDefinition::string("secretAccessKey", "AWS Secret Access Key"),
        ]
    }

    fn body(&self, data: &BedrockNodeData) -> Option<String> {
        let model = if data.use_model_id_input {
            USING_INPUT.to_string()
        } else {
            model_label(&data.model_id)
                .map(String::from)
                .unwrap_or_else(|| single_line(&data.model_id))
        };
        let prompt = if data.use_prompt_input {
            USING_INPUT.to_string()
        } else {
            prompt_preview(&data.prompt)
        };
        let auth = if data.use_local_credentials {
            "Local AWS Credentials"
        } else {
            "Node Credentials"
        };

        Some(self.library.dedent(&format!(
            "
            AWS Bedrock
            Model: {model}
            Prompt: {prompt}
            Auth: {auth}
            "
        )))
    }

    async fn process(&self, data: &BedrockNodeData, inputs: &Inputs, context: &ProcessContext) -> Result<Outputs> {
        let request = match self.resolve_request(data, inputs, context) {
            Ok(request) => request,
            Err(e) => {
                warn!(error = %e, "Bedrock node could not resolve its request");
                return Ok(error_outputs(&e));
            }
        };

        match self.invoke(&request).await {
            Ok(result) => Ok(success_outputs(result)),
            Err(e) => {
                warn!(model_id = %request.model_id, error = %e, "Bedrock invocation failed");
                Ok(error_outputs(&e))
            }
        }
    }
}
