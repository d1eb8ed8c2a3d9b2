//! End-to-end node execution against a recording invoker.

use std::sync::{Arc, Mutex};

use async_trait::async_trait;
use graph_core::{DataValue, Inputs, PortId, ProcessContext, Registry, StandardLibrary};
use graph_plugin_aws_bedrock::{BedrockNodeError, BedrockPlugin, CredentialSelection, InferenceInvoker};
use serde_json::{Value, json};

#[derive(Debug, Clone)]
struct Call {
    region: String,
    credentials: CredentialSelection,
    model_id: String,
    document: Value,
}

struct RecordingInvoker {
    response: Result<Vec<u8>, BedrockNodeError>,
    calls: Mutex<Vec<Call>>,
}

impl RecordingInvoker {
    fn replying(body: Value) -> Arc<Self> {
        Arc::new(Self {
            response: Ok(body.to_string().into_bytes()),
            calls: Mutex::new(Vec::new()),
        })
    }

    fn failing(message: &str) -> Arc<Self> {
        Arc::new(Self {
            response: Err(BedrockNodeError::Invocation(message.to_string())),
            calls: Mutex::new(Vec::new()),
        })
    }

    fn calls(&self) -> Vec<Call> {
        self.calls.lock().unwrap().clone()
    }
}

#[async_trait]
impl InferenceInvoker for RecordingInvoker {
    async fn invoke(
        &self,
        region: &str,
        credentials: &CredentialSelection,
        model_id: &str,
        document: &Value,
    ) -> Result<Vec<u8>, BedrockNodeError> {
        self.calls.lock().unwrap().push(Call {
            region: region.to_string(),
            credentials: credentials.clone(),
            model_id: model_id.to_string(),
            document: document.clone(),
        });
        self.response.clone()
    }
}

fn init_tracing() {
    let _ = tracing_subscriber::fmt()
        .with_env_filter(tracing_subscriber::EnvFilter::from_default_env())
        .with_test_writer()
        .try_init();
}

fn registry(invoker: Arc<RecordingInvoker>) -> Registry {
    init_tracing();
    let plugin = BedrockPlugin::with_invoker(Arc::new(StandardLibrary::new()), invoker);
    let mut registry = Registry::new();
    registry.load(&plugin).unwrap();
    registry
}

fn default_data(registry: &Registry) -> Value {
    registry.node("bedrockNode").unwrap().create().unwrap().data
}

async fn run(registry: &Registry, data: &Value, inputs: &Inputs) -> graph_core::Outputs {
    registry
        .node("bedrockNode")
        .unwrap()
        .process(data, inputs, &ProcessContext::new())
        .await
        .unwrap()
}

fn response(outputs: &graph_core::Outputs) -> &str {
    outputs[&PortId::from("response")].as_str().unwrap()
}

fn full_response(outputs: &graph_core::Outputs) -> &Value {
    match &outputs[&PortId::from("fullResponse")] {
        DataValue::Object(value) => value,
        other => panic!("fullResponse should be an object, got {:?}", other),
    }
}

#[test]
fn test_plugin_registration() {
    let registry = registry(RecordingInvoker::failing("unused"));

    let spec = registry.plugin("aws-bedrock-plugin").unwrap();
    assert_eq!(spec.name, "AWS Bedrock Plugin");
    assert!(spec.config_spec.contains_key("region"));
    assert!(spec.config_spec.contains_key("useLocalCredentials"));
    assert_eq!(spec.context_menu_groups[0].id, "aws-bedrock");
    assert_eq!(registry.node_types(), vec!["bedrockNode"]);
    assert_eq!(registry.node("bedrockNode").unwrap().display_name(), "AWS Bedrock");
}

#[tokio::test]
async fn test_claude_request_and_response() {
    let invoker = RecordingInvoker::replying(json!({
        "content": [{"type": "text", "text": "Once upon a time..."}],
        "stop_reason": "end_turn"
    }));
    let registry = registry(invoker.clone());

    let outputs = run(&registry, &default_data(&registry), &Inputs::new()).await;

    assert_eq!(response(&outputs), "Once upon a time...");
    assert_eq!(full_response(&outputs)["stop_reason"], "end_turn");

    let calls = invoker.calls();
    assert_eq!(calls.len(), 1);
    assert_eq!(calls[0].region, "us-east-1");
    assert_eq!(calls[0].model_id, "anthropic.claude-3-sonnet-20240229-v1:0");
    assert_eq!(calls[0].document["anthropic_version"], "bedrock-2023-05-31");
    assert_eq!(calls[0].document["messages"][0]["content"], "Tell me a short story");
    assert_eq!(calls[0].document["max_tokens"], 512);
    assert_eq!(calls[0].document["temperature"], 0.7);
}

#[tokio::test]
async fn test_each_family_round_trips_text() {
    let cases = [
        ("anthropic.claude-3-haiku-20240307-v1:0", json!({"content": [{"text": "claude says"}]}), "claude says"),
        ("amazon.titan-text-express-v1", json!({"results": [{"outputText": "titan says"}]}), "titan says"),
        ("meta.llama2-70b-chat-v1", json!({"generation": "llama says"}), "llama says"),
    ];

    for (model_id, body, expected) in cases {
        let registry = registry(RecordingInvoker::replying(body));
        let mut data = default_data(&registry);
        data["modelId"] = json!(model_id);

        let outputs = run(&registry, &data, &Inputs::new()).await;
        assert_eq!(response(&outputs), expected, "model {}", model_id);
    }
}

#[tokio::test]
async fn test_titan_without_results_yields_empty_text() {
    let registry = registry(RecordingInvoker::replying(json!({"results": []})));
    let mut data = default_data(&registry);
    data["modelId"] = json!("amazon.titan-text-express-v1");

    let outputs = run(&registry, &data, &Inputs::new()).await;

    assert_eq!(response(&outputs), "");
    assert_eq!(full_response(&outputs), &json!({"results": []}));
}

#[tokio::test]
async fn test_unsupported_model_never_reaches_invoker() {
    let invoker = RecordingInvoker::failing("network should not be used");
    let registry = registry(invoker.clone());
    let mut data = default_data(&registry);
    data["modelId"] = json!("unknown.model-v1");

    let outputs = run(&registry, &data, &Inputs::new()).await;

    assert_eq!(response(&outputs), "Error: Unsupported model: unknown.model-v1");
    assert_eq!(full_response(&outputs), &json!({"error": "Unsupported model: unknown.model-v1"}));
    assert!(invoker.calls().is_empty());
}

#[tokio::test]
async fn test_remote_failure_becomes_error_outputs() {
    let invoker = RecordingInvoker::failing("ThrottlingException: Too many requests");
    let registry = registry(invoker.clone());

    let outputs = run(&registry, &default_data(&registry), &Inputs::new()).await;

    assert_eq!(response(&outputs), "Error: ThrottlingException: Too many requests");
    assert_eq!(
        full_response(&outputs),
        &json!({"error": "ThrottlingException: Too many requests"})
    );
    assert_eq!(invoker.calls().len(), 1);
}

#[tokio::test]
async fn test_explicit_keys_only_when_local_credentials_off() {
    let body = json!({"content": [{"text": "ok"}]});

    let cases = [
        (true, "AKIDEXAMPLE", "secret", false),
        (false, "AKIDEXAMPLE", "", false),
        (false, "", "secret", false),
        (false, "AKIDEXAMPLE", "secret", true),
    ];

    for (use_local, key, secret, expect_explicit) in cases {
        let invoker = RecordingInvoker::replying(body.clone());
        let registry = registry(invoker.clone());
        let mut data = default_data(&registry);
        data["useLocalCredentials"] = json!(use_local);
        data["accessKeyId"] = json!(key);
        data["secretAccessKey"] = json!(secret);

        run(&registry, &data, &Inputs::new()).await;

        let credentials = &invoker.calls()[0].credentials;
        if expect_explicit {
            assert_eq!(
                credentials,
                &CredentialSelection::Explicit {
                    access_key_id: key.to_string(),
                    secret_access_key: secret.to_string(),
                }
            );
        } else {
            assert_eq!(credentials, &CredentialSelection::Ambient, "case {:?}", (use_local, key, secret));
        }
    }
}

#[tokio::test]
async fn test_connected_inputs_override_data() {
    let invoker = RecordingInvoker::replying(json!({"generation": "sure"}));
    let registry = registry(invoker.clone());
    let mut data = default_data(&registry);
    data["usePromptInput"] = json!(true);
    data["useModelIdInput"] = json!(true);
    data["useMaxTokensInput"] = json!(true);

    let mut inputs = Inputs::new();
    inputs.insert(PortId::from("prompt"), DataValue::String("Summarize this".into()));
    inputs.insert(PortId::from("modelId"), DataValue::String("meta.llama2-13b-chat-v1".into()));
    inputs.insert(PortId::from("maxTokens"), DataValue::Number(64.0));

    let outputs = run(&registry, &data, &inputs).await;
    assert_eq!(response(&outputs), "sure");

    let call = &invoker.calls()[0];
    assert_eq!(call.model_id, "meta.llama2-13b-chat-v1");
    assert_eq!(call.document["prompt"], "<s>[INST] Summarize this [/INST]");
    assert_eq!(call.document["max_gen_len"], 64);
}

#[tokio::test]
async fn test_partially_saved_data_still_produces_outputs() {
    let invoker = RecordingInvoker::failing("network should not be used");
    let registry = registry(invoker.clone());

    let outputs = run(&registry, &json!({"modelId": "unknown.model-v1"}), &Inputs::new()).await;

    assert_eq!(response(&outputs), "Error: Unsupported model: unknown.model-v1");
    assert_eq!(full_response(&outputs), &json!({"error": "Unsupported model: unknown.model-v1"}));
    assert!(invoker.calls().is_empty());
}

#[tokio::test]
async fn test_claude_without_content_yields_empty_text() {
    for body in [json!({"content": []}), json!({"stop_reason": "max_tokens"})] {
        let registry = registry(RecordingInvoker::replying(body.clone()));

        let outputs = run(&registry, &default_data(&registry), &Inputs::new()).await;

        assert_eq!(response(&outputs), "");
        assert_eq!(full_response(&outputs), &body);
    }
}

#[tokio::test]
async fn test_malformed_node_data_is_a_host_error() {
    let registry = registry(RecordingInvoker::failing("unused"));

    let result = registry
        .node("bedrockNode")
        .unwrap()
        .process(&json!({"prompt": 42}), &Inputs::new(), &ProcessContext::new())
        .await;

    assert!(result.is_err());
}
