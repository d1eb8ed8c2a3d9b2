//! Calls into the Bedrock runtime.
//!
//! The node talks to an [`InferenceInvoker`] rather than the SDK directly, so
//! the host (or a test) can substitute its own transport.

use async_trait::async_trait;
use aws_config::{BehaviorVersion, Region};
use aws_sdk_bedrockruntime::config::Credentials;
use aws_sdk_bedrockruntime::error::DisplayErrorContext;
use aws_sdk_bedrockruntime::primitives::Blob;
use serde_json::Value;
use tracing::{debug, info};

use crate::credentials::CredentialSelection;
use crate::error::{BedrockNodeError, Result};

const JSON_CONTENT_TYPE: &str = "application/json";

/// Provider name attached to credentials entered on the node
const NODE_CREDENTIALS_PROVIDER: &str = "BedrockNodeCredentials";

/// Sends one request document to a model and returns the raw response body.
#[async_trait]
pub trait InferenceInvoker: Send + Sync {
    async fn invoke(
        &self,
        region: &str,
        credentials: &CredentialSelection,
        model_id: &str,
        document: &Value,
    ) -> Result<Vec<u8>>;
}

/// Invoker backed by the AWS SDK.
///
/// A client is built for every call; nothing is cached between invocations.
#[derive(Debug, Clone, Default)]
pub struct BedrockInvoker;

impl BedrockInvoker {
    pub fn new() -> Self {
        Self
    }

    /// Create a Bedrock runtime client for the region and credentials.
    pub async fn client(region: &str, credentials: &CredentialSelection) -> aws_sdk_bedrockruntime::Client {
        let loader = aws_config::defaults(BehaviorVersion::latest())
            .region(Region::new(region.to_string()));

        let loader = match credentials {
            CredentialSelection::Ambient => loader,
            CredentialSelection::Explicit { access_key_id, secret_access_key } => {
                loader.credentials_provider(Credentials::new(
                    access_key_id.clone(),
                    secret_access_key.clone(),
                    None,
                    None,
                    NODE_CREDENTIALS_PROVIDER,
                ))
            }
        };

        let config = loader.load().await;
        aws_sdk_bedrockruntime::Client::new(&config)
    }
}

#[async_trait]
impl InferenceInvoker for BedrockInvoker {
    async fn invoke(
        &self,
        region: &str,
        credentials: &CredentialSelection,
        model_id: &str,
        document: &Value,
    ) -> Result<Vec<u8>> {
        debug!(credentials = credentials.mode(), region, "Creating Bedrock client");
        let client = Self::client(region, credentials).await;

        info!(model_id, region, "Sending request to AWS Bedrock with model {}", model_id);

        let response = client
            .invoke_model()
            .model_id(model_id)
            .body(Blob::new(document.to_string()))
            .content_type(JSON_CONTENT_TYPE)
            .accept(JSON_CONTENT_TYPE)
            .send()
            .await
            .map_err(|e| BedrockNodeError::Invocation(DisplayErrorContext(&e).to_string()))?;

        Ok(response.body.into_inner())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[tokio::test]
    async fn test_client_uses_requested_region() {
        let client = BedrockInvoker::client("eu-west-3", &CredentialSelection::Explicit {
            access_key_id: "AKIDEXAMPLE".into(),
            secret_access_key: "secret".into(),
        })
        .await;

        assert_eq!(
            client.config().region().map(|r| r.as_ref().to_string()),
            Some("eu-west-3".to_string())
        );
    }
}
