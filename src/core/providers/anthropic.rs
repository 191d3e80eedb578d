//! Anthropic Messages API adapter

use super::shared::{non_empty_text, send_json};
use super::{CallError, CompletionRequest, ProviderAdapter};
use crate::core::registry::Provider;
use crate::core::types::ProviderType;
use async_trait::async_trait;
use reqwest::Client;
use serde_json::{Value, json};

/// API version header value
pub const ANTHROPIC_VERSION: &str = "2023-06-01";

/// Adapter for `provider_type: anthropic`
#[derive(Debug, Clone)]
pub struct AnthropicAdapter {
    client: Client,
}

impl AnthropicAdapter {
    pub fn new(client: Client) -> Self {
        Self { client }
    }

    fn build_body(provider: &Provider, request: &CompletionRequest) -> Value {
        let mut body = json!({
            "model": provider.model,
            "max_tokens": request.max_tokens_for(provider),
            "temperature": request.temperature,
            "messages": [
                { "role": "user", "content": request.prompt }
            ],
        });
        if let Some(system) = request.system() {
            body["system"] = json!(system);
        }
        body
    }

    /// First text block of the `content` array
    fn extract_text(response: &Value) -> Option<&str> {
        response
            .get("content")?
            .as_array()?
            .iter()
            .filter(|block| block.get("type").and_then(Value::as_str).unwrap_or("text") == "text")
            .find_map(|block| block.get("text").and_then(Value::as_str))
    }
}

#[async_trait]
impl ProviderAdapter for AnthropicAdapter {
    fn provider_type(&self) -> ProviderType {
        ProviderType::Anthropic
    }

    async fn complete(
        &self,
        provider: &Provider,
        api_key: &str,
        request: &CompletionRequest,
    ) -> Result<String, CallError> {
        let body = Self::build_body(provider, request);

        let response = send_json(
            self.client
                .post(&provider.endpoint)
                .header("x-api-key", api_key)
                .header("anthropic-version", ANTHROPIC_VERSION)
                .json(&body),
        )
        .await?;

        non_empty_text(Self::extract_text(&response))
    }
}
