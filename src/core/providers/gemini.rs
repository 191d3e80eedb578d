//! Google Gemini `generateContent` adapter

use super::shared::{non_empty_text, send_json};
use super::{CallError, CompletionRequest, ProviderAdapter};
use crate::core::registry::Provider;
use crate::core::types::ProviderType;
use async_trait::async_trait;
use reqwest::Client;
use serde_json::{Value, json};

/// Adapter for `provider_type: google`
///
/// The provider endpoint is the API base URL; the model path is appended.
#[derive(Debug, Clone)]
pub struct GeminiAdapter {
    client: Client,
}

impl GeminiAdapter {
    pub fn new(client: Client) -> Self {
        Self { client }
    }

    fn url(provider: &Provider) -> String {
        format!(
            "{}/models/{}:generateContent",
            provider.endpoint.trim_end_matches('/'),
            provider.model
        )
    }

    fn build_body(provider: &Provider, request: &CompletionRequest) -> Value {
        let mut body = json!({
            "contents": [
                { "role": "user", "parts": [{ "text": request.prompt }] }
            ],
            "generationConfig": {
                "maxOutputTokens": request.max_tokens_for(provider),
                "temperature": request.temperature,
            },
        });
        if let Some(system) = request.system() {
            body["systemInstruction"] = json!({ "parts": [{ "text": system }] });
        }
        body
    }

    /// `candidates[0].content.parts[0].text`
    fn extract_text(response: &Value) -> Option<&str> {
        response
            .pointer("/candidates/0/content/parts/0/text")
            .and_then(Value::as_str)
    }
}

#[async_trait]
impl ProviderAdapter for GeminiAdapter {
    fn provider_type(&self) -> ProviderType {
        ProviderType::Google
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
                .post(Self::url(provider))
                .query(&[("key", api_key)])
                .json(&body),
        )
        .await?;

        non_empty_text(Self::extract_text(&response))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use wiremock::matchers::{body_partial_json, method, path, query_param};
    use wiremock::{Mock, MockServer, ResponseTemplate};

    fn provider(server: &MockServer) -> Provider {
        Provider::new("google-1", "Gemini", ProviderType::Google, "gemini-1.5-flash")
            .with_endpoint(format!("{}/v1beta/", server.uri()))
    }

    #[tokio::test]
    async fn test_complete_success() {
        let server = MockServer::start().await;
        Mock::given(method("POST"))
            .and(path("/v1beta/models/gemini-1.5-flash:generateContent"))
            .and(query_param("key", "g-key"))
            .and(body_partial_json(json!({
                "systemInstruction": { "parts": [{ "text": "Be kind" }] },
                "generationConfig": { "maxOutputTokens": 1500 }
            })))
            .respond_with(ResponseTemplate::new(200).set_body_json(json!({
                "candidates": [{ "content": { "parts": [{ "text": "Gemini says hi" }] } }]
            })))
            .mount(&server)
            .await;

        let adapter = GeminiAdapter::new(Client::new());
        let request = CompletionRequest::new("Hi").with_system_prompt("Be kind");
        let text = adapter
            .complete(&provider(&server), "g-key", &request)
            .await
            .unwrap();

        assert_eq!(text, "Gemini says hi");
    }

    #[tokio::test]
    async fn test_blocked_prompt_is_rejection() {
        let server = MockServer::start().await;
        Mock::given(method("POST"))
            .respond_with(ResponseTemplate::new(200).set_body_json(json!({
                "promptFeedback": { "blockReason": "SAFETY" }
            })))
            .mount(&server)
            .await;

        let adapter = GeminiAdapter::new(Client::new());
        let err = adapter
            .complete(&provider(&server), "g-key", &CompletionRequest::new("Hi"))
            .await
            .unwrap_err();

        assert!(matches!(err, CallError::BackendRejected { .. }));
    }

    #[tokio::test]
    async fn test_error_message_does_not_leak_key() {
        let provider = Provider::new("g", "G", ProviderType::Google, "gemini-pro")
            .with_endpoint("http://127.0.0.1:9/v1beta");

        let adapter = GeminiAdapter::new(Client::new());
        let err = adapter
            .complete(&provider, "secret-key", &CompletionRequest::new("Hi"))
            .await
            .unwrap_err();

        assert!(!err.to_string().contains("secret-key"));
    }
}
