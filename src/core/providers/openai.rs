//! OpenAI Chat Completions adapter
//!
//! The request and response helpers are shared with other OpenAI-compatible
//! backends (xAI).

use super::shared::{non_empty_text, send_json};
use super::{CallError, CompletionRequest, ProviderAdapter};
use crate::core::registry::Provider;
use crate::core::types::ProviderType;
use async_trait::async_trait;
use reqwest::Client;
use serde_json::{Value, json};

/// Adapter for `provider_type: openai`
#[derive(Debug, Clone)]
pub struct OpenAiAdapter {
    client: Client,
}

impl OpenAiAdapter {
    pub fn new(client: Client) -> Self {
        Self { client }
    }
}

#[async_trait]
impl ProviderAdapter for OpenAiAdapter {
    fn provider_type(&self) -> ProviderType {
        ProviderType::OpenAi
    }

    async fn complete(
        &self,
        provider: &Provider,
        api_key: &str,
        request: &CompletionRequest,
    ) -> Result<String, CallError> {
        chat_completion(&self.client, provider, api_key, request).await
    }
}

/// Chat completions body, system message first
pub(crate) fn build_chat_body(provider: &Provider, request: &CompletionRequest) -> Value {
    let mut messages = Vec::with_capacity(2);
    if let Some(system) = request.system() {
        messages.push(json!({ "role": "system", "content": system }));
    }
    messages.push(json!({ "role": "user", "content": request.prompt }));

    json!({
        "model": provider.model,
        "messages": messages,
        "max_tokens": request.max_tokens_for(provider),
        "temperature": request.temperature,
    })
}

/// `choices[0].message.content`
pub(crate) fn extract_chat_text(response: &Value) -> Option<&str> {
    response
        .pointer("/choices/0/message/content")
        .and_then(Value::as_str)
}

/// One OpenAI-compatible chat completion call
pub(crate) async fn chat_completion(
    client: &Client,
    provider: &Provider,
    api_key: &str,
    request: &CompletionRequest,
) -> Result<String, CallError> {
    let body = build_chat_body(provider, request);

    let response = send_json(
        client
            .post(&provider.endpoint)
            .bearer_auth(api_key)
            .json(&body),
    )
    .await?;

    non_empty_text(extract_chat_text(&response))
}
