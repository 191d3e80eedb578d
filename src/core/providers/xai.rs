//! xAI adapter
//!
//! Grok models are served through an OpenAI-compatible chat completions API.

use super::openai::chat_completion;
use super::{CallError, CompletionRequest, ProviderAdapter};
use crate::core::registry::Provider;
use crate::core::types::ProviderType;
use async_trait::async_trait;
use reqwest::Client;

/// Adapter for `provider_type: xai`
#[derive(Debug, Clone)]
pub struct XaiAdapter {
    client: Client,
}

impl XaiAdapter {
    pub fn new(client: Client) -> Self {
        Self { client }
    }
}

#[async_trait]
impl ProviderAdapter for XaiAdapter {
    fn provider_type(&self) -> ProviderType {
        ProviderType::Xai
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
