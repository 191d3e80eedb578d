//! Call executor
//!
//! Dispatches a call to the adapter registered for the provider's backend kind
//! and bounds it by the provider timeout and the caller's remaining budget.

use super::anthropic::AnthropicAdapter;
use super::credentials::CredentialResolver;
use super::gemini::GeminiAdapter;
use super::openai::OpenAiAdapter;
use super::xai::XaiAdapter;
use super::{CallError, CompletionRequest, ProviderAdapter};
use crate::core::registry::Provider;
use crate::core::types::ProviderType;
use reqwest::Client;
use std::collections::HashMap;
use std::sync::Arc;
use std::time::Duration;
use tracing::debug;

/// Adapter registry plus credential resolution
#[derive(Clone)]
pub struct CallExecutor {
    adapters: HashMap<ProviderType, Arc<dyn ProviderAdapter>>,
    credentials: Arc<dyn CredentialResolver>,
}

impl CallExecutor {
    /// Executor with no adapters registered
    pub fn new(credentials: Arc<dyn CredentialResolver>) -> Self {
        Self {
            adapters: HashMap::new(),
            credentials,
        }
    }

    /// Executor with the HTTP adapters for every backend kind
    pub fn with_http_adapters(client: Client, credentials: Arc<dyn CredentialResolver>) -> Self {
        Self::new(credentials)
            .register(Arc::new(AnthropicAdapter::new(client.clone())))
            .register(Arc::new(OpenAiAdapter::new(client.clone())))
            .register(Arc::new(GeminiAdapter::new(client.clone())))
            .register(Arc::new(XaiAdapter::new(client)))
    }

    /// Register an adapter for the kind it reports
    pub fn register(self, adapter: Arc<dyn ProviderAdapter>) -> Self {
        let provider_type = adapter.provider_type();
        self.register_for(provider_type, adapter)
    }

    /// Register an adapter for an explicit backend kind
    pub fn register_for(
        mut self,
        provider_type: ProviderType,
        adapter: Arc<dyn ProviderAdapter>,
    ) -> Self {
        self.adapters.insert(provider_type, adapter);
        self
    }

    pub fn supports(&self, provider_type: ProviderType) -> bool {
        self.adapters.contains_key(&provider_type)
    }

    /// Perform one call to `provider`
    ///
    /// The call is limited to `min(budget, provider timeout)`. A zero limit
    /// fails immediately with a timeout.
    pub async fn execute(
        &self,
        provider: &Provider,
        request: &CompletionRequest,
        budget: Duration,
    ) -> Result<String, CallError> {
        let adapter = self.adapters.get(&provider.provider_type).ok_or_else(|| {
            CallError::config(format!(
                "No adapter registered for provider type {}",
                provider.provider_type
            ))
        })?;

        let api_key = self
            .credentials
            .resolve(&provider.credential_ref)
            .map_err(CallError::config)?;

        let limit = budget.min(provider.timeout());
        if limit.is_zero() {
            return Err(CallError::timeout(Duration::ZERO));
        }

        debug!(
            provider_id = %provider.id,
            provider_type = %provider.provider_type,
            limit_ms = limit.as_millis() as u64,
            "Calling provider"
        );

        match tokio::time::timeout(limit, adapter.complete(provider, &api_key, request)).await {
            Ok(result) => result,
            Err(_) => Err(CallError::timeout(limit)),
        }
    }
}

impl std::fmt::Debug for CallExecutor {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        let mut kinds: Vec<_> = self.adapters.keys().map(ProviderType::as_str).collect();
        kinds.sort_unstable();
        f.debug_struct("CallExecutor")
            .field("adapters", &kinds)
            .finish_non_exhaustive()
    }
}
