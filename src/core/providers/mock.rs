//! Scripted adapter for tests and benchmarks

use super::{CallError, CompletionRequest, ProviderAdapter};
use crate::core::registry::Provider;
use crate::core::types::{ProviderId, ProviderType};
use async_trait::async_trait;
use parking_lot::Mutex;
use std::collections::HashMap;
use std::time::Duration;

#[derive(Debug, Clone)]
struct Script {
    result: Result<String, CallError>,
    delay: Duration,
}

impl Default for Script {
    fn default() -> Self {
        Self {
            result: Err(CallError::unreachable("no scripted response")),
            delay: Duration::ZERO,
        }
    }
}

/// Adapter answering from a per-provider script and recording call order
#[derive(Debug)]
pub struct MockAdapter {
    provider_type: ProviderType,
    scripts: Mutex<HashMap<ProviderId, Script>>,
    calls: Mutex<Vec<ProviderId>>,
}

impl MockAdapter {
    pub fn new(provider_type: ProviderType) -> Self {
        Self {
            provider_type,
            scripts: Mutex::new(HashMap::new()),
            calls: Mutex::new(Vec::new()),
        }
    }

    /// Answer calls to `provider_id` with `text`
    pub fn reply(self, provider_id: &str, text: &str) -> Self {
        self.set_result(provider_id, Ok(text.to_string()));
        self
    }

    /// Fail calls to `provider_id` with `error`
    pub fn fail(self, provider_id: &str, error: CallError) -> Self {
        self.set_result(provider_id, Err(error));
        self
    }

    /// Sleep before answering calls to `provider_id`
    pub fn delay(self, provider_id: &str, delay: Duration) -> Self {
        self.scripts
            .lock()
            .entry(provider_id.to_string())
            .or_default()
            .delay = delay;
        self
    }

    /// Change the scripted result after construction
    pub fn set_result(&self, provider_id: &str, result: Result<String, CallError>) {
        self.scripts
            .lock()
            .entry(provider_id.to_string())
            .or_default()
            .result = result;
    }

    /// Provider ids in the order they were called
    pub fn calls(&self) -> Vec<ProviderId> {
        self.calls.lock().clone()
    }
}

#[async_trait]
impl ProviderAdapter for MockAdapter {
    fn provider_type(&self) -> ProviderType {
        self.provider_type
    }

    async fn complete(
        &self,
        provider: &Provider,
        _api_key: &str,
        _request: &CompletionRequest,
    ) -> Result<String, CallError> {
        self.calls.lock().push(provider.id.clone());
        let script = self
            .scripts
            .lock()
            .get(&provider.id)
            .cloned()
            .unwrap_or_default();

        if !script.delay.is_zero() {
            tokio::time::sleep(script.delay).await;
        }
        script.result
    }
}
