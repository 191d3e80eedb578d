//! Call executor and per-backend adapters
//!
//! Each backend kind has one [`ProviderAdapter`] implementation, registered with
//! the [`CallExecutor`] at startup. The executor resolves credentials, applies
//! the time limit and dispatches by [`ProviderType`].

pub mod anthropic;
pub mod credentials;
pub mod error;
pub mod executor;
pub mod gemini;
pub mod mock;
pub mod openai;
pub mod shared;
pub mod xai;

pub use credentials::{CredentialResolver, EnvAllowList, EnvCredentialResolver};
pub use error::CallError;
pub use executor::CallExecutor;
pub use mock::MockAdapter;

use crate::core::registry::Provider;
use crate::core::types::ProviderType;
use async_trait::async_trait;

/// Prompt sent by health probes and connection tests
pub const PROBE_PROMPT: &str = "Hello, this is a connection test.";
/// Completion token limit for health probes
pub const PROBE_MAX_TOKENS: u32 = 50;
/// Sampling temperature used for every backend
pub const DEFAULT_TEMPERATURE: f32 = 0.7;

/// Normalized completion request
#[derive(Debug, Clone, PartialEq)]
pub struct CompletionRequest {
    pub prompt: String,
    pub system_prompt: Option<String>,
    /// Overrides the provider's `max_tokens` when set
    pub max_tokens: Option<u32>,
    pub temperature: f32,
}

impl CompletionRequest {
    pub fn new(prompt: impl Into<String>) -> Self {
        Self {
            prompt: prompt.into(),
            system_prompt: None,
            max_tokens: None,
            temperature: DEFAULT_TEMPERATURE,
        }
    }

    /// Minimal capability check used by the health monitor
    pub fn probe() -> Self {
        Self::new(PROBE_PROMPT).with_max_tokens(PROBE_MAX_TOKENS)
    }

    pub fn with_system_prompt(mut self, system_prompt: impl Into<String>) -> Self {
        self.system_prompt = Some(system_prompt.into());
        self
    }

    pub fn with_max_tokens(mut self, max_tokens: u32) -> Self {
        self.max_tokens = Some(max_tokens);
        self
    }

    /// Token limit for a call to `provider`
    pub fn max_tokens_for(&self, provider: &Provider) -> u32 {
        self.max_tokens.unwrap_or(provider.max_tokens)
    }

    /// System prompt, ignoring blank values
    pub fn system(&self) -> Option<&str> {
        self.system_prompt
            .as_deref()
            .map(str::trim)
            .filter(|s| !s.is_empty())
    }
}

/// Wire adapter for one backend kind
#[async_trait]
pub trait ProviderAdapter: Send + Sync {
    /// Backend kind served by this adapter
    fn provider_type(&self) -> ProviderType;

    /// Perform one completion call and return the generated text
    ///
    /// `api_key` is the resolved credential. Time limits are applied by the
    /// caller.
    async fn complete(
        &self,
        provider: &Provider,
        api_key: &str,
        request: &CompletionRequest,
    ) -> Result<String, CallError>;
}
