//! Test fixtures and data factories

use failover_gateway::core::registry::Provider;
use failover_gateway::core::types::{CredentialRef, ProviderType, UseCase};

/// Literal credential accepted by the mock backends
pub const TEST_API_KEY: &str = "sk-integration-test";

/// Factory for provider records pointing at mock backends
pub struct ProviderFactory;

impl ProviderFactory {
    /// OpenAI-style provider in the general pool
    pub fn openai(id: &str, priority: u32, endpoint: impl Into<String>) -> Provider {
        Provider::new(id, format!("OpenAI {}", id), ProviderType::OpenAi, "gpt-4o-mini")
            .with_priority(priority)
            .with_endpoint(endpoint)
            .with_credential(CredentialRef::new(TEST_API_KEY))
            .with_timeout_seconds(5)
    }

    /// Anthropic-style provider dedicated to a use case
    pub fn anthropic(
        id: &str,
        priority: u32,
        use_case: UseCase,
        endpoint: impl Into<String>,
    ) -> Provider {
        Provider::new(
            id,
            format!("Claude {}", id),
            ProviderType::Anthropic,
            "claude-3-5-haiku-20241022",
        )
        .with_priority(priority)
        .with_use_case(use_case)
        .with_endpoint(endpoint)
        .with_credential(CredentialRef::new(TEST_API_KEY))
        .with_timeout_seconds(5)
    }
}
