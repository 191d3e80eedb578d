//! Provider records
//!
//! A [`Provider`] is one configured backend candidate: identity, routing policy
//! (priority, enabled, use case) and call parameters (endpoint, model,
//! credential, per-call limits).

use crate::core::types::{CredentialRef, ProviderId, ProviderType, UseCase};
use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use std::time::Duration;

/// Priority given to providers created without one
pub const DEFAULT_PRIORITY: u32 = 999;
/// Completion token limit given to providers created without one
pub const DEFAULT_MAX_TOKENS: u32 = 1500;
/// Per-call timeout given to providers created without one
pub const DEFAULT_TIMEOUT_SECONDS: u64 = 30;

fn default_priority() -> u32 {
    DEFAULT_PRIORITY
}

fn default_max_tokens() -> u32 {
    DEFAULT_MAX_TOKENS
}

fn default_timeout_seconds() -> u64 {
    DEFAULT_TIMEOUT_SECONDS
}

fn default_true() -> bool {
    true
}

/// A configured backend candidate
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Provider {
    /// Stable identifier
    pub id: ProviderId,
    /// Display name
    pub name: String,
    /// Backend kind
    pub provider_type: ProviderType,
    /// Request URL (base URL for Google)
    pub endpoint: String,
    /// Model identifier sent to the backend
    pub model: String,
    /// Lower value is tried first
    #[serde(default = "default_priority")]
    pub priority: u32,
    #[serde(default = "default_true")]
    pub enabled: bool,
    #[serde(default)]
    pub use_case: UseCase,
    /// Credential reference (never logged)
    #[serde(default, alias = "api_key")]
    pub credential_ref: CredentialRef,
    #[serde(default = "default_max_tokens")]
    pub max_tokens: u32,
    #[serde(default = "default_timeout_seconds")]
    pub timeout_seconds: u64,
    #[serde(default = "Utc::now")]
    pub created_at: DateTime<Utc>,
    #[serde(default = "Utc::now")]
    pub updated_at: DateTime<Utc>,
}

impl Provider {
    /// Create a provider with default policy and the backend's public endpoint
    pub fn new(
        id: impl Into<ProviderId>,
        name: impl Into<String>,
        provider_type: ProviderType,
        model: impl Into<String>,
    ) -> Self {
        let now = Utc::now();
        Self {
            id: id.into(),
            name: name.into(),
            provider_type,
            endpoint: provider_type.default_endpoint().to_string(),
            model: model.into(),
            priority: DEFAULT_PRIORITY,
            enabled: true,
            use_case: UseCase::General,
            credential_ref: CredentialRef::default(),
            max_tokens: DEFAULT_MAX_TOKENS,
            timeout_seconds: DEFAULT_TIMEOUT_SECONDS,
            created_at: now,
            updated_at: now,
        }
    }

    /// Set priority (builder pattern)
    pub fn with_priority(mut self, priority: u32) -> Self {
        self.priority = priority;
        self
    }

    /// Set use case (builder pattern)
    pub fn with_use_case(mut self, use_case: UseCase) -> Self {
        self.use_case = use_case;
        self
    }

    /// Set endpoint (builder pattern)
    pub fn with_endpoint(mut self, endpoint: impl Into<String>) -> Self {
        self.endpoint = endpoint.into();
        self
    }

    /// Set credential reference (builder pattern)
    pub fn with_credential(mut self, credential: CredentialRef) -> Self {
        self.credential_ref = credential;
        self
    }

    /// Set enabled flag (builder pattern)
    pub fn with_enabled(mut self, enabled: bool) -> Self {
        self.enabled = enabled;
        self
    }

    /// Set completion token limit (builder pattern)
    pub fn with_max_tokens(mut self, max_tokens: u32) -> Self {
        self.max_tokens = max_tokens;
        self
    }

    /// Set per-call timeout (builder pattern)
    pub fn with_timeout_seconds(mut self, timeout_seconds: u64) -> Self {
        self.timeout_seconds = timeout_seconds;
        self
    }

    /// Per-call timeout budget
    pub fn timeout(&self) -> Duration {
        Duration::from_secs(self.timeout_seconds)
    }

    /// Total order used for deterministic candidate ordering
    pub fn ordering_key(&self) -> (u32, &str) {
        (self.priority, self.id.as_str())
    }

    /// Check the record is usable by the routing core
    pub fn validate(&self) -> Result<(), String> {
        if self.id.trim().is_empty() {
            return Err("Provider id cannot be empty".to_string());
        }

        if self.name.trim().is_empty() {
            return Err(format!("Provider {} has an empty name", self.id));
        }

        if self.model.trim().is_empty() {
            return Err(format!("Provider {} has an empty model", self.id));
        }

        let endpoint = url::Url::parse(&self.endpoint)
            .map_err(|e| format!("Provider {} has an invalid endpoint: {}", self.id, e))?;
        if !matches!(endpoint.scheme(), "http" | "https") {
            return Err(format!(
                "Provider {} endpoint must use http or https",
                self.id
            ));
        }

        if self.enabled && self.credential_ref.is_empty() {
            return Err(format!(
                "Provider {} is enabled but has no credential configured",
                self.id
            ));
        }

        if self.max_tokens == 0 {
            return Err(format!("Provider {} max_tokens must be greater than 0", self.id));
        }

        if self.timeout_seconds == 0 {
            return Err(format!(
                "Provider {} timeout_seconds must be greater than 0",
                self.id
            ));
        }

        Ok(())
    }

    /// Administrative view with the credential replaced by a marker
    pub fn sanitized(&self) -> ProviderView {
        ProviderView {
            id: self.id.clone(),
            name: self.name.clone(),
            provider_type: self.provider_type,
            endpoint: self.endpoint.clone(),
            model: self.model.clone(),
            priority: self.priority,
            enabled: self.enabled,
            use_case: self.use_case,
            credential_ref: self.credential_ref.sanitized().to_string(),
            max_tokens: self.max_tokens,
            timeout_seconds: self.timeout_seconds,
            created_at: self.created_at,
            updated_at: self.updated_at,
        }
    }
}

/// Provider as returned by administrative reads
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ProviderView {
    pub id: ProviderId,
    pub name: String,
    pub provider_type: ProviderType,
    pub endpoint: String,
    pub model: String,
    pub priority: u32,
    pub enabled: bool,
    pub use_case: UseCase,
    pub credential_ref: String,
    pub max_tokens: u32,
    pub timeout_seconds: u64,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

/// Administrative create/update input
///
/// Every field is optional so the same shape serves both partial updates and
/// creation; creation requires `name`, `provider_type` and `model`.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct ProviderInput {
    #[serde(default)]
    pub id: Option<ProviderId>,
    #[serde(default)]
    pub name: Option<String>,
    #[serde(default)]
    pub provider_type: Option<ProviderType>,
    #[serde(default)]
    pub endpoint: Option<String>,
    #[serde(default)]
    pub model: Option<String>,
    #[serde(default)]
    pub priority: Option<u32>,
    #[serde(default)]
    pub enabled: Option<bool>,
    #[serde(default)]
    pub use_case: Option<UseCase>,
    #[serde(default, alias = "api_key")]
    pub credential_ref: Option<CredentialRef>,
    #[serde(default)]
    pub max_tokens: Option<u32>,
    #[serde(default)]
    pub timeout_seconds: Option<u64>,
}

impl ProviderInput {
    /// Build a new provider record, filling defaults for absent fields
    ///
    /// Without an explicit id one is derived from the backend kind and the
    /// creation time, e.g. `anthropic-1718000000000`.
    pub fn into_provider(self, now: DateTime<Utc>) -> Result<Provider, String> {
        let provider_type = self
            .provider_type
            .ok_or_else(|| "provider_type is required".to_string())?;
        let name = self.name.ok_or_else(|| "name is required".to_string())?;
        let model = self.model.ok_or_else(|| "model is required".to_string())?;

        let id = match self.id {
            Some(id) if !id.trim().is_empty() => id,
            _ => format!("{}-{}", provider_type, now.timestamp_millis()),
        };

        let provider = Provider {
            id,
            name,
            provider_type,
            endpoint: self
                .endpoint
                .unwrap_or_else(|| provider_type.default_endpoint().to_string()),
            model,
            priority: self.priority.unwrap_or(DEFAULT_PRIORITY),
            enabled: self.enabled.unwrap_or(true),
            use_case: self.use_case.unwrap_or_default(),
            credential_ref: self.credential_ref.unwrap_or_default(),
            max_tokens: self.max_tokens.unwrap_or(DEFAULT_MAX_TOKENS),
            timeout_seconds: self.timeout_seconds.unwrap_or(DEFAULT_TIMEOUT_SECONDS),
            created_at: now,
            updated_at: now,
        };

        provider.validate()?;
        Ok(provider)
    }

    /// Merge the present fields over an existing record
    ///
    /// The id is never changed by an update. An empty credential in the input
    /// keeps the stored one, so sanitized reads can be sent back unchanged.
    pub fn apply_to(self, existing: &Provider, now: DateTime<Utc>) -> Result<Provider, String> {
        let mut updated = existing.clone();

        if let Some(name) = self.name {
            updated.name = name;
        }
        if let Some(provider_type) = self.provider_type {
            updated.provider_type = provider_type;
        }
        if let Some(endpoint) = self.endpoint {
            updated.endpoint = endpoint;
        }
        if let Some(model) = self.model {
            updated.model = model;
        }
        if let Some(priority) = self.priority {
            updated.priority = priority;
        }
        if let Some(enabled) = self.enabled {
            updated.enabled = enabled;
        }
        if let Some(use_case) = self.use_case {
            updated.use_case = use_case;
        }
        if let Some(credential) = self.credential_ref {
            if !credential.is_empty() && credential.expose_secret() != crate::core::types::SANITIZED_CREDENTIAL {
                updated.credential_ref = credential;
            }
        }
        if let Some(max_tokens) = self.max_tokens {
            updated.max_tokens = max_tokens;
        }
        if let Some(timeout_seconds) = self.timeout_seconds {
            updated.timeout_seconds = timeout_seconds;
        }
        updated.updated_at = now;

        updated.validate()?;
        Ok(updated)
    }
}
