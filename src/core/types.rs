//! Routing vocabulary shared by every component
//!
//! Use cases and backend kinds are closed sets; their string forms are the tags
//! used in configuration, the persisted store and the HTTP surface.

use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;

/// Provider identifier (unique within the registry)
pub type ProviderId = String;

/// Marker returned in place of a configured credential on administrative reads
pub const SANITIZED_CREDENTIAL: &str = "***configured***";

/// Category of request being routed
///
/// A provider declares exactly one use case. `General` providers form the
/// universal fallback pool for use cases without dedicated providers.
#[derive(
    Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Default, Serialize, Deserialize,
)]
#[serde(rename_all = "kebab-case")]
pub enum UseCase {
    #[default]
    General,
    Chatbot,
    Assessment,
    Search,
    Analysis,
    CreativeVision,
    CreativeWriting,
    CreativeSocial,
}

impl UseCase {
    /// Every use case, in declaration order
    pub const ALL: [UseCase; 8] = [
        UseCase::General,
        UseCase::Chatbot,
        UseCase::Assessment,
        UseCase::Search,
        UseCase::Analysis,
        UseCase::CreativeVision,
        UseCase::CreativeWriting,
        UseCase::CreativeSocial,
    ];

    /// Tag used in configuration and on the wire
    pub fn as_str(&self) -> &'static str {
        match self {
            UseCase::General => "general",
            UseCase::Chatbot => "chatbot",
            UseCase::Assessment => "assessment",
            UseCase::Search => "search",
            UseCase::Analysis => "analysis",
            UseCase::CreativeVision => "creative-vision",
            UseCase::CreativeWriting => "creative-writing",
            UseCase::CreativeSocial => "creative-social",
        }
    }
}

impl fmt::Display for UseCase {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for UseCase {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        UseCase::ALL
            .iter()
            .copied()
            .find(|use_case| use_case.as_str() == s)
            .ok_or_else(|| format!("Unknown use case: {}", s))
    }
}

/// Backend kind, selects the call adapter
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum ProviderType {
    Anthropic,
    OpenAi,
    Google,
    Xai,
}

impl ProviderType {
    /// Every backend kind
    pub const ALL: [ProviderType; 4] = [
        ProviderType::Anthropic,
        ProviderType::OpenAi,
        ProviderType::Google,
        ProviderType::Xai,
    ];

    /// Tag used in configuration and on the wire
    pub fn as_str(&self) -> &'static str {
        match self {
            ProviderType::Anthropic => "anthropic",
            ProviderType::OpenAi => "openai",
            ProviderType::Google => "google",
            ProviderType::Xai => "xai",
        }
    }

    /// Public endpoint used when a provider record does not name one
    ///
    /// Google endpoints are a base URL; the adapter appends the model path.
    pub fn default_endpoint(&self) -> &'static str {
        match self {
            ProviderType::Anthropic => "https://api.anthropic.com/v1/messages",
            ProviderType::OpenAi => "https://api.openai.com/v1/chat/completions",
            ProviderType::Google => "https://generativelanguage.googleapis.com/v1beta",
            ProviderType::Xai => "https://api.x.ai/v1/chat/completions",
        }
    }
}

impl fmt::Display for ProviderType {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for ProviderType {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        ProviderType::ALL
            .iter()
            .copied()
            .find(|kind| kind.as_str() == s)
            .ok_or_else(|| format!("Unsupported provider type: {}", s))
    }
}

/// Opaque reference to a provider credential
///
/// Either `env:NAME` (resolved from the process environment at call time) or the
/// literal secret. Never printed: `Debug` is redacted and administrative reads
/// use [`CredentialRef::sanitized`].
#[derive(Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(transparent)]
pub struct CredentialRef(String);

impl CredentialRef {
    pub fn new(value: impl Into<String>) -> Self {
        Self(value.into())
    }

    /// Reference to an environment variable
    pub fn from_env(var: &str) -> Self {
        Self(format!("env:{}", var))
    }

    pub fn is_empty(&self) -> bool {
        self.0.trim().is_empty()
    }

    /// Environment variable name, for `env:` references
    pub fn env_var(&self) -> Option<&str> {
        self.0.strip_prefix("env:").map(str::trim)
    }

    /// Raw reference value; only credential resolvers should read this
    pub fn expose_secret(&self) -> &str {
        &self.0
    }

    /// Display form for administrative reads
    pub fn sanitized(&self) -> &'static str {
        if self.is_empty() {
            ""
        } else {
            SANITIZED_CREDENTIAL
        }
    }
}

impl fmt::Debug for CredentialRef {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "CredentialRef({})", self.sanitized())
    }
}

impl fmt::Display for CredentialRef {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.sanitized())
    }
}
