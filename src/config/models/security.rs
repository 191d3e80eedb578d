//! Admin access and credential source configuration

use crate::core::providers::EnvAllowList;
use crate::core::providers::credentials::DEFAULT_ENV_PATTERN;
use serde::{Deserialize, Serialize};

/// Admin API access
///
/// Without an `api_key` every `/admin` request is rejected.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct AdminConfig {
    /// Key expected as `Authorization: Bearer <key>` or `X-API-Key`
    #[serde(default)]
    pub api_key: Option<String>,
}

/// Which environment variables `env:` credential references may read
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct CredentialsConfig {
    /// Exact names or `*`-prefixed/suffixed patterns
    #[serde(default = "default_allowed_env")]
    pub allowed_env: Vec<String>,
}

impl Default for CredentialsConfig {
    fn default() -> Self {
        Self {
            allowed_env: default_allowed_env(),
        }
    }
}

impl CredentialsConfig {
    pub fn allow_list(&self) -> EnvAllowList {
        EnvAllowList::new(self.allowed_env.clone())
    }
}

fn default_allowed_env() -> Vec<String> {
    vec![DEFAULT_ENV_PATTERN.to_string()]
}
