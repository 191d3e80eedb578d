//! Credential resolution
//!
//! A [`CredentialRef`] is either `env:NAME` or a literal secret. Resolution
//! happens per call so rotated environment values are picked up without a
//! restart. Only variables matched by the [`EnvAllowList`] can be read.

use crate::core::types::CredentialRef;
use std::fmt;
use std::sync::Arc;

/// Turns a credential reference into the secret sent to a backend
#[cfg_attr(test, mockall::automock)]
pub trait CredentialResolver: Send + Sync {
    fn resolve(&self, credential: &CredentialRef) -> Result<String, String>;
}

/// Pattern matched by default: conventional provider key variables
pub const DEFAULT_ENV_PATTERN: &str = "*_API_KEY";

/// Environment variable names a credential reference may point at
///
/// Each pattern is an exact name, or has a single leading or trailing `*`
/// (`*_API_KEY`, `LLM_*`). A lone `*` matches everything.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct EnvAllowList {
    patterns: Vec<String>,
}

impl Default for EnvAllowList {
    fn default() -> Self {
        Self::new(vec![DEFAULT_ENV_PATTERN.to_string()])
    }
}

impl EnvAllowList {
    pub fn new(patterns: Vec<String>) -> Self {
        Self { patterns }
    }

    pub fn allows(&self, name: &str) -> bool {
        !name.is_empty() && self.patterns.iter().any(|p| pattern_matches(p, name))
    }

    /// Reject references to variables outside the list
    pub fn check(&self, credential: &CredentialRef) -> Result<(), String> {
        match credential.env_var() {
            Some(name) if !self.allows(name) => Err(format!(
                "Environment variable {} is not an allowed credential source",
                name
            )),
            _ => Ok(()),
        }
    }
}

fn pattern_matches(pattern: &str, name: &str) -> bool {
    if pattern == "*" {
        return true;
    }
    if let Some(suffix) = pattern.strip_prefix('*') {
        return name.ends_with(suffix);
    }
    if let Some(prefix) = pattern.strip_suffix('*') {
        return name.starts_with(prefix);
    }
    pattern == name
}

type EnvLookup = Arc<dyn Fn(&str) -> Option<String> + Send + Sync>;

/// Resolves `env:` references from the process environment
#[derive(Clone)]
pub struct EnvCredentialResolver {
    lookup: EnvLookup,
    allowed: EnvAllowList,
}

impl EnvCredentialResolver {
    pub fn new() -> Self {
        Self::with_lookup(|name| std::env::var(name).ok())
    }

    /// Resolver reading variables from a custom source
    pub fn with_lookup<F>(lookup: F) -> Self
    where
        F: Fn(&str) -> Option<String> + Send + Sync + 'static,
    {
        Self {
            lookup: Arc::new(lookup),
            allowed: EnvAllowList::default(),
        }
    }

    /// Restrict which variables may be read (builder pattern)
    pub fn with_allow_list(mut self, allowed: EnvAllowList) -> Self {
        self.allowed = allowed;
        self
    }
}

impl Default for EnvCredentialResolver {
    fn default() -> Self {
        Self::new()
    }
}

impl fmt::Debug for EnvCredentialResolver {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("EnvCredentialResolver")
            .field("allowed", &self.allowed)
            .finish_non_exhaustive()
    }
}

impl CredentialResolver for EnvCredentialResolver {
    fn resolve(&self, credential: &CredentialRef) -> Result<String, String> {
        if credential.is_empty() {
            return Err("No credential configured".to_string());
        }

        match credential.env_var() {
            Some("") => Err("Credential reference names no environment variable".to_string()),
            Some(name) if !self.allowed.allows(name) => Err(format!(
                "Environment variable {} is not an allowed credential source",
                name
            )),
            Some(name) => match (self.lookup)(name) {
                Some(value) if !value.trim().is_empty() => Ok(value),
                _ => Err(format!("Environment variable {} is not set", name)),
            },
            None => Ok(credential.expose_secret().trim().to_string()),
        }
    }
}
