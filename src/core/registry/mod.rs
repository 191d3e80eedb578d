//! Provider registry
//!
//! The registry owns every [`Provider`] record. Readers take an immutable
//! [`RegistrySnapshot`]; writers build a new snapshot and swap it in, so a
//! routing decision never observes a half-applied administrative edit.

pub mod provider;

pub use provider::{Provider, ProviderInput, ProviderView};

use crate::core::types::{ProviderId, UseCase};
use arc_swap::ArcSwap;
use parking_lot::Mutex;
use std::collections::BTreeMap;
use std::sync::Arc;
use thiserror::Error;
use tracing::{debug, info};

/// Registry errors
#[derive(Debug, Clone, Error, PartialEq)]
pub enum RegistryError {
    #[error("Provider not found: {0}")]
    NotFound(ProviderId),

    #[error("Invalid provider: {0}")]
    Invalid(String),
}

/// Immutable view of the registry at one point in time
#[derive(Debug, Clone, Default)]
pub struct RegistrySnapshot {
    providers: BTreeMap<ProviderId, Provider>,
    version: u64,
}

impl RegistrySnapshot {
    pub fn new(providers: impl IntoIterator<Item = Provider>) -> Self {
        Self {
            providers: providers.into_iter().map(|p| (p.id.clone(), p)).collect(),
            version: 0,
        }
    }

    pub fn get(&self, id: &str) -> Option<&Provider> {
        self.providers.get(id)
    }

    /// All providers, enabled or not, ordered by id
    pub fn iter(&self) -> impl Iterator<Item = &Provider> {
        self.providers.values()
    }

    pub fn len(&self) -> usize {
        self.providers.len()
    }

    pub fn is_empty(&self) -> bool {
        self.providers.is_empty()
    }

    /// Monotonic write counter
    pub fn version(&self) -> u64 {
        self.version
    }

    /// Enabled providers serving `use_case`, ordered by `(priority, id)`
    ///
    /// When no enabled provider carries the tag, the enabled `general`
    /// providers are returned instead.
    pub fn list(&self, use_case: UseCase) -> Vec<Provider> {
        let mut matching = self.enabled_for(use_case);
        if matching.is_empty() && use_case != UseCase::General {
            matching = self.enabled_for(UseCase::General);
        }
        matching.sort_by(|a, b| a.ordering_key().cmp(&b.ordering_key()));
        matching
    }

    fn enabled_for(&self, use_case: UseCase) -> Vec<Provider> {
        self.providers
            .values()
            .filter(|p| p.enabled && p.use_case == use_case)
            .cloned()
            .collect()
    }
}

/// Thread-safe provider registry
#[derive(Debug, Default)]
pub struct ProviderRegistry {
    current: ArcSwap<RegistrySnapshot>,
    /// Serializes writers; readers never take it
    write_lock: Mutex<()>,
}

impl ProviderRegistry {
    pub fn new() -> Self {
        Self::default()
    }

    /// Registry seeded with the given providers (not validated)
    pub fn with_providers(providers: impl IntoIterator<Item = Provider>) -> Self {
        Self {
            current: ArcSwap::from_pointee(RegistrySnapshot::new(providers)),
            write_lock: Mutex::new(()),
        }
    }

    /// Consistent point-in-time view
    pub fn snapshot(&self) -> Arc<RegistrySnapshot> {
        self.current.load_full()
    }

    /// Enabled providers for a use case (see [`RegistrySnapshot::list`])
    pub fn list(&self, use_case: UseCase) -> Vec<Provider> {
        self.current.load().list(use_case)
    }

    /// Every provider, ordered by `(priority, id)`
    pub fn all(&self) -> Vec<Provider> {
        let mut providers: Vec<Provider> = self.current.load().iter().cloned().collect();
        providers.sort_by(|a, b| a.ordering_key().cmp(&b.ordering_key()));
        providers
    }

    pub fn get(&self, id: &str) -> Result<Provider, RegistryError> {
        self.current
            .load()
            .get(id)
            .cloned()
            .ok_or_else(|| RegistryError::NotFound(id.to_string()))
    }

    pub fn len(&self) -> usize {
        self.current.load().len()
    }

    pub fn is_empty(&self) -> bool {
        self.current.load().is_empty()
    }

    /// Insert or replace a provider
    pub fn upsert(&self, provider: Provider) -> Result<(), RegistryError> {
        provider.validate().map_err(RegistryError::Invalid)?;

        let _guard = self.write_lock.lock();
        let current = self.current.load();
        let mut next = RegistrySnapshot::clone(&current);
        let replaced = next.providers.insert(provider.id.clone(), provider.clone()).is_some();
        next.version = current.version + 1;
        self.current.store(Arc::new(next));

        if replaced {
            debug!("Updated provider {} in registry", provider.id);
        } else {
            info!(
                "Registered provider {} ({}, use case {})",
                provider.id, provider.provider_type, provider.use_case
            );
        }
        Ok(())
    }

    /// Remove a provider, returning the removed record
    pub fn remove(&self, id: &str) -> Result<Provider, RegistryError> {
        let _guard = self.write_lock.lock();
        let current = self.current.load();
        let mut next = RegistrySnapshot::clone(&current);
        let removed = next
            .providers
            .remove(id)
            .ok_or_else(|| RegistryError::NotFound(id.to_string()))?;
        next.version = current.version + 1;
        self.current.store(Arc::new(next));

        info!("Removed provider {} from registry", id);
        Ok(removed)
    }

    /// Replace the whole provider set in one swap
    pub fn replace_all(&self, providers: Vec<Provider>) -> Result<(), RegistryError> {
        for provider in &providers {
            provider.validate().map_err(RegistryError::Invalid)?;
        }

        let _guard = self.write_lock.lock();
        let version = self.current.load().version + 1;
        let mut next = RegistrySnapshot::new(providers);
        next.version = version;
        self.current.store(Arc::new(next));
        Ok(())
    }
}
