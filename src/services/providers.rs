//! Administrative provider service
//!
//! Backs the admin surface: provider CRUD, on-demand probes, recent health
//! samples and runtime settings. Every write is persisted to the configured
//! [`StateStore`].

use crate::core::health::{CycleHook, HealthMonitor, HealthSample, HealthStatus};
use crate::core::providers::EnvAllowList;
use crate::core::registry::{Provider, ProviderInput, ProviderRegistry, ProviderView, RegistryError};
use crate::core::settings::{RoutingSettings, SettingsHandle, SettingsUpdate};
use crate::storage::{StateStore, StoredState};
use crate::utils::error::{GatewayError, Result};
use async_trait::async_trait;
use chrono::Utc;
use std::collections::BTreeMap;
use std::sync::Arc;
use tokio::sync::Mutex;
use tracing::{debug, error, info, warn};

/// Samples returned by a recent-samples read without an explicit limit
pub const DEFAULT_RECENT_SAMPLES: usize = 50;

/// Administrative operations over the registry, health data and settings
pub struct ProviderService {
    registry: Arc<ProviderRegistry>,
    monitor: Arc<HealthMonitor>,
    store: Arc<dyn StateStore>,
    settings: SettingsHandle,
    recent_limit: usize,
    /// Environment variables admin writes may reference
    env_allow_list: EnvAllowList,
    /// Serializes admin writes with their persistence
    write_lock: Mutex<()>,
}

impl ProviderService {
    pub fn new(
        registry: Arc<ProviderRegistry>,
        monitor: Arc<HealthMonitor>,
        store: Arc<dyn StateStore>,
        settings: SettingsHandle,
    ) -> Self {
        Self {
            registry,
            monitor,
            store,
            settings,
            recent_limit: DEFAULT_RECENT_SAMPLES,
            env_allow_list: EnvAllowList::default(),
            write_lock: Mutex::new(()),
        }
    }

    /// Set the default recent-samples limit (builder pattern)
    pub fn with_recent_limit(mut self, limit: usize) -> Self {
        self.recent_limit = limit.max(1);
        self
    }

    /// Restrict `env:` credential references (builder pattern)
    pub fn with_env_allow_list(mut self, allowed: EnvAllowList) -> Self {
        self.env_allow_list = allowed;
        self
    }

    /// Load persisted state, falling back to seed providers
    ///
    /// Stored providers win over seeds; seeds are only used when the store
    /// holds none. Stored settings replace the configured ones. A stored
    /// provider that no longer validates is loaded disabled, or dropped when
    /// even that fails, so one bad record does not block startup.
    pub async fn restore(&self, seeds: Vec<ProviderInput>) -> Result<()> {
        let _guard = self.write_lock.lock().await;
        let stored = match self.store.load().await? {
            Some(stored) => {
                self.monitor.store().load(stored.health_checks);
                match stored.settings.validate() {
                    Ok(()) => self.settings.replace(stored.settings),
                    Err(e) => warn!("Ignoring stored settings: {}", e),
                }
                stored.providers
            }
            None => Vec::new(),
        };

        let seeded = stored.is_empty();
        let providers = if seeded {
            let now = Utc::now();
            seeds
                .into_iter()
                .enumerate()
                .map(|(i, seed)| {
                    // Offset the clock so generated ids stay unique
                    seed.into_provider(now + chrono::Duration::milliseconds(i as i64))
                        .map_err(GatewayError::Validation)
                })
                .collect::<Result<Vec<Provider>>>()?
        } else {
            stored
                .into_iter()
                .filter_map(|provider| self.admit_stored(provider))
                .collect()
        };

        let count = providers.len();
        self.registry.replace_all(providers)?;
        info!(
            "Restored {} providers ({}) from {}",
            count,
            if seeded { "seeded" } else { "stored" },
            self.store.describe()
        );

        if seeded && count > 0 {
            self.save().await?;
        }
        Ok(())
    }

    fn admit_stored(&self, provider: Provider) -> Option<Provider> {
        let problem = provider
            .validate()
            .and_then(|()| self.env_allow_list.check(&provider.credential_ref));
        let Err(problem) = problem else {
            return Some(provider);
        };

        let disabled = provider.with_enabled(false);
        match disabled.validate() {
            Ok(()) => {
                warn!(
                    provider_id = %disabled.id,
                    "Loading stored provider disabled: {}",
                    problem
                );
                Some(disabled)
            }
            Err(e) => {
                warn!(provider_id = %disabled.id, "Skipping stored provider: {}", e);
                None
            }
        }
    }

    fn check_credential_source(&self, provider: &Provider) -> Result<()> {
        self.env_allow_list
            .check(&provider.credential_ref)
            .map_err(GatewayError::Validation)
    }

    /// Every provider with the credential sanitized, ordered by priority
    pub fn list(&self) -> Vec<ProviderView> {
        self.registry.all().iter().map(Provider::sanitized).collect()
    }

    /// One provider with the credential sanitized
    pub fn get(&self, id: &str) -> Result<ProviderView> {
        Ok(self.registry.get(id)?.sanitized())
    }

    /// Create a provider
    pub async fn create(&self, input: ProviderInput) -> Result<ProviderView> {
        let _guard = self.write_lock.lock().await;
        let provider = input
            .into_provider(Utc::now())
            .map_err(|e| GatewayError::from(RegistryError::Invalid(e)))?;
        self.check_credential_source(&provider)?;

        if self.registry.get(&provider.id).is_ok() {
            return Err(GatewayError::Validation(format!(
                "Provider {} already exists",
                provider.id
            )));
        }

        self.registry.upsert(provider.clone())?;
        self.save().await?;
        Ok(provider.sanitized())
    }

    /// Merge the given fields over an existing provider
    pub async fn update(&self, id: &str, input: ProviderInput) -> Result<ProviderView> {
        let _guard = self.write_lock.lock().await;
        let existing = self.registry.get(id)?;

        if let Some(new_id) = input.id.as_deref() {
            if new_id != id {
                return Err(GatewayError::Validation(
                    "Provider id cannot be changed".to_string(),
                ));
            }
        }

        let updated = input
            .apply_to(&existing, Utc::now())
            .map_err(|e| GatewayError::from(RegistryError::Invalid(e)))?;
        self.check_credential_source(&updated)?;
        self.registry.upsert(updated.clone())?;
        self.save().await?;
        Ok(updated.sanitized())
    }

    /// Remove a provider; its health history stays readable
    pub async fn delete(&self, id: &str) -> Result<ProviderView> {
        let _guard = self.write_lock.lock().await;
        let removed = self.registry.remove(id)?;
        self.save().await?;
        Ok(removed.sanitized())
    }

    /// Probe one provider now and return the recorded sample
    pub async fn probe(&self, id: &str) -> Result<HealthSample> {
        let sample = self.monitor.probe_by_id(id).await?;
        if let Err(e) = self.persist().await {
            warn!("Failed to persist probe result for {}: {}", id, e);
        }
        Ok(sample)
    }

    /// Latest samples across providers, newest first
    pub fn recent_samples(&self, limit: Option<usize>) -> Vec<HealthSample> {
        self.monitor
            .store()
            .recent(limit.unwrap_or(self.recent_limit))
    }

    /// Current classification of every registered provider
    pub fn current_health(&self) -> BTreeMap<String, HealthStatus> {
        let snapshot = self.monitor.snapshot();
        self.registry
            .snapshot()
            .iter()
            .map(|p| (p.id.clone(), snapshot.status(&p.id)))
            .collect()
    }

    pub fn settings(&self) -> RoutingSettings {
        RoutingSettings::clone(&self.settings.current())
    }

    /// Apply a partial settings update
    pub async fn update_settings(&self, update: SettingsUpdate) -> Result<RoutingSettings> {
        let _guard = self.write_lock.lock().await;
        let next = update.apply_to(&self.settings.current());
        next.validate().map_err(GatewayError::Validation)?;

        self.settings.replace(next.clone());
        info!(
            "Routing settings updated: interval {} min, auto failover {}, static fallback {}",
            next.health_check_interval_minutes,
            next.auto_failover_enabled,
            next.fallback_to_static_responses
        );
        self.save().await?;
        Ok(next)
    }

    /// Write the current state to the store
    pub async fn persist(&self) -> Result<()> {
        let _guard = self.write_lock.lock().await;
        self.save().await
    }

    /// Callers must hold `write_lock`
    async fn save(&self) -> Result<()> {
        let state = StoredState {
            providers: self.registry.all(),
            health_checks: self.monitor.store().all(),
            settings: self.settings(),
        };
        self.store.save(&state).await?;
        debug!("Persisted state to {}", self.store.describe());
        Ok(())
    }
}

#[async_trait]
impl CycleHook for ProviderService {
    async fn after_cycle(&self, samples: &[HealthSample]) {
        if samples.is_empty() {
            return;
        }
        if let Err(e) = self.persist().await {
            error!("Failed to persist health samples: {}", e);
        }
    }
}

impl std::fmt::Debug for ProviderService {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("ProviderService")
            .field("store", &self.store.describe())
            .field("recent_limit", &self.recent_limit)
            .finish_non_exhaustive()
    }
}
