//! Health monitor implementation
//!
//! Probes every registered provider on a timer, independent of request
//! handling. Each probe runs in its own task under its own timeout, so a
//! hanging backend cannot delay the others.

use super::store::{HealthSnapshot, HealthStore};
use super::types::{HealthPolicy, HealthSample, HealthStatus};
use crate::core::providers::{CallExecutor, CompletionRequest};
use crate::core::registry::{Provider, ProviderRegistry, RegistryError};
use crate::core::settings::SettingsHandle;
use async_trait::async_trait;
use chrono::Utc;
use std::collections::HashSet;
use std::sync::Arc;
use std::time::{Duration, Instant};
use tokio::task::JoinHandle;
use tracing::{debug, error, info, warn};

/// Health monitor configuration
#[derive(Debug, Clone)]
pub struct HealthMonitorConfig {
    /// Timeout for individual probes
    pub probe_timeout: Duration,
    /// Classification policy
    pub policy: HealthPolicy,
    /// Whether the first cycle runs immediately or after one interval
    pub run_on_start: bool,
}

impl Default for HealthMonitorConfig {
    fn default() -> Self {
        Self {
            probe_timeout: Duration::from_secs(30),
            policy: HealthPolicy::default(),
            run_on_start: true,
        }
    }
}

/// Notified after every completed probe cycle
#[async_trait]
pub trait CycleHook: Send + Sync {
    async fn after_cycle(&self, samples: &[HealthSample]);
}

/// Health monitor for registered providers
pub struct HealthMonitor {
    registry: Arc<ProviderRegistry>,
    store: Arc<HealthStore>,
    executor: Arc<CallExecutor>,
    settings: SettingsHandle,
    config: HealthMonitorConfig,
}

impl HealthMonitor {
    pub fn new(
        registry: Arc<ProviderRegistry>,
        store: Arc<HealthStore>,
        executor: Arc<CallExecutor>,
        settings: SettingsHandle,
        config: HealthMonitorConfig,
    ) -> Self {
        Self {
            registry,
            store,
            executor,
            settings,
            config,
        }
    }

    pub fn store(&self) -> &Arc<HealthStore> {
        &self.store
    }

    pub fn policy(&self) -> &HealthPolicy {
        &self.config.policy
    }

    /// Classified health of one provider
    pub fn current_health(&self, provider_id: &str) -> HealthStatus {
        self.store
            .current_health(provider_id, &self.config.policy, Utc::now())
    }

    /// Classified health of every sampled provider
    pub fn snapshot(&self) -> HealthSnapshot {
        self.store.snapshot(&self.config.policy, Utc::now())
    }

    /// Probe one provider and record the sample
    ///
    /// Never changes the provider's policy fields.
    pub async fn probe(&self, provider: &Provider) -> HealthSample {
        let started = Instant::now();
        let result = self
            .executor
            .execute(provider, &CompletionRequest::probe(), self.config.probe_timeout)
            .await;
        let elapsed = started.elapsed();

        let sample = match result {
            Ok(_) => HealthSample::success(
                &provider.id,
                elapsed,
                self.config.policy.degraded_latency,
                Utc::now(),
            ),
            Err(err) => {
                warn!(provider_id = %provider.id, error = %err, "Health probe failed");
                HealthSample::failure(&provider.id, Some(elapsed), err.to_string(), Utc::now())
            }
        };

        debug!(
            provider_id = %provider.id,
            status = ?sample.status,
            latency_ms = sample.latency_ms,
            "Recorded health sample"
        );
        self.store.record(sample.clone());
        sample
    }

    /// Probe a provider by id
    pub async fn probe_by_id(&self, provider_id: &str) -> Result<HealthSample, RegistryError> {
        let provider = self.registry.get(provider_id)?;
        Ok(self.probe(&provider).await)
    }

    /// Probe every registered provider concurrently
    ///
    /// Disabled providers are probed too so administrators can check them
    /// before enabling.
    pub async fn probe_all(self: &Arc<Self>) -> Vec<HealthSample> {
        let snapshot = self.registry.snapshot();

        let tasks: Vec<_> = snapshot
            .iter()
            .cloned()
            .map(|provider| {
                let monitor = Arc::clone(self);
                tokio::spawn(async move { monitor.probe(&provider).await })
            })
            .collect();

        let mut samples = Vec::with_capacity(tasks.len());
        for result in futures::future::join_all(tasks).await {
            match result {
                Ok(sample) => samples.push(sample),
                Err(e) => error!("Health probe task failed: {}", e),
            }
        }
        samples
    }

    /// Start the periodic probe loop
    ///
    /// The interval is re-read from the runtime settings before every sleep.
    /// Forget samples of removed providers that no longer affect health
    pub fn prune_history(&self) -> usize {
        let registry = self.registry.snapshot();
        let registered: HashSet<&str> = registry.iter().map(|p| p.id.as_str()).collect();
        let pruned = self.store.prune(
            |id| registered.contains(id),
            &self.config.policy,
            Utc::now(),
        );
        if pruned > 0 {
            debug!("Pruned health history of {} removed providers", pruned);
        }
        pruned
    }

    pub fn spawn(self: Arc<Self>, hook: Option<Arc<dyn CycleHook>>) -> JoinHandle<()> {
        tokio::spawn(async move {
            let mut first = true;
            loop {
                if !first || self.config.run_on_start {
                    let samples = self.probe_all().await;
                    let down = samples.iter().filter(|s| s.is_failure()).count();
                    info!(
                        "Health cycle complete: {} providers probed, {} down",
                        samples.len(),
                        down
                    );

                    self.prune_history();

                    if let Some(hook) = &hook {
                        hook.after_cycle(&samples).await;
                    }
                }
                first = false;

                let interval = self.settings.current().health_check_interval();
                tokio::time::sleep(interval).await;
            }
        })
    }
}

impl std::fmt::Debug for HealthMonitor {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("HealthMonitor")
            .field("config", &self.config)
            .finish_non_exhaustive()
    }
}
