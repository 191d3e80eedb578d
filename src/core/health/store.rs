//! Append-only health sample store

use super::types::{HealthPolicy, HealthSample, HealthStatus};
use crate::core::types::ProviderId;
use chrono::{DateTime, Utc};
use parking_lot::RwLock;
use std::collections::{HashMap, VecDeque};

/// Samples kept per provider when not configured
pub const DEFAULT_RETAINED_SAMPLES: usize = 100;

/// Per-provider sample history
///
/// Samples are only ever appended; the oldest are dropped once a provider has
/// more than `retention` of them.
#[derive(Debug)]
pub struct HealthStore {
    samples: RwLock<HashMap<ProviderId, VecDeque<HealthSample>>>,
    retention: usize,
}

impl Default for HealthStore {
    fn default() -> Self {
        Self::new(DEFAULT_RETAINED_SAMPLES)
    }
}

impl HealthStore {
    pub fn new(retention: usize) -> Self {
        Self {
            samples: RwLock::new(HashMap::new()),
            retention: retention.max(1),
        }
    }

    pub fn record(&self, sample: HealthSample) {
        let mut samples = self.samples.write();
        let history = samples.entry(sample.provider_id.clone()).or_default();
        history.push_back(sample);
        while history.len() > self.retention {
            history.pop_front();
        }
    }

    /// Drop the history of providers that are no longer registered once
    /// their latest sample is stale; returns how many were dropped
    pub fn prune<F>(&self, is_registered: F, policy: &HealthPolicy, now: DateTime<Utc>) -> usize
    where
        F: Fn(&str) -> bool,
    {
        let mut samples = self.samples.write();
        let before = samples.len();
        samples.retain(|id, history| {
            is_registered(id)
                || history
                    .back()
                    .is_some_and(|latest| policy.is_fresh(latest, now))
        });
        before - samples.len()
    }

    /// Restore persisted samples, oldest first per provider
    pub fn load(&self, mut samples: Vec<HealthSample>) {
        samples.sort_by(|a, b| a.checked_at.cmp(&b.checked_at));
        for sample in samples {
            self.record(sample);
        }
    }

    pub fn latest(&self, provider_id: &str) -> Option<HealthSample> {
        self.samples
            .read()
            .get(provider_id)
            .and_then(|history| history.back().cloned())
    }

    /// History of one provider, oldest first
    pub fn samples_for(&self, provider_id: &str) -> Vec<HealthSample> {
        self.samples
            .read()
            .get(provider_id)
            .map(|history| history.iter().cloned().collect())
            .unwrap_or_default()
    }

    /// Latest `limit` samples across all providers, newest first
    pub fn recent(&self, limit: usize) -> Vec<HealthSample> {
        let mut all = self.all();
        all.sort_by(|a, b| b.checked_at.cmp(&a.checked_at));
        all.truncate(limit);
        all
    }

    /// Every retained sample
    pub fn all(&self) -> Vec<HealthSample> {
        self.samples
            .read()
            .values()
            .flat_map(|history| history.iter().cloned())
            .collect()
    }

    pub fn current_health(
        &self,
        provider_id: &str,
        policy: &HealthPolicy,
        now: DateTime<Utc>,
    ) -> HealthStatus {
        let samples = self.samples.read();
        policy.classify(samples.get(provider_id).and_then(VecDeque::back), now)
    }

    /// Classified health of every provider with samples
    pub fn snapshot(&self, policy: &HealthPolicy, now: DateTime<Utc>) -> HealthSnapshot {
        let samples = self.samples.read();
        let statuses = samples
            .iter()
            .map(|(id, history)| (id.clone(), policy.classify(history.back(), now)))
            .collect();
        HealthSnapshot { statuses }
    }
}

/// Point-in-time health of every provider, read by candidate selection
#[derive(Debug, Clone, Default, PartialEq)]
pub struct HealthSnapshot {
    statuses: HashMap<ProviderId, HealthStatus>,
}

impl HealthSnapshot {
    pub fn new() -> Self {
        Self::default()
    }

    /// Set a provider's status (builder pattern)
    pub fn with_status(mut self, provider_id: impl Into<ProviderId>, status: HealthStatus) -> Self {
        self.statuses.insert(provider_id.into(), status);
        self
    }

    /// Status of a provider, `Unknown` when never sampled
    pub fn status(&self, provider_id: &str) -> HealthStatus {
        self.statuses.get(provider_id).copied().unwrap_or_default()
    }

    pub fn iter(&self) -> impl Iterator<Item = (&ProviderId, &HealthStatus)> {
        self.statuses.iter()
    }
}
