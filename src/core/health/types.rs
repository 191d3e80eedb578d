//! Health status types and samples

use crate::core::types::ProviderId;
use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use std::fmt;
use std::time::Duration;

/// Outcome recorded by one probe
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum SampleStatus {
    Healthy,
    Degraded,
    Down,
}

/// Classified health of a provider
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum HealthStatus {
    Healthy,
    Degraded,
    Down,
    /// No fresh sample; treated as usable
    #[default]
    Unknown,
}

impl HealthStatus {
    /// Whether selection should keep this provider ahead of `down` ones
    pub fn is_preferred(&self) -> bool {
        !matches!(self, HealthStatus::Down)
    }

    pub fn as_str(&self) -> &'static str {
        match self {
            HealthStatus::Healthy => "healthy",
            HealthStatus::Degraded => "degraded",
            HealthStatus::Down => "down",
            HealthStatus::Unknown => "unknown",
        }
    }
}

impl fmt::Display for HealthStatus {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl From<SampleStatus> for HealthStatus {
    fn from(status: SampleStatus) -> Self {
        match status {
            SampleStatus::Healthy => HealthStatus::Healthy,
            SampleStatus::Degraded => HealthStatus::Degraded,
            SampleStatus::Down => HealthStatus::Down,
        }
    }
}

/// One observation of a provider's reachability
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct HealthSample {
    pub id: String,
    pub provider_id: ProviderId,
    pub status: SampleStatus,
    /// Observed latency; absent when the probe never got an answer
    #[serde(rename = "response_time_ms", default)]
    pub latency_ms: Option<u64>,
    #[serde(default)]
    pub error_message: Option<String>,
    pub checked_at: DateTime<Utc>,
}

impl HealthSample {
    fn new(provider_id: &str, status: SampleStatus, checked_at: DateTime<Utc>) -> Self {
        Self {
            id: uuid::Uuid::new_v4().to_string(),
            provider_id: provider_id.to_string(),
            status,
            latency_ms: None,
            error_message: None,
            checked_at,
        }
    }

    /// Successful probe, degraded when slower than `degraded_latency`
    pub fn success(
        provider_id: &str,
        latency: Duration,
        degraded_latency: Duration,
        checked_at: DateTime<Utc>,
    ) -> Self {
        let status = if latency > degraded_latency {
            SampleStatus::Degraded
        } else {
            SampleStatus::Healthy
        };
        let mut sample = Self::new(provider_id, status, checked_at);
        sample.latency_ms = Some(latency.as_millis() as u64);
        sample
    }

    /// Failed probe
    pub fn failure(
        provider_id: &str,
        latency: Option<Duration>,
        error: impl Into<String>,
        checked_at: DateTime<Utc>,
    ) -> Self {
        let mut sample = Self::new(provider_id, SampleStatus::Down, checked_at);
        sample.latency_ms = latency.map(|l| l.as_millis() as u64);
        sample.error_message = Some(error.into());
        sample
    }

    pub fn is_failure(&self) -> bool {
        self.status == SampleStatus::Down
    }
}

/// Classification policy for "current health"
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct HealthPolicy {
    /// Samples older than this are ignored
    pub freshness_window: Duration,
    /// Successful samples slower than this count as degraded
    pub degraded_latency: Duration,
}

impl Default for HealthPolicy {
    fn default() -> Self {
        Self {
            freshness_window: Duration::from_secs(15 * 60),
            degraded_latency: Duration::from_millis(5000),
        }
    }
}

impl HealthPolicy {
    /// Classify from the newest sample, if it is still fresh
    pub fn classify(&self, latest: Option<&HealthSample>, now: DateTime<Utc>) -> HealthStatus {
        let Some(sample) = latest else {
            return HealthStatus::Unknown;
        };
        if !self.is_fresh(sample, now) {
            return HealthStatus::Unknown;
        }

        match sample.status {
            SampleStatus::Down => HealthStatus::Down,
            SampleStatus::Degraded => HealthStatus::Degraded,
            SampleStatus::Healthy => match sample.latency_ms {
                Some(ms) if ms > self.degraded_latency.as_millis() as u64 => HealthStatus::Degraded,
                _ => HealthStatus::Healthy,
            },
        }
    }

    /// Whether a sample is recent enough to classify health
    pub fn is_fresh(&self, sample: &HealthSample, now: DateTime<Utc>) -> bool {
        match chrono::Duration::from_std(self.freshness_window) {
            Ok(window) => now.signed_duration_since(sample.checked_at) <= window,
            // Window too large to represent: everything is fresh
            Err(_) => true,
        }
    }
}
