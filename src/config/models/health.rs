//! Health monitoring configuration

use super::*;
use crate::core::health::{HealthMonitorConfig, HealthPolicy};
use serde::{Deserialize, Serialize};
use std::time::Duration;

/// Health probe and classification settings
///
/// The probe interval itself is a runtime setting (`settings.health_check_interval_minutes`).
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct HealthConfig {
    /// Timeout for a single probe
    #[serde(default = "default_probe_timeout_seconds")]
    pub probe_timeout_seconds: u64,
    /// Samples older than this no longer count
    #[serde(default = "default_freshness_window_seconds")]
    pub freshness_window_seconds: u64,
    /// Successful probes slower than this are degraded
    #[serde(default = "default_degraded_latency_ms")]
    pub degraded_latency_ms: u64,
    /// Samples kept per provider
    #[serde(default = "default_retained_samples")]
    pub retained_samples: usize,
    /// Default size of the admin "recent samples" listing
    #[serde(default = "default_recent_samples")]
    pub recent_samples: usize,
    /// Run the first cycle at startup
    #[serde(default = "default_true")]
    pub run_on_start: bool,
}

impl Default for HealthConfig {
    fn default() -> Self {
        Self {
            probe_timeout_seconds: default_probe_timeout_seconds(),
            freshness_window_seconds: default_freshness_window_seconds(),
            degraded_latency_ms: default_degraded_latency_ms(),
            retained_samples: default_retained_samples(),
            recent_samples: default_recent_samples(),
            run_on_start: true,
        }
    }
}

impl HealthConfig {
    pub fn policy(&self) -> HealthPolicy {
        HealthPolicy {
            freshness_window: Duration::from_secs(self.freshness_window_seconds),
            degraded_latency: Duration::from_millis(self.degraded_latency_ms),
        }
    }

    pub fn monitor_config(&self) -> HealthMonitorConfig {
        HealthMonitorConfig {
            probe_timeout: Duration::from_secs(self.probe_timeout_seconds),
            policy: self.policy(),
            run_on_start: self.run_on_start,
        }
    }
}
