//! Router configuration

use super::*;
use crate::core::router::RouterConfig;
use serde::{Deserialize, Serialize};
use std::time::Duration;

/// Time budget settings for routing calls
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct RoutingConfig {
    /// Budget for requests that do not specify one
    #[serde(default = "default_time_budget_ms")]
    pub default_time_budget_ms: u64,
    /// Larger requested budgets are clamped to this
    #[serde(default = "default_max_time_budget_ms")]
    pub max_time_budget_ms: u64,
    /// TCP connect timeout for provider calls
    #[serde(default = "default_connect_timeout_seconds")]
    pub connect_timeout_seconds: u64,
}

impl Default for RoutingConfig {
    fn default() -> Self {
        Self {
            default_time_budget_ms: default_time_budget_ms(),
            max_time_budget_ms: default_max_time_budget_ms(),
            connect_timeout_seconds: default_connect_timeout_seconds(),
        }
    }
}

impl RoutingConfig {
    pub fn router_config(&self) -> RouterConfig {
        RouterConfig::default()
            .with_default_time_budget(Duration::from_millis(self.default_time_budget_ms))
            .with_max_time_budget(Duration::from_millis(self.max_time_budget_ms))
    }

    pub fn connect_timeout(&self) -> Duration {
        Duration::from_secs(self.connect_timeout_seconds)
    }
}
