//! Router configuration types

use std::time::Duration;

/// Router configuration
///
/// ## Defaults
///
/// - `default_time_budget`: 60s (used when a request carries no budget)
/// - `max_time_budget`: 300s (larger budgets are clamped)
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct RouterConfig {
    /// Budget for requests that do not specify one
    pub default_time_budget: Duration,

    /// Upper bound for caller-supplied budgets
    pub max_time_budget: Duration,
}

impl Default for RouterConfig {
    fn default() -> Self {
        Self {
            default_time_budget: Duration::from_secs(60),
            max_time_budget: Duration::from_secs(300),
        }
    }
}

impl RouterConfig {
    /// Builder method to set the default time budget
    pub fn with_default_time_budget(mut self, budget: Duration) -> Self {
        self.default_time_budget = budget;
        self
    }

    /// Builder method to set the maximum time budget
    pub fn with_max_time_budget(mut self, budget: Duration) -> Self {
        self.max_time_budget = budget;
        self
    }

    /// Effective budget for a request
    pub fn effective_budget(&self, requested: Option<Duration>) -> Duration {
        requested
            .unwrap_or(self.default_time_budget)
            .min(self.max_time_budget)
    }
}
