//! Runtime routing settings
//!
//! Administrators may change these while the gateway runs; readers always see a
//! complete value through [`SettingsHandle`].

use arc_swap::ArcSwap;
use serde::{Deserialize, Serialize};
use std::sync::Arc;
use std::time::Duration;

fn default_health_check_interval_minutes() -> u64 {
    5
}

fn default_true() -> bool {
    true
}

/// Failover and health-check behaviour
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct RoutingSettings {
    /// Minutes between health cycles
    #[serde(default = "default_health_check_interval_minutes")]
    pub health_check_interval_minutes: u64,
    /// When false only the first candidate is attempted
    #[serde(default = "default_true")]
    pub auto_failover_enabled: bool,
    /// Serve a canned reply when every candidate fails
    #[serde(default = "default_true")]
    pub fallback_to_static_responses: bool,
}

impl Default for RoutingSettings {
    fn default() -> Self {
        Self {
            health_check_interval_minutes: default_health_check_interval_minutes(),
            auto_failover_enabled: true,
            fallback_to_static_responses: true,
        }
    }
}

impl RoutingSettings {
    pub fn health_check_interval(&self) -> Duration {
        Duration::from_secs(self.health_check_interval_minutes.max(1) * 60)
    }

    pub fn validate(&self) -> Result<(), String> {
        if self.health_check_interval_minutes == 0 {
            return Err("health_check_interval_minutes must be greater than 0".to_string());
        }
        if self.health_check_interval_minutes > 24 * 60 {
            return Err("health_check_interval_minutes cannot exceed one day".to_string());
        }
        Ok(())
    }
}

/// Partial settings update
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct SettingsUpdate {
    #[serde(default)]
    pub health_check_interval_minutes: Option<u64>,
    #[serde(default)]
    pub auto_failover_enabled: Option<bool>,
    #[serde(default)]
    pub fallback_to_static_responses: Option<bool>,
}

impl SettingsUpdate {
    pub fn apply_to(&self, current: &RoutingSettings) -> RoutingSettings {
        RoutingSettings {
            health_check_interval_minutes: self
                .health_check_interval_minutes
                .unwrap_or(current.health_check_interval_minutes),
            auto_failover_enabled: self
                .auto_failover_enabled
                .unwrap_or(current.auto_failover_enabled),
            fallback_to_static_responses: self
                .fallback_to_static_responses
                .unwrap_or(current.fallback_to_static_responses),
        }
    }
}

/// Shared, atomically replaceable settings
#[derive(Debug, Clone, Default)]
pub struct SettingsHandle {
    inner: Arc<ArcSwap<RoutingSettings>>,
}

impl SettingsHandle {
    pub fn new(settings: RoutingSettings) -> Self {
        Self {
            inner: Arc::new(ArcSwap::from_pointee(settings)),
        }
    }

    pub fn current(&self) -> Arc<RoutingSettings> {
        self.inner.load_full()
    }

    pub fn replace(&self, settings: RoutingSettings) {
        self.inner.store(Arc::new(settings));
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_defaults() {
        let settings = RoutingSettings::default();
        assert_eq!(settings.health_check_interval_minutes, 5);
        assert!(settings.auto_failover_enabled);
        assert!(settings.fallback_to_static_responses);
        assert_eq!(settings.health_check_interval(), Duration::from_secs(300));
    }

    #[test]
    fn test_partial_deserialize() {
        let settings: RoutingSettings =
            serde_json::from_str(r#"{"auto_failover_enabled": false}"#).unwrap();
        assert!(!settings.auto_failover_enabled);
        assert_eq!(settings.health_check_interval_minutes, 5);
    }

    #[test]
    fn test_update_and_handle() {
        let handle = SettingsHandle::new(RoutingSettings::default());
        let shared = handle.clone();

        let update = SettingsUpdate {
            health_check_interval_minutes: Some(10),
            ..Default::default()
        };
        handle.replace(update.apply_to(&handle.current()));

        assert_eq!(shared.current().health_check_interval_minutes, 10);
        assert!(shared.current().auto_failover_enabled);
    }

    #[test]
    fn test_validate_interval() {
        let settings = RoutingSettings {
            health_check_interval_minutes: 0,
            ..Default::default()
        };
        assert!(settings.validate().is_err());
        assert!(RoutingSettings::default().validate().is_ok());
    }
}
