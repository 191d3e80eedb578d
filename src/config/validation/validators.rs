//! Configuration validators

use super::trait_def::Validate;
use crate::config::models::*;
use crate::core::settings::RoutingSettings;
use chrono::Utc;
use std::collections::HashSet;
use tracing::debug;

impl Validate for GatewayConfig {
    fn validate(&self) -> Result<(), String> {
        debug!("Validating gateway configuration");

        self.server.validate()?;
        self.admin.validate()?;
        self.credentials.validate()?;
        self.store.validate()?;
        self.router.validate()?;
        self.health.validate()?;
        self.conversation_log.validate()?;
        Validate::validate(&self.settings)?;
        self.logging.validate()?;

        // Seeds must be complete records; ids, when given, must be unique
        let mut ids = HashSet::new();
        for seed in &self.providers {
            if let Some(id) = &seed.id {
                if !ids.insert(id.as_str()) {
                    return Err(format!("Duplicate provider id: {}", id));
                }
            }
            let provider = seed
                .clone()
                .into_provider(Utc::now())
                .map_err(|e| format!("Invalid provider seed: {}", e))?;
            self.credentials
                .allow_list()
                .check(&provider.credential_ref)
                .map_err(|e| format!("Invalid provider seed {}: {}", provider.id, e))?;
        }

        Ok(())
    }
}

impl Validate for ServerConfig {
    fn validate(&self) -> Result<(), String> {
        if self.host.is_empty() {
            return Err("Server host cannot be empty".to_string());
        }

        if self.port == 0 {
            return Err("Server port must be greater than 0".to_string());
        }

        if let Some(workers) = self.workers {
            if workers == 0 {
                return Err("Worker count must be greater than 0".to_string());
            }
            if workers > 1000 {
                return Err("Worker count seems too high (>1000)".to_string());
            }
        }

        if self.max_body_size == 0 {
            return Err("Max body size must be greater than 0".to_string());
        }

        self.cors.validate()
    }
}

/// Shortest accepted admin key
const MIN_ADMIN_KEY_LEN: usize = 16;

impl Validate for AdminConfig {
    fn validate(&self) -> Result<(), String> {
        if let Some(key) = &self.api_key {
            if key.trim().len() < MIN_ADMIN_KEY_LEN {
                return Err(format!(
                    "Admin API key must be at least {} characters",
                    MIN_ADMIN_KEY_LEN
                ));
            }
        }
        Ok(())
    }
}

impl Validate for CredentialsConfig {
    fn validate(&self) -> Result<(), String> {
        for pattern in &self.allowed_env {
            let inner = pattern.trim_start_matches('*').trim_end_matches('*');
            if pattern != "*" && (inner.is_empty() || inner.contains('*')) {
                return Err(format!("Invalid credential variable pattern: {:?}", pattern));
            }
        }
        Ok(())
    }
}

impl Validate for CorsConfig {
    fn validate(&self) -> Result<(), String> {
        if self.allow_credentials && self.allows_all_origins() {
            return Err("CORS cannot allow credentials with wildcard origin".to_string());
        }

        for origin in self.allowed_origins.iter().filter(|o| o.as_str() != "*") {
            url::Url::parse(origin).map_err(|e| format!("Invalid CORS origin {}: {}", origin, e))?;
        }

        Ok(())
    }
}

impl Validate for StoreConfig {
    fn validate(&self) -> Result<(), String> {
        if let Some(path) = &self.path {
            if path.as_os_str().is_empty() {
                return Err("Store path cannot be empty".to_string());
            }
        }
        Ok(())
    }
}

impl Validate for RoutingConfig {
    fn validate(&self) -> Result<(), String> {
        if self.default_time_budget_ms == 0 {
            return Err("Default time budget must be greater than 0".to_string());
        }

        if self.max_time_budget_ms < self.default_time_budget_ms {
            return Err("Maximum time budget cannot be below the default budget".to_string());
        }

        if self.connect_timeout_seconds == 0 {
            return Err("Connect timeout must be greater than 0".to_string());
        }

        Ok(())
    }
}

impl Validate for HealthConfig {
    fn validate(&self) -> Result<(), String> {
        if self.probe_timeout_seconds == 0 {
            return Err("Probe timeout must be greater than 0".to_string());
        }

        if self.freshness_window_seconds == 0 {
            return Err("Freshness window must be greater than 0".to_string());
        }

        if self.retained_samples == 0 {
            return Err("Retained samples must be greater than 0".to_string());
        }

        if self.recent_samples == 0 || self.recent_samples > self.retained_samples * 10 {
            return Err("Recent samples must be between 1 and ten times the retention".to_string());
        }

        Ok(())
    }
}

impl Validate for ConversationLogConfig {
    fn validate(&self) -> Result<(), String> {
        if self.buffer_size == 0 {
            return Err("Conversation log buffer size must be greater than 0".to_string());
        }

        if let Some(endpoint) = &self.endpoint {
            let url = url::Url::parse(endpoint)
                .map_err(|e| format!("Invalid conversation log endpoint: {}", e))?;
            if !matches!(url.scheme(), "http" | "https") {
                return Err("Conversation log endpoint must use http or https".to_string());
            }
        }

        Ok(())
    }
}

impl Validate for RoutingSettings {
    fn validate(&self) -> Result<(), String> {
        RoutingSettings::validate(self)
    }
}

impl Validate for LoggingConfig {
    fn validate(&self) -> Result<(), String> {
        if self.level.trim().is_empty() {
            return Err("Log level cannot be empty".to_string());
        }
        Ok(())
    }
}
