//! Configuration management for the gateway
//!
//! Configuration is read from a YAML file, then selected values may be
//! overridden from the environment.

pub mod models;
pub mod validation;

pub use models::*;
pub use validation::Validate;

use crate::utils::error::{GatewayError, Result};
use std::path::{Path, PathBuf};
use tracing::{debug, info, warn};

/// Default configuration file location
pub const DEFAULT_CONFIG_PATH: &str = "config/gateway.yaml";

/// Main configuration struct for the gateway
#[derive(Debug, Clone, Default, PartialEq)]
pub struct Config {
    /// Gateway configuration
    pub gateway: GatewayConfig,
}

impl Config {
    /// Load configuration from file
    pub async fn from_file<P: AsRef<Path>>(path: P) -> Result<Self> {
        let path = path.as_ref();
        info!("Loading configuration from: {:?}", path);

        let content = tokio::fs::read_to_string(path)
            .await
            .map_err(|e| GatewayError::Config(format!("Failed to read config file: {}", e)))?;

        let config = Self::from_yaml(&content)?;

        debug!("Configuration loaded successfully");
        Ok(config)
    }

    /// Parse and validate YAML configuration
    pub fn from_yaml(content: &str) -> Result<Self> {
        // An empty document means "all defaults"
        let gateway: GatewayConfig = if content.trim().is_empty() {
            GatewayConfig::default()
        } else {
            serde_yaml::from_str(content)
                .map_err(|e| GatewayError::Config(format!("Failed to parse config: {}", e)))?
        };

        let config = Self { gateway };
        config.validate()?;
        Ok(config)
    }

    /// Load from file, falling back to defaults when the file does not exist
    pub async fn load_or_default<P: AsRef<Path>>(path: P) -> Result<Self> {
        let path = path.as_ref();
        if tokio::fs::try_exists(path).await.unwrap_or(false) {
            Self::from_file(path).await
        } else {
            warn!(
                "Configuration file {:?} not found, using default configuration",
                path
            );
            Ok(Self::default())
        }
    }

    /// Apply overrides from the process environment
    pub fn with_env_overrides(self) -> Result<Self> {
        self.with_overrides_from(|name| std::env::var(name).ok())
    }

    /// Apply overrides from an arbitrary variable source
    ///
    /// Recognized variables: `GATEWAY_HOST`, `GATEWAY_PORT`, `GATEWAY_STORE_PATH`,
    /// `GATEWAY_HEALTH_INTERVAL_MINUTES`, `GATEWAY_CONVERSATION_LOG_ENDPOINT`,
    /// `GATEWAY_ADMIN_API_KEY`.
    pub fn with_overrides_from<F>(mut self, lookup: F) -> Result<Self>
    where
        F: Fn(&str) -> Option<String>,
    {
        let gateway = &mut self.gateway;

        if let Some(host) = lookup("GATEWAY_HOST") {
            gateway.server.host = host;
        }
        if let Some(port) = lookup("GATEWAY_PORT") {
            gateway.server.port = port
                .parse()
                .map_err(|e| GatewayError::Config(format!("Invalid GATEWAY_PORT: {}", e)))?;
        }
        if let Some(path) = lookup("GATEWAY_STORE_PATH") {
            gateway.store.path = Some(PathBuf::from(path));
        }
        if let Some(minutes) = lookup("GATEWAY_HEALTH_INTERVAL_MINUTES") {
            gateway.settings.health_check_interval_minutes = minutes.parse().map_err(|e| {
                GatewayError::Config(format!("Invalid GATEWAY_HEALTH_INTERVAL_MINUTES: {}", e))
            })?;
        }
        if let Some(endpoint) = lookup("GATEWAY_CONVERSATION_LOG_ENDPOINT") {
            gateway.conversation_log.endpoint = Some(endpoint);
        }
        if let Some(key) = lookup("GATEWAY_ADMIN_API_KEY") {
            gateway.admin.api_key = Some(key);
        }

        self.validate()?;
        Ok(self)
    }

    /// Get server configuration
    pub fn server(&self) -> &ServerConfig {
        &self.gateway.server
    }

    /// Get router settings
    pub fn router(&self) -> &RoutingConfig {
        &self.gateway.router
    }

    /// Get health settings
    pub fn health(&self) -> &HealthConfig {
        &self.gateway.health
    }

    /// Validate the entire configuration
    pub fn validate(&self) -> Result<()> {
        debug!("Validating configuration");

        self.gateway.validate().map_err(GatewayError::Config)?;

        if self.gateway.providers.is_empty() && self.gateway.store.path.is_none() {
            warn!("No providers configured and no store path set; routing will find no candidates");
        }
        if self.gateway.admin.api_key.is_none() {
            warn!("No admin API key configured; /admin endpoints will reject every request");
        }

        Ok(())
    }

    /// Convert to YAML string
    pub fn to_yaml(&self) -> Result<String> {
        serde_yaml::to_string(&self.gateway)
            .map_err(|e| GatewayError::Config(format!("Failed to serialize config to YAML: {}", e)))
    }
}
