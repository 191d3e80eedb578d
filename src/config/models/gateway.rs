//! Main gateway configuration

use super::*;
use crate::core::registry::ProviderInput;
use crate::core::settings::RoutingSettings;
use serde::{Deserialize, Serialize};

/// Main gateway configuration
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct GatewayConfig {
    /// Server configuration
    #[serde(default)]
    pub server: ServerConfig,
    /// Admin API access
    #[serde(default)]
    pub admin: AdminConfig,
    /// Allowed credential sources
    #[serde(default)]
    pub credentials: CredentialsConfig,
    /// Durable store
    #[serde(default)]
    pub store: StoreConfig,
    /// Routing time budgets
    #[serde(default)]
    pub router: RoutingConfig,
    /// Health monitoring
    #[serde(default)]
    pub health: HealthConfig,
    /// Conversation logging
    #[serde(default)]
    pub conversation_log: ConversationLogConfig,
    /// Initial runtime settings (persisted values win)
    #[serde(default)]
    pub settings: RoutingSettings,
    /// Seed providers, used when the store holds none
    #[serde(default)]
    pub providers: Vec<ProviderInput>,
    /// Logging
    #[serde(default)]
    pub logging: LoggingConfig,
}
