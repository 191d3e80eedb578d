//! Application state shared across HTTP handlers

use crate::config::Config;
use crate::core::conversation_log::{ConversationLogger, ConversationSink, HttpSink, TracingSink};
use crate::core::health::{CycleHook, HealthMonitor, HealthStore};
use crate::core::providers::shared::build_http_client;
use crate::core::providers::{CallExecutor, CredentialResolver, EnvCredentialResolver};
use crate::core::registry::ProviderRegistry;
use crate::core::router::{CannedFallback, Router, StaticFallback};
use crate::core::settings::SettingsHandle;
use crate::services::ProviderService;
use crate::storage::{JsonFileStore, MemoryStore, StateStore};
use crate::utils::error::{GatewayError, Result};
use std::sync::Arc;
use tracing::{debug, info};

/// HTTP server state shared across handlers
///
/// All fields are reference counted; cloning is cheap.
#[derive(Clone)]
pub struct AppState {
    /// Gateway configuration (shared read-only)
    pub config: Arc<Config>,
    /// Failover router
    pub router: Arc<Router>,
    /// Administrative provider service
    pub providers: Arc<ProviderService>,
    /// Terminal strategy applied when routing is exhausted
    pub fallback: Arc<dyn StaticFallback>,
    /// Runtime routing settings
    pub settings: SettingsHandle,
}

impl AppState {
    pub fn new(
        config: Config,
        router: Arc<Router>,
        providers: Arc<ProviderService>,
        settings: SettingsHandle,
    ) -> Self {
        Self {
            config: Arc::new(config),
            router,
            providers,
            fallback: Arc::new(CannedFallback::new()),
            settings,
        }
    }

    /// Replace the static fallback strategy (builder pattern)
    pub fn with_fallback(mut self, fallback: Arc<dyn StaticFallback>) -> Self {
        self.fallback = fallback;
        self
    }

    /// Wire every component from configuration
    ///
    /// Restores persisted state, then starts the health monitor and the
    /// conversation log delivery task.
    pub async fn build(config: &Config) -> Result<Self> {
        info!("Initializing gateway components");

        let client = build_http_client(config.router().connect_timeout())
            .map_err(|e| GatewayError::Config(e.to_string()))?;
        let allowed_env = config.gateway.credentials.allow_list();
        let credentials: Arc<dyn CredentialResolver> =
            Arc::new(EnvCredentialResolver::new().with_allow_list(allowed_env.clone()));
        let executor = Arc::new(CallExecutor::with_http_adapters(client.clone(), credentials));

        let registry = Arc::new(ProviderRegistry::new());
        let settings = SettingsHandle::new(config.gateway.settings.clone());
        let health = config.health();
        let monitor = Arc::new(HealthMonitor::new(
            Arc::clone(&registry),
            Arc::new(HealthStore::new(health.retained_samples)),
            Arc::clone(&executor),
            settings.clone(),
            health.monitor_config(),
        ));

        let store: Arc<dyn StateStore> = match &config.gateway.store.path {
            Some(path) => Arc::new(JsonFileStore::new(path)),
            None => Arc::new(MemoryStore::new()),
        };
        debug!("Using state store {}", store.describe());

        let providers = Arc::new(
            ProviderService::new(
                Arc::clone(&registry),
                Arc::clone(&monitor),
                store,
                settings.clone(),
            )
            .with_recent_limit(health.recent_samples)
            .with_env_allow_list(allowed_env),
        );
        providers.restore(config.gateway.providers.clone()).await?;

        let mut router = Router::new(registry, executor)
            .with_health(Arc::clone(&monitor))
            .with_settings(settings.clone())
            .with_config(config.router().router_config());

        let log_config = &config.gateway.conversation_log;
        if log_config.enabled {
            let sink: Arc<dyn ConversationSink> = match &log_config.endpoint {
                Some(endpoint) => Arc::new(HttpSink::new(client, endpoint.clone())),
                None => Arc::new(TracingSink),
            };
            let (logger, _log_task) = ConversationLogger::spawn(sink, log_config.buffer_size);
            router = router.with_conversation_logger(logger);
        }

        let hook: Arc<dyn CycleHook> = providers.clone();
        let _monitor_task = monitor.spawn(Some(hook));

        Ok(Self::new(config.clone(), Arc::new(router), providers, settings))
    }

    /// Get gateway configuration
    pub fn config(&self) -> &Config {
        &self.config
    }
}
