//! Storage layer for the Gateway
//!
//! Durable state is a single document holding the provider records, the
//! retained health samples and the runtime routing settings. The routing core
//! never reads it directly; the administrative service loads it at start-up
//! and writes it back after every change.

/// JSON document store
pub mod json;
/// In-memory store
pub mod memory;

pub use json::JsonFileStore;
pub use memory::MemoryStore;

use crate::core::health::HealthSample;
use crate::core::registry::Provider;
use crate::core::settings::RoutingSettings;
use crate::utils::error::Result;
use async_trait::async_trait;
use serde::{Deserialize, Serialize};

/// Everything the gateway persists
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct StoredState {
    #[serde(default)]
    pub providers: Vec<Provider>,
    #[serde(default)]
    pub health_checks: Vec<HealthSample>,
    #[serde(default)]
    pub settings: RoutingSettings,
}

/// Persistence backend for [`StoredState`]
#[async_trait]
pub trait StateStore: Send + Sync {
    /// Load the stored document; `None` when nothing was saved yet
    async fn load(&self) -> Result<Option<StoredState>>;

    /// Replace the stored document
    async fn save(&self, state: &StoredState) -> Result<()>;

    /// Short description for logs
    fn describe(&self) -> String;
}
