//! # Failover Gateway
//!
//! Use-case aware routing across third-party AI backends (Anthropic, OpenAI,
//! Google, xAI) with health monitoring and priority failover.
//!
//! ## Features
//!
//! - **Provider Registry**: snapshot-isolated provider records, safe to read while
//!   administrators edit them
//! - **Health Monitor**: periodic, per-provider isolated probes with freshness-aware
//!   classification (`healthy`, `degraded`, `down`, `unknown`)
//! - **Candidate Selection**: deterministic priority ordering per use case, with the
//!   `general` pool as fallback and `down` providers moved to the back
//! - **Failover**: candidates are tried one at a time under a shared time budget;
//!   total exhaustion is a normal result value, never an error
//! - **Conversation Logging**: fire-and-forget delivery of routing outcomes
//!
//! ## Routing a request
//!
//! ```rust,no_run
//! use failover_gateway::core::router::RoutingRequest;
//! use failover_gateway::core::types::UseCase;
//! use failover_gateway::{Config, Gateway};
//! use std::time::Duration;
//!
//! #[tokio::main]
//! async fn main() -> Result<(), Box<dyn std::error::Error>> {
//!     let config = Config::from_file("config/gateway.yaml").await?;
//!     let gateway = Gateway::new(config).await?;
//!
//!     let request = RoutingRequest::new(UseCase::Chatbot, "Summarize our findings")
//!         .with_time_budget(Duration::from_secs(20));
//!     let result = gateway.router().route(request).await;
//!
//!     match result.provider_used.as_deref() {
//!         Some(provider) => println!("{} answered: {:?}", provider, result.text),
//!         None => println!("all {} attempts failed", result.attempts.len()),
//!     }
//!     Ok(())
//! }
//! ```

#![warn(clippy::all)]
#![allow(clippy::module_inception)]

pub mod config;
pub mod core;
pub mod server;
pub mod services;
pub mod storage;
pub mod utils;

// Re-export main types
pub use config::Config;
pub use utils::error::{GatewayError, Result};

pub use core::health::{HealthMonitor, HealthSample, HealthStatus};
pub use core::providers::{CallError, CallExecutor, ProviderAdapter};
pub use core::registry::{Provider, ProviderRegistry};
pub use core::router::{Router, RoutingRequest, RoutingResult};
pub use core::types::{ProviderId, ProviderType, UseCase};

use crate::server::state::AppState;
use tracing::info;

/// Fully wired gateway: registry, health monitor, router and HTTP surface
pub struct Gateway {
    config: Config,
    state: AppState,
}

impl Gateway {
    /// Assemble all components, restore persisted state and start background tasks
    pub async fn new(config: Config) -> Result<Self> {
        info!("Creating new gateway instance");

        let state = AppState::build(&config).await?;

        Ok(Self { config, state })
    }

    /// Failover router used by feature code
    pub fn router(&self) -> &Router {
        &self.state.router
    }

    /// Shared application state
    pub fn state(&self) -> &AppState {
        &self.state
    }

    /// Run the HTTP server until it is stopped
    pub async fn run(self) -> Result<()> {
        info!("Starting failover gateway");

        let server = server::HttpServer::new(&self.config, self.state);
        server.start().await
    }
}

// Version information
/// Current version of the crate
pub const VERSION: &str = env!("CARGO_PKG_VERSION");
/// Name of the crate
pub const NAME: &str = env!("CARGO_PKG_NAME");

/// Gateway build information
#[derive(Debug, Clone, serde::Serialize)]
pub struct BuildInfo {
    /// Version number
    pub version: &'static str,
    /// Build timestamp (unix seconds)
    pub build_time: &'static str,
    /// Git commit hash
    pub git_hash: &'static str,
    /// Rust version
    pub rust_version: &'static str,
}

/// Build metadata captured by `build.rs`
pub fn build_info() -> BuildInfo {
    BuildInfo {
        version: VERSION,
        build_time: env!("BUILD_TIME"),
        git_hash: env!("GIT_HASH"),
        rust_version: env!("RUST_VERSION"),
    }
}
