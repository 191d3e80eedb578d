//! Core routing functionality
//!
//! Leaves first: the provider registry, the health monitor, the per-backend call
//! adapters and the failover router that drives them.

pub mod conversation_log;
pub mod health;
pub mod providers;
pub mod registry;
pub mod router;
pub mod settings;
pub mod types;
