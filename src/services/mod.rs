//! Services module
//!
//! This module contains business logic and service implementations

pub mod providers;

pub use providers::{DEFAULT_RECENT_SAMPLES, ProviderService};
