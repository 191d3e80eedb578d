//! Configuration data models
//!
//! This module defines all configuration structures used throughout the gateway.

pub mod gateway;
pub mod health;
pub mod logging;
pub mod router;
pub mod security;
pub mod server;
pub mod store;

// Re-export all configuration types
pub use gateway::*;
pub use health::*;
pub use logging::*;
pub use router::*;
pub use security::*;
pub use server::*;
pub use store::*;

/// Default values for configuration
pub fn default_host() -> String {
    "0.0.0.0".to_string()
}

/// Default server port
pub fn default_port() -> u16 {
    8000
}

/// Default maximum body size in bytes
pub fn default_max_body_size() -> usize {
    1024 * 1024 // 1MB
}

pub fn default_true() -> bool {
    true
}

pub fn default_cors_methods() -> Vec<String> {
    ["GET", "POST", "PUT", "DELETE", "OPTIONS"]
        .iter()
        .map(|m| m.to_string())
        .collect()
}

pub fn default_cors_headers() -> Vec<String> {
    ["Authorization", "Content-Type", "X-Request-Id"]
        .iter()
        .map(|h| h.to_string())
        .collect()
}

pub fn default_cors_max_age() -> u32 {
    3600
}

pub fn default_time_budget_ms() -> u64 {
    60_000
}

pub fn default_max_time_budget_ms() -> u64 {
    300_000
}

pub fn default_probe_timeout_seconds() -> u64 {
    30
}

pub fn default_freshness_window_seconds() -> u64 {
    15 * 60
}

pub fn default_degraded_latency_ms() -> u64 {
    5000
}

pub fn default_retained_samples() -> usize {
    crate::core::health::DEFAULT_RETAINED_SAMPLES
}

pub fn default_recent_samples() -> usize {
    50
}

pub fn default_connect_timeout_seconds() -> u64 {
    10
}

pub fn default_conversation_buffer() -> usize {
    crate::core::conversation_log::DEFAULT_BUFFER_SIZE
}

pub fn default_log_level() -> String {
    "info".to_string()
}
