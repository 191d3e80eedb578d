//! Per-call errors
//!
//! Every adapter normalizes its failures into a [`CallError`]. These never cross
//! the routing boundary: the router records them as attempt outcomes.

use crate::core::router::error::ErrorKind;
use std::time::Duration;
use thiserror::Error;

/// Failure of a single provider call
#[derive(Debug, Clone, Error, PartialEq, Eq)]
pub enum CallError {
    /// Bad or missing credential, unknown adapter, malformed record
    #[error("Configuration error: {message}")]
    Config { message: String },

    /// Call did not finish within its time limit
    #[error("Timed out after {elapsed_ms}ms")]
    Timeout { elapsed_ms: u64 },

    /// Network or DNS failure
    #[error("Backend unreachable: {message}")]
    Unreachable { message: String },

    /// Well-formed call, backend answered with an error or unusable output
    #[error("Backend rejected request ({status}): {message}")]
    BackendRejected { status: u16, message: String },
}

impl CallError {
    pub fn config(message: impl Into<String>) -> Self {
        Self::Config {
            message: message.into(),
        }
    }

    pub fn timeout(elapsed: Duration) -> Self {
        Self::Timeout {
            elapsed_ms: elapsed.as_millis() as u64,
        }
    }

    pub fn unreachable(message: impl Into<String>) -> Self {
        Self::Unreachable {
            message: message.into(),
        }
    }

    pub fn backend_rejected(status: u16, message: impl Into<String>) -> Self {
        Self::BackendRejected {
            status,
            message: message.into(),
        }
    }

    /// Taxonomy entry for this failure
    pub fn kind(&self) -> ErrorKind {
        match self {
            CallError::Config { .. } => ErrorKind::ConfigError,
            CallError::Timeout { .. } => ErrorKind::Timeout,
            CallError::Unreachable { .. } => ErrorKind::Unreachable,
            CallError::BackendRejected { .. } => ErrorKind::BackendRejected,
        }
    }
}
