//! Utility modules for the gateway
//!
//! - **error**: crate-level error type and HTTP error responses
//! - **logging**: tracing subscriber setup

pub mod error;
pub mod logging;
