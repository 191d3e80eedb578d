//! Integration tests for failover-gateway
//!
//! These tests drive the real HTTP adapters against mock backends.

pub mod failover_tests;
pub mod gateway_tests;
