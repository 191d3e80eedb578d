//! Common test utilities for failover-gateway
//!
//! - Provider fixtures
//! - Mock backends speaking each provider's wire format
//!
//! # Usage
//!
//! ```rust,ignore
//! use crate::common::{backends, fixtures::ProviderFactory};
//!
//! #[tokio::test]
//! async fn my_test() {
//!     let server = backends::openai_replying("hello").await;
//!     let provider = ProviderFactory::openai("a", 1, backends::openai_endpoint(&server));
//!     // ...
//! }
//! ```

pub mod backends;
pub mod fixtures;

/// Assert that a result is Ok and return the value
#[macro_export]
macro_rules! assert_ok {
    ($expr:expr) => {
        match $expr {
            Ok(v) => v,
            Err(e) => panic!("Expected Ok, got Err: {:?}", e),
        }
    };
}

/// Assert that a result is Err
#[macro_export]
macro_rules! assert_err {
    ($expr:expr) => {
        match $expr {
            Ok(v) => panic!("Expected Err, got Ok: {:?}", v),
            Err(e) => e,
        }
    };
}
