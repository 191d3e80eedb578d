//! Failover routing across AI providers
//!
//! ## Module Structure
//!
//! - `config` - Router time budget settings
//! - `error` - Error taxonomy and exhaustion reasons
//! - `types` - Routing request, attempt log and result
//! - `selection` - Pure candidate selection
//! - `router` - Failover orchestration
//! - `fallback` - Static fallback strategies for exhausted requests

pub mod config;
pub mod error;
pub mod fallback;
pub mod router;
pub mod selection;
pub mod types;

#[cfg(test)]
mod tests;

pub use config::RouterConfig;
pub use error::{ErrorKind, ExhaustionReason};
pub use fallback::{CannedFallback, StaticFallback};
pub use router::Router;
pub use selection::select;
pub use types::{Attempt, AttemptOutcome, RoutingRequest, RoutingResult, SessionContext};
