//! Health monitoring for providers
//!
//! # Module Structure
//!
//! - `types` - Sample and status types, classification policy
//! - `store` - Append-only sample history and health snapshots
//! - `monitor` - Periodic and on-demand probing
//! - `tests` - Test suite for health monitoring

pub mod monitor;
pub mod store;
pub mod types;

pub use monitor::{CycleHook, HealthMonitor, HealthMonitorConfig};
pub use store::{DEFAULT_RETAINED_SAMPLES, HealthSnapshot, HealthStore};
pub use types::{HealthPolicy, HealthSample, HealthStatus, SampleStatus};
