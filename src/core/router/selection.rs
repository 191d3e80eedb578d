//! Candidate selection
//!
//! Pure function over a registry snapshot and a health snapshot; no I/O.

use crate::core::health::HealthSnapshot;
use crate::core::registry::{Provider, RegistrySnapshot};
use crate::core::types::UseCase;

/// Ordered candidate list for a use case
///
/// Enabled providers tagged with `use_case` (or the enabled `general` pool when
/// there are none), with `down` providers moved behind everything else. Each
/// partition is ordered by priority, then id. An empty list means no enabled
/// provider exists for the use case or the general pool.
pub fn select(
    use_case: UseCase,
    registry: &RegistrySnapshot,
    health: &HealthSnapshot,
) -> Vec<Provider> {
    // Already sorted by (priority, id); the partition below is stable
    let pool = registry.list(use_case);

    let (preferred, down): (Vec<_>, Vec<_>) = pool
        .into_iter()
        .partition(|provider| health.status(&provider.id).is_preferred());

    let mut candidates = preferred;
    candidates.extend(down);
    candidates
}
