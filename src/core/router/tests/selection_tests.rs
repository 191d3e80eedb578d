//! Candidate selection tests

use crate::core::health::{HealthSnapshot, HealthStatus};
use crate::core::registry::{Provider, RegistrySnapshot};
use crate::core::router::selection::select;
use crate::core::types::{CredentialRef, ProviderType, UseCase};

fn provider(id: &str, priority: u32, use_case: UseCase) -> Provider {
    Provider::new(id, id, ProviderType::Anthropic, "claude-3-haiku")
        .with_priority(priority)
        .with_use_case(use_case)
        .with_credential(CredentialRef::new("sk-test"))
}

fn ids(providers: &[Provider]) -> Vec<&str> {
    providers.iter().map(|p| p.id.as_str()).collect()
}

fn scenario() -> RegistrySnapshot {
    RegistrySnapshot::new(vec![
        provider("A", 1, UseCase::General),
        provider("B", 2, UseCase::General),
        provider("C", 1, UseCase::CreativeWriting),
    ])
}

#[test]
fn test_dedicated_use_case_wins() {
    let health = HealthSnapshot::new().with_status("B", HealthStatus::Down);
    let candidates = select(UseCase::CreativeWriting, &scenario(), &health);
    assert_eq!(ids(&candidates), vec!["C"]);
}

#[test]
fn test_general_pool_with_down_provider_last() {
    let health = HealthSnapshot::new().with_status("B", HealthStatus::Down);
    let candidates = select(UseCase::Chatbot, &scenario(), &health);
    assert_eq!(ids(&candidates), vec!["A", "B"]);
}

#[test]
fn test_down_provider_moves_behind_lower_priority() {
    let health = HealthSnapshot::new().with_status("A", HealthStatus::Down);
    let candidates = select(UseCase::Chatbot, &scenario(), &health);
    assert_eq!(ids(&candidates), vec!["B", "A"]);
}

#[test]
fn test_degraded_and_unknown_stay_in_priority_order() {
    let registry = RegistrySnapshot::new(vec![
        provider("healthy", 3, UseCase::Search),
        provider("degraded", 1, UseCase::Search),
        provider("unknown", 2, UseCase::Search),
    ]);
    let health = HealthSnapshot::new()
        .with_status("healthy", HealthStatus::Healthy)
        .with_status("degraded", HealthStatus::Degraded);

    let candidates = select(UseCase::Search, &registry, &health);
    assert_eq!(ids(&candidates), vec!["degraded", "unknown", "healthy"]);
}

#[test]
fn test_ties_break_by_id_in_each_partition() {
    let registry = RegistrySnapshot::new(vec![
        provider("d2", 1, UseCase::General),
        provider("d1", 1, UseCase::General),
        provider("h2", 5, UseCase::General),
        provider("h1", 5, UseCase::General),
    ]);
    let health = HealthSnapshot::new()
        .with_status("d1", HealthStatus::Down)
        .with_status("d2", HealthStatus::Down);

    let candidates = select(UseCase::General, &registry, &health);
    assert_eq!(ids(&candidates), vec!["h1", "h2", "d1", "d2"]);
}

#[test]
fn test_all_down_still_returns_candidates() {
    let health = HealthSnapshot::new()
        .with_status("A", HealthStatus::Down)
        .with_status("B", HealthStatus::Down);
    let candidates = select(UseCase::Analysis, &scenario(), &health);
    assert_eq!(ids(&candidates), vec!["A", "B"]);
}

#[test]
fn test_disabled_providers_are_excluded() {
    let registry = RegistrySnapshot::new(vec![
        provider("on", 2, UseCase::General),
        provider("off", 1, UseCase::General).with_enabled(false),
    ]);
    let candidates = select(UseCase::General, &registry, &HealthSnapshot::new());
    assert_eq!(ids(&candidates), vec!["on"]);
}

#[test]
fn test_no_providers_yields_empty_list() {
    let registry = RegistrySnapshot::new(vec![
        provider("vision", 1, UseCase::CreativeVision),
        provider("general-off", 1, UseCase::General).with_enabled(false),
    ]);
    let candidates = select(UseCase::Chatbot, &registry, &HealthSnapshot::new());
    assert!(candidates.is_empty());
}

#[test]
fn test_selection_is_deterministic() {
    let registry = scenario();
    let health = HealthSnapshot::new().with_status("B", HealthStatus::Down);
    let first = select(UseCase::Assessment, &registry, &health);
    for _ in 0..10 {
        assert_eq!(select(UseCase::Assessment, &registry, &health), first);
    }
}
