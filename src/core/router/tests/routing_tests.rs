//! Failover routing tests

use crate::core::conversation_log::{ConversationLogger, MockConversationSink};
use crate::core::health::{HealthMonitor, HealthMonitorConfig, HealthSample, HealthStore};
use crate::core::providers::{CallError, CallExecutor, EnvCredentialResolver, MockAdapter};
use crate::core::registry::{Provider, ProviderRegistry};
use crate::core::router::{
    AttemptOutcome, ErrorKind, ExhaustionReason, Router, RouterConfig, RoutingRequest,
    SessionContext,
};
use crate::core::settings::{RoutingSettings, SettingsHandle};
use crate::core::types::{CredentialRef, ProviderType, UseCase};
use chrono::Utc;
use std::sync::Arc;
use std::time::Duration;
use tokio::sync::mpsc;

fn provider(id: &str, priority: u32, use_case: UseCase) -> Provider {
    Provider::new(id, id, ProviderType::Anthropic, "claude-3-haiku")
        .with_priority(priority)
        .with_use_case(use_case)
        .with_credential(CredentialRef::new("sk-test"))
}

struct Fixture {
    router: Router,
    adapter: Arc<MockAdapter>,
    settings: SettingsHandle,
}

fn fixture(providers: Vec<Provider>, adapter: MockAdapter, down: &[&str]) -> Fixture {
    let adapter = Arc::new(adapter);
    let registry = Arc::new(ProviderRegistry::with_providers(providers));
    let executor = Arc::new(
        CallExecutor::new(Arc::new(EnvCredentialResolver::with_lookup(|_| None)))
            .register(adapter.clone()),
    );
    let settings = SettingsHandle::new(RoutingSettings::default());

    let store = Arc::new(HealthStore::default());
    for id in down {
        store.record(HealthSample::failure(id, None, "connection refused", Utc::now()));
    }
    let monitor = Arc::new(HealthMonitor::new(
        registry.clone(),
        store,
        executor.clone(),
        settings.clone(),
        HealthMonitorConfig::default(),
    ));

    let router = Router::new(registry, executor)
        .with_health(monitor)
        .with_settings(settings.clone());

    Fixture {
        router,
        adapter,
        settings,
    }
}

fn scenario_providers() -> Vec<Provider> {
    vec![
        provider("A", 1, UseCase::General),
        provider("B", 2, UseCase::General),
        provider("C", 1, UseCase::CreativeWriting),
    ]
}

#[tokio::test]
async fn test_failover_to_down_provider_after_primary_fails() {
    let adapter = MockAdapter::new(ProviderType::Anthropic)
        .fail("A", CallError::backend_rejected(500, "internal error"))
        .reply("B", "answer from B");
    let fixture = fixture(scenario_providers(), adapter, &["B"]);

    let result = fixture
        .router
        .route(RoutingRequest::new(UseCase::Chatbot, "hello"))
        .await;

    assert_eq!(result.provider_used.as_deref(), Some("B"));
    assert_eq!(result.text.as_deref(), Some("answer from B"));
    assert_eq!(result.attempted_providers(), vec!["A", "B"]);
    assert_eq!(result.attempts[0].error_kind(), Some(ErrorKind::BackendRejected));
    assert_eq!(result.attempts[1].outcome, AttemptOutcome::Ok);
    assert!(result.exhaustion.is_none());
}

#[tokio::test]
async fn test_dedicated_provider_is_used() {
    let adapter = MockAdapter::new(ProviderType::Anthropic).reply("C", "a poem");
    let fixture = fixture(scenario_providers(), adapter, &["B"]);

    let result = fixture
        .router
        .route(RoutingRequest::new(UseCase::CreativeWriting, "write"))
        .await;

    assert_eq!(result.provider_used.as_deref(), Some("C"));
    assert_eq!(fixture.adapter.calls(), vec!["C".to_string()]);
}

#[tokio::test]
async fn test_stops_at_first_success() {
    let adapter = MockAdapter::new(ProviderType::Anthropic)
        .reply("A", "from A")
        .reply("B", "from B");
    let fixture = fixture(scenario_providers(), adapter, &[]);

    let result = fixture
        .router
        .route(RoutingRequest::new(UseCase::General, "hi"))
        .await;

    assert_eq!(result.provider_used.as_deref(), Some("A"));
    assert_eq!(result.attempts.len(), 1);
    assert_eq!(fixture.adapter.calls(), vec!["A".to_string()]);
}

#[tokio::test]
async fn test_all_candidates_fail() {
    let adapter = MockAdapter::new(ProviderType::Anthropic)
        .fail("A", CallError::unreachable("dns failure"))
        .fail("B", CallError::backend_rejected(429, "rate limited"));
    let fixture = fixture(scenario_providers(), adapter, &[]);

    let result = fixture
        .router
        .route(RoutingRequest::new(UseCase::Search, "find"))
        .await;

    assert!(result.provider_used.is_none());
    assert!(result.text.is_none());
    assert_eq!(result.exhaustion, Some(ExhaustionReason::CandidatesFailed));
    assert_eq!(result.attempted_providers(), vec!["A", "B"]);
    assert_eq!(result.attempts[0].error_kind(), Some(ErrorKind::Unreachable));
}

#[tokio::test]
async fn test_no_candidates_is_exhaustion() {
    let adapter = MockAdapter::new(ProviderType::Anthropic);
    let fixture = fixture(
        vec![provider("vision", 1, UseCase::CreativeVision)],
        adapter,
        &[],
    );

    let result = fixture
        .router
        .route(RoutingRequest::new(UseCase::Chatbot, "hi"))
        .await;

    assert!(result.is_exhausted());
    assert_eq!(result.exhaustion, Some(ExhaustionReason::NoCandidates));
    assert_eq!(
        result.exhaustion.and_then(|r| r.kind()),
        Some(ErrorKind::NoCandidates)
    );
    assert!(result.attempts.is_empty());
}

#[tokio::test]
async fn test_budget_bounds_routing() {
    let adapter = MockAdapter::new(ProviderType::Anthropic)
        .reply("A", "late")
        .delay("A", Duration::from_secs(10))
        .reply("B", "never reached");
    let fixture = fixture(scenario_providers(), adapter, &[]);

    let budget = Duration::from_millis(150);
    let result = fixture
        .router
        .route(RoutingRequest::new(UseCase::General, "hi").with_time_budget(budget))
        .await;

    assert_eq!(result.exhaustion, Some(ExhaustionReason::BudgetExhausted));
    assert_eq!(result.attempted_providers(), vec!["A"]);
    assert_eq!(result.attempts[0].error_kind(), Some(ErrorKind::Timeout));
    assert!(result.elapsed_ms < 2_000);
}

#[tokio::test]
async fn test_budget_is_clamped_to_maximum() {
    let adapter = MockAdapter::new(ProviderType::Anthropic)
        .reply("A", "late")
        .delay("A", Duration::from_secs(10));
    let mut fixture = fixture(vec![provider("A", 1, UseCase::General)], adapter, &[]);
    fixture.router = fixture.router.with_config(
        RouterConfig::default().with_max_time_budget(Duration::from_millis(100)),
    );

    let result = fixture
        .router
        .route(RoutingRequest::new(UseCase::General, "hi").with_time_budget(Duration::from_secs(60)))
        .await;

    // The only candidate spent the whole budget
    assert_eq!(result.exhaustion, Some(ExhaustionReason::BudgetExhausted));
    assert!(result.elapsed_ms < 2_000);
}

#[tokio::test]
async fn test_auto_failover_disabled_tries_only_first() {
    let adapter = MockAdapter::new(ProviderType::Anthropic)
        .fail("A", CallError::unreachable("down"))
        .reply("B", "from B");
    let fixture = fixture(scenario_providers(), adapter, &[]);
    fixture.settings.replace(RoutingSettings {
        auto_failover_enabled: false,
        ..RoutingSettings::default()
    });

    let result = fixture
        .router
        .route(RoutingRequest::new(UseCase::General, "hi"))
        .await;

    assert!(result.provider_used.is_none());
    assert_eq!(result.attempted_providers(), vec!["A"]);
    assert_eq!(result.exhaustion, Some(ExhaustionReason::CandidatesFailed));
}

#[tokio::test]
async fn test_config_error_skips_candidate() {
    let providers = vec![
        provider("A", 1, UseCase::General).with_credential(CredentialRef::from_env("MISSING_KEY")),
        provider("B", 2, UseCase::General),
    ];
    let adapter = MockAdapter::new(ProviderType::Anthropic)
        .reply("A", "unreachable")
        .reply("B", "from B");
    let fixture = fixture(providers, adapter, &[]);

    let result = fixture
        .router
        .route(RoutingRequest::new(UseCase::General, "hi"))
        .await;

    assert_eq!(result.provider_used.as_deref(), Some("B"));
    assert_eq!(result.attempts[0].error_kind(), Some(ErrorKind::ConfigError));
    assert_eq!(fixture.adapter.calls(), vec!["B".to_string()]);
}

#[tokio::test]
async fn test_attempts_follow_candidate_order() {
    let providers: Vec<_> = (0..5)
        .map(|i| provider(&format!("p{}", i), 10 - i, UseCase::General))
        .collect();
    let mut adapter = MockAdapter::new(ProviderType::Anthropic);
    for i in 0..5 {
        adapter = adapter.fail(&format!("p{}", i), CallError::unreachable("nope"));
    }
    let fixture = fixture(providers, adapter, &["p4"]);

    let request = RoutingRequest::new(UseCase::General, "hi");
    let expected: Vec<String> = fixture
        .router
        .candidates(&request)
        .into_iter()
        .map(|p| p.id)
        .collect();
    let result = fixture.router.route(request).await;

    assert_eq!(expected, vec!["p3", "p2", "p1", "p0", "p4"]);
    assert_eq!(
        result.attempted_providers(),
        expected.iter().map(String::as_str).collect::<Vec<_>>()
    );
}

#[tokio::test]
async fn test_outcome_is_sent_to_conversation_log() {
    let (tx, mut rx) = mpsc::unbounded_channel();
    let mut sink = MockConversationSink::new();
    sink.expect_deliver().returning(move |record| {
        let _ = tx.send(record.clone());
        Ok(())
    });
    let (logger, _handle) = ConversationLogger::spawn(Arc::new(sink), 16);

    let adapter = MockAdapter::new(ProviderType::Anthropic).reply("A", "logged answer");
    let mut fixture = fixture(scenario_providers(), adapter, &[]);
    fixture.router = fixture.router.with_conversation_logger(logger);

    let request = RoutingRequest::new(UseCase::Chatbot, "question").with_session(SessionContext {
        session_id: "session-1".to_string(),
        user_hash: "abc123".to_string(),
    });
    let result = fixture.router.route(request).await;
    assert!(result.is_success());

    let record = tokio::time::timeout(Duration::from_secs(2), rx.recv())
        .await
        .unwrap()
        .unwrap();
    assert_eq!(record.session_id, "session-1");
    assert_eq!(record.user_hash, "abc123");
    assert_eq!(record.request, "question");
    assert_eq!(record.response.as_deref(), Some("logged answer"));
    assert_eq!(record.provider_used.as_deref(), Some("A"));
    assert_eq!(record.metadata["use_case"], "chatbot");
}
