//! Selection and failover through real adapters

#[cfg(test)]
mod tests {
    use crate::common::backends;
    use crate::common::fixtures::ProviderFactory;
    use chrono::Utc;
    use failover_gateway::core::health::{
        HealthMonitor, HealthMonitorConfig, HealthSample, HealthStore,
    };
    use failover_gateway::core::providers::shared::build_http_client;
    use failover_gateway::core::providers::{CallExecutor, EnvCredentialResolver};
    use failover_gateway::core::registry::{Provider, ProviderRegistry};
    use failover_gateway::core::router::{
        ErrorKind, ExhaustionReason, Router, RoutingRequest, select,
    };
    use failover_gateway::core::settings::SettingsHandle;
    use failover_gateway::core::types::UseCase;
    use std::sync::Arc;
    use std::time::{Duration, Instant};

    struct Harness {
        router: Router,
        registry: Arc<ProviderRegistry>,
        monitor: Arc<HealthMonitor>,
    }

    fn harness(providers: Vec<Provider>) -> Harness {
        let client = build_http_client(Duration::from_secs(2)).unwrap();
        let executor = Arc::new(CallExecutor::with_http_adapters(
            client,
            Arc::new(EnvCredentialResolver::new()),
        ));
        let registry = Arc::new(ProviderRegistry::with_providers(providers));
        let settings = SettingsHandle::default();
        let monitor = Arc::new(HealthMonitor::new(
            Arc::clone(&registry),
            Arc::new(HealthStore::default()),
            Arc::clone(&executor),
            settings.clone(),
            HealthMonitorConfig::default(),
        ));
        let router = Router::new(Arc::clone(&registry), executor)
            .with_health(Arc::clone(&monitor))
            .with_settings(settings);

        Harness {
            router,
            registry,
            monitor,
        }
    }

    fn mark_down(monitor: &HealthMonitor, provider_id: &str) {
        let now = Utc::now();
        for offset in [30, 20, 10] {
            monitor.store().record(HealthSample::failure(
                provider_id,
                None,
                "connection refused",
                now - chrono::Duration::seconds(offset),
            ));
        }
    }

    /// A (general, priority 1) fails, B (general, priority 2) is down but
    /// answers, C is dedicated to creative writing.
    #[tokio::test]
    async fn test_down_provider_is_last_resort_and_dedicated_pool_wins() {
        let backend_a = backends::openai_rejecting(500, "internal error").await;
        let backend_b = backends::openai_replying("answer from B").await;
        let backend_c = backends::anthropic_replying("a short story").await;

        let h = harness(vec![
            ProviderFactory::openai("a", 1, backends::openai_endpoint(&backend_a)),
            ProviderFactory::openai("b", 2, backends::openai_endpoint(&backend_b)),
            ProviderFactory::anthropic(
                "c",
                1,
                UseCase::CreativeWriting,
                backends::anthropic_endpoint(&backend_c),
            ),
        ]);
        mark_down(&h.monitor, "b");

        let registry = h.registry.snapshot();
        let health = h.monitor.snapshot();
        let ids = |providers: Vec<Provider>| -> Vec<String> {
            providers.into_iter().map(|p| p.id).collect()
        };
        assert_eq!(
            ids(select(UseCase::CreativeWriting, &registry, &health)),
            vec!["c"]
        );
        assert_eq!(ids(select(UseCase::Chatbot, &registry, &health)), vec!["a", "b"]);

        let result = h
            .router
            .route(RoutingRequest::new(UseCase::Chatbot, "Hello"))
            .await;
        assert_eq!(result.provider_used.as_deref(), Some("b"));
        assert_eq!(result.text.as_deref(), Some("answer from B"));
        assert_eq!(result.attempted_providers(), vec!["a", "b"]);
        assert_eq!(result.attempts[0].error_kind(), Some(ErrorKind::BackendRejected));
        assert!(result.attempts[1].is_ok());

        let result = h
            .router
            .route(
                RoutingRequest::new(UseCase::CreativeWriting, "Write something")
                    .with_system_prompt("You are a novelist"),
            )
            .await;
        assert_eq!(result.provider_used.as_deref(), Some("c"));
        assert_eq!(result.text.as_deref(), Some("a short story"));
        assert_eq!(result.attempts.len(), 1);
    }

    #[tokio::test]
    async fn test_every_candidate_fails() {
        let backend_a = backends::openai_rejecting(401, "invalid api key").await;
        let backend_b = backends::openai_rejecting(503, "overloaded").await;

        let h = harness(vec![
            ProviderFactory::openai("a", 1, backends::openai_endpoint(&backend_a)),
            ProviderFactory::openai("b", 2, backends::openai_endpoint(&backend_b)),
        ]);

        let result = h
            .router
            .route(RoutingRequest::new(UseCase::Analysis, "Analyze"))
            .await;

        assert!(result.provider_used.is_none());
        assert!(result.text.is_none());
        assert_eq!(result.exhaustion, Some(ExhaustionReason::CandidatesFailed));
        assert_eq!(result.attempted_providers(), vec!["a", "b"]);
        assert!(
            result
                .attempts
                .iter()
                .all(|a| a.error_kind() == Some(ErrorKind::BackendRejected))
        );
    }

    #[tokio::test]
    async fn test_unreachable_provider_fails_over() {
        let backend_b = backends::openai_replying("still here").await;

        let h = harness(vec![
            ProviderFactory::openai("a", 1, "http://127.0.0.1:9/v1/chat/completions"),
            ProviderFactory::openai("b", 2, backends::openai_endpoint(&backend_b)),
        ]);

        let result = h
            .router
            .route(RoutingRequest::new(UseCase::General, "Ping"))
            .await;

        assert_eq!(result.provider_used.as_deref(), Some("b"));
        assert_eq!(result.attempts[0].error_kind(), Some(ErrorKind::Unreachable));
    }

    #[tokio::test]
    async fn test_slow_backend_is_bounded_by_budget() {
        let slow = backends::openai_slow("too late", Duration::from_secs(3)).await;
        let fast = backends::openai_replying("never reached").await;

        let h = harness(vec![
            ProviderFactory::openai("slow", 1, backends::openai_endpoint(&slow)),
            ProviderFactory::openai("fast", 2, backends::openai_endpoint(&fast)),
        ]);

        let budget = Duration::from_millis(300);
        let started = Instant::now();
        let result = h
            .router
            .route(RoutingRequest::new(UseCase::Chatbot, "Hi").with_time_budget(budget))
            .await;
        let elapsed = started.elapsed();

        assert!(result.provider_used.is_none());
        assert_eq!(result.exhaustion, Some(ExhaustionReason::BudgetExhausted));
        assert_eq!(result.attempted_providers(), vec!["slow"]);
        assert_eq!(result.attempts[0].error_kind(), Some(ErrorKind::Timeout));
        assert!(elapsed < Duration::from_secs(2), "took {:?}", elapsed);
    }

    #[tokio::test]
    async fn test_probe_classifies_backends() {
        let healthy = backends::openai_replying("pong").await;
        let broken = backends::openai_rejecting(500, "down").await;

        let h = harness(vec![
            ProviderFactory::openai("ok", 1, backends::openai_endpoint(&healthy)),
            ProviderFactory::openai("broken", 2, backends::openai_endpoint(&broken)),
        ]);

        let samples = h.monitor.probe_all().await;
        assert_eq!(samples.len(), 2);

        let snapshot = h.monitor.snapshot();
        assert!(snapshot.status("ok").is_preferred());
        assert!(!snapshot.status("broken").is_preferred());

        let order: Vec<String> = h
            .router
            .candidates(&RoutingRequest::new(UseCase::General, "x"))
            .into_iter()
            .map(|p| p.id)
            .collect();
        assert_eq!(order, vec!["ok", "broken"]);
    }
}
