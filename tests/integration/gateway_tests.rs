//! Gateway wiring, persistence and conversation logging

#[cfg(test)]
mod tests {
    use crate::common::backends;
    use crate::common::fixtures::TEST_API_KEY;
    use failover_gateway::config::{Config, GatewayConfig, HealthConfig};
    use failover_gateway::core::registry::{Provider, ProviderInput};
    use failover_gateway::core::router::RoutingRequest;
    use failover_gateway::core::router::SessionContext;
    use failover_gateway::core::settings::SettingsUpdate;
    use failover_gateway::core::types::{CredentialRef, ProviderType, UseCase};
    use failover_gateway::server::AppState;
    use failover_gateway::storage::{JsonFileStore, StateStore, StoredState};
    use std::path::Path;
    use std::time::Duration;

    fn seed(id: &str, endpoint: String) -> ProviderInput {
        ProviderInput {
            id: Some(id.to_string()),
            name: Some(format!("Seed {}", id)),
            provider_type: Some(ProviderType::OpenAi),
            model: Some("gpt-4o-mini".to_string()),
            endpoint: Some(endpoint),
            credential_ref: Some(CredentialRef::new(TEST_API_KEY)),
            ..Default::default()
        }
    }

    fn config(store_path: &Path, seeds: Vec<ProviderInput>) -> Config {
        let mut gateway = GatewayConfig {
            providers: seeds,
            health: HealthConfig {
                run_on_start: false,
                ..Default::default()
            },
            ..Default::default()
        };
        gateway.store.path = Some(store_path.to_path_buf());
        Config { gateway }
    }

    #[tokio::test]
    async fn test_seeds_are_persisted_and_stored_state_wins_on_restart() {
        let backend = backends::openai_replying("seeded answer").await;
        let dir = tempfile::tempdir().unwrap();
        let store_path = dir.path().join("state.json");

        let state = crate::assert_ok!(
            AppState::build(&config(&store_path, vec![seed("first", backends::openai_endpoint(&backend))])).await
        );
        let result = state
            .router
            .route(RoutingRequest::new(UseCase::Chatbot, "Hello"))
            .await;
        assert_eq!(result.provider_used.as_deref(), Some("first"));

        state
            .providers
            .update_settings(SettingsUpdate {
                auto_failover_enabled: Some(false),
                ..Default::default()
            })
            .await
            .unwrap();

        let stored = JsonFileStore::new(&store_path).load().await.unwrap().unwrap();
        assert_eq!(stored.providers.len(), 1);
        assert_eq!(stored.providers[0].credential_ref.expose_secret(), TEST_API_KEY);
        assert!(!stored.settings.auto_failover_enabled);

        // Different seeds on restart are ignored in favour of the stored records
        let restarted = crate::assert_ok!(
            AppState::build(&config(&store_path, vec![seed("second", backends::openai_endpoint(&backend))])).await
        );
        let ids: Vec<String> = restarted.providers.list().into_iter().map(|p| p.id).collect();
        assert_eq!(ids, vec!["first"]);
        assert!(!restarted.settings.current().auto_failover_enabled);
    }

    #[tokio::test]
    async fn test_invalid_seed_fails_startup() {
        let dir = tempfile::tempdir().unwrap();
        let invalid = ProviderInput {
            endpoint: Some("not a url".to_string()),
            ..seed("broken", String::new())
        };

        let err = crate::assert_err!(
            AppState::build(&config(&dir.path().join("state.json"), vec![invalid]))
                .await
                .map(|_| ())
        );
        assert!(err.to_string().contains("endpoint"), "{}", err);
    }

    #[tokio::test]
    async fn test_startup_survives_unusable_stored_provider() {
        let backend = backends::openai_replying("still routing").await;
        let dir = tempfile::tempdir().unwrap();
        let store_path = dir.path().join("state.json");

        let stored = StoredState {
            providers: vec![
                Provider::new("usable", "Usable", ProviderType::OpenAi, "gpt-4o-mini")
                    .with_endpoint(backends::openai_endpoint(&backend))
                    .with_credential(CredentialRef::new(TEST_API_KEY)),
                Provider::new("keyless", "Keyless", ProviderType::OpenAi, "gpt-4o-mini")
                    .with_priority(0),
            ],
            ..Default::default()
        };
        JsonFileStore::new(&store_path).save(&stored).await.unwrap();

        let state = crate::assert_ok!(AppState::build(&config(&store_path, vec![])).await);

        let keyless = state.providers.get("keyless").unwrap();
        assert!(!keyless.enabled);
        let result = state
            .router
            .route(RoutingRequest::new(UseCase::General, "Hello"))
            .await;
        assert_eq!(result.provider_used.as_deref(), Some("usable"));
        assert_eq!(result.attempted_providers(), vec!["usable"]);
    }

    #[tokio::test]
    async fn test_conversation_log_is_delivered_without_blocking_routing() {
        let backend = backends::openai_replying("logged answer").await;
        let log_server = wiremock::MockServer::start().await;
        wiremock::Mock::given(wiremock::matchers::method("POST"))
            .and(wiremock::matchers::path("/api/conversations"))
            .respond_with(wiremock::ResponseTemplate::new(200))
            .mount(&log_server)
            .await;

        let dir = tempfile::tempdir().unwrap();
        let mut config = config(
            &dir.path().join("state.json"),
            vec![seed("logged", backends::openai_endpoint(&backend))],
        );
        config.gateway.conversation_log.endpoint =
            Some(format!("{}/api/conversations", log_server.uri()));

        let state = AppState::build(&config).await.unwrap();
        let request = RoutingRequest::new(UseCase::Assessment, "Assess this").with_session(
            SessionContext {
                session_id: "session-7".to_string(),
                user_hash: "abc123".to_string(),
            },
        );
        let result = state.router.route(request).await;
        assert_eq!(result.provider_used.as_deref(), Some("logged"));

        let mut delivered = Vec::new();
        for _ in 0..50 {
            delivered = log_server.received_requests().await.unwrap_or_default();
            if !delivered.is_empty() {
                break;
            }
            tokio::time::sleep(Duration::from_millis(20)).await;
        }

        assert_eq!(delivered.len(), 1);
        let body: serde_json::Value = serde_json::from_slice(&delivered[0].body).unwrap();
        assert_eq!(body["action"], "log_conversation");
        assert_eq!(body["data"]["session_id"], "session-7");
        assert_eq!(body["data"]["user_hash"], "abc123");
        assert_eq!(body["data"]["provider_used"], "logged");
        assert_eq!(body["data"]["response"], "logged answer");
        assert!(!body.to_string().contains(TEST_API_KEY));
    }
}
