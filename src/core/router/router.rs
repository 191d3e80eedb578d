//! Failover router
//!
//! Drives the candidate list through the call executor one provider at a time
//! under a shared deadline, stopping at the first success.

use super::config::RouterConfig;
use super::error::ExhaustionReason;
use super::selection::select;
use super::types::{Attempt, AttemptOutcome, RoutingRequest, RoutingResult};
use crate::core::conversation_log::{ConversationLogger, ConversationRecord};
use crate::core::health::{HealthMonitor, HealthSnapshot};
use crate::core::providers::{CallExecutor, CompletionRequest};
use crate::core::registry::{Provider, ProviderRegistry};
use crate::core::settings::SettingsHandle;
use chrono::Utc;
use std::sync::Arc;
use std::time::{Duration, Instant};
use tracing::{debug, info, warn};

/// Failover router
pub struct Router {
    registry: Arc<ProviderRegistry>,
    executor: Arc<CallExecutor>,
    health: Option<Arc<HealthMonitor>>,
    settings: SettingsHandle,
    config: RouterConfig,
    conversation_log: Option<ConversationLogger>,
}

impl Router {
    pub fn new(registry: Arc<ProviderRegistry>, executor: Arc<CallExecutor>) -> Self {
        Self {
            registry,
            executor,
            health: None,
            settings: SettingsHandle::default(),
            config: RouterConfig::default(),
            conversation_log: None,
        }
    }

    /// Use health data for candidate ordering (builder pattern)
    pub fn with_health(mut self, health: Arc<HealthMonitor>) -> Self {
        self.health = Some(health);
        self
    }

    /// Share runtime settings (builder pattern)
    pub fn with_settings(mut self, settings: SettingsHandle) -> Self {
        self.settings = settings;
        self
    }

    /// Set router configuration (builder pattern)
    pub fn with_config(mut self, config: RouterConfig) -> Self {
        self.config = config;
        self
    }

    /// Forward outcomes to a conversation logger (builder pattern)
    pub fn with_conversation_logger(mut self, logger: ConversationLogger) -> Self {
        self.conversation_log = Some(logger);
        self
    }

    pub fn config(&self) -> &RouterConfig {
        &self.config
    }

    pub fn registry(&self) -> &Arc<ProviderRegistry> {
        &self.registry
    }

    /// Candidates for a use case given the current registry and health
    pub fn candidates(&self, request: &RoutingRequest) -> Vec<Provider> {
        let registry = self.registry.snapshot();
        let health = self
            .health
            .as_ref()
            .map(|monitor| monitor.snapshot())
            .unwrap_or_else(HealthSnapshot::new);
        select(request.use_case, &registry, &health)
    }

    /// Route a request
    ///
    /// Never fails: total failure is a result with no provider and an
    /// [`ExhaustionReason`]. Candidates are attempted in selection order, each
    /// limited to the budget left at its start.
    pub async fn route(&self, request: RoutingRequest) -> RoutingResult {
        let started = Instant::now();
        let budget = self.config.effective_budget(request.time_budget);
        let settings = self.settings.current();

        let mut candidates = self.candidates(&request);
        if !settings.auto_failover_enabled {
            candidates.truncate(1);
        }

        debug!(
            request_id = %request.request_id,
            use_case = %request.use_case,
            candidates = candidates.len(),
            budget_ms = budget.as_millis() as u64,
            "Routing request"
        );

        let completion = build_completion(&request);
        let mut attempts = Vec::with_capacity(candidates.len());
        let mut success: Option<(String, String)> = None;
        let mut budget_exhausted = false;

        for provider in &candidates {
            let remaining = budget.saturating_sub(started.elapsed());
            if remaining.is_zero() {
                budget_exhausted = true;
                break;
            }

            let attempt_started = Instant::now();
            let result = self.executor.execute(provider, &completion, remaining).await;
            let latency_ms = attempt_started.elapsed().as_millis() as u64;

            match result {
                Ok(text) => {
                    info!(
                        request_id = %request.request_id,
                        provider_id = %provider.id,
                        latency_ms,
                        "Provider call succeeded"
                    );
                    attempts.push(Attempt {
                        provider_id: provider.id.clone(),
                        outcome: AttemptOutcome::Ok,
                        latency_ms,
                    });
                    success = Some((provider.id.clone(), text));
                    break;
                }
                Err(err) => {
                    warn!(
                        request_id = %request.request_id,
                        provider_id = %provider.id,
                        error_kind = %err.kind(),
                        latency_ms,
                        "Provider call failed: {}",
                        err
                    );
                    attempts.push(Attempt {
                        provider_id: provider.id.clone(),
                        outcome: AttemptOutcome::from(&err),
                        latency_ms,
                    });
                }
            }
        }

        // The last candidate may have consumed what was left
        if success.is_none() && !candidates.is_empty() && started.elapsed() >= budget {
            budget_exhausted = true;
        }

        let exhaustion = match &success {
            Some(_) => None,
            None if candidates.is_empty() => Some(ExhaustionReason::NoCandidates),
            None if budget_exhausted => Some(ExhaustionReason::BudgetExhausted),
            None => Some(ExhaustionReason::CandidatesFailed),
        };
        if let Some(reason) = exhaustion {
            warn!(
                request_id = %request.request_id,
                use_case = %request.use_case,
                attempts = attempts.len(),
                "Routing exhausted: {:?}",
                reason
            );
        }

        let (provider_used, text) = match success {
            Some((provider_id, text)) => (Some(provider_id), Some(text)),
            None => (None, None),
        };

        let result = RoutingResult {
            request_id: request.request_id.clone(),
            text,
            provider_used,
            attempts,
            elapsed_ms: started.elapsed().as_millis() as u64,
            exhaustion,
        };

        self.log_conversation(&request, &result, budget);
        result
    }

    fn log_conversation(&self, request: &RoutingRequest, result: &RoutingResult, budget: Duration) {
        let Some(logger) = &self.conversation_log else {
            return;
        };
        let (session_id, user_hash) = match &request.session {
            Some(session) => (session.session_id.clone(), session.user_hash.clone()),
            None => (request.request_id.clone(), String::new()),
        };

        logger.log(ConversationRecord {
            session_id,
            user_hash,
            request: request.prompt.clone(),
            response: result.text.clone(),
            provider_used: result.provider_used.clone(),
            timestamp: Utc::now(),
            metadata: serde_json::json!({
                "request_id": request.request_id,
                "use_case": request.use_case,
                "attempts": result.attempts,
                "elapsed_ms": result.elapsed_ms,
                "time_budget_ms": budget.as_millis() as u64,
                "exhaustion": result.exhaustion,
            }),
        });
    }
}

fn build_completion(request: &RoutingRequest) -> CompletionRequest {
    let completion = CompletionRequest::new(request.prompt.clone());
    match &request.system_prompt {
        Some(system) => completion.with_system_prompt(system.clone()),
        None => completion,
    }
}

impl std::fmt::Debug for Router {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("Router")
            .field("providers", &self.registry.len())
            .field("config", &self.config)
            .finish_non_exhaustive()
    }
}
