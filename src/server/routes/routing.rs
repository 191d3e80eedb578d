//! Routing endpoint
//!
//! Feature code posts a prompt with its use case and receives the first
//! successful completion along with the attempt log. When every candidate
//! fails the configured static fallback answers instead, unless static
//! fallback is disabled, in which case the response is a 503 carrying the
//! same body without text.

use crate::core::conversation_log::hash_user_id;
use crate::core::router::{
    Attempt, AttemptOutcome, ErrorKind, ExhaustionReason, RoutingRequest, RoutingResult,
    SessionContext,
};
use crate::core::types::{ProviderId, UseCase};
use crate::server::state::AppState;
use crate::utils::error::GatewayError;
use actix_web::{HttpResponse, Result as ActixResult, web};
use serde::{Deserialize, Serialize};
use std::time::Duration;
use tracing::{info, warn};

/// Configure routing routes
pub fn configure_routes(cfg: &mut web::ServiceConfig) {
    cfg.service(web::scope("/v1").route("/route", web::post().to(route)));
}

/// Routing request body
#[derive(Debug, Clone, Deserialize)]
pub struct RouteRequest {
    #[serde(default)]
    pub use_case: UseCase,
    pub prompt: String,
    #[serde(default)]
    pub system_prompt: Option<String>,
    #[serde(default)]
    pub time_budget_ms: Option<u64>,
    #[serde(default)]
    pub session_id: Option<String>,
    /// Hashed before it leaves the handler
    #[serde(default)]
    pub user_id: Option<String>,
}

impl RouteRequest {
    fn into_routing_request(self) -> Result<RoutingRequest, GatewayError> {
        if self.prompt.trim().is_empty() {
            return Err(GatewayError::Validation("prompt cannot be empty".to_string()));
        }

        let mut request = RoutingRequest::new(self.use_case, self.prompt);
        if let Some(system_prompt) = self.system_prompt {
            request = request.with_system_prompt(system_prompt);
        }
        if let Some(budget_ms) = self.time_budget_ms {
            request = request.with_time_budget(Duration::from_millis(budget_ms));
        }
        if self.session_id.is_some() || self.user_id.is_some() {
            let session = SessionContext {
                session_id: self
                    .session_id
                    .unwrap_or_else(|| request.request_id.clone()),
                user_hash: self.user_id.as_deref().map(hash_user_id).unwrap_or_default(),
            };
            request = request.with_session(session);
        }
        Ok(request)
    }
}

/// One attempt as reported to callers
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct AttemptView {
    pub provider_id: ProviderId,
    /// `ok` or `err`
    pub outcome: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub error_kind: Option<ErrorKind>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub detail: Option<String>,
    pub latency_ms: u64,
}

impl From<&Attempt> for AttemptView {
    fn from(attempt: &Attempt) -> Self {
        let (outcome, error_kind, detail) = match &attempt.outcome {
            AttemptOutcome::Ok => ("ok", None, None),
            AttemptOutcome::Err { kind, detail } => ("err", Some(*kind), Some(detail.clone())),
        };
        Self {
            provider_id: attempt.provider_id.clone(),
            outcome: outcome.to_string(),
            error_kind,
            detail,
            latency_ms: attempt.latency_ms,
        }
    }
}

/// Routing response body
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct RouteResponse {
    pub request_id: String,
    pub text: Option<String>,
    pub provider_used: Option<ProviderId>,
    pub attempts: Vec<AttemptView>,
    pub elapsed_ms: u64,
    /// True when `text` came from the static fallback
    pub fallback_used: bool,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub exhaustion: Option<ExhaustionReason>,
}

impl RouteResponse {
    fn from_result(result: RoutingResult, fallback_text: Option<String>) -> Self {
        let fallback_used = fallback_text.is_some();
        Self {
            request_id: result.request_id,
            text: result.text.or(fallback_text),
            provider_used: result.provider_used,
            attempts: result.attempts.iter().map(AttemptView::from).collect(),
            elapsed_ms: result.elapsed_ms,
            fallback_used,
            exhaustion: result.exhaustion,
        }
    }
}

/// Route a prompt through the provider chain
pub async fn route(
    state: web::Data<AppState>,
    body: web::Json<RouteRequest>,
) -> ActixResult<HttpResponse> {
    let body = body.into_inner();
    let use_case = body.use_case;
    let prompt = body.prompt.clone();
    let request = body.into_routing_request()?;

    let result = state.router.route(request).await;

    if result.is_success() {
        info!(
            request_id = %result.request_id,
            provider_used = ?result.provider_used,
            attempts = result.attempts.len(),
            "Routed request"
        );
        return Ok(HttpResponse::Ok().json(RouteResponse::from_result(result, None)));
    }

    if state.settings.current().fallback_to_static_responses {
        let text = state.fallback.respond(use_case, &prompt);
        warn!(
            request_id = %result.request_id,
            use_case = %use_case,
            "All providers failed, serving static fallback"
        );
        return Ok(HttpResponse::Ok().json(RouteResponse::from_result(result, Some(text))));
    }

    warn!(
        request_id = %result.request_id,
        use_case = %use_case,
        "All providers failed and static fallback is disabled"
    );
    Ok(HttpResponse::ServiceUnavailable().json(RouteResponse::from_result(result, None)))
}
