//! Routing request and result types

use super::error::{ErrorKind, ExhaustionReason};
use crate::core::providers::CallError;
use crate::core::types::{ProviderId, UseCase};
use serde::{Deserialize, Serialize};
use std::time::Duration;

/// Caller identity carried through to the conversation log
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct SessionContext {
    pub session_id: String,
    /// SHA-256 hex digest of the caller's user id
    pub user_hash: String,
}

/// One routing call
#[derive(Debug, Clone, PartialEq)]
pub struct RoutingRequest {
    pub request_id: String,
    pub use_case: UseCase,
    pub prompt: String,
    pub system_prompt: Option<String>,
    /// Falls back to the router default when absent
    pub time_budget: Option<Duration>,
    pub session: Option<SessionContext>,
}

impl RoutingRequest {
    pub fn new(use_case: UseCase, prompt: impl Into<String>) -> Self {
        Self {
            request_id: uuid::Uuid::new_v4().to_string(),
            use_case,
            prompt: prompt.into(),
            system_prompt: None,
            time_budget: None,
            session: None,
        }
    }

    pub fn with_system_prompt(mut self, system_prompt: impl Into<String>) -> Self {
        self.system_prompt = Some(system_prompt.into());
        self
    }

    pub fn with_time_budget(mut self, budget: Duration) -> Self {
        self.time_budget = Some(budget);
        self
    }

    pub fn with_session(mut self, session: SessionContext) -> Self {
        self.session = Some(session);
        self
    }
}

/// Outcome of one attempt
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(tag = "status", rename_all = "snake_case")]
pub enum AttemptOutcome {
    Ok,
    Err { kind: ErrorKind, detail: String },
}

impl From<&CallError> for AttemptOutcome {
    fn from(error: &CallError) -> Self {
        AttemptOutcome::Err {
            kind: error.kind(),
            detail: error.to_string(),
        }
    }
}

/// One entry of the attempt log
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Attempt {
    pub provider_id: ProviderId,
    pub outcome: AttemptOutcome,
    pub latency_ms: u64,
}

impl Attempt {
    pub fn is_ok(&self) -> bool {
        matches!(self.outcome, AttemptOutcome::Ok)
    }

    pub fn error_kind(&self) -> Option<ErrorKind> {
        match &self.outcome {
            AttemptOutcome::Ok => None,
            AttemptOutcome::Err { kind, .. } => Some(*kind),
        }
    }
}

/// Result of a routing call
///
/// Success and exhaustion share this shape: exhaustion has no text, no
/// provider and an [`ExhaustionReason`].
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct RoutingResult {
    pub request_id: String,
    pub text: Option<String>,
    pub provider_used: Option<ProviderId>,
    /// Attempts in the order they were made
    pub attempts: Vec<Attempt>,
    pub elapsed_ms: u64,
    pub exhaustion: Option<ExhaustionReason>,
}

impl RoutingResult {
    pub fn is_success(&self) -> bool {
        self.provider_used.is_some()
    }

    pub fn is_exhausted(&self) -> bool {
        self.exhaustion.is_some()
    }

    /// Provider ids in attempt order
    pub fn attempted_providers(&self) -> Vec<&str> {
        self.attempts.iter().map(|a| a.provider_id.as_str()).collect()
    }
}
