//! Routing error taxonomy
//!
//! Per-candidate failures are recorded as [`ErrorKind`]s in the attempt log.
//! Terminal failure is reported as an [`ExhaustionReason`] on the routing
//! result, never as an `Err`.

use serde::{Deserialize, Serialize};
use std::fmt;

/// Classification of a failure
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum ErrorKind {
    /// Bad or missing credential, malformed provider record
    ConfigError,
    Timeout,
    /// Network or DNS failure
    Unreachable,
    /// Backend answered with an error or unusable output
    BackendRejected,
    /// Selection produced an empty candidate list
    NoCandidates,
    /// Time budget spent before any success
    BudgetExhausted,
}

impl ErrorKind {
    pub fn as_str(&self) -> &'static str {
        match self {
            ErrorKind::ConfigError => "config_error",
            ErrorKind::Timeout => "timeout",
            ErrorKind::Unreachable => "unreachable",
            ErrorKind::BackendRejected => "backend_rejected",
            ErrorKind::NoCandidates => "no_candidates",
            ErrorKind::BudgetExhausted => "budget_exhausted",
        }
    }
}

impl fmt::Display for ErrorKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Why a routing call ended without a response
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum ExhaustionReason {
    /// No enabled provider for the use case or the general pool
    NoCandidates,
    /// The budget ran out with candidates left untried
    BudgetExhausted,
    /// Every attempted candidate failed
    CandidatesFailed,
}

impl ExhaustionReason {
    /// Error kind reported for this terminal outcome
    pub fn kind(&self) -> Option<ErrorKind> {
        match self {
            ExhaustionReason::NoCandidates => Some(ErrorKind::NoCandidates),
            ExhaustionReason::BudgetExhausted => Some(ErrorKind::BudgetExhausted),
            ExhaustionReason::CandidatesFailed => None,
        }
    }
}
