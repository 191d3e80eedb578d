//! Persistence and conversation log configuration

use super::*;
use serde::{Deserialize, Serialize};
use std::path::PathBuf;

/// Durable state store
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct StoreConfig {
    /// JSON document path; state is kept in memory when absent
    #[serde(default)]
    pub path: Option<PathBuf>,
}

/// Conversation logging
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ConversationLogConfig {
    #[serde(default = "default_true")]
    pub enabled: bool,
    /// HTTP endpoint receiving `log_conversation` actions; tracing output when absent
    #[serde(default)]
    pub endpoint: Option<String>,
    /// Records buffered before new ones are dropped
    #[serde(default = "default_conversation_buffer")]
    pub buffer_size: usize,
}

impl Default for ConversationLogConfig {
    fn default() -> Self {
        Self {
            enabled: true,
            endpoint: None,
            buffer_size: default_conversation_buffer(),
        }
    }
}
