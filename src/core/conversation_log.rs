//! Fire-and-forget conversation logging
//!
//! The router hands each routing outcome to a [`ConversationLogger`]; delivery
//! happens on a background task so a slow or failing sink never blocks or
//! fails a routing call. When the buffer is full the record is dropped.

use crate::core::types::ProviderId;
use async_trait::async_trait;
use chrono::{DateTime, Utc};
use reqwest::Client;
use serde::{Deserialize, Serialize};
use sha2::{Digest, Sha256};
use std::sync::Arc;
use tokio::sync::mpsc;
use tokio::task::JoinHandle;
use tracing::{debug, error, info, warn};

/// Buffered records when not configured
pub const DEFAULT_BUFFER_SIZE: usize = 1024;

/// One routing outcome, as delivered to analytics
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ConversationRecord {
    pub session_id: String,
    pub user_hash: String,
    pub request: String,
    pub response: Option<String>,
    pub provider_used: Option<ProviderId>,
    pub timestamp: DateTime<Utc>,
    #[serde(default)]
    pub metadata: serde_json::Value,
}

/// SHA-256 hex digest of a user identifier
pub fn hash_user_id(user_id: &str) -> String {
    hex::encode(Sha256::digest(user_id.as_bytes()))
}

/// Destination for conversation records
#[cfg_attr(test, mockall::automock)]
#[async_trait]
pub trait ConversationSink: Send + Sync {
    async fn deliver(&self, record: &ConversationRecord) -> Result<(), String>;
}

/// Writes a summary of each record to the `conversation_log` tracing target
///
/// Prompt and response text are not logged, only their sizes.
#[derive(Debug, Clone, Default)]
pub struct TracingSink;

#[async_trait]
impl ConversationSink for TracingSink {
    async fn deliver(&self, record: &ConversationRecord) -> Result<(), String> {
        info!(
            target: "conversation_log",
            session_id = %record.session_id,
            user_hash = %record.user_hash,
            provider_used = record.provider_used.as_deref().unwrap_or("none"),
            request_chars = record.request.chars().count(),
            response_chars = record.response.as_ref().map(|r| r.chars().count()).unwrap_or(0),
            "conversation"
        );
        Ok(())
    }
}

/// POSTs `{"action": "log_conversation", "data": record}` to an endpoint
#[derive(Debug, Clone)]
pub struct HttpSink {
    client: Client,
    endpoint: String,
}

impl HttpSink {
    pub fn new(client: Client, endpoint: impl Into<String>) -> Self {
        Self {
            client,
            endpoint: endpoint.into(),
        }
    }
}

#[async_trait]
impl ConversationSink for HttpSink {
    async fn deliver(&self, record: &ConversationRecord) -> Result<(), String> {
        let body = serde_json::json!({
            "action": "log_conversation",
            "data": record,
        });

        let response = self
            .client
            .post(&self.endpoint)
            .json(&body)
            .send()
            .await
            .map_err(|e| format!("Failed to send conversation log: {}", e))?;

        if !response.status().is_success() {
            return Err(format!(
                "Conversation log endpoint returned {}",
                response.status()
            ));
        }
        Ok(())
    }
}

/// Bounded, non-blocking handle to the delivery task
#[derive(Debug, Clone)]
pub struct ConversationLogger {
    sender: mpsc::Sender<ConversationRecord>,
}

impl ConversationLogger {
    /// Start the delivery task
    pub fn spawn(sink: Arc<dyn ConversationSink>, buffer_size: usize) -> (Self, JoinHandle<()>) {
        let (sender, mut receiver) = mpsc::channel::<ConversationRecord>(buffer_size.max(1));

        let handle = tokio::spawn(async move {
            while let Some(record) = receiver.recv().await {
                match sink.deliver(&record).await {
                    Ok(()) => debug!(session_id = %record.session_id, "Delivered conversation log"),
                    Err(e) => warn!(session_id = %record.session_id, "Conversation log delivery failed: {}", e),
                }
            }
            debug!("Conversation log channel closed");
        });

        (Self { sender }, handle)
    }

    /// Queue a record without waiting; returns whether it was accepted
    pub fn log(&self, record: ConversationRecord) -> bool {
        match self.sender.try_send(record) {
            Ok(()) => true,
            Err(mpsc::error::TrySendError::Full(_)) => {
                warn!("Conversation log buffer full, record dropped");
                false
            }
            Err(mpsc::error::TrySendError::Closed(_)) => {
                error!("Conversation log channel closed");
                false
            }
        }
    }
}
