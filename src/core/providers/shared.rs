//! Shared HTTP plumbing for the backend adapters

use super::error::CallError;
use reqwest::{Client, RequestBuilder};
use serde_json::Value;
use std::time::{Duration, Instant};

/// Longest backend error body kept in a [`CallError`]
const MAX_ERROR_BODY_CHARS: usize = 300;

/// HTTP client used by all adapters
///
/// No overall request timeout is set here: the executor bounds every call with
/// the smaller of the provider timeout and the remaining routing budget.
pub fn build_http_client(connect_timeout: Duration) -> Result<Client, CallError> {
    Client::builder()
        .connect_timeout(connect_timeout)
        .user_agent(concat!("failover-gateway/", env!("CARGO_PKG_VERSION")))
        .build()
        .map_err(|e| CallError::config(format!("Failed to build HTTP client: {}", e)))
}

/// Send a JSON request and return the parsed success body
pub(crate) async fn send_json(request: RequestBuilder) -> Result<Value, CallError> {
    let started = Instant::now();

    let response = request
        .send()
        .await
        .map_err(|e| map_transport_error(e, started))?;

    let status = response.status();
    let body = response
        .text()
        .await
        .map_err(|e| map_transport_error(e, started))?;

    if !status.is_success() {
        return Err(CallError::backend_rejected(
            status.as_u16(),
            extract_error_message(&body),
        ));
    }

    serde_json::from_str(&body).map_err(|e| {
        CallError::backend_rejected(status.as_u16(), format!("Invalid JSON response: {}", e))
    })
}

fn map_transport_error(error: reqwest::Error, started: Instant) -> CallError {
    // Request URLs may carry credentials (Gemini `key` parameter)
    let error = error.without_url();
    if error.is_timeout() {
        CallError::timeout(started.elapsed())
    } else if error.is_decode() || error.is_body() {
        CallError::backend_rejected(0, format!("Failed to read response: {}", error))
    } else {
        CallError::unreachable(error.to_string())
    }
}

/// Best-effort human readable message from a backend error body
pub(crate) fn extract_error_message(body: &str) -> String {
    if let Ok(value) = serde_json::from_str::<Value>(body) {
        let message = value
            .pointer("/error/message")
            .or_else(|| value.get("error").filter(|e| e.is_string()))
            .or_else(|| value.get("message"))
            .and_then(Value::as_str);
        if let Some(message) = message {
            return truncate(message);
        }
    }

    if body.trim().is_empty() {
        "empty error body".to_string()
    } else {
        truncate(body.trim())
    }
}

fn truncate(text: &str) -> String {
    match text.char_indices().nth(MAX_ERROR_BODY_CHARS) {
        Some((idx, _)) => format!("{}...", &text[..idx]),
        None => text.to_string(),
    }
}

/// Reject missing or blank model output
pub(crate) fn non_empty_text(text: Option<&str>) -> Result<String, CallError> {
    match text.map(str::trim) {
        Some(text) if !text.is_empty() => Ok(text.to_string()),
        _ => Err(CallError::backend_rejected(
            200,
            "Backend returned no text output",
        )),
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_extract_error_message_nested() {
        let body = r#"{"error":{"type":"authentication_error","message":"invalid x-api-key"}}"#;
        assert_eq!(extract_error_message(body), "invalid x-api-key");
    }

    #[test]
    fn test_extract_error_message_flat() {
        assert_eq!(extract_error_message(r#"{"error":"quota"}"#), "quota");
        assert_eq!(extract_error_message(r#"{"message":"nope"}"#), "nope");
    }

    #[test]
    fn test_extract_error_message_plain_text() {
        assert_eq!(extract_error_message("  Bad Gateway "), "Bad Gateway");
        assert_eq!(extract_error_message(""), "empty error body");

        let long = "x".repeat(1000);
        let message = extract_error_message(&long);
        assert!(message.ends_with("..."));
        assert_eq!(message.len(), MAX_ERROR_BODY_CHARS + 3);
    }

    #[test]
    fn test_non_empty_text() {
        assert_eq!(non_empty_text(Some(" hi ")).unwrap(), "hi");
        assert!(matches!(
            non_empty_text(Some("   ")),
            Err(CallError::BackendRejected { status: 200, .. })
        ));
        assert!(non_empty_text(None).is_err());
    }
}
