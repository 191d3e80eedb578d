//! Mock provider backends

use super::fixtures::TEST_API_KEY;
use serde_json::json;
use std::time::Duration;
use wiremock::matchers::{header, method, path};
use wiremock::{Mock, MockServer, ResponseTemplate};

const OPENAI_PATH: &str = "/v1/chat/completions";
const ANTHROPIC_PATH: &str = "/v1/messages";

pub fn openai_endpoint(server: &MockServer) -> String {
    format!("{}{}", server.uri(), OPENAI_PATH)
}

pub fn anthropic_endpoint(server: &MockServer) -> String {
    format!("{}{}", server.uri(), ANTHROPIC_PATH)
}

/// OpenAI-compatible backend answering every chat completion with `reply`
pub async fn openai_replying(reply: &str) -> MockServer {
    let server = MockServer::start().await;
    Mock::given(method("POST"))
        .and(path(OPENAI_PATH))
        .and(header("authorization", format!("Bearer {}", TEST_API_KEY).as_str()))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!({
            "choices": [{ "message": { "role": "assistant", "content": reply } }]
        })))
        .mount(&server)
        .await;
    server
}

/// OpenAI-compatible backend rejecting every call
pub async fn openai_rejecting(status: u16, message: &str) -> MockServer {
    let server = MockServer::start().await;
    Mock::given(method("POST"))
        .and(path(OPENAI_PATH))
        .respond_with(ResponseTemplate::new(status).set_body_json(json!({
            "error": { "message": message, "type": "server_error" }
        })))
        .mount(&server)
        .await;
    server
}

/// OpenAI-compatible backend that answers only after `delay`
pub async fn openai_slow(reply: &str, delay: Duration) -> MockServer {
    let server = MockServer::start().await;
    Mock::given(method("POST"))
        .and(path(OPENAI_PATH))
        .respond_with(
            ResponseTemplate::new(200)
                .set_body_json(json!({
                    "choices": [{ "message": { "role": "assistant", "content": reply } }]
                }))
                .set_delay(delay),
        )
        .mount(&server)
        .await;
    server
}

/// Anthropic Messages backend answering with `reply`
pub async fn anthropic_replying(reply: &str) -> MockServer {
    let server = MockServer::start().await;
    Mock::given(method("POST"))
        .and(path(ANTHROPIC_PATH))
        .and(header("x-api-key", TEST_API_KEY))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!({
            "content": [{ "type": "text", "text": reply }],
            "stop_reason": "end_turn"
        })))
        .mount(&server)
        .await;
    server
}
