//! Mock Groq backend for integration tests
//!
//! Serves the OpenAI-compatible chat completion route with a canned story

use std::net::SocketAddr;
use std::sync::{Arc, Mutex};
use std::time::Duration;

use axum::extract::State;
use axum::http::{HeaderMap, StatusCode};
use axum::response::IntoResponse;
use axum::{Json, Router, routing};
use tokio_util::sync::CancellationToken;

/// Mock completion backend
pub struct MockGroq {
    addr: SocketAddr,
    shutdown: CancellationToken,
    state: Arc<MockGroqState>,
}

struct MockGroqState {
    /// Story returned as the first choice's content
    content: String,
    /// Delay before answering
    delay: Duration,
    /// Answer every request with this status instead of a completion
    failure: Option<StatusCode>,
    /// Request bodies received so far
    requests: Mutex<Vec<serde_json::Value>>,
    /// Authorization headers received so far
    authorizations: Mutex<Vec<String>>,
}

impl MockGroq {
    /// Start a mock that answers every request with `content`
    pub async fn start(content: &str) -> anyhow::Result<Self> {
        Self::start_inner(content, Duration::ZERO, None).await
    }

    /// Start a mock that waits `delay` before answering
    pub async fn start_slow(content: &str, delay: Duration) -> anyhow::Result<Self> {
        Self::start_inner(content, delay, None).await
    }

    /// Start a mock that fails every request with `status`
    pub async fn start_failing(status: StatusCode) -> anyhow::Result<Self> {
        Self::start_inner("", Duration::ZERO, Some(status)).await
    }

    async fn start_inner(content: &str, delay: Duration, failure: Option<StatusCode>) -> anyhow::Result<Self> {
        let state = Arc::new(MockGroqState {
            content: content.to_owned(),
            delay,
            failure,
            requests: Mutex::new(Vec::new()),
            authorizations: Mutex::new(Vec::new()),
        });

        let app = Router::new()
            .route("/openai/v1/chat/completions", routing::post(handle_completion))
            .with_state(Arc::clone(&state));

        let listener = tokio::net::TcpListener::bind("127.0.0.1:0").await?;
        let addr = listener.local_addr()?;
        let shutdown = CancellationToken::new();
        let shutdown_clone = shutdown.clone();

        tokio::spawn(async move {
            axum::serve(listener, app)
                .with_graceful_shutdown(async move { shutdown_clone.cancelled().await })
                .await
                .ok();
        });

        Ok(Self { addr, shutdown, state })
    }

    /// Base URL to configure as the story provider
    pub fn base_url(&self) -> String {
        format!("http://{}/openai/v1", self.addr)
    }

    /// Number of completion requests received
    pub fn request_count(&self) -> usize {
        self.state.requests.lock().unwrap().len()
    }

    /// Body of the most recent completion request
    pub fn last_request(&self) -> Option<serde_json::Value> {
        self.state.requests.lock().unwrap().last().cloned()
    }

    /// Authorization header of the most recent request
    pub fn last_authorization(&self) -> Option<String> {
        self.state.authorizations.lock().unwrap().last().cloned()
    }
}

impl Drop for MockGroq {
    fn drop(&mut self) {
        self.shutdown.cancel();
    }
}

async fn handle_completion(
    State(state): State<Arc<MockGroqState>>,
    headers: HeaderMap,
    Json(body): Json<serde_json::Value>,
) -> impl IntoResponse {
    state.requests.lock().unwrap().push(body);
    if let Some(value) = headers.get("authorization").and_then(|v| v.to_str().ok()) {
        state.authorizations.lock().unwrap().push(value.to_owned());
    }

    tokio::time::sleep(state.delay).await;

    if let Some(status) = state.failure {
        return (status, Json(serde_json::json!({ "error": { "message": "mock failure" } }))).into_response();
    }

    Json(serde_json::json!({
        "id": "chatcmpl-mock",
        "object": "chat.completion",
        "model": "llama3-8b-8192",
        "choices": [{
            "index": 0,
            "message": { "role": "assistant", "content": state.content },
            "finish_reason": "stop"
        }],
        "usage": { "prompt_tokens": 10, "completion_tokens": 20, "total_tokens": 30 }
    }))
    .into_response()
}
