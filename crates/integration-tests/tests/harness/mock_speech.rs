//! Mock ElevenLabs backend for integration tests
//!
//! Answers each synthesis request with a fake MP3 payload derived from the
//! text, so tests can tell which segments ended up in the output.

use std::net::SocketAddr;
use std::sync::{Arc, Mutex};

use axum::extract::{Path, Query, State};
use axum::http::{HeaderMap, StatusCode, header};
use axum::response::IntoResponse;
use axum::{Json, Router, routing};
use serde::Deserialize;
use tokio_util::sync::CancellationToken;

/// Mock speech backend
pub struct MockSpeech {
    addr: SocketAddr,
    shutdown: CancellationToken,
    state: Arc<MockSpeechState>,
}

#[derive(Default)]
struct MockSpeechState {
    /// Fail any request whose text contains this needle
    fail_on: Option<String>,
    /// Synthesis requests received so far
    calls: Mutex<Vec<SpeechCall>>,
}

/// One synthesis request as the backend saw it
#[derive(Debug, Clone)]
pub struct SpeechCall {
    pub voice_id: String,
    pub text: String,
    pub output_format: Option<String>,
    pub api_key: Option<String>,
}

#[derive(Deserialize)]
struct SynthesisQuery {
    output_format: Option<String>,
}

#[derive(Deserialize)]
struct SynthesisBody {
    text: String,
}

impl MockSpeech {
    pub async fn start() -> anyhow::Result<Self> {
        Self::start_inner(MockSpeechState::default()).await
    }

    /// Start a mock that returns 500 for texts containing `needle`
    pub async fn start_failing_on(needle: &str) -> anyhow::Result<Self> {
        Self::start_inner(MockSpeechState {
            fail_on: Some(needle.to_owned()),
            ..MockSpeechState::default()
        })
        .await
    }

    async fn start_inner(state: MockSpeechState) -> anyhow::Result<Self> {
        let state = Arc::new(state);

        let app = Router::new()
            .route("/v1/text-to-speech/{voice_id}/stream", routing::post(handle_synthesis))
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

    /// Base URL to configure as the speech provider
    pub fn base_url(&self) -> String {
        format!("http://{}/v1", self.addr)
    }

    pub fn calls(&self) -> Vec<SpeechCall> {
        self.state.calls.lock().unwrap().clone()
    }

    /// Texts sent for synthesis, in arrival order
    pub fn texts(&self) -> Vec<String> {
        self.calls().into_iter().map(|call| call.text).collect()
    }

    /// The payload this mock returns for `text`
    pub fn audio_for(text: &str) -> Vec<u8> {
        format!("[{text}]").into_bytes()
    }
}

impl Drop for MockSpeech {
    fn drop(&mut self) {
        self.shutdown.cancel();
    }
}

async fn handle_synthesis(
    State(state): State<Arc<MockSpeechState>>,
    Path(voice_id): Path<String>,
    Query(query): Query<SynthesisQuery>,
    headers: HeaderMap,
    Json(body): Json<SynthesisBody>,
) -> impl IntoResponse {
    state.calls.lock().unwrap().push(SpeechCall {
        voice_id,
        text: body.text.clone(),
        output_format: query.output_format,
        api_key: headers
            .get("xi-api-key")
            .and_then(|v| v.to_str().ok())
            .map(ToOwned::to_owned),
    });

    if state.fail_on.as_deref().is_some_and(|needle| body.text.contains(needle)) {
        return (
            StatusCode::INTERNAL_SERVER_ERROR,
            Json(serde_json::json!({ "detail": "mock synthesis failure" })),
        )
            .into_response();
    }

    ([(header::CONTENT_TYPE, "audio/mpeg")], MockSpeech::audio_for(&body.text)).into_response()
}
