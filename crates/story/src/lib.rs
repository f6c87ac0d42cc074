//! Story generation
//!
//! Frames the user's prompt, asks a completion provider for a short story
//! under a deadline and enforces the story length limit.

#![allow(clippy::must_use_candidate, clippy::missing_errors_doc)]

mod error;
mod gateway;
mod genre;
mod http_client;
mod protocol;
mod provider;

use std::sync::Arc;

use axum::{Json, Router, extract::State, routing::post};
use literai_core::ExtractPayload;
use serde::{Deserialize, Serialize};

pub use error::{GENERIC_FAILURE, Result, StoryError};
pub use gateway::StoryGateway;
pub use genre::{Genre, compose_prompt};
pub use provider::{CompletionProvider, groq::GroqProvider};

/// Body of `POST /api/generate-story`
#[derive(Debug, Deserialize)]
pub struct StoryRequest {
    /// What the story should be about; a missing field counts as empty
    #[serde(default)]
    pub prompt: String,
    /// Optional genre, one of [`Genre`]'s display names
    #[serde(default)]
    pub genre: Option<String>,
}

#[derive(Debug, Serialize)]
pub struct StoryResponse {
    pub story: String,
}

/// Build the story gateway from configuration
pub fn build_gateway(config: &literai_config::StoryConfig) -> Arc<StoryGateway> {
    if config.api_key().is_none() {
        tracing::warn!("story API key is missing; story generation will fail until it is configured");
    }

    Arc::new(StoryGateway::from_config(config))
}

/// Create the endpoint router for story generation
pub fn endpoint_router() -> Router<Arc<StoryGateway>> {
    Router::new().route("/api/generate-story", post(generate_story))
}

/// Handle story generation requests
async fn generate_story(
    State(gateway): State<Arc<StoryGateway>>,
    ExtractPayload(context, request): ExtractPayload<StoryRequest>,
) -> Result<Json<StoryResponse>> {
    let genre = Genre::parse_optional(request.genre.as_deref())?;

    tracing::info!(
        subject = context.subject(),
        prompt_len = request.prompt.len(),
        "story requested"
    );

    let story = gateway.generate_story(&request.prompt, genre).await?;

    tracing::info!(story_len = story.len(), "story generated");

    Ok(Json(StoryResponse { story }))
}
