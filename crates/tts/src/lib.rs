//! Story narration
//!
//! Shortens and chunks story text, splices in pre-synthesized phrase audio
//! and synthesizes the rest through a speech provider.

#![allow(clippy::must_use_candidate, clippy::missing_errors_doc)]

mod error;
mod gateway;
mod http_client;
mod phrase_cache;
mod provider;
pub mod text;
mod types;

use std::sync::Arc;

use axum::{Json, Router, extract::State, routing::post};

pub use error::{GENERIC_FAILURE, Result, TtsError};
pub use gateway::{AudioGateway, data_url, quote};
pub use phrase_cache::{PhraseCache, PhraseTable, Splice};
pub use provider::{SpeechProvider, elevenlabs::ElevenLabsProvider};
pub use types::{AudioRequest, AudioResponse, QuoteRequest, QuoteResponse};
use literai_core::ExtractPayload;

/// Build the audio gateway from configuration
///
/// Phrase cache population starts in the background immediately.
pub fn build_gateway(config: &literai_config::SpeechConfig) -> Arc<AudioGateway> {
    if config.api_key().is_none() {
        tracing::warn!("speech API key is missing; audio generation will fail until it is configured");
    }

    Arc::new(AudioGateway::from_config(config))
}

/// Create the endpoint router for narration
pub fn endpoint_router() -> Router<Arc<AudioGateway>> {
    Router::new()
        .route("/api/convert-to-audio", post(convert_to_audio))
        .route("/api/audio-quote", post(audio_quote))
}

/// Handle narration requests
async fn convert_to_audio(
    State(gateway): State<Arc<AudioGateway>>,
    ExtractPayload(context, request): ExtractPayload<AudioRequest>,
) -> Result<Json<AudioResponse>> {
    tracing::info!(subject = context.subject(), text_len = request.text.len(), "audio requested");

    let audio = gateway.generate_audio(&request.text).await?;

    tracing::info!(bytes = audio.len(), "audio generated");

    Ok(Json(AudioResponse {
        audio: data_url(&audio),
    }))
}

/// Handle narration price quotes
async fn audio_quote(ExtractPayload(context, request): ExtractPayload<QuoteRequest>) -> Result<Json<QuoteResponse>> {
    if request.text.trim().is_empty() {
        return Err(TtsError::Validation("Text is required".to_string()));
    }

    let amount = quote(&request.text);
    tracing::debug!(subject = context.subject(), amount = %amount, "audio quote");

    Ok(Json(QuoteResponse { amount }))
}
