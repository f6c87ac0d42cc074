use std::time::Duration;

use axum::{
    Json,
    response::{IntoResponse, Response},
};
use http::StatusCode;
use literai_core::{ErrorBody, HttpError};
use thiserror::Error;

pub type Result<T> = std::result::Result<T, TtsError>;

/// Message shown to clients for every failure that is not their fault
pub const GENERIC_FAILURE: &str = "Failed to generate audio. Please try again.";

/// Audio generation errors
#[derive(Debug, Error)]
pub enum TtsError {
    /// The request itself is unusable
    #[error("{0}")]
    Validation(String),

    /// A synthesis call exceeded its deadline
    #[error("speech synthesis timed out after {}s", .0.as_secs_f32())]
    Timeout(Duration),

    /// The provider could not be reached or sent an unreadable response
    #[error("speech provider request failed: {0}")]
    Upstream(String),

    /// The provider answered with a non-success status
    #[error("speech provider error ({status}): {message}")]
    ProviderApi { status: u16, message: String },

    /// Required settings such as the API key are missing
    #[error("configuration error: {0}")]
    Configuration(String),
}

impl HttpError for TtsError {
    fn status_code(&self) -> StatusCode {
        match self {
            Self::Validation(_) => StatusCode::BAD_REQUEST,
            Self::Timeout(_) | Self::Upstream(_) | Self::ProviderApi { .. } | Self::Configuration(_) => {
                StatusCode::INTERNAL_SERVER_ERROR
            }
        }
    }

    fn client_message(&self) -> String {
        match self {
            Self::Validation(message) => message.clone(),
            _ => GENERIC_FAILURE.to_string(),
        }
    }

    fn details(&self) -> Option<String> {
        match self {
            Self::Validation(_) => None,
            other => Some(other.to_string()),
        }
    }
}

impl IntoResponse for TtsError {
    fn into_response(self) -> Response {
        (self.status_code(), Json(ErrorBody::from_error(&self))).into_response()
    }
}
