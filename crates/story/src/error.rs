use std::time::Duration;

use axum::{
    Json,
    response::{IntoResponse, Response},
};
use http::StatusCode;
use literai_core::{ErrorBody, HttpError};
use thiserror::Error;

pub type Result<T> = std::result::Result<T, StoryError>;

/// Message shown to clients for every failure that is not their fault
pub const GENERIC_FAILURE: &str = "Failed to generate story. Please try again.";

/// Story generation errors
#[derive(Debug, Error)]
pub enum StoryError {
    /// The request itself is unusable
    #[error("{0}")]
    Validation(String),

    /// The completion call exceeded its deadline
    #[error("story generation timed out after {}s", .0.as_secs_f32())]
    Timeout(Duration),

    /// The provider failed, answered with an error status, or sent a malformed body
    #[error("completion provider error: {0}")]
    Upstream(String),

    /// The provider answered successfully but wrote nothing
    #[error("completion provider returned an empty story")]
    EmptyResult,

    /// Required settings such as the API key are missing
    #[error("configuration error: {0}")]
    Configuration(String),
}

impl HttpError for StoryError {
    fn status_code(&self) -> StatusCode {
        match self {
            Self::Validation(_) => StatusCode::BAD_REQUEST,
            Self::Timeout(_) | Self::Upstream(_) | Self::EmptyResult | Self::Configuration(_) => {
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

impl IntoResponse for StoryError {
    fn into_response(self) -> Response {
        (self.status_code(), Json(ErrorBody::from_error(&self))).into_response()
    }
}
