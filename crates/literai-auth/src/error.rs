use http::StatusCode;
use literai_core::HttpError;

/// Authentication errors
#[derive(Debug, thiserror::Error)]
pub enum AuthError {
    /// No `Authorization: Bearer <token>` header on the request
    #[error("no bearer token provided")]
    MissingToken,

    /// Token failed parsing, signature or claim checks
    #[error("invalid token: {0}")]
    InvalidToken(String),

    /// Signing keys could not be fetched from the identity provider
    #[error("signing key fetch failed: {0}")]
    KeyFetch(String),
}

impl HttpError for AuthError {
    fn status_code(&self) -> StatusCode {
        StatusCode::UNAUTHORIZED
    }

    fn client_message(&self) -> String {
        match self {
            Self::MissingToken => "Unauthorized: No token provided".to_string(),
            Self::InvalidToken(_) | Self::KeyFetch(_) => "Unauthorized: Invalid token".to_string(),
        }
    }
}
