use http::StatusCode;
use serde::Serialize;

/// Trait for domain errors that can be converted to HTTP responses
///
/// Implemented by each feature crate's error type. Responses are built from
/// these three pieces so every endpoint fails with the same body shape,
/// keeping domain errors decoupled from axum.
pub trait HttpError: std::error::Error {
    /// HTTP status code for this error
    fn status_code(&self) -> StatusCode;

    /// Short human-readable message safe to show to end users
    fn client_message(&self) -> String;

    /// Technical detail for the `details` field, if any
    fn details(&self) -> Option<String> {
        None
    }
}

/// Uniform `{ "error": ..., "details": ... }` error body
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct ErrorBody {
    pub error: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub details: Option<String>,
}

impl ErrorBody {
    /// Body with only a message
    pub fn message(error: impl Into<String>) -> Self {
        Self {
            error: error.into(),
            details: None,
        }
    }

    /// Build the body for a domain error
    pub fn from_error<E: HttpError + ?Sized>(error: &E) -> Self {
        Self {
            error: error.client_message(),
            details: error.details(),
        }
    }

    /// Serialize to JSON bytes
    pub fn to_json(&self) -> Vec<u8> {
        serde_json::to_vec(self).unwrap_or_else(|_| br#"{"error":"internal error"}"#.to_vec())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[derive(Debug)]
    struct Timeout;

    impl std::fmt::Display for Timeout {
        fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
            f.write_str("upstream timed out after 7s")
        }
    }

    impl std::error::Error for Timeout {}

    impl HttpError for Timeout {
        fn status_code(&self) -> StatusCode {
            StatusCode::INTERNAL_SERVER_ERROR
        }

        fn client_message(&self) -> String {
            "Failed to generate story. Please try again.".to_string()
        }

        fn details(&self) -> Option<String> {
            Some(self.to_string())
        }
    }

    #[test]
    fn body_carries_message_and_details() {
        let body = ErrorBody::from_error(&Timeout);
        let json: serde_json::Value = serde_json::from_slice(&body.to_json()).unwrap();

        assert_eq!(json["error"], "Failed to generate story. Please try again.");
        assert_eq!(json["details"], "upstream timed out after 7s");
    }

    #[test]
    fn details_are_omitted_when_absent() {
        let json = serde_json::to_value(ErrorBody::message("Prompt is required")).unwrap();
        assert_eq!(json, serde_json::json!({ "error": "Prompt is required" }));
    }
}
