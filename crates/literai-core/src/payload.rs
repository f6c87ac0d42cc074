use axum::{
    Json,
    body::Body,
    response::{IntoResponse, Response},
};
use http::StatusCode;
use serde::de::DeserializeOwned;

use crate::{ErrorBody, RequestContext};

/// Extractor for JSON request bodies
///
/// Requires `Content-Type: application/json` and rejects bodies over 1 MiB.
/// Rejections use the same `{ "error": ... }` body as domain errors.
pub struct ExtractPayload<T>(pub RequestContext, pub T);

/// Body limit for JSON requests (1 MiB)
const BODY_LIMIT_BYTES: usize = 1 << 20;

fn reject(status: StatusCode, message: impl Into<String>) -> Response {
    (status, Json(ErrorBody::message(message))).into_response()
}

impl<S, T: DeserializeOwned> axum::extract::FromRequest<S> for ExtractPayload<T>
where
    S: Send + Sync,
{
    type Rejection = Response;

    async fn from_request(request: http::Request<Body>, _state: &S) -> Result<Self, Self::Rejection> {
        let (mut parts, body) = request.into_parts();

        let is_json = parts
            .headers
            .get(http::header::CONTENT_TYPE)
            .and_then(|value| value.to_str().ok())
            .is_some_and(|value| value.starts_with("application/json"));

        if !is_json {
            return Err(reject(
                StatusCode::UNSUPPORTED_MEDIA_TYPE,
                "Unsupported Content-Type, expected: 'Content-Type: application/json'",
            ));
        }

        let bytes = axum::body::to_bytes(body, BODY_LIMIT_BYTES).await.map_err(|err| {
            if std::error::Error::source(&err).is_some_and(|source| source.is::<http_body_util::LengthLimitError>()) {
                reject(
                    StatusCode::PAYLOAD_TOO_LARGE,
                    format!("Request body is too large, limit is {BODY_LIMIT_BYTES} bytes"),
                )
            } else {
                reject(StatusCode::BAD_REQUEST, format!("Failed to read request body: {err}"))
            }
        })?;

        let payload = serde_json::from_slice::<T>(&bytes)
            .map_err(|e| reject(StatusCode::BAD_REQUEST, format!("Failed to parse request body: {e}")))?;

        let context = RequestContext {
            identity: parts.extensions.remove(),
        };

        Ok(Self(context, payload))
    }
}

#[cfg(test)]
mod tests {
    use axum::extract::FromRequest;
    use serde::Deserialize;

    use super::*;
    use crate::Identity;

    #[derive(Debug, Deserialize)]
    struct Prompt {
        prompt: String,
    }

    fn request(content_type: Option<&str>, body: &str) -> http::Request<Body> {
        let mut builder = http::Request::post("/api/generate-story");
        if let Some(content_type) = content_type {
            builder = builder.header(http::header::CONTENT_TYPE, content_type);
        }
        builder.body(Body::from(body.to_string())).unwrap()
    }

    async fn error_of(response: Response) -> (StatusCode, serde_json::Value) {
        let status = response.status();
        let bytes = axum::body::to_bytes(response.into_body(), usize::MAX).await.unwrap();
        (status, serde_json::from_slice(&bytes).unwrap())
    }

    #[tokio::test]
    async fn parses_json_and_carries_identity() {
        let mut req = request(Some("application/json; charset=utf-8"), r#"{"prompt":"a fox"}"#);
        req.extensions_mut().insert(Identity {
            subject: "uid-7".to_string(),
            email: None,
        });

        let Ok(ExtractPayload(context, payload)) = ExtractPayload::<Prompt>::from_request(req, &()).await else {
            panic!("payload should parse");
        };

        assert_eq!(payload.prompt, "a fox");
        assert_eq!(context.subject(), "uid-7");
    }

    #[tokio::test]
    async fn rejects_missing_content_type() {
        let Err(response) = ExtractPayload::<Prompt>::from_request(request(None, "{}"), &()).await else {
            panic!("should be rejected");
        };

        let (status, body) = error_of(response).await;
        assert_eq!(status, StatusCode::UNSUPPORTED_MEDIA_TYPE);
        assert!(body["error"].as_str().unwrap().contains("application/json"));
    }

    #[tokio::test]
    async fn rejects_malformed_json() {
        let req = request(Some("application/json"), "{not json");
        let Err(response) = ExtractPayload::<Prompt>::from_request(req, &()).await else {
            panic!("should be rejected");
        };

        let (status, body) = error_of(response).await;
        assert_eq!(status, StatusCode::BAD_REQUEST);
        assert!(body["error"].as_str().unwrap().starts_with("Failed to parse request body"));
    }

    #[tokio::test]
    async fn rejects_oversized_body() {
        let body = format!(r#"{{"prompt":"{}"}}"#, "a".repeat(BODY_LIMIT_BYTES));
        let Err(response) = ExtractPayload::<Prompt>::from_request(request(Some("application/json"), &body), &()).await
        else {
            panic!("should be rejected");
        };

        assert_eq!(response.status(), StatusCode::PAYLOAD_TOO_LARGE);
    }
}
