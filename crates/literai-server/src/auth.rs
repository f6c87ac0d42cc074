use std::sync::Arc;

use axum::Json;
use axum::extract::Request;
use axum::middleware::Next;
use axum::response::{IntoResponse, Response};
use http::Method;
use literai_auth::IdTokenVerifier;
use literai_core::{ErrorBody, HttpError};

/// Require a verified identity-provider ID token
///
/// Skips public paths and CORS preflights. On success the caller's
/// [`Identity`](literai_core::Identity) is attached to the request
/// extensions for the handlers.
pub async fn auth_middleware(
    verifier: IdTokenVerifier,
    public_paths: Arc<[String]>,
    mut request: Request,
    next: Next,
) -> Response {
    let path = request.uri().path();

    if request.method() == Method::OPTIONS || public_paths.iter().any(|p| path.starts_with(p.as_str())) {
        return next.run(request).await;
    }

    let path = path.to_string();
    let authorization = request
        .headers()
        .get(http::header::AUTHORIZATION)
        .and_then(|v| v.to_str().ok())
        .map(str::to_owned);

    match verifier.authenticate(authorization.as_deref()).await {
        Ok(identity) => {
            tracing::debug!(
                subject = %identity.subject,
                email = identity.email_or_placeholder(),
                "request authenticated"
            );
            request.extensions_mut().insert(identity);
            next.run(request).await
        }
        Err(e) => {
            tracing::warn!(path = %path, error = %e, "authentication failed");
            (e.status_code(), Json(ErrorBody::from_error(&e))).into_response()
        }
    }
}
