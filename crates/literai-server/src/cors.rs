//! Cross-origin policy
//!
//! Allowed browser origins get CORS headers; requests carrying any other
//! `Origin` are refused before they reach a handler, so a foreign page cannot
//! spend provider calls even though the browser would hide the response.

use std::sync::Arc;

use axum::Json;
use axum::extract::Request;
use axum::middleware::Next;
use axum::response::{IntoResponse, Response};
use http::header::{HeaderName, ORIGIN};
use http::{HeaderValue, Method, StatusCode};
use literai_config::{AnyOrArray, CorsConfig};
use literai_core::ErrorBody;
use tower_http::cors::{AllowHeaders, AllowMethods, AllowOrigin, CorsLayer};

/// Origins permitted to call the API
#[derive(Debug, Clone)]
pub struct AllowedOrigins {
    /// `None` allows every origin
    list: Option<Arc<[HeaderValue]>>,
}

impl AllowedOrigins {
    pub fn from_config(config: &CorsConfig) -> Self {
        let list = match &config.origins {
            AnyOrArray::Any => None,
            AnyOrArray::List(origins) => Some(
                origins
                    .iter()
                    .filter_map(|o| HeaderValue::from_str(o.trim_end_matches('/')).ok())
                    .collect(),
            ),
        };

        Self { list }
    }

    pub fn allows(&self, origin: &HeaderValue) -> bool {
        self.list.as_ref().is_none_or(|list| list.contains(origin))
    }

    fn allow_origin(&self) -> AllowOrigin {
        match &self.list {
            None => AllowOrigin::any(),
            Some(list) => AllowOrigin::list(list.iter().cloned()),
        }
    }
}

/// Reject requests whose `Origin` is not allow-listed with 403
///
/// Requests without an `Origin` header (server-to-server, curl) pass.
/// Preflights never get here: the CORS layer answers them itself.
pub async fn origin_guard(origins: AllowedOrigins, request: Request, next: Next) -> Response {
    if let Some(origin) = request.headers().get(ORIGIN)
        && !origins.allows(origin)
    {
        tracing::warn!(
            origin = ?origin,
            path = %request.uri().path(),
            "rejected request from disallowed origin"
        );

        return (StatusCode::FORBIDDEN, Json(ErrorBody::message("Not allowed by CORS"))).into_response();
    }

    next.run(request).await
}

/// CORS headers for allowed origins
///
/// With credentials enabled, wildcard methods and headers are mirrored from
/// the preflight request since browsers refuse `*` on credentialed requests.
pub fn cors_layer(config: &CorsConfig, origins: &AllowedOrigins) -> CorsLayer {
    let mut layer = CorsLayer::new().allow_origin(origins.allow_origin());

    layer = match &config.methods {
        AnyOrArray::Any if config.credentials => layer.allow_methods(AllowMethods::mirror_request()),
        AnyOrArray::Any => layer.allow_methods(AllowMethods::any()),
        AnyOrArray::List(methods) => {
            let methods: Vec<Method> = methods.iter().filter_map(|m| m.parse().ok()).collect();
            layer.allow_methods(methods)
        }
    };

    layer = match &config.headers {
        AnyOrArray::Any if config.credentials => layer.allow_headers(AllowHeaders::mirror_request()),
        AnyOrArray::Any => layer.allow_headers(AllowHeaders::any()),
        AnyOrArray::List(headers) => {
            let headers: Vec<HeaderName> = headers.iter().filter_map(|h| h.parse().ok()).collect();
            layer.allow_headers(headers)
        }
    };

    if config.credentials {
        layer = layer.allow_credentials(true);
    }

    if let Some(duration) = config.max_age_duration() {
        layer = layer.max_age(duration);
    }

    layer
}
