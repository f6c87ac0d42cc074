use std::{sync::OnceLock, time::Duration};

use reqwest::Client;

/// Shared HTTP client so synthesis calls reuse connections
///
/// Carries no overall request timeout: callers bound each call with their
/// own deadline.
pub fn http_client() -> Client {
    static CLIENT: OnceLock<Client> = OnceLock::new();

    CLIENT
        .get_or_init(|| {
            let mut headers = http::HeaderMap::new();
            headers.insert(http::header::CONNECTION, http::HeaderValue::from_static("keep-alive"));

            Client::builder()
                .connect_timeout(Duration::from_secs(10))
                .pool_idle_timeout(Some(Duration::from_secs(30)))
                .tcp_nodelay(true)
                .default_headers(headers)
                .build()
                .unwrap_or_else(|e| {
                    tracing::warn!(error = %e, "falling back to default speech HTTP client");
                    Client::new()
                })
        })
        .clone()
}
