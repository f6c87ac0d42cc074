use std::{sync::OnceLock, time::Duration};

use reqwest::Client;

/// Completion client shared by every provider instance
///
/// Connections to the provider stay pooled between stories. No overall
/// request timeout is set; the gateway enforces the story deadline.
pub fn http_client() -> Client {
    static CLIENT: OnceLock<Client> = OnceLock::new();

    CLIENT.get_or_init(build).clone()
}

fn build() -> Client {
    let mut headers = http::HeaderMap::new();
    headers.insert(http::header::CONNECTION, http::HeaderValue::from_static("keep-alive"));

    Client::builder()
        .connect_timeout(Duration::from_secs(10))
        .pool_idle_timeout(Some(Duration::from_secs(90)))
        .tcp_nodelay(true)
        .default_headers(headers)
        .build()
        .unwrap_or_else(|e| {
            tracing::warn!(error = %e, "falling back to default completion HTTP client");
            Client::new()
        })
}
