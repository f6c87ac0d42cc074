//! HTTP surface of the LiterAI gateway
//!
//! Assembles the story and narration routes behind CORS, request tracing,
//! panic isolation and identity-provider authentication.

mod auth;
mod cors;
mod health;

use std::any::Any;
use std::net::SocketAddr;
use std::sync::Arc;

use axum::Router;
use axum::response::{IntoResponse, Response};
use http::StatusCode;
use literai_config::Config;
use literai_core::ErrorBody;
use tower_http::catch_panic::CatchPanicLayer;
use tower_http::trace::TraceLayer;

/// Assembled server with all routes and middleware
pub struct Server {
    router: Router,
    listen_address: SocketAddr,
}

impl Server {
    /// Build the server from configuration
    ///
    /// Starts phrase audio pre-synthesis in the background, so this must run
    /// inside a Tokio runtime.
    ///
    /// # Errors
    ///
    /// Returns an error if authentication is enabled but the identity
    /// provider cannot be set up
    pub fn new(config: &Config) -> anyhow::Result<Self> {
        let listen_address = config.server.listen_address();

        log_credentials(config);

        let story_state = story::build_gateway(&config.story);
        let tts_state = tts::build_gateway(&config.speech);

        // Build base router with feature routes
        let mut app = Router::new()
            .merge(story::endpoint_router().with_state(story_state))
            .merge(tts::endpoint_router().with_state(tts_state));

        // Apply middleware layers (innermost first)

        // Identity-provider authentication
        if config.auth.enabled {
            let verifier = literai_auth::IdTokenVerifier::from_config(&config.auth)?;
            let public_paths: Arc<[String]> = config.auth.public_paths.clone().into();

            app = app.layer(axum::middleware::from_fn(move |req, next| {
                let verifier = verifier.clone();
                let public_paths = Arc::clone(&public_paths);
                async move { auth::auth_middleware(verifier, public_paths, req, next).await }
            }));
        } else {
            tracing::warn!("authentication is disabled; every endpoint is public");
        }

        // Health check, outside authentication
        if config.server.health.enabled {
            app = app.route(&config.server.health.path, axum::routing::get(health::health_handler));
        }

        // Handler panics become a 500 instead of a dropped connection
        app = app.layer(CatchPanicLayer::custom(panic_response));

        // Tracing
        app = app.layer(TraceLayer::new_for_http());

        // Refuse disallowed origins before any handler runs
        let origins = cors::AllowedOrigins::from_config(&config.server.cors);
        let guarded = origins.clone();
        app = app.layer(axum::middleware::from_fn(move |req, next| {
            let origins = guarded.clone();
            async move { cors::origin_guard(origins, req, next).await }
        }));

        // CORS, outermost so preflights and error responses carry the headers
        app = app.layer(cors::cors_layer(&config.server.cors, &origins));

        Ok(Self {
            router: app,
            listen_address,
        })
    }

    /// Get the configured listen address
    #[must_use]
    pub const fn listen_address(&self) -> SocketAddr {
        self.listen_address
    }

    /// Consume the server and return the inner router
    ///
    /// Useful for testing when the caller manages the listener
    pub fn into_router(self) -> Router {
        self.router
    }

    /// Start serving requests
    ///
    /// Blocks until the cancellation token is triggered.
    ///
    /// # Errors
    ///
    /// Returns an error if binding the TCP listener or serving fails
    pub async fn serve(self, shutdown: tokio_util::sync::CancellationToken) -> anyhow::Result<()> {
        let listener = tokio::net::TcpListener::bind(self.listen_address)
            .await
            .map_err(|e| anyhow::anyhow!("failed to bind {}: {e}", self.listen_address))?;
        let local_addr = listener.local_addr()?;
        tracing::info!(%local_addr, "server listening");

        axum::serve(listener, self.router)
            .with_graceful_shutdown(async move {
                shutdown.cancelled().await;
                tracing::info!("graceful shutdown initiated");
            })
            .await?;

        Ok(())
    }
}

/// Report which credentials are configured without revealing them
fn log_credentials(config: &Config) {
    const fn presence(configured: bool) -> &'static str {
        if configured { "exists" } else { "missing" }
    }

    tracing::info!(
        story_api_key = presence(config.story.api_key().is_some()),
        speech_api_key = presence(config.speech.api_key().is_some()),
        service_account = presence(config.auth.service_account().is_some()),
        "provider credentials"
    );
}

#[allow(clippy::needless_pass_by_value)]
fn panic_response(panic: Box<dyn Any + Send + 'static>) -> Response {
    let message = panic
        .downcast_ref::<String>()
        .map(String::as_str)
        .or_else(|| panic.downcast_ref::<&str>().copied())
        .unwrap_or("unknown panic");

    tracing::error!(panic = message, "request handler panicked");

    (
        StatusCode::INTERNAL_SERVER_ERROR,
        axum::Json(ErrorBody::message("Internal server error")),
    )
        .into_response()
}
