#![allow(clippy::must_use_candidate)]

pub mod auth;
pub mod cors;
mod env;
pub mod health;
mod loader;
pub mod server;
pub mod speech;
pub mod story;
pub mod telemetry;

use serde::Deserialize;

pub use auth::*;
pub use cors::*;
pub use health::*;
pub use server::*;
pub use speech::*;
pub use story::*;
pub use telemetry::*;

/// Top-level LiterAI gateway configuration
#[derive(Debug, Default, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct Config {
    /// Server configuration
    #[serde(default)]
    pub server: ServerConfig,
    /// Identity-provider token verification
    #[serde(default)]
    pub auth: AuthConfig,
    /// Completion provider used for story generation
    #[serde(default)]
    pub story: StoryConfig,
    /// Speech provider used for audio generation
    #[serde(default)]
    pub speech: SpeechConfig,
    /// Logging and OTLP export
    #[serde(default)]
    pub telemetry: Option<TelemetryConfig>,
}

/// Treat a configured secret as absent when it is empty
///
/// `{{ env.KEY | default("") }}` leaves an empty string behind when the
/// variable is unset, which must behave exactly like an omitted key.
fn non_empty_secret(secret: Option<&secrecy::SecretString>) -> Option<&secrecy::SecretString> {
    use secrecy::ExposeSecret;

    secret.filter(|s| !s.expose_secret().trim().is_empty())
}
