//! Programmatic configuration builder for integration tests

use std::net::SocketAddr;
use std::time::Duration;

use literai_config::{Config, CorsConfig, ServerConfig};
use secrecy::SecretString;

use super::mock_identity::MockIdentity;

/// Builder for constructing test configurations
///
/// Starts with authentication and the phrase cache disabled and both
/// providers unconfigured.
pub struct ConfigBuilder {
    config: Config,
}

impl ConfigBuilder {
    pub fn new() -> Self {
        let mut config = Config {
            server: ServerConfig {
                listen_address: Some(SocketAddr::from(([127, 0, 0, 1], 0))),
                ..ServerConfig::default()
            },
            ..Config::default()
        };
        config.auth.enabled = false;
        config.speech.phrase_cache.enabled = false;

        Self { config }
    }

    /// Point story generation at a mock completion backend
    pub fn with_story_backend(mut self, base_url: &str) -> Self {
        self.config.story.base_url = base_url.parse().expect("valid URL");
        self.config.story.api_key = Some(SecretString::from("test-groq-key"));
        self
    }

    /// Point narration at a mock speech backend
    pub fn with_speech_backend(mut self, base_url: &str) -> Self {
        self.config.speech.base_url = base_url.parse().expect("valid URL");
        self.config.speech.api_key = Some(SecretString::from("test-speech-key"));
        self
    }

    /// Pre-synthesize these phrases at startup
    pub fn with_phrases(mut self, phrases: &[&str]) -> Self {
        self.config.speech.phrase_cache.enabled = true;
        self.config.speech.phrase_cache.phrases = phrases.iter().map(ToString::to_string).collect();
        self
    }

    pub fn with_story_timeout(mut self, timeout: Duration) -> Self {
        self.config.story.timeout = timeout;
        self
    }

    pub fn with_max_chunk_chars(mut self, max_chunk_chars: usize) -> Self {
        self.config.speech.max_chunk_chars = max_chunk_chars;
        self
    }

    /// Require ID tokens issued by the mock identity provider
    pub fn with_identity(mut self, identity: &MockIdentity) -> Self {
        self.config.auth.enabled = true;
        self.config.auth.project_id = Some(identity.project_id().to_string());
        self.config.auth.jwks_url = identity.jwks_url().parse().expect("valid URL");
        self
    }

    pub fn with_cors(mut self, config: CorsConfig) -> Self {
        self.config.server.cors = config;
        self
    }

    pub fn without_health(mut self) -> Self {
        self.config.server.health.enabled = false;
        self
    }

    pub fn build(self) -> Config {
        self.config
    }
}
