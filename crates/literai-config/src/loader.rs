use std::path::Path;

use crate::{AnyOrArray, Config};

impl Config {
    /// Load configuration from a TOML file
    ///
    /// Reads the file, expands `{{ env.VAR }}` placeholders, then
    /// deserializes and validates the result.
    ///
    /// # Errors
    ///
    /// Returns an error if the file cannot be read, environment variable
    /// expansion fails, TOML parsing fails, or validation fails
    pub fn load(path: &Path) -> anyhow::Result<Self> {
        let raw = std::fs::read_to_string(path)
            .map_err(|e| anyhow::anyhow!("failed to read config file {}: {e}", path.display()))?;

        Self::from_toml(&raw)
    }

    /// Parse and validate configuration from TOML text
    ///
    /// # Errors
    ///
    /// Returns an error if expansion, parsing, or validation fails
    pub fn from_toml(raw: &str) -> anyhow::Result<Self> {
        let expanded =
            crate::env::expand_env(raw).map_err(|e| anyhow::anyhow!("config variable expansion failed: {e}"))?;

        let mut config: Self = toml::from_str(&expanded).map_err(|e| parse_error(&expanded, &e))?;
        config.auth.load_service_account_env();

        config.validate()?;

        Ok(config)
    }

    /// Validate that the configuration is internally consistent
    ///
    /// Missing provider API keys are deliberately not checked here: the
    /// affected endpoint reports them when called.
    ///
    /// # Errors
    ///
    /// Returns an error describing the first invalid setting
    pub fn validate(&self) -> anyhow::Result<()> {
        self.validate_cors_config()?;
        self.validate_auth_config()?;
        self.validate_story_config()?;
        self.validate_speech_config()?;
        Ok(())
    }

    /// Credentialed CORS responses need an explicit origin list
    fn validate_cors_config(&self) -> anyhow::Result<()> {
        let cors = &self.server.cors;

        if cors.credentials && cors.origins == AnyOrArray::Any {
            anyhow::bail!("server.cors.origins must list explicit origins when credentials are allowed");
        }

        if let AnyOrArray::List(origins) = &cors.origins
            && let Some(bad) = origins.iter().find(|o| url::Url::parse(o).is_err())
        {
            anyhow::bail!("server.cors.origins contains an invalid origin: {bad}");
        }

        Ok(())
    }

    fn validate_auth_config(&self) -> anyhow::Result<()> {
        let auth = &self.auth;

        if !auth.enabled {
            return Ok(());
        }

        if auth.service_account().is_none() && auth.project_id().is_none() {
            anyhow::bail!("auth.service_account or auth.project_id is required when auth is enabled");
        }

        if auth.key_refresh.is_zero() {
            anyhow::bail!("auth.key_refresh must be greater than 0");
        }

        Ok(())
    }

    fn validate_story_config(&self) -> anyhow::Result<()> {
        let story = &self.story;

        if story.timeout.is_zero() {
            anyhow::bail!("story.timeout must be greater than 0");
        }

        if story.max_story_chars == 0 {
            anyhow::bail!("story.max_story_chars must be greater than 0");
        }

        if !(0.0..=2.0).contains(&story.temperature) {
            anyhow::bail!("story.temperature must be between 0.0 and 2.0");
        }

        Ok(())
    }

    fn validate_speech_config(&self) -> anyhow::Result<()> {
        let speech = &self.speech;

        if speech.timeout.is_zero() {
            anyhow::bail!("speech.timeout must be greater than 0");
        }

        if speech.max_chunk_chars == 0 {
            anyhow::bail!("speech.max_chunk_chars must be greater than 0");
        }

        if speech.voice_id.trim().is_empty() {
            anyhow::bail!("speech.voice_id must not be empty");
        }

        Ok(())
    }
}

/// Locate a TOML error by line and column only
///
/// The default rendering quotes the offending line, which may hold an
/// expanded secret.
fn parse_error(source: &str, error: &toml::de::Error) -> anyhow::Error {
    let Some(span) = error.span() else {
        return anyhow::anyhow!("failed to parse config: {}", error.message());
    };

    let before = source.get(..span.start).unwrap_or(source);
    let line = before.matches('\n').count() + 1;
    let column = before.rsplit('\n').next().map_or(0, |l| l.chars().count()) + 1;

    anyhow::anyhow!(
        "failed to parse config at line {line}, column {column}: {}",
        error.message()
    )
}
