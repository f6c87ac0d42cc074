use std::sync::Arc;
use std::time::{Duration, Instant};

use literai_config::StoryConfig;
use literai_telemetry::metrics;

use crate::{
    error::{Result, StoryError},
    genre::{Genre, compose_prompt},
    provider::{CompletionProvider, groq::GroqProvider},
};

/// Generates short stories through a completion provider
pub struct StoryGateway {
    provider: Arc<dyn CompletionProvider>,
    system_prompt: String,
    max_story_chars: usize,
    timeout: Duration,
}

impl StoryGateway {
    pub fn new(provider: Arc<dyn CompletionProvider>, config: &StoryConfig) -> Self {
        Self {
            provider,
            system_prompt: config.system_prompt.clone(),
            max_story_chars: config.max_story_chars,
            timeout: config.timeout,
        }
    }

    /// Build the gateway with the Groq provider
    pub fn from_config(config: &StoryConfig) -> Self {
        Self::new(Arc::new(GroqProvider::new(config)), config)
    }

    /// Write a story for `prompt`
    ///
    /// One completion call under the configured deadline; on expiry the call
    /// is dropped, which aborts the request. The completion is returned as
    /// the provider wrote it, cut to the configured number of characters.
    pub async fn generate_story(&self, prompt: &str, genre: Option<Genre>) -> Result<String> {
        let start = Instant::now();
        let result = self.write(prompt, genre).await;

        let attributes = [metrics::outcome(result.is_ok())];
        metrics::record_duration(&metrics::STORY.duration, start, &attributes);
        metrics::STORY.count.add(1, &attributes);

        result
    }

    async fn write(&self, prompt: &str, genre: Option<Genre>) -> Result<String> {
        let prompt = prompt.trim();
        if prompt.is_empty() {
            return Err(StoryError::Validation("Prompt is required".to_string()));
        }

        let prompt = compose_prompt(prompt, genre);

        tracing::debug!(
            provider = self.provider.name(),
            prompt_len = prompt.len(),
            genre = genre.map(tracing::field::display),
            "requesting story"
        );

        let story = tokio::time::timeout(self.timeout, self.provider.complete(&self.system_prompt, &prompt))
            .await
            .map_err(|_| {
                tracing::warn!(timeout_secs = self.timeout.as_secs_f32(), "story generation timed out");
                StoryError::Timeout(self.timeout)
            })??;

        // Whitespace-only counts as empty; anything else is returned as written
        if story.trim().is_empty() {
            return Err(StoryError::EmptyResult);
        }

        Ok(self.truncate(&story))
    }

    fn truncate(&self, story: &str) -> String {
        match story.char_indices().nth(self.max_story_chars) {
            Some((cut, _)) => {
                tracing::warn!(
                    original_chars = story.chars().count(),
                    max_story_chars = self.max_story_chars,
                    "story exceeded the length limit and was truncated"
                );
                story[..cut].to_string()
            }
            None => story.to_string(),
        }
    }
}
