//! Groq provider over its OpenAI-compatible chat completion API

use async_trait::async_trait;
use literai_config::StoryConfig;
use reqwest::Client;
use secrecy::{ExposeSecret, SecretString};
use url::Url;

use super::CompletionProvider;
use crate::error::StoryError;
use crate::http_client::http_client;
use crate::protocol::{ChatMessage, ChatRequest, ChatResponse};

/// Groq chat completion provider
pub struct GroqProvider {
    client: Client,
    base_url: Url,
    api_key: Option<SecretString>,
    model: String,
    temperature: f32,
    max_tokens: u32,
}

impl GroqProvider {
    pub fn new(config: &StoryConfig) -> Self {
        Self {
            client: http_client(),
            base_url: config.base_url.clone(),
            api_key: config.api_key().cloned(),
            model: config.model.clone(),
            temperature: config.temperature,
            max_tokens: config.max_tokens,
        }
    }

    /// Build the chat completions URL
    fn completions_url(&self) -> String {
        let base = self.base_url.as_str().trim_end_matches('/');
        format!("{base}/chat/completions")
    }
}

#[async_trait]
impl CompletionProvider for GroqProvider {
    async fn complete(&self, system_prompt: &str, prompt: &str) -> crate::Result<String> {
        let Some(api_key) = self.api_key.as_ref() else {
            return Err(StoryError::Configuration("story API key is not configured".to_string()));
        };

        let request = ChatRequest {
            model: &self.model,
            messages: vec![ChatMessage::system(system_prompt), ChatMessage::user(prompt)],
            temperature: self.temperature,
            max_tokens: self.max_tokens,
        };

        let response = self
            .client
            .post(self.completions_url())
            .bearer_auth(api_key.expose_secret())
            .json(&request)
            .send()
            .await
            .map_err(|e| {
                tracing::error!(provider = "groq", error = %e, "upstream request failed");
                StoryError::Upstream(e.to_string())
            })?;

        if !response.status().is_success() {
            let status = response.status();
            let body = response.text().await.unwrap_or_default();
            tracing::warn!(provider = "groq", status = %status, "upstream returned error");
            return Err(StoryError::Upstream(format!("provider returned {status}: {body}")));
        }

        let response: ChatResponse = response
            .json()
            .await
            .map_err(|e| StoryError::Upstream(format!("failed to parse response: {e}")))?;

        if let Some(reason) = response.choices.first().and_then(|c| c.finish_reason.as_deref())
            && reason == "length"
        {
            tracing::debug!(max_tokens = self.max_tokens, "story stopped at the token budget");
        }

        Ok(response.into_content().unwrap_or_default())
    }

    fn name(&self) -> &str {
        "groq"
    }
}
