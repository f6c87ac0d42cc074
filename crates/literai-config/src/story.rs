use std::time::Duration;

use secrecy::SecretString;
use serde::Deserialize;
use url::Url;

/// Groq's OpenAI-compatible API
pub const DEFAULT_STORY_BASE_URL: &str = "https://api.groq.com/openai/v1";

/// Persona every story request is framed with
pub const DEFAULT_SYSTEM_PROMPT: &str = "As a writer of fiction and realism in the vein of William Shakespeare, \
     craft a brief tale (under 2000 characters) inspired by the user's prompt.";

/// Completion provider settings for story generation
#[derive(Debug, Clone, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct StoryConfig {
    /// API key for the completion provider
    #[serde(default)]
    pub api_key: Option<SecretString>,
    /// Base URL of the OpenAI-compatible API
    #[serde(default = "default_base_url")]
    pub base_url: Url,
    /// Model identifier
    #[serde(default = "default_model")]
    pub model: String,
    /// System prompt establishing the narrative persona
    #[serde(default = "default_system_prompt")]
    pub system_prompt: String,
    /// Sampling temperature
    #[serde(default = "default_temperature")]
    pub temperature: f32,
    /// Output token budget per completion
    #[serde(default = "default_max_tokens")]
    pub max_tokens: u32,
    /// Stories longer than this many characters are cut
    #[serde(default = "default_max_story_chars")]
    pub max_story_chars: usize,
    /// Deadline for the completion call
    #[serde(default = "default_timeout", deserialize_with = "duration_str::deserialize_duration")]
    pub timeout: Duration,
}

impl Default for StoryConfig {
    fn default() -> Self {
        Self {
            api_key: None,
            base_url: default_base_url(),
            model: default_model(),
            system_prompt: default_system_prompt(),
            temperature: default_temperature(),
            max_tokens: default_max_tokens(),
            max_story_chars: default_max_story_chars(),
            timeout: default_timeout(),
        }
    }
}

impl StoryConfig {
    /// Configured API key, `None` when missing or blank
    pub fn api_key(&self) -> Option<&SecretString> {
        crate::non_empty_secret(self.api_key.as_ref())
    }
}

fn default_base_url() -> Url {
    Url::parse(DEFAULT_STORY_BASE_URL).expect("default story URL is valid")
}

fn default_model() -> String {
    "llama-3.1-8b-instant".to_string()
}

fn default_system_prompt() -> String {
    DEFAULT_SYSTEM_PROMPT.to_string()
}

const fn default_temperature() -> f32 {
    0.7
}

const fn default_max_tokens() -> u32 {
    2000
}

const fn default_max_story_chars() -> usize {
    1000
}

const fn default_timeout() -> Duration {
    Duration::from_secs(7)
}
