pub mod groq;

use async_trait::async_trait;

/// Trait for chat completion provider implementations
#[async_trait]
pub trait CompletionProvider: Send + Sync {
    /// Complete `prompt` under the given system prompt
    ///
    /// Returns the generated text, which may be empty; judging the result
    /// is left to the caller.
    async fn complete(&self, system_prompt: &str, prompt: &str) -> crate::Result<String>;

    /// Get the provider name
    fn name(&self) -> &str;
}
