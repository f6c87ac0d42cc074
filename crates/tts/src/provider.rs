pub mod elevenlabs;

use async_trait::async_trait;
use bytes::Bytes;

/// Trait for speech synthesis provider implementations
#[async_trait]
pub trait SpeechProvider: Send + Sync {
    /// Synthesize one piece of text into encoded audio
    ///
    /// Every call must produce the same audio encoding so that results can
    /// be concatenated.
    async fn synthesize(&self, text: &str) -> crate::Result<Bytes>;

    /// Get the provider name
    fn name(&self) -> &str;
}
