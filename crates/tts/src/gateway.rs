use std::path::PathBuf;
use std::sync::Arc;
use std::time::{Duration, Instant};

use base64::Engine as _;
use base64::engine::general_purpose::STANDARD;
use bytes::{Bytes, BytesMut};
use literai_config::SpeechConfig;
use literai_telemetry::metrics;

use crate::{
    error::{Result, TtsError},
    phrase_cache::PhraseCache,
    provider::{SpeechProvider, elevenlabs::ElevenLabsProvider},
    text,
};

/// Smallest amount ever quoted for narrating a text
const MINIMUM_QUOTE: f64 = 0.10;

/// Price per hundred characters of narrated text
const PRICE_PER_HUNDRED_CHARS: f64 = 0.0001;

/// Turns story text into one narrated MP3
pub struct AudioGateway {
    provider: Arc<dyn SpeechProvider>,
    phrases: PhraseCache,
    max_chunk_chars: usize,
    timeout: Duration,
    debug_audio_path: Option<PathBuf>,
}

impl AudioGateway {
    pub fn new(provider: Arc<dyn SpeechProvider>, phrases: PhraseCache, config: &SpeechConfig) -> Self {
        Self {
            provider,
            phrases,
            max_chunk_chars: config.max_chunk_chars,
            timeout: config.timeout,
            debug_audio_path: config.debug_audio_path.clone(),
        }
    }

    /// Build the gateway with the `ElevenLabs` provider
    ///
    /// Starts phrase cache population in the background when the cache is
    /// enabled and a speech API key is configured. Must be called from
    /// within a Tokio runtime.
    pub fn from_config(config: &SpeechConfig) -> Self {
        let provider: Arc<dyn SpeechProvider> = Arc::new(ElevenLabsProvider::new(config));

        let cache = &config.phrase_cache;
        let phrases = if cache.enabled && config.api_key().is_some() && !cache.phrases.is_empty() {
            tracing::info!(
                phrases = cache.phrases.len(),
                provider = provider.name(),
                "pre-synthesizing phrase audio"
            );
            PhraseCache::populate(Arc::clone(&provider), cache.phrases.clone(), config.timeout)
        } else {
            tracing::debug!("phrase audio cache disabled");
            PhraseCache::empty()
        };

        Self::new(provider, phrases, config)
    }

    /// Narrate `text` into a single MP3 payload
    ///
    /// Cached boundary phrases are spliced in without synthesis. The rest is
    /// shortened, chunked and synthesized one chunk at a time, each call
    /// under the configured timeout. Any failing chunk fails the whole
    /// request.
    pub async fn generate_audio(&self, text: &str) -> Result<Bytes> {
        let start = Instant::now();
        let result = self.narrate(text).await;

        metrics::record_duration(&metrics::SPEECH.duration, start, &[metrics::outcome(result.is_ok())]);

        result
    }

    async fn narrate(&self, text: &str) -> Result<Bytes> {
        if text.trim().is_empty() {
            return Err(TtsError::Validation("Text is required".to_string()));
        }

        let shortened = text::shorten(text);
        if shortened.is_empty() {
            return Err(TtsError::Validation("Text is required".to_string()));
        }

        let table = self.phrases.ready_within(self.timeout).await;
        let splice = table.splice(&shortened);
        let chunks = text::chunk(&splice.remainder, self.max_chunk_chars);

        tracing::debug!(
            text_len = text.len(),
            shortened_len = shortened.len(),
            cached_phrases = splice.hits(),
            chunks = chunks.len(),
            "narrating text"
        );

        metrics::SPEECH
            .phrase_cache_hits
            .add(u64::try_from(splice.hits()).unwrap_or(u64::MAX), &[]);
        metrics::SPEECH
            .chunks
            .add(u64::try_from(chunks.len()).unwrap_or(u64::MAX), &[]);

        let mut segments = splice.prefix;
        for (index, chunk) in chunks.iter().enumerate() {
            let audio = self.synthesize_chunk(chunk).await.inspect_err(|e| {
                tracing::error!(chunk = index, of = chunks.len(), error = %e, "chunk synthesis failed");
            })?;
            segments.push(audio);
        }
        segments.extend(splice.suffix);

        let audio = concatenate(&segments);
        self.dump_debug_audio(&audio).await;

        Ok(audio)
    }

    async fn synthesize_chunk(&self, chunk: &str) -> Result<Bytes> {
        tokio::time::timeout(self.timeout, self.provider.synthesize(chunk))
            .await
            .map_err(|_| TtsError::Timeout(self.timeout))?
    }

    async fn dump_debug_audio(&self, audio: &Bytes) {
        let Some(path) = self.debug_audio_path.as_deref() else {
            return;
        };

        match tokio::fs::write(path, audio).await {
            Ok(()) => tracing::debug!(path = %path.display(), bytes = audio.len(), "wrote debug audio"),
            Err(e) => tracing::warn!(path = %path.display(), error = %e, "failed to write debug audio"),
        }
    }
}

/// Join MP3 segments byte-wise; segments share one encoding
fn concatenate(segments: &[Bytes]) -> Bytes {
    if let [single] = segments {
        return single.clone();
    }

    let mut audio = BytesMut::with_capacity(segments.iter().map(Bytes::len).sum());
    for segment in segments {
        audio.extend_from_slice(segment);
    }
    audio.freeze()
}

/// Encode MP3 audio as a `data:` URL the browser can play directly
pub fn data_url(audio: &[u8]) -> String {
    format!("data:audio/mp3;base64,{}", STANDARD.encode(audio))
}

/// Price of narrating `text`
///
/// `max(0.10, chars / 100 * 0.0001)`, formatted with two decimals.
#[allow(clippy::cast_precision_loss)]
pub fn quote(text: &str) -> String {
    let chars = text.chars().count() as f64;
    let amount = (chars / 100.0 * PRICE_PER_HUNDRED_CHARS).max(MINIMUM_QUOTE);

    format!("{amount:.2}")
}
