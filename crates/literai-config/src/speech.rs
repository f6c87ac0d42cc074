use std::{path::PathBuf, time::Duration};

use secrecy::SecretString;
use serde::{Deserialize, Serialize};
use url::Url;

pub const DEFAULT_SPEECH_BASE_URL: &str = "https://api.elevenlabs.io/v1";

/// Speech provider settings for audio generation
#[derive(Debug, Clone, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct SpeechConfig {
    /// API key for the speech provider
    #[serde(default)]
    pub api_key: Option<SecretString>,
    /// Base URL override
    #[serde(default = "default_base_url")]
    pub base_url: Url,
    /// Voice every story is narrated with
    #[serde(default = "default_voice_id")]
    pub voice_id: String,
    /// Synthesis model
    #[serde(default = "default_model_id")]
    pub model_id: String,
    /// Provider output format; every segment uses the same one
    #[serde(default = "default_output_format")]
    pub output_format: String,
    /// Latency optimisation level passed to the streaming endpoint
    #[serde(default = "default_streaming_latency")]
    pub optimize_streaming_latency: Option<u8>,
    /// Voice parameters attached to every call
    #[serde(default)]
    pub voice: VoiceSettings,
    /// Longest text sent in a single synthesis call
    #[serde(default = "default_max_chunk_chars")]
    pub max_chunk_chars: usize,
    /// Deadline for each synthesis call
    #[serde(default = "default_timeout", deserialize_with = "duration_str::deserialize_duration")]
    pub timeout: Duration,
    /// Write every generated payload here for inspection
    #[serde(default)]
    pub debug_audio_path: Option<PathBuf>,
    /// Pre-synthesized fixed phrases
    #[serde(default)]
    pub phrase_cache: PhraseCacheConfig,
}

impl Default for SpeechConfig {
    fn default() -> Self {
        Self {
            api_key: None,
            base_url: default_base_url(),
            voice_id: default_voice_id(),
            model_id: default_model_id(),
            output_format: default_output_format(),
            optimize_streaming_latency: default_streaming_latency(),
            voice: VoiceSettings::default(),
            max_chunk_chars: default_max_chunk_chars(),
            timeout: default_timeout(),
            debug_audio_path: None,
            phrase_cache: PhraseCacheConfig::default(),
        }
    }
}

impl SpeechConfig {
    /// Configured API key, `None` when missing or blank
    pub fn api_key(&self) -> Option<&SecretString> {
        crate::non_empty_secret(self.api_key.as_ref())
    }
}

/// Voice synthesis parameters, serialized as the provider's `voice_settings`
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct VoiceSettings {
    pub stability: f32,
    pub similarity_boost: f32,
    pub style: f32,
    #[serde(rename = "use_speaker_boost", alias = "speaker_boost")]
    pub speaker_boost: bool,
}

impl Default for VoiceSettings {
    fn default() -> Self {
        Self {
            stability: 0.9,
            similarity_boost: 0.75,
            style: 0.2,
            speaker_boost: true,
        }
    }
}

/// Fixed phrases synthesized once at startup
#[derive(Debug, Clone, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct PhraseCacheConfig {
    #[serde(default = "default_phrase_cache_enabled")]
    pub enabled: bool,
    #[serde(default = "default_phrases")]
    pub phrases: Vec<String>,
}

impl Default for PhraseCacheConfig {
    fn default() -> Self {
        Self {
            enabled: default_phrase_cache_enabled(),
            phrases: default_phrases(),
        }
    }
}

fn default_base_url() -> Url {
    Url::parse(DEFAULT_SPEECH_BASE_URL).expect("default speech URL is valid")
}

fn default_voice_id() -> String {
    "UgBBYS2sOqTuMpoF3BR0".to_string()
}

fn default_model_id() -> String {
    "eleven_monolingual_v1".to_string()
}

fn default_output_format() -> String {
    "mp3_44100_128".to_string()
}

#[allow(clippy::unnecessary_wraps)]
const fn default_streaming_latency() -> Option<u8> {
    Some(3)
}

const fn default_max_chunk_chars() -> usize {
    500
}

const fn default_timeout() -> Duration {
    Duration::from_secs(15)
}

#[allow(clippy::missing_const_for_fn)]
fn default_phrase_cache_enabled() -> bool {
    true
}

fn default_phrases() -> Vec<String> {
    [
        "Once upon a time",
        "The end.",
        "They lived happily ever after.",
        "I couldn\u{2019}t help but smile",
        "My name is Emily",
    ]
    .into_iter()
    .map(ToString::to_string)
    .collect()
}
