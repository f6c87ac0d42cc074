use async_trait::async_trait;
use bytes::Bytes;
use literai_config::{SpeechConfig, VoiceSettings};
use reqwest::Client;
use secrecy::{ExposeSecret, SecretString};

use super::SpeechProvider;
use crate::{error::TtsError, http_client::http_client};

/// `ElevenLabs` text-to-speech provider
///
/// Every call uses the same voice, model, output format and voice settings,
/// so the MP3 segments it returns can be joined byte-wise.
pub struct ElevenLabsProvider {
    client: Client,
    base_url: String,
    api_key: Option<SecretString>,
    voice_id: String,
    model_id: String,
    output_format: String,
    optimize_streaming_latency: Option<u8>,
    voice_settings: VoiceSettings,
}

impl ElevenLabsProvider {
    pub fn new(config: &SpeechConfig) -> Self {
        Self {
            client: http_client(),
            base_url: config.base_url.as_str().trim_end_matches('/').to_string(),
            api_key: config.api_key().cloned(),
            voice_id: config.voice_id.clone(),
            model_id: config.model_id.clone(),
            output_format: config.output_format.clone(),
            optimize_streaming_latency: config.optimize_streaming_latency,
            voice_settings: config.voice.clone(),
        }
    }

    fn endpoint(&self) -> String {
        format!("{}/text-to-speech/{}/stream", self.base_url, self.voice_id)
    }
}

#[derive(serde::Serialize)]
struct ElevenLabsRequest<'a> {
    text: &'a str,
    model_id: &'a str,
    voice_settings: &'a VoiceSettings,
}

#[async_trait]
impl SpeechProvider for ElevenLabsProvider {
    async fn synthesize(&self, text: &str) -> crate::Result<Bytes> {
        let Some(api_key) = self.api_key.as_ref() else {
            return Err(TtsError::Configuration("speech API key is not configured".to_string()));
        };

        tracing::debug!(voice = %self.voice_id, text_len = text.len(), "ElevenLabs synthesis request");

        let mut query = vec![("output_format", self.output_format.clone())];
        if let Some(latency) = self.optimize_streaming_latency {
            query.push(("optimize_streaming_latency", latency.to_string()));
        }

        let body = ElevenLabsRequest {
            text,
            model_id: &self.model_id,
            voice_settings: &self.voice_settings,
        };

        let response = self
            .client
            .post(self.endpoint())
            .query(&query)
            .header("xi-api-key", api_key.expose_secret())
            .header(http::header::ACCEPT, "audio/mpeg")
            .json(&body)
            .send()
            .await
            .map_err(|e| {
                tracing::error!(error = %e, "ElevenLabs request failed");
                TtsError::Upstream(format!("failed to send request to ElevenLabs: {e}"))
            })?;

        let status = response.status();

        if !status.is_success() {
            let message = response.text().await.unwrap_or_else(|_| "unknown error".to_string());

            tracing::error!(status = %status, "ElevenLabs API error: {message}");

            return Err(TtsError::ProviderApi {
                status: status.as_u16(),
                message,
            });
        }

        let audio = response.bytes().await.map_err(|e| {
            tracing::error!(error = %e, "failed to read ElevenLabs response body");
            TtsError::Upstream(format!("failed to read ElevenLabs audio: {e}"))
        })?;

        if audio.is_empty() {
            return Err(TtsError::Upstream("ElevenLabs returned no audio".to_string()));
        }

        tracing::debug!(bytes = audio.len(), "ElevenLabs synthesis complete");

        Ok(audio)
    }

    fn name(&self) -> &str {
        "elevenlabs"
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn request_body_carries_voice_settings() {
        let settings = VoiceSettings::default();
        let body = ElevenLabsRequest {
            text: "Once upon a time",
            model_id: "eleven_monolingual_v1",
            voice_settings: &settings,
        };

        let json = serde_json::to_value(&body).unwrap();

        assert_eq!(json["text"], "Once upon a time");
        assert_eq!(json["voice_settings"]["use_speaker_boost"], true);
        assert!((json["voice_settings"]["stability"].as_f64().unwrap() - 0.9).abs() < 1e-6);
    }

    #[test]
    fn endpoint_targets_streaming_route_for_voice() {
        let config = SpeechConfig {
            base_url: "http://127.0.0.1:9000/v1/".parse().unwrap(),
            ..SpeechConfig::default()
        };

        let provider = ElevenLabsProvider::new(&config);
        assert_eq!(
            provider.endpoint(),
            "http://127.0.0.1:9000/v1/text-to-speech/UgBBYS2sOqTuMpoF3BR0/stream"
        );
    }

    #[tokio::test]
    async fn missing_key_is_a_configuration_error() {
        let provider = ElevenLabsProvider::new(&SpeechConfig::default());
        let err = provider.synthesize("hello").await.unwrap_err();

        assert!(matches!(err, TtsError::Configuration(_)));
    }
}
