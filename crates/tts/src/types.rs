use serde::{Deserialize, Serialize};

/// Body of `POST /api/convert-to-audio`
#[derive(Debug, Deserialize)]
pub struct AudioRequest {
    /// Story text to narrate; a missing field is treated like empty text
    #[serde(default)]
    pub text: String,
}

/// Narrated audio as a `data:audio/mp3;base64,...` URL
#[derive(Debug, Serialize)]
pub struct AudioResponse {
    pub audio: String,
}

/// Body of `POST /api/audio-quote`
#[derive(Debug, Deserialize)]
pub struct QuoteRequest {
    #[serde(default)]
    pub text: String,
}

/// Price of narrating a text, formatted with two decimals
#[derive(Debug, Serialize)]
pub struct QuoteResponse {
    pub amount: String,
}
