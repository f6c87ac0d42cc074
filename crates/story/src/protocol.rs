//! `OpenAI` chat completion wire format, as spoken by Groq

use serde::{Deserialize, Serialize};

/// Chat completion request
#[derive(Debug, Clone, Serialize)]
pub struct ChatRequest<'a> {
    pub model: &'a str,
    pub messages: Vec<ChatMessage<'a>>,
    pub temperature: f32,
    pub max_tokens: u32,
}

/// Message within a request
#[derive(Debug, Clone, Serialize)]
pub struct ChatMessage<'a> {
    pub role: &'a str,
    pub content: &'a str,
}

impl<'a> ChatMessage<'a> {
    pub const fn system(content: &'a str) -> Self {
        Self { role: "system", content }
    }

    pub const fn user(content: &'a str) -> Self {
        Self { role: "user", content }
    }
}

/// Chat completion response; only the parts we read
#[derive(Debug, Clone, Deserialize)]
pub struct ChatResponse {
    #[serde(default)]
    pub choices: Vec<ChatChoice>,
}

#[derive(Debug, Clone, Deserialize)]
pub struct ChatChoice {
    pub message: ChatResponseMessage,
    #[serde(default)]
    pub finish_reason: Option<String>,
}

#[derive(Debug, Clone, Deserialize)]
pub struct ChatResponseMessage {
    #[serde(default)]
    pub content: Option<String>,
}

impl ChatResponse {
    /// Text of the first choice, if any
    pub fn into_content(self) -> Option<String> {
        self.choices.into_iter().next().and_then(|choice| choice.message.content)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn request_serializes_messages_in_order() {
        let request = ChatRequest {
            model: "llama-3.1-8b-instant",
            messages: vec![ChatMessage::system("persona"), ChatMessage::user("a fox")],
            temperature: 0.7,
            max_tokens: 2000,
        };

        let json = serde_json::to_value(&request).unwrap();

        assert_eq!(json["messages"][0]["role"], "system");
        assert_eq!(json["messages"][1]["content"], "a fox");
        assert_eq!(json["max_tokens"], 2000);
    }

    #[test]
    fn first_choice_content_is_extracted() {
        let response: ChatResponse = serde_json::from_value(serde_json::json!({
            "id": "chatcmpl-1",
            "object": "chat.completion",
            "choices": [
                { "index": 0, "message": { "role": "assistant", "content": "Once upon a time" }, "finish_reason": "stop" }
            ],
            "usage": { "prompt_tokens": 10, "completion_tokens": 4, "total_tokens": 14 }
        }))
        .unwrap();

        assert_eq!(response.into_content().as_deref(), Some("Once upon a time"));
    }

    #[test]
    fn missing_choices_yield_nothing() {
        let response: ChatResponse = serde_json::from_str("{}").unwrap();
        assert!(response.into_content().is_none());
    }
}
