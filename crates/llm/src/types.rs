use serde::{Deserialize, Serialize};

/// Chat completions request (OpenAI-compatible)
#[derive(Debug, Clone, Serialize)]
pub struct ChatCompletionRequest {
    /// Model name (e.g., "deepseek-chat")
    pub model: String,

    /// Conversation; a single user message for generation
    pub messages: Vec<ChatMessage>,

    /// Sampling temperature
    pub temperature: f32,

    /// Maximum tokens to generate
    pub max_tokens: u32,
}

/// Chat message
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
pub struct ChatMessage {
    pub role: String,
    pub content: String,
}

impl ChatMessage {
    /// Create a user message
    pub fn user(content: impl Into<String>) -> Self {
        Self {
            role: "user".to_string(),
            content: content.into(),
        }
    }
}

/// Generation options sent with every request
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct GenerateOptions {
    /// Temperature (0.0 - 2.0)
    pub temperature: f32,

    /// Maximum tokens to generate
    pub max_tokens: u32,
}

impl Default for GenerateOptions {
    fn default() -> Self {
        Self {
            temperature: studycards_common::config::DEFAULT_TEMPERATURE,
            max_tokens: studycards_common::config::DEFAULT_MAX_OUTPUT_TOKENS,
        }
    }
}

/// Chat completions response
#[derive(Debug, Clone, Deserialize)]
pub struct ChatCompletionResponse {
    #[serde(default)]
    pub model: Option<String>,

    #[serde(default)]
    pub choices: Vec<ChatChoice>,
}

impl ChatCompletionResponse {
    /// Text of the first choice, if it has any
    pub fn first_content(&self) -> Option<&str> {
        self.choices
            .first()
            .and_then(|choice| choice.message.content.as_deref())
            .filter(|content| !content.trim().is_empty())
    }

    /// First choice stopped at the token ceiling
    pub fn truncated(&self) -> bool {
        self.choices
            .first()
            .and_then(|choice| choice.finish_reason.as_deref())
            == Some("length")
    }
}

/// One completion choice
#[derive(Debug, Clone, Deserialize)]
pub struct ChatChoice {
    pub message: ChatResponseMessage,

    #[serde(default)]
    pub finish_reason: Option<String>,
}

/// Assistant message in a completion choice
#[derive(Debug, Clone, Deserialize)]
pub struct ChatResponseMessage {
    #[serde(default)]
    pub content: Option<String>,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_request_body_shape() {
        let request = ChatCompletionRequest {
            model: "deepseek-chat".to_string(),
            messages: vec![ChatMessage::user("hello")],
            temperature: 0.7,
            max_tokens: 5000,
        };
        let body = serde_json::to_value(&request).unwrap();
        assert_eq!(body["model"], "deepseek-chat");
        assert_eq!(body["messages"][0]["role"], "user");
        assert_eq!(body["messages"][0]["content"], "hello");
        assert_eq!(body["max_tokens"], 5000);
    }

    #[test]
    fn test_first_content() {
        let response: ChatCompletionResponse = serde_json::from_str(
            r#"{"model":"deepseek-chat","choices":[{"index":0,"message":{"role":"assistant","content":"{}"},"finish_reason":"stop"}]}"#,
        )
        .unwrap();
        assert_eq!(response.first_content(), Some("{}"));

        let empty: ChatCompletionResponse = serde_json::from_str(r#"{"choices":[]}"#).unwrap();
        assert_eq!(empty.first_content(), None);

        let blank: ChatCompletionResponse =
            serde_json::from_str(r#"{"choices":[{"message":{"content":"  "}}]}"#).unwrap();
        assert_eq!(blank.first_content(), None);
    }

    #[test]
    fn test_truncated() {
        let cut: ChatCompletionResponse = serde_json::from_str(
            r#"{"choices":[{"message":{"content":"{\"flashcards\":["},"finish_reason":"length"}]}"#,
        )
        .unwrap();
        assert!(cut.truncated());

        let done: ChatCompletionResponse = serde_json::from_str(
            r#"{"choices":[{"message":{"content":"{}"},"finish_reason":"stop"}]}"#,
        )
        .unwrap();
        assert!(!done.truncated());

        let unknown: ChatCompletionResponse =
            serde_json::from_str(r#"{"choices":[{"message":{"content":"{}"}}]}"#).unwrap();
        assert!(!unknown.truncated());
    }
}
