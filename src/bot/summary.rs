//! Summarization client for an OpenAI-compatible chat-completion endpoint.

use serde::{Deserialize, Serialize};
use tracing::{debug, info};

use crate::bot::reply::texts;
use crate::config::Config;

const SYSTEM_PROMPT: &str = "You are a helpful assistant. Summarize the user text:";

/// Outcome of one summarization call.
///
/// The backend's "no content" and "call failed" cases are distinct values
/// here; they collapse to display text only when the chat reply is composed.
#[derive(Debug, PartialEq)]
pub enum Summary {
    Text(String),
    Empty,
    Failed(String),
}

impl Summary {
    /// Collapse to the text shown to the user. Always non-empty.
    pub fn into_text(self) -> String {
        match self {
            Self::Text(text) => text,
            Self::Empty => texts::EMPTY_SUMMARY.to_string(),
            Self::Failed(description) => {
                format!("{}{description}", texts::SUMMARY_FAILED_PREFIX)
            }
        }
    }
}

pub struct SummaryClient {
    client: reqwest::Client,
    base_url: String,
    api_key: String,
    model: String,
}

#[derive(Serialize)]
struct ChatRequest {
    model: String,
    messages: Vec<ChatMessage>,
    stream: bool,
}

#[derive(Serialize)]
struct ChatMessage {
    role: &'static str,
    content: String,
}

#[derive(Deserialize)]
struct ChatResponse {
    #[serde(default)]
    choices: Vec<Choice>,
}

#[derive(Deserialize)]
struct Choice {
    message: ResponseMessage,
}

#[derive(Deserialize)]
struct ResponseMessage {
    content: Option<String>,
}

impl SummaryClient {
    pub fn new(config: &Config) -> Self {
        Self {
            client: reqwest::Client::new(),
            base_url: config.summary_api_base.clone(),
            api_key: config.summary_api_key.clone(),
            model: config.summary_model.clone(),
        }
    }

    /// Summarize `text`. Never fails; faults become [`Summary::Failed`].
    pub async fn summarize(&self, text: &str) -> Summary {
        match self.complete(text).await {
            Ok(content) if content.is_empty() => Summary::Empty,
            Ok(content) => {
                info!("Summary generated ({} chars)", content.chars().count());
                Summary::Text(content)
            }
            Err(description) => {
                debug!("Summary request failed: {description}");
                Summary::Failed(description)
            }
        }
    }

    /// One non-streaming chat-completion call. Returns the raw content of
    /// the first choice; a response without content yields an empty string.
    async fn complete(&self, text: &str) -> Result<String, String> {
        let request = ChatRequest {
            model: self.model.clone(),
            messages: vec![
                ChatMessage { role: "system", content: SYSTEM_PROMPT.to_string() },
                ChatMessage { role: "user", content: text.to_string() },
            ],
            stream: false,
        };

        let url = format!("{}/chat/completions", self.base_url);
        debug!("Sending summary request to {url}");

        let mut builder = self.client.post(&url).json(&request);
        if !self.api_key.is_empty() {
            builder = builder.header("Authorization", format!("Bearer {}", self.api_key));
        }

        let response = builder.send().await.map_err(|e| format!("HTTP error: {e}"))?;

        let status = response.status();
        let body = response
            .text()
            .await
            .map_err(|e| format!("Failed to read response: {e}"))?;

        if !status.is_success() {
            return Err(format!("API error {status}: {body}"));
        }

        parse_response(&body)
    }
}

/// Extract the first choice's content from a chat-completion response body.
fn parse_response(body: &str) -> Result<String, String> {
    let parsed: ChatResponse =
        serde_json::from_str(body).map_err(|e| format!("Failed to parse response: {e}"))?;

    Ok(parsed
        .choices
        .into_iter()
        .next()
        .and_then(|c| c.message.content)
        .unwrap_or_default())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_parse_response_with_content() {
        let body = r#"{"choices":[{"message":{"role":"assistant","content":"краткое резюме"}}]}"#;
        assert_eq!(parse_response(body).unwrap(), "краткое резюме");
    }

    #[test]
    fn test_parse_response_without_choices() {
        assert_eq!(parse_response(r#"{"choices":[]}"#).unwrap(), "");
        assert_eq!(parse_response(r#"{}"#).unwrap(), "");
    }

    #[test]
    fn test_parse_response_with_null_content() {
        let body = r#"{"choices":[{"message":{"role":"assistant","content":null}}]}"#;
        assert_eq!(parse_response(body).unwrap(), "");
    }

    #[test]
    fn test_parse_response_rejects_garbage() {
        assert!(parse_response("not json").is_err());
    }

    #[test]
    fn test_empty_summary_placeholder_is_exact() {
        assert_eq!(Summary::Empty.into_text(), "Ошибка: пустой ответ от g4f.");
    }

    #[test]
    fn test_failed_summary_embeds_description() {
        let text = Summary::Failed("connection refused".to_string()).into_text();
        assert_eq!(text, "Не удалось получить ответ от g4f: connection refused");
    }

    #[test]
    fn test_text_summary_is_verbatim() {
        let text = Summary::Text("ответ".to_string()).into_text();
        assert_eq!(text, "ответ");
    }
}
