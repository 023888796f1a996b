use std::env;
use std::fmt;
use std::path::PathBuf;

/// Errors that can occur when loading configuration.
#[derive(Debug)]
pub enum ConfigError {
    /// A required environment variable is not set.
    MissingVar { name: &'static str },
    /// Validation error.
    Validation(String),
}

impl fmt::Display for ConfigError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::MissingVar { name } => {
                write!(f, "required environment variable {name} is not set")
            }
            Self::Validation(msg) => write!(f, "config validation error: {msg}"),
        }
    }
}

impl std::error::Error for ConfigError {}

const DEFAULT_MODEL_PATH: &str = "models/ggml-small.bin";
const DEFAULT_SUMMARY_API_BASE: &str = "https://openrouter.ai/api/v1";
const DEFAULT_SUMMARY_MODEL: &str = "gpt-4o-mini";

pub struct Config {
    pub telegram_bot_token: String,
    /// Path to the Whisper model file (.bin) for voice transcription.
    pub whisper_model_path: PathBuf,
    /// Base URL of the OpenAI-compatible chat-completion endpoint.
    pub summary_api_base: String,
    /// Bearer token for the summary endpoint. Empty means no Authorization header.
    pub summary_api_key: String,
    /// Chat model used for summaries.
    pub summary_model: String,
}

impl Config {
    pub fn from_env() -> Result<Self, ConfigError> {
        Self::from_lookup(|name| env::var(name).ok())
    }

    fn from_lookup(lookup: impl Fn(&str) -> Option<String>) -> Result<Self, ConfigError> {
        let telegram_bot_token = lookup("TELEGRAM_BOT_TOKEN")
            .filter(|t| !t.is_empty())
            .ok_or(ConfigError::MissingVar { name: "TELEGRAM_BOT_TOKEN" })?;

        // Telegram tokens are formatted as {bot_id}:{secret} where bot_id is numeric
        let token_parts: Vec<&str> = telegram_bot_token.split(':').collect();
        if token_parts.len() != 2 || token_parts[0].parse::<u64>().is_err() || token_parts[1].is_empty() {
            return Err(ConfigError::Validation(
                "TELEGRAM_BOT_TOKEN appears invalid (expected format: 123456789:ABCdefGHI...)".into(),
            ));
        }

        let whisper_model_path = lookup("WHISPER_MODEL_PATH")
            .map(PathBuf::from)
            .unwrap_or_else(|| PathBuf::from(DEFAULT_MODEL_PATH));

        let summary_api_base = lookup("SUMMARY_API_BASE")
            .unwrap_or_else(|| DEFAULT_SUMMARY_API_BASE.to_string())
            .trim_end_matches('/')
            .to_string();

        let summary_api_key = lookup("SUMMARY_API_KEY").unwrap_or_default();

        let summary_model =
            lookup("SUMMARY_MODEL").unwrap_or_else(|| DEFAULT_SUMMARY_MODEL.to_string());

        Ok(Self {
            telegram_bot_token,
            whisper_model_path,
            summary_api_base,
            summary_api_key,
            summary_model,
        })
    }
}
