//! Error types for talking to the news API and loading configuration.
//!
//! Controllers never propagate these past themselves: every failure is folded
//! into view state (an error banner, an error card) so the UI stays usable.
//! Only start-up failures (bad config, missing key, unknown route) reach
//! `main`.

use thiserror::Error;

/// Message shown on the list view when the API answers with an error body
/// that carries no `message` of its own.
pub const FALLBACK_API_MESSAGE: &str = "Failed to fetch news";

/// Message shown on the list view for failures that never produced a body.
pub const TRANSPORT_MESSAGE: &str = "An error occurred while fetching news";

/// Errors raised while fetching and decoding news, or while starting up.
#[derive(Error, Debug)]
pub enum NewsError {
    /// Network or connection level failure.
    #[error("HTTP transport error: {0}")]
    Transport(#[from] reqwest::Error),

    /// Non-success HTTP status whose body could not be decoded.
    #[error("HTTP status {0}")]
    HttpStatus(u16),

    /// The API answered with a body whose `status` is not `"ok"`.
    #[error("API error{}: {}", code_suffix(.code), message_or_fallback(.message))]
    Api {
        code: Option<String>,
        message: Option<String>,
    },

    /// Response body was not valid JSON for the expected shape.
    #[error("Failed to decode response: {0}")]
    Decode(#[from] serde_json::Error),

    /// Endpoint URL could not be built.
    #[error("Invalid URL: {0}")]
    InvalidUrl(#[from] url::ParseError),

    /// No API key from flags, environment or config file.
    #[error("No API key configured; pass --api-key, set NEWS_API_KEY or add api_key to the config file")]
    MissingApiKey,

    /// Config file could not be parsed.
    #[error("Config error: {0}")]
    Config(#[from] serde_yaml::Error),

    /// Category name outside the configured list.
    #[error("Unknown category `{name}`; choose one of: {}", .choices.join(", "))]
    UnknownCategory { name: String, choices: Vec<String> },

    /// Route string is neither `/` nor `/article/:id`.
    #[error("Unknown route: {0}")]
    UnknownRoute(String),

    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),
}

impl NewsError {
    /// True when the server answered with a decodable body.
    ///
    /// Page-1 list requests that fail without a body clear the stale list;
    /// failures with a body leave it alone.
    pub fn resolved_body(&self) -> bool {
        matches!(self, NewsError::Api { .. })
    }

    /// Text for the list view's inline error banner.
    pub fn user_message(&self) -> String {
        match self {
            NewsError::Api { message, .. } => message
                .clone()
                .filter(|m| !m.is_empty())
                .unwrap_or_else(|| FALLBACK_API_MESSAGE.to_string()),
            _ => TRANSPORT_MESSAGE.to_string(),
        }
    }
}

fn code_suffix(code: &Option<String>) -> String {
    code.as_deref().map(|c| format!(" ({c})")).unwrap_or_default()
}

fn message_or_fallback(message: &Option<String>) -> &str {
    message.as_deref().unwrap_or(FALLBACK_API_MESSAGE)
}

/// Result type alias using [`NewsError`].
pub type Result<T> = std::result::Result<T, NewsError>;
