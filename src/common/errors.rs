//! Error types for the application

use thiserror::Error;

/// Result type alias using our MonitorError
pub type Result<T> = std::result::Result<T, MonitorError>;

/// Main error type for feed, notifier and configuration operations
///
/// The strategy engine itself has no failure modes; these errors only
/// come from the I/O edges around it.
#[derive(Error, Debug)]
pub enum MonitorError {
    /// HTTP request errors
    #[error("HTTP request error: {0}")]
    HttpRequest(#[from] reqwest::Error),

    /// JSON serialization/deserialization errors
    #[error("JSON parsing error: {0}")]
    JsonParse(#[from] serde_json::Error),

    /// File system errors (replay files)
    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),

    /// Outcome with an unknown category or an invalid score
    #[error("Malformed outcome: {0}")]
    MalformedOutcome(String),

    /// Invalid API response
    #[error("Invalid API response: {0}")]
    InvalidResponse(String),

    /// Configuration errors
    #[error("Configuration error: {0}")]
    Configuration(String),

    /// Channel send errors
    #[error("Channel send error: {0}")]
    ChannelSend(String),

    /// Generic internal errors
    #[error("Internal error: {0}")]
    Internal(String),
}

impl MonitorError {
    /// Whether the error only affects the current item and the loop can go on
    pub fn is_recoverable(&self) -> bool {
        !matches!(self, MonitorError::Configuration(_))
    }
}
