//! Error types for the tech tracker client

/// Errors that can occur while talking to the Tech Tracker API
#[derive(Debug, thiserror::Error)]
pub enum TechTrackerError {
    #[error("Configuration error: {0}")]
    Config(String),

    #[error("HTTP request failed: {0}")]
    Http(String),

    #[error("Unexpected HTTP status {status}: {body}")]
    Status { status: u16, body: String },

    #[error("JSON parse error: {0}")]
    Json(#[from] serde_json::Error),

    #[error("Invalid timestamp: {0}")]
    Timestamp(String),
}

/// Result type alias for tech tracker operations
pub type Result<T> = std::result::Result<T, TechTrackerError>;
