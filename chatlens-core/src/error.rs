//! Error types for chatlens-core

use thiserror::Error;

/// Main error type for the chatlens-core library
#[derive(Error, Debug)]
pub enum Error {
    /// The input did not look like a YouTube stream URL
    #[error("invalid YouTube URL: {0}")]
    InvalidUrl(String),

    /// The stream has no active live chat (not live, chat disabled, or unknown id)
    #[error("live chat unavailable for stream {0}")]
    ChatUnavailable(String),

    /// Network or HTTP-level failure talking to a remote service
    #[error("transport error: {0}")]
    Transport(String),

    /// A chat page came back without the expected shape
    #[error("malformed chat page: {0}")]
    MalformedPage(String),

    /// The completion service failed to produce an analysis
    #[error("analysis service error: {0}")]
    AnalysisService(String),

    /// A required API key was not configured
    #[error("missing credential: {0}")]
    MissingCredential(String),

    /// Configuration error
    #[error("configuration error: {0}")]
    Config(String),

    /// IO error
    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),

    /// JSON parsing error
    #[error("JSON error: {0}")]
    Json(#[from] serde_json::Error),

    /// CSV export error
    #[error("CSV error: {0}")]
    Csv(#[from] csv::Error),
}

/// Result type alias for chatlens-core
pub type Result<T> = std::result::Result<T, Error>;
