use thiserror::Error;

#[derive(Error, Debug)]
pub enum ShortsError {
    #[error("Malformed timestamp: {0:?}")]
    MalformedTimestamp(String),

    #[error("Invalid configuration: {0}")]
    Config(String),

    #[error("Media processing failed: {0}")]
    Media(String),

    #[error("Transcription failed: {0}")]
    Transcription(String),

    #[error("API error ({status}): {message}")]
    Api { status: u16, message: String },

    #[error("File not found: {0}")]
    FileNotFound(String),

    #[error("Pipeline cancelled")]
    Cancelled,

    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),

    #[error("HTTP error: {0}")]
    Http(#[from] reqwest::Error),

    #[error("JSON error: {0}")]
    Json(#[from] serde_json::Error),
}

pub type Result<T> = std::result::Result<T, ShortsError>;

impl ShortsError {
    /// An HTTP 4xx answer; retrying the same request will not help.
    pub fn is_client_error(&self) -> bool {
        matches!(self, ShortsError::Api { status, .. } if (400..500).contains(status))
    }
}
