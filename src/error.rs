use thiserror::Error;

pub type Result<T> = std::result::Result<T, GboardError>;

#[derive(Error, Debug)]
pub enum GboardError {
    #[error("No API token available (pass --token or set GITHUB_TOKEN)")]
    MissingCredential,
    #[error("API token was rejected")]
    InvalidCredential,
    #[error("API rate limit exceeded")]
    RateLimited,
    #[error("Access forbidden: {0}")]
    Forbidden(String),
    #[error("Not found: {0}")]
    NotFound(String),
    #[error("Statistics are still being computed upstream")]
    StillComputing,
    #[error("No contributor data for {0}")]
    EmptyResult(String),
    #[error("API error {status}: {body}")]
    Api { status: u16, body: String },
    #[error("HTTP error: {0}")]
    Http(#[from] reqwest::Error),
    #[error("Database error: {0}")]
    Database(#[from] rusqlite::Error),
    #[error("Cache error: {0}")]
    Cache(String),
    #[error("Serialization error: {0}")]
    Serde(#[from] serde_json::Error),
    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),
    #[error("Parse error: {0}")]
    Parse(String),
    #[error("Invalid date: {0}")]
    InvalidDate(String),
}

impl GboardError {
    /// Only the still-computing response is worth a whole-pipeline retry.
    pub fn is_retryable(&self) -> bool {
        matches!(self, GboardError::StillComputing)
    }
}
