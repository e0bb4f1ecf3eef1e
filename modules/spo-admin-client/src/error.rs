use thiserror::Error;

pub type Result<T> = std::result::Result<T, SpoError>;

#[derive(Debug, Error)]
pub enum SpoError {
    #[error("Network error: {0}")]
    Network(String),

    #[error("API error (status {status}): {message}")]
    Api { status: u16, message: String },

    #[error("Parse error: {0}")]
    Parse(String),

    #[error("Token request failed: {0}")]
    Auth(String),
}

impl From<reqwest::Error> for SpoError {
    fn from(err: reqwest::Error) -> Self {
        SpoError::Network(err.to_string())
    }
}

impl From<serde_json::Error> for SpoError {
    fn from(err: serde_json::Error) -> Self {
        SpoError::Parse(err.to_string())
    }
}
