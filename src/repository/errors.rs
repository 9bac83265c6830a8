use reqwest::StatusCode;
use thiserror::Error;

#[derive(Debug, Error)]
pub enum RepositoryError {
    #[error("Entity not found")]
    NotFound,

    #[error("Not authorized")]
    Unauthorized,

    #[error("Backend error ({status}): {message}")]
    Api { status: u16, message: String },

    #[error("Validation error: {0}")]
    ValidationError(String),

    #[error("Connection error: {0}")]
    ConnectionError(String),

    #[error("Unexpected error: {0}")]
    Unexpected(String),
}

pub type RepositoryResult<T> = Result<T, RepositoryError>;

impl RepositoryError {
    /// Maps a non-success HTTP status and the backend's message.
    pub fn from_status(status: StatusCode, message: Option<String>) -> Self {
        match status {
            StatusCode::UNAUTHORIZED | StatusCode::FORBIDDEN => RepositoryError::Unauthorized,
            StatusCode::NOT_FOUND => RepositoryError::NotFound,
            _ => RepositoryError::Api {
                status: status.as_u16(),
                message: message.unwrap_or_else(|| {
                    status
                        .canonical_reason()
                        .unwrap_or("request failed")
                        .to_string()
                }),
            },
        }
    }
}

impl From<reqwest::Error> for RepositoryError {
    fn from(err: reqwest::Error) -> Self {
        if err.is_timeout() || err.is_connect() {
            RepositoryError::ConnectionError(format!("Connection error: {err}"))
        } else if err.is_decode() {
            RepositoryError::ValidationError(format!("Malformed response: {err}"))
        } else if let Some(status) = err.status() {
            RepositoryError::from_status(status, None)
        } else {
            RepositoryError::Unexpected(format!("Unexpected HTTP error: {err}"))
        }
    }
}
