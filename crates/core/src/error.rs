#[derive(Debug, thiserror::Error)]
pub enum RecordError {
    #[error("malformed request: {0}")]
    MalformedRequest(String),
    #[error("invalid input: {0}")]
    InvalidInput(String),
    #[error("store operation failed: {0}")]
    Store(#[from] sqlx::Error),
}

pub type RecordResult<T> = std::result::Result<T, RecordError>;
