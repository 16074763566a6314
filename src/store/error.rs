use thiserror::Error;

#[derive(Error, Debug)]
pub enum StoreError {
    #[error("Data store configuration error: {0}")]
    ConfigError(String),

    #[error("Data store request failed: {0}")]
    RequestError(#[from] reqwest::Error),

    #[error("Data store query failed with status {status}: {message}")]
    QueryFailed { status: u16, message: String },

    #[error("Unexpected data store response: {0}")]
    InvalidResponse(String),

    #[error("Photo not found: {0}")]
    NotFound(String),

    #[error("Expected one photo for {id}, found {count}")]
    Ambiguous { id: String, count: usize },
}

impl StoreError {
    pub fn is_not_found(&self) -> bool {
        matches!(self, StoreError::NotFound(_))
    }
}
