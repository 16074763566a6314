use thiserror::Error;

#[derive(Error, Debug)]
pub enum UploadError {
    #[error("Media host configuration error: {0}")]
    ConfigError(String),

    #[error("Upload request failed: {0}")]
    RequestError(#[from] reqwest::Error),

    #[error("Upload rejected with status {status}: {message}")]
    Rejected { status: u16, message: String },

    #[error("Unexpected upload response: {0}")]
    InvalidResponse(String),
}
