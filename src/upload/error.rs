use crate::media::UploadError;
use crate::store::StoreError;
use std::fmt;
use thiserror::Error;

#[derive(Error, Debug)]
pub enum ValidationError {
    #[error("Please select at least one image")]
    NoFiles,

    #[error("None of the selected files is a valid image")]
    NoValidFiles { rejected: Vec<Rejection> },

    #[error("Title is required")]
    EmptyTitle,

    #[error("Invalid upload form: {0}")]
    MalformedForm(String),
}

/// Why one file of a batch failed after passing validation.
#[derive(Error, Debug)]
pub enum ItemError {
    #[error(transparent)]
    Media(#[from] UploadError),

    #[error(transparent)]
    Store(#[from] StoreError),
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum RejectReason {
    NotAnImage(Option<String>),
    Empty,
    TooLarge { size: usize, limit: usize },
}

impl fmt::Display for RejectReason {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            RejectReason::NotAnImage(Some(content_type)) => {
                write!(f, "not an image ({})", content_type)
            }
            RejectReason::NotAnImage(None) => write!(f, "not an image"),
            RejectReason::Empty => write!(f, "file is empty"),
            RejectReason::TooLarge { size, limit } => {
                write!(f, "{} bytes exceeds the {} byte limit", size, limit)
            }
        }
    }
}

/// A file excluded by validation. Never retried.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Rejection {
    pub file_name: String,
    pub reason: RejectReason,
}

impl fmt::Display for Rejection {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}: {}", self.file_name, self.reason)
    }
}
