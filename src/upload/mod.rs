mod error;
mod flow;
mod handlers;
mod types;
pub mod validate;


pub use error::*;
pub use flow::{UploadFlow, UploadState};
pub use handlers::{upload_page, upload_submit, validate_upload_handler};
pub use types::*;
