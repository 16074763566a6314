pub mod config;
pub mod display;
pub mod error;
mod handlers;
pub mod providers;
pub mod types;

pub use config::*;
pub use display::*;
pub use error::*;
pub use handlers::{asset_id, serve_media};
pub use types::*;

use async_trait::async_trait;
use std::sync::Arc;

#[async_trait]
pub trait MediaHost: Send + Sync {
    /// Stores one file. Never retries.
    async fn upload(&self, file: &MediaFile) -> Result<UploadedMedia, UploadError>;

    /// `true` only when the host confirmed the deletion. Failures are logged,
    /// so `false` means "unconfirmed", not "definitely still stored".
    async fn delete(&self, media_id: &str) -> bool;

    /// Stored bytes of an asset this host serves itself. Remote hosts serve
    /// their own URLs and return `None`.
    async fn fetch(&self, _media_id: &str) -> Option<MediaFile> {
        None
    }

    fn name(&self) -> &str;
}

pub type DynMediaHost = Arc<dyn MediaHost>;

pub fn create_host(config: &MediaHostConfig) -> Result<DynMediaHost, UploadError> {
    match config {
        MediaHostConfig::Cloudinary(cloudinary_config) => Ok(Arc::new(
            providers::cloudinary::CloudinaryHost::new(cloudinary_config)?,
        )),
        MediaHostConfig::Memory(memory_config) => Ok(Arc::new(
            providers::memory::MemoryHost::new(&memory_config.base_url),
        )),
    }
}
