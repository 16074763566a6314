use async_trait::async_trait;
use std::collections::HashMap;
use std::io::Cursor;
use tokio::sync::RwLock;
use tracing::{debug, info};
use uuid::Uuid;

use crate::media::{MediaFile, MediaHost, UploadError, UploadedMedia};

/// Keeps uploaded assets in process. Nothing survives a restart.
pub struct MemoryHost {
    base_url: String,
    assets: RwLock<HashMap<String, MediaFile>>,
}

impl MemoryHost {
    pub fn new(base_url: &str) -> Self {
        Self {
            base_url: base_url.trim_end_matches('/').to_string(),
            assets: RwLock::new(HashMap::new()),
        }
    }

    pub async fn contains(&self, media_id: &str) -> bool {
        self.assets.read().await.contains_key(media_id)
    }

    pub async fn len(&self) -> usize {
        self.assets.read().await.len()
    }

    pub async fn is_empty(&self) -> bool {
        self.assets.read().await.is_empty()
    }
}

impl Default for MemoryHost {
    fn default() -> Self {
        Self::new(&crate::media::MemoryHostConfig::default().base_url)
    }
}

fn image_dimensions(bytes: &[u8]) -> Result<(u32, u32), UploadError> {
    image::ImageReader::new(Cursor::new(bytes))
        .with_guessed_format()
        .map_err(|e| UploadError::InvalidResponse(e.to_string()))?
        .into_dimensions()
        .map_err(|e| UploadError::Rejected {
            status: 400,
            message: format!("Invalid image file: {}", e),
        })
}

#[async_trait]
impl MediaHost for MemoryHost {
    async fn upload(&self, file: &MediaFile) -> Result<UploadedMedia, UploadError> {
        let (width, height) = image_dimensions(&file.bytes)?;
        let media_id = format!("photoshare/{}", Uuid::new_v4().simple());
        let url = format!("{}/{}", self.base_url, media_id);

        debug!("Storing {} in memory as {}", file.file_name, media_id);
        self.assets
            .write()
            .await
            .insert(media_id.clone(), file.clone());

        Ok(UploadedMedia {
            url,
            media_id,
            width,
            height,
        })
    }

    async fn delete(&self, media_id: &str) -> bool {
        let removed = self.assets.write().await.remove(media_id).is_some();
        if removed {
            info!("Deleted {} from memory host", media_id);
        }
        removed
    }

    async fn fetch(&self, media_id: &str) -> Option<MediaFile> {
        self.assets.read().await.get(media_id).cloned()
    }

    fn name(&self) -> &str {
        "In-memory media host"
    }
}
