pub mod config;
pub mod error;
pub mod providers;
pub mod types;

pub use config::*;
pub use error::*;
pub use types::*;

use async_trait::async_trait;
use std::sync::Arc;
use uuid::Uuid;

#[async_trait]
pub trait PhotoStore: Send + Sync {
    /// All photos, newest `created_at` first.
    async fn list_photos(&self) -> Result<Vec<Photo>, StoreError>;

    async fn insert_photo(&self, photo: NewPhoto) -> Result<Photo, StoreError>;

    /// `StoreError::NotFound` when no row has this id.
    async fn update_photo(&self, id: Uuid, update: PhotoUpdate) -> Result<Photo, StoreError>;

    /// No existence check; deleting a missing id succeeds.
    async fn delete_photo(&self, id: Uuid) -> Result<(), StoreError>;

    async fn get_photo_by_id(&self, id: Uuid) -> Result<Photo, StoreError>;

    fn name(&self) -> &str;
}

pub type DynPhotoStore = Arc<dyn PhotoStore>;

pub fn create_store(config: &PhotoStoreConfig) -> Result<DynPhotoStore, StoreError> {
    match config {
        PhotoStoreConfig::Supabase(supabase_config) => Ok(Arc::new(
            providers::supabase::SupabaseStore::new(supabase_config)?,
        )),
        PhotoStoreConfig::Memory => Ok(Arc::new(providers::memory::MemoryStore::new())),
    }
}
