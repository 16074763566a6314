use async_trait::async_trait;
use chrono::Utc;
use tokio::sync::RwLock;
use tracing::{debug, info};
use uuid::Uuid;

use crate::store::{NewPhoto, Photo, PhotoStore, PhotoUpdate, StoreError};

/// In-process photos table. Rows inserted within the same clock tick keep
/// their insertion order.
#[derive(Default)]
pub struct MemoryStore {
    rows: RwLock<Vec<(u64, Photo)>>,
    sequence: RwLock<u64>,
}

impl MemoryStore {
    pub fn new() -> Self {
        Self::default()
    }
}

#[async_trait]
impl PhotoStore for MemoryStore {
    async fn list_photos(&self) -> Result<Vec<Photo>, StoreError> {
        let rows = self.rows.read().await;
        let mut ordered: Vec<_> = rows.iter().collect();
        ordered.sort_by(|(a_seq, a), (b_seq, b)| {
            b.created_at
                .cmp(&a.created_at)
                .then_with(|| b_seq.cmp(a_seq))
        });
        debug!("Listing {} photos", ordered.len());
        Ok(ordered.into_iter().map(|(_, photo)| photo.clone()).collect())
    }

    async fn insert_photo(&self, photo: NewPhoto) -> Result<Photo, StoreError> {
        let seq = {
            let mut sequence = self.sequence.write().await;
            *sequence += 1;
            *sequence
        };

        let inserted = Photo {
            id: Uuid::new_v4(),
            title: photo.title,
            description: photo.description,
            media_url: photo.media_url,
            media_id: photo.media_id,
            created_at: Utc::now(),
        };

        self.rows.write().await.push((seq, inserted.clone()));
        info!("Inserted photo {} ({})", inserted.id, inserted.title);
        Ok(inserted)
    }

    async fn update_photo(&self, id: Uuid, update: PhotoUpdate) -> Result<Photo, StoreError> {
        let mut rows = self.rows.write().await;
        let (_, photo) = rows
            .iter_mut()
            .find(|(_, photo)| photo.id == id)
            .ok_or_else(|| StoreError::NotFound(id.to_string()))?;

        photo.title = update.title;
        photo.description = update.description;
        Ok(photo.clone())
    }

    async fn delete_photo(&self, id: Uuid) -> Result<(), StoreError> {
        self.rows.write().await.retain(|(_, photo)| photo.id != id);
        Ok(())
    }

    async fn get_photo_by_id(&self, id: Uuid) -> Result<Photo, StoreError> {
        self.rows
            .read()
            .await
            .iter()
            .find(|(_, photo)| photo.id == id)
            .map(|(_, photo)| photo.clone())
            .ok_or_else(|| StoreError::NotFound(id.to_string()))
    }

    fn name(&self) -> &str {
        "In-memory photo store"
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn new_photo(title: &str) -> NewPhoto {
        NewPhoto {
            title: title.to_string(),
            description: None,
            media_url: format!("https://media.test/image/upload/{}.jpg", title),
            media_id: format!("photoshare/{}", title),
        }
    }

    #[tokio::test]
    async fn test_list_is_newest_first() {
        let store = MemoryStore::new();
        let a = store.insert_photo(new_photo("a")).await.unwrap();
        let b = store.insert_photo(new_photo("b")).await.unwrap();
        let c = store.insert_photo(new_photo("c")).await.unwrap();

        let ids: Vec<_> = store
            .list_photos()
            .await
            .unwrap()
            .into_iter()
            .map(|p| p.id)
            .collect();
        assert_eq!(ids, vec![c.id, b.id, a.id]);
    }

    #[tokio::test]
    async fn test_update_replaces_both_fields() {
        let store = MemoryStore::new();
        let mut photo = new_photo("a");
        photo.description = Some("old".to_string());
        let inserted = store.insert_photo(photo).await.unwrap();

        let updated = store
            .update_photo(
                inserted.id,
                PhotoUpdate {
                    title: "renamed".to_string(),
                    description: None,
                },
            )
            .await
            .unwrap();
        assert_eq!(updated.title, "renamed");
        assert_eq!(updated.description, None);
        assert_eq!(updated.created_at, inserted.created_at);
        assert_eq!(store.get_photo_by_id(inserted.id).await.unwrap(), updated);
    }

    #[tokio::test]
    async fn test_missing_ids() {
        let store = MemoryStore::new();
        let id = Uuid::new_v4();
        assert!(store.get_photo_by_id(id).await.unwrap_err().is_not_found());
        assert!(
            store
                .update_photo(
                    id,
                    PhotoUpdate {
                        title: "x".to_string(),
                        description: None
                    }
                )
                .await
                .unwrap_err()
                .is_not_found()
        );
        assert!(store.delete_photo(id).await.is_ok());
    }

    #[tokio::test]
    async fn test_delete_removes_row() {
        let store = MemoryStore::new();
        let a = store.insert_photo(new_photo("a")).await.unwrap();
        let b = store.insert_photo(new_photo("b")).await.unwrap();
        store.delete_photo(a.id).await.unwrap();

        let remaining = store.list_photos().await.unwrap();
        assert_eq!(remaining, vec![b]);
    }
}
