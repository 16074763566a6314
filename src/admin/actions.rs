use crate::media::MediaHost;
use crate::store::{Photo, PhotoStore, PhotoUpdate, StoreError};
use crate::upload::ValidationError;
use serde::Deserialize;
use tracing::{error, info, warn};

#[derive(Debug, Clone, Default, Deserialize)]
pub struct EditForm {
    #[serde(default)]
    pub title: String,
    #[serde(default)]
    pub description: String,
}

impl EditForm {
    /// Title is required after trimming; a blank description clears it.
    pub fn into_update(self) -> Result<PhotoUpdate, ValidationError> {
        let title = self.title.trim();
        if title.is_empty() {
            return Err(ValidationError::EmptyTitle);
        }
        let description = self.description.trim();

        Ok(PhotoUpdate {
            title: title.to_string(),
            description: (!description.is_empty()).then(|| description.to_string()),
        })
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct DeleteOutcome {
    /// Whether the media host confirmed removing the asset.
    pub media_deleted: bool,
}

/// Removes the hosted asset, then the record. The two steps are not atomic:
/// an unconfirmed media delete is logged and the record is removed anyway,
/// while a failed record delete leaves the photo listed.
pub async fn delete_photo(
    host: &dyn MediaHost,
    store: &dyn PhotoStore,
    photo: &Photo,
) -> Result<DeleteOutcome, StoreError> {
    let media_deleted = host.delete(&photo.media_id).await;
    if !media_deleted {
        warn!(
            "Media {} for photo {} was not confirmed deleted; it may be orphaned",
            photo.media_id, photo.id
        );
    }

    if let Err(e) = store.delete_photo(photo.id).await {
        error!("Failed to delete photo record {}: {}", photo.id, e);
        return Err(e);
    }

    info!("Deleted photo {} ({})", photo.id, photo.title);
    Ok(DeleteOutcome { media_deleted })
}
