use super::validate::partition;
use super::{
    BatchOutcome, BatchSummary, ItemError, ItemOutcome, UNTITLED, UploadConfig, UploadRequest,
    ValidationError,
};
use crate::media::{MediaFile, MediaHost};
use crate::store::{NewPhoto, Photo, PhotoStore};
use serde::Serialize;
use tracing::{debug, info, warn};

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(tag = "state", rename_all = "snake_case")]
pub enum UploadState {
    Idle,
    FileSelected { count: usize },
    Validating,
    Uploading { index: usize, total: usize },
    Done,
    PartialFailure,
    Failed,
}

impl From<BatchOutcome> for UploadState {
    fn from(outcome: BatchOutcome) -> Self {
        match outcome {
            BatchOutcome::Done => UploadState::Done,
            BatchOutcome::PartialFailure => UploadState::PartialFailure,
            BatchOutcome::Failed => UploadState::Failed,
        }
    }
}

fn non_empty(value: Option<String>) -> Option<String> {
    value
        .map(|value| value.trim().to_string())
        .filter(|value| !value.is_empty())
}

/// One batch upload: validation, then each file sent to the media host and
/// recorded in the store, strictly one after another.
pub struct UploadFlow<'a> {
    host: &'a dyn MediaHost,
    store: &'a dyn PhotoStore,
    config: &'a UploadConfig,
    state: UploadState,
    history: Vec<UploadState>,
}

impl<'a> UploadFlow<'a> {
    pub fn new(host: &'a dyn MediaHost, store: &'a dyn PhotoStore, config: &'a UploadConfig) -> Self {
        Self {
            host,
            store,
            config,
            state: UploadState::Idle,
            history: Vec::new(),
        }
    }

    pub fn state(&self) -> &UploadState {
        &self.state
    }

    /// Every state entered so far, in order.
    pub fn history(&self) -> &[UploadState] {
        &self.history
    }

    fn transition(&mut self, next: UploadState) {
        debug!("Upload state {:?} -> {:?}", self.state, next);
        self.history.push(next.clone());
        self.state = next;
    }

    pub async fn submit(&mut self, request: UploadRequest) -> Result<BatchSummary, ValidationError> {
        if request.files.is_empty() {
            return Err(ValidationError::NoFiles);
        }

        self.transition(UploadState::FileSelected {
            count: request.files.len(),
        });
        self.transition(UploadState::Validating);

        let (accepted, rejected) = partition(request.files, self.config);
        for rejection in &rejected {
            warn!("Rejected {}", rejection);
        }
        if accepted.is_empty() {
            self.transition(UploadState::Failed);
            return Err(ValidationError::NoValidFiles { rejected });
        }

        let title = non_empty(request.title);
        let description = non_empty(request.description);
        let total = accepted.len();
        let mut items = Vec::with_capacity(total);

        for (index, file) in accepted.into_iter().enumerate() {
            self.transition(UploadState::Uploading { index, total });
            let result = self
                .upload_one(&file, title.as_deref(), description.clone())
                .await;
            if let Err(e) = &result {
                warn!("Upload of {} failed: {}", file.file_name, e);
            }
            items.push(ItemOutcome {
                file_name: file.file_name,
                result,
            });
        }

        let summary = BatchSummary::new(items, rejected);
        info!(
            "Upload batch finished: {} succeeded, {} failed, {} rejected",
            summary.success_count(),
            summary.failure_count(),
            summary.rejected.len()
        );
        self.transition(summary.outcome.into());
        Ok(summary)
    }

    async fn upload_one(
        &self,
        file: &MediaFile,
        title: Option<&str>,
        description: Option<String>,
    ) -> Result<Photo, ItemError> {
        let media = self.host.upload(file).await?;

        let title = title
            .map(str::to_string)
            .or_else(|| file.base_name())
            .unwrap_or_else(|| UNTITLED.to_string());

        let photo = NewPhoto {
            title,
            description,
            media_url: media.url,
            media_id: media.media_id.clone(),
        };

        self.store.insert_photo(photo).await.map_err(|e| {
            warn!(
                "Media {} was stored but its record was not; the asset is orphaned",
                media.media_id
            );
            ItemError::from(e)
        })
    }
}
