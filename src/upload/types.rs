use super::{ItemError, Rejection};
use crate::media::MediaFile;
use crate::store::Photo;
use serde::{Deserialize, Serialize};

/// Title used when neither the form nor the file name provides one.
pub const UNTITLED: &str = "Untitled";

#[derive(Debug, Clone, Deserialize, Serialize)]
pub struct UploadConfig {
    /// Largest accepted file.
    pub max_file_bytes: usize,
    /// Largest accepted request body, covering every file of a batch.
    pub max_request_bytes: usize,
}

const KIB: usize = 1024;
const MIB: usize = 1024 * KIB;

/// Byte count for display: MB from 1 MiB up, rounded up to whole KB below.
pub fn size_label(bytes: usize) -> String {
    if bytes < MIB {
        format!("{} KB", bytes.div_ceil(KIB))
    } else if bytes % MIB == 0 {
        format!("{} MB", bytes / MIB)
    } else {
        format!("{:.1} MB", bytes as f64 / MIB as f64)
    }
}

impl Default for UploadConfig {
    fn default() -> Self {
        Self {
            max_file_bytes: 10 * 1024 * 1024,
            max_request_bytes: 100 * 1024 * 1024,
        }
    }
}

#[derive(Debug, Clone, Default)]
pub struct UploadRequest {
    pub files: Vec<MediaFile>,
    pub title: Option<String>,
    pub description: Option<String>,
}

impl UploadRequest {
    pub fn new(files: Vec<MediaFile>) -> Self {
        Self {
            files,
            ..Self::default()
        }
    }

    pub fn with_title(mut self, title: impl Into<String>) -> Self {
        self.title = Some(title.into());
        self
    }

    pub fn with_description(mut self, description: impl Into<String>) -> Self {
        self.description = Some(description.into());
        self
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum BatchOutcome {
    Done,
    PartialFailure,
    Failed,
}

#[derive(Debug)]
pub struct ItemOutcome {
    pub file_name: String,
    pub result: Result<Photo, ItemError>,
}

#[derive(Debug)]
pub struct BatchSummary {
    pub outcome: BatchOutcome,
    pub items: Vec<ItemOutcome>,
    pub rejected: Vec<Rejection>,
}

impl BatchSummary {
    pub fn new(items: Vec<ItemOutcome>, rejected: Vec<Rejection>) -> Self {
        let succeeded = items.iter().filter(|item| item.result.is_ok()).count();
        let outcome = if succeeded == 0 {
            BatchOutcome::Failed
        } else if succeeded < items.len() {
            BatchOutcome::PartialFailure
        } else {
            BatchOutcome::Done
        };

        Self {
            outcome,
            items,
            rejected,
        }
    }

    pub fn success_count(&self) -> usize {
        self.items.iter().filter(|item| item.result.is_ok()).count()
    }

    pub fn failure_count(&self) -> usize {
        self.items.len() - self.success_count()
    }

    pub fn photos(&self) -> impl Iterator<Item = &Photo> {
        self.items.iter().filter_map(|item| item.result.as_ref().ok())
    }

    /// The gallery should refetch whenever at least one photo was stored.
    pub fn should_refresh(&self) -> bool {
        self.success_count() > 0
    }

    pub fn error_message(&self) -> Option<String> {
        let failures = self.failure_count();
        if self.outcome == BatchOutcome::Failed {
            return Some("Failed to upload photos. Please try again.".to_string());
        }
        match failures {
            0 => None,
            1 => Some("1 file failed to upload".to_string()),
            n => Some(format!("{} files failed to upload", n)),
        }
    }

    pub fn rejection_message(&self) -> Option<String> {
        if self.rejected.is_empty() {
            return None;
        }
        let names: Vec<_> = self.rejected.iter().map(|r| r.file_name.as_str()).collect();
        Some(format!(
            "Skipped {} invalid file{}: {}",
            names.len(),
            if names.len() == 1 { "" } else { "s" },
            names.join(", ")
        ))
    }

    pub fn report(&self) -> BatchReport {
        BatchReport {
            outcome: self.outcome,
            success_count: self.success_count(),
            failure_count: self.failure_count(),
            photos: self.photos().cloned().collect(),
            rejected: self.rejected.iter().map(ToString::to_string).collect(),
            message: self.error_message(),
        }
    }
}

/// Serializable view of a batch for the JSON API and templates.
#[derive(Debug, Clone, Serialize)]
pub struct BatchReport {
    pub outcome: BatchOutcome,
    pub success_count: usize,
    pub failure_count: usize,
    pub photos: Vec<Photo>,
    pub rejected: Vec<String>,
    pub message: Option<String>,
}
