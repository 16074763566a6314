use super::{RejectReason, Rejection, UploadConfig};
use crate::media::MediaFile;
use base64::{Engine, engine::general_purpose};
use serde::Serialize;

const OPAQUE_CONTENT_TYPE: &str = "application/octet-stream";

/// Declared content type, or one guessed from the file name when the client
/// sent nothing useful.
pub fn effective_content_type(file: &MediaFile) -> Option<String> {
    match file.content_type.as_deref().map(str::trim) {
        Some(declared) if !declared.is_empty() && declared != OPAQUE_CONTENT_TYPE => {
            Some(declared.to_ascii_lowercase())
        }
        _ => mime_guess::from_path(&file.file_name)
            .first_raw()
            .map(str::to_string),
    }
}

pub fn validate_file(file: &MediaFile, config: &UploadConfig) -> Result<String, RejectReason> {
    let content_type = effective_content_type(file);
    let content_type = match content_type {
        Some(content_type) if content_type.starts_with("image/") => content_type,
        other => return Err(RejectReason::NotAnImage(other)),
    };

    if file.is_empty() {
        return Err(RejectReason::Empty);
    }
    if file.len() > config.max_file_bytes {
        return Err(RejectReason::TooLarge {
            size: file.len(),
            limit: config.max_file_bytes,
        });
    }

    Ok(content_type)
}

/// Splits a selection into uploadable files (content type normalized) and
/// rejections, keeping the selection order.
pub fn partition(files: Vec<MediaFile>, config: &UploadConfig) -> (Vec<MediaFile>, Vec<Rejection>) {
    let mut accepted = Vec::new();
    let mut rejected = Vec::new();

    for mut file in files {
        match validate_file(&file, config) {
            Ok(content_type) => {
                file.content_type = Some(content_type);
                accepted.push(file);
            }
            Err(reason) => rejected.push(Rejection {
                file_name: file.file_name,
                reason,
            }),
        }
    }

    (accepted, rejected)
}

#[derive(Debug, Clone, Serialize)]
pub struct FilePreview {
    pub file_name: String,
    pub accepted: bool,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub reason: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub preview_url: Option<String>,
}

pub fn preview_data_url(content_type: &str, bytes: &[u8]) -> String {
    format!(
        "data:{};base64,{}",
        content_type,
        general_purpose::STANDARD.encode(bytes)
    )
}

/// Validation plus inline previews; no remote calls.
pub fn preview(files: &[MediaFile], config: &UploadConfig) -> Vec<FilePreview> {
    files
        .iter()
        .map(|file| match validate_file(file, config) {
            Ok(content_type) => FilePreview {
                file_name: file.file_name.clone(),
                accepted: true,
                reason: None,
                preview_url: Some(preview_data_url(&content_type, &file.bytes)),
            },
            Err(reason) => FilePreview {
                file_name: file.file_name.clone(),
                accepted: false,
                reason: Some(reason.to_string()),
                preview_url: None,
            },
        })
        .collect()
}
