use super::validate::{FilePreview, preview};
use super::{BatchOutcome, UploadFlow, UploadRequest, ValidationError, size_label};
use crate::AppState;
use crate::error::AppError;
use crate::media::MediaFile;
use crate::session::{Visitor, require_authenticated};
use crate::templating::render_page;
use axum::{
    Json,
    extract::{Multipart, State},
    http::{HeaderMap, StatusCode},
    response::Response,
};
use tracing::debug;

/// Reads the upload form. File inputs left empty by the browser arrive as a
/// nameless zero-byte part and are skipped.
pub async fn read_upload_form(mut multipart: Multipart) -> Result<UploadRequest, ValidationError> {
    let mut request = UploadRequest::default();
    let malformed = |e: axum::extract::multipart::MultipartError| {
        ValidationError::MalformedForm(e.body_text())
    };

    while let Some(field) = multipart.next_field().await.map_err(malformed)? {
        let name = field.name().unwrap_or_default().to_string();
        match name.as_str() {
            "files" | "file" => {
                let file_name = field.file_name().unwrap_or_default().to_string();
                let content_type = field.content_type().map(str::to_string);
                let bytes = field.bytes().await.map_err(malformed)?;
                if file_name.is_empty() && bytes.is_empty() {
                    continue;
                }
                request
                    .files
                    .push(MediaFile::new(file_name, content_type, bytes.to_vec()));
            }
            "title" => request.title = Some(field.text().await.map_err(malformed)?),
            "description" => request.description = Some(field.text().await.map_err(malformed)?),
            other => debug!("Ignoring upload form field '{}'", other),
        }
    }

    Ok(request)
}

async fn upload_form(
    state: &AppState,
    visitor: Visitor,
    error: Option<String>,
    rejected: Vec<String>,
    status: StatusCode,
) -> Response {
    let globals = liquid::object!({
        "error": error,
        "rejected": rejected,
        "max_file_size": size_label(state.config.upload.max_file_bytes),
    });
    render_page(state, visitor, "upload.html.liquid", globals, status).await
}

pub async fn upload_page(State(state): State<AppState>, headers: HeaderMap) -> Response {
    let visitor = match require_authenticated(&state, &headers) {
        Ok(visitor) => visitor,
        Err(response) => return response,
    };
    upload_form(&state, visitor, None, Vec::new(), StatusCode::OK).await
}

pub async fn upload_submit(
    State(state): State<AppState>,
    headers: HeaderMap,
    multipart: Multipart,
) -> Response {
    let visitor = match require_authenticated(&state, &headers) {
        Ok(visitor) => visitor,
        Err(response) => return response,
    };

    let submitted = match read_upload_form(multipart).await {
        Ok(request) => {
            let mut flow = UploadFlow::new(
                state.media.as_ref(),
                state.store.as_ref(),
                &state.config.upload,
            );
            flow.submit(request).await
        }
        Err(e) => Err(e),
    };

    let summary = match submitted {
        Ok(summary) => summary,
        Err(e) => {
            let rejected = match &e {
                ValidationError::NoValidFiles { rejected } => {
                    rejected.iter().map(ToString::to_string).collect()
                }
                _ => Vec::new(),
            };
            return upload_form(
                &state,
                visitor,
                Some(e.to_string()),
                rejected,
                StatusCode::UNPROCESSABLE_ENTITY,
            )
            .await;
        }
    };

    let status = match summary.outcome {
        BatchOutcome::Failed => StatusCode::BAD_GATEWAY,
        _ => StatusCode::OK,
    };
    let globals = liquid::object!({
        "report": summary.report(),
        "rejection_message": summary.rejection_message(),
        "refresh": summary.should_refresh(),
    });
    render_page(&state, visitor, "upload_result.html.liquid", globals, status).await
}

/// Validation and previews without touching the media host.
pub async fn validate_upload_handler(
    State(state): State<AppState>,
    headers: HeaderMap,
    multipart: Multipart,
) -> Result<Json<Vec<FilePreview>>, AppError> {
    if !state.visitor(&headers).is_authenticated() {
        return Err(AppError::Unauthorized);
    }

    let request = read_upload_form(multipart).await?;
    if request.files.is_empty() {
        return Err(ValidationError::NoFiles.into());
    }
    Ok(Json(preview(&request.files, &state.config.upload)))
}
