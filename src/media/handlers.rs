use crate::AppState;
use crate::error::AppError;
use crate::upload::validate::effective_content_type;
use axum::{
    body::Body,
    extract::{Path, State},
    http::{HeaderMap, StatusCode, header},
    response::{IntoResponse, Response},
};
use tracing::debug;

const FALLBACK_CONTENT_TYPE: &str = "application/octet-stream";

/// Directive keys written by `build_display_url`.
const DIRECTIVE_KEYS: [&str; 5] = ["w", "h", "c", "q", "f"];

/// `w_400,h_300,c_fill,q_auto,f_auto` and the like.
fn is_directive_segment(segment: &str) -> bool {
    segment.split(',').all(|directive| {
        directive
            .split_once('_')
            .is_some_and(|(key, value)| DIRECTIVE_KEYS.contains(&key) && !value.is_empty())
    })
}

/// Media id from a local asset path, dropping a leading display directive
/// segment. Variants are served as the original bytes.
pub fn asset_id(path: &str) -> &str {
    match path.split_once('/') {
        Some((first, rest)) if is_directive_segment(first) => rest,
        _ => path,
    }
}

pub async fn serve_media(
    State(state): State<AppState>,
    headers: HeaderMap,
    Path(path): Path<String>,
) -> Result<Response, AppError> {
    if !state.visitor(&headers).is_authenticated() {
        return Err(AppError::Unauthorized);
    }

    let media_id = asset_id(&path);
    let file = state
        .media
        .fetch(media_id)
        .await
        .ok_or_else(|| AppError::NotFound("Image".to_string()))?;

    debug!("Serving {} ({} bytes)", media_id, file.len());
    let content_type =
        effective_content_type(&file).unwrap_or_else(|| FALLBACK_CONTENT_TYPE.to_string());

    Ok((
        StatusCode::OK,
        [
            (header::CONTENT_TYPE, content_type),
            (header::CACHE_CONTROL, "private, max-age=3600".to_string()),
        ],
        Body::from(file.bytes),
    )
        .into_response())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_asset_id_drops_display_directives() {
        assert_eq!(
            asset_id("w_400,h_300,c_fill,q_auto,f_auto/photoshare/abc"),
            "photoshare/abc"
        );
        assert_eq!(asset_id("w_auto/photoshare/abc"), "photoshare/abc");
    }

    #[test]
    fn test_asset_id_keeps_plain_ids() {
        assert_eq!(asset_id("photoshare/abc"), "photoshare/abc");
        assert_eq!(asset_id("abc"), "abc");
        assert_eq!(asset_id("my_album/abc"), "my_album/abc");
        assert_eq!(asset_id("w_400,album/abc"), "w_400,album/abc");
    }
}
