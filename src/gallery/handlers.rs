use super::{NavigationPhoto, PhotoCard, neighbors};
use crate::AppState;
use crate::session::require_authenticated;
use crate::templating::{render_error, render_page};
use axum::{
    extract::{Path, State},
    http::{HeaderMap, StatusCode},
    response::Response,
};
use tracing::{debug, error};
use uuid::Uuid;

pub const LOAD_FAILED_MESSAGE: &str = "Failed to load photos. Please try again.";

pub fn parse_photo_id(id: &str) -> Option<Uuid> {
    Uuid::parse_str(id.trim()).ok()
}

pub async fn gallery_page(State(state): State<AppState>, headers: HeaderMap) -> Response {
    let visitor = match require_authenticated(&state, &headers) {
        Ok(visitor) => visitor,
        Err(response) => return response,
    };

    let (photos, load_error, status) = match state.store.list_photos().await {
        Ok(photos) => (photos, None, StatusCode::OK),
        Err(e) => {
            error!("Failed to list photos: {}", e);
            (Vec::new(), Some(LOAD_FAILED_MESSAGE), StatusCode::BAD_GATEWAY)
        }
    };
    debug!("Rendering gallery with {} photos", photos.len());

    let cards: Vec<PhotoCard> = photos.iter().map(PhotoCard::from_photo).collect();
    let globals = liquid::object!({
        "photos": cards,
        "photo_count": photos.len(),
        "load_error": load_error,
    });
    render_page(&state, visitor, "gallery.html.liquid", globals, status).await
}

pub async fn photo_page(
    State(state): State<AppState>,
    Path(id): Path<String>,
    headers: HeaderMap,
) -> Response {
    let visitor = match require_authenticated(&state, &headers) {
        Ok(visitor) => visitor,
        Err(response) => return response,
    };

    let Some(id) = parse_photo_id(&id) else {
        return render_error(&state, visitor, StatusCode::NOT_FOUND, "Photo not found").await;
    };

    let photos = match state.store.list_photos().await {
        Ok(photos) => photos,
        Err(e) => {
            error!("Failed to list photos: {}", e);
            return render_error(&state, visitor, StatusCode::BAD_GATEWAY, LOAD_FAILED_MESSAGE)
                .await;
        }
    };

    let Some(found) = neighbors(&photos, id) else {
        return render_error(&state, visitor, StatusCode::NOT_FOUND, "Photo not found").await;
    };

    let globals = liquid::object!({
        "photo": PhotoCard::from_photo(found.current),
        "position": found.position.label(),
        "previous": found.previous.map(NavigationPhoto::from_photo),
        "next": found.next.map(NavigationPhoto::from_photo),
    });
    render_page(&state, visitor, "photo.html.liquid", globals, StatusCode::OK).await
}

pub async fn fallback_handler(State(state): State<AppState>, headers: HeaderMap) -> Response {
    let visitor = state.visitor(&headers);
    render_error(&state, visitor, StatusCode::NOT_FOUND, "Page not found").await
}
