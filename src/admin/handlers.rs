use super::{AdminStats, EditForm, delete_photo};
use crate::AppState;
use crate::gallery::{PhotoCard, parse_photo_id};
use crate::media::{admin_options, build_display_url};
use crate::session::{Visitor, require_admin};
use crate::store::{Photo, StoreError};
use crate::templating::{render_error, render_page};
use axum::{
    Form,
    extract::{Path, Query, State},
    http::{HeaderMap, StatusCode},
    response::{IntoResponse, Redirect, Response},
};
use serde::{Deserialize, Serialize};
use tracing::error;

#[derive(Debug, Default, Deserialize)]
pub struct AdminQuery {
    pub notice: Option<String>,
    pub error: Option<String>,
}

fn notice_message(code: &str) -> Option<&'static str> {
    match code {
        "updated" => Some("Photo updated"),
        "deleted" => Some("Photo deleted"),
        _ => None,
    }
}

fn error_message(code: &str) -> Option<&'static str> {
    match code {
        "delete_failed" => Some("Failed to delete photo. Please try again."),
        _ => None,
    }
}

#[derive(Debug, Clone, Serialize)]
struct AdminPhoto {
    id: String,
    title: String,
    description: Option<String>,
    url: String,
    preview_url: String,
    created_label: String,
    edit_url: String,
    delete_url: String,
}

impl AdminPhoto {
    fn from_photo(photo: &Photo) -> Self {
        let card = PhotoCard::from_photo(photo);
        Self {
            edit_url: format!("/admin/photos/{}/edit", card.id),
            delete_url: format!("/admin/photos/{}/delete", card.id),
            preview_url: build_display_url(&photo.media_url, &admin_options()),
            id: card.id,
            title: card.title,
            description: card.description,
            url: card.url,
            created_label: card.created_label,
        }
    }
}

async fn store_failure(state: &AppState, visitor: Visitor, e: StoreError) -> Response {
    if e.is_not_found() {
        render_error(state, visitor, StatusCode::NOT_FOUND, "Photo not found").await
    } else {
        error!("Photo store error: {}", e);
        render_error(
            state,
            visitor,
            StatusCode::BAD_GATEWAY,
            "Failed to load photos. Please try again.",
        )
        .await
    }
}

pub async fn admin_page(
    State(state): State<AppState>,
    Query(query): Query<AdminQuery>,
    headers: HeaderMap,
) -> Response {
    let visitor = match require_admin(&state, &headers).await {
        Ok(visitor) => visitor,
        Err(response) => return response,
    };

    let photos = match state.store.list_photos().await {
        Ok(photos) => photos,
        Err(e) => return store_failure(&state, visitor, e).await,
    };

    let stats = AdminStats::collect(&photos, chrono::Local::now().date_naive());
    let rows: Vec<AdminPhoto> = photos.iter().map(AdminPhoto::from_photo).collect();
    let globals = liquid::object!({
        "stats": stats,
        "photos": rows,
        "notice": query.notice.as_deref().and_then(notice_message),
        "error": query.error.as_deref().and_then(error_message),
    });
    render_page(&state, visitor, "admin.html.liquid", globals, StatusCode::OK).await
}

async fn edit_form(
    state: &AppState,
    visitor: Visitor,
    photo: &Photo,
    form: Option<&EditForm>,
    error: Option<String>,
    status: StatusCode,
) -> Response {
    let title = form.map_or(photo.title.clone(), |f| f.title.clone());
    let description = form.map_or(photo.description.clone().unwrap_or_default(), |f| {
        f.description.clone()
    });
    let globals = liquid::object!({
        "photo": AdminPhoto::from_photo(photo),
        "title": title,
        "description": description,
        "error": error,
    });
    render_page(state, visitor, "admin_edit.html.liquid", globals, status).await
}

pub async fn edit_page(
    State(state): State<AppState>,
    Path(id): Path<String>,
    headers: HeaderMap,
) -> Response {
    let visitor = match require_admin(&state, &headers).await {
        Ok(visitor) => visitor,
        Err(response) => return response,
    };
    let Some(id) = parse_photo_id(&id) else {
        return render_error(&state, visitor, StatusCode::NOT_FOUND, "Photo not found").await;
    };

    match state.store.get_photo_by_id(id).await {
        Ok(photo) => edit_form(&state, visitor, &photo, None, None, StatusCode::OK).await,
        Err(e) => store_failure(&state, visitor, e).await,
    }
}

pub async fn edit_submit(
    State(state): State<AppState>,
    Path(id): Path<String>,
    headers: HeaderMap,
    Form(form): Form<EditForm>,
) -> Response {
    let visitor = match require_admin(&state, &headers).await {
        Ok(visitor) => visitor,
        Err(response) => return response,
    };
    let Some(id) = parse_photo_id(&id) else {
        return render_error(&state, visitor, StatusCode::NOT_FOUND, "Photo not found").await;
    };

    let update = match form.clone().into_update() {
        Ok(update) => update,
        Err(e) => {
            return match state.store.get_photo_by_id(id).await {
                Ok(photo) => {
                    edit_form(
                        &state,
                        visitor,
                        &photo,
                        Some(&form),
                        Some(e.to_string()),
                        StatusCode::UNPROCESSABLE_ENTITY,
                    )
                    .await
                }
                Err(e) => store_failure(&state, visitor, e).await,
            };
        }
    };

    match state.store.update_photo(id, update).await {
        Ok(_) => Redirect::to("/admin?notice=updated").into_response(),
        Err(e) => store_failure(&state, visitor, e).await,
    }
}

pub async fn delete_submit(
    State(state): State<AppState>,
    Path(id): Path<String>,
    headers: HeaderMap,
) -> Response {
    let visitor = match require_admin(&state, &headers).await {
        Ok(visitor) => visitor,
        Err(response) => return response,
    };
    let Some(id) = parse_photo_id(&id) else {
        return render_error(&state, visitor, StatusCode::NOT_FOUND, "Photo not found").await;
    };

    let photo = match state.store.get_photo_by_id(id).await {
        Ok(photo) => photo,
        Err(e) => return store_failure(&state, visitor, e).await,
    };

    match delete_photo(state.media.as_ref(), state.store.as_ref(), &photo).await {
        Ok(_) => Redirect::to("/admin?notice=deleted").into_response(),
        Err(_) => Redirect::to("/admin?error=delete_failed").into_response(),
    }
}
