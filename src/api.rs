use crate::AppState;
use crate::error::AppError;
use crate::gallery::{PhotoCard, parse_photo_id};
use crate::session::{AuthOutcome, Session, ThemeState, system_preference};
use axum::{
    extract::{Path, State},
    http::HeaderMap,
    response::{IntoResponse, Json, Response},
};
use serde::{Deserialize, Serialize};

#[derive(Deserialize)]
pub struct AuthRequest {
    pub password: String,
}

#[derive(Serialize)]
pub struct AuthResponse {
    #[serde(flatten)]
    outcome: AuthOutcome,
    message: &'static str,
}

#[derive(Serialize)]
pub struct SessionResponse {
    authenticated: bool,
    admin: bool,
    role: &'static str,
    theme: &'static str,
}

#[derive(Serialize)]
pub struct ThemeResponse {
    theme: &'static str,
}

#[derive(Serialize)]
pub struct LogoutResponse {
    success: bool,
}

pub async fn authenticate_handler(
    State(app_state): State<AppState>,
    headers: HeaderMap,
    Json(payload): Json<AuthRequest>,
) -> Response {
    tracing::info!("Authentication attempt received");
    let mut visitor = app_state.visitor(&headers);
    let outcome = Session::new(&mut visitor.jar, &app_state.config.app.cookie_secret)
        .authenticate(&app_state.credentials, &payload.password);

    let message = if outcome.success {
        "Authentication successful"
    } else {
        "Invalid password"
    };

    (
        visitor.jar.into_headers(),
        Json(AuthResponse { outcome, message }),
    )
        .into_response()
}

pub async fn logout_handler(State(app_state): State<AppState>, headers: HeaderMap) -> Response {
    let mut visitor = app_state.visitor(&headers);
    Session::new(&mut visitor.jar, &app_state.config.app.cookie_secret).logout();
    (
        visitor.jar.into_headers(),
        Json(LogoutResponse { success: true }),
    )
        .into_response()
}

pub async fn session_handler(
    State(app_state): State<AppState>,
    headers: HeaderMap,
) -> Json<SessionResponse> {
    let visitor = app_state.visitor(&headers);
    Json(SessionResponse {
        authenticated: visitor.is_authenticated(),
        admin: visitor.is_admin(),
        role: visitor.role.as_str(),
        theme: visitor.theme.as_str(),
    })
}

pub async fn theme_toggle_handler(
    State(app_state): State<AppState>,
    headers: HeaderMap,
) -> Response {
    let mut visitor = app_state.visitor(&headers);
    let theme = ThemeState::new(&mut visitor.jar, system_preference(&headers)).toggle_theme();
    (
        visitor.jar.into_headers(),
        Json(ThemeResponse {
            theme: theme.as_str(),
        }),
    )
        .into_response()
}

pub async fn photos_handler(
    State(app_state): State<AppState>,
    headers: HeaderMap,
) -> Result<Json<Vec<PhotoCard>>, AppError> {
    if !app_state.visitor(&headers).is_authenticated() {
        return Err(AppError::Unauthorized);
    }

    let photos = app_state.store.list_photos().await?;
    Ok(Json(photos.iter().map(PhotoCard::from_photo).collect()))
}

pub async fn photo_handler(
    State(app_state): State<AppState>,
    Path(id): Path<String>,
    headers: HeaderMap,
) -> Result<Json<PhotoCard>, AppError> {
    if !app_state.visitor(&headers).is_authenticated() {
        return Err(AppError::Unauthorized);
    }

    let id = parse_photo_id(&id).ok_or_else(|| AppError::NotFound(format!("Photo {}", id)))?;
    let photo = app_state.store.get_photo_by_id(id).await?;
    Ok(Json(PhotoCard::from_photo(&photo)))
}
