use super::{Session, ThemeState, Visitor, system_preference};
use crate::AppState;
use crate::templating::{render_error, render_page};
use axum::{
    Form,
    extract::State,
    http::{
        HeaderMap, StatusCode,
        header::{HOST, REFERER},
    },
    response::{IntoResponse, Redirect, Response},
};
use serde::Deserialize;
use tracing::info;
use url::Url;

#[derive(Debug, Deserialize)]
pub struct LoginForm {
    #[serde(default)]
    pub password: String,
}

/// Anonymous visitors are sent to the login page.
pub fn require_authenticated(state: &AppState, headers: &HeaderMap) -> Result<Visitor, Response> {
    let visitor = state.visitor(headers);
    if visitor.is_authenticated() {
        Ok(visitor)
    } else {
        Err(Redirect::to("/login").into_response())
    }
}

pub async fn require_admin(state: &AppState, headers: &HeaderMap) -> Result<Visitor, Response> {
    let visitor = require_authenticated(state, headers)?;
    if visitor.is_admin() {
        Ok(visitor)
    } else {
        Err(render_error(state, visitor, StatusCode::FORBIDDEN, "Admin access required").await)
    }
}

fn authority(url: &Url) -> Option<String> {
    let host = url.host_str()?;
    Some(match url.port() {
        Some(port) => format!("{}:{}", host, port),
        None => host.to_string(),
    })
}

/// Path (and query) of the referring page, for redirecting back. Referers
/// from other sites, judged by the `Host` header or `base_url`, fall back
/// to `/`.
pub fn return_path(headers: &HeaderMap, base_url: Option<&str>) -> String {
    let request_host = headers.get(HOST).and_then(|value| value.to_str().ok());
    let site = base_url
        .and_then(|base| Url::parse(base).ok())
        .and_then(|base| authority(&base));
    let same_site = |url: &Url| {
        authority(url).is_some_and(|referer| {
            request_host.is_some_and(|host| host.eq_ignore_ascii_case(&referer))
                || site
                    .as_deref()
                    .is_some_and(|site| site.eq_ignore_ascii_case(&referer))
        })
    };

    headers
        .get(REFERER)
        .and_then(|value| value.to_str().ok())
        .and_then(|referer| Url::parse(referer).ok())
        .filter(same_site)
        .map(|url| match url.query() {
            Some(query) => format!("{}?{}", url.path(), query),
            None => url.path().to_string(),
        })
        .filter(|path| path.starts_with('/') && !path.starts_with("//"))
        .unwrap_or_else(|| "/".to_string())
}

async fn login_form(
    state: &AppState,
    visitor: Visitor,
    error: Option<&str>,
    status: StatusCode,
) -> Response {
    let globals = liquid::object!({
        "error": error,
    });
    render_page(state, visitor, "login.html.liquid", globals, status).await
}

pub async fn login_page(State(state): State<AppState>, headers: HeaderMap) -> Response {
    let visitor = state.visitor(&headers);
    if visitor.is_authenticated() {
        return Redirect::to("/").into_response();
    }
    login_form(&state, visitor, None, StatusCode::OK).await
}

pub async fn login_submit(
    State(state): State<AppState>,
    headers: HeaderMap,
    Form(form): Form<LoginForm>,
) -> Response {
    let mut visitor = state.visitor(&headers);
    let outcome = Session::new(&mut visitor.jar, &state.config.app.cookie_secret)
        .authenticate(&state.credentials, &form.password);

    if outcome.success {
        (visitor.jar.into_headers(), Redirect::to("/")).into_response()
    } else {
        login_form(
            &state,
            visitor,
            Some("Invalid password"),
            StatusCode::UNAUTHORIZED,
        )
        .await
    }
}

pub async fn logout(State(state): State<AppState>, headers: HeaderMap) -> Response {
    let mut visitor = state.visitor(&headers);
    Session::new(&mut visitor.jar, &state.config.app.cookie_secret).logout();
    info!("Logged out");
    (visitor.jar.into_headers(), Redirect::to("/login")).into_response()
}

pub async fn toggle_theme(State(state): State<AppState>, headers: HeaderMap) -> Response {
    let mut visitor = state.visitor(&headers);
    let theme = ThemeState::new(&mut visitor.jar, system_preference(&headers)).toggle_theme();
    info!("Theme switched to {}", theme);
    (visitor.jar.into_headers(), Redirect::to(&return_path(
        &headers,
        state.config.app.base_url.as_deref(),
    ))).into_response()
}
