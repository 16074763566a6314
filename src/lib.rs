use serde::{Deserialize, Serialize};
use std::path::PathBuf;

pub mod admin;
pub mod api;
pub mod error;
pub mod gallery;
pub mod media;
pub mod session;
pub mod startup_checks;
pub mod static_files;
pub mod store;
pub mod templating;
pub mod upload;

pub const DEFAULT_COOKIE_SECRET: &str = "change-me-in-production";

#[derive(Debug, Clone, Deserialize, Serialize)]
pub struct Config {
    pub server: ServerConfig,
    pub app: AppConfig,
    pub templates: TemplateConfig,
    pub static_files: StaticConfig,
    #[serde(default)]
    pub media: media::MediaHostConfig,
    #[serde(default)]
    pub store: store::PhotoStoreConfig,
    #[serde(default)]
    pub upload: upload::UploadConfig,
}

#[derive(Debug, Clone, Deserialize, Serialize)]
pub struct ServerConfig {
    pub host: String,
    pub port: u16,
}

#[derive(Debug, Clone, Deserialize, Serialize)]
pub struct AppConfig {
    pub name: String,
    pub log_level: String,
    /// Key for signing the session cookie.
    pub cookie_secret: String,
    pub admin_password: String,
    pub user_password: String,
    #[serde(default)]
    pub base_url: Option<String>,
}

#[derive(Debug, Clone, Deserialize, Serialize)]
pub struct TemplateConfig {
    pub directory: PathBuf,
}

#[derive(Debug, Clone, Deserialize, Serialize)]
pub struct StaticConfig {
    pub directory: PathBuf,
}

impl Default for Config {
    fn default() -> Self {
        Self {
            server: ServerConfig {
                host: "127.0.0.1".to_string(),
                port: 3000,
            },
            app: AppConfig {
                name: "PhotoShare".to_string(),
                log_level: "info".to_string(),
                cookie_secret: DEFAULT_COOKIE_SECRET.to_string(),
                admin_password: String::new(),
                user_password: String::new(),
                base_url: None,
            },
            templates: TemplateConfig {
                directory: PathBuf::from("templates"),
            },
            static_files: StaticConfig {
                directory: PathBuf::from("static"),
            },
            media: media::MediaHostConfig::default(),
            store: store::PhotoStoreConfig::default(),
            upload: upload::UploadConfig::default(),
        }
    }
}

impl Config {
    pub fn from_toml(content: &str) -> Result<Self, toml_edit::de::Error> {
        toml_edit::de::from_str(content)
    }

    /// Secrets from the process environment take precedence over the file.
    pub fn apply_env_overrides(&mut self) {
        self.apply_overrides_from(|name| std::env::var(name).ok());
    }

    pub fn apply_overrides_from(&mut self, lookup: impl Fn(&str) -> Option<String>) {
        let lookup = |name: &str| lookup(name).filter(|value| !value.is_empty());

        if let Some(value) = lookup("PHOTOSHARE_ADMIN_PASSWORD") {
            self.app.admin_password = value;
        }
        if let Some(value) = lookup("PHOTOSHARE_USER_PASSWORD") {
            self.app.user_password = value;
        }
        if let Some(value) = lookup("PHOTOSHARE_COOKIE_SECRET") {
            self.app.cookie_secret = value;
        }
        if let media::MediaHostConfig::Cloudinary(cloudinary) = &mut self.media {
            if let Some(value) = lookup("CLOUDINARY_API_KEY") {
                cloudinary.api_key = value;
            }
            if let Some(value) = lookup("CLOUDINARY_API_SECRET") {
                cloudinary.api_secret = Some(value);
            }
        }
        if let store::PhotoStoreConfig::Supabase(supabase) = &mut self.store
            && let Some(value) = lookup("SUPABASE_ANON_KEY")
        {
            supabase.anon_key = value;
        }
    }
}

use axum::{
    Router,
    extract::DefaultBodyLimit,
    http::HeaderMap,
    routing::{get, post},
};
use std::sync::Arc;
use tower_http::trace::TraceLayer;

#[derive(Clone)]
pub struct AppState {
    pub template_engine: Arc<templating::TemplateEngine>,
    pub static_handler: static_files::StaticFileHandler,
    pub media: media::DynMediaHost,
    pub store: store::DynPhotoStore,
    pub credentials: Arc<session::Credentials>,
    pub config: Config,
}

impl AppState {
    pub fn visitor(&self, headers: &HeaderMap) -> session::Visitor {
        session::Visitor::from_headers(headers, &self.config.app.cookie_secret)
    }
}

/// Builds the router with the media host and photo store named in the config.
pub async fn create_app(config: Config) -> Result<Router, error::AppError> {
    let media = media::create_host(&config.media)?;
    let store = store::create_store(&config.store)?;
    tracing::info!("Media host: {}, photo store: {}", media.name(), store.name());
    Ok(create_app_with(config, media, store).await)
}

pub async fn create_app_with(
    config: Config,
    media: media::DynMediaHost,
    store: store::DynPhotoStore,
) -> Router {
    let template_engine = Arc::new(templating::TemplateEngine::new(
        config.templates.directory.clone(),
    ));

    let static_handler =
        static_files::StaticFileHandler::new(config.static_files.directory.clone());
    static_handler.refresh_file_versions().await;

    let credentials = Arc::new(session::Credentials::new(
        config.app.admin_password.clone(),
        config.app.user_password.clone(),
    ));

    let upload_limit = DefaultBodyLimit::max(config.upload.max_request_bytes);

    let app_state = AppState {
        template_engine,
        static_handler: static_handler.clone(),
        media,
        store,
        credentials,
        config,
    };

    Router::new()
        .route("/", get(gallery::gallery_page))
        .route("/photos/{id}", get(gallery::photo_page))
        .route(
            "/login",
            get(session::login_page).post(session::login_submit),
        )
        .route("/logout", post(session::logout))
        .route("/theme/toggle", post(session::toggle_theme))
        .route(
            "/upload",
            get(upload::upload_page)
                .post(upload::upload_submit)
                .layer(upload_limit),
        )
        .route(
            &format!("{}/{{*path}}", media::LOCAL_MEDIA_PREFIX),
            get(media::serve_media),
        )
        .route("/admin", get(admin::admin_page))
        .route("/admin/photos/{id}/edit", get(admin::edit_page))
        .route("/admin/photos/{id}", post(admin::edit_submit))
        .route("/admin/photos/{id}/delete", post(admin::delete_submit))
        .route("/api/auth", post(api::authenticate_handler))
        .route("/api/logout", post(api::logout_handler))
        .route("/api/session", get(api::session_handler))
        .route("/api/photos", get(api::photos_handler))
        .route("/api/photos/{id}", get(api::photo_handler))
        .route("/api/theme/toggle", post(api::theme_toggle_handler))
        .route(
            "/api/upload/validate",
            post(upload::validate_upload_handler).layer(upload_limit),
        )
        .nest_service("/static", static_handler.service())
        .fallback(gallery::fallback_handler)
        .layer(
            TraceLayer::new_for_http()
                .make_span_with(|request: &axum::http::Request<_>| {
                    let method = request.method();
                    let uri = request.uri();
                    let matched_path = request
                        .extensions()
                        .get::<axum::extract::MatchedPath>()
                        .map(|matched_path| matched_path.as_str());

                    tracing::info_span!(
                        "http_request",
                        method = %method,
                        uri = %uri,
                        matched_path,
                    )
                })
                .on_request(|request: &axum::http::Request<_>, _span: &tracing::Span| {
                    let headers = request.headers();
                    let user_agent = headers
                        .get("user-agent")
                        .and_then(|h| h.to_str().ok())
                        .unwrap_or("-");

                    tracing::info!(
                        target: "access_log",
                        method = %request.method(),
                        path = %request.uri().path(),
                        user_agent = %user_agent,
                        "request"
                    );
                })
                .on_response(
                    |response: &axum::http::Response<_>,
                     latency: std::time::Duration,
                     _span: &tracing::Span| {
                        tracing::info!(
                            target: "access_log",
                            status = %response.status(),
                            latency_ms = %latency.as_millis(),
                            "response"
                        );
                    },
                ),
        )
        .with_state(app_state)
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::collections::HashMap;

    #[test]
    fn test_config_from_toml_with_defaults() {
        let config = Config::from_toml(
            r#"
[server]
host = "0.0.0.0"
port = 8080

[app]
name = "Family Photos"
log_level = "debug"
cookie_secret = "s3cret"
admin_password = "admin"
user_password = "family"

[templates]
directory = "templates"

[static_files]
directory = "static"

[media]
provider = "cloudinary"
cloud_name = "demo"
upload_preset = "unsigned"

[store]
provider = "supabase"
url = "https://abc.supabase.co"
"#,
        )
        .unwrap();

        assert_eq!(config.server.port, 8080);
        assert_eq!(config.app.name, "Family Photos");
        assert_eq!(config.upload.max_file_bytes, 10 * 1024 * 1024);
        match &config.media {
            media::MediaHostConfig::Cloudinary(cloudinary) => {
                assert_eq!(cloudinary.cloud_name, "demo");
                assert_eq!(cloudinary.api_base, media::DEFAULT_CLOUDINARY_API_BASE);
            }
            other => panic!("unexpected media config: {:?}", other),
        }
        match &config.store {
            store::PhotoStoreConfig::Supabase(supabase) => {
                assert_eq!(supabase.table, store::DEFAULT_TABLE);
            }
            other => panic!("unexpected store config: {:?}", other),
        }
    }

    #[test]
    fn test_missing_provider_sections_use_memory() {
        let config = Config::from_toml(
            r#"
[server]
host = "127.0.0.1"
port = 3000

[app]
name = "PhotoShare"
log_level = "info"
cookie_secret = "s3cret"
admin_password = "admin"
user_password = "family"

[templates]
directory = "templates"

[static_files]
directory = "static"
"#,
        )
        .unwrap();

        assert!(matches!(config.media, media::MediaHostConfig::Memory(_)));
        assert!(matches!(config.store, store::PhotoStoreConfig::Memory));
        assert_eq!(config.app.base_url, None);
    }

    #[test]
    fn test_env_overrides_secrets() {
        let mut config = Config::default();
        config.media = media::MediaHostConfig::Cloudinary(media::CloudinaryConfig {
            cloud_name: "demo".to_string(),
            upload_preset: "p".to_string(),
            api_key: "from-file".to_string(),
            api_secret: None,
            api_base: media::DEFAULT_CLOUDINARY_API_BASE.to_string(),
        });
        config.store = store::PhotoStoreConfig::Supabase(store::SupabaseConfig {
            url: "https://abc.supabase.co".to_string(),
            anon_key: String::new(),
            table: "photos".to_string(),
        });

        let env: HashMap<&str, &str> = [
            ("PHOTOSHARE_ADMIN_PASSWORD", "env-admin"),
            ("PHOTOSHARE_USER_PASSWORD", ""),
            ("PHOTOSHARE_COOKIE_SECRET", "env-secret"),
            ("CLOUDINARY_API_KEY", "env-key"),
            ("CLOUDINARY_API_SECRET", "env-api-secret"),
            ("SUPABASE_ANON_KEY", "env-anon"),
        ]
        .into_iter()
        .collect();
        config.apply_overrides_from(|name| env.get(name).map(|v| v.to_string()));

        assert_eq!(config.app.admin_password, "env-admin");
        assert_eq!(config.app.user_password, "");
        assert_eq!(config.app.cookie_secret, "env-secret");
        let media::MediaHostConfig::Cloudinary(cloudinary) = &config.media else {
            panic!("media provider changed");
        };
        assert_eq!(cloudinary.api_key, "env-key");
        assert_eq!(cloudinary.api_secret.as_deref(), Some("env-api-secret"));
        let store::PhotoStoreConfig::Supabase(supabase) = &config.store else {
            panic!("store provider changed");
        };
        assert_eq!(supabase.anon_key, "env-anon");
    }

    #[test]
    fn test_example_config_parses() {
        let config = Config::from_toml(include_str!("../config.example.toml")).unwrap();
        assert!(matches!(
            config.media,
            media::MediaHostConfig::Cloudinary(_)
        ));
        assert!(matches!(config.store, store::PhotoStoreConfig::Supabase(_)));
        assert_eq!(config.upload.max_request_bytes, 100 * 1024 * 1024);
    }

    async fn memory_router() -> Router {
        create_app_with(
            Config::default(),
            Arc::new(media::providers::memory::MemoryHost::default()),
            Arc::new(store::providers::memory::MemoryStore::new()),
        )
        .await
    }

    #[tokio::test]
    async fn test_router_answers_session_probe() {
        use axum::body::Body;
        use tower::ServiceExt;

        let response = memory_router()
            .await
            .oneshot(
                axum::http::Request::builder()
                    .uri("/api/session")
                    .body(Body::empty())
                    .unwrap(),
            )
            .await
            .unwrap();
        assert_eq!(response.status(), axum::http::StatusCode::OK);
    }

    #[tokio::test]
    async fn test_router_rejects_anonymous_photo_listing() {
        use axum::body::Body;
        use tower::ServiceExt;

        let response = memory_router()
            .await
            .oneshot(
                axum::http::Request::builder()
                    .uri("/api/photos")
                    .body(Body::empty())
                    .unwrap(),
            )
            .await
            .unwrap();
        assert_eq!(response.status(), axum::http::StatusCode::UNAUTHORIZED);
    }
}
