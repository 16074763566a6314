#![allow(dead_code)]

use axum::http::{HeaderName, HeaderValue, header::COOKIE};
use axum_test::TestServer;
use image::{ImageBuffer, ImageFormat, Rgb};
use photoshare::media::DynMediaHost;
use photoshare::media::providers::memory::MemoryHost;
use photoshare::session::signing::sign_value;
use photoshare::store::providers::memory::MemoryStore;
use photoshare::store::{DynPhotoStore, NewPhoto, Photo, PhotoStore};
use photoshare::{Config, create_app_with};
use std::io::Cursor;
use std::path::PathBuf;
use std::sync::Arc;

pub const COOKIE_SECRET: &str = "integration-cookie-secret";
pub const ADMIN_PASSWORD: &str = "admin-pass";
pub const USER_PASSWORD: &str = "family-pass";

pub struct TestApp {
    pub server: TestServer,
    pub media: Arc<MemoryHost>,
    pub store: Arc<MemoryStore>,
}

pub fn test_config() -> Config {
    let root = PathBuf::from(env!("CARGO_MANIFEST_DIR"));
    let mut config = Config::default();
    config.app.name = "Test Photos".to_string();
    config.app.cookie_secret = COOKIE_SECRET.to_string();
    config.app.admin_password = ADMIN_PASSWORD.to_string();
    config.app.user_password = USER_PASSWORD.to_string();
    config.templates.directory = root.join("templates");
    config.static_files.directory = root.join("static");
    config.upload.max_file_bytes = 1024 * 1024;
    config
}

pub async fn spawn_app() -> TestApp {
    spawn_app_with_config(test_config()).await
}

pub async fn spawn_app_with_config(config: Config) -> TestApp {
    let media = Arc::new(MemoryHost::new("https://media.test/image/upload"));
    let store = Arc::new(MemoryStore::new());
    let dyn_media: DynMediaHost = media.clone();
    let dyn_store: DynPhotoStore = store.clone();

    let app = create_app_with(config, dyn_media, dyn_store).await;
    let server = TestServer::new(app).unwrap();
    TestApp {
        server,
        media,
        store,
    }
}

/// `Cookie` header carrying a validly signed session for `role`.
pub fn session_cookie(role: &str) -> (HeaderName, HeaderValue) {
    let signed = sign_value(COOKIE_SECRET, role).unwrap();
    (
        COOKIE,
        HeaderValue::from_str(&format!("photoshare_session={}", signed)).unwrap(),
    )
}

pub fn png(width: u32, height: u32) -> Vec<u8> {
    let img = ImageBuffer::from_fn(width, height, |x, y| Rgb([x as u8, y as u8, 200]));
    let mut bytes = Cursor::new(Vec::new());
    img.write_to(&mut bytes, ImageFormat::Png).unwrap();
    bytes.into_inner()
}

pub async fn seed_photo(store: &MemoryStore, title: &str, description: Option<&str>) -> Photo {
    store
        .insert_photo(NewPhoto {
            title: title.to_string(),
            description: description.map(str::to_string),
            media_url: format!("https://media.test/image/upload/photoshare/{}", title),
            media_id: format!("photoshare/{}", title),
        })
        .await
        .unwrap()
}

/// Value of the named cookie from the response's `Set-Cookie` headers.
pub fn set_cookie_value(headers: &axum::http::HeaderMap, name: &str) -> Option<String> {
    headers
        .get_all(axum::http::header::SET_COOKIE)
        .iter()
        .filter_map(|value| value.to_str().ok())
        .find_map(|cookie| {
            let pair = cookie.split(';').next()?;
            let (key, value) = pair.split_once('=')?;
            (key.trim() == name).then(|| value.trim().to_string())
        })
}
