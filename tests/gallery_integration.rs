mod common;

use async_trait::async_trait;
use axum::http::{StatusCode, header};
use axum_test::TestServer;
use common::*;
use photoshare::create_app_with;
use photoshare::media::DynMediaHost;
use photoshare::media::providers::memory::MemoryHost;
use photoshare::store::{DynPhotoStore, NewPhoto, Photo, PhotoStore, PhotoUpdate, StoreError};
use serde_json::Value;
use std::sync::Arc;
use uuid::Uuid;

struct UnreachableStore;

#[async_trait]
impl PhotoStore for UnreachableStore {
    async fn list_photos(&self) -> Result<Vec<Photo>, StoreError> {
        Err(StoreError::QueryFailed {
            status: 503,
            message: "upstream unavailable".to_string(),
        })
    }

    async fn insert_photo(&self, _photo: NewPhoto) -> Result<Photo, StoreError> {
        Err(StoreError::InvalidResponse("unreachable".to_string()))
    }

    async fn update_photo(&self, _id: Uuid, _update: PhotoUpdate) -> Result<Photo, StoreError> {
        Err(StoreError::InvalidResponse("unreachable".to_string()))
    }

    async fn delete_photo(&self, _id: Uuid) -> Result<(), StoreError> {
        Err(StoreError::InvalidResponse("unreachable".to_string()))
    }

    async fn get_photo_by_id(&self, _id: Uuid) -> Result<Photo, StoreError> {
        Err(StoreError::InvalidResponse("unreachable".to_string()))
    }

    fn name(&self) -> &str {
        "unreachable"
    }
}

#[tokio::test]
async fn test_gallery_lists_newest_first_with_thumbnails() {
    let app = spawn_app().await;
    seed_photo(&app.store, "older", Some("first one")).await;
    seed_photo(&app.store, "newer", None).await;
    let (name, value) = session_cookie("user");

    let response = app.server.get("/").add_header(name, value).await;
    response.assert_status_ok();
    let html = response.text();

    assert!(html.contains("2 photos"));
    let newer = html.find("<h2>newer</h2>").unwrap();
    let older = html.find("<h2>older</h2>").unwrap();
    assert!(newer < older);
    assert!(html.contains(
        "https://media.test/image/upload/w_400,h_300,c_fill,q_auto,f_auto/photoshare/older"
    ));
    assert!(html.contains("<p>first one</p>"));
}

#[tokio::test]
async fn test_gallery_escapes_titles() {
    let app = spawn_app().await;
    seed_photo(&app.store, "<script>alert(1)</script>", None).await;
    let (name, value) = session_cookie("user");

    let html = app.server.get("/").add_header(name, value).await.text();
    assert!(!html.contains("<script>alert(1)</script>"));
    assert!(html.contains("&lt;script&gt;alert(1)&lt;/script&gt;"));
}

#[tokio::test]
async fn test_detail_navigation_has_no_wraparound() {
    let app = spawn_app().await;
    let c = seed_photo(&app.store, "c", None).await;
    let b = seed_photo(&app.store, "b", None).await;
    let a = seed_photo(&app.store, "a", None).await;
    let (name, value) = session_cookie("user");

    // Listed order is a, b, c.
    let first = app
        .server
        .get(&format!("/photos/{}", a.id))
        .add_header(name.clone(), value.clone())
        .await;
    first.assert_status_ok();
    let html = first.text();
    assert!(html.contains("1 of 3"));
    assert!(html.contains(&format!("href=\"/photos/{}\" rel=\"next\"", b.id)));
    assert!(!html.contains("rel=\"prev\""));
    assert!(html.contains(
        "https://media.test/image/upload/w_1200,h_800,c_fill,q_auto,f_auto/photoshare/a"
    ));

    let last = app
        .server
        .get(&format!("/photos/{}", c.id))
        .add_header(name, value)
        .await
        .text();
    assert!(last.contains("3 of 3"));
    assert!(last.contains(&format!("href=\"/photos/{}\" rel=\"prev\"", b.id)));
    assert!(!last.contains("rel=\"next\""));
}

#[tokio::test]
async fn test_unknown_photo_is_not_found() {
    let app = spawn_app().await;
    let (name, value) = session_cookie("user");

    let missing = app
        .server
        .get(&format!("/photos/{}", Uuid::new_v4()))
        .add_header(name.clone(), value.clone())
        .await;
    missing.assert_status(StatusCode::NOT_FOUND);
    assert!(missing.text().contains("Photo not found"));

    let malformed = app
        .server
        .get("/photos/not-a-uuid")
        .add_header(name, value)
        .await;
    malformed.assert_status(StatusCode::NOT_FOUND);
}

#[tokio::test]
async fn test_detail_requires_login() {
    let app = spawn_app().await;
    let photo = seed_photo(&app.store, "private", None).await;

    let response = app.server.get(&format!("/photos/{}", photo.id)).await;
    response.assert_status(StatusCode::SEE_OTHER);
    assert_eq!(response.header(header::LOCATION), "/login");
}

#[tokio::test]
async fn test_store_failure_shows_load_error() {
    let media: DynMediaHost = Arc::new(MemoryHost::default());
    let store: DynPhotoStore = Arc::new(UnreachableStore);
    let server = TestServer::new(create_app_with(test_config(), media, store).await).unwrap();
    let (name, value) = session_cookie("user");

    let response = server.get("/").add_header(name.clone(), value.clone()).await;
    response.assert_status(StatusCode::BAD_GATEWAY);
    let html = response.text();
    assert!(html.contains("Failed to load photos. Please try again."));
    assert!(!html.contains("upstream unavailable"));

    let api = server.get("/api/photos").add_header(name, value).await;
    api.assert_status(StatusCode::BAD_GATEWAY);
    let body: Value = api.json();
    assert_eq!(body["error"], "Failed to load photos. Please try again.");
}

#[tokio::test]
async fn test_api_photos() {
    let app = spawn_app().await;
    let photo = seed_photo(&app.store, "sunset", Some("golden")).await;

    app.server
        .get("/api/photos")
        .await
        .assert_status(StatusCode::UNAUTHORIZED);

    let (name, value) = session_cookie("user");
    let list: Value = app
        .server
        .get("/api/photos")
        .add_header(name.clone(), value.clone())
        .await
        .json();
    assert_eq!(list.as_array().unwrap().len(), 1);
    assert_eq!(list[0]["title"], "sunset");
    assert_eq!(
        list[0]["thumbnail_url"],
        "https://media.test/image/upload/w_400,h_300,c_fill,q_auto,f_auto/photoshare/sunset"
    );

    let one: Value = app
        .server
        .get(&format!("/api/photos/{}", photo.id))
        .add_header(name.clone(), value.clone())
        .await
        .json();
    assert_eq!(one["id"], photo.id.to_string());
    assert_eq!(one["description"], "golden");

    app.server
        .get(&format!("/api/photos/{}", Uuid::new_v4()))
        .add_header(name, value)
        .await
        .assert_status(StatusCode::NOT_FOUND);
}

#[tokio::test]
async fn test_static_assets_and_fallback() {
    let app = spawn_app().await;

    let css = app.server.get("/static/style.css").await;
    css.assert_status_ok();
    assert!(css.text().contains("html.dark"));

    let missing = app.server.get("/no/such/page").await;
    missing.assert_status(StatusCode::NOT_FOUND);
    assert!(missing.text().contains("Page not found"));
}
