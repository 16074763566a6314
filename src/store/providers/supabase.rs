use async_trait::async_trait;
use reqwest::{RequestBuilder, Response, header};
use serde::Deserialize;
use tracing::{debug, error, info};
use url::Url;
use uuid::Uuid;

use crate::store::{NewPhoto, Photo, PhotoStore, PhotoUpdate, StoreError, SupabaseConfig};

/// PostgREST access to the photos table of a Supabase project.
pub struct SupabaseStore {
    client: reqwest::Client,
    table_url: String,
    anon_key: String,
}

#[derive(Debug, Deserialize)]
struct PostgrestError {
    message: String,
}

fn id_filter(id: Uuid) -> String {
    format!("eq.{}", id)
}

impl SupabaseStore {
    pub fn new(config: &SupabaseConfig) -> Result<Self, StoreError> {
        let base = Url::parse(&config.url).map_err(|e| {
            StoreError::ConfigError(format!("invalid url '{}': {}", config.url, e))
        })?;
        let table = config.table.trim();
        if table.is_empty() {
            return Err(StoreError::ConfigError(
                "table must not be empty".to_string(),
            ));
        }

        let client = reqwest::Client::builder()
            .user_agent(concat!("photoshare/", env!("CARGO_PKG_VERSION")))
            .build()?;

        Ok(Self {
            client,
            table_url: format!(
                "{}/rest/v1/{}",
                base.as_str().trim_end_matches('/'),
                table
            ),
            anon_key: config.anon_key.clone(),
        })
    }

    fn request(&self, method: reqwest::Method) -> RequestBuilder {
        self.client
            .request(method, &self.table_url)
            .header("apikey", &self.anon_key)
            .header(header::AUTHORIZATION, format!("Bearer {}", self.anon_key))
    }

    /// Writes that should answer with the affected rows.
    fn returning(&self, method: reqwest::Method) -> RequestBuilder {
        self.request(method)
            .header("Prefer", "return=representation")
    }

    async fn check(response: Response, action: &str) -> Result<Response, StoreError> {
        let status = response.status();
        if status.is_success() {
            return Ok(response);
        }

        let body = response.text().await.unwrap_or_default();
        let message = serde_json::from_str::<PostgrestError>(&body)
            .map(|e| e.message)
            .unwrap_or(body);
        error!("Error {}: {} {}", action, status, message);
        Err(StoreError::QueryFailed {
            status: status.as_u16(),
            message,
        })
    }

    async fn rows(response: Response, action: &str) -> Result<Vec<Photo>, StoreError> {
        let response = Self::check(response, action).await?;
        response
            .json::<Vec<Photo>>()
            .await
            .map_err(|e| StoreError::InvalidResponse(e.to_string()))
    }
}

#[async_trait]
impl PhotoStore for SupabaseStore {
    async fn list_photos(&self) -> Result<Vec<Photo>, StoreError> {
        let response = self
            .request(reqwest::Method::GET)
            .query(&[("select", "*"), ("order", "created_at.desc")])
            .send()
            .await?;

        let photos = Self::rows(response, "fetching photos").await?;
        debug!("Fetched {} photos", photos.len());
        Ok(photos)
    }

    async fn insert_photo(&self, photo: NewPhoto) -> Result<Photo, StoreError> {
        let response = self
            .returning(reqwest::Method::POST)
            .json(&[&photo])
            .send()
            .await?;

        let inserted = Self::rows(response, "adding photo")
            .await?
            .into_iter()
            .next()
            .ok_or_else(|| StoreError::InvalidResponse("insert returned no rows".to_string()))?;

        info!("Inserted photo {} ({})", inserted.id, inserted.title);
        Ok(inserted)
    }

    async fn update_photo(&self, id: Uuid, update: PhotoUpdate) -> Result<Photo, StoreError> {
        let response = self
            .returning(reqwest::Method::PATCH)
            .query(&[("id", id_filter(id))])
            .json(&update)
            .send()
            .await?;

        Self::rows(response, "updating photo")
            .await?
            .into_iter()
            .next()
            .ok_or_else(|| StoreError::NotFound(id.to_string()))
    }

    async fn delete_photo(&self, id: Uuid) -> Result<(), StoreError> {
        let response = self
            .request(reqwest::Method::DELETE)
            .query(&[("id", id_filter(id))])
            .send()
            .await?;

        Self::check(response, "deleting photo").await?;
        info!("Deleted photo {}", id);
        Ok(())
    }

    async fn get_photo_by_id(&self, id: Uuid) -> Result<Photo, StoreError> {
        let response = self
            .request(reqwest::Method::GET)
            .query(&[("select", "*".to_string()), ("id", id_filter(id))])
            .send()
            .await?;

        let mut rows = Self::rows(response, "fetching photo").await?;
        match rows.len() {
            0 => Err(StoreError::NotFound(id.to_string())),
            1 => Ok(rows.remove(0)),
            count => Err(StoreError::Ambiguous {
                id: id.to_string(),
                count,
            }),
        }
    }

    fn name(&self) -> &str {
        "Supabase"
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_table_url() {
        let store = SupabaseStore::new(&SupabaseConfig {
            url: "https://abc.supabase.co/".to_string(),
            anon_key: "key".to_string(),
            table: "photos".to_string(),
        })
        .unwrap();
        assert_eq!(store.table_url, "https://abc.supabase.co/rest/v1/photos");
        assert_eq!(store.name(), "Supabase");
    }

    #[test]
    fn test_rejects_invalid_config() {
        let invalid_url = SupabaseStore::new(&SupabaseConfig {
            url: "abc.supabase.co".to_string(),
            anon_key: String::new(),
            table: "photos".to_string(),
        });
        assert!(matches!(invalid_url, Err(StoreError::ConfigError(_))));

        let empty_table = SupabaseStore::new(&SupabaseConfig {
            url: "https://abc.supabase.co".to_string(),
            anon_key: String::new(),
            table: " ".to_string(),
        });
        assert!(matches!(empty_table, Err(StoreError::ConfigError(_))));
    }

    #[test]
    fn test_id_filter() {
        let id = Uuid::nil();
        assert_eq!(id_filter(id), "eq.00000000-0000-0000-0000-000000000000");
    }
}
