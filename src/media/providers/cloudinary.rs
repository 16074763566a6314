use async_trait::async_trait;
use reqwest::multipart::{Form, Part};
use serde::{Deserialize, Serialize};
use sha2::{Digest, Sha256};
use tracing::{debug, error, info, warn};
use url::Url;

use crate::media::{CloudinaryConfig, MediaFile, MediaHost, UploadError, UploadedMedia};

pub struct CloudinaryHost {
    client: reqwest::Client,
    upload_url: String,
    destroy_url: String,
    upload_preset: String,
    api_key: String,
    api_secret: Option<String>,
}

#[derive(Debug, Deserialize)]
struct UploadResponse {
    secure_url: String,
    public_id: String,
    #[serde(default)]
    width: u32,
    #[serde(default)]
    height: u32,
}

#[derive(Debug, Deserialize)]
struct ErrorResponse {
    error: ErrorDetail,
}

#[derive(Debug, Deserialize)]
struct ErrorDetail {
    message: String,
}

#[derive(Debug, Serialize)]
struct DestroyRequest<'a> {
    public_id: &'a str,
    api_key: &'a str,
    #[serde(skip_serializing_if = "Option::is_none")]
    timestamp: Option<i64>,
    #[serde(skip_serializing_if = "Option::is_none")]
    signature: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    signature_algorithm: Option<&'static str>,
}

#[derive(Debug, Deserialize)]
struct DestroyResponse {
    #[serde(default)]
    result: String,
}

impl CloudinaryHost {
    pub fn new(config: &CloudinaryConfig) -> Result<Self, UploadError> {
        let cloud_name = config.cloud_name.trim();
        if cloud_name.is_empty() {
            return Err(UploadError::ConfigError(
                "cloud_name must not be empty".to_string(),
            ));
        }
        if config.upload_preset.trim().is_empty() {
            return Err(UploadError::ConfigError(
                "upload_preset must not be empty".to_string(),
            ));
        }

        let api_base = Url::parse(&config.api_base).map_err(|e| {
            UploadError::ConfigError(format!("invalid api_base '{}': {}", config.api_base, e))
        })?;
        let api_base = api_base.as_str().trim_end_matches('/');

        let client = reqwest::Client::builder()
            .user_agent(concat!("photoshare/", env!("CARGO_PKG_VERSION")))
            .build()?;

        Ok(Self {
            client,
            upload_url: format!("{}/v1_1/{}/image/upload", api_base, cloud_name),
            destroy_url: format!("{}/v1_1/{}/image/destroy", api_base, cloud_name),
            upload_preset: config.upload_preset.clone(),
            api_key: config.api_key.clone(),
            api_secret: config.api_secret.clone().filter(|s| !s.is_empty()),
        })
    }

    async fn destroy(&self, media_id: &str) -> Result<String, UploadError> {
        let (timestamp, signature, signature_algorithm) = match &self.api_secret {
            Some(secret) => {
                let timestamp = chrono::Utc::now().timestamp();
                let signature = sign_params(
                    &[
                        ("public_id", media_id.to_string()),
                        ("timestamp", timestamp.to_string()),
                    ],
                    secret,
                );
                (Some(timestamp), Some(signature), Some("sha256"))
            }
            None => (None, None, None),
        };

        let request = DestroyRequest {
            public_id: media_id,
            api_key: &self.api_key,
            timestamp,
            signature,
            signature_algorithm,
        };

        let response = self
            .client
            .post(&self.destroy_url)
            .json(&request)
            .send()
            .await?;

        let status = response.status();
        let body: DestroyResponse = response
            .json()
            .await
            .map_err(|e| UploadError::InvalidResponse(format!("{} ({})", e, status)))?;
        Ok(body.result)
    }
}

/// Cloudinary request signature: parameters sorted by name, joined as a
/// query string, secret appended, SHA-256, lowercase hex.
pub fn sign_params(params: &[(&str, String)], api_secret: &str) -> String {
    let mut sorted: Vec<_> = params.iter().collect();
    sorted.sort_by(|a, b| a.0.cmp(b.0));

    let to_sign = sorted
        .iter()
        .map(|(name, value)| format!("{}={}", name, value))
        .collect::<Vec<_>>()
        .join("&");

    let mut hasher = Sha256::new();
    hasher.update(to_sign.as_bytes());
    hasher.update(api_secret.as_bytes());
    hasher
        .finalize()
        .iter()
        .map(|b| format!("{:02x}", b))
        .collect()
}

fn rejection_message(body: &str) -> String {
    serde_json::from_str::<ErrorResponse>(body)
        .map(|e| e.error.message)
        .unwrap_or_else(|_| body.chars().take(200).collect())
}

#[async_trait]
impl MediaHost for CloudinaryHost {
    async fn upload(&self, file: &MediaFile) -> Result<UploadedMedia, UploadError> {
        debug!(
            "Uploading {} ({} bytes) to Cloudinary",
            file.file_name,
            file.len()
        );

        let mut part = Part::bytes(file.bytes.clone()).file_name(file.file_name.clone());
        if let Some(content_type) = &file.content_type {
            part = part.mime_str(content_type)?;
        }

        let form = Form::new()
            .part("file", part)
            .text("upload_preset", self.upload_preset.clone());

        let response = self
            .client
            .post(&self.upload_url)
            .multipart(form)
            .send()
            .await
            .map_err(|e| {
                error!("Cloudinary upload request failed: {}", e);
                UploadError::RequestError(e)
            })?;

        let status = response.status();
        if !status.is_success() {
            let body = response.text().await.unwrap_or_default();
            let message = rejection_message(&body);
            error!("Cloudinary upload rejected ({}): {}", status, message);
            return Err(UploadError::Rejected {
                status: status.as_u16(),
                message,
            });
        }

        let body: UploadResponse = response
            .json()
            .await
            .map_err(|e| UploadError::InvalidResponse(e.to_string()))?;

        info!("Uploaded {} as {}", file.file_name, body.public_id);

        Ok(UploadedMedia {
            url: body.secure_url,
            media_id: body.public_id,
            width: body.width,
            height: body.height,
        })
    }

    async fn delete(&self, media_id: &str) -> bool {
        match self.destroy(media_id).await {
            Ok(result) if result == "ok" => {
                info!("Deleted {} from Cloudinary", media_id);
                true
            }
            Ok(result) => {
                warn!(
                    "Cloudinary did not confirm deletion of {}: result '{}'",
                    media_id, result
                );
                false
            }
            Err(e) => {
                error!("Cloudinary delete error for {}: {}", media_id, e);
                false
            }
        }
    }

    fn name(&self) -> &str {
        "Cloudinary"
    }
}
