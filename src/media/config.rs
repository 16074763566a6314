use serde::{Deserialize, Serialize};

pub const DEFAULT_CLOUDINARY_API_BASE: &str = "https://api.cloudinary.com";

/// Route prefix under which the server hands out in-memory assets.
pub const LOCAL_MEDIA_PREFIX: &str = "/media/image/upload";

#[derive(Debug, Clone, Deserialize, Serialize)]
#[serde(tag = "provider", rename_all = "lowercase")]
pub enum MediaHostConfig {
    Cloudinary(CloudinaryConfig),
    Memory(MemoryHostConfig),
}

impl Default for MediaHostConfig {
    fn default() -> Self {
        MediaHostConfig::Memory(MemoryHostConfig::default())
    }
}

#[derive(Debug, Clone, Deserialize, Serialize)]
pub struct CloudinaryConfig {
    pub cloud_name: String,
    pub upload_preset: String,
    #[serde(default)]
    pub api_key: String,
    /// Signs destroy requests when present.
    #[serde(default)]
    pub api_secret: Option<String>,
    #[serde(default = "default_api_base")]
    pub api_base: String,
}

fn default_api_base() -> String {
    DEFAULT_CLOUDINARY_API_BASE.to_string()
}

#[derive(Debug, Clone, Deserialize, Serialize)]
pub struct MemoryHostConfig {
    #[serde(default = "default_memory_base_url")]
    pub base_url: String,
}

fn default_memory_base_url() -> String {
    LOCAL_MEDIA_PREFIX.to_string()
}

impl Default for MemoryHostConfig {
    fn default() -> Self {
        Self {
            base_url: default_memory_base_url(),
        }
    }
}
