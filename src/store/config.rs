use serde::{Deserialize, Serialize};

pub const DEFAULT_TABLE: &str = "photos";

#[derive(Debug, Clone, Deserialize, Serialize)]
#[serde(tag = "provider", rename_all = "lowercase")]
pub enum PhotoStoreConfig {
    Supabase(SupabaseConfig),
    Memory,
}

impl Default for PhotoStoreConfig {
    fn default() -> Self {
        PhotoStoreConfig::Memory
    }
}

#[derive(Debug, Clone, Deserialize, Serialize)]
pub struct SupabaseConfig {
    pub url: String,
    #[serde(default)]
    pub anon_key: String,
    #[serde(default = "default_table")]
    pub table: String,
}

fn default_table() -> String {
    DEFAULT_TABLE.to_string()
}
