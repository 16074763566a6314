use crate::media::{build_display_url, detail_options, thumbnail_options};
use crate::store::Photo;
use serde::Serialize;

/// Display format for creation dates, e.g. "March 7, 2024".
pub const DATE_FORMAT: &str = "%B %-d, %Y";

/// Everything a template needs to show one photo.
#[derive(Debug, Clone, Serialize)]
pub struct PhotoCard {
    pub id: String,
    pub title: String,
    pub description: Option<String>,
    pub url: String,
    pub media_url: String,
    pub thumbnail_url: String,
    pub display_url: String,
    pub created_at: String,
    pub created_label: String,
}

impl PhotoCard {
    pub fn from_photo(photo: &Photo) -> Self {
        Self {
            id: photo.id.to_string(),
            title: photo.title.clone(),
            description: photo
                .has_description()
                .then(|| photo.description.clone())
                .flatten(),
            url: format!("/photos/{}", photo.id),
            media_url: photo.media_url.clone(),
            thumbnail_url: build_display_url(&photo.media_url, &thumbnail_options()),
            display_url: build_display_url(&photo.media_url, &detail_options()),
            created_at: photo.created_at.to_rfc3339(),
            created_label: photo.created_at.format(DATE_FORMAT).to_string(),
        }
    }
}

/// Link to a neighbouring photo in the detail view.
#[derive(Debug, Clone, Serialize)]
pub struct NavigationPhoto {
    pub url: String,
    pub title: String,
    pub thumbnail_url: String,
}

impl NavigationPhoto {
    pub fn from_photo(photo: &Photo) -> Self {
        Self {
            url: format!("/photos/{}", photo.id),
            title: photo.title.clone(),
            thumbnail_url: build_display_url(&photo.media_url, &thumbnail_options()),
        }
    }
}
