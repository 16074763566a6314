//! Display variants of hosted images.
//!
//! The media host serves transformed variants when resize and quality
//! directives are inserted right after the `/upload/` path segment of an
//! asset URL:
//!
//! ```text
//! https://res.cloudinary.com/demo/image/upload/v1/cat.jpg
//! https://res.cloudinary.com/demo/image/upload/w_400,h_300,c_fill,q_auto,f_auto/v1/cat.jpg
//! ```
//!
//! Only the first occurrence of the segment is rewritten. URLs without it
//! are returned unchanged.

use serde::{Deserialize, Serialize};
use std::fmt;

pub const UPLOAD_SEGMENT: &str = "/upload/";

const AUTO: &str = "auto";

#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct DisplayOptions {
    pub width: Option<u32>,
    pub height: Option<u32>,
    pub quality: Option<u32>,
    pub format: Option<String>,
}

impl DisplayOptions {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn sized(width: u32, height: u32) -> Self {
        Self {
            width: Some(width),
            height: Some(height),
            ..Self::default()
        }
    }

    pub fn with_quality(mut self, quality: u32) -> Self {
        self.quality = Some(quality);
        self
    }

    pub fn with_format(mut self, format: impl Into<String>) -> Self {
        self.format = Some(format.into());
        self
    }

    pub fn directives(&self) -> String {
        format!(
            "w_{},h_{},c_fill,q_{},f_{}",
            Directive(self.width),
            Directive(self.height),
            Directive(self.quality),
            self.format.as_deref().unwrap_or(AUTO)
        )
    }
}

struct Directive(Option<u32>);

impl fmt::Display for Directive {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self.0 {
            Some(value) => write!(f, "{}", value),
            None => f.write_str(AUTO),
        }
    }
}

/// Card thumbnails in the gallery grid.
pub fn thumbnail_options() -> DisplayOptions {
    DisplayOptions::sized(400, 300)
}

/// The full-size detail view.
pub fn detail_options() -> DisplayOptions {
    DisplayOptions::sized(1200, 800)
}

/// Small square previews in the admin panel.
pub fn admin_options() -> DisplayOptions {
    DisplayOptions::sized(160, 160)
}

pub fn build_display_url(base_url: &str, options: &DisplayOptions) -> String {
    let replacement = format!("{}{}/", UPLOAD_SEGMENT, options.directives());
    base_url.replacen(UPLOAD_SEGMENT, &replacement, 1)
}
