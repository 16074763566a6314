use serde::{Deserialize, Serialize};

/// A file as received from the client.
#[derive(Debug, Clone)]
pub struct MediaFile {
    pub file_name: String,
    pub content_type: Option<String>,
    pub bytes: Vec<u8>,
}

impl MediaFile {
    pub fn new(
        file_name: impl Into<String>,
        content_type: Option<String>,
        bytes: impl Into<Vec<u8>>,
    ) -> Self {
        Self {
            file_name: file_name.into(),
            content_type,
            bytes: bytes.into(),
        }
    }

    /// File name without directories or extension.
    pub fn base_name(&self) -> Option<String> {
        let name = self
            .file_name
            .rsplit(['/', '\\'])
            .next()
            .unwrap_or(&self.file_name);
        let stem = match name.rfind('.') {
            Some(index) => &name[..index],
            None => name,
        };
        let stem = stem.trim();
        (!stem.is_empty()).then(|| stem.to_string())
    }

    pub fn len(&self) -> usize {
        self.bytes.len()
    }

    pub fn is_empty(&self) -> bool {
        self.bytes.is_empty()
    }
}

/// What the media host reports for a stored asset.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct UploadedMedia {
    pub url: String,
    pub media_id: String,
    pub width: u32,
    pub height: u32,
}

#[cfg(test)]
mod tests {
    use super::*;

    fn named(name: &str) -> MediaFile {
        MediaFile::new(name, None, Vec::new())
    }

    #[test]
    fn test_base_name_strips_extension_and_directories() {
        assert_eq!(named("sunset.jpg").base_name().as_deref(), Some("sunset"));
        assert_eq!(
            named("holiday.2024.png").base_name().as_deref(),
            Some("holiday.2024")
        );
        assert_eq!(
            named("C:\\photos\\beach.jpeg").base_name().as_deref(),
            Some("beach")
        );
        assert_eq!(named("album/cat.gif").base_name().as_deref(), Some("cat"));
        assert_eq!(named("noext").base_name().as_deref(), Some("noext"));
    }

    #[test]
    fn test_base_name_empty_cases() {
        assert_eq!(named("").base_name(), None);
        assert_eq!(named(".jpg").base_name(), None);
        assert_eq!(named("   .png").base_name(), None);
    }
}
