use crate::store::Photo;
use chrono::NaiveDate;
use serde::Serialize;

pub const TODAY_FORMAT: &str = "%A, %B %-d, %Y";

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct AdminStats {
    pub total: usize,
    pub with_description: usize,
    pub today: String,
}

impl AdminStats {
    pub fn collect(photos: &[Photo], today: NaiveDate) -> Self {
        Self {
            total: photos.len(),
            with_description: photos.iter().filter(|p| p.has_description()).count(),
            today: today.format(TODAY_FORMAT).to_string(),
        }
    }
}
