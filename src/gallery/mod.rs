mod handlers;
pub mod navigation;
mod types;


pub use handlers::{fallback_handler, gallery_page, parse_photo_id, photo_page};
pub use navigation::{Neighbors, Position, neighbors};
pub use types::*;
