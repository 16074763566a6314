mod actions;
mod handlers;
mod stats;


pub use actions::*;
pub use handlers::{admin_page, delete_submit, edit_page, edit_submit};
pub use stats::*;
