pub mod cloudinary;
pub mod memory;
