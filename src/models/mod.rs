pub mod content;
pub mod image;

pub use content::*;
pub use image::*;
