pub mod aspect;
pub mod gemini;
pub mod image;

pub use aspect::{AspectRatioProfile, DEFAULT_ASPECT_RATIO};
pub use gemini::*;
pub use image::*;
