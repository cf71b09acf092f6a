pub mod config;
pub mod error;
pub mod gemini;
pub mod logger;
pub mod models;
pub mod prompt;
pub mod server;

#[cfg(test)]
mod testing;

pub use config::Config;
pub use error::{RelayError, Result};
pub use gemini::{GeminiClient, ImageModel};
pub use models::{GenerationRequest, ImageSource, InlineImagePart, NormalizedResult};
pub use server::AppState;
