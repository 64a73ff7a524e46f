pub mod config;
pub mod error;
pub mod logger;
pub mod models;
#[cfg(feature = "server")]
pub mod server;
pub mod upstream;

pub use config::{Config, GeminiConfig, ServerConfig};
pub use error::{RelayError, Result};
pub use models::{
    ContentPart, GenerateImageForm, GeneratedImage, GenerationRequest, GenerationResponse,
    ReferenceImage,
};
pub use upstream::{GeminiImageClient, ImageUpstream};
