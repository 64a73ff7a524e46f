use base64::{engine::general_purpose::STANDARD, Engine as _};
use serde::{Deserialize, Serialize};

use super::content::ContentPart;
use crate::error::{RelayError, Result};

pub const SUCCESS_MESSAGE: &str = "Image generated successfully. In a real application, this base64 data would be uploaded to an image hosting service to get a public URL.";

pub const DEFAULT_REFERENCE_MIME: &str = "image/jpeg";

/// Raw form fields of `POST /generate_image`. Presence is checked later so
/// that a missing field gets the relay's own error body.
#[derive(Debug, Clone, Default, Deserialize)]
pub struct GenerateImageForm {
    pub prompt: Option<String>,
    pub apikey: Option<String>,
    pub reference_image_url: Option<String>,
}

#[derive(Debug, Clone, PartialEq)]
pub struct GenerationRequest {
    pub prompt: String,
    pub credential: String,
    pub reference_image_url: Option<String>,
}

impl TryFrom<GenerateImageForm> for GenerationRequest {
    type Error = RelayError;

    fn try_from(form: GenerateImageForm) -> Result<Self> {
        let credential = form
            .apikey
            .filter(|key| !key.is_empty())
            .ok_or(RelayError::MissingCredential)?;
        let prompt = form.prompt.ok_or(RelayError::MissingPrompt)?;
        let reference_image_url = form.reference_image_url.filter(|url| !url.is_empty());

        Ok(Self {
            prompt,
            credential,
            reference_image_url,
        })
    }
}

#[derive(Debug, Clone, PartialEq)]
pub struct ReferenceImage {
    pub bytes: Vec<u8>,
    pub mime_type: String,
}

impl ReferenceImage {
    pub fn into_part(self) -> ContentPart {
        ContentPart::inline(self.mime_type, STANDARD.encode(&self.bytes))
    }
}

#[derive(Debug, Clone, PartialEq)]
pub struct GeneratedImage {
    pub mime_type: String,
    pub data: String, // Base64 encoded
}

impl GeneratedImage {
    pub fn to_data_url(&self) -> String {
        format!("data:{};base64,{}", self.mime_type, self.data)
    }
}

#[derive(Debug, Clone, Serialize)]
pub struct GenerationResponse {
    pub image_url: String,
    pub message: String,
}

impl From<&GeneratedImage> for GenerationResponse {
    fn from(image: &GeneratedImage) -> Self {
        Self {
            image_url: image.to_data_url(),
            message: SUCCESS_MESSAGE.to_string(),
        }
    }
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ErrorBody {
    pub detail: String,
}
