use crate::{
    config::GeminiConfig,
    error::{RelayError, Result},
    models::{
        ContentPart, GenerateContentRequest, GenerateContentResponse, GeneratedImage,
        ReferenceImage, DEFAULT_REFERENCE_MIME,
    },
    upstream::ImageUpstream,
};
use async_trait::async_trait;
use reqwest::{
    header::{HeaderMap, HeaderValue, CONTENT_TYPE},
    Client,
};

const API_KEY_HEADER: &str = "x-goog-api-key";

#[derive(Clone)]
pub struct GeminiImageClient {
    client: Client,
    endpoint: String,
}

impl GeminiImageClient {
    pub fn new(config: GeminiConfig) -> Result<Self> {
        let client = Client::builder()
            .build()
            .map_err(|e| RelayError::Config(format!("failed to build HTTP client: {}", e)))?;

        Ok(Self::with_client(client, config))
    }

    pub fn with_client(client: Client, config: GeminiConfig) -> Self {
        Self {
            client,
            endpoint: config.endpoint,
        }
    }
}

#[async_trait]
impl ImageUpstream for GeminiImageClient {
    async fn fetch_reference_image(&self, url: &str) -> Result<ReferenceImage> {
        log::info!("📥 Downloading reference image");
        log::debug!("Reference image URL: {}", url);

        let response = self
            .client
            .get(url)
            .send()
            .await
            .and_then(|response| response.error_for_status())
            .map_err(|e| {
                log::warn!("Reference image download failed: {}", e);
                RelayError::ImageDownloadFailed(e.to_string())
            })?;

        let mime_type = declared_mime_type(response.headers());
        let bytes = response
            .bytes()
            .await
            .map_err(|e| RelayError::ImageDownloadFailed(e.to_string()))?;

        log::debug!("Reference image: {} bytes of {}", bytes.len(), mime_type);

        Ok(ReferenceImage {
            bytes: bytes.to_vec(),
            mime_type,
        })
    }

    async fn generate(&self, parts: Vec<ContentPart>, credential: &str) -> Result<GeneratedImage> {
        let mut api_key = HeaderValue::from_str(credential)
            .map_err(|e| RelayError::Unexpected(format!("API key is not a valid header value: {}", e)))?;
        api_key.set_sensitive(true);

        let payload = GenerateContentRequest::from_parts(parts);

        log::info!("🎨 Requesting image generation from {}", self.endpoint);

        let response = self
            .client
            .post(&self.endpoint)
            .header(API_KEY_HEADER, api_key)
            .json(&payload)
            .send()
            .await
            .map_err(|e| RelayError::UpstreamRequestFailed(e.to_string()))?;

        let status = response.status();
        if !status.is_success() {
            let error_text = response.text().await.unwrap_or_default();
            log::error!("Gemini API returned {}: {}", status, error_text);
            return Err(RelayError::UpstreamRequestFailed(format!(
                "{} - {}",
                status, error_text
            )));
        }

        // Only a body that is not JSON at all is a transport failure; any JSON
        // of the wrong shape takes the same path as a reply without an image.
        let body: serde_json::Value = response
            .json()
            .await
            .map_err(|e| RelayError::UpstreamRequestFailed(e.to_string()))?;

        let body = GenerateContentResponse::from_value(body).ok_or_else(|| {
            log::error!("Gemini response is not a generateContent object");
            RelayError::MalformedUpstreamResponse
        })?;

        extract_image(&body)
    }
}

fn declared_mime_type(headers: &HeaderMap) -> String {
    headers
        .get(CONTENT_TYPE)
        .and_then(|value| value.to_str().ok())
        .filter(|value| !value.is_empty())
        .unwrap_or(DEFAULT_REFERENCE_MIME)
        .to_string()
}

fn extract_image(response: &GenerateContentResponse) -> Result<GeneratedImage> {
    let blob = response.first_inline_blob().ok_or_else(|| {
        log::error!(
            "No inline image data in Gemini response ({} candidates)",
            response.candidate_count()
        );
        RelayError::MalformedUpstreamResponse
    })?;

    match (&blob.mime_type, &blob.data) {
        (Some(mime_type), Some(data)) => Ok(GeneratedImage {
            mime_type: mime_type.clone(),
            data: data.clone(),
        }),
        _ => Err(RelayError::MalformedUpstreamResponse),
    }
}
