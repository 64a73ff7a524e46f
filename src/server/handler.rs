use actix_multipart::{Multipart, MultipartError};
use actix_web::{web, HttpResponse};
use futures::TryStreamExt;

use super::{AppContext, FORM_LIMIT_BYTES};
use crate::{
    error::{RelayError, Result},
    logger,
    models::{ContentPart, GenerateImageForm, GenerationRequest, GenerationResponse},
    upstream::ImageUpstream,
};

/// Text prompt first, then the reference image if one was given; the two
/// outbound calls never overlap because the second embeds the first's result.
pub async fn relay_generation(
    upstream: &dyn ImageUpstream,
    request: GenerationRequest,
) -> Result<GenerationResponse> {
    let mut parts = vec![ContentPart::text(request.prompt)];

    if let Some(url) = request.reference_image_url.as_deref() {
        let reference = upstream.fetch_reference_image(url).await?;
        parts.push(reference.into_part());
    }

    let image = {
        let _timer = logger::timer("Gemini image generation");
        upstream.generate(parts, &request.credential).await?
    };

    log::info!(
        "✅ Image generated: {} ({} base64 chars)",
        image.mime_type,
        image.data.len()
    );

    Ok(GenerationResponse::from(&image))
}

pub async fn generate_image(
    context: web::Data<AppContext>,
    form: web::Form<GenerateImageForm>,
) -> std::result::Result<HttpResponse, RelayError> {
    respond(&context, form.into_inner()).await
}

/// Same endpoint for `multipart/form-data` bodies. Fields are read as UTF-8
/// text; unknown fields are skipped.
pub async fn generate_image_multipart(
    context: web::Data<AppContext>,
    mut payload: Multipart,
) -> std::result::Result<HttpResponse, RelayError> {
    let form = read_multipart_form(&mut payload).await.map_err(|e| {
        log::warn!("Rejected multipart submission: {}", e);
        e
    })?;
    respond(&context, form).await
}

async fn read_multipart_form(payload: &mut Multipart) -> Result<GenerateImageForm> {
    let mut form = GenerateImageForm::default();
    let mut total = 0usize;

    while let Some(mut field) = payload.try_next().await.map_err(invalid_multipart)? {
        let name = field
            .content_disposition()
            .get_name()
            .unwrap_or_default()
            .to_string();

        let mut bytes = Vec::new();
        while let Some(chunk) = field.try_next().await.map_err(invalid_multipart)? {
            total += chunk.len();
            if total > FORM_LIMIT_BYTES {
                return Err(RelayError::InvalidForm(format!(
                    "payload exceeds {} bytes",
                    FORM_LIMIT_BYTES
                )));
            }
            bytes.extend_from_slice(&chunk);
        }

        let value = String::from_utf8(bytes).map_err(|_| {
            RelayError::InvalidForm(format!("field `{}` is not valid UTF-8", name))
        })?;

        match name.as_str() {
            "prompt" => form.prompt = Some(value),
            "apikey" => form.apikey = Some(value),
            "reference_image_url" => form.reference_image_url = Some(value),
            other => log::debug!("Skipping multipart field `{}`", other),
        }
    }

    Ok(form)
}

fn invalid_multipart(e: MultipartError) -> RelayError {
    RelayError::InvalidForm(e.to_string())
}

async fn respond(
    context: &AppContext,
    form: GenerateImageForm,
) -> std::result::Result<HttpResponse, RelayError> {
    let request = GenerationRequest::try_from(form).map_err(|e| {
        log::warn!("Rejected generation request: {}", e);
        e
    })?;

    log::info!(
        "🖼️  Generation request: prompt_len={}, reference={}",
        request.prompt.len(),
        request.reference_image_url.is_some()
    );

    match relay_generation(context.upstream(), request).await {
        Ok(response) => Ok(HttpResponse::Ok().json(response)),
        Err(e) => {
            if e.is_client_error() {
                log::warn!("Generation failed: {}", e);
            } else {
                log::error!("Generation failed: {}", e);
            }
            Err(e)
        }
    }
}

pub async fn index() -> HttpResponse {
    HttpResponse::Ok()
        .content_type("text/plain; charset=utf-8")
        .body("Gemini image relay running. POST /generate_image with form fields prompt, apikey and optional reference_image_url.")
}
