use crate::{
    error::{RelayError, Result},
    gemini::normalize::{self, log_diagnostics},
    logger,
    models::{
        gemini::GenerateContentRequest,
        image::{
            EditFailure, ErrorReply, GenerateFailure, GenerationRequest, NormalizedResult,
            Operation,
        },
    },
    prompt::{self, assembler},
    server::{
        form::{read_image_form, ImageForm},
        AppState,
    },
};
use actix_multipart::Multipart;
use actix_web::{
    http::header::{ContentDisposition, DispositionParam, DispositionType},
    web, HttpResponse,
};
use base64::{engine::general_purpose::STANDARD, Engine as _};

pub const NO_IMAGE_PROVIDED: &str =
    "No image provided. Please upload an image file or provide an image URL.";

async fn call_model(
    state: &AppState,
    request_id: &str,
    request: &GenerateContentRequest,
) -> Result<NormalizedResult> {
    let model = &state.config.image_model;
    let response = {
        let _timer = logger::timer(format!("[{}] {} generateContent", request_id, model));
        state.model.generate_content(model, request).await?
    };

    log_diagnostics(request_id, &response);
    let result = normalize::normalize(&response);
    match &result {
        NormalizedResult::Image { data, .. } => {
            log::info!("[{}] ✅ Image data extracted ({} chars)", request_id, data.len())
        }
        NormalizedResult::Text(_) => {
            log::warn!("[{}] Provider answered with text only", request_id)
        }
        NormalizedResult::Error(reason) => log::warn!("[{}] {}", request_id, reason),
    }
    Ok(result)
}

async fn run_generation(
    state: &AppState,
    request_id: &str,
    request: &GenerationRequest,
) -> Result<NormalizedResult> {
    let user_prompt = if request.enhance_prompt {
        prompt::enhance_prompt(
            &*state.model,
            &state.config.text_model,
            &request.prompt,
        )
        .await
    } else {
        request.prompt.clone()
    };

    let final_prompt = assembler::generation_prompt(&user_prompt, &request.aspect_ratio);
    let parts = assembler::build_parts(Vec::new(), final_prompt);
    let provider_request =
        assembler::image_request(parts, &request.aspect_ratio, &request.output_resolution);
    call_model(state, request_id, &provider_request).await
}

pub async fn generate_image(
    state: web::Data<AppState>,
    body: web::Json<GenerationRequest>,
) -> HttpResponse {
    let request = body.into_inner();
    let request_id = logger::request_id();
    log::info!(
        "[{}] 🎨 Generating image: aspect_ratio={}, resolution={}, format={}",
        request_id,
        request.aspect_ratio,
        request.output_resolution,
        request.output_format
    );
    log::debug!("[{}] Prompt: {}", request_id, request.prompt);

    match run_generation(&state, &request_id, &request).await {
        Ok(result) => HttpResponse::Ok().json(Operation::Generate.reply(
            result,
            &request.prompt,
            &request.aspect_ratio,
        )),
        Err(e) => {
            log::error!("[{}] ❌ Image generation failed: {}", request_id, e);
            HttpResponse::Ok().json(GenerateFailure::new(&e, &request))
        }
    }
}

async fn run_edit(state: &AppState, request_id: &str, form: &ImageForm) -> Result<NormalizedResult> {
    let user_prompt = form.require_prompt()?;
    let images = assembler::resolve_sources(&state.http, form.image_sources()).await?;
    log::info!(
        "[{}] Sending {} image(s) + 1 text prompt",
        request_id,
        images.len()
    );

    let parts = assembler::build_parts(
        images,
        assembler::edit_prompt(user_prompt, &form.aspect_ratio),
    );
    let provider_request =
        assembler::image_request(parts, &form.aspect_ratio, &form.output_resolution);
    call_model(state, request_id, &provider_request).await
}

pub async fn edit_image(state: web::Data<AppState>, payload: Multipart) -> HttpResponse {
    let request_id = logger::request_id();
    let form = match read_image_form(payload).await {
        Ok(form) => form,
        Err(e) => {
            log::error!("[{}] ❌ Unreadable edit form: {}", request_id, e);
            return HttpResponse::Ok().json(ErrorReply::from(&e));
        }
    };

    log::info!(
        "[{}] ✏️ Edit image request: aspect_ratio={}, urls={:?}, files={}",
        request_id,
        form.aspect_ratio,
        form.image_urls,
        form.uploads.len()
    );

    if form.prompt.is_some() && !form.has_image_urls() && !form.has_uploads() {
        log::warn!("[{}] Edit request without any image source", request_id);
        return HttpResponse::Ok().json(ErrorReply::message(NO_IMAGE_PROVIDED));
    }

    match run_edit(&state, &request_id, &form).await {
        Ok(result) => HttpResponse::Ok().json(Operation::Edit.reply(
            result,
            form.prompt.as_deref().unwrap_or_default(),
            &form.aspect_ratio,
        )),
        Err(e) => {
            log::error!("[{}] ❌ Image editing failed: {}", request_id, e);
            HttpResponse::Ok().json(EditFailure {
                error: e.to_string(),
                error_type: e.kind().to_string(),
                prompt: form.prompt.clone(),
                aspect_ratio: Some(form.aspect_ratio.clone()),
                has_image_file: form.has_uploads(),
                has_image_urls: form.has_image_urls(),
            })
        }
    }
}

async fn run_compose(
    state: &AppState,
    request_id: &str,
    form: &ImageForm,
) -> Result<NormalizedResult> {
    let user_prompt = form.require_prompt()?;
    let images = assembler::resolve_sources(&state.http, form.image_sources()).await?;
    log::info!("[{}] Composing {} image(s)", request_id, images.len());

    let parts = assembler::build_parts(images, assembler::compose_prompt(user_prompt));
    let provider_request =
        assembler::image_request(parts, &form.aspect_ratio, &form.output_resolution);
    call_model(state, request_id, &provider_request).await
}

pub async fn compose_images(state: web::Data<AppState>, payload: Multipart) -> HttpResponse {
    let request_id = logger::request_id();
    let result = match read_image_form(payload).await {
        Ok(mut form) => {
            // Only uploaded files take part in a composition.
            form.image_urls.clear();
            log::info!(
                "[{}] 🧩 Compose request: aspect_ratio={}, files={}",
                request_id,
                form.aspect_ratio,
                form.uploads.len()
            );
            run_compose(&state, &request_id, &form)
                .await
                .map(|result| (result, form))
        }
        Err(e) => Err(e),
    };

    match result {
        Ok((result, form)) => HttpResponse::Ok().json(Operation::Compose.reply(
            result,
            form.prompt.as_deref().unwrap_or_default(),
            &form.aspect_ratio,
        )),
        Err(e) => {
            log::error!("[{}] ❌ Image composition failed: {}", request_id, e);
            HttpResponse::Ok().json(ErrorReply::message(e.to_string()))
        }
    }
}

/// Decodes a base64 path segment into image bytes.
pub fn decode_image_segment(segment: &str) -> Result<Vec<u8>> {
    let trimmed = segment.trim();
    if trimmed.is_empty() {
        return Err(RelayError::DecodeError("empty image data".into()));
    }
    Ok(STANDARD.decode(trimmed)?)
}

pub async fn download_image(path: web::Path<String>) -> HttpResponse {
    match decode_image_segment(&path.into_inner()) {
        Ok(bytes) => {
            log::info!("📥 Serving download ({} bytes)", bytes.len());
            HttpResponse::Ok()
                .content_type("image/png")
                .insert_header(ContentDisposition {
                    disposition: DispositionType::Attachment,
                    parameters: vec![DispositionParam::Filename(
                        "generated_image.png".to_string(),
                    )],
                })
                .body(bytes)
        }
        Err(e) => {
            log::warn!("Rejected download: {}", e);
            HttpResponse::Ok().json(ErrorReply::message(e.to_string()))
        }
    }
}
