use crate::{
    error::{RelayError, Result},
    models::{
        aspect,
        gemini::{Blob, Content, GenerateContentRequest, GenerationConfig, RequestPart},
        image::{ImageSource, InlineImagePart},
    },
};
use base64::{engine::general_purpose::STANDARD, Engine as _};
use reqwest::{header::CONTENT_TYPE, Client};

pub const URL_IMAGE_MIME: &str = "image/jpeg";
pub const UPLOAD_IMAGE_MIME: &str = "image/png";
const IMAGE_ONLY: &str = "Return ONLY the final";

/// Prompt for text-to-image generation with aspect-ratio framing.
pub fn generation_prompt(prompt: &str, aspect_ratio: &str) -> String {
    let profile = aspect::profile_for(aspect_ratio);
    format!(
        "{prompt}

Technical Specifications:
- Use {cinematic} framing
- Photorealistic, highly detailed, professional quality
- Sharp focus, perfect lighting

Output: {IMAGE_ONLY} generated image. Do not return text.",
        prompt = prompt,
        cinematic = profile.cinematic,
        IMAGE_ONLY = IMAGE_ONLY,
    )
}

pub fn edit_prompt(prompt: &str, aspect_ratio: &str) -> String {
    let profile = aspect::profile_for(aspect_ratio);
    format!(
        "You are an expert photo editor AI. Your task is to perform a natural edit on the provided image based on the user's request.

User Request: \"{prompt}\"

Editing Guidelines:
- Apply the requested edit to the image while maintaining photorealism
- Keep the overall composition and style consistent
- Make the edit blend seamlessly with the rest of the image
- Deliver the result in {description}

Output: {IMAGE_ONLY} edited image. Do not return text.",
        prompt = prompt,
        description = profile.description,
        IMAGE_ONLY = IMAGE_ONLY,
    )
}

pub fn compose_prompt(prompt: &str) -> String {
    format!(
        "You are an expert photo editor AI. Your task is to compose the provided images into a single cohesive image based on the user's request.

User Request: \"{prompt}\"

Composition Guidelines:
- Combine the provided images in a natural, realistic way
- Maintain consistent lighting and style across the composition
- Create a seamless blend that looks professional and natural

Output: {IMAGE_ONLY} composed image. Do not return text.",
        prompt = prompt,
        IMAGE_ONLY = IMAGE_ONLY,
    )
}

/// Splits the `image_urls` form value on commas, dropping blanks.
pub fn parse_image_urls(raw: &str) -> Vec<String> {
    raw.split(',')
        .map(str::trim)
        .filter(|url| !url.is_empty())
        .map(str::to_string)
        .collect()
}

/// Downloads one image. Any transport failure or non-2xx status is an error.
pub async fn fetch_image(client: &Client, url: &str) -> Result<InlineImagePart> {
    log::info!("Processing image URL: {}", url);

    let response = client
        .get(url)
        .send()
        .await
        .map_err(|e| RelayError::FetchError(format!("{}: {}", url, e)))?
        .error_for_status()
        .map_err(|e| RelayError::FetchError(format!("{}: {}", url, e)))?;

    let mime_type = response
        .headers()
        .get(CONTENT_TYPE)
        .and_then(|value| value.to_str().ok())
        .map(|value| value.split(';').next().unwrap_or(value).trim().to_string())
        .filter(|value| value.starts_with("image/"))
        .unwrap_or_else(|| URL_IMAGE_MIME.to_string());

    let bytes = response
        .bytes()
        .await
        .map_err(|e| RelayError::FetchError(format!("{}: {}", url, e)))?;

    log::info!("Added image from URL ({} bytes, {})", bytes.len(), mime_type);
    Ok(InlineImagePart {
        mime_type,
        data: STANDARD.encode(&bytes),
    })
}

/// Turns every source into an inline part, in order. Stops at the first
/// failed download.
pub async fn resolve_sources(client: &Client, sources: Vec<ImageSource>) -> Result<Vec<InlineImagePart>> {
    let mut images = Vec::with_capacity(sources.len());
    for source in sources {
        let image = match source {
            ImageSource::Url(url) => fetch_image(client, &url).await?,
            ImageSource::Upload {
                bytes,
                mime_type,
                filename,
            } => {
                log::info!("Added uploaded image: {} ({} bytes)", filename, bytes.len());
                InlineImagePart {
                    mime_type: mime_type.unwrap_or_else(|| UPLOAD_IMAGE_MIME.to_string()),
                    data: STANDARD.encode(&bytes),
                }
            }
        };
        images.push(image);
    }
    Ok(images)
}

/// Image parts first, then exactly one text part.
pub fn build_parts(images: Vec<InlineImagePart>, prompt: String) -> Vec<RequestPart> {
    images
        .into_iter()
        .map(|image| RequestPart::Inline {
            inline_data: Blob {
                mime_type: image.mime_type,
                data: image.data,
            },
        })
        .chain(std::iter::once(RequestPart::text(prompt)))
        .collect()
}

pub fn image_request(parts: Vec<RequestPart>, aspect_ratio: &str, output_resolution: &str) -> GenerateContentRequest {
    GenerateContentRequest {
        contents: vec![Content::user(parts)],
        generation_config: Some(GenerationConfig::image(aspect_ratio, output_resolution)),
    }
}
