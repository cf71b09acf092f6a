use crate::{
    error::{RelayError, Result},
    models::{
        aspect::DEFAULT_ASPECT_RATIO,
        image::{ImageSource, DEFAULT_OUTPUT_FORMAT, DEFAULT_OUTPUT_RESOLUTION},
    },
    prompt::assembler::parse_image_urls,
};
use actix_multipart::{Field, Multipart};
use futures::StreamExt;

#[derive(Debug, Clone)]
pub struct UploadedImage {
    pub filename: String,
    pub content_type: Option<String>,
    pub bytes: Vec<u8>,
}

/// Fields shared by the edit and compose forms.
#[derive(Debug, Clone)]
pub struct ImageForm {
    pub prompt: Option<String>,
    pub aspect_ratio: String,
    pub output_resolution: String,
    pub output_format: String,
    pub image_urls: String,
    pub uploads: Vec<UploadedImage>,
}

impl Default for ImageForm {
    fn default() -> Self {
        Self {
            prompt: None,
            aspect_ratio: DEFAULT_ASPECT_RATIO.to_string(),
            output_resolution: DEFAULT_OUTPUT_RESOLUTION.to_string(),
            output_format: DEFAULT_OUTPUT_FORMAT.to_string(),
            image_urls: String::new(),
            uploads: Vec::new(),
        }
    }
}

impl ImageForm {
    pub fn require_prompt(&self) -> Result<&str> {
        self.prompt
            .as_deref()
            .ok_or_else(|| RelayError::RequestError("Missing required form field: prompt".into()))
    }

    /// True when `image_urls` names at least one non-blank URL.
    pub fn has_image_urls(&self) -> bool {
        !parse_image_urls(&self.image_urls).is_empty()
    }

    pub fn has_uploads(&self) -> bool {
        !self.uploads.is_empty()
    }

    /// URL sources first, then uploads, in form order.
    pub fn image_sources(&self) -> Vec<ImageSource> {
        parse_image_urls(&self.image_urls)
            .into_iter()
            .map(ImageSource::Url)
            .chain(self.uploads.iter().map(|upload| ImageSource::Upload {
                bytes: upload.bytes.clone(),
                mime_type: upload.content_type.clone(),
                filename: upload.filename.clone(),
            }))
            .collect()
    }
}

async fn read_bytes(field: &mut Field) -> Result<Vec<u8>> {
    let mut bytes = Vec::new();
    while let Some(chunk) = field.next().await {
        bytes.extend_from_slice(&chunk?);
    }
    Ok(bytes)
}

async fn read_text(field: &mut Field) -> Result<String> {
    let bytes = read_bytes(field).await?;
    String::from_utf8(bytes)
        .map_err(|e| RelayError::MultipartError(format!("form field is not UTF-8: {}", e)))
}

/// Reads a multipart body. Unknown fields are drained and ignored; file
/// fields without a filename count as "no file".
pub async fn read_image_form(mut payload: Multipart) -> Result<ImageForm> {
    let mut form = ImageForm::default();

    while let Some(item) = payload.next().await {
        let mut field = item?;
        let name = field.name().unwrap_or_default().to_string();

        match name.as_str() {
            "prompt" => form.prompt = Some(read_text(&mut field).await?),
            "aspect_ratio" => form.aspect_ratio = read_text(&mut field).await?,
            "output_resolution" => form.output_resolution = read_text(&mut field).await?,
            "output_format" => form.output_format = read_text(&mut field).await?,
            "image_urls" => form.image_urls = read_text(&mut field).await?,
            "image_file" | "image_files" => {
                let filename = field
                    .content_disposition()
                    .and_then(|cd| cd.get_filename())
                    .unwrap_or_default()
                    .to_string();
                let content_type = field.content_type().map(|mime| mime.to_string());
                let bytes = read_bytes(&mut field).await?;
                if filename.is_empty() {
                    log::debug!("Skipping {} field without a filename", name);
                    continue;
                }
                form.uploads.push(UploadedImage {
                    filename,
                    content_type,
                    bytes,
                });
            }
            _ => {
                read_bytes(&mut field).await?;
            }
        }
    }

    Ok(form)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_image_sources_order() {
        let form = ImageForm {
            image_urls: "https://a.test/1.jpg,https://b.test/2.jpg".into(),
            uploads: vec![UploadedImage {
                filename: "c.png".into(),
                content_type: Some("image/png".into()),
                bytes: vec![1, 2, 3],
            }],
            ..ImageForm::default()
        };
        let sources = form.image_sources();
        assert_eq!(sources.len(), 3);
        assert!(matches!(&sources[0], ImageSource::Url(url) if url == "https://a.test/1.jpg"));
        assert!(matches!(&sources[1], ImageSource::Url(url) if url == "https://b.test/2.jpg"));
        assert!(matches!(&sources[2], ImageSource::Upload { filename, .. } if filename == "c.png"));
    }

    #[test]
    fn test_defaults_and_prompt_requirement() {
        let form = ImageForm::default();
        assert_eq!(form.aspect_ratio, "1:1");
        assert_eq!(form.output_resolution, "1K");
        assert!(!form.has_image_urls());
        assert!(!form.has_uploads());
        assert!(matches!(form.require_prompt(), Err(RelayError::RequestError(_))));
    }

    #[test]
    fn test_blank_url_list_is_no_source() {
        let form = ImageForm {
            image_urls: " , ,".into(),
            ..ImageForm::default()
        };
        assert!(!form.has_image_urls());
        assert!(form.image_sources().is_empty());
    }
}
