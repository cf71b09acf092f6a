use crate::error::RelayError;
use crate::models::aspect::DEFAULT_ASPECT_RATIO;
use serde::{Deserialize, Serialize};

pub const DEFAULT_OUTPUT_RESOLUTION: &str = "1K";
pub const DEFAULT_OUTPUT_FORMAT: &str = "png";

fn default_aspect_ratio() -> String {
    DEFAULT_ASPECT_RATIO.to_string()
}

fn default_output_resolution() -> String {
    DEFAULT_OUTPUT_RESOLUTION.to_string()
}

fn default_output_format() -> String {
    DEFAULT_OUTPUT_FORMAT.to_string()
}

/// JSON body of `POST /api/generate_image`.
#[derive(Debug, Clone, Deserialize)]
pub struct GenerationRequest {
    pub prompt: String,
    #[serde(default = "default_aspect_ratio")]
    pub aspect_ratio: String,
    #[serde(default = "default_output_resolution")]
    pub output_resolution: String,
    #[serde(default = "default_output_format")]
    pub output_format: String,
    #[serde(default)]
    pub enhance_prompt: bool,
}

impl GenerationRequest {
    pub fn new(prompt: impl Into<String>) -> Self {
        Self {
            prompt: prompt.into(),
            aspect_ratio: default_aspect_ratio(),
            output_resolution: default_output_resolution(),
            output_format: default_output_format(),
            enhance_prompt: false,
        }
    }
}

/// One image attached to a provider request.
#[derive(Debug, Clone, PartialEq)]
pub struct InlineImagePart {
    pub mime_type: String,
    pub data: String,
}

/// Where an input image comes from.
#[derive(Debug, Clone)]
pub enum ImageSource {
    Upload {
        bytes: Vec<u8>,
        mime_type: Option<String>,
        filename: String,
    },
    Url(String),
}

/// Outcome of reading a provider response.
#[derive(Debug, Clone, PartialEq)]
pub enum NormalizedResult {
    Image {
        data: String,
        mime_type: Option<String>,
    },
    Text(String),
    Error(String),
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Operation {
    Generate,
    Edit,
    Compose,
}

impl Operation {
    pub fn success_message(&self) -> &'static str {
        match self {
            Operation::Generate => "Image generated successfully",
            Operation::Edit => "Image edited successfully",
            Operation::Compose => "Images composed successfully",
        }
    }

    pub fn empty_message(&self) -> &'static str {
        match self {
            Operation::Generate => "Image generation completed, but no image data found",
            Operation::Edit => "Image editing completed, but no image data found",
            Operation::Compose => "Image composition completed, but no image data found",
        }
    }

    fn echoes_aspect_ratio(&self, has_image: bool) -> bool {
        match self {
            Operation::Generate => true,
            Operation::Edit => has_image,
            Operation::Compose => false,
        }
    }

    /// Shapes the 200 body for a finished provider call.
    pub fn reply(&self, result: NormalizedResult, prompt: &str, aspect_ratio: &str) -> ImageReply {
        let (message, image, response) = match result {
            NormalizedResult::Image { data, .. } => (self.success_message(), Some(data), None),
            NormalizedResult::Text(text) | NormalizedResult::Error(text) => {
                (self.empty_message(), None, Some(text))
            }
        };
        let aspect_ratio = self
            .echoes_aspect_ratio(image.is_some())
            .then(|| aspect_ratio.to_string());

        ImageReply {
            message: message.to_string(),
            prompt: prompt.to_string(),
            aspect_ratio,
            image,
            response,
        }
    }
}

#[derive(Debug, Clone, Serialize)]
pub struct ImageReply {
    pub message: String,
    pub prompt: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub aspect_ratio: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub image: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub response: Option<String>,
}

/// Error body of `/api/generate_image`.
#[derive(Debug, Clone, Serialize)]
pub struct GenerateFailure {
    pub error: String,
    pub error_type: String,
    pub request_prompt: String,
    pub request_aspect_ratio: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub additional_info: Option<String>,
}

impl GenerateFailure {
    pub fn new(error: &RelayError, request: &GenerationRequest) -> Self {
        let message = error.to_string();
        let additional_info = message.to_lowercase().contains("text").then(|| {
            "This error suggests an issue with text processing in the response".to_string()
        });
        Self {
            error: message,
            error_type: error.kind().to_string(),
            request_prompt: request.prompt.clone(),
            request_aspect_ratio: request.aspect_ratio.clone(),
            additional_info,
        }
    }
}

/// Error body of `/api/edit_image`.
#[derive(Debug, Clone, Serialize)]
pub struct EditFailure {
    pub error: String,
    pub error_type: String,
    pub prompt: Option<String>,
    pub aspect_ratio: Option<String>,
    pub has_image_file: bool,
    pub has_image_urls: bool,
}

/// Minimal `{error}` body, optionally with the error type.
#[derive(Debug, Clone, Serialize)]
pub struct ErrorReply {
    pub error: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub error_type: Option<String>,
}

impl ErrorReply {
    pub fn message(error: impl Into<String>) -> Self {
        Self {
            error: error.into(),
            error_type: None,
        }
    }
}

impl From<&RelayError> for ErrorReply {
    fn from(error: &RelayError) -> Self {
        Self {
            error: error.to_string(),
            error_type: Some(error.kind().to_string()),
        }
    }
}
