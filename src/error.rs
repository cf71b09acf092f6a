use thiserror::Error;

#[derive(Debug, Error)]
pub enum RelayError {
    #[error("Configuration error: {0}")]
    ConfigError(String),
    #[error("Request error: {0}")]
    RequestError(String),
    #[error("Failed to fetch image from URL: {0}")]
    FetchError(String),
    #[error("Provider error ({status}): {message}")]
    ProviderError { status: u16, message: String },
    #[error("Response error: {0}")]
    ResponseError(String),
    #[error("Serialization error: {0}")]
    SerializationError(String),
    #[error("Decode error: {0}")]
    DecodeError(String),
    #[error("Multipart error: {0}")]
    MultipartError(String),
}

impl RelayError {
    /// Stable name reported as `error_type` in JSON error bodies.
    pub fn kind(&self) -> &'static str {
        match self {
            RelayError::ConfigError(_) => "ConfigError",
            RelayError::RequestError(_) => "RequestError",
            RelayError::FetchError(_) => "FetchError",
            RelayError::ProviderError { .. } => "ProviderError",
            RelayError::ResponseError(_) => "ResponseError",
            RelayError::SerializationError(_) => "SerializationError",
            RelayError::DecodeError(_) => "DecodeError",
            RelayError::MultipartError(_) => "MultipartError",
        }
    }
}

impl From<serde_json::Error> for RelayError {
    fn from(e: serde_json::Error) -> Self {
        RelayError::SerializationError(e.to_string())
    }
}

impl From<base64::DecodeError> for RelayError {
    fn from(e: base64::DecodeError) -> Self {
        RelayError::DecodeError(e.to_string())
    }
}

impl From<actix_multipart::MultipartError> for RelayError {
    fn from(e: actix_multipart::MultipartError) -> Self {
        RelayError::MultipartError(e.to_string())
    }
}

pub type Result<T> = std::result::Result<T, RelayError>;
