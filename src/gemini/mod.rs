pub mod normalize;
pub mod traits;

use crate::{
    config::Config,
    error::{RelayError, Result},
    models::gemini::{GenerateContentRequest, GenerateContentResponse},
};
use async_trait::async_trait;
use reqwest::Client;
use serde_json::Value;

pub use normalize::{extract_image, normalize, response_text};
pub use traits::ImageModel;

const API_KEY_HEADER: &str = "x-goog-api-key";

/// REST client for the Gemini API. One instance is shared by all requests.
#[derive(Clone)]
pub struct GeminiClient {
    client: Client,
    api_key: String,
    base_url: String,
}

impl GeminiClient {
    pub fn new(config: &Config) -> Result<Self> {
        if config.api_key.is_empty() {
            return Err(RelayError::ConfigError("Gemini API key is required".into()));
        }

        let client = Client::builder()
            .timeout(config.request_timeout)
            .connect_timeout(config.connect_timeout)
            .build()
            .map_err(|e| RelayError::ConfigError(format!("Failed to build HTTP client: {}", e)))?;

        Ok(Self {
            client,
            api_key: config.api_key.clone(),
            base_url: config.base_url.trim_end_matches('/').to_string(),
        })
    }

    pub fn endpoint(&self, model: &str) -> String {
        format!("{}/v1beta/models/{}:generateContent", self.base_url, model)
    }
}

#[async_trait]
impl ImageModel for GeminiClient {
    async fn generate_content(
        &self,
        model: &str,
        request: &GenerateContentRequest,
    ) -> Result<GenerateContentResponse> {
        log::info!("Invoking model: {}", model);

        let response = self
            .client
            .post(self.endpoint(model))
            .header(API_KEY_HEADER, &self.api_key)
            .json(request)
            .send()
            .await
            .map_err(|e| RelayError::RequestError(format!("Gemini request failed: {}", e)))?;

        let status = response.status();
        let body = response
            .text()
            .await
            .map_err(|e| RelayError::ResponseError(format!("Failed to read Gemini response: {}", e)))?;

        if !status.is_success() {
            log::error!("Gemini returned {}: {}", status, body);
            return Err(RelayError::ProviderError {
                status: status.as_u16(),
                message: provider_error_message(&body),
            });
        }

        serde_json::from_str(&body)
            .map_err(|e| RelayError::ResponseError(format!("Malformed Gemini response: {}", e)))
    }
}

/// Pulls `error.message` out of a Gemini error body, else returns the body.
pub fn provider_error_message(body: &str) -> String {
    serde_json::from_str::<Value>(body)
        .ok()
        .and_then(|value| {
            value
                .pointer("/error/message")
                .and_then(Value::as_str)
                .map(str::to_string)
        })
        .unwrap_or_else(|| {
            let trimmed = body.trim();
            if trimmed.is_empty() {
                "empty response body".to_string()
            } else {
                trimmed.chars().take(500).collect()
            }
        })
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_endpoint_trims_trailing_slash() {
        let config = Config::new("key").with_base_url("http://localhost:9999/");
        let client = GeminiClient::new(&config).unwrap();
        assert_eq!(
            client.endpoint("gemini-3-pro-image-preview"),
            "http://localhost:9999/v1beta/models/gemini-3-pro-image-preview:generateContent"
        );
    }

    #[test]
    fn test_missing_key_is_rejected() {
        assert!(matches!(
            GeminiClient::new(&Config::default()),
            Err(RelayError::ConfigError(_))
        ));
    }

    #[test]
    fn test_provider_error_message() {
        let body = r#"{"error": {"code": 400, "message": "API key not valid.", "status": "INVALID_ARGUMENT"}}"#;
        assert_eq!(provider_error_message(body), "API key not valid.");
        assert_eq!(provider_error_message("Bad Gateway"), "Bad Gateway");
        assert_eq!(provider_error_message("  "), "empty response body");
    }

    #[tokio::test]
    async fn test_unreachable_provider_is_request_error() {
        let config = Config::new("key").with_base_url("http://127.0.0.1:1");
        let client = GeminiClient::new(&config).unwrap();
        let request = GenerateContentRequest {
            contents: vec![],
            generation_config: None,
        };
        let err = client.generate_content("m", &request).await.unwrap_err();
        assert!(matches!(err, RelayError::RequestError(_)));
    }

    fn empty_request() -> GenerateContentRequest {
        GenerateContentRequest {
            contents: vec![],
            generation_config: None,
        }
    }

    #[actix_web::test]
    async fn test_error_status_is_provider_error() {
        let upstream = crate::testing::Fixture::start(
            400,
            "application/json",
            r#"{"error": {"code": 400, "message": "API key not valid.", "status": "INVALID_ARGUMENT"}}"#,
        );
        let client = GeminiClient::new(&Config::new("key").with_base_url(upstream.base_url.clone()))
            .unwrap();
        let err = client.generate_content("m", &empty_request()).await.unwrap_err();
        upstream.stop().await;

        match err {
            RelayError::ProviderError { status, message } => {
                assert_eq!(status, 400);
                assert_eq!(message, "API key not valid.");
            }
            other => panic!("expected provider error, got {:?}", other),
        }
    }

    #[actix_web::test]
    async fn test_success_body_is_parsed() {
        let upstream = crate::testing::Fixture::start(
            200,
            "application/json",
            r#"{"candidates": [{"content": {"parts": [{"inlineData": {"mimeType": "image/png", "data": "QUJD"}}]}}]}"#,
        );
        let client = GeminiClient::new(&Config::new("key").with_base_url(upstream.base_url.clone()))
            .unwrap();
        let response = client.generate_content("m", &empty_request()).await.unwrap();
        upstream.stop().await;

        assert_eq!(extract_image(&response).as_deref(), Some("QUJD"));
    }
}
