use crate::{
    error::Result,
    models::gemini::{GenerateContentRequest, GenerateContentResponse},
};
use async_trait::async_trait;

/// A model endpoint that accepts `generateContent` requests.
#[async_trait]
pub trait ImageModel: Send + Sync {
    async fn generate_content(
        &self,
        model: &str,
        request: &GenerateContentRequest,
    ) -> Result<GenerateContentResponse>;
}
