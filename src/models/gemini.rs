//! Wire types for the Gemini `generateContent` REST endpoint.
//!
//! Requests are always written in camelCase. Responses are read leniently:
//! every level is optional and inline image blobs are accepted under both
//! `inlineData` and `inline_data`, then normalized into [`Part`].

use base64::{engine::general_purpose::STANDARD, Engine as _};
use serde::{de::DeserializeOwned, Deserialize, Deserializer, Serialize};
use serde_json::Value;

#[derive(Debug, Clone, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct GenerateContentRequest {
    pub contents: Vec<Content>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub generation_config: Option<GenerationConfig>,
}

#[derive(Debug, Clone, Serialize)]
pub struct Content {
    pub role: String,
    pub parts: Vec<RequestPart>,
}

impl Content {
    pub fn user(parts: Vec<RequestPart>) -> Self {
        Self {
            role: "user".to_string(),
            parts,
        }
    }
}

#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(untagged)]
pub enum RequestPart {
    Inline {
        #[serde(rename = "inlineData")]
        inline_data: Blob,
    },
    Text {
        text: String,
    },
}

impl RequestPart {
    pub fn text(text: impl Into<String>) -> Self {
        RequestPart::Text { text: text.into() }
    }

    pub fn is_inline(&self) -> bool {
        matches!(self, RequestPart::Inline { .. })
    }
}

#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct Blob {
    pub mime_type: String,
    pub data: String,
}

#[derive(Debug, Clone, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct GenerationConfig {
    pub response_modalities: Vec<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub image_config: Option<ImageConfig>,
}

impl GenerationConfig {
    pub fn image(aspect_ratio: &str, image_size: &str) -> Self {
        Self {
            response_modalities: vec!["IMAGE".to_string(), "TEXT".to_string()],
            image_config: Some(ImageConfig {
                aspect_ratio: aspect_ratio.to_string(),
                image_size: image_size.to_string(),
            }),
        }
    }

    pub fn text_only() -> Self {
        Self {
            response_modalities: vec!["TEXT".to_string()],
            image_config: None,
        }
    }
}

#[derive(Debug, Clone, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct ImageConfig {
    pub aspect_ratio: String,
    pub image_size: String,
}

#[derive(Debug, Clone, Default, Deserialize)]
pub struct GenerateContentResponse {
    #[serde(default, deserialize_with = "lenient")]
    pub candidates: Option<Vec<Candidate>>,
    #[serde(default, deserialize_with = "lenient", rename = "promptFeedback", alias = "prompt_feedback")]
    pub prompt_feedback: Option<PromptFeedback>,
}

#[derive(Debug, Clone, Default, Deserialize)]
pub struct Candidate {
    #[serde(default, deserialize_with = "lenient")]
    pub content: Option<CandidateContent>,
    #[serde(default, deserialize_with = "lenient", rename = "finishReason", alias = "finish_reason")]
    pub finish_reason: Option<String>,
    #[serde(default, deserialize_with = "lenient", rename = "safetyRatings", alias = "safety_ratings")]
    pub safety_ratings: Option<Vec<SafetyRating>>,
}

#[derive(Debug, Clone, Default, Deserialize)]
pub struct CandidateContent {
    #[serde(default, deserialize_with = "lenient")]
    pub parts: Option<Vec<Part>>,
    #[serde(default, deserialize_with = "lenient")]
    pub role: Option<String>,
}

#[derive(Debug, Clone, Default, Deserialize)]
pub struct PromptFeedback {
    #[serde(default, deserialize_with = "lenient", rename = "blockReason", alias = "block_reason")]
    pub block_reason: Option<String>,
    #[serde(default, deserialize_with = "lenient", rename = "safetyRatings", alias = "safety_ratings")]
    pub safety_ratings: Option<Vec<SafetyRating>>,
}

#[derive(Debug, Clone, Default, Deserialize)]
pub struct SafetyRating {
    #[serde(default, deserialize_with = "lenient")]
    pub category: Option<String>,
    #[serde(default, deserialize_with = "lenient")]
    pub probability: Option<String>,
    #[serde(default, deserialize_with = "lenient")]
    pub blocked: Option<bool>,
}

/// Blob payload as it appears on the wire: base64 text, or raw bytes from
/// clients that serialize the SDK's byte buffers as arrays.
#[derive(Debug, Clone, PartialEq, Deserialize)]
#[serde(untagged)]
pub enum BlobData {
    Text(String),
    Bytes(Vec<u8>),
}

#[derive(Debug, Clone, PartialEq)]
pub struct InlineBlob {
    pub mime_type: Option<String>,
    pub data: BlobData,
}

impl InlineBlob {
    /// Base64 text of the payload. Text passes through unchanged.
    pub fn to_base64(&self) -> String {
        match &self.data {
            BlobData::Text(text) => text.clone(),
            BlobData::Bytes(bytes) => STANDARD.encode(bytes),
        }
    }
}

/// An inline image found under one of the two field-naming conventions.
#[derive(Debug, Clone, PartialEq)]
pub enum InlinePayload {
    /// `inline_data` / `mime_type`
    Snake(InlineBlob),
    /// `inlineData` / `mimeType`
    Camel(InlineBlob),
}

impl InlinePayload {
    pub fn blob(&self) -> &InlineBlob {
        match self {
            InlinePayload::Snake(blob) | InlinePayload::Camel(blob) => blob,
        }
    }

    pub fn convention(&self) -> &'static str {
        match self {
            InlinePayload::Snake(_) => "inline_data",
            InlinePayload::Camel(_) => "inlineData",
        }
    }
}

/// A response part after naming-convention normalization.
#[derive(Debug, Clone, PartialEq, Deserialize)]
#[serde(from = "Value")]
pub enum Part {
    Image(InlinePayload),
    Text(String),
    Other,
}

/// Reads a field that may be absent, null, or of an unexpected type. Only
/// the well-formed case yields a value.
fn lenient<'de, D, T>(deserializer: D) -> std::result::Result<Option<T>, D::Error>
where
    D: Deserializer<'de>,
    T: DeserializeOwned,
{
    let value = Value::deserialize(deserializer)?;
    Ok(serde_json::from_value(value).ok())
}

#[derive(Debug, Default, Deserialize)]
struct RawBlob {
    #[serde(default, deserialize_with = "lenient", rename = "mimeType", alias = "mime_type")]
    mime_type: Option<String>,
    #[serde(default, deserialize_with = "lenient")]
    data: Option<BlobData>,
}

impl RawBlob {
    fn probe(part: &Value, key: &str) -> Option<InlineBlob> {
        let blob: RawBlob = serde_json::from_value(part.get(key)?.clone()).ok()?;
        blob.into_inline()
    }

    fn into_inline(self) -> Option<InlineBlob> {
        let data = self.data?;
        let empty = match &data {
            BlobData::Text(text) => text.is_empty(),
            BlobData::Bytes(bytes) => bytes.is_empty(),
        };
        if empty {
            return None;
        }
        Some(InlineBlob {
            mime_type: self.mime_type,
            data,
        })
    }
}

impl From<Value> for Part {
    fn from(part: Value) -> Self {
        if let Some(blob) = RawBlob::probe(&part, "inline_data") {
            return Part::Image(InlinePayload::Snake(blob));
        }
        if let Some(blob) = RawBlob::probe(&part, "inlineData") {
            return Part::Image(InlinePayload::Camel(blob));
        }
        match part.get("text").and_then(Value::as_str) {
            Some(text) => Part::Text(text.to_string()),
            None => Part::Other,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn test_request_serializes_camel_case() {
        let request = GenerateContentRequest {
            contents: vec![Content::user(vec![
                RequestPart::Inline {
                    inline_data: Blob {
                        mime_type: "image/png".into(),
                        data: "aGk=".into(),
                    },
                },
                RequestPart::text("make it blue"),
            ])],
            generation_config: Some(GenerationConfig::image("16:9", "2K")),
        };

        let value = serde_json::to_value(&request).unwrap();
        assert_eq!(
            value,
            json!({
                "contents": [{
                    "role": "user",
                    "parts": [
                        {"inlineData": {"mimeType": "image/png", "data": "aGk="}},
                        {"text": "make it blue"}
                    ]
                }],
                "generationConfig": {
                    "responseModalities": ["IMAGE", "TEXT"],
                    "imageConfig": {"aspectRatio": "16:9", "imageSize": "2K"}
                }
            })
        );
    }

    #[test]
    fn test_text_only_config_omits_image_config() {
        let value = serde_json::to_value(GenerationConfig::text_only()).unwrap();
        assert_eq!(value, json!({"responseModalities": ["TEXT"]}));
    }

    #[test]
    fn test_part_normalizes_both_conventions() {
        let snake: Part =
            serde_json::from_value(json!({"inline_data": {"mime_type": "image/png", "data": "QUJD"}}))
                .unwrap();
        let camel: Part =
            serde_json::from_value(json!({"inlineData": {"mimeType": "image/png", "data": "QUJD"}}))
                .unwrap();

        match (&snake, &camel) {
            (Part::Image(a), Part::Image(b)) => {
                assert_eq!(a.convention(), "inline_data");
                assert_eq!(b.convention(), "inlineData");
                assert_eq!(a.blob(), b.blob());
            }
            other => panic!("expected two image parts, got {:?}", other),
        }
    }

    #[test]
    fn test_byte_payload_is_base64_encoded() {
        let part: Part =
            serde_json::from_value(json!({"inlineData": {"data": [65, 66, 67]}})).unwrap();
        match part {
            Part::Image(payload) => {
                assert_eq!(payload.blob().to_base64(), "QUJD");
                assert!(payload.blob().mime_type.is_none());
            }
            other => panic!("expected image part, got {:?}", other),
        }
    }

    #[test]
    fn test_empty_or_missing_blob_is_not_an_image() {
        let empty: Part = serde_json::from_value(json!({"inlineData": {"data": ""}})).unwrap();
        assert_eq!(empty, Part::Other);

        let no_data: Part =
            serde_json::from_value(json!({"inline_data": {"mime_type": "image/png"}, "text": "hi"}))
                .unwrap();
        assert_eq!(no_data, Part::Text("hi".into()));

        let null: Part = serde_json::from_value(json!({"inlineData": null})).unwrap();
        assert_eq!(null, Part::Other);
    }

    #[test]
    fn test_response_tolerates_missing_levels() {
        let response: GenerateContentResponse = serde_json::from_value(json!({})).unwrap();
        assert!(response.candidates.is_none());

        let response: GenerateContentResponse =
            serde_json::from_value(json!({"candidates": [{"finishReason": "SAFETY"}]})).unwrap();
        let candidate = &response.candidates.unwrap()[0];
        assert!(candidate.content.is_none());
        assert_eq!(candidate.finish_reason.as_deref(), Some("SAFETY"));
    }

    #[test]
    fn test_wrong_types_read_as_absent() {
        let bad_data: Part =
            serde_json::from_value(json!({"inlineData": {"mimeType": "image/png", "data": 123}}))
                .unwrap();
        assert_eq!(bad_data, Part::Other);

        let camel_after_bad_snake: Part = serde_json::from_value(json!({
            "inline_data": "oops",
            "inlineData": {"mimeType": 7, "data": "QUJD"}
        }))
        .unwrap();
        match camel_after_bad_snake {
            Part::Image(payload) => {
                assert_eq!(payload.convention(), "inlineData");
                assert!(payload.blob().mime_type.is_none());
            }
            other => panic!("expected image part, got {:?}", other),
        }

        let response: GenerateContentResponse = serde_json::from_value(json!({
            "candidates": [{"content": {"parts": [null, {"text": 5}, {"text": "ok"}]}, "finishReason": 3}],
            "promptFeedback": "blocked"
        }))
        .unwrap();
        assert!(response.prompt_feedback.is_none());
        let candidate = &response.candidates.unwrap()[0];
        assert!(candidate.finish_reason.is_none());
        let parts = candidate.content.as_ref().unwrap().parts.as_ref().unwrap();
        assert_eq!(parts, &vec![Part::Other, Part::Other, Part::Text("ok".into())]);

        let response: GenerateContentResponse =
            serde_json::from_value(json!({"candidates": {"not": "a list"}})).unwrap();
        assert!(response.candidates.is_none());
    }
}
