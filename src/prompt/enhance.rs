//! Optional prompt rewriting through a text-only model.
//!
//! Long prompts are compressed and short ones embellished before image
//! generation. Any failure leaves the user's prompt untouched.

use crate::{
    gemini::{normalize::response_text, ImageModel},
    models::gemini::{Content, GenerateContentRequest, GenerationConfig, RequestPart},
};

pub const MAX_SIMPLE_WORDS: usize = 50;
pub const MAX_SIMPLE_CHARS: usize = 300;

const COMPRESS_TEMPLATE: &str = "You are a prompt editor for an image generation model. \
Rewrite the following prompt so it is concise and unambiguous. Keep every subject, \
object, color, count and style detail; drop filler words and repetition. \
Reply with the rewritten prompt only.";

const EMBELLISH_TEMPLATE: &str = "You are a prompt editor for an image generation model. \
Expand the following short prompt with concrete visual detail: lighting, setting, \
materials, camera angle and mood. Do not change or contradict what the user asked for. \
Reply with the rewritten prompt only.";

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum PromptComplexity {
    Simple,
    Complex,
}

impl PromptComplexity {
    pub fn classify(prompt: &str) -> Self {
        let words = prompt.split_whitespace().count();
        let chars = prompt.chars().count();
        if words > MAX_SIMPLE_WORDS || chars > MAX_SIMPLE_CHARS {
            PromptComplexity::Complex
        } else {
            PromptComplexity::Simple
        }
    }

    /// Complex prompts get compressed, simple ones embellished.
    pub fn instruction(&self) -> &'static str {
        match self {
            PromptComplexity::Simple => EMBELLISH_TEMPLATE,
            PromptComplexity::Complex => COMPRESS_TEMPLATE,
        }
    }

    pub fn as_str(&self) -> &'static str {
        match self {
            PromptComplexity::Simple => "simple",
            PromptComplexity::Complex => "complex",
        }
    }
}

pub fn enhancement_request(prompt: &str, complexity: PromptComplexity) -> GenerateContentRequest {
    let text = format!("{}\n\nPrompt:\n{}", complexity.instruction(), prompt);
    GenerateContentRequest {
        contents: vec![Content::user(vec![RequestPart::text(text)])],
        generation_config: Some(GenerationConfig::text_only()),
    }
}

/// Rewritten prompt, or the original one if the text model fails or
/// returns nothing usable.
pub async fn enhance_prompt(model: &dyn ImageModel, text_model: &str, prompt: &str) -> String {
    let complexity = PromptComplexity::classify(prompt);
    log::info!(
        "Enhancing {} prompt with {}",
        complexity.as_str(),
        text_model
    );

    let request = enhancement_request(prompt, complexity);
    match model.generate_content(text_model, &request).await {
        Ok(response) => match response_text(&response) {
            Some(text) if !text.trim().is_empty() => {
                log::debug!("Enhanced prompt: {}", text.trim());
                text.trim().to_string()
            }
            _ => {
                log::warn!("Prompt enhancement returned no text, using original prompt");
                prompt.to_string()
            }
        },
        Err(e) => {
            log::warn!("Prompt enhancement failed, using original prompt: {}", e);
            prompt.to_string()
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::error::{RelayError, Result};
    use crate::models::gemini::GenerateContentResponse;
    use async_trait::async_trait;
    use serde_json::json;
    use std::sync::Mutex;

    struct ScriptedModel {
        reply: Option<serde_json::Value>,
        seen: Mutex<Vec<(String, String)>>,
    }

    impl ScriptedModel {
        fn new(reply: Option<serde_json::Value>) -> Self {
            Self {
                reply,
                seen: Mutex::new(Vec::new()),
            }
        }
    }

    #[async_trait]
    impl ImageModel for ScriptedModel {
        async fn generate_content(
            &self,
            model: &str,
            request: &GenerateContentRequest,
        ) -> Result<GenerateContentResponse> {
            let text = match &request.contents[0].parts[0] {
                RequestPart::Text { text } => text.clone(),
                other => panic!("unexpected part {:?}", other),
            };
            self.seen.lock().unwrap().push((model.to_string(), text));
            match &self.reply {
                Some(value) => Ok(serde_json::from_value(value.clone()).unwrap()),
                None => Err(RelayError::ProviderError {
                    status: 500,
                    message: "boom".into(),
                }),
            }
        }
    }

    fn words(n: usize) -> String {
        vec!["cat"; n].join(" ")
    }

    #[test]
    fn test_classify_by_word_count() {
        assert_eq!(PromptComplexity::classify(&words(10)), PromptComplexity::Simple);
        assert_eq!(PromptComplexity::classify(&words(50)), PromptComplexity::Simple);
        assert_eq!(PromptComplexity::classify(&words(51)), PromptComplexity::Complex);
        assert_eq!(PromptComplexity::classify(&words(60)), PromptComplexity::Complex);
    }

    #[test]
    fn test_classify_by_char_count() {
        let long_word = "a".repeat(301);
        assert_eq!(PromptComplexity::classify(&long_word), PromptComplexity::Complex);
        assert_eq!(PromptComplexity::classify(&"a".repeat(300)), PromptComplexity::Simple);
    }

    #[test]
    fn test_template_selection() {
        let simple = enhancement_request(&words(10), PromptComplexity::classify(&words(10)));
        let complex = enhancement_request(&words(60), PromptComplexity::classify(&words(60)));
        match (&simple.contents[0].parts[0], &complex.contents[0].parts[0]) {
            (RequestPart::Text { text: a }, RequestPart::Text { text: b }) => {
                assert!(a.starts_with(EMBELLISH_TEMPLATE));
                assert!(b.starts_with(COMPRESS_TEMPLATE));
                assert!(a.ends_with(&words(10)));
            }
            other => panic!("unexpected parts {:?}", other),
        }
        assert!(simple.generation_config.unwrap().image_config.is_none());
    }

    #[tokio::test]
    async fn test_enhanced_prompt_is_used() {
        let model = ScriptedModel::new(Some(json!({
            "candidates": [{"content": {"parts": [{"text": "  a ginger cat on a sunlit windowsill  "}]}}]
        })));
        let result = enhance_prompt(&model, "gemini-2.5-flash", "a cat").await;
        assert_eq!(result, "a ginger cat on a sunlit windowsill");

        let seen = model.seen.lock().unwrap();
        assert_eq!(seen[0].0, "gemini-2.5-flash");
        assert!(seen[0].1.starts_with(EMBELLISH_TEMPLATE));
    }

    #[tokio::test]
    async fn test_falls_back_on_failure_or_empty_reply() {
        let failing = ScriptedModel::new(None);
        assert_eq!(enhance_prompt(&failing, "m", "a cat").await, "a cat");

        let empty = ScriptedModel::new(Some(json!({"candidates": []})));
        assert_eq!(enhance_prompt(&empty, "m", "a cat").await, "a cat");
    }
}
