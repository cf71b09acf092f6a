use crate::models::{
    gemini::{Candidate, GenerateContentResponse, InlinePayload, Part},
    image::NormalizedResult,
};

pub const NO_IMAGE_FOUND: &str = "No image found in response";

fn first_candidate(response: &GenerateContentResponse) -> Option<&Candidate> {
    response.candidates.as_ref()?.first()
}

fn first_parts(response: &GenerateContentResponse) -> Option<&[Part]> {
    first_candidate(response)?
        .content
        .as_ref()?
        .parts
        .as_deref()
}

/// First inline image in `candidates[0].content.parts`, whichever naming
/// convention carried it.
pub fn find_inline_image(response: &GenerateContentResponse) -> Option<&InlinePayload> {
    first_parts(response)?.iter().find_map(|part| match part {
        Part::Image(payload) => Some(payload),
        _ => None,
    })
}

/// Base64 image data, or `None` when the response carries no image.
pub fn extract_image(response: &GenerateContentResponse) -> Option<String> {
    find_inline_image(response).map(|payload| payload.blob().to_base64())
}

/// Text parts of the first candidate joined together, if there are any.
pub fn response_text(response: &GenerateContentResponse) -> Option<String> {
    let text: Vec<&str> = first_parts(response)?
        .iter()
        .filter_map(|part| match part {
            Part::Text(text) if !text.trim().is_empty() => Some(text.as_str()),
            _ => None,
        })
        .collect();

    if text.is_empty() {
        None
    } else {
        Some(text.join("\n"))
    }
}

/// Why the provider declined to answer, if it said so.
pub fn block_reason(response: &GenerateContentResponse) -> Option<String> {
    if let Some(reason) = response
        .prompt_feedback
        .as_ref()
        .and_then(|feedback| feedback.block_reason.as_deref())
    {
        return Some(format!("Prompt blocked: {}", reason));
    }
    match first_candidate(response)?.finish_reason.as_deref() {
        Some(reason) if reason != "STOP" && reason != "FINISH_REASON_UNSPECIFIED" => {
            Some(format!("Generation stopped: {}", reason))
        }
        _ => None,
    }
}

/// Logs prompt feedback, finish reason and safety ratings.
pub fn log_diagnostics(request_id: &str, response: &GenerateContentResponse) {
    if let Some(feedback) = &response.prompt_feedback {
        if let Some(reason) = &feedback.block_reason {
            log::warn!("[{}] 🚫 Block reason: {}", request_id, reason);
        }
        if let Some(ratings) = &feedback.safety_ratings {
            log::debug!("[{}] 🛡️ Prompt safety ratings: {:?}", request_id, ratings);
        }
    }

    match first_candidate(response) {
        Some(candidate) => {
            if let Some(reason) = &candidate.finish_reason {
                log::debug!("[{}] 🏁 Finish reason: {}", request_id, reason);
            }
            if let Some(ratings) = &candidate.safety_ratings {
                log::debug!("[{}] 🛡️ Candidate safety ratings: {:?}", request_id, ratings);
            }
            let part_count = candidate
                .content
                .as_ref()
                .and_then(|content| content.parts.as_ref())
                .map_or(0, Vec::len);
            log::debug!("[{}] Parts found: {}", request_id, part_count);
        }
        None => log::warn!("[{}] ❌ No candidates in response", request_id),
    }
}

/// Image if present, otherwise the provider's text, otherwise an explanation.
pub fn normalize(response: &GenerateContentResponse) -> NormalizedResult {
    if let Some(payload) = find_inline_image(response) {
        return NormalizedResult::Image {
            data: payload.blob().to_base64(),
            mime_type: payload.blob().mime_type.clone(),
        };
    }
    if let Some(text) = response_text(response) {
        return NormalizedResult::Text(text);
    }
    NormalizedResult::Error(block_reason(response).unwrap_or_else(|| NO_IMAGE_FOUND.to_string()))
}
