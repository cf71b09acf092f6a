pub mod assembler;
pub mod enhance;

pub use assembler::{build_parts, compose_prompt, edit_prompt, generation_prompt, image_request, resolve_sources};
pub use enhance::{enhance_prompt, PromptComplexity};
