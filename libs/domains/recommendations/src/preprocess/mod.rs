//! Optional LLM rewriting of long queries into short keyword lists.
//!
//! A shortener may fail or stall; the service bounds every call with a
//! timeout and falls back to the original query, so implementations only
//! report errors and never decide on fallback themselves.

mod gemini;
mod shortener;

pub use gemini::{GeminiConfig, GeminiShortener};
pub use shortener::{MAX_KEYWORDS, PassthroughShortener, QueryShortener, keyword_prompt, truncate_keywords};

#[cfg(test)]
pub use shortener::MockQueryShortener;
