//! AI tutor for the course notes.

mod gemini;
mod prompt;
mod service;

pub use gemini::{
    DEFAULT_BASE_URL, DEFAULT_MODEL, GeminiClient, classify_generate_response, parse_model_list,
};
pub use prompt::{OFF_TOPIC_REPLY, SYSTEM_PROMPT, build_prompt};
pub use service::{
    RetryNotice, RetryPolicy, TutorBackend, TutorConfig, TutorEndpoint, TutorService,
};
