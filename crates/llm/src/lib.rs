//! StudyCards LLM Integration
//!
//! Chat completions client, prompt construction and response normalization

mod client;
mod generator;
mod llm_trait;
pub mod normalize;
mod prompts;
mod types;

pub use client::ChatCompletionsClient;
pub use generator::StudyGenerator;
pub use llm_trait::GenerationBackend;
pub use normalize::{normalize, parse_payload, ParseStrategy};
pub use prompts::{generation_prompt, BASE_PROMPT, RESPONSE_FORMAT};
pub use types::{
    ChatChoice, ChatCompletionRequest, ChatCompletionResponse, ChatMessage, ChatResponseMessage,
    GenerateOptions,
};

/// Deterministic backends and payloads for tests, here and in dependent crates
#[cfg(any(test, feature = "test-support"))]
pub mod test_support;
