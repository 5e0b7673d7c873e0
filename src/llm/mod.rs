pub mod client;
pub mod providers;

pub use client::{ChatCompletionRequest, LLMClient};
pub use providers::{is_reasoning_model, reasoning_completion_budget, LlmProvider};
