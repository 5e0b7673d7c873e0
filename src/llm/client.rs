//! Provider-agnostic chat completion client (C11). Parameter shaping is a
//! closed variant keyed on the provider/model-family classifier in
//! `providers`, not an open dictionary of per-model special cases.

use std::time::Duration;

use serde_json::json;

use crate::config::LlmConfig;
use crate::error::{ServiceError, ServiceResult};
use crate::models::{HistoryTurn, Role};

use super::providers::{is_reasoning_model, reasoning_completion_budget, LlmProvider};

const CALL_TIMEOUT: Duration = Duration::from_secs(30);

#[derive(Debug, Clone)]
pub struct ChatCompletionRequest<'a> {
    pub system: &'a str,
    pub conversation_history: &'a [HistoryTurn],
    pub current_message: &'a str,
    pub model: &'a str,
    pub temperature: f32,
    pub max_tokens: u32,
}

pub struct LLMClient {
    http: reqwest::Client,
    config: LlmConfig,
}

fn role_str(role: Role) -> &'static str {
    match role {
        Role::User => "user",
        Role::Assistant => "assistant",
    }
}

impl LLMClient {
    pub fn new(config: LlmConfig) -> Self {
        Self { http: reqwest::Client::new(), config }
    }

    fn provider(&self) -> ServiceResult<LlmProvider> {
        LlmProvider::parse(&self.config.provider)
            .ok_or_else(|| ServiceError::ProviderNotConfigured(format!("unknown LLM provider: {}", self.config.provider)))
    }

    fn build_messages(req: &ChatCompletionRequest<'_>) -> Vec<serde_json::Value> {
        let mut messages = vec![json!({ "role": "system", "content": req.system })];
        for turn in req.conversation_history {
            messages.push(json!({ "role": role_str(turn.role), "content": turn.content }));
        }
        messages.push(json!({ "role": "user", "content": req.current_message }));
        messages
    }

    /// Invoke the configured provider's chat completion endpoint. Empty
    /// content in the response is treated as a provider error surfaced
    /// with the finish reason, not a silent empty answer.
    pub async fn complete(&self, req: ChatCompletionRequest<'_>) -> ServiceResult<String> {
        match self.provider()? {
            LlmProvider::OpenAI => self.complete_openai(req).await,
            LlmProvider::OpenRouter => self.complete_openrouter(req).await,
        }
    }

    async fn complete_openai(&self, req: ChatCompletionRequest<'_>) -> ServiceResult<String> {
        let api_key = self
            .config
            .openai_api_key
            .as_deref()
            .ok_or_else(|| ServiceError::ProviderNotConfigured("openai API key missing".into()))?;

        let messages = Self::build_messages(&req);
        let mut body = json!({ "model": req.model, "messages": messages });

        if is_reasoning_model(req.model) {
            body["max_completion_tokens"] = json!(reasoning_completion_budget(req.max_tokens));
            body["reasoning_effort"] = json!("minimal");
        } else {
            body["max_tokens"] = json!(req.max_tokens);
            body["temperature"] = json!(req.temperature);
        }

        let resp = self
            .http
            .post("https://api.openai.com/v1/chat/completions")
            .bearer_auth(api_key)
            .json(&body)
            .timeout(CALL_TIMEOUT)
            .send()
            .await?;

        if !resp.status().is_success() {
            return Err(ServiceError::ProviderError(format!("openai chat completion returned {}", resp.status())));
        }

        let parsed: serde_json::Value = resp.json().await?;
        extract_content(&parsed)
    }

    async fn complete_openrouter(&self, req: ChatCompletionRequest<'_>) -> ServiceResult<String> {
        let api_key = self
            .config
            .openrouter_api_key
            .as_deref()
            .ok_or_else(|| ServiceError::ProviderNotConfigured("openrouter API key missing".into()))?;

        let messages = Self::build_messages(&req);
        let body = json!({
            "model": req.model,
            "messages": messages,
            "temperature": req.temperature,
            "max_tokens": req.max_tokens,
        });

        let resp = self
            .http
            .post("https://openrouter.ai/api/v1/chat/completions")
            .bearer_auth(api_key)
            .header("HTTP-Referer", "https://kotoba-rag.local")
            .header("X-Title", "Kotoba RAG")
            .json(&body)
            .timeout(CALL_TIMEOUT)
            .send()
            .await?;

        if !resp.status().is_success() {
            return Err(ServiceError::ProviderError(format!("openrouter chat completion returned {}", resp.status())));
        }

        let parsed: serde_json::Value = resp.json().await?;
        extract_content(&parsed)
    }
}

fn extract_content(parsed: &serde_json::Value) -> ServiceResult<String> {
    let choice = &parsed["choices"][0];
    let content = choice["message"]["content"].as_str().unwrap_or("").trim();

    if content.is_empty() {
        let finish_reason = choice["finish_reason"].as_str().unwrap_or("unknown");
        return Err(ServiceError::ProviderError(format!("empty completion, finish_reason={}", finish_reason)));
    }

    Ok(content.to_string())
}
