//! AnswerService (C15): composes admission (handled by the caller/router),
//! validation, retrieval, prompt assembly, LLM completion and best-effort
//! TTS into the `/chat` response contract.

use std::time::Instant;

use base64::engine::general_purpose::STANDARD as BASE64;
use base64::Engine;
use uuid::Uuid;

use crate::config::{Config, EmbeddingConfig, LlmConfig, VectorConfig};
use crate::embedding::EmbeddingClient;
use crate::error::{ServiceError, ServiceResult};
use crate::llm::{ChatCompletionRequest, LLMClient};
use crate::models::{ChatRequest, ChatResponse, ChatResponseMetadata, Match, Source};
use crate::tts::TTSClient;
use crate::vector::VectorIndexClient;

use super::audio_cache::AudioCache;
use super::prompt;
use super::retriever::Retriever;

const NO_INFORMATION_ANSWER: &str = "情報がありません";
const SOURCE_EXCERPT_CHARS: usize = 200;

pub struct AnswerService {
    embedding_client: EmbeddingClient,
    vector_client: VectorIndexClient,
    llm_client: LLMClient,
    tts_client: TTSClient,
    audio_cache: AudioCache,
    embedding_config: EmbeddingConfig,
    vector_config: VectorConfig,
    llm_config: LlmConfig,
}

impl AnswerService {
    pub fn new(config: &Config) -> Self {
        Self {
            embedding_client: EmbeddingClient::new(config.embedding.clone()),
            vector_client: VectorIndexClient::new(config.vector.clone()),
            llm_client: LLMClient::new(config.llm.clone()),
            tts_client: TTSClient::new(config.tts.clone()),
            audio_cache: AudioCache::new(),
            embedding_config: config.embedding.clone(),
            vector_config: config.vector.clone(),
            llm_config: config.llm.clone(),
        }
    }

    pub fn audio_cache(&self) -> &AudioCache {
        &self.audio_cache
    }

    /// Handle a validated admission pass already performed by the caller.
    /// Runs validation, retrieval, prompt assembly, LLM completion and
    /// best-effort TTS, in that fixed order.
    pub async fn answer(&self, request: &ChatRequest) -> ServiceResult<ChatResponse> {
        if !request.message_is_valid() {
            return Err(ServiceError::InvalidRequest(format!(
                "message must be 1-{} characters",
                ChatRequest::MAX_MESSAGE_LEN
            )));
        }

        let start = Instant::now();
        let conversation_id = request.conversation_id.clone().unwrap_or_else(|| Uuid::new_v4().to_string());

        let retriever = Retriever::new(
            &self.embedding_client,
            &self.vector_client,
            &self.embedding_config,
            &self.vector_config,
        );
        let matches = retriever.retrieve(&request.message).await?;

        if matches.is_empty() {
            return Ok(self.no_information_response(conversation_id, start).await);
        }

        let system = prompt::build_system_prompt(&matches);
        let history = prompt::filtered_history(request);

        let completion = self
            .llm_client
            .complete(ChatCompletionRequest {
                system: &system,
                conversation_history: &history,
                current_message: &request.message,
                model: &self.llm_config.model,
                temperature: self.llm_config.temperature,
                max_tokens: self.llm_config.max_tokens,
            })
            .await?;

        let (audio, audio_generated, audio_from_cache) = self.synthesize_best_effort(&completion).await;
        let sources = matches.iter().map(to_source).collect();

        Ok(ChatResponse {
            response: completion,
            audio,
            sources,
            conversation_id,
            metadata: ChatResponseMetadata {
                retrieved_chunks: matches.len(),
                processing_time: start.elapsed().as_millis() as u64,
                audio_generated,
                audio_from_cache,
            },
        })
    }

    async fn no_information_response(&self, conversation_id: String, start: Instant) -> ChatResponse {
        let (audio, audio_generated, audio_from_cache) = self.synthesize_best_effort(NO_INFORMATION_ANSWER).await;
        ChatResponse {
            response: NO_INFORMATION_ANSWER.to_string(),
            audio,
            sources: vec![],
            conversation_id,
            metadata: ChatResponseMetadata {
                retrieved_chunks: 0,
                processing_time: start.elapsed().as_millis() as u64,
                audio_generated,
                audio_from_cache,
            },
        }
    }

    /// TTS is never allowed to fail the request: missing configuration or a
    /// provider error both degrade to "answer without audio".
    async fn synthesize_best_effort(&self, text: &str) -> (Option<String>, bool, bool) {
        if !self.tts_client.is_configured() {
            return (None, false, false);
        }

        if let Some(cached) = self.audio_cache.get(text) {
            return (Some(BASE64.encode(cached)), true, true);
        }

        match self.tts_client.synthesize(text).await {
            Ok(bytes) => {
                self.audio_cache.put(text, bytes.clone());
                (Some(BASE64.encode(bytes)), true, false)
            }
            Err(err) => {
                tracing::warn!(error = %err, "tts synthesis failed; returning answer without audio");
                (None, false, false)
            }
        }
    }
}

fn to_source(m: &Match) -> Source {
    let content = m.metadata.get("content").and_then(|v| v.as_str()).unwrap_or("");
    let excerpt: String = content.chars().take(SOURCE_EXCERPT_CHARS).collect();
    let text = if content.chars().count() > SOURCE_EXCERPT_CHARS {
        format!("{}…", excerpt)
    } else {
        excerpt
    };

    Source {
        text,
        timestamp: m.metadata.get("timestamp").and_then(|v| v.as_str()).unwrap_or("").to_string(),
        topic: m.metadata.get("topic").and_then(|v| v.as_str()).unwrap_or("").to_string(),
        relevance_score: m.score,
    }
}
