use serde::Serialize;

#[derive(Debug, Clone, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct Source {
    pub text: String,
    pub timestamp: String,
    pub topic: String,
    pub relevance_score: f32,
}

#[derive(Debug, Clone, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct ChatResponseMetadata {
    pub retrieved_chunks: usize,
    pub processing_time: u64,
    pub audio_generated: bool,
    pub audio_from_cache: bool,
}

#[derive(Debug, Clone, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct ChatResponse {
    pub response: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub audio: Option<String>,
    pub sources: Vec<Source>,
    pub conversation_id: String,
    pub metadata: ChatResponseMetadata,
}

#[derive(Debug, Clone, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct HealthEnvironment {
    pub production: bool,
    pub embedding_provider: String,
    pub vector_provider: String,
    pub llm_provider: String,
    pub tts_configured: bool,
}

#[derive(Debug, Clone, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct HealthResponse {
    pub status: String,
    pub timestamp: String,
    pub environment: HealthEnvironment,
    pub vector_db: String,
}
