use std::env;

/// Centralised, typed application configuration, built once at startup from
/// environment variables (via `dotenvy` + `std::env::var`), matching the
/// recognised set in the external interfaces contract.
#[derive(Debug, Clone)]
pub struct Config {
    pub embedding: EmbeddingConfig,
    pub vector: VectorConfig,
    pub llm: LlmConfig,
    pub tts: TtsConfig,
    pub admission: AdmissionConfig,
    pub pipeline: PipelineConfig,
    pub production: bool,
}

#[derive(Debug, Clone)]
pub struct EmbeddingConfig {
    pub provider: String,
    pub model: String,
    pub huggingface_api_key: Option<String>,
    pub openai_api_key: Option<String>,
}

#[derive(Debug, Clone)]
pub struct VectorConfig {
    pub provider: String,
    pub index_name: String,
    pub namespace: String,
    pub pinecone_api_key: Option<String>,
    pub upstash_url: Option<String>,
    pub upstash_token: Option<String>,
}

#[derive(Debug, Clone)]
pub struct LlmConfig {
    pub provider: String,
    pub model: String,
    pub temperature: f32,
    pub max_tokens: u32,
    pub openai_api_key: Option<String>,
    pub openrouter_api_key: Option<String>,
}

#[derive(Debug, Clone)]
pub struct TtsConfig {
    pub api_key: Option<String>,
    pub voice_id: String,
    pub model_id: String,
}

#[derive(Debug, Clone)]
pub struct AdmissionConfig {
    pub api_keys: Vec<String>,
    pub allowed_origins: Vec<String>,
    pub chat_rate_limit_window_secs: u64,
    pub chat_rate_limit_max: u32,
    pub health_rate_limit_window_secs: u64,
    pub health_rate_limit_max: u32,
}

#[derive(Debug, Clone)]
pub struct PipelineConfig {
    pub min_chunk_size: usize,
    pub max_chunk_size: usize,
    pub include_context: bool,
    pub remove_fillers: bool,
    pub topic_similarity_threshold: f32,
    pub topic_char_budget: usize,
}

impl Default for PipelineConfig {
    fn default() -> Self {
        Self {
            min_chunk_size: 200,
            max_chunk_size: 1000,
            include_context: true,
            remove_fillers: false,
            topic_similarity_threshold: 0.5,
            topic_char_budget: 2000,
        }
    }
}

fn env_string(key: &str, default: &str) -> String {
    env::var(key).unwrap_or_else(|_| default.to_string())
}

fn env_opt_string(key: &str) -> Option<String> {
    env::var(key).ok().filter(|v| !v.is_empty())
}

fn env_csv(key: &str) -> Vec<String> {
    env::var(key)
        .ok()
        .map(|v| {
            v.split(',')
                .map(|s| s.trim().to_string())
                .filter(|s| !s.is_empty())
                .collect()
        })
        .unwrap_or_default()
}

fn env_parsed<T: std::str::FromStr>(key: &str, default: T) -> T {
    env::var(key)
        .ok()
        .and_then(|v| v.parse().ok())
        .unwrap_or(default)
}

impl Config {
    /// Load configuration from the process environment. Mirrors the
    /// teacher's `load_*_config` functions in spirit: parse at startup,
    /// default generously, never panic on a missing optional variable.
    pub fn from_env() -> Self {
        let production = env_string("NODE_ENV", "development") == "production";

        Self {
            embedding: EmbeddingConfig {
                provider: env_string("EMBEDDING_PROVIDER", "huggingface"),
                model: env_string("EMBEDDING_MODEL", "multilingual-e5-base"),
                huggingface_api_key: env_opt_string("HUGGINGFACE_API_KEY"),
                openai_api_key: env_opt_string("OPENAI_API_KEY"),
            },
            vector: VectorConfig {
                provider: env_string("VECTOR_PROVIDER", "pinecone"),
                index_name: env_string("VECTOR_INDEX_NAME", "transcripts"),
                namespace: env_string("VECTOR_NAMESPACE", "default"),
                pinecone_api_key: env_opt_string("PINECONE_API_KEY"),
                upstash_url: env_opt_string("UPSTASH_VECTOR_URL"),
                upstash_token: env_opt_string("UPSTASH_VECTOR_TOKEN"),
            },
            llm: LlmConfig {
                provider: env_string("LLM_PROVIDER", "openai"),
                model: env_string("LLM_MODEL", "gpt-4o-mini"),
                temperature: env_parsed("LLM_TEMPERATURE", 0.8),
                max_tokens: env_parsed("LLM_MAX_TOKENS", 600),
                openai_api_key: env_opt_string("OPENAI_API_KEY"),
                openrouter_api_key: env_opt_string("OPENROUTER_API_KEY"),
            },
            tts: TtsConfig {
                api_key: env_opt_string("TTS_API_KEY"),
                voice_id: env_string("TTS_VOICE_ID", "default"),
                model_id: env_string("TTS_MODEL_ID", "default"),
            },
            admission: AdmissionConfig {
                api_keys: env_csv("API_KEYS"),
                allowed_origins: env_csv("ALLOWED_ORIGINS"),
                chat_rate_limit_window_secs: env_parsed("CHAT_RATE_LIMIT_WINDOW_SECS", 60),
                chat_rate_limit_max: env_parsed("CHAT_RATE_LIMIT_MAX", 10),
                health_rate_limit_window_secs: env_parsed("HEALTH_RATE_LIMIT_WINDOW_SECS", 60),
                health_rate_limit_max: env_parsed("HEALTH_RATE_LIMIT_MAX", 30),
            },
            pipeline: PipelineConfig {
                min_chunk_size: env_parsed("PIPELINE_MIN_CHUNK_SIZE", 200),
                max_chunk_size: env_parsed("PIPELINE_MAX_CHUNK_SIZE", 1000),
                include_context: env_parsed("PIPELINE_INCLUDE_CONTEXT", true),
                remove_fillers: env_parsed("PIPELINE_REMOVE_FILLERS", false),
                topic_similarity_threshold: env_parsed("PIPELINE_TOPIC_THRESHOLD", 0.5),
                topic_char_budget: env_parsed("PIPELINE_TOPIC_CHAR_BUDGET", 2000),
            },
            production,
        }
    }
}
