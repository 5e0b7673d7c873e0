//! Embedding provider/model catalogue (C6). Each model carries its vector
//! dimension and an optional query prefix (E5-family models require
//! `"query: "` prepended to the input text).

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum EmbeddingProvider {
    HuggingFace,
    OpenAI,
}

impl EmbeddingProvider {
    pub fn parse(name: &str) -> Option<Self> {
        match name {
            "huggingface" => Some(Self::HuggingFace),
            "openai" => Some(Self::OpenAI),
            _ => None,
        }
    }

    pub fn as_str(&self) -> &'static str {
        match self {
            Self::HuggingFace => "huggingface",
            Self::OpenAI => "openai",
        }
    }
}

#[derive(Debug, Clone, Copy)]
pub struct ModelSpec {
    pub alias: &'static str,
    pub provider: EmbeddingProvider,
    /// HTTP API model identifier, distinct from the alias used in configuration.
    pub api_model_id: &'static str,
    pub dimensions: usize,
    pub query_prefix: Option<&'static str>,
}

/// Known models. `multilingual-e5-*` and `paraphrase-multilingual` require
/// the E5 `"query: "` prefix; `ibm-granite` and the OpenAI models do not.
pub const MODEL_CATALOGUE: &[ModelSpec] = &[
    ModelSpec {
        alias: "multilingual-e5-large",
        provider: EmbeddingProvider::HuggingFace,
        api_model_id: "intfloat/multilingual-e5-large",
        dimensions: 1024,
        query_prefix: Some("query: "),
    },
    ModelSpec {
        alias: "multilingual-e5-base",
        provider: EmbeddingProvider::HuggingFace,
        api_model_id: "intfloat/multilingual-e5-base",
        dimensions: 768,
        query_prefix: Some("query: "),
    },
    ModelSpec {
        alias: "multilingual-e5-small",
        provider: EmbeddingProvider::HuggingFace,
        api_model_id: "intfloat/multilingual-e5-small",
        dimensions: 384,
        query_prefix: Some("query: "),
    },
    ModelSpec {
        alias: "paraphrase-multilingual",
        provider: EmbeddingProvider::HuggingFace,
        api_model_id: "sentence-transformers/paraphrase-multilingual-MiniLM-L12-v2",
        dimensions: 384,
        query_prefix: Some("query: "),
    },
    ModelSpec {
        alias: "ibm-granite-multilingual",
        provider: EmbeddingProvider::HuggingFace,
        api_model_id: "ibm-granite/granite-embedding-107m-multilingual",
        dimensions: 768,
        query_prefix: None,
    },
    ModelSpec {
        alias: "text-embedding-3-small",
        provider: EmbeddingProvider::OpenAI,
        api_model_id: "text-embedding-3-small",
        dimensions: 1536,
        query_prefix: None,
    },
    ModelSpec {
        alias: "text-embedding-3-large",
        provider: EmbeddingProvider::OpenAI,
        api_model_id: "text-embedding-3-large",
        dimensions: 3072,
        query_prefix: None,
    },
];

pub fn find_model(alias: &str) -> Option<&'static ModelSpec> {
    MODEL_CATALOGUE.iter().find(|m| m.alias == alias)
}

pub fn list_models() -> Vec<&'static ModelSpec> {
    MODEL_CATALOGUE.iter().collect()
}
