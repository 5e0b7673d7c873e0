//! Retriever (C9): embeds the query with the configured embedding provider
//! and queries the vector index for its nearest neighbours. No relevance
//! thresholding happens here — that is left to whoever consumes the
//! Matches (AnswerService treats zero matches specially; nothing else
//! filters by score).

use crate::config::{EmbeddingConfig, VectorConfig};
use crate::embedding::providers::EmbeddingProvider;
use crate::embedding::{EmbeddingClient, EmbeddingRequest};
use crate::error::{ServiceError, ServiceResult};
use crate::models::Match;
use crate::vector::VectorIndexClient;

const TOP_K: usize = 5;

pub struct Retriever<'a> {
    embedding: &'a EmbeddingClient,
    vector: &'a VectorIndexClient,
    embedding_config: &'a EmbeddingConfig,
    vector_config: &'a VectorConfig,
}

impl<'a> Retriever<'a> {
    pub fn new(
        embedding: &'a EmbeddingClient,
        vector: &'a VectorIndexClient,
        embedding_config: &'a EmbeddingConfig,
        vector_config: &'a VectorConfig,
    ) -> Self {
        Self { embedding, vector, embedding_config, vector_config }
    }

    /// Retrieve the top-5 Matches for `query`, embedding it with the
    /// configured provider/model so the query lives in the same embedding
    /// space as the chunks that were upserted with it.
    pub async fn retrieve(&self, query: &str) -> ServiceResult<Vec<Match>> {
        let provider = EmbeddingProvider::parse(&self.embedding_config.provider)
            .ok_or_else(|| ServiceError::ProviderNotConfigured(format!("unknown embedding provider: {}", self.embedding_config.provider)))?;

        let vector = self
            .embedding
            .embed_one(query, EmbeddingRequest { provider, model_alias: &self.embedding_config.model })
            .await?;

        self.vector
            .query(&vector, &self.vector_config.namespace, TOP_K, None)
            .await
    }
}
