//! Embedding client (C6): produces fixed-dimension vectors for text via a
//! pluggable provider, with batching and exponential backoff.

use std::time::Duration;

use serde_json::json;

use crate::config::EmbeddingConfig;
use crate::error::{ServiceError, ServiceResult};

use super::providers::{find_model, EmbeddingProvider, ModelSpec};

const MAX_ATTEMPTS: u32 = 3;
const BASE_BACKOFF: Duration = Duration::from_secs(2);
const BATCH_SIZE: usize = 100;
const BATCH_PAUSE: Duration = Duration::from_millis(500);
const INTER_CALL_DELAY: Duration = Duration::from_millis(50);

#[derive(Debug, Clone, Copy)]
pub struct EmbeddingRequest<'a> {
    pub provider: EmbeddingProvider,
    pub model_alias: &'a str,
}

pub struct EmbeddingClient {
    http: reqwest::Client,
    config: EmbeddingConfig,
}

impl EmbeddingClient {
    pub fn new(config: EmbeddingConfig) -> Self {
        Self { http: reqwest::Client::new(), config }
    }

    fn resolve_model(&self, req: EmbeddingRequest<'_>) -> ServiceResult<&'static ModelSpec> {
        let model = find_model(req.model_alias)
            .ok_or_else(|| ServiceError::InvalidRequest(format!("unknown embedding model: {}", req.model_alias)))?;
        if model.provider != req.provider {
            return Err(ServiceError::InvalidRequest(format!(
                "model {} does not belong to provider {:?}",
                req.model_alias, req.provider
            )));
        }
        Ok(model)
    }

    fn api_key_for(&self, provider: EmbeddingProvider) -> ServiceResult<&str> {
        let key = match provider {
            EmbeddingProvider::HuggingFace => self.config.huggingface_api_key.as_deref(),
            EmbeddingProvider::OpenAI => self.config.openai_api_key.as_deref(),
        };
        key.ok_or_else(|| ServiceError::ProviderNotConfigured(format!("{:?} embedding credentials missing", provider)))
    }

    /// Embed a single piece of text, applying the model's query prefix.
    pub async fn embed_one(&self, text: &str, req: EmbeddingRequest<'_>) -> ServiceResult<Vec<f32>> {
        let model = self.resolve_model(req)?;
        let prepared = match model.query_prefix {
            Some(prefix) => format!("{}{}", prefix, text),
            None => text.to_string(),
        };
        self.call_with_retry(model, &prepared).await
    }

    /// Embed many texts. OpenAI uses its native batch endpoint; other
    /// providers fall back to sequential `embed_one` calls with a small
    /// inter-call delay.
    pub async fn embed_batch(&self, texts: &[String], req: EmbeddingRequest<'_>) -> ServiceResult<Vec<Vec<f32>>> {
        let model = self.resolve_model(req)?;

        if model.provider == EmbeddingProvider::OpenAI {
            return self.call_openai_batch(model, texts).await;
        }

        let mut out = Vec::with_capacity(texts.len());
        for (i, text) in texts.iter().enumerate() {
            let prepared = match model.query_prefix {
                Some(prefix) => format!("{}{}", prefix, text),
                None => text.clone(),
            };
            out.push(self.call_with_retry(model, &prepared).await?);
            if i + 1 < texts.len() {
                tokio::time::sleep(INTER_CALL_DELAY).await;
            }
        }
        Ok(out)
    }

    /// Orchestrate embedding of a large set of texts in batches of
    /// `BATCH_SIZE`, logging progress and pausing between batches.
    pub async fn embed_all_batched(&self, texts: &[String], req: EmbeddingRequest<'_>) -> ServiceResult<Vec<Vec<f32>>> {
        let mut results = Vec::with_capacity(texts.len());
        let total_batches = texts.len().div_ceil(BATCH_SIZE);

        for (batch_index, chunk) in texts.chunks(BATCH_SIZE).enumerate() {
            tracing::info!(batch = batch_index + 1, total = total_batches, "embedding batch");
            let embeddings = self.embed_batch(chunk, req).await?;
            results.extend(embeddings);
            if batch_index + 1 < total_batches {
                tokio::time::sleep(BATCH_PAUSE).await;
            }
        }

        Ok(results)
    }

    async fn call_with_retry(&self, model: &ModelSpec, text: &str) -> ServiceResult<Vec<f32>> {
        let mut backoff = BASE_BACKOFF;
        let mut last_err = None;

        for attempt in 1..=MAX_ATTEMPTS {
            match self.call_provider_once(model, text).await {
                Ok(vector) => return Ok(vector),
                Err(err) => {
                    tracing::warn!(attempt, model = model.alias, error = %err, "embedding call failed");
                    last_err = Some(err);
                    if attempt < MAX_ATTEMPTS {
                        tokio::time::sleep(backoff).await;
                        backoff *= 2;
                    }
                }
            }
        }

        Err(last_err.unwrap_or(ServiceError::Internal("embedding retries exhausted".into())))
    }

    async fn call_provider_once(&self, model: &ModelSpec, text: &str) -> ServiceResult<Vec<f32>> {
        match model.provider {
            EmbeddingProvider::HuggingFace => self.call_huggingface(model, text).await,
            EmbeddingProvider::OpenAI => self.call_openai_single(model, text).await,
        }
    }

    async fn call_huggingface(&self, model: &ModelSpec, text: &str) -> ServiceResult<Vec<f32>> {
        let api_key = self.api_key_for(EmbeddingProvider::HuggingFace)?;
        let url = format!("https://api-inference.huggingface.co/pipeline/feature-extraction/{}", model.api_model_id);

        let response = self
            .http
            .post(&url)
            .bearer_auth(api_key)
            .json(&json!({ "inputs": text, "options": { "wait_for_model": true } }))
            .timeout(Duration::from_secs(30))
            .send()
            .await?;

        if !response.status().is_success() {
            return Err(ServiceError::ProviderError(format!("huggingface returned {}", response.status())));
        }

        let body: serde_json::Value = response.json().await?;
        parse_vector(&body, model.dimensions)
    }

    async fn call_openai_single(&self, model: &ModelSpec, text: &str) -> ServiceResult<Vec<f32>> {
        let vectors = self.call_openai_batch(model, std::slice::from_ref(&text.to_string())).await?;
        vectors.into_iter().next().ok_or_else(|| ServiceError::ProviderError("openai returned no embeddings".into()))
    }

    async fn call_openai_batch(&self, model: &ModelSpec, texts: &[String]) -> ServiceResult<Vec<Vec<f32>>> {
        let api_key = self.api_key_for(EmbeddingProvider::OpenAI)?;

        let response = self
            .http
            .post("https://api.openai.com/v1/embeddings")
            .bearer_auth(api_key)
            .json(&json!({ "model": model.api_model_id, "input": texts }))
            .timeout(Duration::from_secs(30))
            .send()
            .await?;

        if !response.status().is_success() {
            return Err(ServiceError::ProviderError(format!("openai returned {}", response.status())));
        }

        let body: serde_json::Value = response.json().await?;
        let data = body["data"].as_array().ok_or_else(|| ServiceError::ProviderError("openai response missing data".into()))?;

        data.iter()
            .map(|entry| parse_vector(&entry["embedding"], model.dimensions))
            .collect()
    }
}

fn parse_vector(value: &serde_json::Value, expected_dim: usize) -> ServiceResult<Vec<f32>> {
    let array = find_numeric_array(value)
        .ok_or_else(|| ServiceError::ProviderError("embedding response did not contain a numeric vector".into()))?;

    if array.len() != expected_dim {
        tracing::warn!(got = array.len(), expected = expected_dim, "embedding dimension mismatch");
    }
    Ok(array)
}

/// HuggingFace's feature-extraction endpoint sometimes returns a
/// token-by-dimension matrix rather than a single pooled vector; when that
/// happens, mean-pool across tokens.
fn find_numeric_array(value: &serde_json::Value) -> Option<Vec<f32>> {
    if let Some(arr) = value.as_array() {
        if arr.iter().all(|v| v.is_number()) {
            return Some(arr.iter().filter_map(|v| v.as_f64()).map(|v| v as f32).collect());
        }
        if let Some(first) = arr.first() {
            if let Some(nested) = find_numeric_array(first) {
                let rows: Vec<Vec<f32>> = arr.iter().filter_map(find_numeric_array).collect();
                if rows.is_empty() {
                    return None;
                }
                let dim = nested.len();
                let mut pooled = vec![0.0f32; dim];
                for row in &rows {
                    for (i, v) in row.iter().enumerate().take(dim) {
                        pooled[i] += v;
                    }
                }
                let count = rows.len() as f32;
                return Some(pooled.into_iter().map(|v| v / count).collect());
            }
        }
    }
    None
}

#[cfg(test)]
mod tests {
    use super::*;

    fn client() -> EmbeddingClient {
        EmbeddingClient::new(EmbeddingConfig {
            provider: "huggingface".into(),
            model: "multilingual-e5-base".into(),
            huggingface_api_key: None,
            openai_api_key: None,
        })
    }

    #[tokio::test]
    async fn rejects_unknown_model_alias() {
        let client = client();
        let err = client
            .embed_one("text", EmbeddingRequest { provider: EmbeddingProvider::HuggingFace, model_alias: "no-such-model" })
            .await
            .unwrap_err();
        assert!(matches!(err, ServiceError::InvalidRequest(_)));
    }

    #[tokio::test]
    async fn rejects_missing_credentials() {
        let client = client();
        let err = client
            .embed_one("text", EmbeddingRequest { provider: EmbeddingProvider::HuggingFace, model_alias: "multilingual-e5-base" })
            .await
            .unwrap_err();
        assert!(matches!(err, ServiceError::ProviderNotConfigured(_)));
    }

    #[test]
    fn parses_flat_numeric_array() {
        let value = json!([0.1, 0.2, 0.3]);
        let vector = parse_vector(&value, 3).unwrap();
        assert_eq!(vector, vec![0.1, 0.2, 0.3]);
    }

    #[test]
    fn mean_pools_token_matrix() {
        let value = json!([[1.0, 1.0], [3.0, 3.0]]);
        let vector = parse_vector(&value, 2).unwrap();
        assert_eq!(vector, vec![2.0, 2.0]);
    }
}
