//! Vector index client (C7): ensures the index exists, upserts/queries/
//! deletes vectors with namespace isolation, and describes index stats.
//! HTTP shaping mirrors `EmbeddingClient`'s reqwest-based provider calls;
//! batching/pause cadence mirrors the teacher's pooled-resource patterns
//! generalised from engine-pool acquisition to batch upload pacing.

use std::collections::HashMap;
use std::time::Duration;

use chrono::Utc;
use serde_json::json;

use crate::config::VectorConfig;
use crate::error::{ServiceError, ServiceResult};
use crate::models::{EmbeddedChunk, FlatMetadata, IndexDescription, Match, NamespaceStats, VectorRecord};

use super::providers::VectorProvider;

const UPSERT_BATCH_SIZE: usize = 100;
const BATCH_PAUSE: Duration = Duration::from_millis(500);
const INDEX_READY_WAIT: Duration = Duration::from_secs(60);
const METADATA_CONTENT_MAX: usize = 1000;

#[derive(Debug, Clone, Copy)]
pub struct UpsertOptions<'a> {
    pub namespace: &'a str,
    pub batch_size: usize,
}

impl<'a> UpsertOptions<'a> {
    pub fn new(namespace: &'a str) -> Self {
        Self { namespace, batch_size: UPSERT_BATCH_SIZE }
    }
}

pub struct VectorIndexClient {
    http: reqwest::Client,
    config: VectorConfig,
}

impl VectorIndexClient {
    pub fn new(config: VectorConfig) -> Self {
        Self { http: reqwest::Client::new(), config }
    }

    fn provider(&self) -> ServiceResult<VectorProvider> {
        VectorProvider::parse(&self.config.provider)
            .ok_or_else(|| ServiceError::InvalidRequest(format!("unknown vector provider: {}", self.config.provider)))
    }

    fn pinecone_key(&self) -> ServiceResult<&str> {
        self.config.pinecone_api_key.as_deref().ok_or_else(|| {
            ServiceError::ProviderNotConfigured("pinecone API key missing".into())
        })
    }

    fn upstash_creds(&self) -> ServiceResult<(&str, &str)> {
        match (self.config.upstash_url.as_deref(), self.config.upstash_token.as_deref()) {
            (Some(url), Some(token)) => Ok((url, token)),
            _ => Err(ServiceError::ProviderNotConfigured("upstash URL/token missing".into())),
        }
    }

    /// Pinecone-only: list indexes, create one with the given dimension if
    /// absent, then wait for it to become ready before first use. Upstash
    /// indexes are provisioned out of band, so this is a no-op there.
    pub async fn ensure_index(&self, name: &str, dim: usize) -> ServiceResult<()> {
        if self.provider()? != VectorProvider::Pinecone {
            return Ok(());
        }
        let api_key = self.pinecone_key()?;

        let list_resp = self
            .http
            .get("https://api.pinecone.io/indexes")
            .header("Api-Key", api_key)
            .send()
            .await?;
        if !list_resp.status().is_success() {
            return Err(ServiceError::ProviderError(format!("pinecone list indexes returned {}", list_resp.status())));
        }
        let body: serde_json::Value = list_resp.json().await?;
        let exists = body["indexes"]
            .as_array()
            .map(|indexes| indexes.iter().any(|idx| idx["name"].as_str() == Some(name)))
            .unwrap_or(false);

        if exists {
            return Ok(());
        }

        let create_resp = self
            .http
            .post("https://api.pinecone.io/indexes")
            .header("Api-Key", api_key)
            .json(&json!({
                "name": name,
                "dimension": dim,
                "metric": "cosine",
                "spec": { "serverless": { "cloud": "aws", "region": "us-east-1" } }
            }))
            .send()
            .await?;
        if !create_resp.status().is_success() {
            return Err(ServiceError::ProviderError(format!("pinecone create index returned {}", create_resp.status())));
        }

        tokio::time::sleep(INDEX_READY_WAIT).await;
        Ok(())
    }

    /// Convert a chunk into a flat upsert record: arrays become
    /// comma-separated strings, `content` is truncated to 1000 chars for
    /// metadata while the chunk keeps its full text.
    fn to_vector_record(chunk: &EmbeddedChunk, transcript_file: &str) -> VectorRecord {
        let mut metadata: FlatMetadata = HashMap::new();
        let m = &chunk.chunk.metadata;

        let truncated_content: String = chunk.chunk.content.chars().take(METADATA_CONTENT_MAX).collect();
        metadata.insert("content".into(), json!(truncated_content));
        metadata.insert("topic".into(), json!(m.topic));
        metadata.insert("people".into(), json!(m.people.join(",")));
        metadata.insert("concepts".into(), json!(m.concepts.join(",")));
        metadata.insert("organizations".into(), json!(m.organizations.join(",")));
        metadata.insert("timestamp".into(), json!(format!("{}-{}", m.start_time, m.end_time)));
        if let Some(importance) = m.importance {
            metadata.insert("importance".into(), json!(format!("{:?}", importance).to_lowercase()));
        }
        metadata.insert("category".into(), json!(m.category));
        metadata.insert("keywords".into(), json!(m.keywords.join(",")));
        metadata.insert("transcriptFile".into(), json!(transcript_file));
        metadata.insert("uploadDate".into(), json!(Utc::now().to_rfc3339()));

        VectorRecord { id: chunk.chunk.chunk_id.clone(), values: chunk.embedding.clone(), metadata }
    }

    /// Upsert embedded chunks in batches, pausing between batches. Batch
    /// failures surface with the failing batch index so the caller can
    /// resume from it.
    pub async fn upsert(&self, chunks: &[EmbeddedChunk], transcript_file: &str, opts: UpsertOptions<'_>) -> ServiceResult<()> {
        let records: Vec<VectorRecord> = chunks.iter().map(|c| Self::to_vector_record(c, transcript_file)).collect();
        let total_batches = records.len().div_ceil(opts.batch_size.max(1));

        for (batch_index, batch) in records.chunks(opts.batch_size.max(1)).enumerate() {
            self.upsert_batch(batch, opts.namespace).await.map_err(|err| {
                ServiceError::Internal(format!("batch upsert failed at batch {}: {}", batch_index, err))
            })?;
            tracing::info!(batch = batch_index + 1, total = total_batches, "upserted vector batch");
            if batch_index + 1 < total_batches {
                tokio::time::sleep(BATCH_PAUSE).await;
            }
        }

        Ok(())
    }

    async fn upsert_batch(&self, batch: &[VectorRecord], namespace: &str) -> ServiceResult<()> {
        match self.provider()? {
            VectorProvider::Pinecone => self.pinecone_upsert(batch, namespace).await,
            VectorProvider::Upstash => self.upstash_upsert(batch, namespace).await,
        }
    }

    async fn pinecone_upsert(&self, batch: &[VectorRecord], namespace: &str) -> ServiceResult<()> {
        let api_key = self.pinecone_key()?;
        let vectors: Vec<_> = batch
            .iter()
            .map(|r| json!({ "id": r.id, "values": r.values, "metadata": r.metadata }))
            .collect();

        let resp = self
            .http
            .post(format!("https://{}-index.svc.pinecone.io/vectors/upsert", self.config.index_name))
            .header("Api-Key", api_key)
            .json(&json!({ "vectors": vectors, "namespace": namespace }))
            .timeout(Duration::from_secs(10))
            .send()
            .await?;

        if !resp.status().is_success() {
            return Err(ServiceError::ProviderError(format!("pinecone upsert returned {}", resp.status())));
        }
        Ok(())
    }

    async fn upstash_upsert(&self, batch: &[VectorRecord], namespace: &str) -> ServiceResult<()> {
        let (url, token) = self.upstash_creds()?;
        let vectors: Vec<_> = batch
            .iter()
            .map(|r| json!({ "id": r.id, "vector": r.values, "metadata": r.metadata }))
            .collect();

        let resp = self
            .http
            .post(format!("{}/upsert-data/{}", url, namespace))
            .bearer_auth(token)
            .json(&vectors)
            .timeout(Duration::from_secs(10))
            .send()
            .await?;

        if !resp.status().is_success() {
            return Err(ServiceError::ProviderError(format!("upstash upsert returned {}", resp.status())));
        }
        Ok(())
    }

    /// Query the index for the `topK` nearest neighbours of `vector`,
    /// returning Matches ordered by decreasing score. `filter` is omitted
    /// from the request entirely when empty.
    pub async fn query(
        &self,
        vector: &[f32],
        namespace: &str,
        top_k: usize,
        filter: Option<&serde_json::Value>,
    ) -> ServiceResult<Vec<Match>> {
        match self.provider()? {
            VectorProvider::Pinecone => self.pinecone_query(vector, namespace, top_k, filter).await,
            VectorProvider::Upstash => self.upstash_query(vector, namespace, top_k, filter).await,
        }
    }

    async fn pinecone_query(
        &self,
        vector: &[f32],
        namespace: &str,
        top_k: usize,
        filter: Option<&serde_json::Value>,
    ) -> ServiceResult<Vec<Match>> {
        let api_key = self.pinecone_key()?;
        let mut body = json!({
            "vector": vector,
            "namespace": namespace,
            "topK": top_k,
            "includeMetadata": true,
        });
        if let Some(filter) = filter {
            if filter.as_object().map(|o| !o.is_empty()).unwrap_or(false) {
                body["filter"] = filter.clone();
            }
        }

        let resp = self
            .http
            .post(format!("https://{}-index.svc.pinecone.io/query", self.config.index_name))
            .header("Api-Key", api_key)
            .json(&body)
            .timeout(Duration::from_secs(10))
            .send()
            .await?;

        if !resp.status().is_success() {
            return Err(ServiceError::ProviderError(format!("pinecone query returned {}", resp.status())));
        }

        let parsed: serde_json::Value = resp.json().await?;
        let matches = parsed["matches"].as_array().cloned().unwrap_or_default();
        Ok(parse_matches(&matches))
    }

    async fn upstash_query(
        &self,
        vector: &[f32],
        namespace: &str,
        top_k: usize,
        filter: Option<&serde_json::Value>,
    ) -> ServiceResult<Vec<Match>> {
        let (url, token) = self.upstash_creds()?;
        let mut body = json!({ "vector": vector, "topK": top_k, "includeMetadata": true });
        if let Some(filter) = filter {
            if filter.as_object().map(|o| !o.is_empty()).unwrap_or(false) {
                body["filter"] = filter.clone();
            }
        }

        let resp = self
            .http
            .post(format!("{}/query-data/{}", url, namespace))
            .bearer_auth(token)
            .json(&body)
            .timeout(Duration::from_secs(10))
            .send()
            .await?;

        if !resp.status().is_success() {
            return Err(ServiceError::ProviderError(format!("upstash query returned {}", resp.status())));
        }

        let parsed: serde_json::Value = resp.json().await?;
        let matches = parsed["result"].as_array().cloned().unwrap_or_default();
        Ok(parse_matches(&matches))
    }

    pub async fn delete_all(&self, namespace: &str) -> ServiceResult<()> {
        match self.provider()? {
            VectorProvider::Pinecone => {
                let api_key = self.pinecone_key()?;
                let resp = self
                    .http
                    .post(format!("https://{}-index.svc.pinecone.io/vectors/delete", self.config.index_name))
                    .header("Api-Key", api_key)
                    .json(&json!({ "deleteAll": true, "namespace": namespace }))
                    .send()
                    .await?;
                if !resp.status().is_success() {
                    return Err(ServiceError::ProviderError(format!("pinecone deleteAll returned {}", resp.status())));
                }
                Ok(())
            }
            VectorProvider::Upstash => {
                let (url, token) = self.upstash_creds()?;
                let resp = self.http.delete(format!("{}/reset/{}", url, namespace)).bearer_auth(token).send().await?;
                if !resp.status().is_success() {
                    return Err(ServiceError::ProviderError(format!("upstash reset returned {}", resp.status())));
                }
                Ok(())
            }
        }
    }

    pub async fn delete_many(&self, ids: &[String], namespace: &str) -> ServiceResult<()> {
        match self.provider()? {
            VectorProvider::Pinecone => {
                let api_key = self.pinecone_key()?;
                let resp = self
                    .http
                    .post(format!("https://{}-index.svc.pinecone.io/vectors/delete", self.config.index_name))
                    .header("Api-Key", api_key)
                    .json(&json!({ "ids": ids, "namespace": namespace }))
                    .send()
                    .await?;
                if !resp.status().is_success() {
                    return Err(ServiceError::ProviderError(format!("pinecone delete returned {}", resp.status())));
                }
                Ok(())
            }
            VectorProvider::Upstash => {
                let (url, token) = self.upstash_creds()?;
                let resp = self
                    .http
                    .post(format!("{}/delete/{}", url, namespace))
                    .bearer_auth(token)
                    .json(&json!(ids))
                    .send()
                    .await?;
                if !resp.status().is_success() {
                    return Err(ServiceError::ProviderError(format!("upstash delete returned {}", resp.status())));
                }
                Ok(())
            }
        }
    }

    /// Describe the index's shape and per-namespace counts. `recordCount`
    /// is treated as authoritative over `vectorCount` when both are present.
    pub async fn describe(&self, name: &str) -> ServiceResult<IndexDescription> {
        match self.provider()? {
            VectorProvider::Pinecone => {
                let api_key = self.pinecone_key()?;
                let resp = self
                    .http
                    .post(format!("https://{}-index.svc.pinecone.io/describe_index_stats", name))
                    .header("Api-Key", api_key)
                    .json(&json!({}))
                    .send()
                    .await?;
                if !resp.status().is_success() {
                    return Err(ServiceError::ProviderError(format!("pinecone describe returned {}", resp.status())));
                }
                let body: serde_json::Value = resp.json().await?;
                Ok(parse_index_description(&body))
            }
            VectorProvider::Upstash => {
                let (url, token) = self.upstash_creds()?;
                let resp = self.http.get(format!("{}/info", url)).bearer_auth(token).send().await?;
                if !resp.status().is_success() {
                    return Err(ServiceError::ProviderError(format!("upstash info returned {}", resp.status())));
                }
                let body: serde_json::Value = resp.json().await?;
                Ok(parse_index_description(&body))
            }
        }
    }
}

fn parse_matches(raw: &[serde_json::Value]) -> Vec<Match> {
    let mut matches: Vec<Match> = raw
        .iter()
        .map(|m| Match {
            id: m["id"].as_str().unwrap_or_default().to_string(),
            score: m["score"].as_f64().unwrap_or(0.0) as f32,
            metadata: m["metadata"].as_object().map(|o| o.clone().into_iter().collect()).unwrap_or_default(),
        })
        .collect();
    matches.sort_by(|a, b| b.score.partial_cmp(&a.score).unwrap_or(std::cmp::Ordering::Equal));
    matches
}

fn parse_index_description(body: &serde_json::Value) -> IndexDescription {
    let dimension = body["dimension"].as_u64().unwrap_or(0) as usize;
    let total_vector_count = body["totalVectorCount"].as_u64().unwrap_or(0);
    let index_fullness = body["indexFullness"].as_f64().map(|v| v as f32);

    let namespaces = body["namespaces"]
        .as_object()
        .map(|ns| {
            ns.iter()
                .map(|(name, stats)| {
                    let record_count = stats["recordCount"].as_u64();
                    let vector_count = stats["vectorCount"].as_u64();
                    (name.clone(), NamespaceStats { record_count, vector_count })
                })
                .collect()
        })
        .unwrap_or_default();

    IndexDescription { dimension, total_vector_count, namespaces, index_fullness }
}
