//! IngestionCLI hooks (C16): thin façades over C6/C7/C8, invoked by
//! `src/bin/ingest.rs`'s `clap` subcommands. Each function is a plain
//! async library call with no terminal I/O of its own — `cleanup_namespace`
//! takes an already-resolved `confirmed` flag rather than prompting,
//! leaving the interactive y/n prompt to the CLI front-end.

use std::path::Path;

use crate::config::{Config, VectorConfig};
use crate::embedding::{EmbeddingClient, ModelSpec, MODEL_CATALOGUE};
use crate::error::{PipelineError, PipelineResult, ServiceError, ServiceResult};
use crate::models::{EmbeddedChunk, IndexDescription};
use crate::pipeline::orchestrator::{run_ingestion, transcript_name_from_path, PipelineOptions, PipelineOutputs, ProgressCallback};
use crate::vector::{UpsertOptions, VectorIndexClient};

async fn read_subtitle_file(path: &Path) -> PipelineResult<String> {
    tokio::fs::read_to_string(path).await.map_err(|e| PipelineError::new(0, "read_file", e.to_string()))
}

/// `processTranscript(path, config)`: run the full seven-stage pipeline
/// against the configured default namespace.
pub async fn process_transcript(path: &Path, config: &Config) -> PipelineResult<PipelineOutputs> {
    run_with_namespace(path, config, &config.vector.namespace, None).await
}

/// `processWithNamespace(path, namespace)`: same pipeline, targeting an
/// explicit namespace override.
pub async fn process_with_namespace(path: &Path, config: &Config, namespace: &str) -> PipelineResult<PipelineOutputs> {
    run_with_namespace(path, config, namespace, None).await
}

async fn run_with_namespace(
    path: &Path,
    config: &Config,
    namespace: &str,
    progress: Option<&ProgressCallback<'_>>,
) -> PipelineResult<PipelineOutputs> {
    let contents = read_subtitle_file(path).await?;
    let transcript_file = transcript_name_from_path(path);

    let embedding_client = EmbeddingClient::new(config.embedding.clone());
    let vector_client = VectorIndexClient::new(config.vector.clone());
    let mut vector_config = config.vector.clone();
    vector_config.namespace = namespace.to_string();

    let options = PipelineOptions {
        pipeline_config: &config.pipeline,
        embedding_client: &embedding_client,
        embedding_config: &config.embedding,
        vector_client: Some(&vector_client),
        vector_config: Some(&vector_config),
        transcript_file: &transcript_file,
        artefact_dir: None,
        progress,
    };

    run_ingestion(&contents, options).await
}

/// `reuploadEmbeddings(path, namespace?)`: re-upsert a previously saved
/// `06-embeddings.json` artefact without re-running stages 1-6. The
/// transcript name is derived from the artefact's containing directory,
/// matching where `run_ingestion` would have written it.
pub async fn reupload_embeddings(embeddings_path: &Path, config: &Config, namespace: Option<&str>) -> ServiceResult<()> {
    let bytes = tokio::fs::read(embeddings_path).await?;
    let embedded: Vec<EmbeddedChunk> = serde_json::from_slice(&bytes)?;

    let transcript_file = embeddings_path
        .parent()
        .and_then(|p| p.file_name())
        .map(|n| n.to_string_lossy().to_string())
        .unwrap_or_else(|| "unknown".to_string());

    let vector_client = VectorIndexClient::new(config.vector.clone());
    let namespace = namespace.unwrap_or(&config.vector.namespace);

    vector_client.upsert(&embedded, &transcript_file, UpsertOptions::new(namespace)).await
}

/// `cleanupNamespace(indexName, namespace)`: delete every vector in a
/// namespace. The interactive confirmation required in CLI contexts is the
/// caller's responsibility; this hook refuses to run without it.
pub async fn cleanup_namespace(_index_name: &str, namespace: &str, config: &Config, confirmed: bool) -> ServiceResult<()> {
    if !confirmed {
        return Err(ServiceError::InvalidRequest("cleanup requires explicit confirmation".into()));
    }
    let vector_client = VectorIndexClient::new(config.vector.clone());
    vector_client.delete_all(namespace).await
}

/// `describeIndex(indexName)`: index shape and per-namespace counts.
pub async fn describe_index(index_name: &str, config: &Config) -> ServiceResult<IndexDescription> {
    let vector_client = VectorIndexClient::new(config.vector.clone());
    vector_client.describe(index_name).await
}

/// `listEmbeddingModels()`: the static model catalogue, for CLI display.
pub fn list_embedding_models() -> &'static [ModelSpec] {
    MODEL_CATALOGUE
}

#[cfg(test)]
mod tests {
    use super::*;

    fn config() -> Config {
        Config {
            embedding: crate::config::EmbeddingConfig {
                provider: "huggingface".into(),
                model: "multilingual-e5-base".into(),
                huggingface_api_key: None,
                openai_api_key: None,
            },
            vector: VectorConfig {
                provider: "pinecone".into(),
                index_name: "transcripts".into(),
                namespace: "default".into(),
                pinecone_api_key: None,
                upstash_url: None,
                upstash_token: None,
            },
            llm: crate::config::LlmConfig {
                provider: "openai".into(),
                model: "gpt-4o-mini".into(),
                temperature: 0.8,
                max_tokens: 600,
                openai_api_key: None,
                openrouter_api_key: None,
            },
            tts: crate::config::TtsConfig { api_key: None, voice_id: "v".into(), model_id: "m".into() },
            admission: crate::config::AdmissionConfig {
                api_keys: vec![],
                allowed_origins: vec![],
                chat_rate_limit_window_secs: 60,
                chat_rate_limit_max: 10,
                health_rate_limit_window_secs: 60,
                health_rate_limit_max: 30,
            },
            pipeline: crate::config::PipelineConfig::default(),
            production: false,
        }
    }

    #[tokio::test]
    async fn cleanup_without_confirmation_is_rejected() {
        let err = cleanup_namespace("transcripts", "default", &config(), false).await.unwrap_err();
        assert!(matches!(err, ServiceError::InvalidRequest(_)));
    }

    #[test]
    fn list_embedding_models_is_non_empty() {
        assert!(!list_embedding_models().is_empty());
    }

    #[tokio::test]
    async fn process_transcript_surfaces_missing_file_as_pipeline_error() {
        let err = process_transcript(Path::new("/nonexistent/path.srt"), &config()).await.unwrap_err();
        assert_eq!(err.stage, 0);
    }
}
