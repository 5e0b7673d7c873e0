//! PipelineOrchestrator (C8): runs the seven ingestion stages in order,
//! reporting progress and optionally persisting intermediate JSON
//! artefacts. Stage objects are plain value types passed between stages —
//! no shared mutable graph — per the "cross-stage pipelines" design note.

use std::path::Path;
use std::time::Instant;

use crate::config::{EmbeddingConfig, PipelineConfig, VectorConfig};
use crate::embedding::{EmbeddingClient, EmbeddingProvider, EmbeddingRequest};
use crate::error::PipelineError;
use crate::knowledge;
use crate::models::{
    Chunk, CleanedParagraph, EmbeddedChunk, EmbeddingMetadata, KnowledgeObject, Paragraph, Segment,
};
use crate::text_processing::{clean_paragraphs, parse_subtitle_file, reconstruct};
use crate::vector::{UpsertOptions, VectorIndexClient};

const TOTAL_STAGES: usize = 7;

const STAGE_NAMES: [&str; TOTAL_STAGES] = [
    "parse_subtitles",
    "reconstruct_paragraphs",
    "clean_content",
    "extract_knowledge",
    "chunk_content",
    "generate_embeddings",
    "upsert_vectors",
];

#[derive(Debug, Clone)]
pub struct Progress {
    pub stage: usize,
    pub total: usize,
    pub label: &'static str,
    pub percentage: f64,
    pub elapsed_secs: f64,
}

pub type ProgressCallback<'a> = dyn Fn(Progress) + Send + Sync + 'a;

/// Every stage's output, retained for inspection even when a later stage
/// fails — `run_ingestion` returns these on success, and the caller can
/// recover everything completed so far from the `PipelineError` path by
/// catching it at the call site and inspecting artefacts already written.
#[derive(Debug, Default)]
pub struct PipelineOutputs {
    pub segments: Vec<Segment>,
    pub paragraphs: Vec<Paragraph>,
    pub cleaned: Vec<CleanedParagraph>,
    pub knowledge: Vec<KnowledgeObject>,
    pub chunks: Vec<Chunk>,
    pub embedded: Vec<EmbeddedChunk>,
}

pub struct PipelineOptions<'a> {
    pub pipeline_config: &'a PipelineConfig,
    pub embedding_client: &'a EmbeddingClient,
    pub embedding_config: &'a EmbeddingConfig,
    pub vector_client: Option<&'a VectorIndexClient>,
    pub vector_config: Option<&'a VectorConfig>,
    pub transcript_file: &'a str,
    pub artefact_dir: Option<&'a Path>,
    pub progress: Option<&'a ProgressCallback<'a>>,
}

fn cleaned_to_paragraph(cp: &CleanedParagraph) -> Paragraph {
    Paragraph {
        paragraph_id: cp.paragraph_id,
        sentences: vec![],
        full_text: cp.cleaned_text.clone(),
        start_time: cp.start_time.clone(),
        end_time: cp.end_time.clone(),
        segment_ids: cp.segment_ids.clone(),
    }
}

async fn write_artefact<T: serde::Serialize>(dir: Option<&Path>, name: &str, value: &T) -> Result<(), PipelineError> {
    let Some(dir) = dir else { return Ok(()) };
    let path = dir.join(name);
    let json = serde_json::to_vec_pretty(value).map_err(|e| PipelineError::new(0, "artefact_serialize", e.to_string()))?;
    tokio::fs::write(&path, json).await?;
    Ok(())
}

fn report(progress: Option<&ProgressCallback<'_>>, stage: usize, started_at: Instant) {
    if let Some(cb) = progress {
        cb(Progress {
            stage,
            total: TOTAL_STAGES,
            label: STAGE_NAMES[stage - 1],
            percentage: stage as f64 / TOTAL_STAGES as f64,
            elapsed_secs: started_at.elapsed().as_secs_f64(),
        });
    }
}

/// Derive the `transcriptFile` metadata value from a subtitle path: the
/// basename without its extension.
pub fn transcript_name_from_path(path: &Path) -> String {
    path.file_stem().map(|s| s.to_string_lossy().to_string()).unwrap_or_else(|| "transcript".to_string())
}

/// Run stages 1-7 over `subtitle_contents`, returning every stage's output.
/// On failure the error identifies the failing stage; everything completed
/// up to that point is lost to the caller only if artefact writing was not
/// requested — request `artefact_dir` to keep prior stages inspectable on
/// disk regardless of how this call returns.
pub async fn run_ingestion(subtitle_contents: &str, options: PipelineOptions<'_>) -> Result<PipelineOutputs, PipelineError> {
    let started_at = Instant::now();
    let mut outputs = PipelineOutputs::default();

    // Stage 1: parse
    outputs.segments = parse_subtitle_file(subtitle_contents).map_err(|e| PipelineError::new(1, STAGE_NAMES[0], e.to_string()))?;
    write_artefact(options.artefact_dir, "01-segments.json", &outputs.segments).await?;
    report(options.progress, 1, started_at);

    // Stage 2: reconstruct
    outputs.paragraphs = reconstruct(&outputs.segments);
    write_artefact(options.artefact_dir, "02-paragraphs.json", &outputs.paragraphs).await?;
    report(options.progress, 2, started_at);

    // Stage 3: clean
    outputs.cleaned = clean_paragraphs(&outputs.paragraphs, options.pipeline_config.remove_fillers);
    write_artefact(options.artefact_dir, "03-cleaned.json", &outputs.cleaned).await?;
    report(options.progress, 3, started_at);

    // Stage 4: knowledge extraction (keyword-fallback; embedding-mode
    // segmentation is available via `knowledge::extract_knowledge`'s
    // `embedding` parameter but the orchestrator defaults to the
    // deterministic fallback for reproducible ingestion runs).
    let cleaned_as_paragraphs: Vec<Paragraph> = outputs.cleaned.iter().map(cleaned_to_paragraph).collect();
    outputs.knowledge = knowledge::extract_knowledge(&cleaned_as_paragraphs, options.pipeline_config, None)
        .await
        .map_err(|e| PipelineError::new(4, STAGE_NAMES[3], e.to_string()))?;
    write_artefact(options.artefact_dir, "04-knowledge.json", &outputs.knowledge).await?;
    report(options.progress, 4, started_at);

    // Stage 5: chunk
    outputs.chunks = crate::chunking::chunk_knowledge_objects(&outputs.knowledge, options.pipeline_config)
        .map_err(|e| PipelineError::new(5, STAGE_NAMES[4], e.to_string()))?;
    write_artefact(options.artefact_dir, "05-chunks.json", &outputs.chunks).await?;
    report(options.progress, 5, started_at);

    // Stage 6: embed
    let provider = EmbeddingProvider::parse(&options.embedding_config.provider)
        .ok_or_else(|| PipelineError::new(6, STAGE_NAMES[5], format!("unknown embedding provider: {}", options.embedding_config.provider)))?;
    let texts: Vec<String> = outputs.chunks.iter().map(|c| c.content.clone()).collect();
    let req = EmbeddingRequest { provider, model_alias: &options.embedding_config.model };
    let vectors = options
        .embedding_client
        .embed_all_batched(&texts, req)
        .await
        .map_err(|e| PipelineError::new(6, STAGE_NAMES[5], e.to_string()))?;

    let generated_at = chrono::Utc::now().to_rfc3339();
    let dimensions = vectors.first().map(|v| v.len()).unwrap_or(0);
    outputs.embedded = outputs
        .chunks
        .iter()
        .cloned()
        .zip(vectors)
        .map(|(chunk, embedding)| EmbeddedChunk {
            chunk,
            embedding,
            embedding_metadata: EmbeddingMetadata {
                provider: options.embedding_config.provider.clone(),
                model: options.embedding_config.model.clone(),
                dimensions,
                generated_at: generated_at.clone(),
            },
        })
        .collect();
    write_artefact(options.artefact_dir, "06-embeddings.json", &outputs.embedded).await?;
    report(options.progress, 6, started_at);

    // Stage 7: upsert. Skipped entirely (not merely a no-op report) when
    // the caller doesn't supply a vector client, e.g. when only generating
    // embeddings artefacts for a later re-upload.
    if let (Some(vector_client), Some(vector_config)) = (options.vector_client, options.vector_config) {
        vector_client
            .upsert(&outputs.embedded, options.transcript_file, UpsertOptions::new(&vector_config.namespace))
            .await
            .map_err(|e| PipelineError::new(7, STAGE_NAMES[6], e.to_string()))?;
    }
    report(options.progress, 7, started_at);

    Ok(outputs)
}
