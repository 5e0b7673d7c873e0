use serde::{Deserialize, Serialize};

use super::knowledge::Importance;

/// Storage-ready metadata carried alongside a chunk's content. Kept
/// structured here; `VectorIndexClient` is responsible for flattening it
/// into the scalar-only shape the index requires.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ChunkMetadata {
    pub topic: String,
    pub knowledge_id: String,
    pub people: Vec<String>,
    pub concepts: Vec<String>,
    pub organizations: Vec<String>,
    pub start_time: String,
    pub end_time: String,
    pub importance: Option<Importance>,
    pub category: String,
    pub keywords: Vec<String>,
    pub context_before: Option<String>,
    pub context_after: Option<String>,
    pub segment_ids: Vec<u32>,
    pub language: String,
    pub part_index: Option<u32>,
    pub total_parts: Option<u32>,
}

/// A storage-ready unit of 200-1000 chars emitted by `SemanticChunker` (C5).
/// Never split mid-sentence.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Chunk {
    pub chunk_id: String,
    #[serde(rename = "type")]
    pub kind: String,
    pub content: String,
    pub metadata: ChunkMetadata,
}

impl Chunk {
    pub fn new(chunk_id: String, content: String, metadata: ChunkMetadata) -> Self {
        Self {
            chunk_id,
            kind: "knowledge".to_string(),
            content,
            metadata,
        }
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct EmbeddingMetadata {
    pub provider: String,
    pub model: String,
    pub dimensions: usize,
    pub generated_at: String,
}

/// A `Chunk` plus its embedding vector. All chunks produced by one pipeline
/// run share the same embedding dimension.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct EmbeddedChunk {
    #[serde(flatten)]
    pub chunk: Chunk,
    pub embedding: Vec<f32>,
    pub embedding_metadata: EmbeddingMetadata,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn chunk_new_sets_knowledge_type() {
        let chunk = Chunk::new("chunk_001".into(), "content".into(), ChunkMetadata::default());
        assert_eq!(chunk.kind, "knowledge");
        assert_eq!(chunk.chunk_id, "chunk_001");
    }

    #[test]
    fn embedded_chunk_flattens_chunk_fields_into_json() {
        let chunk = Chunk::new("chunk_001".into(), "c".into(), ChunkMetadata::default());
        let embedded = EmbeddedChunk {
            chunk,
            embedding: vec![0.1, 0.2],
            embedding_metadata: EmbeddingMetadata {
                provider: "huggingface".into(),
                model: "multilingual-e5-base".into(),
                dimensions: 2,
                generated_at: "2026-01-01T00:00:00Z".into(),
            },
        };
        let json = serde_json::to_value(&embedded).unwrap();
        assert_eq!(json["chunkId"], "chunk_001");
        assert_eq!(json["embedding"][0], 0.1);
    }
}
