//! `SemanticChunker` (C5): emits 200-1000-char storage-ready `Chunk`s from
//! `KnowledgeObject`s, splitting at sentence terminators and never mid-sentence.
//! Grounded in the teacher's `chunking::chunk_text` sentence-boundary splitter,
//! generalised from a flat `Vec<String>` of TTS chunks to metadata-bearing
//! `Chunk`s with validation against the storage contract.

use crate::config::PipelineConfig;
use crate::error::{ServiceError, ServiceResult};
use crate::knowledge::lexicon::IMPORTANCE_LEXICON;
use crate::models::{Chunk, ChunkMetadata, KnowledgeObject};

const SENTENCE_TERMINATORS: &[char] = &['。', '！', '？'];
const VALIDATION_MIN: usize = 100;
const VALIDATION_MAX: usize = 1200;

/// Split `content` into sentence-respecting pieces of at most `max_size`
/// chars, greedily accumulating sentences while the next one would not
/// overflow the budget and the accumulator has not yet reached `min_size`.
/// The final remainder is always flushed regardless of size.
fn split_into_chunks(content: &str, min_size: usize, max_size: usize) -> Vec<String> {
    if content.chars().count() <= max_size {
        return vec![content.to_string()];
    }

    let sentences = split_into_sentences(content);
    let mut pieces = Vec::new();
    let mut current = String::new();

    for sentence in sentences {
        let sentence_len = sentence.chars().count();
        let current_len = current.chars().count();

        if current_len > 0 && current_len >= min_size && current_len + sentence_len > max_size {
            pieces.push(current.trim().to_string());
            current = sentence;
        } else {
            current.push_str(&sentence);
        }
    }

    if !current.trim().is_empty() {
        pieces.push(current.trim().to_string());
    }

    if pieces.is_empty() {
        pieces.push(content.to_string());
    }

    pieces
}

/// Split on `。！？`, keeping the terminator attached to its sentence.
fn split_into_sentences(text: &str) -> Vec<String> {
    let mut sentences = Vec::new();
    let mut current = String::new();

    for ch in text.chars() {
        current.push(ch);
        if SENTENCE_TERMINATORS.contains(&ch) {
            sentences.push(std::mem::take(&mut current));
        }
    }
    if !current.is_empty() {
        sentences.push(current);
    }

    sentences
}

fn keywords_for(object: &KnowledgeObject, content: &str) -> Vec<String> {
    let mut keywords: Vec<String> = Vec::new();
    keywords.extend(object.entities.people.iter().cloned());
    keywords.extend(object.entities.concepts.iter().cloned());
    keywords.extend(object.entities.organizations.iter().cloned());

    for term in IMPORTANCE_LEXICON {
        if content.contains(term) && !keywords.iter().any(|k| k == term) {
            keywords.push(term.to_string());
        }
    }

    keywords
}

fn validate_chunk(chunk: &Chunk) -> ServiceResult<()> {
    if chunk.chunk_id.is_empty() {
        return Err(ServiceError::Internal("chunk id must not be empty".into()));
    }
    if chunk.metadata.topic.is_empty() {
        return Err(ServiceError::Internal(format!("chunk {} missing topic metadata", chunk.chunk_id)));
    }
    let len = chunk.content.chars().count();
    if !(VALIDATION_MIN..=VALIDATION_MAX).contains(&len) {
        return Err(ServiceError::Internal(format!(
            "chunk {} content length {} outside [{}, {}]",
            chunk.chunk_id, len, VALIDATION_MIN, VALIDATION_MAX
        )));
    }
    Ok(())
}

/// Emit chunks for every `KnowledgeObject` in order, threading
/// `contextBefore`/`contextAfter` topic labels between adjacent objects.
pub fn chunk_knowledge_objects(objects: &[KnowledgeObject], config: &PipelineConfig) -> ServiceResult<Vec<Chunk>> {
    let mut chunks = Vec::new();

    for (index, object) in objects.iter().enumerate() {
        let context_before = if index > 0 { Some(objects[index - 1].topic.clone()) } else { None };
        let context_after = if index + 1 < objects.len() { Some(objects[index + 1].topic.clone()) } else { None };

        let pieces = split_into_chunks(&object.content.context, config.min_chunk_size, config.max_chunk_size);
        let total_parts = pieces.len();

        for (part_index, piece) in pieces.into_iter().enumerate() {
            let chunk_id = if total_parts > 1 {
                format!("chunk_{:03}_{}", index + 1, part_index)
            } else {
                format!("chunk_{:03}", index + 1)
            };

            let keywords = keywords_for(object, &piece);

            let metadata = ChunkMetadata {
                topic: object.topic.clone(),
                knowledge_id: object.knowledge_id.clone(),
                people: object.entities.people.clone(),
                concepts: object.entities.concepts.clone(),
                organizations: object.entities.organizations.clone(),
                start_time: object.start_time.clone(),
                end_time: object.end_time.clone(),
                importance: object.metadata.importance,
                category: object.metadata.category.clone(),
                keywords,
                context_before: context_before.clone(),
                context_after: context_after.clone(),
                segment_ids: object.metadata.segment_ids.clone(),
                language: "ja".to_string(),
                part_index: if total_parts > 1 { Some(part_index as u32) } else { None },
                total_parts: if total_parts > 1 { Some(total_parts as u32) } else { None },
            };

            let chunk = Chunk::new(chunk_id, piece, metadata);
            validate_chunk(&chunk)?;
            chunks.push(chunk);
        }
    }

    Ok(chunks)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::models::{Entities, KnowledgeContent, KnowledgeMetadata, KnowledgeType};

    fn object(id: &str, topic: &str, context: &str) -> KnowledgeObject {
        KnowledgeObject {
            knowledge_id: id.to_string(),
            topic: topic.to_string(),
            kind: KnowledgeType::General,
            content: KnowledgeContent { main: context.chars().take(50).collect(), context: context.to_string(), quotes: vec![], key_takeaway: "".into() },
            entities: Entities::default(),
            start_time: "t0".into(),
            end_time: "t1".into(),
            metadata: KnowledgeMetadata { importance: None, category: "general".into(), sentiment: "neutral".into(), themes: vec![], segment_ids: vec![1] },
        }
    }

    #[test]
    fn short_object_emits_a_single_chunk() {
        let long_enough = "これは黄金率についての大切な話です。".repeat(6);
        let objects = vec![object("k001", "黄金率", &long_enough)];
        let config = PipelineConfig::default();
        let chunks = chunk_knowledge_objects(&objects, &config).unwrap();
        assert_eq!(chunks.len(), 1);
        assert_eq!(chunks[0].chunk_id, "chunk_001");
        assert!(chunks[0].metadata.part_index.is_none());
    }

    #[test]
    fn long_object_splits_at_sentence_boundaries_and_never_mid_sentence() {
        let sentence = "これは黄金率についてのとても大切で深い話です。";
        let long_text = sentence.repeat(40);
        let objects = vec![object("k001", "黄金率", &long_text)];
        let mut config = PipelineConfig::default();
        config.max_chunk_size = 200;
        config.min_chunk_size = 100;

        let chunks = chunk_knowledge_objects(&objects, &config).unwrap();
        assert!(chunks.len() > 1);
        for chunk in &chunks {
            let trimmed = chunk.content.trim_end();
            let is_final_fragment = chunk.metadata.part_index == Some(chunk.metadata.total_parts.unwrap() - 1);
            if !is_final_fragment {
                assert!(trimmed.ends_with(['。', '！', '？']));
            }
        }
    }

    #[test]
    fn context_before_and_after_reference_adjacent_topics() {
        let objects = vec![
            object("k001", "黄金率", &"黄金率の話です。".repeat(20)),
            object("k002", "人生", &"人生についての話です。".repeat(20)),
        ];
        let config = PipelineConfig::default();
        let chunks = chunk_knowledge_objects(&objects, &config).unwrap();
        let first_topic_chunks: Vec<_> = chunks.iter().filter(|c| c.metadata.topic == "黄金率").collect();
        assert!(first_topic_chunks[0].metadata.context_before.is_none());
        assert_eq!(first_topic_chunks[0].metadata.context_after.as_deref(), Some("人生"));
    }

    #[test]
    fn exactly_max_chunk_size_emits_one_chunk() {
        let content: String = "あ".repeat(1000);
        let objects = vec![object("k001", "topic", &content)];
        let config = PipelineConfig::default();
        let chunks = chunk_knowledge_objects(&objects, &config).unwrap();
        assert_eq!(chunks.len(), 1);
    }

    #[test]
    fn keywords_union_entities_and_importance_lexicon() {
        let mut obj = object("k001", "黄金率", &"黄金率と信頼についての大切な話です。".repeat(10));
        obj.entities.concepts = vec!["黄金率".to_string()];
        let config = PipelineConfig::default();
        let chunks = chunk_knowledge_objects(&[obj], &config).unwrap();
        assert!(chunks[0].metadata.keywords.contains(&"黄金率".to_string()));
        assert!(chunks[0].metadata.keywords.contains(&"信頼".to_string()));
    }
}
