//! `KnowledgeExtractor` (C4): topic segmentation, entity/quote extraction,
//! type classification, importance scoring, and `KnowledgeObject`
//! construction. Split into `segmentation` (topic walk) and `extractor`
//! (everything downstream of a topic segment).

pub mod extractor;
pub mod lexicon;
pub mod segmentation;

pub use extractor::{build_knowledge_objects, extract_entities, extract_quotes, score_importance};
pub use segmentation::{segment_topics_embedding, segment_topics_keyword_fallback, TopicSegment};

use crate::config::PipelineConfig;
use crate::embedding::{EmbeddingClient, EmbeddingProvider};
use crate::error::ServiceResult;
use crate::models::{KnowledgeObject, Paragraph};

/// Run the full C4 stage: segment `paragraphs` into topics (embedding mode
/// when `embedding` is provided, keyword-fallback otherwise) and build one
/// `KnowledgeObject` per non-empty segment.
pub async fn extract_knowledge(
    paragraphs: &[Paragraph],
    config: &PipelineConfig,
    embedding: Option<(&EmbeddingClient, EmbeddingProvider, &str)>,
) -> ServiceResult<Vec<KnowledgeObject>> {
    let segments = match embedding {
        Some((client, provider, model)) => {
            segment_topics_embedding(paragraphs, client, provider, model, config).await?
        }
        None => segment_topics_keyword_fallback(paragraphs, config),
    };

    Ok(build_knowledge_objects(&segments))
}

#[cfg(test)]
mod tests {
    use super::*;

    fn paragraph(id: u32, text: &str) -> Paragraph {
        Paragraph {
            paragraph_id: id,
            sentences: vec![],
            full_text: text.to_string(),
            start_time: format!("t{}", id),
            end_time: format!("t{}e", id),
            segment_ids: vec![id],
        }
    }

    #[tokio::test]
    async fn keyword_fallback_path_is_deterministic_without_embedding_client() {
        let paragraphs = vec![paragraph(1, "黄金率について話します"), paragraph(2, "今日はいい天気ですね")];
        let config = PipelineConfig::default();

        let first = extract_knowledge(&paragraphs, &config, None).await.unwrap();
        let second = extract_knowledge(&paragraphs, &config, None).await.unwrap();

        assert_eq!(first.len(), second.len());
        assert_eq!(first[0].topic, second[0].topic);
        assert_eq!(first[0].knowledge_id, "k001");
    }
}
