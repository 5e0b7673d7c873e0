use serde::{Deserialize, Serialize};

/// Classification bucket assigned by the knowledge extractor's type
/// classifier. First match wins in the order the variants are listed here.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum KnowledgeType {
    Advice,
    Principle,
    BiographicalEvent,
    Anecdote,
    General,
}

impl Default for KnowledgeType {
    fn default() -> Self {
        KnowledgeType::General
    }
}

/// Importance bucket from the extractor's scoring rule.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Importance {
    High,
    Medium,
    Low,
}

impl Importance {
    /// Bucket a raw score per the documented thresholds: >=4 high, >=2 medium, else low.
    pub fn from_score(score: i32) -> Self {
        if score >= 4 {
            Importance::High
        } else if score >= 2 {
            Importance::Medium
        } else {
            Importance::Low
        }
    }
}

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct KnowledgeContent {
    pub main: String,
    pub context: String,
    pub quotes: Vec<String>,
    pub key_takeaway: String,
}

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Entities {
    pub people: Vec<String>,
    pub concepts: Vec<String>,
    pub organizations: Vec<String>,
    pub ages: Vec<String>,
    pub numbers: Vec<String>,
}

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct KnowledgeMetadata {
    pub importance: Option<Importance>,
    pub category: String,
    pub sentiment: String,
    pub themes: Vec<String>,
    pub segment_ids: Vec<u32>,
}

/// A topic-scoped unit of meaning assembled from one or more paragraphs that
/// share a topic label, per `KnowledgeExtractor` (C4).
///
/// Invariant: `timestamp` bounds equal the first/last contained paragraph's
/// bounds.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct KnowledgeObject {
    pub knowledge_id: String,
    pub topic: String,
    #[serde(rename = "type")]
    pub kind: KnowledgeType,
    pub content: KnowledgeContent,
    pub entities: Entities,
    pub start_time: String,
    pub end_time: String,
    pub metadata: KnowledgeMetadata,
}

impl KnowledgeObject {
    pub fn id_for_index(index: usize) -> String {
        format!("k{:03}", index + 1)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn importance_buckets_match_thresholds() {
        assert_eq!(Importance::from_score(5), Importance::High);
        assert_eq!(Importance::from_score(4), Importance::High);
        assert_eq!(Importance::from_score(3), Importance::Medium);
        assert_eq!(Importance::from_score(2), Importance::Medium);
        assert_eq!(Importance::from_score(1), Importance::Low);
        assert_eq!(Importance::from_score(0), Importance::Low);
    }

    #[test]
    fn knowledge_id_is_zero_padded() {
        assert_eq!(KnowledgeObject::id_for_index(0), "k001");
        assert_eq!(KnowledgeObject::id_for_index(99), "k100");
    }

    #[test]
    fn type_serializes_snake_case() {
        let json = serde_json::to_string(&KnowledgeType::BiographicalEvent).unwrap();
        assert_eq!(json, "\"biographical_event\"");
    }
}
