use serde::{Deserialize, Serialize};
use std::collections::HashMap;

/// A flat, scalar-only metadata mapping. Arrays are flattened to
/// comma-separated strings before they ever reach this type; `content` is
/// truncated to 1000 chars here while the full text stays on the `Chunk`.
pub type FlatMetadata = HashMap<String, serde_json::Value>;

/// Upsert record for the vector index. `id` equals the source chunk's
/// `chunkId`.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct VectorRecord {
    pub id: String,
    pub values: Vec<f32>,
    pub metadata: FlatMetadata,
}

/// A single retrieval result.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Match {
    pub id: String,
    pub score: f32,
    pub metadata: FlatMetadata,
}

/// Namespace-scoped vector counts as reported by `describe`.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct NamespaceStats {
    pub record_count: Option<u64>,
    pub vector_count: Option<u64>,
}

impl NamespaceStats {
    /// `recordCount` is authoritative; fall back to `vectorCount` when absent.
    pub fn authoritative_count(&self) -> u64 {
        self.record_count.or(self.vector_count).unwrap_or(0)
    }
}

#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct IndexDescription {
    pub dimension: usize,
    pub total_vector_count: u64,
    pub namespaces: HashMap<String, NamespaceStats>,
    pub index_fullness: Option<f32>,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn record_count_is_authoritative_over_vector_count() {
        let stats = NamespaceStats { record_count: Some(10), vector_count: Some(99) };
        assert_eq!(stats.authoritative_count(), 10);
    }

    #[test]
    fn falls_back_to_vector_count_when_record_count_absent() {
        let stats = NamespaceStats { record_count: None, vector_count: Some(42) };
        assert_eq!(stats.authoritative_count(), 42);
    }

    #[test]
    fn defaults_to_zero_when_both_absent() {
        let stats = NamespaceStats::default();
        assert_eq!(stats.authoritative_count(), 0);
    }

    #[test]
    fn index_description_serializes_fields_as_camel_case() {
        let mut namespaces = HashMap::new();
        namespaces.insert("default".to_string(), NamespaceStats { record_count: Some(5), vector_count: None });
        let description = IndexDescription { dimension: 768, total_vector_count: 5, namespaces, index_fullness: Some(0.01) };
        let json = serde_json::to_value(&description).unwrap();
        assert_eq!(json["totalVectorCount"], 5);
        assert_eq!(json["indexFullness"], 0.01);
        assert_eq!(json["namespaces"]["default"]["recordCount"], 5);
    }
}
