pub mod chunk;
pub mod knowledge;
pub mod request;
pub mod response;
pub mod transcript;
pub mod vector;

pub use chunk::{Chunk, ChunkMetadata, EmbeddedChunk, EmbeddingMetadata};
pub use knowledge::{Entities, Importance, KnowledgeContent, KnowledgeMetadata, KnowledgeObject, KnowledgeType};
pub use request::{ChatRequest, HistoryTurn, Role};
pub use response::{ChatResponse, ChatResponseMetadata, HealthEnvironment, HealthResponse, Source};
pub use transcript::{CleanedParagraph, CleaningFlags, Correction, Paragraph, Segment, Sentence};
pub use vector::{FlatMetadata, IndexDescription, Match, NamespaceStats, VectorRecord};
