pub mod client;
pub mod providers;

pub use client::{EmbeddingClient, EmbeddingRequest};
pub use providers::{find_model, list_models, EmbeddingProvider, ModelSpec, MODEL_CATALOGUE};
