// Library modules for integration tests and the server/ingest binaries.
pub mod admission;
pub mod answer;
pub mod chunking;
pub mod cli;
pub mod config;
pub mod embedding;
pub mod error;
pub mod knowledge;
pub mod llm;
pub mod logging;
pub mod models;
pub mod pipeline;
pub mod runtime;
pub mod text_processing;
pub mod tts;
pub mod utils;
pub mod vector;
