pub mod orchestrator;

pub use orchestrator::{run_ingestion, PipelineOptions, PipelineOutputs, Progress};
