pub mod hooks;

pub use hooks::{
    cleanup_namespace, describe_index, list_embedding_models, process_transcript, process_with_namespace,
    reupload_embeddings,
};
