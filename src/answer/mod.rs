pub mod audio_cache;
pub mod prompt;
pub mod retriever;
pub mod router;
pub mod service;

pub use audio_cache::AudioCache;
pub use retriever::Retriever;
pub use router::{create_router, AppState};
pub use service::AnswerService;
