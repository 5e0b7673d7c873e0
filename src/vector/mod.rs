pub mod client;
pub mod providers;

pub use client::{UpsertOptions, VectorIndexClient};
pub use providers::VectorProvider;
