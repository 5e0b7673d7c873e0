pub mod client;

pub use client::TTSClient;
