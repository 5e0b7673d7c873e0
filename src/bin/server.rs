//! Dedicated answering-server binary (C12 external interfaces). Thin
//! wrapper over `kotoba_rag::runtime::serve`, kept separate from `main.rs`
//! so a deployment can run exactly this process without the version-flag
//! dispatch `main.rs` carries for parity with the teacher's combined entry
//! point.

#[tokio::main]
async fn main() -> Result<(), Box<dyn std::error::Error>> {
    kotoba_rag::runtime::serve().await
}
