use std::env;

/// Combined CLI/server entry point, mirroring the teacher's `main.rs`
/// dual-mode shape: a trivial flag check, otherwise the answering server.
/// The ingestion CLI proper lives in its own `kotoba-ingest` binary
/// (`src/bin/ingest.rs`) since C16 needs real subcommands rather than a
/// single flat flag.
#[tokio::main]
async fn main() -> Result<(), Box<dyn std::error::Error>> {
    let args: Vec<String> = env::args().collect();

    if args.iter().any(|a| a == "--version" || a == "-v") {
        println!("kotoba-rag v{}", env!("CARGO_PKG_VERSION"));
        return Ok(());
    }

    kotoba_rag::runtime::serve().await
}
