//! Offline ingestion CLI (C16): a `clap`-derived subcommand front-end over
//! the library hooks in `kotoba_rag::cli::hooks`. The teacher's own CLI is
//! a single flat command (`--server`, optional text argument); C16 needs
//! real subcommands (`run`, `reupload`, `cleanup`, `describe`,
//! `list-models`), which is what `clap::Parser` + `#[derive(Subcommand)]`
//! is for.

use std::io::{self, Write};
use std::path::PathBuf;

use clap::{Parser, Subcommand};

use kotoba_rag::cli::hooks;
use kotoba_rag::config::Config;

#[derive(Parser)]
#[command(name = "kotoba-ingest", about = "Ingest Japanese spoken-transcript subtitles into the RAG vector index")]
struct Cli {
    #[command(subcommand)]
    command: Command,
}

#[derive(Subcommand)]
enum Command {
    /// Run the full seven-stage pipeline over a subtitle file.
    Run {
        path: PathBuf,
        /// Target namespace, overriding the configured default.
        #[arg(long)]
        namespace: Option<String>,
    },
    /// Re-upsert a previously saved `06-embeddings.json` artefact without
    /// re-running stages 1-6.
    Reupload {
        embeddings_path: PathBuf,
        #[arg(long)]
        namespace: Option<String>,
    },
    /// Delete every vector in a namespace. Prompts for confirmation unless
    /// `--yes` is passed.
    Cleanup {
        namespace: String,
        #[arg(long)]
        yes: bool,
    },
    /// Print the vector index's shape and per-namespace counts.
    Describe,
    /// List the embedding model catalogue.
    ListModels,
}

#[tokio::main]
async fn main() -> Result<(), Box<dyn std::error::Error>> {
    let _ = dotenvy::dotenv();
    tracing_subscriber::fmt()
        .with_env_filter(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| tracing_subscriber::EnvFilter::new("kotoba_rag=info")),
        )
        .with_target(false)
        .compact()
        .init();

    let cli = Cli::parse();
    let config = Config::from_env();

    match cli.command {
        Command::Run { path, namespace } => {
            let outputs = match namespace {
                Some(ns) => hooks::process_with_namespace(&path, &config, &ns).await?,
                None => hooks::process_transcript(&path, &config).await?,
            };
            println!(
                "ingested {} segments -> {} knowledge objects -> {} chunks ({} embedded)",
                outputs.segments.len(),
                outputs.knowledge.len(),
                outputs.chunks.len(),
                outputs.embedded.len()
            );
        }
        Command::Reupload { embeddings_path, namespace } => {
            hooks::reupload_embeddings(&embeddings_path, &config, namespace.as_deref()).await?;
            println!("reupload complete");
        }
        Command::Cleanup { namespace, yes } => {
            let confirmed = yes || confirm_destructive(&namespace)?;
            hooks::cleanup_namespace(&config.vector.index_name, &namespace, &config, confirmed).await?;
            println!("namespace '{}' cleared", namespace);
        }
        Command::Describe => {
            let description = hooks::describe_index(&config.vector.index_name, &config).await?;
            println!("{}", serde_json::to_string_pretty(&description)?);
        }
        Command::ListModels => {
            for model in hooks::list_embedding_models() {
                println!("{:<32} {:>5}d  {}", model.alias, model.dimensions, model.api_model_id);
            }
        }
    }

    Ok(())
}

/// Interactive y/n prompt guarding `cleanup`'s destructive delete; matches
/// the teacher's avoidance of a heavyweight TUI dependency.
fn confirm_destructive(namespace: &str) -> io::Result<bool> {
    print!("This will permanently delete every vector in namespace '{}'. Continue? [y/N] ", namespace);
    io::stdout().flush()?;
    let mut input = String::new();
    io::stdin().read_line(&mut input)?;
    Ok(matches!(input.trim().to_lowercase().as_str(), "y" | "yes"))
}
