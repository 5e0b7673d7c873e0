//! Process entry-point glue shared by `kotoba-server` and `main.rs`'s
//! default mode: load configuration, initialise logging, wire the router
//! and background tasks, and serve until a shutdown signal — mirroring the
//! teacher's `main.rs` startup sequence (`dotenvy::dotenv()` → tracing
//! init → bind → serve).

use std::net::SocketAddr;
use std::time::Duration;

use crate::answer::{create_router, AppState};
use crate::config::Config;
use crate::logging::{self, LogConfig};

const ADMISSION_SWEEP_INTERVAL: Duration = Duration::from_secs(5 * 60);

/// Run the answering HTTP server until interrupted. Used by both
/// `src/bin/server.rs` and `main.rs`'s default mode.
pub async fn serve() -> Result<(), Box<dyn std::error::Error>> {
    let _ = dotenvy::dotenv();

    let log_config = LogConfig::from_env();
    logging::init_logging(&log_config)?;
    logging::log_platform_info();

    let config = Config::from_env();
    let bind_addr: SocketAddr = std::env::var("BIND_ADDR")
        .unwrap_or_else(|_| "0.0.0.0:3000".to_string())
        .parse()?;

    let state = AppState::new(config);

    let (_audio_janitor, _audio_janitor_shutdown) = state.answer_service.audio_cache().spawn_janitor();

    let admission_for_sweep = state.admission.clone();
    tokio::spawn(async move {
        let mut interval = tokio::time::interval(ADMISSION_SWEEP_INTERVAL);
        loop {
            interval.tick().await;
            admission_for_sweep.sweep();
        }
    });

    let router = create_router(state);
    let listener = tokio::net::TcpListener::bind(bind_addr).await?;
    tracing::info!(addr = %bind_addr, "kotoba-rag answering server listening");

    axum::serve(listener, router.into_make_service_with_connect_info::<SocketAddr>())
        .with_graceful_shutdown(shutdown_signal())
        .await?;

    Ok(())
}

async fn shutdown_signal() {
    let _ = tokio::signal::ctrl_c().await;
    tracing::info!("shutdown signal received, draining connections");
}
