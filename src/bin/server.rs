//! lsmkv Server Binary
//!
//! Starts the HTTP server for lsmkv.

use std::sync::Arc;

use clap::Parser;
use lsmkv::http::Server;
use lsmkv::{Config, Engine};
use tracing_subscriber::{fmt, EnvFilter};

/// lsmkv Server
#[derive(Parser, Debug)]
#[command(name = "lsmkv-server")]
#[command(about = "Embeddable LSM key-value store over HTTP")]
#[command(version)]
struct Args {
    /// Data directory
    #[arg(short, long, default_value = "./lsmkv_data")]
    data_dir: String,

    /// Listen address (host:port)
    #[arg(short, long, default_value = "127.0.0.1:8080")]
    listen: String,

    /// MemTable entry count that triggers a flush
    #[arg(short, long, default_value_t = lsmkv::config::DEFAULT_FLUSH_THRESHOLD)]
    flush_threshold: usize,

    /// Maximum request body size in KB
    #[arg(long, default_value = "2048")]
    max_body_kb: usize,
}

#[tokio::main]
async fn main() {
    // Initialize tracing/logging
    let filter = EnvFilter::try_from_default_env()
        .unwrap_or_else(|_| EnvFilter::new("info,lsmkv=debug"));

    fmt()
        .with_env_filter(filter)
        .with_target(true)
        .with_thread_ids(true)
        .init();

    let args = Args::parse();

    tracing::info!("lsmkv Server v{}", lsmkv::VERSION);
    tracing::info!("Data directory: {}", args.data_dir);
    tracing::info!("Listen address: {}", args.listen);

    // Build config from args
    let config = Config::builder()
        .data_dir(&args.data_dir)
        .listen_addr(&args.listen)
        .flush_threshold(args.flush_threshold)
        .max_body_bytes(args.max_body_kb * 1024)
        .build();

    // Open engine
    let engine = match Engine::open(config.clone()) {
        Ok(e) => Arc::new(e),
        Err(e) => {
            tracing::error!("Failed to open engine: {}", e);
            std::process::exit(1);
        }
    };

    tracing::info!("Engine initialized successfully");

    let server = Server::new(config, Arc::clone(&engine));
    if let Err(e) = server.run(shutdown_signal()).await {
        tracing::error!("Server error: {}", e);
        std::process::exit(1);
    }

    // Flush whatever is still buffered
    match Arc::try_unwrap(engine) {
        Ok(engine) => {
            if let Err(e) = engine.close() {
                tracing::error!("Failed to close engine: {}", e);
                std::process::exit(1);
            }
        }
        Err(engine) => {
            tracing::warn!("Engine still shared at shutdown, flushing in place");
            if let Err(e) = engine.flush() {
                tracing::error!("Final flush failed: {}", e);
                std::process::exit(1);
            }
        }
    }

    tracing::info!("Server stopped");
}

/// Resolves on Ctrl+C
async fn shutdown_signal() {
    if let Err(e) = tokio::signal::ctrl_c().await {
        tracing::error!("Failed to listen for Ctrl+C: {}", e);
        std::future::pending::<()>().await;
    }
    tracing::info!("Received Ctrl+C, initiating shutdown...");
}
