//! HTTP Server
//!
//! Binds the listener and serves the router until shutdown is signalled.

use std::future::Future;
use std::sync::Arc;

use crate::config::Config;
use crate::engine::Engine;
use crate::error::Result;

use super::create_router;

/// HTTP server for lsmkv
pub struct Server {
    config: Config,
    engine: Arc<Engine>,
}

impl Server {
    /// Create a new server with the given config and engine
    pub fn new(config: Config, engine: Arc<Engine>) -> Self {
        Self { config, engine }
    }

    /// Serve until `shutdown` resolves, then drain in-flight requests
    pub async fn run<F>(self, shutdown: F) -> Result<()>
    where
        F: Future<Output = ()> + Send + 'static,
    {
        let listener = tokio::net::TcpListener::bind(self.config.listen_addr.as_str()).await?;
        tracing::info!("Listening on {}", listener.local_addr()?);

        let app = create_router(self.engine, self.config.max_body_bytes);
        axum::serve(listener, app)
            .with_graceful_shutdown(shutdown)
            .await?;

        tracing::info!("HTTP server stopped");
        Ok(())
    }
}
