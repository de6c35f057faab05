//! HTTP Module
//!
//! Thin REST front end over the engine.
//!
//! ## Routes
//! - `GET /{key}`  → 200 value | 404 `key not found: {key}`
//! - `POST /{key}` → 200 `stored value for key: {key}` | 400 | 500
//!
//! Engine calls are blocking and run on tokio's blocking pool, one per request.

pub mod errors;
pub mod handlers;
mod server;

use std::sync::Arc;

use axum::extract::DefaultBodyLimit;
use axum::routing::get;
use axum::Router;
use tower_http::trace::TraceLayer;

use crate::engine::Engine;

pub use errors::ApiError;
pub use handlers::AppState;
pub use server::Server;

/// Build the router for `engine`, accepting bodies up to `max_body_bytes`
pub fn create_router(engine: Arc<Engine>, max_body_bytes: usize) -> Router {
    let state = AppState { engine };

    Router::new()
        .route(
            "/:key",
            get(handlers::get_value).post(handlers::put_value),
        )
        .layer(DefaultBodyLimit::max(max_body_bytes))
        .layer(TraceLayer::new_for_http())
        .with_state(state)
}
