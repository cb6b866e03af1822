//! HTTP surface for the voice study assistant backend.

pub mod config;
pub mod elevenlabs_adapter;
pub mod error;
pub mod handlers;
pub mod state;

use axum::extract::DefaultBodyLimit;
use axum::routing::{get, post};
use axum::Router;
use tower_http::cors::{Any, CorsLayer};

use crate::state::AppContext;

/// Builds the application router over the given shared state.
pub fn router(ctx: AppContext, max_upload_bytes: usize) -> Router {
    let cors = CorsLayer::new()
        .allow_origin(Any)
        .allow_methods(Any)
        .allow_headers(Any);

    Router::new()
        .route("/", get(handlers::root))
        .route("/health", get(handlers::health))
        .route("/upload-notes", post(handlers::upload_notes))
        .route("/sst", post(handlers::voice_turn))
        .layer(DefaultBodyLimit::max(max_upload_bytes))
        .layer(cors)
        .with_state(ctx)
}
