//! mixer-bot library
//!
//! Discord bot that archives YouTube links posted in one guild channel and
//! answers slash commands about the archive.

use axum::Router;
use ed25519_dalek::VerifyingKey;
use sqlx::SqlitePool;
use std::path::PathBuf;
use std::sync::Arc;
use tower_http::trace::TraceLayer;

pub mod api;
pub mod commands;
pub mod error;
pub mod services;

use services::{IngestPipeline, MessageSource};

/// Application state shared across HTTP handlers
#[derive(Clone)]
pub struct AppState {
    pub db: SqlitePool,
    pub pipeline: IngestPipeline,
    /// Channel history for `scanmusic`
    pub messages: Arc<dyn MessageSource>,
    /// Where `setchannel` and `setadminrole` persist their values
    pub server_config_path: PathBuf,
    /// Channel read from the server config at startup
    pub target_channel: Option<String>,
    /// Application key that signs interaction requests
    pub public_key: VerifyingKey,
}

impl AppState {
    pub fn new(
        pipeline: IngestPipeline,
        messages: Arc<dyn MessageSource>,
        server_config_path: PathBuf,
        target_channel: Option<String>,
        public_key: VerifyingKey,
    ) -> Self {
        Self {
            db: pipeline.db().clone(),
            pipeline,
            messages,
            server_config_path,
            target_channel,
            public_key,
        }
    }
}

/// Build application router
///
/// `/interactions` sits behind the signature check; `/health` does not.
pub fn build_router(state: AppState) -> Router {
    use axum::middleware;
    use axum::routing::post;

    let signed = Router::new()
        .route("/interactions", post(api::handle_interaction))
        .layer(middleware::from_fn_with_state(
            state.clone(),
            api::verify_signature,
        ));

    Router::new()
        .merge(signed)
        .merge(api::health_routes())
        .layer(TraceLayer::new_for_http())
        .with_state(state)
}
