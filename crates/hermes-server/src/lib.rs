//! HTTP front end for the Hermes extraction service.
//!
//! Exposes two surfaces: `GET /health` for liveness and `PUT` on any
//! other path, which accepts a multipart archive upload and unpacks it
//! into the matching subdirectory of the configured base directory.

#![deny(unsafe_code)]
#![warn(missing_docs)]

pub mod auth;
pub mod error;
pub mod handlers;
pub mod settings;
pub mod types;

use std::collections::HashMap;
use std::path::PathBuf;
use std::sync::Arc;

use axum::Router;
use axum::extract::DefaultBodyLimit;
use axum::routing::get;
use axum::routing::put;
use tokio::sync::Mutex;
use tower_http::trace::TraceLayer;

use crate::settings::Settings;

/// Shared state injected into every handler.
#[derive(Clone)]
pub struct AppState {
    /// Startup configuration.
    pub settings: Arc<Settings>,
    /// Per-destination extraction locks, created lazily on first upload
    /// to a path.
    pub locks: Arc<Mutex<HashMap<PathBuf, Arc<Mutex<()>>>>>,
}

impl AppState {
    /// Wraps settings into fresh shared state.
    #[must_use]
    pub fn new(settings: Settings) -> Self {
        Self {
            settings: Arc::new(settings),
            locks: Arc::new(Mutex::new(HashMap::new())),
        }
    }
}

/// Builds the service router.
///
/// The default body limit is lifted because archive uploads routinely
/// exceed axum's 2 MB default; uploads are bounded by disk, not memory
/// policy.
#[must_use]
pub fn build_router(state: AppState) -> Router {
    Router::new()
        .route("/health", get(handlers::health))
        .route("/", put(handlers::upload_root))
        .route("/{*path}", put(handlers::upload))
        .layer(DefaultBodyLimit::disable())
        .layer(TraceLayer::new_for_http())
        .with_state(state)
}

/// Binds the configured address and serves until the process is stopped.
///
/// # Errors
///
/// Fails when the address cannot be bound or the server loop aborts.
pub async fn start_server(settings: Settings) -> anyhow::Result<()> {
    let addr = settings.bind_addr.clone();
    let state = AppState::new(settings);

    let listener = tokio::net::TcpListener::bind(&addr).await?;
    tracing::info!("listening on {}", listener.local_addr()?);
    axum::serve(listener, build_router(state)).await?;
    Ok(())
}
