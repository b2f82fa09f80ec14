use std::sync::Arc;

use khub_versioning::VersioningEngine;

use crate::config::ServerConfig;

/// Shared application state available to all Axum handlers via `State<AppState>`.
///
/// This is cheaply cloneable (inner data is behind `Arc` or is already `Clone`).
#[derive(Clone)]
pub struct AppState {
    /// Live-store connection pool.
    pub pool: khub_db::DbPool,
    /// Server configuration (accessed by middleware and handlers).
    pub config: Arc<ServerConfig>,
    /// Versioning engine coordinating the live and version stores.
    pub engine: Arc<VersioningEngine>,
}
