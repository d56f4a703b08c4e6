use std::sync::Arc;

use shelfwatch_core::criteria::RelationResolver;

use crate::config::ServerConfig;

/// Shared application state available to all Axum handlers via
/// `State<AppState>`.
///
/// This is cheaply cloneable (inner data is behind `Arc` or is already
/// `Clone`).
#[derive(Clone)]
pub struct AppState {
    /// Database connection pool.
    pub pool: shelfwatch_db::DbPool,
    /// Server configuration.
    pub config: Arc<ServerConfig>,
    /// Centralized event bus; item ingestion publishes here and the
    /// dispatch engine consumes.
    pub event_bus: Arc<shelfwatch_events::EventBus>,
    /// Relation display-name resolver used for criteria summaries.
    pub resolver: Arc<dyn RelationResolver>,
}
