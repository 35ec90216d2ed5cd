//! API routing
//!
//! # Structure
//!
//! - [`health`] - health check
//! - [`categories`] - category hierarchy management
//! - [`audit`] - audit log reads

use axum::Router;
use tower_http::{cors::CorsLayer, trace::TraceLayer};

use crate::core::ServerState;

pub mod audit;
pub mod categories;
pub mod health;

// Re-export common types for handlers
pub use crate::utils::{AppResponse, AppResult};

/// Merge every resource router (no middleware)
pub fn build_router() -> Router<ServerState> {
    Router::new()
        .merge(health::router())
        .merge(categories::router())
        .merge(audit::router())
}

/// Full application: routers plus CORS and request tracing
pub fn build_app(state: ServerState) -> Router {
    build_router()
        .layer(TraceLayer::new_for_http())
        .layer(CorsLayer::permissive())
        .with_state(state)
}
