//! Audit log API
//!
//! | Path | Method |
//! |------|--------|
//! | /api/audit | GET |

use axum::{
    Json, Router,
    extract::{Query, State},
    routing::get,
};
use serde::Deserialize;

use crate::audit::AuditEntry;
use crate::core::ServerState;
use crate::utils::{AppResponse, AppResult, ok};

pub fn router() -> Router<ServerState> {
    Router::new().route("/api/audit", get(recent))
}

#[derive(Debug, Deserialize)]
pub struct AuditParams {
    pub limit: Option<i64>,
}

/// GET /api/audit - most recent entries, newest first
pub async fn recent(
    State(state): State<ServerState>,
    Query(params): Query<AuditParams>,
) -> AppResult<Json<AppResponse<Vec<AuditEntry>>>> {
    let limit = params.limit.unwrap_or(50).clamp(1, 500);
    let entries = state.audit.recent(limit).await?;
    Ok(ok(entries))
}
