//! Audit log
//!
//! Append-only action log for category transitions. Recording is
//! best-effort: a failed insert is logged and swallowed so it never fails
//! the operation that produced it.

use crate::db::repository::RepoResult;
use chrono::NaiveDateTime;
use serde::{Deserialize, Serialize};
use sqlx::SqlitePool;

/// Audited action kind (enum, not free text)
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, sqlx::Type)]
#[sqlx(rename_all = "UPPERCASE")]
#[serde(rename_all = "UPPERCASE")]
pub enum AuditKind {
    Create,
    Update,
    Delete,
    /// Deactivation (possibly cascading over a subtree)
    Inactive,
    /// Reactivation
    Active,
    /// Product relocation between categories
    Move,
}

impl std::fmt::Display for AuditKind {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{:?}", self)
    }
}

/// Audit log entry (immutable once written)
#[derive(Debug, Clone, Serialize, Deserialize, sqlx::FromRow)]
#[serde(rename_all = "camelCase")]
pub struct AuditEntry {
    pub id: i64,
    pub kind: AuditKind,
    /// Entity type the action applied to (e.g. "Category")
    pub entity: String,
    pub message: String,
    /// Operator id; `None` for system-initiated actions
    pub actor_id: Option<i64>,
    pub created_at: NaiveDateTime,
}

/// Best-effort append-only recorder over the `audit_log` table
#[derive(Clone)]
pub struct AuditRecorder {
    pool: SqlitePool,
}

impl AuditRecorder {
    pub fn new(pool: SqlitePool) -> Self {
        Self { pool }
    }

    /// Record an action. Failures are logged at warn level and swallowed.
    pub async fn record(
        &self,
        kind: AuditKind,
        entity: &str,
        message: impl Into<String>,
        actor_id: Option<i64>,
    ) {
        let message = message.into();
        let result = sqlx::query(
            "INSERT INTO audit_log (kind, entity, message, actor_id) VALUES (?, ?, ?, ?)",
        )
        .bind(kind)
        .bind(entity)
        .bind(&message)
        .bind(actor_id)
        .execute(&self.pool)
        .await;

        if let Err(e) = result {
            tracing::warn!(
                kind = %kind,
                entity,
                error = %e,
                "Failed to record audit entry, continuing"
            );
        }
    }

    /// Most recent entries, newest first
    pub async fn recent(&self, limit: i64) -> RepoResult<Vec<AuditEntry>> {
        let entries = sqlx::query_as::<_, AuditEntry>(
            "SELECT * FROM audit_log ORDER BY id DESC LIMIT ?",
        )
        .bind(limit)
        .fetch_all(&self.pool)
        .await?;
        Ok(entries)
    }
}
