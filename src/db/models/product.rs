//! Product reference model
//!
//! Product CRUD lives outside this service; categories only need the
//! reference fields to count and relocate products across transitions.

use serde::{Deserialize, Serialize};

/// Product reference as seen by the category engine
#[derive(Debug, Clone, Serialize, Deserialize, sqlx::FromRow)]
#[serde(rename_all = "camelCase")]
pub struct ProductRef {
    pub id: i64,
    pub name: String,
    pub sku: String,
    pub category_id: i64,
}
