//! Category Model

use super::serde_helpers;
use chrono::NaiveDateTime;
use serde::{Deserialize, Serialize};

/// Category lifecycle status
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, sqlx::Type)]
#[sqlx(rename_all = "UPPERCASE")]
#[serde(rename_all = "UPPERCASE")]
pub enum CategoryStatus {
    Active,
    Inactive,
}

/// Category model
///
/// `parent_id = NULL` marks a root category. Depth is derived by walking the
/// parent chain and is bounded at three levels.
#[derive(Debug, Clone, Serialize, Deserialize, sqlx::FromRow)]
#[serde(rename_all = "camelCase")]
pub struct Category {
    pub id: i64,
    pub name: String,
    pub description: String,
    /// Unique URL-safe identifier, derived from `name` unless supplied
    pub slug: String,
    pub parent_id: Option<i64>,
    pub status: CategoryStatus,
    pub created_at: NaiveDateTime,
    pub updated_at: NaiveDateTime,
}

impl Category {
    pub fn is_active(&self) -> bool {
        self.status == CategoryStatus::Active
    }
}

#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct CategoryCreate {
    pub name: String,
    pub description: String,
    /// Explicit slug; generated from `name` when absent or blank
    pub slug: Option<String>,
    pub parent_id: Option<i64>,
}

#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct CategoryUpdate {
    #[serde(skip_serializing_if = "Option::is_none")]
    pub name: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub description: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub slug: Option<String>,
    /// Absent = keep current parent; `null` = promote to root
    #[serde(
        default,
        skip_serializing_if = "Option::is_none",
        deserialize_with = "serde_helpers::double_option"
    )]
    pub parent_id: Option<Option<i64>>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub status: Option<CategoryStatus>,
}
