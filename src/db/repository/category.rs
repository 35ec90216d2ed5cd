//! Category Repository
//!
//! Data-access facade over the persisted category table. All tree logic
//! (depth, subtree membership, cascades) lives in `catalog`; this module only
//! reads and writes rows.

use super::{RepoError, RepoResult, in_placeholders};
use crate::db::models::{Category, CategoryStatus};
use sqlx::{SqliteExecutor, SqlitePool};

#[derive(Clone)]
pub struct CategoryRepository {
    pool: SqlitePool,
}

/// Partial row update. `None` fields are left untouched; `parent_id` uses a
/// second `Option` level so an explicit `NULL` can promote a row to root.
#[derive(Debug, Default)]
pub struct CategoryPatch {
    pub name: Option<String>,
    pub description: Option<String>,
    pub slug: Option<String>,
    pub parent_id: Option<Option<i64>>,
    pub status: Option<CategoryStatus>,
}

impl CategoryRepository {
    pub fn new(pool: SqlitePool) -> Self {
        Self { pool }
    }

    /// Find all categories ordered by name
    pub async fn find_all(&self) -> RepoResult<Vec<Category>> {
        let categories = sqlx::query_as::<_, Category>("SELECT * FROM category ORDER BY name")
            .fetch_all(&self.pool)
            .await?;
        Ok(categories)
    }

    /// Find all active categories, optionally excluding one id
    ///
    /// Used to offer relocation targets, where the source itself must not
    /// appear in the list.
    pub async fn find_active(&self, exclude_id: Option<i64>) -> RepoResult<Vec<Category>> {
        let categories = match exclude_id {
            Some(id) => {
                sqlx::query_as::<_, Category>(
                    "SELECT * FROM category WHERE status = ? AND id != ? ORDER BY name",
                )
                .bind(CategoryStatus::Active)
                .bind(id)
                .fetch_all(&self.pool)
                .await?
            }
            None => {
                sqlx::query_as::<_, Category>(
                    "SELECT * FROM category WHERE status = ? ORDER BY name",
                )
                .bind(CategoryStatus::Active)
                .fetch_all(&self.pool)
                .await?
            }
        };
        Ok(categories)
    }

    /// Find category by id
    pub async fn find_by_id(&self, id: i64) -> RepoResult<Option<Category>> {
        let category = sqlx::query_as::<_, Category>("SELECT * FROM category WHERE id = ?")
            .bind(id)
            .fetch_optional(&self.pool)
            .await?;
        Ok(category)
    }

    /// Find category by slug
    pub async fn find_by_slug(&self, slug: &str) -> RepoResult<Option<Category>> {
        let category = sqlx::query_as::<_, Category>("SELECT * FROM category WHERE slug = ?")
            .bind(slug)
            .fetch_optional(&self.pool)
            .await?;
        Ok(category)
    }

    /// Find the direct children of a category
    pub async fn find_children(&self, parent_id: i64) -> RepoResult<Vec<Category>> {
        let children =
            sqlx::query_as::<_, Category>("SELECT * FROM category WHERE parent_id = ? ORDER BY id")
                .bind(parent_id)
                .fetch_all(&self.pool)
                .await?;
        Ok(children)
    }

    /// Load several categories by id
    pub async fn find_by_ids(&self, ids: &[i64]) -> RepoResult<Vec<Category>> {
        if ids.is_empty() {
            return Ok(Vec::new());
        }
        let sql = format!(
            "SELECT * FROM category WHERE id IN ({}) ORDER BY id",
            in_placeholders(ids.len())
        );
        let mut query = sqlx::query_as::<_, Category>(&sql);
        for id in ids {
            query = query.bind(id);
        }
        Ok(query.fetch_all(&self.pool).await?)
    }

    /// Check whether a slug is already owned by a different category
    pub async fn slug_taken(&self, slug: &str, exclude_id: Option<i64>) -> RepoResult<bool> {
        let owner: Option<i64> = sqlx::query_scalar("SELECT id FROM category WHERE slug = ?")
            .bind(slug)
            .fetch_optional(&self.pool)
            .await?;
        Ok(match (owner, exclude_id) {
            (Some(owner_id), Some(excluded)) => owner_id != excluded,
            (Some(_), None) => true,
            (None, _) => false,
        })
    }

    /// Insert a new category row
    pub async fn insert(
        &self,
        name: &str,
        description: &str,
        slug: &str,
        parent_id: Option<i64>,
    ) -> RepoResult<Category> {
        let created = sqlx::query_as::<_, Category>(
            "INSERT INTO category (name, description, slug, parent_id, status) \
             VALUES (?, ?, ?, ?, ?) RETURNING *",
        )
        .bind(name)
        .bind(description)
        .bind(slug)
        .bind(parent_id)
        .bind(CategoryStatus::Active)
        .fetch_optional(&self.pool)
        .await?
        .ok_or_else(|| RepoError::Database("Failed to create category".to_string()))?;
        Ok(created)
    }

    /// Apply a partial update to a category row
    ///
    /// The SET clause is built dynamically from the patch so absent fields are
    /// never touched.
    pub async fn update_row(&self, id: i64, patch: CategoryPatch) -> RepoResult<Category> {
        let mut sets: Vec<&str> = Vec::new();
        if patch.name.is_some() {
            sets.push("name = ?");
        }
        if patch.description.is_some() {
            sets.push("description = ?");
        }
        if patch.slug.is_some() {
            sets.push("slug = ?");
        }
        if patch.parent_id.is_some() {
            sets.push("parent_id = ?");
        }
        if patch.status.is_some() {
            sets.push("status = ?");
        }
        sets.push("updated_at = datetime('now')");

        let sql = format!(
            "UPDATE category SET {} WHERE id = ? RETURNING *",
            sets.join(", ")
        );
        let mut query = sqlx::query_as::<_, Category>(&sql);
        if let Some(v) = patch.name {
            query = query.bind(v);
        }
        if let Some(v) = patch.description {
            query = query.bind(v);
        }
        if let Some(v) = patch.slug {
            query = query.bind(v);
        }
        if let Some(v) = patch.parent_id {
            query = query.bind(v);
        }
        if let Some(v) = patch.status {
            query = query.bind(v);
        }
        query = query.bind(id);

        query
            .fetch_optional(&self.pool)
            .await?
            .ok_or_else(|| RepoError::NotFound(format!("Category {id} not found")))
    }

    /// Set the status of every listed category in one statement
    pub async fn set_status_many<'e>(
        &self,
        ex: impl SqliteExecutor<'e>,
        ids: &[i64],
        status: CategoryStatus,
    ) -> RepoResult<u64> {
        if ids.is_empty() {
            return Ok(0);
        }
        let sql = format!(
            "UPDATE category SET status = ?, updated_at = datetime('now') WHERE id IN ({})",
            in_placeholders(ids.len())
        );
        let mut query = sqlx::query(&sql).bind(status);
        for id in ids {
            query = query.bind(id);
        }
        Ok(query.execute(ex).await?.rows_affected())
    }

    /// Hard delete a single category row
    pub async fn delete_row<'e>(&self, ex: impl SqliteExecutor<'e>, id: i64) -> RepoResult<bool> {
        let affected = sqlx::query("DELETE FROM category WHERE id = ?")
            .bind(id)
            .execute(ex)
            .await?
            .rows_affected();
        Ok(affected > 0)
    }
}
