//! Product Repository
//!
//! Narrow interface consumed by the category engine: count, list and
//! bulk-reassign product references by category. Product CRUD itself is
//! handled by another service.

use super::{RepoError, RepoResult, in_placeholders};
use crate::db::models::ProductRef;
use sqlx::{SqliteExecutor, SqlitePool};

#[derive(Clone)]
pub struct ProductRepository {
    pool: SqlitePool,
}

impl ProductRepository {
    pub fn new(pool: SqlitePool) -> Self {
        Self { pool }
    }

    /// Count products linked to any of the given categories
    pub async fn count_by_category_ids(&self, ids: &[i64]) -> RepoResult<i64> {
        if ids.is_empty() {
            return Ok(0);
        }
        let sql = format!(
            "SELECT COUNT(*) FROM product WHERE category_id IN ({})",
            in_placeholders(ids.len())
        );
        let mut query = sqlx::query_scalar::<_, i64>(&sql);
        for id in ids {
            query = query.bind(id);
        }
        Ok(query.fetch_one(&self.pool).await?)
    }

    /// List products linked to any of the given categories
    pub async fn find_by_category_ids(&self, ids: &[i64]) -> RepoResult<Vec<ProductRef>> {
        if ids.is_empty() {
            return Ok(Vec::new());
        }
        let sql = format!(
            "SELECT id, name, sku, category_id FROM product WHERE category_id IN ({}) ORDER BY id",
            in_placeholders(ids.len())
        );
        let mut query = sqlx::query_as::<_, ProductRef>(&sql);
        for id in ids {
            query = query.bind(id);
        }
        Ok(query.fetch_all(&self.pool).await?)
    }

    /// Bulk-reassign every product in the given categories to the target
    /// category. Unconditional: callers validate the target first.
    pub async fn reassign_category<'e>(
        &self,
        ex: impl SqliteExecutor<'e>,
        source_ids: &[i64],
        target_id: i64,
    ) -> RepoResult<u64> {
        if source_ids.is_empty() {
            return Ok(0);
        }
        let sql = format!(
            "UPDATE product SET category_id = ? WHERE category_id IN ({})",
            in_placeholders(source_ids.len())
        );
        let mut query = sqlx::query(&sql).bind(target_id);
        for id in source_ids {
            query = query.bind(id);
        }
        Ok(query.execute(ex).await?.rows_affected())
    }

    /// Insert a product reference (seeding and tests)
    pub async fn insert(&self, name: &str, sku: &str, category_id: i64) -> RepoResult<ProductRef> {
        let created = sqlx::query_as::<_, ProductRef>(
            "INSERT INTO product (name, sku, category_id) VALUES (?, ?, ?) \
             RETURNING id, name, sku, category_id",
        )
        .bind(name)
        .bind(sku)
        .bind(category_id)
        .fetch_optional(&self.pool)
        .await?
        .ok_or_else(|| RepoError::Database("Failed to create product".to_string()))?;
        Ok(created)
    }
}
