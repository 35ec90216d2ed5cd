//! Cascading lifecycle transitions
//!
//! Deactivation and deletion applied uniformly to a category and its entire
//! subtree. Every transition validates against the linkage guard's snapshot
//! before touching a row, runs its mutation phase inside one transaction,
//! and records the outcome afterwards (best-effort).
//!
//! Callers are expected to serialize structural mutations; the facade in
//! [`super::service`] holds a mutex across every call into this engine.

use crate::audit::{AuditKind, AuditRecorder};
use crate::catalog::linkage::{ProductLinkageGuard, SubtreeProducts};
use crate::db::models::{Category, CategoryStatus};
use crate::db::repository::{CategoryRepository, ProductRepository};
use crate::utils::{AppError, AppResult};
use serde::Serialize;
use sqlx::{Sqlite, SqlitePool, Transaction};

const ENTITY: &str = "Category";

/// Result of a deactivation that may have relocated products
#[derive(Debug, Clone, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct DeactivationOutcome {
    pub category: Category,
    pub relocated_count: i64,
    pub target_name: Option<String>,
}

/// Result of a removal that may have relocated products
#[derive(Debug, Clone, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct RemovalOutcome {
    pub message: String,
    pub relocated_count: i64,
    pub target_name: Option<String>,
}

#[derive(Clone)]
pub struct CascadeEngine {
    pool: SqlitePool,
    categories: CategoryRepository,
    products: ProductRepository,
    guard: ProductLinkageGuard,
    audit: AuditRecorder,
}

impl CascadeEngine {
    pub fn new(
        pool: SqlitePool,
        categories: CategoryRepository,
        products: ProductRepository,
        guard: ProductLinkageGuard,
        audit: AuditRecorder,
    ) -> Self {
        Self {
            pool,
            categories,
            products,
            guard,
            audit,
        }
    }

    async fn load(&self, id: i64) -> AppResult<Category> {
        self.categories
            .find_by_id(id)
            .await?
            .ok_or_else(|| AppError::NotFound(format!("Category {id} not found")))
    }

    async fn begin(&self) -> AppResult<Transaction<'_, Sqlite>> {
        self.pool
            .begin()
            .await
            .map_err(|e| AppError::Database(e.to_string()))
    }

    async fn commit(tx: Transaction<'_, Sqlite>) -> AppResult<()> {
        tx.commit()
            .await
            .map_err(|e| AppError::Database(e.to_string()))
    }

    /// Validate a relocation target: it must exist, be active, and sit
    /// outside the subtree being changed.
    async fn validate_relocation_target(
        &self,
        target_id: i64,
        subtree: &SubtreeProducts,
    ) -> AppResult<Category> {
        if subtree.contains(target_id) {
            return Err(AppError::BadRequest(
                "Relocation target cannot be the source category or one of its descendants"
                    .to_string(),
            ));
        }
        let target = self
            .categories
            .find_by_id(target_id)
            .await?
            .ok_or_else(|| AppError::NotFound("Target category not found".to_string()))?;
        if !target.is_active() {
            return Err(AppError::BadRequest(
                "Target category must be active to receive products".to_string(),
            ));
        }
        Ok(target)
    }

    /// Move every product in the subtree (own first, then descendants) to
    /// the target, inside the caller's transaction.
    async fn relocate_products(
        &self,
        tx: &mut Transaction<'_, Sqlite>,
        subtree: &SubtreeProducts,
        target_id: i64,
    ) -> AppResult<u64> {
        let mut moved = 0u64;
        if !subtree.own.is_empty() {
            moved += self
                .products
                .reassign_category(&mut **tx, &[subtree.category_id], target_id)
                .await?;
        }
        if !subtree.descendant.is_empty() {
            moved += self
                .products
                .reassign_category(&mut **tx, &subtree.descendant_ids, target_id)
                .await?;
        }
        Ok(moved)
    }

    /// Delete the subtree deepest-first so the parent-id foreign key is
    /// never violated, finishing with the source category.
    async fn delete_subtree(
        &self,
        tx: &mut Transaction<'_, Sqlite>,
        subtree: &SubtreeProducts,
    ) -> AppResult<()> {
        for id in subtree.descendant_ids.iter().rev() {
            self.categories.delete_row(&mut **tx, *id).await?;
        }
        self.categories
            .delete_row(&mut **tx, subtree.category_id)
            .await?;
        Ok(())
    }

    // =========================================================================
    // Deactivation
    // =========================================================================

    /// Deactivate a category and its whole subtree.
    ///
    /// Fails with a linked-products conflict if any product is still
    /// attached anywhere in the subtree; the caller resolves that through
    /// [`Self::deactivate_with_relocation`].
    pub async fn deactivate(&self, id: i64, actor_id: Option<i64>) -> AppResult<Vec<Category>> {
        let category = self.load(id).await?;
        let subtree = self.guard.collect_subtree(id).await?;
        self.deactivate_collected(&category, &subtree, actor_id)
            .await
    }

    /// Deactivation over an already-collected subtree snapshot, so callers
    /// that have a snapshot in hand never recompute it.
    pub(crate) async fn deactivate_collected(
        &self,
        category: &Category,
        subtree: &SubtreeProducts,
        actor_id: Option<i64>,
    ) -> AppResult<Vec<Category>> {
        if subtree.total > 0 {
            return Err(AppError::LinkedProducts {
                category_id: subtree.category_id,
                affected_ids: subtree.affected_ids(),
                total: subtree.total,
            });
        }

        let ids = subtree.affected_ids();
        let mut tx = self.begin().await?;
        self.categories
            .set_status_many(&mut *tx, &ids, CategoryStatus::Inactive)
            .await?;
        Self::commit(tx).await?;

        self.audit
            .record(
                AuditKind::Inactive,
                ENTITY,
                format!(
                    "Category '{}' and its descendants were deactivated",
                    category.name
                ),
                actor_id,
            )
            .await;

        Ok(self.categories.find_by_ids(&ids).await?)
    }

    /// Deactivate a subtree, first relocating every linked product to the
    /// target category.
    pub async fn deactivate_with_relocation(
        &self,
        id: i64,
        target_id: i64,
        actor_id: Option<i64>,
    ) -> AppResult<DeactivationOutcome> {
        let category = self.load(id).await?;
        let subtree = self.guard.collect_subtree(id).await?;
        let target = self.validate_relocation_target(target_id, &subtree).await?;

        if subtree.total == 0 {
            // Nothing to relocate: identical to a plain deactivation
            let deactivated = self
                .deactivate_collected(&category, &subtree, actor_id)
                .await?;
            let root = deactivated
                .into_iter()
                .find(|c| c.id == id)
                .unwrap_or(category);
            return Ok(DeactivationOutcome {
                category: root,
                relocated_count: 0,
                target_name: None,
            });
        }

        let ids = subtree.affected_ids();
        let mut tx = self.begin().await?;
        self.relocate_products(&mut tx, &subtree, target.id).await?;
        self.categories
            .set_status_many(&mut *tx, &ids, CategoryStatus::Inactive)
            .await?;
        Self::commit(tx).await?;

        self.audit
            .record(
                AuditKind::Move,
                ENTITY,
                format!(
                    "{} product(s) were relocated from '{}' to '{}'",
                    subtree.total, category.name, target.name
                ),
                actor_id,
            )
            .await;
        self.audit
            .record(
                AuditKind::Inactive,
                ENTITY,
                format!(
                    "Category '{}' was deactivated and {} product(s) were relocated to '{}'",
                    category.name, subtree.total, target.name
                ),
                actor_id,
            )
            .await;

        let root = self.load(id).await?;
        Ok(DeactivationOutcome {
            category: root,
            relocated_count: subtree.total,
            target_name: Some(target.name),
        })
    }

    // =========================================================================
    // Removal
    // =========================================================================

    /// Remove a leaf category with no linked products (fast path).
    pub async fn remove(&self, id: i64, actor_id: Option<i64>) -> AppResult<RemovalOutcome> {
        let category = self.load(id).await?;

        let own_count = self.products.count_by_category_ids(&[id]).await?;
        if own_count > 0 {
            return Err(AppError::InvalidState(
                "Category has linked products. Relocate them before removing.".to_string(),
            ));
        }

        let children = self.categories.find_children(id).await?;
        if !children.is_empty() {
            return Err(AppError::InvalidState(
                "Category has child categories. Use removal with relocation or remove the \
                 children first."
                    .to_string(),
            ));
        }

        let mut tx = self.begin().await?;
        self.categories.delete_row(&mut *tx, id).await?;
        Self::commit(tx).await?;

        self.audit
            .record(
                AuditKind::Delete,
                ENTITY,
                format!("Category '{}' was removed", category.name),
                actor_id,
            )
            .await;

        Ok(RemovalOutcome {
            message: "Category removed".to_string(),
            relocated_count: 0,
            target_name: None,
        })
    }

    /// Remove a category and its whole subtree, relocating linked products
    /// to `target_id` first when any exist.
    pub async fn remove_with_relocation(
        &self,
        id: i64,
        target_id: Option<i64>,
        actor_id: Option<i64>,
    ) -> AppResult<RemovalOutcome> {
        let category = self.load(id).await?;
        let subtree = self.guard.collect_subtree(id).await?;

        if subtree.total == 0 {
            if subtree.descendant_ids.is_empty() {
                // No products, no descendants: plain removal covers it
                return self.remove(id, actor_id).await;
            }

            let mut tx = self.begin().await?;
            self.delete_subtree(&mut tx, &subtree).await?;
            Self::commit(tx).await?;

            self.audit
                .record(
                    AuditKind::Delete,
                    ENTITY,
                    format!(
                        "Category '{}' and its {} descendant categorie(s) were removed",
                        category.name,
                        subtree.descendant_ids.len()
                    ),
                    actor_id,
                )
                .await;

            return Ok(RemovalOutcome {
                message: "Category removed".to_string(),
                relocated_count: 0,
                target_name: None,
            });
        }

        // Products exist somewhere in the subtree: a target is mandatory
        let target_id = target_id.ok_or_else(|| {
            AppError::BadRequest(
                "targetCategoryId is required when there are products to relocate".to_string(),
            )
        })?;
        let target = self.validate_relocation_target(target_id, &subtree).await?;

        let mut tx = self.begin().await?;
        self.relocate_products(&mut tx, &subtree, target.id).await?;
        self.delete_subtree(&mut tx, &subtree).await?;
        Self::commit(tx).await?;

        self.audit
            .record(
                AuditKind::Move,
                ENTITY,
                format!(
                    "{} product(s) were relocated from '{}' to '{}'",
                    subtree.total, category.name, target.name
                ),
                actor_id,
            )
            .await;
        self.audit
            .record(
                AuditKind::Delete,
                ENTITY,
                format!(
                    "Category '{}' was removed and {} product(s) were relocated to '{}'",
                    category.name, subtree.total, target.name
                ),
                actor_id,
            )
            .await;

        Ok(RemovalOutcome {
            message: "Category removed".to_string(),
            relocated_count: subtree.total,
            target_name: Some(target.name),
        })
    }
}
