//! Category service facade
//!
//! Entry point for every category operation. Reads go straight to the
//! repositories; structural mutations (create, update, cascades) are
//! serialized behind a single mutex so two overlapping subtree transitions
//! can never interleave their guard snapshots and writes.

use crate::audit::{AuditKind, AuditRecorder};
use crate::catalog::cascade::{CascadeEngine, DeactivationOutcome, RemovalOutcome};
use crate::catalog::hierarchy::HierarchyValidator;
use crate::catalog::linkage::{ProductLinkageGuard, SubtreeProducts};
use crate::catalog::slug::SlugAllocator;
use crate::db::models::{Category, CategoryCreate, CategoryStatus, CategoryUpdate};
use crate::db::repository::{CategoryPatch, CategoryRepository, ProductRepository};
use crate::utils::validation::{
    MAX_DESCRIPTION_LEN, MAX_NAME_LEN, MIN_DESCRIPTION_LEN, MIN_NAME_LEN, validate_optional_text,
    validate_required_text,
};
use crate::utils::{AppError, AppResult};
use sqlx::SqlitePool;
use std::sync::Arc;
use tokio::sync::Mutex;

const ENTITY: &str = "Category";

#[derive(Clone)]
pub struct CategoryService {
    categories: CategoryRepository,
    slugs: SlugAllocator,
    hierarchy: HierarchyValidator,
    guard: ProductLinkageGuard,
    engine: CascadeEngine,
    audit: AuditRecorder,
    /// Serializes structural mutations. Cascades read a subtree snapshot and
    /// then write against it; interleaving two of them would let the
    /// snapshot go stale between check and act.
    mutation_lock: Arc<Mutex<()>>,
}

impl CategoryService {
    pub fn new(pool: SqlitePool) -> Self {
        let categories = CategoryRepository::new(pool.clone());
        let products = ProductRepository::new(pool.clone());
        let guard = ProductLinkageGuard::new(categories.clone(), products.clone());
        let audit = AuditRecorder::new(pool.clone());
        let engine = CascadeEngine::new(
            pool,
            categories.clone(),
            products,
            guard.clone(),
            audit.clone(),
        );
        Self {
            slugs: SlugAllocator::new(categories.clone()),
            hierarchy: HierarchyValidator::new(categories.clone()),
            categories,
            guard,
            engine,
            audit,
            mutation_lock: Arc::new(Mutex::new(())),
        }
    }

    // =========================================================================
    // Reads
    // =========================================================================

    pub async fn find_all(&self) -> AppResult<Vec<Category>> {
        Ok(self.categories.find_all().await?)
    }

    /// Active categories, optionally excluding one id (relocation pickers)
    pub async fn find_active(&self, exclude_id: Option<i64>) -> AppResult<Vec<Category>> {
        Ok(self.categories.find_active(exclude_id).await?)
    }

    pub async fn find_one(&self, id: i64) -> AppResult<Category> {
        self.categories
            .find_by_id(id)
            .await?
            .ok_or_else(|| AppError::NotFound(format!("Category {id} not found")))
    }

    pub async fn find_by_slug(&self, slug: &str) -> AppResult<Category> {
        self.categories
            .find_by_slug(slug)
            .await?
            .ok_or_else(|| AppError::NotFound(format!("Category '{slug}' not found")))
    }

    /// Subtree membership and linked products, for relocation planning
    pub async fn find_subtree_products(&self, id: i64) -> AppResult<SubtreeProducts> {
        self.guard.collect_subtree(id).await
    }

    // =========================================================================
    // Create / update
    // =========================================================================

    pub async fn create(&self, data: CategoryCreate, actor_id: Option<i64>) -> AppResult<Category> {
        let _guard = self.mutation_lock.lock().await;

        validate_required_text(&data.name, "name", MIN_NAME_LEN, MAX_NAME_LEN)?;
        validate_required_text(
            &data.description,
            "description",
            MIN_DESCRIPTION_LEN,
            MAX_DESCRIPTION_LEN,
        )?;

        // Explicit slug is honored but still made unique; otherwise derive
        // from the display name
        let slug = match data.slug.as_deref().map(str::trim).filter(|s| !s.is_empty()) {
            Some(explicit) => self.slugs.ensure_unique(explicit, None).await?,
            None => self.slugs.allocate_from_name(&data.name, None).await?,
        };

        self.hierarchy.validate_parent(data.parent_id, None).await?;

        let created = self
            .categories
            .insert(&data.name, &data.description, &slug, data.parent_id)
            .await?;

        self.audit
            .record(
                AuditKind::Create,
                ENTITY,
                format!("Category '{}' was created", created.name),
                actor_id,
            )
            .await;

        Ok(created)
    }

    pub async fn update(
        &self,
        id: i64,
        data: CategoryUpdate,
        actor_id: Option<i64>,
    ) -> AppResult<Category> {
        let _guard = self.mutation_lock.lock().await;

        let existing = self
            .categories
            .find_by_id(id)
            .await?
            .ok_or_else(|| AppError::NotFound(format!("Category {id} not found")))?;

        validate_optional_text(data.name.as_deref(), "name", MIN_NAME_LEN, MAX_NAME_LEN)?;
        validate_optional_text(
            data.description.as_deref(),
            "description",
            MIN_DESCRIPTION_LEN,
            MAX_DESCRIPTION_LEN,
        )?;

        // Slug rules: a name change regenerates the slug; an explicit slug is
        // re-uniqued; otherwise the stored slug is left untouched
        let slug = if let Some(ref new_name) = data.name
            && new_name != &existing.name
        {
            Some(self.slugs.allocate_from_name(new_name, Some(id)).await?)
        } else if let Some(given) = data.slug.as_deref().map(str::trim).filter(|s| !s.is_empty()) {
            if given != existing.slug {
                Some(self.slugs.ensure_unique(given, Some(id)).await?)
            } else {
                None
            }
        } else {
            None
        };

        // The active-parent and depth rules bind when a parent is being set,
        // not on unrelated field updates
        if let Some(new_parent) = data.parent_id {
            self.hierarchy.validate_parent(new_parent, Some(id)).await?;
        }

        let deactivating = existing.is_active() && data.status == Some(CategoryStatus::Inactive);
        let reactivating = !existing.is_active() && data.status == Some(CategoryStatus::Active);

        // Deactivation through update follows the same guard as the cascade
        // endpoint: fail before any field is written
        let subtree = if deactivating {
            let subtree = self.guard.collect_subtree(id).await?;
            if subtree.total > 0 {
                return Err(AppError::LinkedProducts {
                    category_id: id,
                    affected_ids: subtree.affected_ids(),
                    total: subtree.total,
                });
            }
            Some(subtree)
        } else {
            None
        };

        let patch = CategoryPatch {
            name: data.name,
            description: data.description,
            slug,
            parent_id: data.parent_id,
            // The cascade flips the status for the whole subtree at once
            status: if deactivating { None } else { data.status },
        };
        let updated = self.categories.update_row(id, patch).await?;

        if let Some(subtree) = subtree {
            let deactivated = self
                .engine
                .deactivate_collected(&updated, &subtree, actor_id)
                .await?;
            return Ok(deactivated
                .into_iter()
                .find(|c| c.id == id)
                .unwrap_or(updated));
        }

        let kind = if reactivating {
            AuditKind::Active
        } else {
            AuditKind::Update
        };
        let message = if reactivating {
            format!("Category '{}' was reactivated", updated.name)
        } else {
            format!("Category '{}' was updated", updated.name)
        };
        self.audit.record(kind, ENTITY, message, actor_id).await;

        Ok(updated)
    }

    // =========================================================================
    // Cascading transitions
    // =========================================================================

    pub async fn deactivate(&self, id: i64, actor_id: Option<i64>) -> AppResult<Vec<Category>> {
        let _guard = self.mutation_lock.lock().await;
        self.engine.deactivate(id, actor_id).await
    }

    pub async fn deactivate_with_relocation(
        &self,
        id: i64,
        target_id: i64,
        actor_id: Option<i64>,
    ) -> AppResult<DeactivationOutcome> {
        let _guard = self.mutation_lock.lock().await;
        self.engine
            .deactivate_with_relocation(id, target_id, actor_id)
            .await
    }

    pub async fn remove(&self, id: i64, actor_id: Option<i64>) -> AppResult<RemovalOutcome> {
        let _guard = self.mutation_lock.lock().await;
        self.engine.remove(id, actor_id).await
    }

    pub async fn remove_with_relocation(
        &self,
        id: i64,
        target_id: Option<i64>,
        actor_id: Option<i64>,
    ) -> AppResult<RemovalOutcome> {
        let _guard = self.mutation_lock.lock().await;
        self.engine
            .remove_with_relocation(id, target_id, actor_id)
            .await
    }
}
