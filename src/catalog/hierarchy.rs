//! Hierarchy validation
//!
//! Validates parent references before the tree shape changes: the parent
//! must exist, be active, not be the category itself, and placing a child
//! under it must not exceed the maximum depth.

use crate::db::repository::CategoryRepository;
use crate::utils::{AppError, AppResult};
use std::collections::HashSet;

/// Maximum number of hierarchy levels (a root is level 1)
pub const MAX_DEPTH: usize = 3;

#[derive(Clone)]
pub struct HierarchyValidator {
    categories: CategoryRepository,
}

impl HierarchyValidator {
    pub fn new(categories: CategoryRepository) -> Self {
        Self { categories }
    }

    /// Validate that `parent_id` may receive a new (or reparented) child.
    ///
    /// `exclude_id` is the category being updated, to reject self-parenting.
    /// A `None` parent is a root placement and always valid.
    pub async fn validate_parent(
        &self,
        parent_id: Option<i64>,
        exclude_id: Option<i64>,
    ) -> AppResult<()> {
        let Some(parent_id) = parent_id else {
            return Ok(());
        };

        let parent = self
            .categories
            .find_by_id(parent_id)
            .await?
            .ok_or_else(|| AppError::NotFound("Parent category not found".to_string()))?;

        if !parent.is_active() {
            return Err(AppError::InvalidState(
                "Parent category must be active to be used".to_string(),
            ));
        }

        if exclude_id == Some(parent_id) {
            return Err(AppError::InvalidState(
                "Category cannot be its own parent".to_string(),
            ));
        }

        // Walk the parent chain upward with an explicit loop. A broken link
        // truncates the walk (treated as depth truncation, not an error) and
        // the visited set keeps cyclic rows from looping forever.
        let mut depth = 1usize;
        let mut seen: HashSet<i64> = HashSet::from([parent_id]);
        let mut current = parent.parent_id;
        while let Some(ancestor_id) = current {
            if !seen.insert(ancestor_id) {
                break;
            }
            depth += 1;
            if depth >= MAX_DEPTH {
                return Err(AppError::InvalidState(format!(
                    "Maximum of {MAX_DEPTH} hierarchy levels allowed"
                )));
            }
            current = match self.categories.find_by_id(ancestor_id).await? {
                Some(ancestor) => ancestor.parent_id,
                None => None,
            };
        }

        Ok(())
    }
}
