//! Product linkage accounting
//!
//! Computes, for any category, the full descendant set and every product
//! linked anywhere inside it. Both the deactivation and the deletion flows
//! consume this one report — subtree membership is never computed twice with
//! different logic.

use crate::db::models::ProductRef;
use crate::db::repository::{CategoryRepository, ProductRepository};
use crate::utils::{AppError, AppResult};
use serde::Serialize;
use std::collections::{HashSet, VecDeque};

/// Snapshot of a category's subtree and its linked products
#[derive(Debug, Clone, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct SubtreeProducts {
    pub category_id: i64,
    /// Every descendant id, in breadth-first order (children before
    /// grandchildren)
    pub descendant_ids: Vec<i64>,
    /// Products linked to the category itself
    pub own: Vec<ProductRef>,
    /// Products linked to any descendant
    pub descendant: Vec<ProductRef>,
    pub total: i64,
}

impl SubtreeProducts {
    /// The category plus all descendants, root first
    pub fn affected_ids(&self) -> Vec<i64> {
        let mut ids = Vec::with_capacity(1 + self.descendant_ids.len());
        ids.push(self.category_id);
        ids.extend_from_slice(&self.descendant_ids);
        ids
    }

    pub fn contains(&self, id: i64) -> bool {
        self.category_id == id || self.descendant_ids.contains(&id)
    }
}

#[derive(Clone)]
pub struct ProductLinkageGuard {
    categories: CategoryRepository,
    products: ProductRepository,
}

impl ProductLinkageGuard {
    pub fn new(categories: CategoryRepository, products: ProductRepository) -> Self {
        Self {
            categories,
            products,
        }
    }

    /// Collect the subtree rooted at `category_id` and every linked product.
    ///
    /// The traversal is a breadth-first worklist over parent-id lookups with
    /// a visited set, so depth beyond the nominal bound or cyclic rows are
    /// handled instead of recursing without limit.
    pub async fn collect_subtree(&self, category_id: i64) -> AppResult<SubtreeProducts> {
        if self.categories.find_by_id(category_id).await?.is_none() {
            return Err(AppError::NotFound(format!(
                "Category {category_id} not found"
            )));
        }

        let mut descendant_ids: Vec<i64> = Vec::new();
        let mut seen: HashSet<i64> = HashSet::from([category_id]);
        let mut queue: VecDeque<i64> = VecDeque::from([category_id]);

        while let Some(current) = queue.pop_front() {
            for child in self.categories.find_children(current).await? {
                if seen.insert(child.id) {
                    descendant_ids.push(child.id);
                    queue.push_back(child.id);
                }
            }
        }

        let own = self.products.find_by_category_ids(&[category_id]).await?;
        let descendant = self.products.find_by_category_ids(&descendant_ids).await?;
        let total = (own.len() + descendant.len()) as i64;

        Ok(SubtreeProducts {
            category_id,
            descendant_ids,
            own,
            descendant,
            total,
        })
    }
}
