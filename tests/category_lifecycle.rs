//! Cascading lifecycle tests
//!
//! Covers subtree deactivation, relocation, and deletion flows end to end
//! against an in-memory database.

mod common;

use catalog_server::AppError;
use catalog_server::db::models::{CategoryStatus, CategoryUpdate};
use catalog_server::db::repository::{CategoryRepository, ProductRepository};
use common::{add_product, create_category, seed_tree, test_service};

// ========================================================================
// Deactivation cascades
// ========================================================================

#[tokio::test]
async fn test_deactivate_cascades_over_subtree() {
    let (service, _pool) = test_service().await;
    let (root, child, grandchild) = seed_tree(&service).await;

    let deactivated = service.deactivate(root.id, None).await.unwrap();

    assert_eq!(deactivated.len(), 3);
    for category in &deactivated {
        assert_eq!(category.status, CategoryStatus::Inactive);
    }

    // Unrelated roots are untouched
    let other = create_category(&service, "Accessories", None).await;
    assert_eq!(other.status, CategoryStatus::Active);

    for id in [child.id, grandchild.id] {
        let reloaded = service.find_one(id).await.unwrap();
        assert_eq!(reloaded.status, CategoryStatus::Inactive);
    }
}

#[tokio::test]
async fn test_deactivate_blocked_by_linked_products() {
    let (service, pool) = test_service().await;
    let (root, child, grandchild) = seed_tree(&service).await;
    add_product(&pool, "Blue Polo", "SKU-001", grandchild.id).await;
    add_product(&pool, "White Polo", "SKU-002", grandchild.id).await;

    let err = service.deactivate(root.id, None).await.unwrap_err();

    match err {
        AppError::LinkedProducts {
            category_id,
            affected_ids,
            total,
        } => {
            assert_eq!(category_id, root.id);
            assert_eq!(total, 2);
            assert_eq!(affected_ids, vec![root.id, child.id, grandchild.id]);
        }
        other => panic!("expected LinkedProducts, got {other:?}"),
    }

    // Nothing was written
    let reloaded = service.find_one(root.id).await.unwrap();
    assert_eq!(reloaded.status, CategoryStatus::Active);
}

#[tokio::test]
async fn test_deactivate_with_relocation_moves_products() {
    let (service, pool) = test_service().await;
    let (root, _child, grandchild) = seed_tree(&service).await;
    let target = create_category(&service, "Clearance", None).await;
    add_product(&pool, "Blue Polo", "SKU-001", grandchild.id).await;
    add_product(&pool, "Red Cap", "SKU-002", root.id).await;

    let outcome = service
        .deactivate_with_relocation(root.id, target.id, None)
        .await
        .unwrap();

    assert_eq!(outcome.relocated_count, 2);
    assert_eq!(outcome.target_name.as_deref(), Some("Clearance"));
    assert_eq!(outcome.category.status, CategoryStatus::Inactive);

    // All products now live under the target, which stays active
    let products = ProductRepository::new(pool.clone());
    assert_eq!(products.count_by_category_ids(&[target.id]).await.unwrap(), 2);
    assert_eq!(
        products
            .count_by_category_ids(&[root.id, grandchild.id])
            .await
            .unwrap(),
        0
    );
    let target = service.find_one(target.id).await.unwrap();
    assert_eq!(target.status, CategoryStatus::Active);
}

#[tokio::test]
async fn test_deactivate_with_relocation_without_products() {
    let (service, _pool) = test_service().await;
    let root = create_category(&service, "Clothing", None).await;
    let target = create_category(&service, "Clearance", None).await;

    let outcome = service
        .deactivate_with_relocation(root.id, target.id, None)
        .await
        .unwrap();

    assert_eq!(outcome.relocated_count, 0);
    assert!(outcome.target_name.is_none());
    assert_eq!(outcome.category.status, CategoryStatus::Inactive);
}

#[tokio::test]
async fn test_relocation_target_must_be_outside_subtree() {
    let (service, pool) = test_service().await;
    let (root, child, _grandchild) = seed_tree(&service).await;
    add_product(&pool, "Blue Polo", "SKU-001", child.id).await;

    let err = service
        .deactivate_with_relocation(root.id, child.id, None)
        .await
        .unwrap_err();
    assert!(matches!(err, AppError::BadRequest(_)));
}

#[tokio::test]
async fn test_relocation_target_must_exist_and_be_active() {
    let (service, pool) = test_service().await;
    let root = create_category(&service, "Clothing", None).await;
    add_product(&pool, "Blue Polo", "SKU-001", root.id).await;

    let err = service
        .deactivate_with_relocation(root.id, 9999, None)
        .await
        .unwrap_err();
    assert!(matches!(err, AppError::NotFound(_)));

    let inactive = create_category(&service, "Clearance", None).await;
    service.deactivate(inactive.id, None).await.unwrap();

    let err = service
        .deactivate_with_relocation(root.id, inactive.id, None)
        .await
        .unwrap_err();
    // An inactive target is a bad request, same class as a missing one
    assert!(matches!(err, AppError::BadRequest(_)));
}

#[tokio::test]
async fn test_update_to_inactive_follows_cascade_guard() {
    let (service, pool) = test_service().await;
    let (root, _child, grandchild) = seed_tree(&service).await;
    add_product(&pool, "Blue Polo", "SKU-001", grandchild.id).await;

    // Deactivating through a plain update hits the same conflict
    let err = service
        .update(
            root.id,
            CategoryUpdate {
                status: Some(CategoryStatus::Inactive),
                ..Default::default()
            },
            None,
        )
        .await
        .unwrap_err();
    assert!(matches!(err, AppError::LinkedProducts { .. }));

    // Without products the whole subtree goes inactive
    sqlx::query("DELETE FROM product")
        .execute(&pool)
        .await
        .unwrap();

    let updated = service
        .update(
            root.id,
            CategoryUpdate {
                status: Some(CategoryStatus::Inactive),
                ..Default::default()
            },
            None,
        )
        .await
        .unwrap();
    assert_eq!(updated.status, CategoryStatus::Inactive);
    let grandchild = service.find_one(grandchild.id).await.unwrap();
    assert_eq!(grandchild.status, CategoryStatus::Inactive);
}

#[tokio::test]
async fn test_reactivation_is_not_cascading() {
    let (service, _pool) = test_service().await;
    let (root, child, _grandchild) = seed_tree(&service).await;
    service.deactivate(root.id, None).await.unwrap();

    let updated = service
        .update(
            root.id,
            CategoryUpdate {
                status: Some(CategoryStatus::Active),
                ..Default::default()
            },
            None,
        )
        .await
        .unwrap();

    assert_eq!(updated.status, CategoryStatus::Active);
    // Children stay inactive until reactivated individually
    let child = service.find_one(child.id).await.unwrap();
    assert_eq!(child.status, CategoryStatus::Inactive);
}

// ========================================================================
// Removal
// ========================================================================

#[tokio::test]
async fn test_remove_leaf_without_products() {
    let (service, _pool) = test_service().await;
    let root = create_category(&service, "Clothing", None).await;

    let outcome = service.remove(root.id, None).await.unwrap();
    assert_eq!(outcome.relocated_count, 0);

    let err = service.find_one(root.id).await.unwrap_err();
    assert!(matches!(err, AppError::NotFound(_)));
}

#[tokio::test]
async fn test_remove_rejects_children_and_products() {
    let (service, pool) = test_service().await;
    let (root, _child, _grandchild) = seed_tree(&service).await;

    let err = service.remove(root.id, None).await.unwrap_err();
    assert!(matches!(err, AppError::InvalidState(_)));

    let leaf = create_category(&service, "Socks", None).await;
    add_product(&pool, "Wool Socks", "SKU-001", leaf.id).await;
    let err = service.remove(leaf.id, None).await.unwrap_err();
    assert!(matches!(err, AppError::InvalidState(_)));
}

#[tokio::test]
async fn test_remove_with_relocation_moves_then_deletes() {
    let (service, pool) = test_service().await;
    let (root, child, grandchild) = seed_tree(&service).await;
    let target = create_category(&service, "Clearance", None).await;
    add_product(&pool, "Blue Polo", "SKU-001", grandchild.id).await;
    add_product(&pool, "Red Cap", "SKU-002", root.id).await;

    let outcome = service
        .remove_with_relocation(root.id, Some(target.id), None)
        .await
        .unwrap();

    assert_eq!(outcome.relocated_count, 2);
    assert_eq!(outcome.target_name.as_deref(), Some("Clearance"));

    // The whole subtree is gone, the target holds the products
    let categories = CategoryRepository::new(pool.clone());
    for id in [root.id, child.id, grandchild.id] {
        assert!(categories.find_by_id(id).await.unwrap().is_none());
    }
    let products = ProductRepository::new(pool.clone());
    assert_eq!(products.count_by_category_ids(&[target.id]).await.unwrap(), 2);
}

#[tokio::test]
async fn test_remove_with_relocation_requires_target_when_products_exist() {
    let (service, pool) = test_service().await;
    let root = create_category(&service, "Clothing", None).await;
    add_product(&pool, "Blue Polo", "SKU-001", root.id).await;

    let err = service
        .remove_with_relocation(root.id, None, None)
        .await
        .unwrap_err();
    assert!(matches!(err, AppError::BadRequest(_)));

    // Still present
    assert!(service.find_one(root.id).await.is_ok());
}

#[tokio::test]
async fn test_remove_with_relocation_deletes_empty_subtree_without_target() {
    let (service, pool) = test_service().await;
    let (root, child, grandchild) = seed_tree(&service).await;

    let outcome = service
        .remove_with_relocation(root.id, None, None)
        .await
        .unwrap();
    assert_eq!(outcome.relocated_count, 0);

    let categories = CategoryRepository::new(pool.clone());
    for id in [root.id, child.id, grandchild.id] {
        assert!(categories.find_by_id(id).await.unwrap().is_none());
    }
}

#[tokio::test]
async fn test_remove_with_relocation_rejects_target_inside_subtree() {
    let (service, pool) = test_service().await;
    let (root, child, _grandchild) = seed_tree(&service).await;
    add_product(&pool, "Blue Polo", "SKU-001", root.id).await;

    let err = service
        .remove_with_relocation(root.id, Some(child.id), None)
        .await
        .unwrap_err();
    assert!(matches!(err, AppError::BadRequest(_)));
}

// ========================================================================
// Subtree reporting
// ========================================================================

#[tokio::test]
async fn test_subtree_products_report() {
    let (service, pool) = test_service().await;
    let (root, child, grandchild) = seed_tree(&service).await;
    add_product(&pool, "Red Cap", "SKU-001", root.id).await;
    add_product(&pool, "Blue Polo", "SKU-002", grandchild.id).await;

    let report = service.find_subtree_products(root.id).await.unwrap();

    assert_eq!(report.category_id, root.id);
    assert_eq!(report.descendant_ids, vec![child.id, grandchild.id]);
    assert_eq!(report.own.len(), 1);
    assert_eq!(report.descendant.len(), 1);
    assert_eq!(report.total, 2);

    // A leaf report has no descendants
    let leaf_report = service.find_subtree_products(grandchild.id).await.unwrap();
    assert!(leaf_report.descendant_ids.is_empty());
    assert_eq!(leaf_report.total, 1);
}

#[tokio::test]
async fn test_subtree_products_unknown_category() {
    let (service, _pool) = test_service().await;
    let err = service.find_subtree_products(42).await.unwrap_err();
    assert!(matches!(err, AppError::NotFound(_)));
}
