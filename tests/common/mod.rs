//! Shared test fixtures
//!
//! Each test gets its own in-memory SQLite database. The pool is capped at
//! one connection so every query sees the same in-memory database.
#![allow(dead_code)]

use catalog_server::CategoryService;
use catalog_server::db::models::{Category, CategoryCreate};
use catalog_server::db::repository::ProductRepository;
use sqlx::SqlitePool;
use sqlx::sqlite::SqlitePoolOptions;

pub async fn test_pool() -> SqlitePool {
    let pool = SqlitePoolOptions::new()
        .max_connections(1)
        .connect("sqlite::memory:")
        .await
        .unwrap();
    sqlx::query("PRAGMA foreign_keys = ON;")
        .execute(&pool)
        .await
        .unwrap();
    sqlx::migrate!("./migrations").run(&pool).await.unwrap();
    pool
}

pub async fn test_service() -> (CategoryService, SqlitePool) {
    let pool = test_pool().await;
    (CategoryService::new(pool.clone()), pool)
}

pub async fn create_category(
    service: &CategoryService,
    name: &str,
    parent_id: Option<i64>,
) -> Category {
    service
        .create(
            CategoryCreate {
                name: name.to_string(),
                description: format!("{name} test category description"),
                slug: None,
                parent_id,
            },
            None,
        )
        .await
        .unwrap()
}

pub async fn add_product(pool: &SqlitePool, name: &str, sku: &str, category_id: i64) {
    ProductRepository::new(pool.clone())
        .insert(name, sku, category_id)
        .await
        .unwrap();
}

/// Build a three-level tree: root -> child -> grandchild
pub async fn seed_tree(service: &CategoryService) -> (Category, Category, Category) {
    let root = create_category(service, "Clothing", None).await;
    let child = create_category(service, "Shirts", Some(root.id)).await;
    let grandchild = create_category(service, "Polo Shirts", Some(child.id)).await;
    (root, child, grandchild)
}
