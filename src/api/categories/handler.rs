//! Category API handlers
//!
//! Thin layer over [`CategoryService`]: deserialize, call, wrap in the
//! response envelope. All business rules live in the service.

use axum::{
    Json,
    extract::{Path, Query, State},
};
use serde::Deserialize;

use crate::catalog::{DeactivationOutcome, RemovalOutcome, SubtreeProducts};
use crate::core::ServerState;
use crate::db::models::{Category, CategoryCreate, CategoryUpdate};
use crate::utils::{AppResponse, AppResult, ok, ok_with_message};

#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ActiveParams {
    /// Category id to leave out, for relocation target pickers
    pub exclude: Option<i64>,
}

#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct RelocationRequest {
    pub target_category_id: i64,
}

/// Body of DELETE with relocation; the target may be omitted when the
/// subtree has no products.
#[derive(Debug, Default, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct OptionalRelocationRequest {
    pub target_category_id: Option<i64>,
}

/// GET /api/categories - all categories, any status
pub async fn list(State(state): State<ServerState>) -> AppResult<Json<AppResponse<Vec<Category>>>> {
    let categories = state.categories.find_all().await?;
    Ok(ok(categories))
}

/// GET /api/categories/active - active categories only
pub async fn list_active(
    State(state): State<ServerState>,
    Query(params): Query<ActiveParams>,
) -> AppResult<Json<AppResponse<Vec<Category>>>> {
    let categories = state.categories.find_active(params.exclude).await?;
    Ok(ok(categories))
}

/// GET /api/categories/:id
pub async fn get_by_id(
    State(state): State<ServerState>,
    Path(id): Path<i64>,
) -> AppResult<Json<AppResponse<Category>>> {
    let category = state.categories.find_one(id).await?;
    Ok(ok(category))
}

/// GET /api/categories/slug/:slug
pub async fn get_by_slug(
    State(state): State<ServerState>,
    Path(slug): Path<String>,
) -> AppResult<Json<AppResponse<Category>>> {
    let category = state.categories.find_by_slug(&slug).await?;
    Ok(ok(category))
}

/// GET /api/categories/:id/products - subtree membership and linked products
pub async fn subtree_products(
    State(state): State<ServerState>,
    Path(id): Path<i64>,
) -> AppResult<Json<AppResponse<SubtreeProducts>>> {
    let report = state.categories.find_subtree_products(id).await?;
    Ok(ok(report))
}

/// POST /api/categories
pub async fn create(
    State(state): State<ServerState>,
    Json(payload): Json<CategoryCreate>,
) -> AppResult<Json<AppResponse<Category>>> {
    let category = state.categories.create(payload, None).await?;
    Ok(ok_with_message(category, "Category created"))
}

/// PUT /api/categories/:id
pub async fn update(
    State(state): State<ServerState>,
    Path(id): Path<i64>,
    Json(payload): Json<CategoryUpdate>,
) -> AppResult<Json<AppResponse<Category>>> {
    let category = state.categories.update(id, payload, None).await?;
    Ok(ok_with_message(category, "Category updated"))
}

/// PATCH /api/categories/:id/deactivate - cascade over the whole subtree
pub async fn deactivate(
    State(state): State<ServerState>,
    Path(id): Path<i64>,
) -> AppResult<Json<AppResponse<Vec<Category>>>> {
    let deactivated = state.categories.deactivate(id, None).await?;
    Ok(ok_with_message(deactivated, "Category deactivated"))
}

/// PATCH /api/categories/:id/deactivate-with-relocation
pub async fn deactivate_with_relocation(
    State(state): State<ServerState>,
    Path(id): Path<i64>,
    Json(payload): Json<RelocationRequest>,
) -> AppResult<Json<AppResponse<DeactivationOutcome>>> {
    let outcome = state
        .categories
        .deactivate_with_relocation(id, payload.target_category_id, None)
        .await?;
    Ok(ok_with_message(outcome, "Category deactivated"))
}

/// DELETE /api/categories/:id - leaf with no products only
pub async fn remove(
    State(state): State<ServerState>,
    Path(id): Path<i64>,
) -> AppResult<Json<AppResponse<RemovalOutcome>>> {
    let outcome = state.categories.remove(id, None).await?;
    Ok(ok_with_message(outcome, "Category removed"))
}

/// DELETE /api/categories/:id/with-relocation
///
/// Body is optional; a missing target is rejected by the service only when
/// the subtree still has products.
pub async fn remove_with_relocation(
    State(state): State<ServerState>,
    Path(id): Path<i64>,
    payload: Option<Json<OptionalRelocationRequest>>,
) -> AppResult<Json<AppResponse<RemovalOutcome>>> {
    let target = payload.and_then(|Json(p)| p.target_category_id);
    let outcome = state
        .categories
        .remove_with_relocation(id, target, None)
        .await?;
    Ok(ok_with_message(outcome, "Category removed"))
}
