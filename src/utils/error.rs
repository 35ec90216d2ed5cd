//! Unified Error Handling
//!
//! Provides application-wide error types and response structures:
//! - [`AppError`] - application error enum
//! - [`AppResponse`] - API response envelope
//!
//! # Error code table
//!
//! | Code | Status | Meaning |
//! |-------|--------|---------------------------------------|
//! | E0000 | 200 | Success |
//! | E0003 | 404 | Resource not found |
//! | E0005 | 422 | Invalid state for the requested change |
//! | E0006 | 400 | Invalid request |
//! | E9001 | 500 | Internal server error |
//! | E9002 | 500 | Database error |
//!
//! Conflicts caused by linked products carry the machine-readable code
//! `CATEGORY_HAS_LINKED_PRODUCTS` together with the affected category ids so
//! the caller can offer relocation.

use axum::{
    Json,
    http::StatusCode,
    response::{IntoResponse, Response},
};
use serde::Serialize;
use tracing::error;

use crate::db::repository::RepoError;

/// Unified API response structure
///
/// ```json
/// {
///   "code": "E0000",
///   "message": "Success",
///   "data": { ... }
/// }
/// ```
#[derive(Debug, Serialize)]
pub struct AppResponse<T> {
    pub code: String,
    pub message: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub data: Option<T>,
}

/// Application-level error type
#[derive(Debug, thiserror::Error)]
pub enum AppError {
    /// Missing category or relocation target (404)
    #[error("Resource not found: {0}")]
    NotFound(String),

    /// The entity cannot make the requested transition: inactive or self
    /// parent, depth exceeded, children or products blocking a simple
    /// delete (422)
    #[error("Invalid state: {0}")]
    InvalidState(String),

    /// Missing or malformed input, e.g. a relocation target that is
    /// absent when required, inactive, or inside the source subtree (400)
    #[error("Invalid request: {0}")]
    BadRequest(String),

    /// The subtree still has linked products, blocking deactivation or
    /// deletion (409). Carries the affected category ids and the product
    /// count so the caller can resolve via relocation.
    #[error("category {category_id} has {total} linked product(s)")]
    LinkedProducts {
        category_id: i64,
        affected_ids: Vec<i64>,
        total: i64,
    },

    /// Database error (500)
    #[error("Database error: {0}")]
    Database(String),

    /// Internal error (500)
    #[error("Internal server error: {0}")]
    Internal(String),
}

/// Structured payload of a [`AppError::LinkedProducts`] conflict response
#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct LinkedProductsDetails {
    pub category_id: i64,
    pub affected_category_ids: Vec<i64>,
    pub total_products: i64,
    pub requires_relocation: bool,
}

impl IntoResponse for AppError {
    fn into_response(self) -> Response {
        // Linked-product conflicts carry structured details in `data`
        if let AppError::LinkedProducts {
            category_id,
            affected_ids,
            total,
        } = self
        {
            let body = Json(AppResponse {
                code: "CATEGORY_HAS_LINKED_PRODUCTS".to_string(),
                message: format!(
                    "Category has {total} linked product(s) in its subtree. \
                     Relocate them to another category before continuing."
                ),
                data: Some(LinkedProductsDetails {
                    category_id,
                    affected_category_ids: affected_ids,
                    total_products: total,
                    requires_relocation: true,
                }),
            });
            return (StatusCode::CONFLICT, body).into_response();
        }

        let (status, code, message) = match &self {
            AppError::NotFound(msg) => (StatusCode::NOT_FOUND, "E0003", msg.clone()),

            AppError::InvalidState(msg) => {
                (StatusCode::UNPROCESSABLE_ENTITY, "E0005", msg.clone())
            }

            AppError::BadRequest(msg) => (StatusCode::BAD_REQUEST, "E0006", msg.clone()),

            AppError::Database(msg) => {
                error!(target: "database", error = %msg, "Database error occurred");
                (
                    StatusCode::INTERNAL_SERVER_ERROR,
                    "E9002",
                    "Database error".to_string(),
                )
            }

            AppError::Internal(msg) => {
                error!(target: "internal", error = %msg, "Internal error occurred");
                (
                    StatusCode::INTERNAL_SERVER_ERROR,
                    "E9001",
                    "Internal server error".to_string(),
                )
            }

            AppError::LinkedProducts { .. } => unreachable!(),
        };

        let body = Json(AppResponse::<()> {
            code: code.to_string(),
            message,
            data: None,
        });

        (status, body).into_response()
    }
}

impl From<RepoError> for AppError {
    fn from(e: RepoError) -> Self {
        match e {
            RepoError::NotFound(msg) => AppError::NotFound(msg),
            RepoError::Database(msg) => AppError::Database(msg),
        }
    }
}

// ========== Helper functions ==========

/// Create a successful response
pub fn ok<T: Serialize>(data: T) -> Json<AppResponse<T>> {
    Json(AppResponse {
        code: "E0000".to_string(),
        message: "Success".to_string(),
        data: Some(data),
    })
}

/// Create a successful response with custom message
pub fn ok_with_message<T: Serialize>(data: T, message: impl Into<String>) -> Json<AppResponse<T>> {
    Json(AppResponse {
        code: "E0000".to_string(),
        message: message.into(),
        data: Some(data),
    })
}
