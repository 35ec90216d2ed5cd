//! Category API module
//!
//! | Path | Methods |
//! |------|---------|
//! | /api/categories | GET, POST |
//! | /api/categories/active | GET |
//! | /api/categories/slug/{slug} | GET |
//! | /api/categories/{id} | GET, PUT, DELETE |
//! | /api/categories/{id}/products | GET |
//! | /api/categories/{id}/deactivate | PATCH |
//! | /api/categories/{id}/deactivate-with-relocation | PATCH |
//! | /api/categories/{id}/with-relocation | DELETE |

mod handler;

use axum::{
    Router,
    routing::{delete, get, patch},
};

use crate::core::ServerState;

pub fn router() -> Router<ServerState> {
    Router::new().nest("/api/categories", routes())
}

fn routes() -> Router<ServerState> {
    Router::new()
        .route("/", get(handler::list).post(handler::create))
        // Static segments must come before /{id} to avoid path conflicts
        .route("/active", get(handler::list_active))
        .route("/slug/{slug}", get(handler::get_by_slug))
        .route(
            "/{id}",
            get(handler::get_by_id)
                .put(handler::update)
                .delete(handler::remove),
        )
        .route("/{id}/products", get(handler::subtree_products))
        .route("/{id}/deactivate", patch(handler::deactivate))
        .route(
            "/{id}/deactivate-with-relocation",
            patch(handler::deactivate_with_relocation),
        )
        .route(
            "/{id}/with-relocation",
            delete(handler::remove_with_relocation),
        )
}
