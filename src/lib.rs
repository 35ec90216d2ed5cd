//! Catalog Server - category hierarchy lifecycle service
//!
//! HTTP service managing a bounded-depth category tree with linked
//! products: slug allocation, hierarchy validation, cascading deactivation
//! and deletion with optional product relocation, and an audit trail.
//!
//! # Module structure
//!
//! ```text
//! src/
//! ├── core/      # configuration, shared state
//! ├── api/       # HTTP routes and handlers
//! ├── catalog/   # slug, hierarchy, linkage, cascade, service facade
//! ├── audit/     # append-only action log
//! ├── db/        # pool, models, repositories
//! └── utils/     # errors, logging, validation
//! ```

pub mod api;
pub mod audit;
pub mod catalog;
pub mod core;
pub mod db;
pub mod utils;

// Re-export the types embedders and tests reach for most
pub use api::build_app;
pub use catalog::CategoryService;
pub use core::{Config, ServerState};
pub use db::DbService;
pub use utils::{AppError, AppResponse, AppResult};
