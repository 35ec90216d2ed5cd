//! Category hierarchy lifecycle engine
//!
//! # Structure
//!
//! - [`slug`] - URL-safe identifier derivation and uniqueness allocation
//! - [`hierarchy`] - parent reference and depth validation
//! - [`linkage`] - subtree membership and linked-product accounting
//! - [`cascade`] - deactivation and deletion transitions over whole subtrees
//! - [`service`] - the facade consumed by the HTTP layer
//!
//! The engine enforces that no inactive or deleted subtree ever strands a
//! product reference: every transition is validated against the full
//! descendant set before any row is touched, and each mutation phase runs in
//! a single transaction.

pub mod cascade;
pub mod hierarchy;
pub mod linkage;
pub mod service;
pub mod slug;

pub use cascade::{CascadeEngine, DeactivationOutcome, RemovalOutcome};
pub use hierarchy::{HierarchyValidator, MAX_DEPTH};
pub use linkage::{ProductLinkageGuard, SubtreeProducts};
pub use service::CategoryService;
pub use slug::SlugAllocator;
