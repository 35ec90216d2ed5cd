//! Database Models

pub mod category;
pub mod product;
pub mod serde_helpers;

pub use category::{Category, CategoryCreate, CategoryStatus, CategoryUpdate};
pub use product::ProductRef;
