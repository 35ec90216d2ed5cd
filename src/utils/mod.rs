//! Utility module - shared helpers and types
//!
//! - [`AppError`] - application error type
//! - [`AppResponse`] - API response envelope
//! - logging and input validation helpers

pub mod error;
pub mod logger;
pub mod result;
pub mod validation;

pub use error::{AppError, AppResponse, LinkedProductsDetails};
pub use error::{ok, ok_with_message};
pub use result::AppResult;
