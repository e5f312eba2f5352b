//! Utility module - shared helpers and types
//!
//! - [`AppError`] / [`AppResult`] - application error handling
//! - [`AppResponse`] - API response envelope
//! - logging and validation helpers

pub mod error;
pub mod logger;
pub mod result;
pub mod validation;

pub use error::{AppError, AppResponse};
pub use error::{ok, ok_with_message};
pub use result::AppResult;
