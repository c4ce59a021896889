//! Request and response plumbing shared by the handlers

pub mod error;
pub mod extract;
pub mod json;

pub use error::{ApiError, ApiErrorResponse, ApiErrorType};
pub use extract::{Path, Query};
pub use json::Json;
