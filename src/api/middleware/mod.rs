//! API middleware components

pub mod diagnostics;
pub mod logging;

pub use diagnostics::diagnostics_middleware;
pub use logging::logging_middleware;
