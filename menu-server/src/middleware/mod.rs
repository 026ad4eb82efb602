//! HTTP middleware

pub mod logging;
pub mod readiness;

pub use logging::logging_middleware;
pub use readiness::require_ready;
