//! Utilities - logging and input validation
//!
//! - [`AppError`] - API error type (from shared::error)
//! - [`validation`] - payload and id checks

pub mod logger;
pub mod validation;

pub use shared::error::{AppError, AppResult};
