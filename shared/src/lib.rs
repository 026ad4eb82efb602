//! Shared types for the menu service
//!
//! Error codes, response envelopes and the menu item model used by the
//! server and its tests.

pub mod error;
pub mod models;
pub mod util;

// Re-exports
pub use http;
pub use serde::{Deserialize, Serialize};
