//! Data models
//!
//! Shared between the menu server and its clients (via API).

pub mod menu_item;

// Re-exports
pub use menu_item::*;
