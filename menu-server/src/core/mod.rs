//! Core - configuration, state, background tasks and the HTTP server
//!
//! - [`Config`] - server configuration
//! - [`ServerState`] - shared application state
//! - [`BackgroundTasks`] - background task registry
//! - [`Server`] - HTTP server
//! - [`ServerError`] - fatal server errors

pub mod config;
pub mod error;
pub mod server;
pub mod state;
pub mod tasks;

pub use config::{CassandraConfig, Config, ConfigError, Replication};
pub use error::{Result, ServerError};
pub use server::Server;
pub use state::ServerState;
pub use tasks::BackgroundTasks;
