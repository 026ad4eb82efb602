//! Menu Server - restaurant menu CRUD over Cassandra
//!
//! # Architecture
//!
//! - **Storage** (`db`): connection lifecycle with fixed-delay retry, readiness
//!   flags, the `MenuStore` contract and its Cassandra implementation
//! - **Search** (`search`): full-scan case-insensitive substring filter
//! - **Service** (`service`): readiness-gated CRUD facade
//! - **HTTP API** (`api`): axum routes, middleware and the static client
//!
//! ```text
//! menu-server/src/
//! ├── core/          # config, state, background tasks, server
//! ├── db/            # lifecycle, readiness, storage
//! ├── api/           # HTTP routes and handlers
//! ├── middleware/    # readiness gate, request logging
//! └── utils/         # logging setup, input validation
//! ```

pub mod api;
pub mod core;
pub mod db;
pub mod middleware;
pub mod search;
pub mod service;
pub mod utils;

pub use core::{Config, Server, ServerState};
pub use db::{MenuStore, Provisioner, StorageHandle};
pub use service::{MenuError, MenuService};
pub use utils::{AppError, AppResult};

pub use utils::logger::{init_logger, init_logger_with_file};
