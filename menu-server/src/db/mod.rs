//! Storage layer
//!
//! - [`store`]: the `MenuStore` contract and its error type
//! - [`handle`]: readiness flags shared between the lifecycle task and requests
//! - [`lifecycle`]: the connect/provision retry loop
//! - [`cassandra`]: the Cassandra implementation of both seams

pub mod cassandra;
pub mod handle;
pub mod lifecycle;
pub mod store;

pub use cassandra::{CassandraProvisioner, CassandraStore};
pub use handle::{ConnectionState, LinkPhase, StorageHandle};
pub use lifecycle::{ProvisionError, ProvisionStep, Provisioner, run_until_ready};
pub use store::{MenuStore, StoreError, StoreResult};
