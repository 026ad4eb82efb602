//! Server State

use std::sync::Arc;

use crate::core::{BackgroundTasks, Config};
use crate::db::{CassandraProvisioner, Provisioner, StorageHandle, run_until_ready};
use crate::service::MenuService;

/// Shared state handed to every handler
///
/// Cheap to clone: everything inside is reference counted.
#[derive(Clone)]
pub struct ServerState {
    pub config: Arc<Config>,
    pub storage: StorageHandle,
    pub menu: MenuService,
}

impl ServerState {
    /// State with a fresh, not yet provisioned storage handle
    pub fn new(config: Config) -> Self {
        let storage = StorageHandle::new();
        Self {
            config: Arc::new(config),
            menu: MenuService::new(storage.clone()),
            storage,
        }
    }

    /// Provisioner for the configured Cassandra cluster
    pub fn cassandra_provisioner(&self) -> Arc<dyn Provisioner> {
        Arc::new(CassandraProvisioner::new(self.config.cassandra.clone()))
    }

    /// Start the storage lifecycle task
    ///
    /// Call once per process. The task stops when storage is ready or when
    /// `tasks` shuts down, whichever comes first.
    pub fn start_provisioning(&self, tasks: &mut BackgroundTasks, provisioner: Arc<dyn Provisioner>) {
        let handle = self.storage.clone();
        let retry_delay = self.config.retry_delay;
        let token = tasks.shutdown_token();

        tasks.spawn("storage_lifecycle", async move {
            tokio::select! {
                _ = token.cancelled() => {
                    tracing::info!("Storage lifecycle cancelled");
                }
                _ = run_until_ready(provisioner.as_ref(), &handle, retry_delay) => {}
            }
        });
    }
}
