//! Storage contract for menu items

use async_trait::async_trait;
use shared::models::MenuItem;
use thiserror::Error;
use uuid::Uuid;

/// Storage error types
#[derive(Debug, Error)]
pub enum StoreError {
    /// Driver, transport or query failure
    #[error("Database error: {0}")]
    Database(String),

    /// The driver gave up waiting for the cluster
    #[error("Storage request timed out: {0}")]
    Timeout(String),

    /// A row came back in a shape the model cannot hold
    #[error("Decode error: {0}")]
    Decode(String),
}

impl StoreError {
    pub fn database(e: impl std::fmt::Display) -> Self {
        StoreError::Database(e.to_string())
    }

    pub fn decode(e: impl std::fmt::Display) -> Self {
        StoreError::Decode(e.to_string())
    }
}

/// Result type for storage operations
pub type StoreResult<T> = Result<T, StoreError>;

/// Single-table menu storage
///
/// Every call is one statement: single-row atomicity, no transactions,
/// last writer wins.
#[async_trait]
pub trait MenuStore: Send + Sync {
    /// Every row, in storage order
    async fn list_all(&self) -> StoreResult<Vec<MenuItem>>;

    async fn find_by_id(&self, id: Uuid) -> StoreResult<Option<MenuItem>>;

    async fn insert(&self, item: &MenuItem) -> StoreResult<()>;

    /// Overwrite the mutable columns of an existing row.
    ///
    /// Returns `false` and writes nothing when the row does not exist.
    async fn update(&self, item: &MenuItem) -> StoreResult<bool>;

    async fn delete(&self, id: Uuid) -> StoreResult<()>;
}
