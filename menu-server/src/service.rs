//! Menu service
//!
//! Readiness-gated CRUD and search over the installed [`MenuStore`]. Every
//! operation checks readiness first and never touches storage while the
//! lifecycle manager is still provisioning.

use std::sync::Arc;

use axum::response::{IntoResponse, Response};
use shared::error::AppError;
use shared::models::{MenuItem, MenuItemDraft};
use shared::util::now_utc;
use thiserror::Error;
use uuid::Uuid;

use crate::db::{MenuStore, StorageHandle, StoreError};
use crate::search;

/// Menu operation errors
#[derive(Debug, Error)]
pub enum MenuError {
    /// Storage is not provisioned yet
    #[error("Storage is not ready")]
    NotReady,

    #[error("{0}")]
    Validation(String),

    #[error("{0}")]
    InvalidPrice(String),

    #[error("Menu item {0} not found")]
    NotFound(Uuid),

    #[error(transparent)]
    Storage(#[from] StoreError),
}

impl From<MenuError> for AppError {
    fn from(err: MenuError) -> Self {
        match err {
            MenuError::NotReady => AppError::not_ready(),
            MenuError::Validation(msg) => AppError::validation(msg),
            MenuError::InvalidPrice(msg) => AppError::invalid_price(msg),
            MenuError::NotFound(id) => AppError::menu_item_not_found(id),
            MenuError::Storage(e @ StoreError::Timeout(_)) => AppError::timeout(e.to_string()),
            MenuError::Storage(e) => AppError::database(e.to_string()),
        }
    }
}

impl IntoResponse for MenuError {
    fn into_response(self) -> Response {
        AppError::from(self).into_response()
    }
}

pub type MenuResult<T> = Result<T, MenuError>;

/// Menu operations on top of a [`StorageHandle`]
#[derive(Clone)]
pub struct MenuService {
    storage: StorageHandle,
}

impl MenuService {
    pub fn new(storage: StorageHandle) -> Self {
        Self { storage }
    }

    pub fn storage(&self) -> &StorageHandle {
        &self.storage
    }

    fn store(&self) -> MenuResult<Arc<dyn MenuStore>> {
        self.storage.store().ok_or(MenuError::NotReady)
    }

    /// Every item, in storage order
    pub async fn list(&self) -> MenuResult<Vec<MenuItem>> {
        self.search("").await
    }

    /// Full-scan substring search; a blank term lists everything
    pub async fn search(&self, term: &str) -> MenuResult<Vec<MenuItem>> {
        let store = self.store()?;
        Ok(search::search(store.as_ref(), term).await?)
    }

    pub async fn get(&self, id: Uuid) -> MenuResult<MenuItem> {
        let store = self.store()?;
        store.find_by_id(id).await?.ok_or(MenuError::NotFound(id))
    }

    /// Create a new item with a generated id
    pub async fn create(&self, draft: MenuItemDraft) -> MenuResult<MenuItem> {
        let store = self.store()?;
        let item = MenuItem::create(draft, now_utc());
        store.insert(&item).await?;

        tracing::info!(id = %item.id, name = ?item.name, "Menu item created");
        Ok(item)
    }

    /// Replace an existing item's fields.
    ///
    /// Unknown ids are `NotFound`; nothing is written for them, including a
    /// row deleted between the read and the write.
    pub async fn update(&self, id: Uuid, draft: MenuItemDraft) -> MenuResult<MenuItem> {
        let store = self.store()?;
        let mut item = store.find_by_id(id).await?.ok_or(MenuError::NotFound(id))?;

        item.apply(draft, now_utc());
        if !store.update(&item).await? {
            return Err(MenuError::NotFound(id));
        }

        tracing::info!(id = %id, "Menu item updated");
        Ok(item)
    }

    /// Remove an item; unknown ids are `NotFound`
    pub async fn delete(&self, id: Uuid) -> MenuResult<()> {
        let store = self.store()?;
        if store.find_by_id(id).await?.is_none() {
            return Err(MenuError::NotFound(id));
        }
        store.delete(id).await?;

        tracing::info!(id = %id, "Menu item deleted");
        Ok(())
    }
}
