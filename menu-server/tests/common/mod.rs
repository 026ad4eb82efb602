//! Test doubles and request helpers shared by the integration tests

#![allow(dead_code)]

use std::sync::atomic::{AtomicBool, AtomicU32, Ordering};
use std::sync::{Arc, Mutex};
use std::time::Duration;

use async_trait::async_trait;
use axum::Router;
use axum::body::Body;
use http::{Request, StatusCode};
use http_body_util::BodyExt;
use menu_server::db::{
    MenuStore, ProvisionError, ProvisionStep, Provisioner, StoreError, StoreResult,
    run_until_ready,
};
use menu_server::{Config, ServerState};
use serde_json::Value;
use shared::models::MenuItem;
use tower::ServiceExt;
use uuid::Uuid;

/// In-memory store keeping insertion order
#[derive(Default)]
pub struct MemoryStore {
    items: Mutex<Vec<MenuItem>>,
    pub calls: AtomicU32,
    pub failing: AtomicBool,
}

impl MemoryStore {
    pub fn new() -> Arc<Self> {
        Arc::new(Self::default())
    }

    pub fn len(&self) -> usize {
        self.items.lock().unwrap().len()
    }

    fn touch(&self) -> StoreResult<()> {
        self.calls.fetch_add(1, Ordering::SeqCst);
        if self.failing.load(Ordering::SeqCst) {
            return Err(StoreError::Database("connection reset".into()));
        }
        Ok(())
    }
}

#[async_trait]
impl MenuStore for MemoryStore {
    async fn list_all(&self) -> StoreResult<Vec<MenuItem>> {
        self.touch()?;
        Ok(self.items.lock().unwrap().clone())
    }

    async fn find_by_id(&self, id: Uuid) -> StoreResult<Option<MenuItem>> {
        self.touch()?;
        Ok(self.items.lock().unwrap().iter().find(|i| i.id == id).cloned())
    }

    async fn insert(&self, item: &MenuItem) -> StoreResult<()> {
        self.touch()?;
        self.items.lock().unwrap().push(item.clone());
        Ok(())
    }

    async fn update(&self, item: &MenuItem) -> StoreResult<bool> {
        self.touch()?;
        let mut items = self.items.lock().unwrap();
        match items.iter_mut().find(|i| i.id == item.id) {
            Some(slot) => {
                *slot = item.clone();
                Ok(true)
            }
            // Conditional, like `UPDATE ... IF EXISTS`
            None => Ok(false),
        }
    }

    async fn delete(&self, id: Uuid) -> StoreResult<()> {
        self.touch()?;
        self.items.lock().unwrap().retain(|i| i.id != id);
        Ok(())
    }
}

/// Fails the first `failures` attempts, then hands out `store`
pub struct ScriptedProvisioner {
    store: Arc<MemoryStore>,
    failures: u32,
    pub calls: AtomicU32,
}

impl ScriptedProvisioner {
    pub fn new(store: Arc<MemoryStore>, failures: u32) -> Arc<Self> {
        Arc::new(Self {
            store,
            failures,
            calls: AtomicU32::new(0),
        })
    }

    pub fn calls(&self) -> u32 {
        self.calls.load(Ordering::SeqCst)
    }
}

#[async_trait]
impl Provisioner for ScriptedProvisioner {
    async fn provision(&self) -> Result<Arc<dyn MenuStore>, ProvisionError> {
        let call = self.calls.fetch_add(1, Ordering::SeqCst);
        if call < self.failures {
            return Err(ProvisionError::new(ProvisionStep::Connect, "connection refused"));
        }
        Ok(self.store.clone())
    }
}

pub fn test_config() -> Config {
    Config::from_lookup(|_| None).unwrap()
}

/// State whose storage is already provisioned with `store`
pub async fn ready_state(store: Arc<MemoryStore>) -> ServerState {
    let state = ServerState::new(test_config());
    let provisioner = ScriptedProvisioner::new(store, 0);
    run_until_ready(provisioner.as_ref(), &state.storage, Duration::from_secs(5)).await;
    assert!(state.storage.is_ready());
    state
}

pub struct TestResponse {
    pub status: StatusCode,
    pub headers: http::HeaderMap,
    pub body: Value,
}

pub async fn send(app: &Router, method: &str, uri: &str, body: Option<Value>) -> TestResponse {
    let builder = Request::builder().method(method).uri(uri);
    let request = match body {
        Some(json) => builder
            .header("content-type", "application/json")
            .body(Body::from(json.to_string()))
            .unwrap(),
        None => builder.body(Body::empty()).unwrap(),
    };
    send_request(app, request).await
}

/// Drive a prebuilt request, for tests that need custom headers
pub async fn send_request(app: &Router, request: Request<Body>) -> TestResponse {
    let response = app.clone().oneshot(request).await.unwrap();
    let status = response.status();
    let headers = response.headers().clone();
    let bytes = response.into_body().collect().await.unwrap().to_bytes();
    let body = if bytes.is_empty() {
        Value::Null
    } else {
        serde_json::from_slice(&bytes)
            .unwrap_or_else(|_| Value::String(String::from_utf8_lossy(&bytes).into_owned()))
    };

    TestResponse {
        status,
        headers,
        body,
    }
}

pub async fn get(app: &Router, uri: &str) -> TestResponse {
    send(app, "GET", uri, None).await
}
