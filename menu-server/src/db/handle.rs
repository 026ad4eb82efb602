//! Shared storage handle and readiness state
//!
//! One writer (the lifecycle task) and many readers (request handlers). The
//! phase lives in a single atomic, so `connected` and `schema_ready` always
//! flip together and readers never take a lock.

use std::sync::Arc;
use std::sync::atomic::{AtomicU8, AtomicU64, Ordering};

use serde::Serialize;
use tokio::sync::{Notify, OnceCell};

use super::store::MenuStore;

/// Connection lifecycle phase
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "snake_case")]
#[repr(u8)]
pub enum LinkPhase {
    Disconnected = 0,
    Connecting = 1,
    Ready = 2,
}

impl LinkPhase {
    fn from_u8(value: u8) -> Self {
        match value {
            1 => LinkPhase::Connecting,
            2 => LinkPhase::Ready,
            _ => LinkPhase::Disconnected,
        }
    }
}

/// Snapshot of the two readiness flags
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct ConnectionState {
    /// Transport-level session to the cluster is established
    pub connected: bool,
    /// Keyspace and table are confirmed to exist
    pub schema_ready: bool,
}

struct Inner {
    phase: AtomicU8,
    attempts: AtomicU64,
    store: OnceCell<Arc<dyn MenuStore>>,
    ready: Notify,
}

/// Cloneable handle to the storage backend and its readiness
#[derive(Clone)]
pub struct StorageHandle {
    inner: Arc<Inner>,
}

impl StorageHandle {
    pub fn new() -> Self {
        Self {
            inner: Arc::new(Inner {
                phase: AtomicU8::new(LinkPhase::Disconnected as u8),
                attempts: AtomicU64::new(0),
                store: OnceCell::new(),
                ready: Notify::new(),
            }),
        }
    }

    pub fn phase(&self) -> LinkPhase {
        LinkPhase::from_u8(self.inner.phase.load(Ordering::Acquire))
    }

    pub fn state(&self) -> ConnectionState {
        let ready = self.phase() == LinkPhase::Ready;
        ConnectionState {
            connected: ready,
            schema_ready: ready,
        }
    }

    /// True only after a full provisioning sequence succeeded
    pub fn is_ready(&self) -> bool {
        self.phase() == LinkPhase::Ready
    }

    /// Number of provisioning attempts started so far
    pub fn attempts(&self) -> u64 {
        self.inner.attempts.load(Ordering::Relaxed)
    }

    /// The store, only once ready
    pub fn store(&self) -> Option<Arc<dyn MenuStore>> {
        if !self.is_ready() {
            return None;
        }
        self.inner.store.get().cloned()
    }

    /// Resolves once the handle is ready
    pub async fn wait_ready(&self) {
        loop {
            let notified = self.inner.ready.notified();
            if self.is_ready() {
                return;
            }
            notified.await;
        }
    }

    /// Enter `Connecting`, returns the 1-based attempt number
    pub(crate) fn begin_attempt(&self) -> u64 {
        self.set_phase(LinkPhase::Connecting);
        self.inner.attempts.fetch_add(1, Ordering::Relaxed) + 1
    }

    /// Any failed step drops both flags
    pub(crate) fn mark_failed(&self) {
        self.set_phase(LinkPhase::Disconnected);
    }

    /// Publish the provisioned store and flip to `Ready`
    ///
    /// The store is written before the phase, so any reader that observes
    /// `Ready` also sees the store.
    pub(crate) fn install(&self, store: Arc<dyn MenuStore>) {
        if self.inner.store.set(store).is_err() {
            tracing::warn!("Storage already installed, keeping the existing session");
        }
        self.set_phase(LinkPhase::Ready);
        self.inner.ready.notify_waiters();
    }

    fn set_phase(&self, phase: LinkPhase) {
        self.inner.phase.store(phase as u8, Ordering::Release);
    }
}

impl Default for StorageHandle {
    fn default() -> Self {
        Self::new()
    }
}
