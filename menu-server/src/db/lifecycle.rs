//! Connection lifecycle
//!
//! ```text
//! DISCONNECTED ──attempt──▶ CONNECTING ──all steps ok──▶ READY
//!       ▲                        │
//!       └──── any step fails ────┘  (sleep retry_delay, try again)
//! ```
//!
//! There is no attempt limit, no backoff growth and no terminal failure
//! state: the process has nothing useful to do until storage is reachable.

use std::fmt;
use std::sync::Arc;
use std::time::Duration;

use async_trait::async_trait;
use thiserror::Error;

use super::handle::StorageHandle;
use super::store::MenuStore;

/// Provisioning steps, in execution order
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ProvisionStep {
    Connect,
    CreateKeyspace,
    UseKeyspace,
    CreateTable,
    Verify,
    Prepare,
}

impl fmt::Display for ProvisionStep {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let name = match self {
            ProvisionStep::Connect => "connect",
            ProvisionStep::CreateKeyspace => "create_keyspace",
            ProvisionStep::UseKeyspace => "use_keyspace",
            ProvisionStep::CreateTable => "create_table",
            ProvisionStep::Verify => "verify",
            ProvisionStep::Prepare => "prepare",
        };
        f.write_str(name)
    }
}

/// Failure during the provisioning sequence
///
/// Never reaches a request handler; it only drives the retry loop.
#[derive(Debug, Error)]
#[error("{step} failed: {message}")]
pub struct ProvisionError {
    pub step: ProvisionStep,
    pub message: String,
}

impl ProvisionError {
    pub fn new(step: ProvisionStep, message: impl Into<String>) -> Self {
        Self {
            step,
            message: message.into(),
        }
    }

    /// `map_err` adapter tagging a driver error with the step it came from
    pub fn at<E: fmt::Display>(step: ProvisionStep) -> impl FnOnce(E) -> ProvisionError {
        move |e| ProvisionError::new(step, e.to_string())
    }
}

/// Runs the full connect → keyspace → table → verify sequence once
#[async_trait]
pub trait Provisioner: Send + Sync {
    async fn provision(&self) -> Result<Arc<dyn MenuStore>, ProvisionError>;
}

/// Retry provisioning until it succeeds, then publish the store.
///
/// Each failure resets the handle to `Disconnected` before sleeping, so no
/// partial state survives a failed attempt.
pub async fn run_until_ready<P>(provisioner: &P, handle: &StorageHandle, retry_delay: Duration)
where
    P: Provisioner + ?Sized,
{
    loop {
        let attempt = handle.begin_attempt();
        tracing::info!(attempt, "Connecting to storage");

        match provisioner.provision().await {
            Ok(store) => {
                handle.install(store);
                tracing::info!(attempt, "Storage ready");
                return;
            }
            Err(e) => {
                handle.mark_failed();
                tracing::warn!(
                    attempt,
                    step = %e.step,
                    error = %e.message,
                    retry_in_ms = retry_delay.as_millis() as u64,
                    "Storage provisioning failed, retrying"
                );
                tokio::time::sleep(retry_delay).await;
            }
        }
    }
}
