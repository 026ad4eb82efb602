//! Readiness gate for storage-backed routes

use axum::{
    extract::{Request, State},
    middleware::Next,
    response::{IntoResponse, Response},
};
use http::{HeaderValue, header};

use crate::core::ServerState;
use crate::utils::AppError;

/// Reject with 503 `ServiceNotReady` until storage is provisioned.
///
/// `Retry-After` carries the provisioning retry delay, rounded up to whole
/// seconds.
pub async fn require_ready(State(state): State<ServerState>, req: Request, next: Next) -> Response {
    if state.storage.is_ready() {
        return next.run(req).await;
    }

    let retry_secs = state.config.retry_delay.as_millis().div_ceil(1000).max(1);
    let mut response = AppError::not_ready()
        .with_detail("attempts", state.storage.attempts())
        .into_response();
    if let Ok(value) = HeaderValue::from_str(&retry_secs.to_string()) {
        response.headers_mut().insert(header::RETRY_AFTER, value);
    }
    response
}
