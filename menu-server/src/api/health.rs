//! Health check endpoint
//!
//! Never gated on storage readiness: the process is alive even while the
//! lifecycle task is still retrying.

use axum::{Json, Router, extract::State, routing::get};
use serde::Serialize;

use crate::core::ServerState;
use crate::db::LinkPhase;

#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct HealthResponse {
    pub status: &'static str,
    pub service: &'static str,
    pub version: &'static str,
    pub phase: LinkPhase,
    pub connected: bool,
    pub schema_ready: bool,
    pub attempts: u64,
}

pub fn router() -> Router<ServerState> {
    Router::new().route("/health", get(health_check))
}

pub async fn health_check(State(state): State<ServerState>) -> Json<HealthResponse> {
    let connection = state.storage.state();
    Json(HealthResponse {
        status: if state.storage.is_ready() { "ok" } else { "starting" },
        service: "menu-server",
        version: env!("CARGO_PKG_VERSION"),
        phase: state.storage.phase(),
        connected: connection.connected,
        schema_ready: connection.schema_ready,
        attempts: state.storage.attempts(),
    })
}
