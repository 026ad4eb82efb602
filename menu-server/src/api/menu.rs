//! Menu API

use axum::{
    Json, Router,
    extract::{Path, Query, State, rejection::JsonRejection},
    http::StatusCode,
    middleware,
    routing::get,
};
use serde::Deserialize;
use serde_json::{Value, json};
use shared::models::{MenuItem, MenuItemInput};

use crate::core::ServerState;
use crate::middleware::require_ready;
use crate::utils::validation::{parse_id, validate_input};
use crate::utils::{AppError, AppResult};

pub fn router(state: &ServerState) -> Router<ServerState> {
    Router::new().nest("/api/menu", menu_routes(state))
}

fn menu_routes(state: &ServerState) -> Router<ServerState> {
    Router::new()
        .route("/", get(list).post(create))
        .route("/search", get(search))
        .route("/{id}", get(get_by_id).put(update).delete(delete))
        .route_layer(middleware::from_fn_with_state(state.clone(), require_ready))
}

#[derive(Debug, Deserialize)]
pub struct SearchParams {
    #[serde(default)]
    pub q: Option<String>,
}

fn json_body(
    payload: Result<Json<MenuItemInput>, JsonRejection>,
) -> AppResult<MenuItemInput> {
    payload
        .map(|Json(input)| input)
        .map_err(|e| AppError::invalid_request(e.body_text()))
}

// =============================================================================
// Handlers
// =============================================================================

/// GET /api/menu
pub async fn list(State(state): State<ServerState>) -> AppResult<Json<Vec<MenuItem>>> {
    Ok(Json(state.menu.list().await?))
}

/// GET /api/menu/search?q=term
pub async fn search(
    State(state): State<ServerState>,
    Query(params): Query<SearchParams>,
) -> AppResult<Json<Vec<MenuItem>>> {
    let term = params.q.unwrap_or_default();
    Ok(Json(state.menu.search(&term).await?))
}

/// GET /api/menu/{id}
pub async fn get_by_id(
    State(state): State<ServerState>,
    Path(id): Path<String>,
) -> AppResult<Json<MenuItem>> {
    let id = parse_id(&id)?;
    Ok(Json(state.menu.get(id).await?))
}

/// POST /api/menu
pub async fn create(
    State(state): State<ServerState>,
    payload: Result<Json<MenuItemInput>, JsonRejection>,
) -> AppResult<(StatusCode, Json<MenuItem>)> {
    let draft = validate_input(&json_body(payload)?)?;
    let item = state.menu.create(draft).await?;
    Ok((StatusCode::CREATED, Json(item)))
}

/// PUT /api/menu/{id}
pub async fn update(
    State(state): State<ServerState>,
    Path(id): Path<String>,
    payload: Result<Json<MenuItemInput>, JsonRejection>,
) -> AppResult<Json<MenuItem>> {
    let id = parse_id(&id)?;
    let draft = validate_input(&json_body(payload)?)?;
    Ok(Json(state.menu.update(id, draft).await?))
}

/// DELETE /api/menu/{id}
pub async fn delete(
    State(state): State<ServerState>,
    Path(id): Path<String>,
) -> AppResult<Json<Value>> {
    let id = parse_id(&id)?;
    state.menu.delete(id).await?;
    Ok(Json(json!({ "deleted": id })))
}
