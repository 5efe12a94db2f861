//! HTTP/JSON front-end.
//!
//! Routes:
//! - `GET /keys` - list live keys
//! - `GET /keys/{key}` - fetch a value
//! - `PUT /keys/{key}` - store a value with an optional TTL
//! - `DELETE /keys/{key}` - delete a key

use axum::body::Bytes;
use axum::extract::{Path, State};
use axum::http::StatusCode;
use axum::routing::get;
use axum::{Json, Router};
use serde::{Deserialize, Serialize};
use stashr_core::Store;

use crate::error::AppError;
use crate::validation::{truncate_key_for_log, ttl_from_seconds, validate_key, validate_value};

#[derive(Debug, Serialize)]
pub struct GetResponse {
    pub value: String,
}

/// Body of `PUT /keys/{key}`. Missing fields take their zero values.
#[derive(Debug, Default, Deserialize)]
#[serde(default)]
pub struct SetRequest {
    pub value: String,
    pub ttl_seconds: i64,
}

#[derive(Debug, Serialize)]
pub struct DeleteResponse {
    pub deleted: bool,
}

#[derive(Debug, Serialize)]
pub struct ListResponse {
    pub keys: Vec<String>,
}

/// Builds the HTTP router over a shared store
pub fn router(store: Store) -> Router {
    Router::new()
        .route("/keys", get(list_keys))
        .route("/keys/{key}", get(get_key).put(set_key).delete(delete_key))
        .with_state(store)
}

/// GET /keys - List live keys, sorted.
async fn list_keys(State(store): State<Store>) -> Json<ListResponse> {
    tracing::debug!("LIST");
    let mut keys = store.list();
    keys.sort_unstable();
    Json(ListResponse { keys })
}

/// GET /keys/{key} - Get a value by key.
async fn get_key(
    State(store): State<Store>,
    Path(key): Path<String>,
) -> Result<Json<GetResponse>, AppError> {
    validate_key(&key)?;
    tracing::debug!("GET {}", truncate_key_for_log(&key));

    let value = store.get(&key).ok_or(AppError::NotFound)?;
    Ok(Json(GetResponse { value }))
}

/// PUT /keys/{key} - Set a value with optional TTL.
///
/// The body is parsed as JSON whatever its `Content-Type`.
async fn set_key(
    State(store): State<Store>,
    Path(key): Path<String>,
    body: Bytes,
) -> Result<StatusCode, AppError> {
    validate_key(&key)?;
    let req: SetRequest = serde_json::from_slice(&body)
        .map_err(|_| AppError::BadRequest("invalid JSON".to_string()))?;
    validate_value(&req.value)?;

    tracing::debug!(
        "SET {} (ttl: {})",
        truncate_key_for_log(&key),
        if req.ttl_seconds > 0 { format!("{}s", req.ttl_seconds) } else { "never".to_string() }
    );

    store.set(key, req.value, ttl_from_seconds(req.ttl_seconds));
    Ok(StatusCode::NO_CONTENT)
}

/// DELETE /keys/{key} - Delete a key.
async fn delete_key(
    State(store): State<Store>,
    Path(key): Path<String>,
) -> Result<Json<DeleteResponse>, AppError> {
    validate_key(&key)?;
    tracing::debug!("DELETE {}", truncate_key_for_log(&key));

    let deleted = store.delete(&key);
    Ok(Json(DeleteResponse { deleted }))
}
