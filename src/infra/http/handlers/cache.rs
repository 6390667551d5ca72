use std::sync::Arc;

use axum::Json;
use axum::extract::{Path, Query, State};
use axum::http::StatusCode;
use axum::response::IntoResponse;
use rubrica_api_types::{CacheSetRequest, Envelope};
use serde::Deserialize;
use serde_json::json;

use crate::application::cache::{CacheError, CacheService};
use crate::application::error::AppError;
use crate::infra::http::AppState;

/// The explicit cache surface is strict: with caching disabled every route
/// here answers 503 instead of degrading silently.
fn require_cache(state: &AppState) -> Result<&Arc<CacheService>, AppError> {
    state
        .cache
        .as_ref()
        .ok_or_else(|| CacheError::unavailable("caching is disabled").into())
}

pub async fn list_entries(
    State(state): State<AppState>,
    Query(query): Query<KeysQuery>,
) -> Result<impl IntoResponse, AppError> {
    let cache = require_cache(&state)?;
    let pattern = query.pattern.as_deref().unwrap_or("*");
    let entries = cache.entries(pattern).await?;
    let count = entries.len();
    Ok(Json(
        Envelope::ok("Cache entries retrieved", entries).with_count(count),
    ))
}

pub async fn get_entry(
    State(state): State<AppState>,
    Path(key): Path<String>,
) -> Result<impl IntoResponse, AppError> {
    let cache = require_cache(&state)?;
    let entry = cache
        .entry(&key)
        .await?
        .ok_or(AppError::not_found("Cache entry"))?;
    Ok(Json(Envelope::ok("Cache entry retrieved", entry)))
}

pub async fn put_entry(
    State(state): State<AppState>,
    Path(key): Path<String>,
    Json(request): Json<CacheSetRequest>,
) -> Result<impl IntoResponse, AppError> {
    let cache = require_cache(&state)?;
    let entry = cache.put_entry(&key, request.value, request.ttl).await?;
    Ok((
        StatusCode::CREATED,
        Json(Envelope::ok("Cache entry stored", entry)),
    ))
}

pub async fn delete_entry(
    State(state): State<AppState>,
    Path(key): Path<String>,
) -> Result<impl IntoResponse, AppError> {
    let cache = require_cache(&state)?;
    if !cache.remove(&key).await? {
        return Err(AppError::not_found("Cache entry"));
    }
    Ok(Json(Envelope::ok("Cache entry deleted", json!({ "key": key }))))
}

pub async fn ping(State(state): State<AppState>) -> Result<impl IntoResponse, AppError> {
    let cache = require_cache(&state)?;
    cache.ping().await?;
    Ok(Json(Envelope::ok(
        "Redis connection is healthy",
        json!({ "reply": "PONG" }),
    )))
}

#[derive(Debug, Deserialize)]
pub struct KeysQuery {
    pub pattern: Option<String>,
}

pub async fn list_keys(
    State(state): State<AppState>,
    Query(query): Query<KeysQuery>,
) -> Result<impl IntoResponse, AppError> {
    let cache = require_cache(&state)?;
    let pattern = query.pattern.as_deref().unwrap_or("*");
    let keys = cache.list_keys(pattern).await?;
    let count = keys.len();
    Ok(Json(
        Envelope::ok("Cache keys retrieved", keys).with_count(count),
    ))
}

pub async fn flush(State(state): State<AppState>) -> Result<impl IntoResponse, AppError> {
    let cache = require_cache(&state)?;
    cache.flush().await?;
    Ok(Json(Envelope::<()>::ok_empty("Cache flushed")))
}
