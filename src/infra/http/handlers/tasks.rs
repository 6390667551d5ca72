use axum::Json;
use axum::extract::{Path, Query, State};
use axum::http::StatusCode;
use axum::response::IntoResponse;
use rubrica_api_types::{CreateTaskRequest, DeletedRecord, Envelope, UpdateTaskRequest};
use serde::Deserialize;

use super::parse_record_id;
use crate::application::error::AppError;
use crate::infra::http::AppState;

#[derive(Debug, Deserialize)]
pub struct TaskListQuery {
    pub completed: Option<bool>,
}

pub async fn list_tasks(
    State(state): State<AppState>,
    Query(query): Query<TaskListQuery>,
) -> Result<impl IntoResponse, AppError> {
    let tasks = state.tasks.list_tasks(query.completed).await?;
    let count = tasks.len();
    Ok(Json(
        Envelope::ok("Tasks retrieved successfully", tasks).with_count(count),
    ))
}

pub async fn get_task(
    State(state): State<AppState>,
    Path(id): Path<String>,
) -> Result<impl IntoResponse, AppError> {
    let id = parse_record_id("id", &id)?;
    let task = state.tasks.get_task(&id).await?;
    Ok(Json(Envelope::ok("Task retrieved successfully", task)))
}

pub async fn create_task(
    State(state): State<AppState>,
    Json(request): Json<CreateTaskRequest>,
) -> Result<impl IntoResponse, AppError> {
    let task = state.tasks.create_task(request).await?;
    Ok((
        StatusCode::CREATED,
        Json(Envelope::ok("Task created successfully", task)),
    ))
}

pub async fn update_task(
    State(state): State<AppState>,
    Path(id): Path<String>,
    Json(request): Json<UpdateTaskRequest>,
) -> Result<impl IntoResponse, AppError> {
    let id = parse_record_id("id", &id)?;
    let task = state.tasks.update_task(&id, request).await?;
    Ok(Json(Envelope::ok("Task updated successfully", task)))
}

pub async fn delete_task(
    State(state): State<AppState>,
    Path(id): Path<String>,
) -> Result<impl IntoResponse, AppError> {
    let id = parse_record_id("id", &id)?;
    let removed = state.tasks.delete_task(&id).await?;
    let record = DeletedRecord {
        id: removed.id,
        label: removed.title,
    };
    Ok(Json(Envelope::ok("Task deleted successfully", record)))
}
