use axum::Json;
use axum::extract::{Path, State};
use axum::http::StatusCode;
use axum::response::IntoResponse;
use rubrica_api_types::{
    CreateUserRequest, DeletedRecord, Envelope, UpdateUserRequest, User,
};

use super::parse_record_id;
use crate::application::error::AppError;
use crate::infra::http::AppState;

pub async fn list_users(State(state): State<AppState>) -> Result<impl IntoResponse, AppError> {
    let (users, source) = state.users.list_users().await?;
    let count = users.len();
    Ok(Json(
        Envelope::ok("Users retrieved successfully", users)
            .with_count(count)
            .with_source(source),
    ))
}

pub async fn get_user(
    State(state): State<AppState>,
    Path(id): Path<String>,
) -> Result<impl IntoResponse, AppError> {
    let id = parse_record_id("id", &id)?;
    let user = state.users.get_user(&id).await?;
    Ok(Json(Envelope::ok("User retrieved successfully", user)))
}

pub async fn create_user(
    State(state): State<AppState>,
    Json(request): Json<CreateUserRequest>,
) -> Result<impl IntoResponse, AppError> {
    let user = state.users.create_user(request).await?;
    Ok((
        StatusCode::CREATED,
        Json(Envelope::ok("User created successfully", user)),
    ))
}

pub async fn update_user(
    State(state): State<AppState>,
    Path(id): Path<String>,
    Json(request): Json<UpdateUserRequest>,
) -> Result<impl IntoResponse, AppError> {
    let id = parse_record_id("id", &id)?;
    let user = state.users.update_user(&id, request).await?;
    Ok(Json(Envelope::ok("User updated successfully", user)))
}

pub async fn delete_user(
    State(state): State<AppState>,
    Path(id): Path<String>,
) -> Result<impl IntoResponse, AppError> {
    let id = parse_record_id("id", &id)?;
    let removed: User = state.users.delete_user(&id).await?;
    let record = DeletedRecord {
        id: removed.id,
        label: removed.name,
    };
    Ok(Json(Envelope::ok("User deleted successfully", record)))
}
