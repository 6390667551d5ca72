use axum::Json;
use axum::extract::{Path, Query, State};
use axum::http::StatusCode;
use axum::response::IntoResponse;
use rubrica_api_types::{
    AddCommentRequest, CreatePostRequest, Envelope, PostCategory, PostStatus, ToggleLikeRequest,
};
use serde::Deserialize;

use super::parse_record_id;
use crate::application::error::AppError;
use crate::application::posts::PostFilter;
use crate::domain::error::DomainError;
use crate::infra::http::AppState;

#[derive(Debug, Deserialize)]
pub struct PostListQuery {
    pub status: Option<PostStatus>,
    pub category: Option<PostCategory>,
}

pub async fn list_posts(
    State(state): State<AppState>,
    Query(query): Query<PostListQuery>,
) -> Result<impl IntoResponse, AppError> {
    let filter = PostFilter {
        status: query.status,
        category: query.category,
    };
    let posts = state.posts.list_posts(filter).await?;
    let count = posts.len();
    Ok(Json(
        Envelope::ok("Posts retrieved successfully", posts).with_count(count),
    ))
}

/// Reading a post counts a view, so this mutates the record.
pub async fn get_post(
    State(state): State<AppState>,
    Path(id): Path<String>,
) -> Result<impl IntoResponse, AppError> {
    let id = parse_record_id("id", &id)?;
    let post = state.posts.view_post(&id).await?;
    Ok(Json(Envelope::ok("Post retrieved successfully", post)))
}

pub async fn create_post(
    State(state): State<AppState>,
    Json(request): Json<CreatePostRequest>,
) -> Result<impl IntoResponse, AppError> {
    let post = state.posts.create_post(request).await?;
    Ok((
        StatusCode::CREATED,
        Json(Envelope::ok("Post created successfully", post)),
    ))
}

pub async fn publish_post(
    State(state): State<AppState>,
    Path(id): Path<String>,
) -> Result<impl IntoResponse, AppError> {
    let id = parse_record_id("id", &id)?;
    let post = state.posts.publish_post(&id).await?;
    Ok(Json(Envelope::ok("Post published successfully", post)))
}

pub async fn add_comment(
    State(state): State<AppState>,
    Path(id): Path<String>,
    Json(request): Json<AddCommentRequest>,
) -> Result<impl IntoResponse, AppError> {
    let id = parse_record_id("id", &id)?;
    let user = match request.user.as_deref() {
        Some(user) => parse_record_id("user", user)?,
        None => return Err(DomainError::single("user", "user is required").into()),
    };
    let text = request.text.unwrap_or_default();
    let post = state.posts.add_comment(&id, user, &text).await?;
    Ok((
        StatusCode::CREATED,
        Json(Envelope::ok("Comment added successfully", post)),
    ))
}

pub async fn toggle_like(
    State(state): State<AppState>,
    Path(id): Path<String>,
    Json(request): Json<ToggleLikeRequest>,
) -> Result<impl IntoResponse, AppError> {
    let id = parse_record_id("id", &id)?;
    let user = match request.user.as_deref() {
        Some(user) => parse_record_id("user", user)?,
        None => return Err(DomainError::single("user", "user is required").into()),
    };
    let (post, liked) = state.posts.toggle_like(&id, user).await?;
    let message = if liked {
        "Post liked successfully"
    } else {
        "Post unliked successfully"
    };
    Ok(Json(Envelope::ok(message, post)))
}
