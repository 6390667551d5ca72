//! Typed wrappers over the server endpoints. Every call goes through
//! [`Ctx::request`], which logs the exchange and normalizes failures.

#![deny(clippy::all, clippy::pedantic)]

use reqwest::Method;
use rubrica_api_types::{
    AddCommentRequest, CacheEntry, CacheSetRequest, CreatePostRequest, CreateTaskRequest,
    CreateUserRequest, DeletedRecord, Envelope, HealthReport, Post, PostCategory, PostStatus,
    RecordId, Task, ToggleLikeRequest, UpdateTaskRequest, UpdateUserRequest, User,
};

use crate::client::{CliError, Ctx};

fn to_value<T: serde::Serialize>(value: &T) -> Result<serde_json::Value, CliError> {
    serde_json::to_value(value).map_err(|e| CliError::InvalidInput(e.to_string()))
}

pub async fn list_users(ctx: &Ctx) -> Result<Envelope<Vec<User>>, CliError> {
    ctx.request(Method::GET, "api/users", None, None).await
}

pub async fn get_user(ctx: &Ctx, id: &RecordId) -> Result<Envelope<User>, CliError> {
    let path = format!("api/users/{id}");
    ctx.request(Method::GET, &path, None, None).await
}

pub async fn create_user(
    ctx: &Ctx,
    request: &CreateUserRequest,
) -> Result<Envelope<User>, CliError> {
    ctx.request(Method::POST, "api/users", None, Some(to_value(request)?))
        .await
}

pub async fn update_user(
    ctx: &Ctx,
    id: &RecordId,
    request: &UpdateUserRequest,
) -> Result<Envelope<User>, CliError> {
    let path = format!("api/users/{id}");
    ctx.request(Method::PUT, &path, None, Some(to_value(request)?))
        .await
}

pub async fn delete_user(ctx: &Ctx, id: &RecordId) -> Result<Envelope<DeletedRecord>, CliError> {
    let path = format!("api/users/{id}");
    ctx.request(Method::DELETE, &path, None, None).await
}

pub async fn list_tasks(
    ctx: &Ctx,
    completed: Option<bool>,
) -> Result<Envelope<Vec<Task>>, CliError> {
    let query = completed.map(|value| vec![("completed", value.to_string())]);
    ctx.request(Method::GET, "api/tasks", query.as_deref(), None)
        .await
}

pub async fn create_task(
    ctx: &Ctx,
    request: &CreateTaskRequest,
) -> Result<Envelope<Task>, CliError> {
    ctx.request(Method::POST, "api/tasks", None, Some(to_value(request)?))
        .await
}

pub async fn update_task(
    ctx: &Ctx,
    id: &RecordId,
    request: &UpdateTaskRequest,
) -> Result<Envelope<Task>, CliError> {
    let path = format!("api/tasks/{id}");
    ctx.request(Method::PUT, &path, None, Some(to_value(request)?))
        .await
}

pub async fn delete_task(ctx: &Ctx, id: &RecordId) -> Result<Envelope<DeletedRecord>, CliError> {
    let path = format!("api/tasks/{id}");
    ctx.request(Method::DELETE, &path, None, None).await
}

pub async fn list_posts(
    ctx: &Ctx,
    status: Option<PostStatus>,
    category: Option<PostCategory>,
) -> Result<Envelope<Vec<Post>>, CliError> {
    let mut query = Vec::new();
    if let Some(s) = status {
        query.push(("status", s.as_str().to_string()));
    }
    if let Some(c) = category {
        query.push(("category", c.as_str().to_string()));
    }
    let query = if query.is_empty() {
        None
    } else {
        Some(query.as_slice())
    };
    ctx.request(Method::GET, "api/posts", query, None).await
}

pub async fn get_post(ctx: &Ctx, id: &RecordId) -> Result<Envelope<Post>, CliError> {
    let path = format!("api/posts/{id}");
    ctx.request(Method::GET, &path, None, None).await
}

pub async fn create_post(
    ctx: &Ctx,
    request: &CreatePostRequest,
) -> Result<Envelope<Post>, CliError> {
    ctx.request(Method::POST, "api/posts", None, Some(to_value(request)?))
        .await
}

pub async fn publish_post(ctx: &Ctx, id: &RecordId) -> Result<Envelope<Post>, CliError> {
    let path = format!("api/posts/{id}/publish");
    ctx.request(Method::POST, &path, None, None).await
}

pub async fn add_comment(
    ctx: &Ctx,
    id: &RecordId,
    request: &AddCommentRequest,
) -> Result<Envelope<Post>, CliError> {
    let path = format!("api/posts/{id}/comments");
    ctx.request(Method::POST, &path, None, Some(to_value(request)?))
        .await
}

pub async fn toggle_like(
    ctx: &Ctx,
    id: &RecordId,
    request: &ToggleLikeRequest,
) -> Result<Envelope<Post>, CliError> {
    let path = format!("api/posts/{id}/like");
    ctx.request(Method::POST, &path, None, Some(to_value(request)?))
        .await
}

pub async fn cache_entries(
    ctx: &Ctx,
    pattern: &str,
) -> Result<Envelope<Vec<CacheEntry>>, CliError> {
    let query = [("pattern", pattern.to_string())];
    ctx.request(Method::GET, "api/cache", Some(&query), None)
        .await
}

pub async fn cache_get(ctx: &Ctx, key: &str) -> Result<Envelope<CacheEntry>, CliError> {
    let path = format!("api/cache/{key}");
    ctx.request(Method::GET, &path, None, None).await
}

pub async fn cache_set(
    ctx: &Ctx,
    key: &str,
    request: &CacheSetRequest,
) -> Result<Envelope<CacheEntry>, CliError> {
    let path = format!("api/cache/{key}");
    ctx.request(Method::POST, &path, None, Some(to_value(request)?))
        .await
}

pub async fn cache_del(ctx: &Ctx, key: &str) -> Result<Envelope<serde_json::Value>, CliError> {
    let path = format!("api/cache/{key}");
    ctx.request(Method::DELETE, &path, None, None).await
}

pub async fn cache_keys(ctx: &Ctx, pattern: &str) -> Result<Envelope<Vec<String>>, CliError> {
    let query = [("pattern", pattern.to_string())];
    ctx.request(Method::GET, "api/redis/keys", Some(&query), None)
        .await
}

pub async fn cache_flush(ctx: &Ctx) -> Result<Envelope<serde_json::Value>, CliError> {
    ctx.request(Method::DELETE, "api/redis/flush", None, None)
        .await
}

pub async fn redis_ping(ctx: &Ctx) -> Result<Envelope<serde_json::Value>, CliError> {
    ctx.request(Method::GET, "api/redis/ping", None, None).await
}

pub async fn health(ctx: &Ctx) -> Result<HealthReport, CliError> {
    ctx.request_any_status(Method::GET, "health").await
}
