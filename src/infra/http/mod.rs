pub mod handlers;
mod middleware;

pub use middleware::{RequestContext, log_responses, set_request_context};

use std::sync::Arc;

use axum::{
    Router, middleware as axum_middleware,
    routing::{delete, get, post},
};

use crate::application::cache::CacheService;
use crate::application::health::DbHealth;
use crate::application::posts::PostService;
use crate::application::tasks::TaskService;
use crate::application::users::UserService;

#[derive(Clone)]
pub struct AppState {
    pub users: UserService,
    pub tasks: TaskService,
    pub posts: PostService,
    pub cache: Option<Arc<CacheService>>,
    pub db: Arc<dyn DbHealth>,
}

pub fn build_router(state: AppState) -> Router {
    Router::new()
        .route("/api", get(handlers::meta::api_index))
        .route(
            "/api/users",
            get(handlers::users::list_users).post(handlers::users::create_user),
        )
        .route(
            "/api/users/{id}",
            get(handlers::users::get_user)
                .put(handlers::users::update_user)
                .delete(handlers::users::delete_user),
        )
        .route(
            "/api/tasks",
            get(handlers::tasks::list_tasks).post(handlers::tasks::create_task),
        )
        .route(
            "/api/tasks/{id}",
            get(handlers::tasks::get_task)
                .put(handlers::tasks::update_task)
                .delete(handlers::tasks::delete_task),
        )
        .route(
            "/api/posts",
            get(handlers::posts::list_posts).post(handlers::posts::create_post),
        )
        .route("/api/posts/{id}", get(handlers::posts::get_post))
        .route("/api/posts/{id}/publish", post(handlers::posts::publish_post))
        .route("/api/posts/{id}/comments", post(handlers::posts::add_comment))
        .route("/api/posts/{id}/like", post(handlers::posts::toggle_like))
        .route("/api/cache", get(handlers::cache::list_entries))
        .route(
            "/api/cache/{key}",
            get(handlers::cache::get_entry)
                .post(handlers::cache::put_entry)
                .delete(handlers::cache::delete_entry),
        )
        .route("/api/redis/ping", get(handlers::cache::ping))
        .route("/api/redis/keys", get(handlers::cache::list_keys))
        .route("/api/redis/flush", delete(handlers::cache::flush))
        .route("/health", get(handlers::health::health))
        .with_state(state)
        .layer(axum_middleware::from_fn(log_responses))
        .layer(axum_middleware::from_fn(set_request_context))
}
