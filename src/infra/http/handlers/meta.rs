use axum::Json;
use rubrica_api_types::Envelope;
use serde_json::{Value, json};

pub async fn api_index() -> Json<Envelope<Value>> {
    Json(Envelope::ok(
        "Rubrica API",
        json!({
            "users": "/api/users",
            "tasks": "/api/tasks",
            "posts": "/api/posts",
            "cache": "/api/cache/{key}",
            "redis": "/api/redis/ping",
            "health": "/health",
        }),
    ))
}
