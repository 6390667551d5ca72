//! Live end-to-end coverage against a running rubrica instance.
//!
//! - Sends real HTTP requests to the address in `RUBRICA_SITE_URL`
//!   (default `http://127.0.0.1:3000`).
//! - Marked `#[ignore]` so it only runs manually with the server (and its
//!   Postgres, optionally Redis) already up.

use reqwest::{Client, StatusCode};
use serde_json::{Value, json};
use std::time::{SystemTime, UNIX_EPOCH};

type TestResult<T> = Result<T, Box<dyn std::error::Error>>;

fn base_url() -> String {
    std::env::var("RUBRICA_SITE_URL")
        .unwrap_or_else(|_| "http://127.0.0.1:3000".to_string())
        .trim_end_matches('/')
        .to_string()
}

fn current_suffix() -> u64 {
    SystemTime::now()
        .duration_since(UNIX_EPOCH)
        .map(|d| d.as_millis() as u64)
        .unwrap_or_default()
}

async fn post_json(
    client: &Client,
    base: &str,
    path: &str,
    expected: StatusCode,
    body: Value,
) -> TestResult<Value> {
    let response = client
        .post(format!("{base}{path}"))
        .json(&body)
        .send()
        .await?;
    assert_eq!(response.status(), expected, "POST {path}");
    Ok(response.json().await?)
}

async fn get_json(
    client: &Client,
    base: &str,
    path: &str,
    expected: StatusCode,
) -> TestResult<Value> {
    let response = client.get(format!("{base}{path}")).send().await?;
    assert_eq!(response.status(), expected, "GET {path}");
    Ok(response.json().await?)
}

#[tokio::test]
#[ignore]
async fn live_api_end_to_end() -> TestResult<()> {
    let client = Client::builder().build()?;
    let base = base_url();
    let suf = current_suffix();

    // HEALTH
    let health = get_json(&client, &base, "/health", StatusCode::OK).await?;
    assert_eq!(health["services"]["database"], json!("ok"));
    let cache_enabled = health["services"]["cache"] == json!("ok");

    // USERS
    let created = post_json(
        &client,
        &base,
        "/api/users",
        StatusCode::CREATED,
        json!({"name": format!("Live Test {suf}"), "email": format!("live-{suf}@example.com"), "age": 30}),
    )
    .await?;
    let user_id = created["data"]["id"]
        .as_str()
        .ok_or("missing user id")?
        .to_string();

    let first = get_json(&client, &base, "/api/users", StatusCode::OK).await?;
    assert_eq!(first["source"], json!("database"));
    let second = get_json(&client, &base, "/api/users", StatusCode::OK).await?;
    if cache_enabled {
        assert_eq!(second["source"], json!("cache"));
    }

    // TASKS
    let task = post_json(
        &client,
        &base,
        "/api/tasks",
        StatusCode::CREATED,
        json!({"title": format!("live-task-{suf}")}),
    )
    .await?;
    let task_id = task["data"]["id"]
        .as_str()
        .ok_or("missing task id")?
        .to_string();

    // POSTS
    let post = post_json(
        &client,
        &base,
        "/api/posts",
        StatusCode::CREATED,
        json!({
            "title": format!("Live post {suf}"),
            "content": "End to end coverage body",
            "author": user_id,
            "tags": ["live"],
        }),
    )
    .await?;
    let post_id = post["data"]["id"]
        .as_str()
        .ok_or("missing post id")?
        .to_string();

    let published = post_json(
        &client,
        &base,
        &format!("/api/posts/{post_id}/publish"),
        StatusCode::OK,
        json!({}),
    )
    .await?;
    assert_eq!(published["data"]["status"], json!("published"));

    post_json(
        &client,
        &base,
        &format!("/api/posts/{post_id}/comments"),
        StatusCode::CREATED,
        json!({"user": user_id, "text": "live comment"}),
    )
    .await?;

    let liked = post_json(
        &client,
        &base,
        &format!("/api/posts/{post_id}/like"),
        StatusCode::OK,
        json!({"user": user_id}),
    )
    .await?;
    assert_eq!(liked["message"], json!("Post liked successfully"));

    // CACHE (only meaningful with Redis up)
    if cache_enabled {
        let key = format!("live-{suf}");
        post_json(
            &client,
            &base,
            &format!("/api/cache/{key}"),
            StatusCode::CREATED,
            json!({"value": {"probe": true}, "ttl": 60}),
        )
        .await?;
        let entry = get_json(&client, &base, &format!("/api/cache/{key}"), StatusCode::OK).await?;
        assert_eq!(entry["data"]["value"]["probe"], json!(true));
        let response = client
            .delete(format!("{base}/api/cache/{key}"))
            .send()
            .await?;
        assert_eq!(response.status(), StatusCode::OK);

        get_json(&client, &base, "/api/redis/ping", StatusCode::OK).await?;
    }

    // CLEANUP
    let response = client
        .delete(format!("{base}/api/tasks/{task_id}"))
        .send()
        .await?;
    assert_eq!(response.status(), StatusCode::OK);
    let response = client
        .delete(format!("{base}/api/users/{user_id}"))
        .send()
        .await?;
    assert_eq!(response.status(), StatusCode::OK);

    Ok(())
}
