//! Router-level API tests over in-memory repositories. No Postgres or Redis
//! needed; the adapters are swapped for stubs behind the repo and cache seams.

use std::collections::HashMap;
use std::sync::{
    Arc, Mutex,
    atomic::{AtomicBool, Ordering},
};
use std::time::Duration;

use async_trait::async_trait;
use axum::Router;
use axum::body::Body;
use axum::http::{Request, StatusCode, header};
use http_body_util::BodyExt;
use serde_json::{Value, json};
use tower::ServiceExt;

use rubrica::application::cache::{CacheError, CacheService, CacheStore};
use rubrica::application::health::DbHealth;
use rubrica::application::posts::PostService;
use rubrica::application::repos::{PostsRepo, RepoError, TasksRepo, UsersRepo};
use rubrica::application::tasks::TaskService;
use rubrica::application::users::UserService;
use rubrica::infra::http::{AppState, build_router};
use rubrica_api_types::{Post, RecordId, Task, User};

#[derive(Default)]
struct MemoryBackend {
    users: Mutex<HashMap<RecordId, User>>,
    tasks: Mutex<HashMap<RecordId, Task>>,
    posts: Mutex<HashMap<RecordId, Post>>,
    db_down: AtomicBool,
}

#[async_trait]
impl UsersRepo for MemoryBackend {
    async fn list_users(&self) -> Result<Vec<User>, RepoError> {
        let mut users: Vec<User> = self.users.lock().unwrap().values().cloned().collect();
        users.sort_by(|a, b| b.created_at.cmp(&a.created_at));
        Ok(users)
    }

    async fn find_user(&self, id: &RecordId) -> Result<Option<User>, RepoError> {
        Ok(self.users.lock().unwrap().get(id).cloned())
    }

    async fn insert_user(&self, user: User) -> Result<User, RepoError> {
        let mut users = self.users.lock().unwrap();
        if users.values().any(|u| u.email == user.email) {
            return Err(RepoError::Duplicate {
                constraint: "users_email_key".to_string(),
            });
        }
        users.insert(user.id.clone(), user.clone());
        Ok(user)
    }

    async fn replace_user(&self, user: User) -> Result<User, RepoError> {
        self.users
            .lock()
            .unwrap()
            .insert(user.id.clone(), user.clone());
        Ok(user)
    }

    async fn delete_user(&self, id: &RecordId) -> Result<Option<User>, RepoError> {
        Ok(self.users.lock().unwrap().remove(id))
    }
}

#[async_trait]
impl TasksRepo for MemoryBackend {
    async fn list_tasks(&self) -> Result<Vec<Task>, RepoError> {
        let mut tasks: Vec<Task> = self.tasks.lock().unwrap().values().cloned().collect();
        tasks.sort_by(|a, b| b.created_at.cmp(&a.created_at));
        Ok(tasks)
    }

    async fn find_task(&self, id: &RecordId) -> Result<Option<Task>, RepoError> {
        Ok(self.tasks.lock().unwrap().get(id).cloned())
    }

    async fn insert_task(&self, task: Task) -> Result<Task, RepoError> {
        self.tasks
            .lock()
            .unwrap()
            .insert(task.id.clone(), task.clone());
        Ok(task)
    }

    async fn replace_task(&self, task: Task) -> Result<Task, RepoError> {
        self.tasks
            .lock()
            .unwrap()
            .insert(task.id.clone(), task.clone());
        Ok(task)
    }

    async fn delete_task(&self, id: &RecordId) -> Result<Option<Task>, RepoError> {
        Ok(self.tasks.lock().unwrap().remove(id))
    }
}

#[async_trait]
impl PostsRepo for MemoryBackend {
    async fn list_posts(&self) -> Result<Vec<Post>, RepoError> {
        let mut posts: Vec<Post> = self.posts.lock().unwrap().values().cloned().collect();
        posts.sort_by(|a, b| b.created_at.cmp(&a.created_at));
        Ok(posts)
    }

    async fn find_post(&self, id: &RecordId) -> Result<Option<Post>, RepoError> {
        Ok(self.posts.lock().unwrap().get(id).cloned())
    }

    async fn insert_post(&self, post: Post) -> Result<Post, RepoError> {
        self.posts
            .lock()
            .unwrap()
            .insert(post.id.clone(), post.clone());
        Ok(post)
    }

    async fn replace_post(&self, post: Post) -> Result<Post, RepoError> {
        self.posts
            .lock()
            .unwrap()
            .insert(post.id.clone(), post.clone());
        Ok(post)
    }
}

#[async_trait]
impl DbHealth for MemoryBackend {
    async fn ping(&self) -> Result<(), RepoError> {
        if self.db_down.load(Ordering::Relaxed) {
            Err(RepoError::Timeout)
        } else {
            Ok(())
        }
    }
}

#[derive(Default)]
struct MapStore {
    entries: Mutex<HashMap<String, Value>>,
}

#[async_trait]
impl CacheStore for MapStore {
    async fn get_value(&self, key: &str) -> Result<Option<Value>, CacheError> {
        Ok(self.entries.lock().unwrap().get(key).cloned())
    }

    async fn set_value(
        &self,
        key: &str,
        value: &Value,
        _ttl: Option<Duration>,
    ) -> Result<(), CacheError> {
        self.entries
            .lock()
            .unwrap()
            .insert(key.to_string(), value.clone());
        Ok(())
    }

    async fn delete(&self, key: &str) -> Result<bool, CacheError> {
        Ok(self.entries.lock().unwrap().remove(key).is_some())
    }

    async fn keys(&self, _pattern: &str) -> Result<Vec<String>, CacheError> {
        let mut keys: Vec<String> = self.entries.lock().unwrap().keys().cloned().collect();
        keys.sort();
        Ok(keys)
    }

    async fn ttl(&self, key: &str) -> Result<i64, CacheError> {
        if self.entries.lock().unwrap().contains_key(key) {
            Ok(-1)
        } else {
            Ok(-2)
        }
    }

    async fn ping(&self) -> Result<(), CacheError> {
        Ok(())
    }

    async fn flush(&self) -> Result<(), CacheError> {
        self.entries.lock().unwrap().clear();
        Ok(())
    }
}

fn test_router(with_cache: bool) -> (Router, Arc<MemoryBackend>) {
    let backend = Arc::new(MemoryBackend::default());
    let cache = with_cache.then(|| {
        Arc::new(CacheService::new(
            Arc::new(MapStore::default()),
            Duration::from_secs(3600),
            Duration::from_secs(300),
        ))
    });

    let state = AppState {
        users: UserService::new(backend.clone(), cache.clone()),
        tasks: TaskService::new(backend.clone()),
        posts: PostService::new(backend.clone(), backend.clone()),
        cache,
        db: backend.clone(),
    };
    (build_router(state), backend)
}

async fn send(router: &Router, request: Request<Body>) -> (StatusCode, Value) {
    let response = router
        .clone()
        .oneshot(request)
        .await
        .expect("router handled the request");
    let status = response.status();
    let bytes = response
        .into_body()
        .collect()
        .await
        .expect("body collected")
        .to_bytes();
    let body = if bytes.is_empty() {
        Value::Null
    } else {
        serde_json::from_slice(&bytes).expect("body is json")
    };
    (status, body)
}

fn get(uri: &str) -> Request<Body> {
    Request::builder()
        .uri(uri)
        .body(Body::empty())
        .expect("request built")
}

fn with_body(method: &str, uri: &str, body: Value) -> Request<Body> {
    Request::builder()
        .method(method)
        .uri(uri)
        .header(header::CONTENT_TYPE, "application/json")
        .body(Body::from(body.to_string()))
        .expect("request built")
}

fn delete(uri: &str) -> Request<Body> {
    Request::builder()
        .method("DELETE")
        .uri(uri)
        .body(Body::empty())
        .expect("request built")
}

async fn create_user(router: &Router, name: &str, email: &str) -> Value {
    let (status, body) = send(
        router,
        with_body(
            "POST",
            "/api/users",
            json!({"name": name, "email": email, "age": 30}),
        ),
    )
    .await;
    assert_eq!(status, StatusCode::CREATED);
    body["data"].clone()
}

#[tokio::test]
async fn user_crud_round_trip() {
    let (router, _) = test_router(false);

    let user = create_user(&router, "Ada Lovelace", "ada@example.com").await;
    let id = user["id"].as_str().expect("user id").to_string();
    assert_eq!(user["isActive"], json!(true));
    assert_eq!(user["roles"], json!(["user"]));

    let (status, body) = send(&router, get("/api/users")).await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(body["success"], json!(true));
    assert_eq!(body["count"], json!(1));
    assert_eq!(body["source"], json!("database"));

    let (status, body) = send(&router, get(&format!("/api/users/{id}"))).await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(body["data"]["email"], json!("ada@example.com"));

    let (status, body) = send(
        &router,
        with_body(
            "PUT",
            &format!("/api/users/{id}"),
            json!({"name": "Ada King", "isActive": false}),
        ),
    )
    .await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(body["data"]["name"], json!("Ada King"));
    assert_eq!(body["data"]["isActive"], json!(false));

    let (status, body) = send(&router, delete(&format!("/api/users/{id}"))).await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(body["data"]["id"], json!(id));
    assert_eq!(body["data"]["label"], json!("Ada King"));

    let (status, body) = send(&router, get(&format!("/api/users/{id}"))).await;
    assert_eq!(status, StatusCode::NOT_FOUND);
    assert_eq!(body["success"], json!(false));
    assert_eq!(body["message"], json!("User not found"));
}

#[tokio::test]
async fn user_listing_flips_to_cache_on_second_read() {
    let (router, _) = test_router(true);
    create_user(&router, "Ada Lovelace", "ada@example.com").await;

    let (_, body) = send(&router, get("/api/users")).await;
    assert_eq!(body["source"], json!("database"));

    let (_, body) = send(&router, get("/api/users")).await;
    assert_eq!(body["source"], json!("cache"));

    // Any mutation invalidates, so the next read hits the database again.
    create_user(&router, "Grace Hopper", "grace@example.com").await;
    let (_, body) = send(&router, get("/api/users")).await;
    assert_eq!(body["source"], json!("database"));
    assert_eq!(body["count"], json!(2));
}

#[tokio::test]
async fn invalid_user_payload_reports_field_violations() {
    let (router, _) = test_router(false);

    let (status, body) = send(
        &router,
        with_body("POST", "/api/users", json!({"name": "A", "age": 999})),
    )
    .await;
    assert_eq!(status, StatusCode::BAD_REQUEST);
    assert_eq!(body["success"], json!(false));
    assert_eq!(body["message"], json!("Validation failed"));

    let fields: Vec<&str> = body["errors"]
        .as_array()
        .expect("errors array")
        .iter()
        .map(|v| v["field"].as_str().expect("field name"))
        .collect();
    assert!(fields.contains(&"name"));
    assert!(fields.contains(&"email"));
    assert!(fields.contains(&"age"));
}

#[tokio::test]
async fn user_without_age_is_created() {
    let (router, _) = test_router(false);

    let (status, body) = send(
        &router,
        with_body(
            "POST",
            "/api/users",
            json!({"name": "Ada Lovelace", "email": "ada@example.com"}),
        ),
    )
    .await;
    assert_eq!(status, StatusCode::CREATED);
    assert_eq!(body["success"], json!(true));
    assert!(body["data"].get("age").is_none());

    // An out-of-range age is still rejected when it is supplied.
    let (status, body) = send(
        &router,
        with_body(
            "POST",
            "/api/users",
            json!({"name": "Grace Hopper", "email": "grace@navy.mil", "age": 999}),
        ),
    )
    .await;
    assert_eq!(status, StatusCode::BAD_REQUEST);
    assert_eq!(body["errors"][0]["field"], json!("age"));
}

#[tokio::test]
async fn duplicate_email_is_a_conflict() {
    let (router, _) = test_router(false);
    create_user(&router, "Ada Lovelace", "ada@example.com").await;

    let (status, body) = send(
        &router,
        with_body(
            "POST",
            "/api/users",
            json!({"name": "Other Ada", "email": "ada@example.com", "age": 40}),
        ),
    )
    .await;
    assert_eq!(status, StatusCode::CONFLICT);
    assert_eq!(body["message"], json!("Email already exists"));
}

#[tokio::test]
async fn malformed_id_is_a_client_error() {
    let (router, _) = test_router(false);
    let (status, body) = send(&router, get("/api/users/not-a-real-id")).await;
    assert_eq!(status, StatusCode::BAD_REQUEST);
    assert_eq!(body["errors"][0]["field"], json!("id"));
}

#[tokio::test]
async fn task_lifecycle() {
    let (router, _) = test_router(false);

    let (status, body) = send(
        &router,
        with_body(
            "POST",
            "/api/tasks",
            json!({"title": "Write report", "description": "Quarterly numbers"}),
        ),
    )
    .await;
    assert_eq!(status, StatusCode::CREATED);
    assert_eq!(body["data"]["completed"], json!(false));
    let id = body["data"]["id"].as_str().expect("task id").to_string();

    let (status, body) = send(
        &router,
        with_body(
            "PUT",
            &format!("/api/tasks/{id}"),
            json!({"completed": true}),
        ),
    )
    .await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(body["data"]["completed"], json!(true));

    let (status, body) = send(&router, get("/api/tasks")).await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(body["count"], json!(1));

    let (_, body) = send(&router, get("/api/tasks?completed=false")).await;
    assert_eq!(body["count"], json!(0));
    let (_, body) = send(&router, get("/api/tasks?completed=true")).await;
    assert_eq!(body["count"], json!(1));

    let (status, body) = send(&router, delete(&format!("/api/tasks/{id}"))).await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(body["data"]["label"], json!("Write report"));

    let (status, _) = send(&router, get(&format!("/api/tasks/{id}"))).await;
    assert_eq!(status, StatusCode::NOT_FOUND);
}

#[tokio::test]
async fn post_lifecycle() {
    let (router, _) = test_router(false);
    let author = create_user(&router, "Ada Lovelace", "ada@example.com").await;
    let author_id = author["id"].as_str().expect("author id").to_string();

    let (status, body) = send(
        &router,
        with_body(
            "POST",
            "/api/posts",
            json!({
                "title": "Hello world",
                "content": "A long enough body",
                "author": author_id,
                "tags": ["Rust", "rust", "web"],
                "category": "technology",
            }),
        ),
    )
    .await;
    assert_eq!(status, StatusCode::CREATED);
    assert_eq!(body["data"]["status"], json!("draft"));
    assert_eq!(body["data"]["tags"], json!(["rust", "web"]));
    let id = body["data"]["id"].as_str().expect("post id").to_string();

    let (status, body) = send(
        &router,
        with_body("POST", &format!("/api/posts/{id}/publish"), json!({})),
    )
    .await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(body["data"]["status"], json!("published"));
    assert!(body["data"]["publishedAt"].is_string());

    let (status, body) = send(
        &router,
        with_body(
            "POST",
            &format!("/api/posts/{id}/comments"),
            json!({"user": author_id, "text": "Nice one"}),
        ),
    )
    .await;
    assert_eq!(status, StatusCode::CREATED);
    assert_eq!(body["data"]["comments"][0]["text"], json!("Nice one"));

    let (status, body) = send(
        &router,
        with_body(
            "POST",
            &format!("/api/posts/{id}/like"),
            json!({"user": author_id}),
        ),
    )
    .await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(body["message"], json!("Post liked successfully"));

    let (_, body) = send(
        &router,
        with_body(
            "POST",
            &format!("/api/posts/{id}/like"),
            json!({"user": author_id}),
        ),
    )
    .await;
    assert_eq!(body["message"], json!("Post unliked successfully"));

    // Each read counts a view.
    send(&router, get(&format!("/api/posts/{id}"))).await;
    let (_, body) = send(&router, get(&format!("/api/posts/{id}"))).await;
    assert_eq!(body["data"]["views"], json!(2));
}

#[tokio::test]
async fn education_category_is_accepted_and_long_comments_are_not() {
    let (router, _) = test_router(false);
    let author = create_user(&router, "Ada Lovelace", "ada@example.com").await;
    let author_id = author["id"].as_str().expect("author id").to_string();

    let (status, body) = send(
        &router,
        with_body(
            "POST",
            "/api/posts",
            json!({
                "title": "Hello world",
                "content": "A long enough body",
                "author": author_id,
                "category": "education",
            }),
        ),
    )
    .await;
    assert_eq!(status, StatusCode::CREATED);
    assert_eq!(body["data"]["category"], json!("education"));
    let id = body["data"]["id"].as_str().expect("post id").to_string();

    let (status, body) = send(
        &router,
        with_body(
            "POST",
            &format!("/api/posts/{id}/comments"),
            json!({"user": author_id, "text": "x".repeat(501)}),
        ),
    )
    .await;
    assert_eq!(status, StatusCode::BAD_REQUEST);
    assert_eq!(body["errors"][0]["field"], json!("text"));
}

#[tokio::test]
async fn post_with_unknown_author_is_rejected() {
    let (router, _) = test_router(false);
    let stranger = RecordId::generate();

    let (status, body) = send(
        &router,
        with_body(
            "POST",
            "/api/posts",
            json!({
                "title": "Hello world",
                "content": "A long enough body",
                "author": stranger.as_str(),
            }),
        ),
    )
    .await;
    assert_eq!(status, StatusCode::BAD_REQUEST);
    assert_eq!(body["errors"][0]["field"], json!("author"));
}

#[tokio::test]
async fn cache_endpoints_round_trip() {
    let (router, _) = test_router(true);

    let (status, body) = send(
        &router,
        with_body(
            "POST",
            "/api/cache/greeting",
            json!({"value": {"hello": "world"}, "ttl": 60}),
        ),
    )
    .await;
    assert_eq!(status, StatusCode::CREATED);
    assert_eq!(body["data"]["ttl"], json!(60));

    let (status, body) = send(&router, get("/api/cache/greeting")).await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(body["data"]["value"]["hello"], json!("world"));

    let (status, body) = send(&router, get("/api/redis/keys")).await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(body["data"], json!(["greeting"]));

    let (status, _) = send(&router, delete("/api/cache/greeting")).await;
    assert_eq!(status, StatusCode::OK);

    let (status, _) = send(&router, get("/api/cache/greeting")).await;
    assert_eq!(status, StatusCode::NOT_FOUND);

    let (status, body) = send(&router, get("/api/redis/ping")).await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(body["data"]["reply"], json!("PONG"));

    let (status, _) = send(&router, delete("/api/redis/flush")).await;
    assert_eq!(status, StatusCode::OK);
}

#[tokio::test]
async fn cache_listing_returns_entries_with_ttl() {
    let (router, _) = test_router(true);

    send(
        &router,
        with_body("POST", "/api/cache/alpha", json!({"value": 1})),
    )
    .await;
    send(
        &router,
        with_body("POST", "/api/cache/beta", json!({"value": 2})),
    )
    .await;

    let (status, body) = send(&router, get("/api/cache")).await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(body["count"], json!(2));
    let keys: Vec<&str> = body["data"]
        .as_array()
        .expect("entry list")
        .iter()
        .map(|entry| entry["key"].as_str().expect("key"))
        .collect();
    assert!(keys.contains(&"alpha") && keys.contains(&"beta"));
    assert!(body["data"][0]["ttl"].is_i64());
}

#[tokio::test]
async fn cache_endpoints_require_caching_enabled() {
    let (router, _) = test_router(false);

    let (status, body) = send(&router, get("/api/cache/greeting")).await;
    assert_eq!(status, StatusCode::SERVICE_UNAVAILABLE);
    assert_eq!(body["message"], json!("Cache service unavailable"));

    let (status, _) = send(&router, get("/api/redis/ping")).await;
    assert_eq!(status, StatusCode::SERVICE_UNAVAILABLE);
}

#[tokio::test]
async fn health_reflects_backend_state() {
    let (router, backend) = test_router(true);

    let (status, body) = send(&router, get("/health")).await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(body["status"], json!("OK"));
    assert_eq!(body["services"]["database"], json!("ok"));
    assert_eq!(body["services"]["cache"], json!("ok"));

    backend.db_down.store(true, Ordering::Relaxed);
    let (status, body) = send(&router, get("/health")).await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(body["status"], json!("PARTIAL"));
}

#[tokio::test]
async fn api_index_lists_surfaces() {
    let (router, _) = test_router(false);
    let (status, body) = send(&router, get("/api")).await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(body["data"]["users"], json!("/api/users"));
}
