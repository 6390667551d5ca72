//! Repository traits describing persistence adapters.

use async_trait::async_trait;
use rubrica_api_types::{Post, RecordId, Task, User};
use thiserror::Error;

#[derive(Debug, Error)]
pub enum RepoError {
    #[error("persistence error: {0}")]
    Persistence(String),
    #[error("duplicate record violates unique constraint `{constraint}`")]
    Duplicate { constraint: String },
    #[error("resource not found")]
    NotFound,
    #[error("invalid input: {message}")]
    InvalidInput { message: String },
    #[error("database timeout")]
    Timeout,
}

impl RepoError {
    pub fn from_persistence(err: impl std::fmt::Display) -> Self {
        Self::Persistence(err.to_string())
    }
}

#[async_trait]
pub trait UsersRepo: Send + Sync {
    /// All users, newest first.
    async fn list_users(&self) -> Result<Vec<User>, RepoError>;

    async fn find_user(&self, id: &RecordId) -> Result<Option<User>, RepoError>;

    async fn insert_user(&self, user: User) -> Result<User, RepoError>;

    /// Full-row replace keyed by id; returns the stored record.
    async fn replace_user(&self, user: User) -> Result<User, RepoError>;

    /// Returns the removed record, or None when the id was absent.
    async fn delete_user(&self, id: &RecordId) -> Result<Option<User>, RepoError>;
}

#[async_trait]
pub trait TasksRepo: Send + Sync {
    async fn list_tasks(&self) -> Result<Vec<Task>, RepoError>;

    async fn find_task(&self, id: &RecordId) -> Result<Option<Task>, RepoError>;

    async fn insert_task(&self, task: Task) -> Result<Task, RepoError>;

    async fn replace_task(&self, task: Task) -> Result<Task, RepoError>;

    async fn delete_task(&self, id: &RecordId) -> Result<Option<Task>, RepoError>;
}

#[async_trait]
pub trait PostsRepo: Send + Sync {
    async fn list_posts(&self) -> Result<Vec<Post>, RepoError>;

    async fn find_post(&self, id: &RecordId) -> Result<Option<Post>, RepoError>;

    async fn insert_post(&self, post: Post) -> Result<Post, RepoError>;

    async fn replace_post(&self, post: Post) -> Result<Post, RepoError>;
}
