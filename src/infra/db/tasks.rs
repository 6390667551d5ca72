use async_trait::async_trait;
use rubrica_api_types::{RecordId, Task};
use time::OffsetDateTime;

use crate::application::repos::{RepoError, TasksRepo};

use super::{PostgresRepositories, map_sqlx_error};

#[derive(sqlx::FromRow)]
struct TaskRow {
    id: String,
    title: String,
    description: Option<String>,
    completed: bool,
    created_at: OffsetDateTime,
    updated_at: OffsetDateTime,
}

impl TryFrom<TaskRow> for Task {
    type Error = RepoError;

    fn try_from(row: TaskRow) -> Result<Self, Self::Error> {
        let id: RecordId = row.id.parse().map_err(RepoError::from_persistence)?;
        Ok(Task {
            id,
            title: row.title,
            description: row.description,
            completed: row.completed,
            created_at: row.created_at,
            updated_at: row.updated_at,
        })
    }
}

const TASK_COLUMNS: &str = "id, title, description, completed, created_at, updated_at";

#[async_trait]
impl TasksRepo for PostgresRepositories {
    async fn list_tasks(&self) -> Result<Vec<Task>, RepoError> {
        let rows = sqlx::query_as::<_, TaskRow>(&format!(
            "SELECT {TASK_COLUMNS} FROM tasks ORDER BY created_at DESC"
        ))
        .fetch_all(self.pool())
        .await
        .map_err(map_sqlx_error)?;

        rows.into_iter().map(Task::try_from).collect()
    }

    async fn find_task(&self, id: &RecordId) -> Result<Option<Task>, RepoError> {
        let row = sqlx::query_as::<_, TaskRow>(&format!(
            "SELECT {TASK_COLUMNS} FROM tasks WHERE id = $1"
        ))
        .bind(id.as_str())
        .fetch_optional(self.pool())
        .await
        .map_err(map_sqlx_error)?;

        row.map(Task::try_from).transpose()
    }

    async fn insert_task(&self, task: Task) -> Result<Task, RepoError> {
        let row = sqlx::query_as::<_, TaskRow>(&format!(
            "INSERT INTO tasks ({TASK_COLUMNS}) \
             VALUES ($1, $2, $3, $4, $5, $6) \
             RETURNING {TASK_COLUMNS}"
        ))
        .bind(task.id.as_str())
        .bind(&task.title)
        .bind(&task.description)
        .bind(task.completed)
        .bind(task.created_at)
        .bind(task.updated_at)
        .fetch_one(self.pool())
        .await
        .map_err(map_sqlx_error)?;

        Task::try_from(row)
    }

    async fn replace_task(&self, task: Task) -> Result<Task, RepoError> {
        let row = sqlx::query_as::<_, TaskRow>(&format!(
            "UPDATE tasks \
             SET title = $2, description = $3, completed = $4, updated_at = $5 \
             WHERE id = $1 \
             RETURNING {TASK_COLUMNS}"
        ))
        .bind(task.id.as_str())
        .bind(&task.title)
        .bind(&task.description)
        .bind(task.completed)
        .bind(task.updated_at)
        .fetch_optional(self.pool())
        .await
        .map_err(map_sqlx_error)?;

        row.map(Task::try_from).transpose()?.ok_or(RepoError::NotFound)
    }

    async fn delete_task(&self, id: &RecordId) -> Result<Option<Task>, RepoError> {
        let row = sqlx::query_as::<_, TaskRow>(&format!(
            "DELETE FROM tasks WHERE id = $1 RETURNING {TASK_COLUMNS}"
        ))
        .bind(id.as_str())
        .fetch_optional(self.pool())
        .await
        .map_err(map_sqlx_error)?;

        row.map(Task::try_from).transpose()
    }
}
