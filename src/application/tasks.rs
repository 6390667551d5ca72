use std::sync::Arc;

use rubrica_api_types::{CreateTaskRequest, RecordId, Task, UpdateTaskRequest};
use time::OffsetDateTime;

use crate::application::error::AppError;
use crate::application::repos::TasksRepo;
use crate::domain::tasks::{TaskDraft, TaskPatch};

#[derive(Clone)]
pub struct TaskService {
    repo: Arc<dyn TasksRepo>,
}

impl TaskService {
    pub fn new(repo: Arc<dyn TasksRepo>) -> Self {
        Self { repo }
    }

    /// All tasks, optionally narrowed to one completion state.
    pub async fn list_tasks(&self, completed: Option<bool>) -> Result<Vec<Task>, AppError> {
        let mut tasks = self.repo.list_tasks().await?;
        if let Some(completed) = completed {
            tasks.retain(|task| task.completed == completed);
        }
        Ok(tasks)
    }

    pub async fn get_task(&self, id: &RecordId) -> Result<Task, AppError> {
        self.repo
            .find_task(id)
            .await?
            .ok_or(AppError::not_found("Task"))
    }

    pub async fn create_task(&self, request: CreateTaskRequest) -> Result<Task, AppError> {
        let draft = TaskDraft::from_request(request)?;
        let task = draft.into_record(RecordId::generate(), OffsetDateTime::now_utc());
        Ok(self.repo.insert_task(task).await?)
    }

    pub async fn update_task(
        &self,
        id: &RecordId,
        request: UpdateTaskRequest,
    ) -> Result<Task, AppError> {
        let patch = TaskPatch::from_request(request)?;

        let mut task = self.get_task(id).await?;
        if patch.is_empty() {
            return Ok(task);
        }

        patch.apply(&mut task, OffsetDateTime::now_utc());
        Ok(self.repo.replace_task(task).await?)
    }

    pub async fn delete_task(&self, id: &RecordId) -> Result<Task, AppError> {
        self.repo
            .delete_task(id)
            .await?
            .ok_or(AppError::not_found("Task"))
    }
}
