//! Validation rules for task records.

use rubrica_api_types::{
    CreateTaskRequest, FieldViolation, RecordId, Task, UpdateTaskRequest,
};
use time::OffsetDateTime;

use super::error::DomainError;

pub const TITLE_MAX_CHARS: usize = 200;
pub const DESCRIPTION_MAX_CHARS: usize = 1000;

#[derive(Debug, Clone)]
pub struct TaskDraft {
    title: String,
    description: Option<String>,
}

impl TaskDraft {
    pub fn from_request(request: CreateTaskRequest) -> Result<Self, DomainError> {
        let mut violations = Vec::new();

        let title = match request.title.as_deref().map(str::trim) {
            Some(title) if !title.is_empty() => {
                check_title(title, &mut violations);
                title.to_string()
            }
            _ => {
                violations.push(FieldViolation::new("title", "title is required"));
                String::new()
            }
        };

        let description = normalize_description(request.description, &mut violations);

        if !violations.is_empty() {
            return Err(DomainError::validation(violations));
        }

        Ok(Self { title, description })
    }

    pub fn into_record(self, id: RecordId, now: OffsetDateTime) -> Task {
        Task {
            id,
            title: self.title,
            description: self.description,
            completed: false,
            created_at: now,
            updated_at: now,
        }
    }
}

#[derive(Debug, Clone, Default)]
pub struct TaskPatch {
    title: Option<String>,
    description: Option<String>,
    completed: Option<bool>,
}

impl TaskPatch {
    pub fn from_request(request: UpdateTaskRequest) -> Result<Self, DomainError> {
        let mut violations = Vec::new();

        let title = match request.title.as_deref().map(str::trim) {
            Some(title) if title.is_empty() => {
                violations.push(FieldViolation::new("title", "title cannot be empty"));
                None
            }
            Some(title) => {
                check_title(title, &mut violations);
                Some(title.to_string())
            }
            None => None,
        };

        let description = normalize_description(request.description, &mut violations);

        if !violations.is_empty() {
            return Err(DomainError::validation(violations));
        }

        Ok(Self {
            title,
            description,
            completed: request.completed,
        })
    }

    pub fn is_empty(&self) -> bool {
        self.title.is_none() && self.description.is_none() && self.completed.is_none()
    }

    pub fn apply(self, task: &mut Task, now: OffsetDateTime) {
        if let Some(title) = self.title {
            task.title = title;
        }
        if let Some(description) = self.description {
            task.description = Some(description);
        }
        if let Some(completed) = self.completed {
            task.completed = completed;
        }
        task.updated_at = now;
    }
}

fn check_title(title: &str, violations: &mut Vec<FieldViolation>) {
    if title.chars().count() > TITLE_MAX_CHARS {
        violations.push(FieldViolation::new(
            "title",
            format!("title cannot exceed {TITLE_MAX_CHARS} characters"),
        ));
    }
}

fn normalize_description(
    description: Option<String>,
    violations: &mut Vec<FieldViolation>,
) -> Option<String> {
    description.as_deref().map(str::trim).and_then(|value| {
        if value.chars().count() > DESCRIPTION_MAX_CHARS {
            violations.push(FieldViolation::new(
                "description",
                format!("description cannot exceed {DESCRIPTION_MAX_CHARS} characters"),
            ));
        }
        (!value.is_empty()).then(|| value.to_string())
    })
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn draft_trims_and_defaults_incomplete() {
        let draft = TaskDraft::from_request(CreateTaskRequest {
            title: Some("  Ship release  ".to_string()),
            description: Some("   ".to_string()),
        })
        .expect("valid draft");

        let task = draft.into_record(RecordId::generate(), OffsetDateTime::now_utc());
        assert_eq!(task.title, "Ship release");
        assert_eq!(task.description, None);
        assert!(!task.completed);
    }

    #[test]
    fn draft_requires_title() {
        let err = TaskDraft::from_request(CreateTaskRequest {
            title: Some("   ".to_string()),
            description: None,
        })
        .unwrap_err();

        match err {
            DomainError::Validation { violations } => {
                assert_eq!(violations[0].field, "title");
            }
            other => panic!("unexpected error: {other:?}"),
        }
    }

    #[test]
    fn draft_rejects_oversized_title() {
        let err = TaskDraft::from_request(CreateTaskRequest {
            title: Some("x".repeat(TITLE_MAX_CHARS + 1)),
            description: None,
        })
        .unwrap_err();
        assert!(matches!(err, DomainError::Validation { .. }));
    }

    #[test]
    fn patch_toggles_completion() {
        let draft = TaskDraft::from_request(CreateTaskRequest {
            title: Some("Ship release".to_string()),
            description: None,
        })
        .expect("valid draft");
        let mut task = draft.into_record(RecordId::generate(), OffsetDateTime::now_utc());

        let patch = TaskPatch::from_request(UpdateTaskRequest {
            completed: Some(true),
            ..Default::default()
        })
        .expect("valid patch");
        patch.apply(&mut task, OffsetDateTime::now_utc());

        assert!(task.completed);
        assert_eq!(task.title, "Ship release");
    }
}
