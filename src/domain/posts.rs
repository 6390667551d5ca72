//! Validation and state transitions for post records.

use rubrica_api_types::{
    CreatePostRequest, FieldViolation, Post, PostCategory, PostComment, PostLike, PostStatus,
    RecordId,
};
use time::OffsetDateTime;

use super::error::DomainError;

pub const TITLE_MIN_CHARS: usize = 5;
pub const TITLE_MAX_CHARS: usize = 100;
pub const CONTENT_MIN_CHARS: usize = 10;
pub const COMMENT_MAX_CHARS: usize = 500;

#[derive(Debug, Clone)]
pub struct PostDraft {
    title: String,
    content: String,
    author: RecordId,
    tags: Vec<String>,
    category: PostCategory,
}

impl PostDraft {
    pub fn from_request(request: CreatePostRequest) -> Result<Self, DomainError> {
        let mut violations = Vec::new();

        let title = match request.title.as_deref().map(str::trim) {
            Some(title) if !title.is_empty() => {
                let len = title.chars().count();
                if len < TITLE_MIN_CHARS {
                    violations.push(FieldViolation::new(
                        "title",
                        format!("title must be at least {TITLE_MIN_CHARS} characters"),
                    ));
                } else if len > TITLE_MAX_CHARS {
                    violations.push(FieldViolation::new(
                        "title",
                        format!("title cannot exceed {TITLE_MAX_CHARS} characters"),
                    ));
                }
                title.to_string()
            }
            _ => {
                violations.push(FieldViolation::new("title", "title is required"));
                String::new()
            }
        };

        let content = match request.content.as_deref().map(str::trim) {
            Some(content) if !content.is_empty() => {
                if content.chars().count() < CONTENT_MIN_CHARS {
                    violations.push(FieldViolation::new(
                        "content",
                        format!("content must be at least {CONTENT_MIN_CHARS} characters"),
                    ));
                }
                content.to_string()
            }
            _ => {
                violations.push(FieldViolation::new("content", "content is required"));
                String::new()
            }
        };

        let author = match request.author.as_deref().map(str::trim) {
            Some(author) if !author.is_empty() => match author.parse::<RecordId>() {
                Ok(author) => Some(author),
                Err(err) => {
                    violations.push(FieldViolation::new("author", err.to_string()));
                    None
                }
            },
            _ => {
                violations.push(FieldViolation::new("author", "author is required"));
                None
            }
        };

        let tags = normalize_tags(request.tags.unwrap_or_default());
        let category = request.category.unwrap_or(PostCategory::Other);

        match (violations.is_empty(), author) {
            (true, Some(author)) => Ok(Self {
                title,
                content,
                author,
                tags,
                category,
            }),
            _ => Err(DomainError::validation(violations)),
        }
    }

    pub fn author(&self) -> &RecordId {
        &self.author
    }

    pub fn into_record(self, id: RecordId, now: OffsetDateTime) -> Post {
        Post {
            id,
            title: self.title,
            content: self.content,
            author: self.author,
            tags: self.tags,
            category: self.category,
            status: PostStatus::Draft,
            views: 0,
            likes: Vec::new(),
            comments: Vec::new(),
            published_at: None,
            created_at: now,
            updated_at: now,
        }
    }
}

/// Move a post to `published`. The publication timestamp is set only on the
/// first transition; republishing an archived post keeps the original.
pub fn publish(post: &mut Post, now: OffsetDateTime) {
    post.status = PostStatus::Published;
    if post.published_at.is_none() {
        post.published_at = Some(now);
    }
    post.updated_at = now;
}

pub fn add_comment(
    post: &mut Post,
    user: RecordId,
    text: &str,
    now: OffsetDateTime,
) -> Result<(), DomainError> {
    let text = text.trim();
    if text.is_empty() {
        return Err(DomainError::single("text", "comment text is required"));
    }
    if text.chars().count() > COMMENT_MAX_CHARS {
        return Err(DomainError::single(
            "text",
            format!("comment cannot exceed {COMMENT_MAX_CHARS} characters"),
        ));
    }
    post.comments.push(PostComment {
        user,
        text: text.to_string(),
        created_at: now,
    });
    post.updated_at = now;
    Ok(())
}

/// Toggle a like for `user`. Returns true when the post is liked afterwards.
pub fn toggle_like(post: &mut Post, user: RecordId, now: OffsetDateTime) -> bool {
    let before = post.likes.len();
    post.likes.retain(|like| like.user != user);
    let liked = post.likes.len() == before;
    if liked {
        post.likes.push(PostLike {
            user,
            created_at: now,
        });
    }
    post.updated_at = now;
    liked
}

pub fn record_view(post: &mut Post) {
    post.views += 1;
}

fn normalize_tags(tags: Vec<String>) -> Vec<String> {
    let mut normalized = Vec::with_capacity(tags.len());
    for tag in tags {
        let tag = tag.trim().to_lowercase();
        if !tag.is_empty() && !normalized.contains(&tag) {
            normalized.push(tag);
        }
    }
    normalized
}
