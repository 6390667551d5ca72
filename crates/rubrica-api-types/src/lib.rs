//! Shared wire types for the rubrica records API.
//!
//! Everything the server serializes and the client deserializes lives here:
//! the 24-hex [`RecordId`], the response [`Envelope`], the record bodies and
//! the request payloads. Keeping both sides on one crate rules out field
//! drift between them.

mod envelope;
mod id;
mod records;
mod requests;

pub use envelope::{Envelope, FieldViolation, ListSource};
pub use id::{ParseRecordIdError, RecordId};
pub use records::{
    CacheEntry, DeletedRecord, HealthReport, HealthServices, HealthStatus, Post, PostCategory,
    PostComment, PostLike, PostStatus, ServiceHealth, Task, User, UserProfile, UserRole,
};
pub use requests::{
    AddCommentRequest, CacheSetRequest, CreatePostRequest, CreateTaskRequest, CreateUserRequest,
    ToggleLikeRequest, UpdateTaskRequest, UpdateUserRequest,
};
