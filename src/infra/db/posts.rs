use async_trait::async_trait;
use rubrica_api_types::{Post, PostCategory, PostComment, PostLike, PostStatus, RecordId};
use serde_json::Value;
use time::OffsetDateTime;

use crate::application::repos::{PostsRepo, RepoError};

use super::{PostgresRepositories, map_sqlx_error};

// Tags, likes and comments are embedded documents stored in JSONB columns;
// category and status are stored as plain text.
#[derive(sqlx::FromRow)]
struct PostRow {
    id: String,
    title: String,
    content: String,
    author: String,
    tags: Value,
    category: String,
    status: String,
    views: i64,
    likes: Value,
    comments: Value,
    published_at: Option<OffsetDateTime>,
    created_at: OffsetDateTime,
    updated_at: OffsetDateTime,
}

impl TryFrom<PostRow> for Post {
    type Error = RepoError;

    fn try_from(row: PostRow) -> Result<Self, Self::Error> {
        let id: RecordId = row.id.parse().map_err(RepoError::from_persistence)?;
        let author: RecordId = row.author.parse().map_err(RepoError::from_persistence)?;
        let category: PostCategory = row.category.parse().map_err(RepoError::from_persistence)?;
        let status: PostStatus = row.status.parse().map_err(RepoError::from_persistence)?;
        let tags: Vec<String> =
            serde_json::from_value(row.tags).map_err(RepoError::from_persistence)?;
        let likes: Vec<PostLike> =
            serde_json::from_value(row.likes).map_err(RepoError::from_persistence)?;
        let comments: Vec<PostComment> =
            serde_json::from_value(row.comments).map_err(RepoError::from_persistence)?;
        Ok(Post {
            id,
            title: row.title,
            content: row.content,
            author,
            tags,
            category,
            status,
            views: row.views,
            likes,
            comments,
            published_at: row.published_at,
            created_at: row.created_at,
            updated_at: row.updated_at,
        })
    }
}

fn encode_json<T: serde::Serialize>(value: &T) -> Result<Value, RepoError> {
    serde_json::to_value(value).map_err(RepoError::from_persistence)
}

const POST_COLUMNS: &str = "id, title, content, author, tags, category, status, views, \
                            likes, comments, published_at, created_at, updated_at";

#[async_trait]
impl PostsRepo for PostgresRepositories {
    async fn list_posts(&self) -> Result<Vec<Post>, RepoError> {
        let rows = sqlx::query_as::<_, PostRow>(&format!(
            "SELECT {POST_COLUMNS} FROM posts ORDER BY created_at DESC"
        ))
        .fetch_all(self.pool())
        .await
        .map_err(map_sqlx_error)?;

        rows.into_iter().map(Post::try_from).collect()
    }

    async fn find_post(&self, id: &RecordId) -> Result<Option<Post>, RepoError> {
        let row = sqlx::query_as::<_, PostRow>(&format!(
            "SELECT {POST_COLUMNS} FROM posts WHERE id = $1"
        ))
        .bind(id.as_str())
        .fetch_optional(self.pool())
        .await
        .map_err(map_sqlx_error)?;

        row.map(Post::try_from).transpose()
    }

    async fn insert_post(&self, post: Post) -> Result<Post, RepoError> {
        let tags = encode_json(&post.tags)?;
        let likes = encode_json(&post.likes)?;
        let comments = encode_json(&post.comments)?;

        let row = sqlx::query_as::<_, PostRow>(&format!(
            "INSERT INTO posts ({POST_COLUMNS}) \
             VALUES ($1, $2, $3, $4, $5, $6, $7, $8, $9, $10, $11, $12, $13) \
             RETURNING {POST_COLUMNS}"
        ))
        .bind(post.id.as_str())
        .bind(&post.title)
        .bind(&post.content)
        .bind(post.author.as_str())
        .bind(tags)
        .bind(post.category.as_str())
        .bind(post.status.as_str())
        .bind(post.views)
        .bind(likes)
        .bind(comments)
        .bind(post.published_at)
        .bind(post.created_at)
        .bind(post.updated_at)
        .fetch_one(self.pool())
        .await
        .map_err(map_sqlx_error)?;

        Post::try_from(row)
    }

    async fn replace_post(&self, post: Post) -> Result<Post, RepoError> {
        let tags = encode_json(&post.tags)?;
        let likes = encode_json(&post.likes)?;
        let comments = encode_json(&post.comments)?;

        let row = sqlx::query_as::<_, PostRow>(&format!(
            "UPDATE posts \
             SET title = $2, content = $3, tags = $4, category = $5, status = $6, \
                 views = $7, likes = $8, comments = $9, published_at = $10, updated_at = $11 \
             WHERE id = $1 \
             RETURNING {POST_COLUMNS}"
        ))
        .bind(post.id.as_str())
        .bind(&post.title)
        .bind(&post.content)
        .bind(tags)
        .bind(post.category.as_str())
        .bind(post.status.as_str())
        .bind(post.views)
        .bind(likes)
        .bind(comments)
        .bind(post.published_at)
        .bind(post.updated_at)
        .fetch_optional(self.pool())
        .await
        .map_err(map_sqlx_error)?;

        row.map(Post::try_from).transpose()?.ok_or(RepoError::NotFound)
    }
}
