use async_trait::async_trait;
use rubrica_api_types::{RecordId, User, UserProfile, UserRole};
use serde_json::Value;
use time::OffsetDateTime;

use crate::application::repos::{RepoError, UsersRepo};

use super::{PostgresRepositories, map_sqlx_error};

// Role sets and profiles live in JSONB columns.
#[derive(sqlx::FromRow)]
struct UserRow {
    id: String,
    name: String,
    email: String,
    age: Option<i32>,
    is_active: bool,
    roles: Value,
    profile: Value,
    created_at: OffsetDateTime,
    updated_at: OffsetDateTime,
}

impl TryFrom<UserRow> for User {
    type Error = RepoError;

    fn try_from(row: UserRow) -> Result<Self, Self::Error> {
        let id: RecordId = row.id.parse().map_err(RepoError::from_persistence)?;
        let roles: Vec<UserRole> =
            serde_json::from_value(row.roles).map_err(RepoError::from_persistence)?;
        let profile: UserProfile =
            serde_json::from_value(row.profile).map_err(RepoError::from_persistence)?;
        Ok(User {
            id,
            name: row.name,
            email: row.email,
            age: row.age,
            is_active: row.is_active,
            roles,
            profile,
            created_at: row.created_at,
            updated_at: row.updated_at,
        })
    }
}

fn encode_roles(roles: &[UserRole]) -> Result<Value, RepoError> {
    serde_json::to_value(roles).map_err(RepoError::from_persistence)
}

fn encode_profile(profile: &UserProfile) -> Result<Value, RepoError> {
    serde_json::to_value(profile).map_err(RepoError::from_persistence)
}

const USER_COLUMNS: &str = "id, name, email, age, is_active, roles, profile, created_at, updated_at";

#[async_trait]
impl UsersRepo for PostgresRepositories {
    async fn list_users(&self) -> Result<Vec<User>, RepoError> {
        let rows = sqlx::query_as::<_, UserRow>(&format!(
            "SELECT {USER_COLUMNS} FROM users ORDER BY created_at DESC"
        ))
        .fetch_all(self.pool())
        .await
        .map_err(map_sqlx_error)?;

        rows.into_iter().map(User::try_from).collect()
    }

    async fn find_user(&self, id: &RecordId) -> Result<Option<User>, RepoError> {
        let row = sqlx::query_as::<_, UserRow>(&format!(
            "SELECT {USER_COLUMNS} FROM users WHERE id = $1"
        ))
        .bind(id.as_str())
        .fetch_optional(self.pool())
        .await
        .map_err(map_sqlx_error)?;

        row.map(User::try_from).transpose()
    }

    async fn insert_user(&self, user: User) -> Result<User, RepoError> {
        let roles = encode_roles(&user.roles)?;
        let profile = encode_profile(&user.profile)?;

        let row = sqlx::query_as::<_, UserRow>(&format!(
            "INSERT INTO users ({USER_COLUMNS}) \
             VALUES ($1, $2, $3, $4, $5, $6, $7, $8, $9) \
             RETURNING {USER_COLUMNS}"
        ))
        .bind(user.id.as_str())
        .bind(&user.name)
        .bind(&user.email)
        .bind(user.age)
        .bind(user.is_active)
        .bind(roles)
        .bind(profile)
        .bind(user.created_at)
        .bind(user.updated_at)
        .fetch_one(self.pool())
        .await
        .map_err(map_sqlx_error)?;

        User::try_from(row)
    }

    async fn replace_user(&self, user: User) -> Result<User, RepoError> {
        let roles = encode_roles(&user.roles)?;
        let profile = encode_profile(&user.profile)?;

        let row = sqlx::query_as::<_, UserRow>(&format!(
            "UPDATE users \
             SET name = $2, email = $3, age = $4, is_active = $5, roles = $6, \
                 profile = $7, updated_at = $8 \
             WHERE id = $1 \
             RETURNING {USER_COLUMNS}"
        ))
        .bind(user.id.as_str())
        .bind(&user.name)
        .bind(&user.email)
        .bind(user.age)
        .bind(user.is_active)
        .bind(roles)
        .bind(profile)
        .bind(user.updated_at)
        .fetch_optional(self.pool())
        .await
        .map_err(map_sqlx_error)?;

        row.map(User::try_from).transpose()?.ok_or(RepoError::NotFound)
    }

    async fn delete_user(&self, id: &RecordId) -> Result<Option<User>, RepoError> {
        let row = sqlx::query_as::<_, UserRow>(&format!(
            "DELETE FROM users WHERE id = $1 RETURNING {USER_COLUMNS}"
        ))
        .bind(id.as_str())
        .fetch_optional(self.pool())
        .await
        .map_err(map_sqlx_error)?;

        row.map(User::try_from).transpose()
    }
}
