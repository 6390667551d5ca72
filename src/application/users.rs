use std::sync::Arc;

use rubrica_api_types::{
    CreateUserRequest, ListSource, RecordId, UpdateUserRequest, User,
};
use time::OffsetDateTime;
use tracing::debug;

use crate::application::cache::CacheService;
use crate::application::error::AppError;
use crate::application::repos::UsersRepo;
use crate::domain::users::{UserDraft, UserPatch};

/// User CRUD with a cache-aside listing. The cache handle is optional; when
/// absent every read goes straight to the repository.
#[derive(Clone)]
pub struct UserService {
    repo: Arc<dyn UsersRepo>,
    cache: Option<Arc<CacheService>>,
}

impl UserService {
    pub fn new(repo: Arc<dyn UsersRepo>, cache: Option<Arc<CacheService>>) -> Self {
        Self { repo, cache }
    }

    /// All users plus where the listing came from.
    pub async fn list_users(&self) -> Result<(Vec<User>, ListSource), AppError> {
        if let Some(cache) = self.cache.as_ref() {
            if let Some(users) = cache.read_user_list().await {
                debug!(count = users.len(), "served user listing from cache");
                return Ok((users, ListSource::Cache));
            }
        }

        let users = self.repo.list_users().await?;
        if let Some(cache) = self.cache.as_ref() {
            cache.store_user_list(&users).await;
        }
        Ok((users, ListSource::Database))
    }

    pub async fn get_user(&self, id: &RecordId) -> Result<User, AppError> {
        self.repo
            .find_user(id)
            .await?
            .ok_or(AppError::not_found("User"))
    }

    pub async fn create_user(&self, request: CreateUserRequest) -> Result<User, AppError> {
        let draft = UserDraft::from_request(request)?;
        let user = draft.into_record(RecordId::generate(), OffsetDateTime::now_utc());
        let user = self.repo.insert_user(user).await?;
        self.invalidate_listing().await;
        Ok(user)
    }

    pub async fn update_user(
        &self,
        id: &RecordId,
        request: UpdateUserRequest,
    ) -> Result<User, AppError> {
        let patch = UserPatch::from_request(request)?;

        let mut user = self.get_user(id).await?;
        if patch.is_empty() {
            return Ok(user);
        }

        patch.apply(&mut user, OffsetDateTime::now_utc());
        let user = self.repo.replace_user(user).await?;
        self.invalidate_listing().await;
        Ok(user)
    }

    pub async fn delete_user(&self, id: &RecordId) -> Result<User, AppError> {
        let removed = self
            .repo
            .delete_user(id)
            .await?
            .ok_or(AppError::not_found("User"))?;
        self.invalidate_listing().await;
        Ok(removed)
    }

    async fn invalidate_listing(&self) {
        if let Some(cache) = self.cache.as_ref() {
            cache.invalidate_user_list().await;
        }
    }
}
