use std::sync::Arc;

use rubrica_api_types::{CreatePostRequest, Post, PostCategory, PostStatus, RecordId};
use time::OffsetDateTime;

use crate::application::error::AppError;
use crate::application::repos::{PostsRepo, UsersRepo};
use crate::domain::error::DomainError;
use crate::domain::posts::{self, PostDraft};

/// Optional narrowing of the post listing.
#[derive(Debug, Clone, Copy, Default)]
pub struct PostFilter {
    pub status: Option<PostStatus>,
    pub category: Option<PostCategory>,
}

/// Posts reference users as authors, so the service holds both repositories.
#[derive(Clone)]
pub struct PostService {
    posts: Arc<dyn PostsRepo>,
    users: Arc<dyn UsersRepo>,
}

impl PostService {
    pub fn new(posts: Arc<dyn PostsRepo>, users: Arc<dyn UsersRepo>) -> Self {
        Self { posts, users }
    }

    pub async fn list_posts(&self, filter: PostFilter) -> Result<Vec<Post>, AppError> {
        let mut posts = self.posts.list_posts().await?;
        if let Some(status) = filter.status {
            posts.retain(|post| post.status == status);
        }
        if let Some(category) = filter.category {
            posts.retain(|post| post.category == category);
        }
        Ok(posts)
    }

    pub async fn get_post(&self, id: &RecordId) -> Result<Post, AppError> {
        self.posts
            .find_post(id)
            .await?
            .ok_or(AppError::not_found("Post"))
    }

    /// Creates a draft post. The author must name an existing user; a missing
    /// author is reported as a field violation like any other bad input.
    pub async fn create_post(&self, request: CreatePostRequest) -> Result<Post, AppError> {
        let draft = PostDraft::from_request(request)?;
        if self.users.find_user(draft.author()).await?.is_none() {
            return Err(DomainError::single("author", "Author does not exist").into());
        }
        let post = draft.into_record(RecordId::generate(), OffsetDateTime::now_utc());
        Ok(self.posts.insert_post(post).await?)
    }

    /// Marks a post published. Republishing keeps the original publication
    /// timestamp.
    pub async fn publish_post(&self, id: &RecordId) -> Result<Post, AppError> {
        let mut post = self.get_post(id).await?;
        posts::publish(&mut post, OffsetDateTime::now_utc());
        Ok(self.posts.replace_post(post).await?)
    }

    pub async fn add_comment(
        &self,
        id: &RecordId,
        user: RecordId,
        text: &str,
    ) -> Result<Post, AppError> {
        if self.users.find_user(&user).await?.is_none() {
            return Err(DomainError::single("user", "User does not exist").into());
        }
        let mut post = self.get_post(id).await?;
        posts::add_comment(&mut post, user, text, OffsetDateTime::now_utc())?;
        Ok(self.posts.replace_post(post).await?)
    }

    /// Adds or removes the user's like; returns the stored post and whether
    /// the post ends up liked by that user.
    pub async fn toggle_like(&self, id: &RecordId, user: RecordId) -> Result<(Post, bool), AppError> {
        if self.users.find_user(&user).await?.is_none() {
            return Err(DomainError::single("user", "User does not exist").into());
        }
        let mut post = self.get_post(id).await?;
        let liked = posts::toggle_like(&mut post, user, OffsetDateTime::now_utc());
        let post = self.posts.replace_post(post).await?;
        Ok((post, liked))
    }

    /// Fetches a post and counts the read.
    pub async fn view_post(&self, id: &RecordId) -> Result<Post, AppError> {
        let mut post = self.get_post(id).await?;
        posts::record_view(&mut post);
        Ok(self.posts.replace_post(post).await?)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::collections::HashMap;
    use std::sync::Mutex;

    use async_trait::async_trait;
    use rubrica_api_types::{PostCategory, PostStatus, User, UserProfile, UserRole};

    use crate::application::repos::RepoError;

    #[derive(Default)]
    struct MemoryPostsRepo {
        posts: Mutex<HashMap<RecordId, Post>>,
    }

    #[async_trait]
    impl PostsRepo for MemoryPostsRepo {
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

    #[derive(Default)]
    struct MemoryUsersRepo {
        users: Mutex<HashMap<RecordId, User>>,
    }

    #[async_trait]
    impl UsersRepo for MemoryUsersRepo {
        async fn list_users(&self) -> Result<Vec<User>, RepoError> {
            Ok(self.users.lock().unwrap().values().cloned().collect())
        }

        async fn find_user(&self, id: &RecordId) -> Result<Option<User>, RepoError> {
            Ok(self.users.lock().unwrap().get(id).cloned())
        }

        async fn insert_user(&self, user: User) -> Result<User, RepoError> {
            self.users
                .lock()
                .unwrap()
                .insert(user.id.clone(), user.clone());
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

    async fn service_with_author() -> (PostService, RecordId) {
        let users = Arc::new(MemoryUsersRepo::default());
        let author = RecordId::generate();
        let now = OffsetDateTime::now_utc();
        users
            .insert_user(User {
                id: author.clone(),
                name: "Ada Lovelace".to_string(),
                email: "ada@example.com".to_string(),
                age: Some(36),
                is_active: true,
                roles: vec![UserRole::User],
                profile: UserProfile::default(),
                created_at: now,
                updated_at: now,
            })
            .await
            .expect("author stored");
        (
            PostService::new(Arc::new(MemoryPostsRepo::default()), users),
            author,
        )
    }

    fn create_request(author: &RecordId) -> CreatePostRequest {
        CreatePostRequest {
            title: Some("Hello world".to_string()),
            content: Some("A long enough body".to_string()),
            author: Some(author.as_str().to_string()),
            tags: Some(vec!["Rust".to_string(), "rust".to_string()]),
            category: Some(PostCategory::Technology),
        }
    }

    #[tokio::test]
    async fn created_post_starts_as_draft() {
        let (service, author) = service_with_author().await;
        let post = service
            .create_post(create_request(&author))
            .await
            .expect("post created");

        assert_eq!(post.status, PostStatus::Draft);
        assert_eq!(post.views, 0);
        assert_eq!(post.tags, vec!["rust".to_string()]);
        assert!(post.published_at.is_none());
    }

    #[tokio::test]
    async fn unknown_author_is_a_field_violation() {
        let (service, _) = service_with_author().await;
        let stranger = RecordId::generate();

        let err = service.create_post(create_request(&stranger)).await.unwrap_err();
        match err {
            AppError::Domain(DomainError::Validation { violations }) => {
                assert_eq!(violations.len(), 1);
                assert_eq!(violations[0].field, "author");
            }
            other => panic!("expected validation error, got {other:?}"),
        }
    }

    #[tokio::test]
    async fn republish_keeps_original_timestamp() {
        let (service, author) = service_with_author().await;
        let post = service
            .create_post(create_request(&author))
            .await
            .expect("post created");

        let published = service.publish_post(&post.id).await.expect("published");
        assert_eq!(published.status, PostStatus::Published);
        let first_published_at = published.published_at.expect("publication timestamp");

        let again = service.publish_post(&post.id).await.expect("republished");
        assert_eq!(again.published_at, Some(first_published_at));
    }

    #[tokio::test]
    async fn likes_toggle_per_user() {
        let (service, author) = service_with_author().await;
        let post = service
            .create_post(create_request(&author))
            .await
            .expect("post created");

        let (post, liked) = service
            .toggle_like(&post.id, author.clone())
            .await
            .expect("liked");
        assert!(liked);
        assert_eq!(post.likes.len(), 1);

        let (post, liked) = service
            .toggle_like(&post.id, author.clone())
            .await
            .expect("unliked");
        assert!(!liked);
        assert!(post.likes.is_empty());
    }

    #[tokio::test]
    async fn comments_require_text_and_a_known_user() {
        let (service, author) = service_with_author().await;
        let post = service
            .create_post(create_request(&author))
            .await
            .expect("post created");

        let err = service
            .add_comment(&post.id, author.clone(), "   ")
            .await
            .unwrap_err();
        assert!(matches!(
            err,
            AppError::Domain(DomainError::Validation { .. })
        ));

        let err = service
            .add_comment(&post.id, RecordId::generate(), "Nice one")
            .await
            .unwrap_err();
        assert!(matches!(
            err,
            AppError::Domain(DomainError::Validation { .. })
        ));

        let post = service
            .add_comment(&post.id, author, "Nice one")
            .await
            .expect("comment stored");
        assert_eq!(post.comments.len(), 1);
        assert_eq!(post.comments[0].text, "Nice one");
    }

    #[tokio::test]
    async fn listing_filters_on_status_and_category() {
        let (service, author) = service_with_author().await;
        let published = service
            .create_post(create_request(&author))
            .await
            .expect("post created");
        service
            .publish_post(&published.id)
            .await
            .expect("published");

        let mut second = create_request(&author);
        second.title = Some("Another post".to_string());
        second.category = Some(PostCategory::Lifestyle);
        service.create_post(second).await.expect("post created");

        let all = service.list_posts(PostFilter::default()).await.expect("listing");
        assert_eq!(all.len(), 2);

        let drafts = service
            .list_posts(PostFilter {
                status: Some(PostStatus::Draft),
                category: None,
            })
            .await
            .expect("listing");
        assert_eq!(drafts.len(), 1);
        assert_eq!(drafts[0].title, "Another post");

        let tech = service
            .list_posts(PostFilter {
                status: None,
                category: Some(PostCategory::Technology),
            })
            .await
            .expect("listing");
        assert_eq!(tech.len(), 1);
        assert_eq!(tech[0].id, published.id);
    }

    #[tokio::test]
    async fn views_accumulate() {
        let (service, author) = service_with_author().await;
        let post = service
            .create_post(create_request(&author))
            .await
            .expect("post created");

        service.view_post(&post.id).await.expect("first view");
        let post = service.view_post(&post.id).await.expect("second view");
        assert_eq!(post.views, 2);
    }
}
