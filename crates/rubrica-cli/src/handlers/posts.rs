#![deny(clippy::all, clippy::pedantic)]

use rubrica_api_types::{
    AddCommentRequest, CreatePostRequest, PostCategory, PostStatus, RecordId, ToggleLikeRequest,
};

use crate::api;
use crate::args::{CategoryArg, PostsCmd, StatusArg};
use crate::client::{CliError, Ctx};
use crate::print::print_json;

pub async fn handle(ctx: &Ctx, cmd: PostsCmd) -> Result<(), CliError> {
    match cmd {
        PostsCmd::List { status, category } => list(ctx, status, category).await,
        PostsCmd::Get { id } => get(ctx, id).await,
        PostsCmd::Create {
            title,
            content,
            author,
            tags,
            category,
        } => create(ctx, title, content, author, tags, category).await,
        PostsCmd::Publish { id } => publish(ctx, id).await,
        PostsCmd::Comment { id, user, text } => comment(ctx, id, user, text).await,
        PostsCmd::Like { id, user } => like(ctx, id, user).await,
    }
}

async fn list(
    ctx: &Ctx,
    status: Option<StatusArg>,
    category: Option<CategoryArg>,
) -> Result<(), CliError> {
    let res = api::list_posts(
        ctx,
        status.map(PostStatus::from),
        category.map(PostCategory::from),
    )
    .await?;
    print_json(&res)?;
    Ok(())
}

async fn get(ctx: &Ctx, id: RecordId) -> Result<(), CliError> {
    let res = api::get_post(ctx, &id).await?;
    print_json(&res)?;
    Ok(())
}

async fn create(
    ctx: &Ctx,
    title: String,
    content: String,
    author: RecordId,
    tags: Option<String>,
    category: Option<CategoryArg>,
) -> Result<(), CliError> {
    let tags = tags.map(|raw| {
        raw.split(',')
            .map(str::trim)
            .filter(|tag| !tag.is_empty())
            .map(String::from)
            .collect()
    });
    let payload = CreatePostRequest {
        title: Some(title),
        content: Some(content),
        author: Some(author.into_string()),
        tags,
        category: category.map(PostCategory::from),
    };
    let res = api::create_post(ctx, &payload).await?;
    print_json(&res)?;
    Ok(())
}

async fn publish(ctx: &Ctx, id: RecordId) -> Result<(), CliError> {
    let res = api::publish_post(ctx, &id).await?;
    print_json(&res)?;
    Ok(())
}

async fn comment(ctx: &Ctx, id: RecordId, user: RecordId, text: String) -> Result<(), CliError> {
    let payload = AddCommentRequest {
        user: Some(user.into_string()),
        text: Some(text),
    };
    let res = api::add_comment(ctx, &id, &payload).await?;
    print_json(&res)?;
    Ok(())
}

async fn like(ctx: &Ctx, id: RecordId, user: RecordId) -> Result<(), CliError> {
    let payload = ToggleLikeRequest {
        user: Some(user.into_string()),
    };
    let res = api::toggle_like(ctx, &id, &payload).await?;
    print_json(&res)?;
    Ok(())
}

impl From<StatusArg> for PostStatus {
    fn from(value: StatusArg) -> Self {
        match value {
            StatusArg::Draft => Self::Draft,
            StatusArg::Published => Self::Published,
            StatusArg::Archived => Self::Archived,
        }
    }
}

impl From<CategoryArg> for PostCategory {
    fn from(value: CategoryArg) -> Self {
        match value {
            CategoryArg::Technology => Self::Technology,
            CategoryArg::Lifestyle => Self::Lifestyle,
            CategoryArg::Education => Self::Education,
            CategoryArg::Business => Self::Business,
            CategoryArg::Other => Self::Other,
        }
    }
}
