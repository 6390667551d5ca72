#![deny(clippy::all, clippy::pedantic)]

use rubrica_api_types::{CreateTaskRequest, RecordId, UpdateTaskRequest};
use tokio::task::JoinSet;

use crate::api;
use crate::args::{SortOrderArg, TaskSortArg, TasksCmd};
use crate::client::{CliError, Ctx};
use crate::print::print_json;
use crate::state::{Action, TaskSortField, UiState, reduce, visible_tasks};

pub async fn handle(ctx: &Ctx, cmd: TasksCmd) -> Result<(), CliError> {
    match cmd {
        TasksCmd::List {
            completed,
            search,
            sort,
            order,
            hide_completed,
        } => list(ctx, completed, search, sort, order, hide_completed).await,
        TasksCmd::Create { title, description } => create(ctx, title, description).await,
        TasksCmd::Update {
            id,
            title,
            description,
            completed,
        } => update(ctx, id, title, description, completed).await,
        TasksCmd::Done { ids } => done(ctx, ids).await,
        TasksCmd::Delete { ids } => delete(ctx, ids).await,
    }
}

async fn list(
    ctx: &Ctx,
    completed: Option<bool>,
    search: Option<String>,
    sort: Option<TaskSortArg>,
    order: SortOrderArg,
    hide_completed: bool,
) -> Result<(), CliError> {
    let envelope = api::list_tasks(ctx, completed).await?;

    let mut state = UiState::default();
    reduce(&mut state, Action::TasksLoaded(envelope.data.unwrap_or_default()));
    if let Some(needle) = search {
        reduce(&mut state, Action::TasksSearched(needle));
    }
    if let Some(field) = sort {
        reduce(&mut state, Action::TasksSorted(field.into(), order.into()));
    }
    reduce(&mut state, Action::CompletedHidden(hide_completed));

    let rows = visible_tasks(&state.tasks);
    print_json(&serde_json::json!({
        "count": rows.len(),
        "data": rows,
    }))?;
    Ok(())
}

async fn create(ctx: &Ctx, title: String, description: Option<String>) -> Result<(), CliError> {
    let payload = CreateTaskRequest {
        title: Some(title),
        description,
    };
    let res = api::create_task(ctx, &payload).await?;
    print_json(&res)?;
    Ok(())
}

async fn update(
    ctx: &Ctx,
    id: RecordId,
    title: Option<String>,
    description: Option<String>,
    completed: Option<bool>,
) -> Result<(), CliError> {
    let payload = UpdateTaskRequest {
        title,
        description,
        completed,
    };
    let res = api::update_task(ctx, &id, &payload).await?;
    print_json(&res)?;
    Ok(())
}

/// Bulk completion: one request per id, all in flight at once.
async fn done(ctx: &Ctx, ids: Vec<RecordId>) -> Result<(), CliError> {
    let patch = UpdateTaskRequest {
        completed: Some(true),
        ..UpdateTaskRequest::default()
    };
    let settled = settle(ids, |id| {
        let ctx = ctx.clone();
        let patch = patch.clone();
        async move { api::update_task(&ctx, &id, &patch).await.map(|_| ()) }
    })
    .await?;
    println!("{settled} tasks completed");
    Ok(())
}

/// Bulk delete: one request per id, all in flight at once.
async fn delete(ctx: &Ctx, ids: Vec<RecordId>) -> Result<(), CliError> {
    let settled = settle(ids, |id| {
        let ctx = ctx.clone();
        async move { api::delete_task(&ctx, &id).await.map(|_| ()) }
    })
    .await?;
    println!("{settled} tasks deleted");
    Ok(())
}

/// Waits for every request to settle, then reports a single error carrying
/// the first failure if any request went wrong.
async fn settle<F, Fut>(ids: Vec<RecordId>, start: F) -> Result<usize, CliError>
where
    F: Fn(RecordId) -> Fut,
    Fut: Future<Output = Result<(), CliError>> + Send + 'static,
{
    let total = ids.len();
    let mut set = JoinSet::new();
    for id in ids {
        set.spawn(start(id));
    }

    let mut ok = 0usize;
    let mut failures = Vec::new();
    while let Some(joined) = set.join_next().await {
        match joined {
            Ok(Ok(())) => ok += 1,
            Ok(Err(e)) => failures.push(e.to_string()),
            Err(e) => failures.push(e.to_string()),
        }
    }

    if let Some(first) = failures.first() {
        return Err(CliError::Server(format!(
            "{} of {total} requests failed: {first}",
            failures.len()
        )));
    }
    Ok(ok)
}

impl From<TaskSortArg> for TaskSortField {
    fn from(value: TaskSortArg) -> Self {
        match value {
            TaskSortArg::Title => Self::Title,
            TaskSortArg::Created => Self::CreatedAt,
            TaskSortArg::Updated => Self::UpdatedAt,
        }
    }
}
