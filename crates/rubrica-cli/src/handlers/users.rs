#![deny(clippy::all, clippy::pedantic)]

use rubrica_api_types::{
    CreateUserRequest, RecordId, UpdateUserRequest, User, UserProfile, UserRole,
};

use crate::api;
use crate::args::{RoleArg, SortOrderArg, UserSortArg, UsersCmd};
use crate::client::{CliError, Ctx};
use crate::print::print_json;
use crate::state::{Action, UiState, UserSortField, reduce, visible_users};

pub async fn handle(ctx: &Ctx, cmd: UsersCmd) -> Result<(), CliError> {
    match cmd {
        UsersCmd::List {
            search,
            sort,
            order,
            active,
            role,
        } => list(ctx, search, sort, order, active, role).await,
        UsersCmd::Get { id } => get(ctx, id).await,
        UsersCmd::Create {
            name,
            email,
            age,
            role,
            bio,
            avatar,
            location,
        } => {
            let input = UserCreateInput {
                name,
                email,
                age,
                role,
                bio,
                avatar,
                location,
            };
            create(ctx, input).await
        }
        UsersCmd::Update {
            id,
            name,
            email,
            age,
            active,
        } => update(ctx, id, name, email, age, active).await,
        UsersCmd::Delete { id } => delete(ctx, id).await,
    }
}

struct UserCreateInput {
    name: String,
    email: String,
    age: Option<i32>,
    role: Vec<RoleArg>,
    bio: Option<String>,
    avatar: Option<String>,
    location: Option<String>,
}

/// The listing is fetched whole and shaped client-side: flags are dispatched
/// through the reducer and the printed rows come out of the selector.
async fn list(
    ctx: &Ctx,
    search: Option<String>,
    sort: Option<UserSortArg>,
    order: SortOrderArg,
    active: Option<bool>,
    role: Option<RoleArg>,
) -> Result<(), CliError> {
    let envelope = api::list_users(ctx).await?;
    let source = envelope.source;

    let mut state = UiState::default();
    reduce(&mut state, Action::UsersLoaded(envelope.data.unwrap_or_default()));
    if let Some(needle) = search {
        reduce(&mut state, Action::UsersSearched(needle));
    }
    if let Some(field) = sort {
        reduce(&mut state, Action::UsersSorted(field.into(), order.into()));
    }
    reduce(&mut state, Action::UsersFilteredActive(active));
    reduce(
        &mut state,
        Action::UsersFilteredRole(role.map(UserRole::from)),
    );

    let rows = visible_users(&state.users);
    print_json(&serde_json::json!({
        "source": source,
        "count": rows.len(),
        "data": rows,
    }))?;
    Ok(())
}

async fn get(ctx: &Ctx, id: RecordId) -> Result<(), CliError> {
    let res = api::get_user(ctx, &id).await?;
    print_json(&res)?;
    Ok(())
}

async fn create(ctx: &Ctx, input: UserCreateInput) -> Result<(), CliError> {
    let UserCreateInput {
        name,
        email,
        age,
        role,
        bio,
        avatar,
        location,
    } = input;

    let roles = if role.is_empty() {
        None
    } else {
        Some(role.into_iter().map(UserRole::from).collect())
    };
    let profile = if bio.is_none() && avatar.is_none() && location.is_none() {
        None
    } else {
        Some(UserProfile {
            bio,
            avatar,
            location,
        })
    };
    let payload = CreateUserRequest {
        name: Some(name),
        email: Some(email),
        age,
        roles,
        profile,
    };
    let res = api::create_user(ctx, &payload).await?;
    print_json(&res)?;
    Ok(())
}

async fn update(
    ctx: &Ctx,
    id: RecordId,
    name: Option<String>,
    email: Option<String>,
    age: Option<i32>,
    active: Option<bool>,
) -> Result<(), CliError> {
    let payload = UpdateUserRequest {
        name,
        email,
        age,
        is_active: active,
        roles: None,
        profile: None,
    };
    let res = api::update_user(ctx, &id, &payload).await?;
    print_json(&res)?;
    Ok(())
}

async fn delete(ctx: &Ctx, id: RecordId) -> Result<(), CliError> {
    let res = api::delete_user(ctx, &id).await?;
    print_json(&res)?;
    Ok(())
}

impl From<RoleArg> for UserRole {
    fn from(value: RoleArg) -> Self {
        match value {
            RoleArg::User => Self::User,
            RoleArg::Admin => Self::Admin,
            RoleArg::Moderator => Self::Moderator,
        }
    }
}

impl From<UserSortArg> for UserSortField {
    fn from(value: UserSortArg) -> Self {
        match value {
            UserSortArg::Name => Self::Name,
            UserSortArg::Email => Self::Email,
            UserSortArg::Age => Self::Age,
            UserSortArg::Created => Self::CreatedAt,
        }
    }
}
