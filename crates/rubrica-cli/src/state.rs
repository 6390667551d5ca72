//! Client-side view state: one serializable [`UiState`], an [`Action`] enum
//! and a pure [`reduce`] step. Derived views are plain functions over the
//! held collections; they filter, search and sort without mutating anything.

#![deny(clippy::all, clippy::pedantic)]

use std::collections::HashSet;

use rubrica_api_types::{CacheEntry, RecordId, Task, User, UserRole};
use serde::{Deserialize, Serialize};

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum SortDirection {
    Asc,
    Desc,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub enum UserSortField {
    Name,
    Email,
    Age,
    CreatedAt,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub enum TaskSortField {
    Title,
    CreatedAt,
    UpdatedAt,
}

/// Create and edit forms are mutually exclusive by construction.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub enum FormState {
    #[default]
    Hidden,
    Create,
    Edit {
        id: RecordId,
    },
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Panel {
    Users,
    Tasks,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct UsersPanel {
    pub items: Vec<User>,
    pub loading: bool,
    pub error: Option<String>,
    pub search: String,
    pub active: Option<bool>,
    pub role: Option<UserRole>,
    pub sort_field: UserSortField,
    pub direction: SortDirection,
    pub selected: HashSet<RecordId>,
    pub form: FormState,
}

impl Default for UsersPanel {
    fn default() -> Self {
        Self {
            items: Vec::new(),
            loading: false,
            error: None,
            search: String::new(),
            active: None,
            role: None,
            sort_field: UserSortField::CreatedAt,
            direction: SortDirection::Desc,
            selected: HashSet::new(),
            form: FormState::Hidden,
        }
    }
}

#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct TasksPanel {
    pub items: Vec<Task>,
    pub loading: bool,
    pub error: Option<String>,
    pub search: String,
    pub hide_completed: bool,
    pub sort_field: TaskSortField,
    pub direction: SortDirection,
    pub selected: HashSet<RecordId>,
    pub form: FormState,
}

impl Default for TasksPanel {
    fn default() -> Self {
        Self {
            items: Vec::new(),
            loading: false,
            error: None,
            search: String::new(),
            hide_completed: false,
            sort_field: TaskSortField::CreatedAt,
            direction: SortDirection::Desc,
            selected: HashSet::new(),
            form: FormState::Hidden,
        }
    }
}

#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct CachePanel {
    pub enabled: Option<bool>,
    pub entries: Vec<CacheEntry>,
    pub error: Option<String>,
}

#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct UiState {
    pub users: UsersPanel,
    pub tasks: TasksPanel,
    pub cache: CachePanel,
}

#[derive(Debug, Clone, PartialEq)]
pub enum Action {
    UsersRequested,
    UsersLoaded(Vec<User>),
    UsersFailed(String),
    UserUpserted(User),
    UserRemoved(RecordId),
    UsersSearched(String),
    UsersSorted(UserSortField, SortDirection),
    UsersFilteredActive(Option<bool>),
    UsersFilteredRole(Option<UserRole>),
    TasksRequested,
    TasksLoaded(Vec<Task>),
    TasksFailed(String),
    TaskUpserted(Task),
    TaskRemoved(RecordId),
    TasksSearched(String),
    TasksSorted(TaskSortField, SortDirection),
    CompletedHidden(bool),
    Selected(Panel, RecordId),
    Deselected(Panel, RecordId),
    SelectionToggled(Panel, RecordId),
    AllSelected(Panel),
    SelectionCleared(Panel),
    CreateFormOpened(Panel),
    EditFormOpened(Panel, RecordId),
    FormClosed(Panel),
    CacheChecked { enabled: bool },
    CacheEntriesLoaded(Vec<CacheEntry>),
    CacheFailed(String),
}

#[allow(clippy::too_many_lines)]
pub fn reduce(state: &mut UiState, action: Action) {
    match action {
        Action::UsersRequested => {
            state.users.loading = true;
            state.users.error = None;
        }
        Action::UsersLoaded(items) => {
            state.users.items = items;
            state.users.loading = false;
            state.users.error = None;
        }
        Action::UsersFailed(message) => {
            state.users.loading = false;
            state.users.error = Some(message);
        }
        Action::UserUpserted(user) => {
            let panel = &mut state.users;
            if let Some(slot) = panel.items.iter_mut().find(|u| u.id == user.id) {
                *slot = user;
            } else {
                panel.items.insert(0, user);
            }
            panel.form = FormState::Hidden;
        }
        Action::UserRemoved(id) => {
            let panel = &mut state.users;
            panel.items.retain(|u| u.id != id);
            panel.selected.remove(&id);
            if panel.form == (FormState::Edit { id }) {
                panel.form = FormState::Hidden;
            }
        }
        Action::UsersSearched(needle) => state.users.search = needle,
        Action::UsersSorted(field, direction) => {
            state.users.sort_field = field;
            state.users.direction = direction;
        }
        Action::UsersFilteredActive(active) => state.users.active = active,
        Action::UsersFilteredRole(role) => state.users.role = role,
        Action::TasksRequested => {
            state.tasks.loading = true;
            state.tasks.error = None;
        }
        Action::TasksLoaded(items) => {
            state.tasks.items = items;
            state.tasks.loading = false;
            state.tasks.error = None;
        }
        Action::TasksFailed(message) => {
            state.tasks.loading = false;
            state.tasks.error = Some(message);
        }
        Action::TaskUpserted(task) => {
            let panel = &mut state.tasks;
            if let Some(slot) = panel.items.iter_mut().find(|t| t.id == task.id) {
                *slot = task;
            } else {
                panel.items.insert(0, task);
            }
            panel.form = FormState::Hidden;
        }
        Action::TaskRemoved(id) => {
            let panel = &mut state.tasks;
            panel.items.retain(|t| t.id != id);
            panel.selected.remove(&id);
            if panel.form == (FormState::Edit { id }) {
                panel.form = FormState::Hidden;
            }
        }
        Action::TasksSearched(needle) => state.tasks.search = needle,
        Action::TasksSorted(field, direction) => {
            state.tasks.sort_field = field;
            state.tasks.direction = direction;
        }
        Action::CompletedHidden(hide) => state.tasks.hide_completed = hide,
        Action::Selected(panel, id) => {
            selection_mut(state, panel).insert(id);
        }
        Action::Deselected(panel, id) => {
            selection_mut(state, panel).remove(&id);
        }
        Action::SelectionToggled(panel, id) => {
            let selected = selection_mut(state, panel);
            if !selected.remove(&id) {
                selected.insert(id);
            }
        }
        Action::AllSelected(panel) => {
            let ids: Vec<RecordId> = match panel {
                Panel::Users => state.users.items.iter().map(|u| u.id.clone()).collect(),
                Panel::Tasks => state.tasks.items.iter().map(|t| t.id.clone()).collect(),
            };
            selection_mut(state, panel).extend(ids);
        }
        Action::SelectionCleared(panel) => {
            selection_mut(state, panel).clear();
        }
        Action::CreateFormOpened(panel) => *form_mut(state, panel) = FormState::Create,
        Action::EditFormOpened(panel, id) => *form_mut(state, panel) = FormState::Edit { id },
        Action::FormClosed(panel) => *form_mut(state, panel) = FormState::Hidden,
        Action::CacheChecked { enabled } => {
            state.cache.enabled = Some(enabled);
            if enabled {
                state.cache.error = None;
            }
        }
        Action::CacheEntriesLoaded(entries) => {
            state.cache.entries = entries;
            state.cache.error = None;
        }
        Action::CacheFailed(message) => state.cache.error = Some(message),
    }
}

fn selection_mut(state: &mut UiState, panel: Panel) -> &mut HashSet<RecordId> {
    match panel {
        Panel::Users => &mut state.users.selected,
        Panel::Tasks => &mut state.tasks.selected,
    }
}

fn form_mut(state: &mut UiState, panel: Panel) -> &mut FormState {
    match panel {
        Panel::Users => &mut state.users.form,
        Panel::Tasks => &mut state.tasks.form,
    }
}

/// Filter, then search, then stable-sort. Ties keep their input order.
pub fn visible_users(panel: &UsersPanel) -> Vec<&User> {
    let needle = panel.search.to_lowercase();
    let mut rows: Vec<&User> = panel
        .items
        .iter()
        .filter(|u| panel.active.is_none_or(|want| u.is_active == want))
        .filter(|u| panel.role.is_none_or(|role| u.roles.contains(&role)))
        .filter(|u| {
            needle.is_empty()
                || u.name.to_lowercase().contains(&needle)
                || u.email.to_lowercase().contains(&needle)
        })
        .collect();
    rows.sort_by(|a, b| {
        let ordering = match panel.sort_field {
            UserSortField::Name => a.name.to_lowercase().cmp(&b.name.to_lowercase()),
            UserSortField::Email => a.email.cmp(&b.email),
            UserSortField::Age => a.age.cmp(&b.age),
            UserSortField::CreatedAt => a.created_at.cmp(&b.created_at),
        };
        match panel.direction {
            SortDirection::Asc => ordering,
            SortDirection::Desc => ordering.reverse(),
        }
    });
    rows
}

/// Same pipeline as [`visible_users`]; the hide-completed toggle is applied
/// last, after sorting.
pub fn visible_tasks(panel: &TasksPanel) -> Vec<&Task> {
    let needle = panel.search.to_lowercase();
    let mut rows: Vec<&Task> = panel
        .items
        .iter()
        .filter(|t| {
            needle.is_empty()
                || t.title.to_lowercase().contains(&needle)
                || t.description
                    .as_deref()
                    .is_some_and(|d| d.to_lowercase().contains(&needle))
        })
        .collect();
    rows.sort_by(|a, b| {
        let ordering = match panel.sort_field {
            TaskSortField::Title => a.title.to_lowercase().cmp(&b.title.to_lowercase()),
            TaskSortField::CreatedAt => a.created_at.cmp(&b.created_at),
            TaskSortField::UpdatedAt => a.updated_at.cmp(&b.updated_at),
        };
        match panel.direction {
            SortDirection::Asc => ordering,
            SortDirection::Desc => ordering.reverse(),
        }
    });
    if panel.hide_completed {
        rows.retain(|t| !t.completed);
    }
    rows
}

#[cfg(test)]
mod tests {
    use rubrica_api_types::UserProfile;
    use time::OffsetDateTime;

    use super::*;

    fn user(name: &str, email: &str, age: i32, active: bool) -> User {
        User {
            id: RecordId::generate(),
            name: name.to_string(),
            email: email.to_string(),
            age: Some(age),
            is_active: active,
            roles: vec![UserRole::User],
            profile: UserProfile::default(),
            created_at: OffsetDateTime::now_utc(),
            updated_at: OffsetDateTime::now_utc(),
        }
    }

    fn task(title: &str, completed: bool) -> Task {
        Task {
            id: RecordId::generate(),
            title: title.to_string(),
            description: None,
            completed,
            created_at: OffsetDateTime::now_utc(),
            updated_at: OffsetDateTime::now_utc(),
        }
    }

    #[test]
    fn reduce_is_deterministic() {
        let users = vec![user("Ada", "ada@example.com", 36, true)];
        let run = || {
            let mut state = UiState::default();
            reduce(&mut state, Action::UsersLoaded(users.clone()));
            reduce(&mut state, Action::UsersSearched("ada".into()));
            reduce(
                &mut state,
                Action::UsersSorted(UserSortField::Name, SortDirection::Asc),
            );
            serde_json::to_value(&state).expect("serialize state")
        };
        assert_eq!(run(), run());
    }

    #[test]
    fn search_is_case_insensitive_over_name_and_email() {
        let panel = UsersPanel {
            items: vec![
                user("Ada Lovelace", "ada@example.com", 36, true),
                user("Grace Hopper", "grace@navy.mil", 45, true),
            ],
            search: "NAVY".into(),
            ..UsersPanel::default()
        };
        let rows = visible_users(&panel);
        assert_eq!(rows.len(), 1);
        assert_eq!(rows[0].name, "Grace Hopper");
    }

    #[test]
    fn sort_ties_keep_input_order() {
        let first = user("Same", "first@example.com", 30, true);
        let second = user("Same", "second@example.com", 30, true);
        let panel = UsersPanel {
            items: vec![first.clone(), second.clone()],
            sort_field: UserSortField::Name,
            direction: SortDirection::Asc,
            ..UsersPanel::default()
        };

        let rows = visible_users(&panel);
        assert_eq!(rows[0].email, first.email);
        assert_eq!(rows[1].email, second.email);
    }

    #[test]
    fn selectors_do_not_mutate_the_collection() {
        let panel = UsersPanel {
            items: vec![
                user("B", "b@example.com", 20, true),
                user("A", "a@example.com", 30, true),
            ],
            sort_field: UserSortField::Name,
            direction: SortDirection::Asc,
            ..UsersPanel::default()
        };
        let before: Vec<String> = panel.items.iter().map(|u| u.name.clone()).collect();

        let rows = visible_users(&panel);
        assert_eq!(rows[0].name, "A");
        let after: Vec<String> = panel.items.iter().map(|u| u.name.clone()).collect();
        assert_eq!(before, after);
    }

    #[test]
    fn active_filter_runs_before_search() {
        let panel = UsersPanel {
            items: vec![
                user("Ada", "ada@example.com", 36, true),
                user("Ada Dormant", "dormant@example.com", 36, false),
            ],
            active: Some(true),
            search: "ada".into(),
            ..UsersPanel::default()
        };
        let rows = visible_users(&panel);
        assert_eq!(rows.len(), 1);
        assert!(rows[0].is_active);
    }

    #[test]
    fn hide_completed_applies_after_sorting() {
        let panel = TasksPanel {
            items: vec![task("done", true), task("open", false)],
            hide_completed: true,
            sort_field: TaskSortField::Title,
            direction: SortDirection::Asc,
            ..TasksPanel::default()
        };
        let rows = visible_tasks(&panel);
        assert_eq!(rows.len(), 1);
        assert_eq!(rows[0].title, "open");
    }

    #[test]
    fn create_and_edit_forms_are_mutually_exclusive() {
        let mut state = UiState::default();
        let id = RecordId::generate();
        reduce(&mut state, Action::EditFormOpened(Panel::Users, id.clone()));
        assert_eq!(state.users.form, FormState::Edit { id });

        reduce(&mut state, Action::CreateFormOpened(Panel::Users));
        assert_eq!(state.users.form, FormState::Create);

        reduce(&mut state, Action::FormClosed(Panel::Users));
        assert_eq!(state.users.form, FormState::Hidden);
    }

    #[test]
    fn removing_a_record_clears_its_selection_and_edit_form() {
        let victim = user("Gone", "gone@example.com", 50, true);
        let id = victim.id.clone();
        let mut state = UiState::default();
        reduce(&mut state, Action::UsersLoaded(vec![victim]));
        reduce(&mut state, Action::Selected(Panel::Users, id.clone()));
        reduce(&mut state, Action::EditFormOpened(Panel::Users, id.clone()));

        reduce(&mut state, Action::UserRemoved(id.clone()));
        assert!(state.users.items.is_empty());
        assert!(!state.users.selected.contains(&id));
        assert_eq!(state.users.form, FormState::Hidden);
    }

    #[test]
    fn selection_ops_cover_toggle_select_all_and_clear() {
        let a = task("a", false);
        let b = task("b", false);
        let (id_a, id_b) = (a.id.clone(), b.id.clone());
        let mut state = UiState::default();
        reduce(&mut state, Action::TasksLoaded(vec![a, b]));

        reduce(&mut state, Action::SelectionToggled(Panel::Tasks, id_a.clone()));
        assert!(state.tasks.selected.contains(&id_a));
        reduce(&mut state, Action::SelectionToggled(Panel::Tasks, id_a.clone()));
        assert!(!state.tasks.selected.contains(&id_a));

        reduce(&mut state, Action::AllSelected(Panel::Tasks));
        assert_eq!(state.tasks.selected.len(), 2);
        reduce(&mut state, Action::Deselected(Panel::Tasks, id_b.clone()));
        assert!(!state.tasks.selected.contains(&id_b));

        reduce(&mut state, Action::SelectionCleared(Panel::Tasks));
        assert!(state.tasks.selected.is_empty());
    }

    #[test]
    fn upsert_replaces_in_place_and_hides_the_form() {
        let mut existing = user("Old", "old@example.com", 20, true);
        let mut state = UiState::default();
        reduce(&mut state, Action::UsersLoaded(vec![existing.clone()]));
        reduce(&mut state, Action::CreateFormOpened(Panel::Users));

        existing.name = "New".into();
        reduce(&mut state, Action::UserUpserted(existing));
        assert_eq!(state.users.items.len(), 1);
        assert_eq!(state.users.items[0].name, "New");
        assert_eq!(state.users.form, FormState::Hidden);
    }
}
