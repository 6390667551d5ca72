//! Command-line surface for `rubrica-cli`.
//! Kept in a shared file so tests can reuse the same definitions as the
//! binary itself.

#![deny(clippy::all, clippy::pedantic)]

use std::fmt;

use clap::{Parser, Subcommand, ValueEnum};
use rubrica_api_types::RecordId;

#[derive(Parser, Debug)]
#[command(name = "rubrica-cli", version, about = "Rubrica records API CLI", long_about = None)]
pub struct Cli {
    /// API base URL, e.g. <http://localhost:3000>
    #[arg(long, env = "RUBRICA_SITE_URL")]
    pub site: Option<String>,

    #[command(subcommand)]
    pub command: Commands,
}

#[derive(Subcommand, Debug)]
pub enum Commands {
    /// User management (list/get/create/update/delete)
    Users(UsersArgs),
    /// Task management, with multi-id bulk operations
    Tasks(TasksArgs),
    /// Post management
    Posts(PostsArgs),
    /// Direct cache access
    Cache(CacheArgs),
    /// Service health report
    Health,
    /// Poll the cache status on an interval
    WatchCache {
        /// Seconds between polls
        #[arg(long, default_value_t = 10)]
        interval: u64,
    },
}

#[derive(Parser, Debug)]
pub struct UsersArgs {
    #[command(subcommand)]
    pub action: UsersCmd,
}

#[derive(Subcommand, Debug)]
pub enum UsersCmd {
    /// List users with client-side search/sort/filter
    List {
        /// Case-insensitive substring match over name and email
        #[arg(long)]
        search: Option<String>,
        #[arg(long, value_enum)]
        sort: Option<UserSortArg>,
        #[arg(long, value_enum, default_value_t = SortOrderArg::Asc)]
        order: SortOrderArg,
        /// Keep only active (true) or inactive (false) users
        #[arg(long)]
        active: Option<bool>,
        #[arg(long, value_enum)]
        role: Option<RoleArg>,
    },
    /// Get a user by id
    Get { id: RecordId },
    /// Create a user
    Create {
        #[arg(long)]
        name: String,
        #[arg(long)]
        email: String,
        #[arg(long)]
        age: Option<i32>,
        /// Repeat for multiple roles; defaults to `user` server-side
        #[arg(long, value_enum)]
        role: Vec<RoleArg>,
        #[arg(long)]
        bio: Option<String>,
        #[arg(long)]
        avatar: Option<String>,
        #[arg(long)]
        location: Option<String>,
    },
    /// Update a user (only provided fields change)
    Update {
        id: RecordId,
        #[arg(long)]
        name: Option<String>,
        #[arg(long)]
        email: Option<String>,
        #[arg(long)]
        age: Option<i32>,
        #[arg(long)]
        active: Option<bool>,
    },
    /// Delete a user
    Delete { id: RecordId },
}

#[derive(Parser, Debug)]
pub struct TasksArgs {
    #[command(subcommand)]
    pub action: TasksCmd,
}

#[derive(Subcommand, Debug)]
pub enum TasksCmd {
    /// List tasks with client-side search/sort
    List {
        /// Server-side completion filter
        #[arg(long)]
        completed: Option<bool>,
        #[arg(long)]
        search: Option<String>,
        #[arg(long, value_enum)]
        sort: Option<TaskSortArg>,
        #[arg(long, value_enum, default_value_t = SortOrderArg::Asc)]
        order: SortOrderArg,
        /// Drop completed tasks from the output
        #[arg(long, default_value_t = false)]
        hide_completed: bool,
    },
    /// Create a task
    Create {
        #[arg(long)]
        title: String,
        #[arg(long)]
        description: Option<String>,
    },
    /// Update a task (only provided fields change)
    Update {
        id: RecordId,
        #[arg(long)]
        title: Option<String>,
        #[arg(long)]
        description: Option<String>,
        #[arg(long)]
        completed: Option<bool>,
    },
    /// Mark one or more tasks completed
    Done {
        #[arg(required = true, num_args = 1..)]
        ids: Vec<RecordId>,
    },
    /// Delete one or more tasks
    Delete {
        #[arg(required = true, num_args = 1..)]
        ids: Vec<RecordId>,
    },
}

#[derive(Parser, Debug)]
pub struct PostsArgs {
    #[command(subcommand)]
    pub action: PostsCmd,
}

#[derive(Subcommand, Debug)]
pub enum PostsCmd {
    /// List posts with optional status/category filters
    List {
        #[arg(long, value_enum)]
        status: Option<StatusArg>,
        #[arg(long, value_enum)]
        category: Option<CategoryArg>,
    },
    /// Get a post by id (counts a view)
    Get { id: RecordId },
    /// Create a post
    Create {
        #[arg(long)]
        title: String,
        #[arg(long)]
        content: String,
        #[arg(long)]
        author: RecordId,
        /// Comma-separated tag list
        #[arg(long)]
        tags: Option<String>,
        #[arg(long, value_enum)]
        category: Option<CategoryArg>,
    },
    /// Publish a draft
    Publish { id: RecordId },
    /// Comment on a post
    Comment {
        id: RecordId,
        #[arg(long)]
        user: RecordId,
        #[arg(long)]
        text: String,
    },
    /// Toggle a like on a post
    Like {
        id: RecordId,
        #[arg(long)]
        user: RecordId,
    },
}

#[derive(Parser, Debug)]
pub struct CacheArgs {
    #[command(subcommand)]
    pub action: CacheCmd,
}

#[derive(Subcommand, Debug)]
pub enum CacheCmd {
    /// Read one cache entry
    Get { key: String },
    /// Store a value (parsed as JSON when possible, kept as a string otherwise)
    Set {
        key: String,
        value: String,
        /// Time-to-live in seconds; the server default (3600) applies when omitted
        #[arg(long)]
        ttl: Option<u64>,
    },
    /// Delete one cache entry
    Del { key: String },
    /// List keys matching a pattern
    Keys {
        #[arg(long, default_value = "*")]
        pattern: String,
    },
    /// Flush the whole cache
    Flush,
    /// Check the cache connection
    Ping,
}

#[derive(Clone, Copy, Debug, ValueEnum)]
pub enum RoleArg {
    User,
    Admin,
    Moderator,
}

#[derive(Clone, Copy, Debug, ValueEnum)]
pub enum UserSortArg {
    Name,
    Email,
    Age,
    Created,
}

#[derive(Clone, Copy, Debug, ValueEnum)]
pub enum TaskSortArg {
    Title,
    Created,
    Updated,
}

#[derive(Clone, Copy, Debug, ValueEnum)]
pub enum SortOrderArg {
    Asc,
    Desc,
}

impl SortOrderArg {
    #[must_use]
    pub fn as_str(self) -> &'static str {
        match self {
            Self::Asc => "asc",
            Self::Desc => "desc",
        }
    }
}

impl fmt::Display for SortOrderArg {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

#[derive(Clone, Copy, Debug, ValueEnum)]
pub enum StatusArg {
    Draft,
    Published,
    Archived,
}

#[derive(Clone, Copy, Debug, ValueEnum)]
pub enum CategoryArg {
    Technology,
    Lifestyle,
    Education,
    Business,
    Other,
}
