#![deny(clippy::all, clippy::pedantic)]

pub mod cache;
pub mod health;
pub mod posts;
pub mod tasks;
pub mod users;
pub mod watch;

use crate::args::SortOrderArg;
use crate::state::SortDirection;

impl From<SortOrderArg> for SortDirection {
    fn from(value: SortOrderArg) -> Self {
        match value {
            SortOrderArg::Asc => Self::Asc,
            SortOrderArg::Desc => Self::Desc,
        }
    }
}
