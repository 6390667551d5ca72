//! Domain rules for the three record collections. Validation happens here,
//! before anything touches the store; each draft/patch type collects every
//! violated field so callers can report them all at once.

pub mod error;
pub mod posts;
pub mod tasks;
pub mod users;
