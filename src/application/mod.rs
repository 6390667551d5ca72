//! Application services: orchestration between the domain rules and the
//! persistence/cache adapters.

pub mod cache;
pub mod error;
pub mod health;
pub mod posts;
pub mod repos;
pub mod tasks;
pub mod users;
