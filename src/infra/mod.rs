//! Adapters for the outside world: Postgres, Redis, HTTP and telemetry.

pub mod cache;
pub mod db;
pub mod error;
pub mod http;
pub mod telemetry;
