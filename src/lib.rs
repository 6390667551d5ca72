//! rubrica: a small records service exposing users, tasks and posts over
//! Postgres, with an optional Redis cache in front of hot listings and a
//! JSON REST API wrapped in a uniform response envelope.

pub mod application;
pub mod config;
pub mod domain;
pub mod infra;
