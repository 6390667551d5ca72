//! REST handlers. Every body is an [`Envelope`](rubrica_api_types::Envelope);
//! errors go through [`AppError`](crate::application::error::AppError) so the
//! logging middleware sees the full chain.

pub mod cache;
pub mod health;
pub mod meta;
pub mod posts;
pub mod tasks;
pub mod users;

use rubrica_api_types::RecordId;

use crate::application::error::AppError;
use crate::domain::error::DomainError;

/// Path and body identifiers arrive as plain strings; a malformed one is a
/// client error, not a server fault.
fn parse_record_id(field: &'static str, raw: &str) -> Result<RecordId, AppError> {
    raw.trim()
        .parse()
        .map_err(|_| DomainError::single(field, "Invalid id format").into())
}
