#![deny(clippy::all, clippy::pedantic)]

use std::time::Duration;

use time::OffsetDateTime;
use time::format_description::well_known::Rfc3339;

use crate::api;
use crate::client::{CliError, Ctx};
use crate::state::{Action, UiState, reduce};

/// Polls the cache surface on a fixed interval and prints one status line
/// per tick. A failed poll is reported and the loop keeps going.
pub async fn run(ctx: &Ctx, interval_secs: u64) -> Result<(), CliError> {
    let mut state = UiState::default();
    let mut ticker = tokio::time::interval(Duration::from_secs(interval_secs.max(1)));
    loop {
        ticker.tick().await;
        poll_once(ctx, &mut state).await;
        render(&state)?;
    }
}

pub async fn poll_once(ctx: &Ctx, state: &mut UiState) {
    match api::redis_ping(ctx).await {
        Ok(_) => {
            reduce(state, Action::CacheChecked { enabled: true });
            match api::cache_entries(ctx, "*").await {
                Ok(envelope) => reduce(
                    state,
                    Action::CacheEntriesLoaded(envelope.data.unwrap_or_default()),
                ),
                Err(e) => reduce(state, Action::CacheFailed(e.to_string())),
            }
        }
        Err(e) => {
            reduce(state, Action::CacheChecked { enabled: false });
            reduce(state, Action::CacheFailed(e.to_string()));
        }
    }
}

fn render(state: &UiState) -> Result<(), CliError> {
    let now = OffsetDateTime::now_utc()
        .format(&Rfc3339)
        .map_err(|e| CliError::InvalidInput(e.to_string()))?;
    match (&state.cache.error, state.cache.enabled) {
        (Some(error), _) => println!("{now} cache=down ({error})"),
        (None, Some(true)) => println!("{now} cache=up entries={}", state.cache.entries.len()),
        (None, _) => println!("{now} cache=unknown"),
    }
    Ok(())
}
