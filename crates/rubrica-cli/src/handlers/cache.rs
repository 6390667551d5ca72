#![deny(clippy::all, clippy::pedantic)]

use rubrica_api_types::CacheSetRequest;

use crate::api;
use crate::args::CacheCmd;
use crate::client::{CliError, Ctx};
use crate::print::print_json;

pub async fn handle(ctx: &Ctx, cmd: CacheCmd) -> Result<(), CliError> {
    match cmd {
        CacheCmd::Get { key } => get(ctx, key).await,
        CacheCmd::Set { key, value, ttl } => set(ctx, key, value, ttl).await,
        CacheCmd::Del { key } => del(ctx, key).await,
        CacheCmd::Keys { pattern } => keys(ctx, pattern).await,
        CacheCmd::Flush => flush(ctx).await,
        CacheCmd::Ping => ping(ctx).await,
    }
}

async fn get(ctx: &Ctx, key: String) -> Result<(), CliError> {
    let res = api::cache_get(ctx, &key).await?;
    print_json(&res)?;
    Ok(())
}

/// The value is stored as JSON when it parses as JSON; anything else is kept
/// as a plain string, matching what the server does on reads.
async fn set(ctx: &Ctx, key: String, value: String, ttl: Option<u64>) -> Result<(), CliError> {
    let value = serde_json::from_str(&value).unwrap_or(serde_json::Value::String(value));
    let payload = CacheSetRequest { value, ttl };
    let res = api::cache_set(ctx, &key, &payload).await?;
    print_json(&res)?;
    Ok(())
}

async fn del(ctx: &Ctx, key: String) -> Result<(), CliError> {
    let res = api::cache_del(ctx, &key).await?;
    print_json(&res)?;
    Ok(())
}

async fn keys(ctx: &Ctx, pattern: String) -> Result<(), CliError> {
    let res = api::cache_keys(ctx, &pattern).await?;
    print_json(&res)?;
    Ok(())
}

async fn flush(ctx: &Ctx) -> Result<(), CliError> {
    let res = api::cache_flush(ctx).await?;
    print_json(&res)?;
    Ok(())
}

async fn ping(ctx: &Ctx) -> Result<(), CliError> {
    let res = api::redis_ping(ctx).await?;
    print_json(&res)?;
    Ok(())
}
