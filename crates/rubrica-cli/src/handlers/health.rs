#![deny(clippy::all, clippy::pedantic)]

use crate::api;
use crate::client::{CliError, Ctx};
use crate::print::print_json;

pub async fn handle(ctx: &Ctx) -> Result<(), CliError> {
    let report = api::health(ctx).await?;
    print_json(&report)?;
    Ok(())
}
