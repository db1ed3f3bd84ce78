//! Catalog key management commands.

use anyhow::{Context as _, Result};
use catalog_service::ManageAction;
use dialoguer::Confirm;

use super::{KvArgs, KvCommand};
use crate::context::Context;

/// Run the kv command.
pub async fn run(args: KvArgs, ctx: &Context) -> Result<()> {
    let action = match args.command {
        KvCommand::Populate => ManageAction::Populate,
        KvCommand::Status => ManageAction::Status,
        KvCommand::Clear { yes } => {
            if !yes && !ctx.output.is_json() {
                let confirmed = Confirm::new()
                    .with_prompt("Delete the stored catalog?")
                    .default(false)
                    .interact()
                    .context("Failed to read confirmation")?;
                if !confirmed {
                    ctx.output.info("Cancelled.");
                    return Ok(());
                }
            }
            ManageAction::Clear
        }
    };

    let outcome = ctx.service.manage(action).await?;

    if ctx.output.is_json() {
        ctx.output.json(&outcome);
        return Ok(());
    }

    match outcome.has_data {
        Some(false) => ctx.output.warn(&outcome.message),
        _ => ctx.output.success(&outcome.message),
    }
    ctx.output.kv("Store", ctx.service.cache().store_name());
    ctx.output.kv("Namespace", ctx.service.cache().namespace());
    Ok(())
}
