//! Catalog import command.

use anyhow::{bail, Result};

use super::MigrateArgs;
use crate::context::{read_catalog, Context};

/// Run the migrate command.
pub async fn run(args: MigrateArgs, ctx: &Context) -> Result<()> {
    let path = ctx.resolve_path(&args.file);
    let payload = read_catalog(&path)?;
    let count = payload.products().len();

    if count == 0 {
        bail!("{} contains no products", path.display());
    }
    ctx.output
        .info(&format!("Loaded {} products from {}", count, path.display()));

    if args.dry_run {
        ctx.output.info("Dry run: nothing written.");
        return Ok(());
    }

    let written = ctx.service.import_catalog(&payload).await?;

    if ctx.output.is_json() {
        ctx.output.json(&serde_json::json!({
            "success": true,
            "count": written,
            "file": path.display().to_string(),
        }));
        return Ok(());
    }

    ctx.output.success(&format!(
        "Imported {} products into {} ({})",
        written,
        ctx.service.cache().namespace(),
        ctx.service.cache().store_name()
    ));
    Ok(())
}
