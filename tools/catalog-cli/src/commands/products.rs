//! Products command.

use anyhow::Result;

use super::ProductsArgs;
use crate::context::Context;

/// Run the products command.
pub async fn run(args: ProductsArgs, ctx: &Context) -> Result<()> {
    let mut catalog = ctx.service.products().await?;
    let total = catalog.products().len();
    if let Some(limit) = args.limit {
        catalog.response.data.truncate(limit);
    }

    if ctx.output.is_json() {
        ctx.output.json(&catalog);
        return Ok(());
    }

    ctx.output.header("Catalog");
    if let Some(status) = &catalog.response.status {
        ctx.output.kv("Status", status);
    }
    if let Some(description) = &catalog.response.description {
        ctx.output.kv("Description", description);
    }
    ctx.output.kv("Products", &total.to_string());

    let table = ctx.output.table(&[
        ("DESCRIPTION", 44),
        ("PART NO", 16),
        ("VENDOR", 24),
        ("PRICE", 10),
    ]);
    for product in catalog.products() {
        table.row(&[
            product.description(),
            product.mfg_part_no(),
            product.vendor_name(),
            product.price.as_deref().unwrap_or("-"),
        ]);
    }

    if catalog.products().len() < total {
        ctx.output
            .info(&format!("Showing {} of {} products.", catalog.products().len(), total));
    }
    Ok(())
}
