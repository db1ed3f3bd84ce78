//! Search command.

use anyhow::Result;
use catalog_search::ScoringStrategy;
use catalog_service::{SearchRequest, SearchResult};

use super::SearchArgs;
use crate::context::Context;

/// Run the search command.
pub async fn run(args: SearchArgs, ctx: &Context) -> Result<()> {
    let request = SearchRequest::new(args.query.join(" "))
        .with_page(args.page)
        .with_page_size(args.page_size.unwrap_or(ctx.config.search.default_page_size))
        .with_sort(args.sort);

    let result = match args.strategy {
        ScoringStrategy::Substring => ctx.service.search(&request).await?,
        ScoringStrategy::Weighted => ctx.service.indexed_search(&request).await?,
    };

    if ctx.output.is_json() {
        ctx.output.json(&result);
        return Ok(());
    }

    print_result(&result, args.strategy, ctx);
    Ok(())
}

fn print_result(result: &SearchResult, strategy: ScoringStrategy, ctx: &Context) {
    ctx.output.header(&format!("Results for \"{}\"", result.query));
    ctx.output.kv("Strategy", strategy.as_str());
    ctx.output.kv("Sort", result.sort_by.display_name());
    ctx.output.kv(
        "Page",
        &format!("{} of {} ({} matches)", result.page, result.total_pages, result.total),
    );
    ctx.output.kv("Cached", if result.cached { "yes" } else { "no" });

    let pagination = result.pagination();
    if result.results.is_empty() {
        ctx.output.info("No products on this page.");
        return;
    }
    ctx.output.kv(
        "Showing",
        &format!("{}-{} of {}", pagination.start_item(), pagination.end_item(), result.total),
    );

    let table = ctx.output.table(&[
        ("SCORE", 6),
        ("DESCRIPTION", 44),
        ("PART NO", 16),
        ("MANUFACTURER", 24),
    ]);
    for hit in &result.results {
        let score = hit.score.to_string();
        table.row(&[
            &score,
            hit.product.description(),
            hit.product.mfg_part_no(),
            hit.product.manufacturer_name(),
        ]);
    }

    if pagination.has_next() {
        println!();
        ctx.output
            .info(&format!("More results with --page {}", result.page + 1));
    }
}
