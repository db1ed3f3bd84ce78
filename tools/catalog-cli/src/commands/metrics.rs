//! Metrics command.

use anyhow::Result;

use crate::context::Context;
use crate::output::{format_ms, pool_usage};

/// Run the metrics command.
pub async fn run(ctx: &Context) -> Result<()> {
    let snapshot = ctx.service.metrics();

    if ctx.output.is_json() {
        ctx.output.json(&snapshot);
        return Ok(());
    }

    ctx.output.header("Metrics");
    ctx.output.kv("Timestamp", &snapshot.timestamp.to_rfc3339());
    ctx.output.kv("Uptime", &format!("{:.1}s", snapshot.uptime_secs));
    ctx.output.kv(
        "Config",
        &ctx.config_path
            .as_ref()
            .map(|p| p.display().to_string())
            .unwrap_or_else(|| "(defaults)".to_string()),
    );
    ctx.output.kv("Store", ctx.service.cache().store_name());
    ctx.output
        .kv("Local cache entries", &snapshot.cache.local_entries.to_string());
    ctx.output.kv(
        "Pool",
        &pool_usage(snapshot.pool.active, snapshot.pool.waiting, snapshot.pool.max),
    );
    ctx.output.kv("Requests", &snapshot.requests.total.to_string());
    ctx.output.kv("Cache hits", &snapshot.requests.cache_hits.to_string());
    ctx.output.kv(
        "Average response",
        &format_ms(snapshot.requests.average_response_ms),
    );
    Ok(())
}
