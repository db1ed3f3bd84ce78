//! Catalog CLI - search the product catalog and manage its key-value store.
//!
//! Commands:
//! - `catalog search` - Run a cached search
//! - `catalog products` - Show the stored catalog
//! - `catalog kv` - Populate, clear or inspect the catalog key
//! - `catalog migrate` - Import a catalog file
//! - `catalog load-test` - Fire concurrent searches and report latency
//! - `catalog metrics` - Show service metrics

mod commands;
mod context;
mod output;

use anyhow::Result;
use clap::{Parser, Subcommand};
use tracing_subscriber::EnvFilter;

use commands::{KvArgs, LoadTestArgs, MigrateArgs, ProductsArgs, SearchArgs};

/// Catalog CLI - Search and manage the product catalog
#[derive(Parser)]
#[command(name = "catalog")]
#[command(author, version, about, long_about = None)]
#[command(propagate_version = true)]
struct Cli {
    /// Enable verbose output
    #[arg(short, long, global = true)]
    verbose: bool,

    /// Use JSON output format
    #[arg(long, global = true)]
    json: bool,

    /// Config file path
    #[arg(short, long, global = true)]
    config: Option<String>,

    /// Catalog file to import before running (memory backend)
    #[arg(long, global = true)]
    seed: Option<String>,

    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Search the catalog
    Search(SearchArgs),

    /// Show the stored catalog
    Products(ProductsArgs),

    /// Manage the catalog key in the store
    Kv(KvArgs),

    /// Import a catalog JSON file into the store
    Migrate(MigrateArgs),

    /// Run concurrent searches and report latency
    LoadTest(LoadTestArgs),

    /// Show service metrics
    Metrics,
}

fn init_tracing(verbose: bool) {
    let default_level = if verbose { "debug" } else { "info" };
    tracing_subscriber::fmt()
        .with_writer(std::io::stderr)
        .with_target(false)
        .with_env_filter(
            EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(default_level)),
        )
        .init();
}

#[tokio::main]
async fn main() -> Result<()> {
    let cli = Cli::parse();
    init_tracing(cli.verbose);

    let output = output::Output::new(cli.json);
    let ctx = match context::Context::load(cli.config.as_deref(), cli.seed.as_deref(), output.clone()).await {
        Ok(ctx) => ctx,
        Err(e) => {
            output.error(&format!("{:#}", e));
            std::process::exit(1);
        }
    };

    let result = match cli.command {
        Commands::Search(args) => commands::search::run(args, &ctx).await,
        Commands::Products(args) => commands::products::run(args, &ctx).await,
        Commands::Kv(args) => commands::kv::run(args, &ctx).await,
        Commands::Migrate(args) => commands::migrate::run(args, &ctx).await,
        Commands::LoadTest(args) => commands::load_test::run(args, &ctx).await,
        Commands::Metrics => commands::metrics::run(&ctx).await,
    };

    ctx.service.shutdown();

    if let Err(e) = result {
        ctx.output.error(&format!("{:#}", e));
        std::process::exit(1);
    }

    Ok(())
}
