//! CLI command implementations.

pub mod kv;
pub mod metrics;
pub mod migrate;
pub mod products;
pub mod search;

use catalog_search::{ScoringStrategy, SortBy};
use clap::{Args, Subcommand};

/// Arguments for the search command.
#[derive(Args)]
pub struct SearchArgs {
    /// Search terms.
    #[arg(required = true, num_args = 1..)]
    pub query: Vec<String>,

    /// Page number (1-based).
    #[arg(short, long, default_value_t = 1)]
    pub page: u32,

    /// Results per page (default from config).
    #[arg(long)]
    pub page_size: Option<u32>,

    /// Sort order: relevance, description-asc, manufacturer-asc, has-image.
    #[arg(short, long, default_value_t = SortBy::Relevance)]
    pub sort: SortBy,

    /// Scoring strategy: substring (cached) or weighted (indexed).
    #[arg(long, default_value_t = ScoringStrategy::Substring)]
    pub strategy: ScoringStrategy,
}

/// Arguments for the products command.
#[derive(Args)]
pub struct ProductsArgs {
    /// Show only the first N products.
    #[arg(short, long)]
    pub limit: Option<usize>,
}

/// Arguments for the kv command.
#[derive(Args)]
pub struct KvArgs {
    #[command(subcommand)]
    pub command: KvCommand,
}

#[derive(Subcommand)]
pub enum KvCommand {
    /// Write the sample catalog.
    Populate,
    /// Delete the stored catalog.
    Clear {
        /// Skip confirmation.
        #[arg(short, long)]
        yes: bool,
    },
    /// Report whether a catalog is stored.
    Status,
}

/// Arguments for the migrate command.
#[derive(Args)]
pub struct MigrateArgs {
    /// Catalog JSON file (`{"response": {"data": [...]}}`).
    pub file: String,

    /// Validate the file without writing it.
    #[arg(long)]
    pub dry_run: bool,
}

/// Arguments for the load-test command.
#[derive(Args)]
pub struct LoadTestArgs {
    /// Total number of searches.
    #[arg(short = 'n', long, default_value_t = 100)]
    pub requests: usize,

    /// Searches in flight per batch.
    #[arg(short = 'j', long, default_value_t = 10)]
    pub concurrency: usize,

    /// Query to search for.
    #[arg(short, long, default_value = "sample")]
    pub query: String,

    /// Per-request timeout in milliseconds.
    #[arg(long, default_value_t = 5000)]
    pub timeout_ms: u64,
}
