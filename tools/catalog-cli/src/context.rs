//! CLI execution context.

use std::path::{Path, PathBuf};

use anyhow::{Context as _, Result};
use catalog_search::CatalogPayload;
use catalog_service::{CatalogConfig, SearchService};
use tracing::debug;

use crate::output::Output;

/// Execution context for CLI commands.
pub struct Context {
    /// Loaded configuration, environment overrides applied.
    pub config: CatalogConfig,
    /// Where the configuration came from, if a file was used.
    pub config_path: Option<PathBuf>,
    /// Output handler.
    pub output: Output,
    /// Working directory.
    pub cwd: PathBuf,
    /// The search service built from `config`.
    pub service: SearchService,
}

impl Context {
    /// Load config, build the service and import the seed catalog if given.
    pub async fn load(config_path: Option<&str>, seed: Option<&str>, output: Output) -> Result<Self> {
        let cwd = std::env::current_dir().context("Failed to get current directory")?;

        let config_path = match config_path {
            Some(path) => Some(resolve(&cwd, path)),
            None => CatalogConfig::find(&cwd),
        };
        let config = match &config_path {
            Some(path) => CatalogConfig::load(path)
                .with_context(|| format!("Failed to load config: {}", path.display()))?,
            None => CatalogConfig::default(),
        }
        .with_env();

        let service = SearchService::from_config(&config).context("Failed to start search service")?;

        if let Some(seed) = seed {
            let path = resolve(&cwd, seed);
            let payload = read_catalog(&path)?;
            let count = service.import_catalog(&payload).await?;
            debug!(count, path = %path.display(), "seeded catalog");
        }

        Ok(Self {
            config,
            config_path,
            output,
            cwd,
            service,
        })
    }

    /// Resolve a path relative to the working directory.
    pub fn resolve_path(&self, path: &str) -> PathBuf {
        resolve(&self.cwd, path)
    }
}

fn resolve(cwd: &Path, path: &str) -> PathBuf {
    if Path::new(path).is_absolute() {
        PathBuf::from(path)
    } else {
        cwd.join(path)
    }
}

/// Read and parse a catalog JSON document.
pub fn read_catalog(path: &Path) -> Result<CatalogPayload> {
    let content = std::fs::read_to_string(path)
        .with_context(|| format!("Failed to read catalog file: {}", path.display()))?;
    serde_json::from_str(&content)
        .with_context(|| format!("Failed to parse catalog file: {}", path.display()))
}
