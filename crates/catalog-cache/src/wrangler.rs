//! Cloudflare KV access through the Wrangler CLI.

use std::time::Duration;

use async_trait::async_trait;
use tokio::process::Command;
use tracing::debug;

use crate::{ExternalStore, StoreError};

/// Store backed by a Cloudflare KV namespace, driven through `npx wrangler`.
#[derive(Debug, Clone)]
pub struct WranglerStore {
    namespace_id: String,
    remote: bool,
    program: String,
}

impl WranglerStore {
    /// Target the given KV namespace.
    pub fn new(namespace_id: impl Into<String>) -> Self {
        Self {
            namespace_id: namespace_id.into(),
            remote: true,
            program: "npx".to_string(),
        }
    }

    /// Talk to the local Wrangler simulator instead of the remote namespace.
    pub fn local(mut self) -> Self {
        self.remote = false;
        self
    }

    /// Override the launcher (default: `npx`).
    pub fn with_program(mut self, program: impl Into<String>) -> Self {
        self.program = program.into();
        self
    }

    /// The namespace this store writes to.
    pub fn namespace_id(&self) -> &str {
        &self.namespace_id
    }

    fn kv_args(&self, action: &str, key: &str) -> Vec<String> {
        let mut args = vec![
            "wrangler".to_string(),
            "kv".to_string(),
            "key".to_string(),
            action.to_string(),
            key.to_string(),
            format!("--namespace-id={}", self.namespace_id),
        ];
        if self.remote {
            args.push("--remote".to_string());
        }
        args
    }

    async fn run(&self, args: Vec<String>) -> Result<Vec<u8>, StoreError> {
        debug!(program = %self.program, args = ?args, "running wrangler");
        let output = Command::new(&self.program).args(&args).output().await?;
        if !output.status.success() {
            return Err(StoreError::Command {
                command: format!("{} {}", self.program, args.join(" ")),
                message: String::from_utf8_lossy(&output.stderr).trim().to_string(),
            });
        }
        Ok(output.stdout)
    }
}

#[async_trait]
impl ExternalStore for WranglerStore {
    async fn get(&self, key: &str) -> Result<Option<String>, StoreError> {
        let stdout = self.run(self.kv_args("get", key)).await?;
        let value = String::from_utf8(stdout).map_err(|_| StoreError::Encoding(key.to_string()))?;
        if value.is_empty() {
            Ok(None)
        } else {
            Ok(Some(value))
        }
    }

    async fn put(&self, key: &str, value: &str, ttl: Option<Duration>) -> Result<(), StoreError> {
        // Payloads can be far larger than a command line allows.
        let payload = tempfile::NamedTempFile::new()?;
        tokio::fs::write(payload.path(), value).await?;

        let mut args = self.kv_args("put", key);
        args.push(format!("--path={}", payload.path().display()));
        if let Some(ttl) = ttl {
            args.push(format!("--ttl={}", ttl.as_secs()));
        }
        self.run(args).await?;
        Ok(())
    }

    async fn delete(&self, key: &str) -> Result<(), StoreError> {
        self.run(self.kv_args("delete", key)).await?;
        Ok(())
    }

    fn name(&self) -> &'static str {
        "wrangler"
    }
}
