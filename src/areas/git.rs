//! External git invocations
//!
//! Queries that need the object database or the full ref store are answered by
//! the `git` binary. Every invocation runs inside the working tree under a
//! timeout; a non-zero exit is turned into an error carrying git's stderr.

use anyhow::Context;
use derive_new::new;
use std::path::Path;
use std::process::Output;
use std::time::Duration;
use tokio::process::Command;
use tracing::{debug, warn};

/// Environment variable overriding the git binary
pub const GIT_BINARY_ENV: &str = "HEADREF_GIT";
/// Environment variable overriding the per-command timeout, in milliseconds
pub const GIT_TIMEOUT_ENV: &str = "HEADREF_GIT_TIMEOUT_MS";

const DEFAULT_GIT_BINARY: &str = "git";
const DEFAULT_GIT_TIMEOUT: Duration = Duration::from_secs(10);

/// How to run the git binary
#[derive(Debug, Clone, PartialEq, Eq, new)]
pub struct GitConfig {
    pub binary: String,
    pub timeout: Duration,
}

impl Default for GitConfig {
    fn default() -> Self {
        Self::new(DEFAULT_GIT_BINARY.to_string(), DEFAULT_GIT_TIMEOUT)
    }
}

impl GitConfig {
    /// Defaults overridden by `HEADREF_GIT` and `HEADREF_GIT_TIMEOUT_MS`
    pub fn from_env() -> anyhow::Result<Self> {
        let mut config = Self::default();

        if let Ok(binary) = std::env::var(GIT_BINARY_ENV)
            && !binary.trim().is_empty()
        {
            config.binary = binary;
        }

        if let Ok(timeout) = std::env::var(GIT_TIMEOUT_ENV) {
            let millis = timeout
                .trim()
                .parse::<u64>()
                .with_context(|| format!("invalid {GIT_TIMEOUT_ENV} value: {timeout:?}"))?;
            config.timeout = Duration::from_millis(millis);
        }

        Ok(config)
    }
}

/// Runs git commands in a working tree
#[derive(Debug, Clone, new)]
pub struct Git {
    work_tree: Box<Path>,
    config: GitConfig,
}

impl Git {
    pub fn work_tree(&self) -> &Path {
        &self.work_tree
    }

    /// Run `git <args>` and return its stdout
    pub async fn run(&self, args: &[&str]) -> anyhow::Result<Vec<u8>> {
        let output = self.output(args).await?;

        if !output.status.success() {
            let command_line = format!("git {}", args.join(" "));
            warn!(command = %command_line, status = %output.status, "git command failed");
            anyhow::bail!(
                "`{}` failed: {}",
                command_line,
                String::from_utf8_lossy(&output.stderr).trim()
            );
        }

        Ok(output.stdout)
    }

    /// Run `git <args>` and decode stdout as text
    pub async fn run_text(&self, args: &[&str]) -> anyhow::Result<String> {
        let stdout = self.run(args).await?;

        Ok(String::from_utf8_lossy(&stdout).into_owned())
    }

    /// Run a `-z` command and split its output on NUL
    pub async fn run_nul_separated(&self, args: &[&str]) -> anyhow::Result<Vec<String>> {
        let stdout = self.run(args).await?;

        Ok(split_nul(&stdout))
    }

    /// Value of a config key, `None` when the key is unset
    pub async fn config_value(&self, key: &str) -> anyhow::Result<Option<String>> {
        let output = self.output(&["config", "--get", key]).await?;

        // `git config --get` exits with 1 for a missing key
        match output.status.code() {
            Some(0) => {
                let value = String::from_utf8_lossy(&output.stdout).trim().to_string();
                Ok(Some(value).filter(|value| !value.is_empty()))
            }
            Some(1) => Ok(None),
            _ => anyhow::bail!(
                "`git config --get {}` failed: {}",
                key,
                String::from_utf8_lossy(&output.stderr).trim()
            ),
        }
    }

    async fn output(&self, args: &[&str]) -> anyhow::Result<Output> {
        let command_line = format!("git {}", args.join(" "));
        debug!(command = %command_line, "running git");

        tokio::time::timeout(
            self.config.timeout,
            Command::new(&self.config.binary)
                .args(args)
                .current_dir(&self.work_tree)
                .kill_on_drop(true)
                .output(),
        )
        .await
        .with_context(|| format!("`{command_line}` timed out"))?
        .with_context(|| format!("failed to run `{command_line}`"))
    }
}

/// Split NUL-terminated git output, dropping empty entries
pub fn split_nul(output: &[u8]) -> Vec<String> {
    output
        .split(|byte| *byte == b'\0')
        .filter(|entry| !entry.is_empty())
        .map(|entry| String::from_utf8_lossy(entry).into_owned())
        .collect()
}
