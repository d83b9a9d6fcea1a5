// src/config/models.rs
use anyhow::{bail, Result};
use serde::{Deserialize, Serialize};
use std::time::Duration;

#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default, deny_unknown_fields)]
pub struct Config {
    pub probe: ProbeConfig,
    pub output: OutputConfig,
    /// Exit non-zero when an endpoint isn't passing or a row was skipped.
    pub fail_on_unhealthy: bool,
}

impl Config {
    pub fn validate(&self) -> Result<()> {
        self.probe.validate()
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default, deny_unknown_fields)]
pub struct ProbeConfig {
    pub timeout_secs: u64,
    /// Skip the L7 probe once the L4 probe has failed.
    pub short_circuit: bool,
    /// Endpoint checks allowed in flight at once. 1 is fully sequential.
    pub concurrency: usize,
    pub user_agent: String,
}

impl Default for ProbeConfig {
    fn default() -> Self {
        Self {
            timeout_secs: 3,
            short_circuit: false,
            concurrency: 1,
            user_agent: format!("lb-check/{}", env!("CARGO_PKG_VERSION")),
        }
    }
}

impl ProbeConfig {
    pub fn timeout(&self) -> Duration {
        Duration::from_secs(self.timeout_secs)
    }

    fn validate(&self) -> Result<()> {
        if self.timeout_secs == 0 {
            bail!("probe.timeout_secs must be greater than 0");
        }
        if self.concurrency == 0 {
            bail!("probe.concurrency must be at least 1");
        }
        if self.user_agent.trim().is_empty() {
            bail!("probe.user_agent must not be empty");
        }
        Ok(())
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default, deny_unknown_fields)]
pub struct OutputConfig {
    pub format: OutputFormat,
    /// Repeat the frontend on every backend row and add the health-check
    /// columns.
    pub verbose: bool,
    pub color: bool,
}

impl Default for OutputConfig {
    fn default() -> Self {
        Self {
            format: OutputFormat::Table,
            verbose: false,
            color: true,
        }
    }
}

#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize, clap::ValueEnum)]
#[serde(rename_all = "lowercase")]
pub enum OutputFormat {
    #[default]
    Table,
    Json,
}
