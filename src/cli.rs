// src/cli.rs
use crate::config::{Config, OutputFormat};
use clap::Parser;
use std::path::PathBuf;

#[derive(Parser, Debug)]
#[command(name = "lb-check")]
#[command(about = "Check that load balancer frontends and backends answer on L4 and L7")]
#[command(version)]
pub struct Args {
    /// Pipe-delimited inventory file (defaults to lb.csv next to the binary)
    #[arg(short = 'f', long = "file", env = "LBCHECK_FILE", value_name = "FILE")]
    pub file: Option<PathBuf>,

    /// Print every column on every row
    #[arg(short, long)]
    pub verbose: bool,

    /// YAML or JSON configuration file
    #[arg(short, long, env = "LBCHECK_CONFIG", value_name = "FILE")]
    pub config: Option<PathBuf>,

    /// Per-probe timeout in seconds
    #[arg(long, env = "LBCHECK_TIMEOUT", value_name = "SECS")]
    pub timeout: Option<u64>,

    /// Endpoint checks to run at once
    #[arg(long, env = "LBCHECK_CONCURRENCY", value_name = "N")]
    pub concurrency: Option<usize>,

    /// Skip the HTTP probe for endpoints that refuse TCP connections
    #[arg(long)]
    pub short_circuit: bool,

    /// Output format
    #[arg(long, value_enum, env = "LBCHECK_FORMAT")]
    pub format: Option<OutputFormat>,

    /// Disable ANSI colors
    #[arg(long)]
    pub no_color: bool,

    /// Exit with status 2 if any endpoint isn't passing or any inventory row was skipped
    #[arg(long)]
    pub fail_on_unhealthy: bool,

    /// Log level used when RUST_LOG is not set
    #[arg(long, default_value = "warn", value_name = "LEVEL")]
    pub log_level: String,
}

impl Args {
    /// Flags given on the command line win over the configuration file.
    pub fn apply(&self, config: &mut Config) {
        if let Some(timeout) = self.timeout {
            config.probe.timeout_secs = timeout;
        }
        if let Some(concurrency) = self.concurrency {
            config.probe.concurrency = concurrency;
        }
        if let Some(format) = self.format {
            config.output.format = format;
        }
        config.probe.short_circuit |= self.short_circuit;
        config.output.verbose |= self.verbose;
        config.fail_on_unhealthy |= self.fail_on_unhealthy;
        if self.no_color {
            config.output.color = false;
        }
    }

    pub fn inventory_path(&self) -> PathBuf {
        self.file.clone().unwrap_or_else(default_inventory_path)
    }
}

/// `lb.csv` in the directory holding the executable.
fn default_inventory_path() -> PathBuf {
    std::env::current_exe()
        .ok()
        .and_then(|exe| exe.parent().map(|dir| dir.join("lb.csv")))
        .unwrap_or_else(|| PathBuf::from("lb.csv"))
}
