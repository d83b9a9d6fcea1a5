// src/main.rs
use anyhow::{Context, Result};
use clap::Parser;
use std::io::Write;
use std::process;
use tracing::info;
use tracing_subscriber::EnvFilter;

use lb_check::{
    cli::Args,
    config::{self, Config},
    health::HealthChecker,
    inventory,
    report::{renderer_for, Renderer, ReportDriver},
};

#[tokio::main]
async fn main() -> Result<()> {
    let args = Args::parse();

    // Logs go to stderr so the report on stdout stays clean
    let filter = EnvFilter::try_from_default_env()
        .or_else(|_| EnvFilter::try_new(format!("lb_check={}", args.log_level)))?;
    tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_writer(std::io::stderr)
        .init();

    let mut config = match &args.config {
        Some(path) => {
            info!("Loading configuration from: {}", path.display());
            config::load_config(path).await?
        }
        None => Config::default(),
    };
    args.apply(&mut config);
    config.validate()?;

    let path = args.inventory_path();
    info!("Loading inventory from: {}", path.display());
    let rows = inventory::load_rows(&path).await?;

    let checker = HealthChecker::from_config(&config.probe)?;
    let report = ReportDriver::new(checker, config.probe.concurrency)
        .run(rows)
        .await;

    {
        let renderer: Box<dyn Renderer> = renderer_for(&config.output);
        let mut out = std::io::stdout().lock();
        renderer
            .render(&report, &mut out)
            .context("Failed to write report")?;
        out.flush()?;
    }

    let summary = report.summary();
    info!(
        "Check complete: {}/{} endpoints passing, {} rows skipped",
        summary.passing, summary.endpoints, summary.skipped_rows
    );

    if config.fail_on_unhealthy && !report.all_passing() {
        process::exit(2);
    }
    Ok(())
}
