//! # glyphhunt
//!
//! Recognize UI components in ASCII art and terminal captures.
//!
//! ## Overview
//!
//! The command loads a grid file, detects frames and bracketed widgets,
//! classifies them with HUNT patterns and prints a JSON report.
//!
//! ## Architecture
//!
//! This is Layer 4 - the binary that ties together:
//! - glyphhunt-core: Core types and configuration
//! - glyphhunt-grid: Grid loading
//! - glyphhunt-detector: Detection and the recognition pass

use clap::Parser;
use glyphhunt::CliOptions;

fn main() -> anyhow::Result<()> {
    let options = CliOptions::parse();
    let config = options.load_config()?;

    // Initialize logging on stderr, leaving stdout to the report
    let level = config.log_level.clone().unwrap_or_else(|| "info".to_string());
    tracing_subscriber::fmt()
        .with_env_filter(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| tracing_subscriber::EnvFilter::new(level)),
        )
        .with_writer(std::io::stderr)
        .init();

    tracing::info!("glyphhunt v{} starting", env!("CARGO_PKG_VERSION"));

    let report = glyphhunt::run(&options, &config).map_err(|e| {
        tracing::error!("recognition failed: {e:#}");
        e
    })?;

    println!("{}", serde_json::to_string_pretty(&report)?);
    Ok(())
}
