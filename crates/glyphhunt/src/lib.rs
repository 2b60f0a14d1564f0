//! glyphhunt command line library
//!
//! Argument handling, file loading and the JSON report. The binary in
//! main.rs only installs logging and prints the report.

use std::path::{Path, PathBuf};

use anyhow::Context;
use serde::Serialize;

use glyphhunt_core::{Component, RecognitionConfig, Relationship, Scent};
use glyphhunt_detector::{
    ClassificationResult, DetectionPipeline, HuntRecognitionProcessor, RecognitionContext,
};
use glyphhunt_grid::{Grid, Parser};

/// Recognize UI components in ASCII art and terminal captures.
#[derive(Debug, Clone, PartialEq, Eq, Default, clap::Parser)]
#[command(name = "glyphhunt", version, about, long_about = None)]
pub struct CliOptions {
    /// Text or terminal capture to recognize
    #[arg(value_name = "GRID")]
    pub grid_path: PathBuf,
    /// HUNT sources, loaded after the ones named in the config
    #[arg(value_name = "HUNT")]
    pub hunt_paths: Vec<PathBuf>,
    /// Optional YAML configuration
    #[arg(short, long = "config", value_name = "YAML")]
    pub config_path: Option<PathBuf>,
}

impl CliOptions {
    /// Load the configuration file, or defaults when none was given.
    pub fn load_config(&self) -> anyhow::Result<RecognitionConfig> {
        match &self.config_path {
            Some(path) => RecognitionConfig::from_file(path)
                .with_context(|| format!("loading config {}", path.display())),
            None => Ok(RecognitionConfig::default()),
        }
    }
}

/// Grid dimensions in the report.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub struct GridSize {
    /// Columns
    pub width: usize,
    /// Rows
    pub height: usize,
}

/// Everything one recognition run produced.
#[derive(Debug, Clone, Serialize)]
pub struct RecognitionReport {
    /// RFC 3339 timestamp of the run
    pub generated_at: String,
    /// Size of the loaded grid
    pub grid: GridSize,
    /// Classified components
    pub components: Vec<Component>,
    /// Pattern and containment relationships
    pub relationships: Vec<Relationship>,
    /// Per-component outcome
    pub classification: Vec<ClassificationResult>,
    /// Soft warnings
    pub scents: Vec<Scent>,
}

/// Detect, classify and relate the components of a grid.
pub fn recognize(
    grid: &Grid,
    hunt_sources: Vec<String>,
    config: &RecognitionConfig,
) -> anyhow::Result<RecognitionReport> {
    let components = DetectionPipeline::with_default_detectors().detect(grid);
    tracing::debug!(count = components.len(), "components detected");

    let mut processor = HuntRecognitionProcessor::from_config(config)?;
    let mut context = RecognitionContext::new(components);
    context.hunt_patterns = hunt_sources;
    let components = processor.process(Some(grid), &mut context)?;

    Ok(RecognitionReport {
        generated_at: chrono::Utc::now().to_rfc3339(),
        grid: GridSize {
            width: grid.width(),
            height: grid.height(),
        },
        components,
        relationships: context.relationships,
        classification: context.component_classification_results,
        scents: context.scents,
    })
}

/// Run the whole command: load files, recognize, return the report.
pub fn run(options: &CliOptions, config: &RecognitionConfig) -> anyhow::Result<RecognitionReport> {
    let bytes = std::fs::read(&options.grid_path)
        .with_context(|| format!("reading grid {}", options.grid_path.display()))?;
    let grid = Parser::parse(&bytes, config.grid.clone());
    tracing::info!(
        path = %options.grid_path.display(),
        width = grid.width(),
        height = grid.height(),
        "grid loaded"
    );

    let hunt_sources = config
        .patterns
        .iter()
        .chain(&options.hunt_paths)
        .map(|path| read_source(path))
        .collect::<anyhow::Result<Vec<_>>>()?;

    recognize(&grid, hunt_sources, config)
}

fn read_source(path: &Path) -> anyhow::Result<String> {
    std::fs::read_to_string(path).with_context(|| format!("reading hunt file {}", path.display()))
}
