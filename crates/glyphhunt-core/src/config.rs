//! Configuration types for glyphhunt.

use std::path::{Path, PathBuf};

use lazy_static::lazy_static;
use regex::Regex;
use serde::{Deserialize, Serialize};

use crate::{Error, Result};

lazy_static! {
    static ref TYPE_NAME: Regex =
        Regex::new(r"^[A-Za-z_][A-Za-z0-9_\-]*$").expect("type name regex is valid");
}

/// Check a component type name: a letter or `_`, then letters, digits, `_` or `-`.
pub fn is_valid_type_name(name: &str) -> bool {
    TYPE_NAME.is_match(name)
}

/// Default spatial index bucket size.
pub const DEFAULT_CELL_SIZE: usize = 5;

/// Component types a HUNT `tag` target may name out of the box.
pub const DEFAULT_COMPONENT_TYPES: &[&str] = &[
    "window",
    "dialog",
    "frame",
    "panel",
    "button",
    "checkbox",
    "radio",
    "text_field",
    "textbox",
    "input",
    "label",
    "menu",
    "list",
    "table",
    "progress_bar",
    "status_bar",
    "tab",
    "scrollbar",
];

/// Recognition configuration loaded from a YAML file.
#[derive(Debug, Clone, Serialize, Deserialize, Default)]
#[serde(default)]
pub struct RecognitionConfig {
    /// Log level (trace, debug, info, warn, error)
    pub log_level: Option<String>,
    /// HUNT files to load before every pass
    pub patterns: Vec<PathBuf>,
    /// Grid loading settings
    pub grid: GridSettings,
    /// Spatial index settings
    pub index: IndexSettings,
    /// Pattern matching settings
    pub matching: MatchingSettings,
    /// Containment analysis settings
    pub containment: ContainmentSettings,
}

impl RecognitionConfig {
    /// Load configuration from a YAML file.
    ///
    /// Relative pattern paths are resolved against the file's directory.
    pub fn from_file<P: AsRef<Path>>(path: P) -> Result<Self> {
        let path = path.as_ref();
        let content = std::fs::read_to_string(path)?;
        let mut config = Self::from_yaml(&content)?;
        if let Some(dir) = path.parent() {
            for pattern in &mut config.patterns {
                if pattern.is_relative() {
                    *pattern = dir.join(&*pattern);
                }
            }
        }
        Ok(config)
    }

    /// Parse configuration from YAML string.
    pub fn from_yaml(yaml: &str) -> Result<Self> {
        let config: RecognitionConfig = serde_yaml::from_str(yaml)?;
        config.validate()?;
        Ok(config)
    }

    /// Validate configuration values.
    pub fn validate(&self) -> Result<()> {
        if self.index.cell_size == 0 {
            return Err(Error::Config("index.cell_size must be >= 1".to_string()));
        }

        if self.grid.max_width == 0 || self.grid.max_height == 0 {
            return Err(Error::Config("grid limits must be > 0".to_string()));
        }

        if self.grid.tab_width == 0 {
            return Err(Error::Config("grid.tab_width must be > 0".to_string()));
        }

        if let Some(level) = &self.log_level {
            if !["trace", "debug", "info", "warn", "error"].contains(&level.as_str()) {
                return Err(Error::Config(format!("unknown log_level '{level}'")));
            }
        }

        for component_type in &self.matching.known_component_types {
            if !is_valid_type_name(component_type) {
                return Err(Error::Config(format!(
                    "invalid component type name '{component_type}'"
                )));
            }
        }

        Ok(())
    }
}

/// Grid loading settings.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct GridSettings {
    /// Widest grid the loader will build
    pub max_width: usize,
    /// Tallest grid the loader will build
    pub max_height: usize,
    /// Tab stop spacing
    pub tab_width: usize,
}

impl Default for GridSettings {
    fn default() -> Self {
        Self {
            max_width: 1000,
            max_height: 1000,
            tab_width: 8,
        }
    }
}

/// Spatial index settings.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct IndexSettings {
    /// Bucket edge length in cells
    pub cell_size: usize,
}

impl Default for IndexSettings {
    fn default() -> Self {
        Self {
            cell_size: DEFAULT_CELL_SIZE,
        }
    }
}

/// How competing component pattern matches are ordered.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum MatchStrategy {
    /// First registered matching pattern wins
    #[default]
    FirstRegistered,
    /// Highest confidence wins, ties broken by registration order
    HighestConfidence,
}

/// Pattern matching settings.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct MatchingSettings {
    /// Ordering of competing matches
    pub strategy: MatchStrategy,
    /// Tag targets that register component patterns
    pub known_component_types: Vec<String>,
}

impl Default for MatchingSettings {
    fn default() -> Self {
        Self {
            strategy: MatchStrategy::default(),
            known_component_types: DEFAULT_COMPONENT_TYPES
                .iter()
                .map(|t| t.to_string())
                .collect(),
        }
    }
}

/// Containment analysis settings.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct ContainmentSettings {
    /// Run the containment analyzer in the relationship stage
    pub enabled: bool,
    /// Keep only the tightest container of each component
    pub direct_children_only: bool,
}

impl Default for ContainmentSettings {
    fn default() -> Self {
        Self {
            enabled: true,
            direct_children_only: false,
        }
    }
}
