//! # glyphhunt-core
//!
//! Core types for glyphhunt.
//!
//! This crate contains all fundamental types with **no internal dependencies**
//! on other glyphhunt crates. It provides:
//!
//! - Geometry types (Point, BoundingBox)
//! - Component model (Component, Relationship, ComponentModel)
//! - Error types, stage tags and soft warnings (scents)
//! - Recognition configuration
//!
//! ## Architecture
//!
//! This is Layer 0 in the architecture - all other crates depend on this one,
//! but this crate has no dependencies on other glyphhunt crates.

#![warn(missing_docs)]
#![warn(clippy::all)]

pub mod component;
pub mod config;
pub mod error;
pub mod geometry;

// Re-export commonly used types
pub use component::{Component, ComponentModel, PropertyValue, Relationship, UNCLASSIFIED};
pub use config::{
    ContainmentSettings, GridSettings, IndexSettings, MatchStrategy, MatchingSettings,
    is_valid_type_name, RecognitionConfig, DEFAULT_CELL_SIZE, DEFAULT_COMPONENT_TYPES,
};
pub use error::{trap, Error, Result, Scent, Stage};
pub use geometry::{BoundingBox, Point};
