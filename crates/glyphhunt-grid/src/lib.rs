//! # glyphhunt-grid
//!
//! Character grid for glyphhunt.
//!
//! This crate provides:
//! - `Grid`: immutable 2-D character buffer with bounds-checked reads
//! - `GridRegion`: clamped rectangular views into a grid
//! - `Parser`: VTE-based loader turning text or terminal captures into a grid
//!
//! ## Architecture
//!
//! This is Layer 1 in the architecture - it depends on glyphhunt-core
//! and is read by the pattern matcher and the component detectors.

#![warn(missing_docs)]
#![warn(clippy::all)]

pub mod grid;
pub mod parser;

// Re-export commonly used types
pub use grid::{Grid, GridRegion, BLANK};
pub use parser::Parser;
