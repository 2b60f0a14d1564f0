//! # glyphhunt-detector
//!
//! Recognition engine for glyphhunt.
//!
//! This crate provides:
//! - Uniform-grid spatial index over component bounding boxes
//! - Containment analysis deriving `contains` relationships
//! - Pattern matcher evaluating HUNT patterns against components
//! - Recognition processor running one load/match/relate/publish pass
//! - Upstream detection pipeline (frames, brackets) producing raw components
//!
//! ## Architecture
//!
//! This is Layer 3 in the architecture - it depends on glyphhunt-core,
//! glyphhunt-grid and glyphhunt-lang, and is driven by the `glyphhunt` binary.

#![warn(missing_docs)]
#![warn(clippy::all)]

pub mod containment;
pub mod detection;
pub mod detectors;
pub mod matcher;
pub mod processor;
pub mod spatial;

// Re-export commonly used types
pub use containment::{ContainmentAnalyzer, CHILDREN_PROPERTY, PARENT_PROPERTY};
pub use detection::{
    ComponentDetector, Confidence, DetectedComponent, DetectionContext, DetectionPipeline,
    RefIdGenerator,
};
pub use detectors::{BracketDetector, FrameDetector};
pub use matcher::{
    apply_extractions, apply_match, ComponentView, PatternMatcher, MATCHED_PATTERN_PROPERTY,
    MATCH_CONFIDENCE_PROPERTY,
};
pub use processor::{
    ClassificationOutcome, ClassificationResult, HuntRecognitionProcessor, RecognitionContext,
};
pub use spatial::SpatialIndex;
