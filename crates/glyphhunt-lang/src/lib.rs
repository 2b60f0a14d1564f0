//! # glyphhunt-lang
//!
//! The HUNT pattern language for glyphhunt.
//!
//! This crate provides:
//! - `token`/`parser`: logos lexer and recursive-descent parser for HUNT sources
//! - `rules`: tag, pluck and link rule evaluation
//! - `PatternRegistry`: four ordered namespaces of named patterns
//! - `HuntInterpreter`: compiles sources and registers their patterns
//!
//! ```text
//! < hunt checkbox_rule: [INIT GATHER =
//!     {param tag:checkbox = (val "□", "■", "[ ]", "[X]")}
//! ] ><EXEC>
//! ```
//!
//! ## Architecture
//!
//! This is Layer 2 in the architecture - it depends on glyphhunt-core
//! only. Matching patterns against a grid lives in glyphhunt-detector.

#![warn(missing_docs)]
#![warn(clippy::all)]

pub mod ast;
pub mod interpreter;
pub mod parser;
pub mod pattern;
pub mod registry;
pub mod rules;
pub mod token;

// Re-export commonly used types
pub use ast::{HuntBlock, ParamDecl, RuleKind};
pub use interpreter::{HuntInterpreter, Interpretation};
pub use pattern::{
    ComponentPattern, ExtractionPattern, PatternMatch, RelationshipPattern, TrackingPattern,
};
pub use registry::PatternRegistry;
pub use rules::{Extraction, Geometry, LinkRule, PluckRule, Rule, TagRule, TypeFilter};
