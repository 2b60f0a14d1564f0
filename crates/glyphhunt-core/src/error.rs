//! Error types for glyphhunt.
//!
//! Three severities exist in a recognition pass:
//!
//! - [`Scent`]: a recoverable anomaly that is recorded and the pass goes on.
//! - [`Error::Snare`]: a critical failure that aborts the current pass.
//! - [`trap`]: a guarded check that becomes a snare when its condition fails.

use std::fmt;

use serde::{Deserialize, Serialize};
use thiserror::Error;

/// Stages of a recognition pass, used to tag errors and warnings.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Stage {
    /// Interpreting HUNT sources into the registry
    Load,
    /// Matching component patterns
    MatchComponents,
    /// Matching relationship patterns and containment
    MatchRelationships,
    /// Writing results back into the context
    Publish,
}

impl Stage {
    /// Stage name as shown to users.
    pub fn as_str(&self) -> &'static str {
        match self {
            Stage::Load => "load",
            Stage::MatchComponents => "match_components",
            Stage::MatchRelationships => "match_relationships",
            Stage::Publish => "publish",
        }
    }
}

impl fmt::Display for Stage {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Main error type for glyphhunt operations.
#[derive(Debug, Error)]
pub enum Error {
    /// Malformed HUNT source
    #[error("Syntax error at {line}:{column}: {message}")]
    Syntax {
        /// 1-based line of the offending token
        line: usize,
        /// 1-based column of the offending token
        column: usize,
        /// What was expected or found
        message: String,
    },

    /// Missing or ill-typed input
    #[error("Validation error: {0}")]
    Validation(String),

    /// Invalid registry, index or file configuration
    #[error("Configuration error: {0}")]
    Config(String),

    /// A rule expression that cannot be evaluated (e.g. a bad regex)
    #[error("Invalid pattern: {0}")]
    InvalidPattern(String),

    /// Critical failure that aborts the pass
    #[error("Snare: {0}")]
    Snare(String),

    /// Failure inside a named recognition stage
    #[error("{stage} stage failed: {source}")]
    Stage {
        /// Stage in which the error originated
        stage: Stage,
        /// Underlying error
        #[source]
        source: Box<Error>,
    },

    /// IO error
    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),

    /// Serialization/deserialization errors
    #[error("Serialization error: {0}")]
    Serialization(#[from] serde_json::Error),

    /// YAML configuration errors
    #[error("YAML error: {0}")]
    Yaml(#[from] serde_yaml::Error),

    /// Generic error with custom message
    #[error("{0}")]
    Other(String),
}

impl Error {
    /// Wrap this error with the stage it came from.
    ///
    /// Errors already carrying a stage are returned unchanged.
    pub fn in_stage(self, stage: Stage) -> Self {
        match self {
            Error::Stage { .. } => self,
            other => Error::Stage {
                stage,
                source: Box::new(other),
            },
        }
    }

    /// Stage this error originated in, if known.
    pub fn stage(&self) -> Option<Stage> {
        match self {
            Error::Stage { stage, .. } => Some(*stage),
            _ => None,
        }
    }

    /// Innermost error, stripped of stage wrappers.
    pub fn root(&self) -> &Error {
        match self {
            Error::Stage { source, .. } => source.root(),
            other => other,
        }
    }

    /// Whether this is (or wraps) a HUNT syntax error.
    pub fn is_syntax(&self) -> bool {
        matches!(self.root(), Error::Syntax { .. })
    }

    /// Whether this is (or wraps) an input validation error.
    pub fn is_validation(&self) -> bool {
        matches!(self.root(), Error::Validation(_))
    }
}

/// Result type alias using our Error type.
pub type Result<T> = std::result::Result<T, Error>;

/// Turn a failed guard into a snare.
pub fn trap(condition: bool, message: impl Into<String>) -> Result<()> {
    if condition {
        Ok(())
    } else {
        Err(Error::Snare(message.into()))
    }
}

/// Recoverable anomaly recorded during a pass.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Scent {
    /// Stage that noticed the anomaly
    pub stage: Stage,
    /// Pattern name or component id the warning is about
    pub subject: String,
    /// Human-readable description
    pub message: String,
}

impl Scent {
    /// Create a new scent.
    pub fn new(stage: Stage, subject: impl Into<String>, message: impl Into<String>) -> Self {
        Self {
            stage,
            subject: subject.into(),
            message: message.into(),
        }
    }
}

impl fmt::Display for Scent {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "[{}] {}: {}", self.stage, self.subject, self.message)
    }
}
