//! The four pattern kinds stored in the registry.

use std::collections::BTreeSet;

use serde::Serialize;

use glyphhunt_core::Result;

use crate::rules::{Extraction, LinkRule, PluckRule, Rule, TagRule};

/// Every rule of a hunt block, kept under the block's name.
#[derive(Debug, Clone)]
pub struct TrackingPattern {
    /// Block name
    pub name: String,
    /// Rules in declaration order
    pub rules: Vec<Rule>,
    /// Source line of the block
    pub line: usize,
}

impl TrackingPattern {
    /// Tag rules of the block.
    pub fn tags(&self) -> impl Iterator<Item = &TagRule> {
        self.rules.iter().filter_map(|rule| match rule {
            Rule::Tag(tag) => Some(tag),
            _ => None,
        })
    }

    /// Whether the block's tag rules all accept a boundary.
    ///
    /// Blocks without tag rules track nothing.
    pub fn tracks(&self, symbols: &BTreeSet<char>) -> bool {
        let mut tags = self.tags().peekable();
        tags.peek().is_some() && tags.all(|tag| tag.score(symbols).is_some())
    }
}

/// Pluck rules of a block, optionally guarded by its tag rules.
#[derive(Debug, Clone)]
pub struct ExtractionPattern {
    /// Block name
    pub name: String,
    /// Tag rules a boundary must satisfy before extraction runs
    pub guards: Vec<TagRule>,
    /// Pluck rules in declaration order
    pub plucks: Vec<PluckRule>,
}

impl ExtractionPattern {
    /// Run every pluck rule whose guard passes.
    ///
    /// Returns `(target, extraction)` pairs for the rules that produced a
    /// value. A failing guard yields nothing.
    pub fn extract(&self, symbols: &BTreeSet<char>, text: &str) -> Result<Vec<(String, Extraction)>> {
        if !self.guards.iter().all(|tag| tag.score(symbols).is_some()) {
            return Ok(Vec::new());
        }
        let mut out = Vec::new();
        for pluck in &self.plucks {
            if let Some(extraction) = pluck.extract(text)? {
                out.push((pluck.target.clone(), extraction));
            }
        }
        Ok(out)
    }
}

/// Maps a component region to a component type.
#[derive(Debug, Clone)]
pub struct ComponentPattern {
    /// Block name
    pub name: String,
    /// Type assigned on a match
    pub component_type: String,
    /// Tag rules, all of which must accept the boundary
    pub tags: Vec<TagRule>,
    /// Pluck rules, all of which must extract a value
    pub plucks: Vec<PluckRule>,
}

/// Successful evaluation of a [`ComponentPattern`].
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct PatternMatch {
    /// Name of the matching pattern
    pub pattern: String,
    /// Type the pattern assigns
    pub component_type: String,
    /// Mean tag score, 1.0 without tag rules
    pub confidence: f64,
    /// `(target, extraction)` per pluck rule, in declaration order
    pub extracted: Vec<(String, Extraction)>,
}

impl ComponentPattern {
    /// Evaluate against a component's boundary symbols and interior text.
    ///
    /// `Ok(None)` means the pattern does not apply. Errors come from pluck
    /// expressions that do not compile.
    pub fn evaluate(&self, symbols: &BTreeSet<char>, text: &str) -> Result<Option<PatternMatch>> {
        let mut total = 0.0;
        for tag in &self.tags {
            match tag.score(symbols) {
                Some(score) => total += score,
                None => return Ok(None),
            }
        }
        let confidence = if self.tags.is_empty() {
            1.0
        } else {
            total / self.tags.len() as f64
        };

        let mut extracted = Vec::with_capacity(self.plucks.len());
        for pluck in &self.plucks {
            match pluck.extract(text)? {
                Some(extraction) => extracted.push((pluck.target.clone(), extraction)),
                None => return Ok(None),
            }
        }

        Ok(Some(PatternMatch {
            pattern: self.name.clone(),
            component_type: self.component_type.clone(),
            confidence,
            extracted,
        }))
    }
}

/// Link rules of a block.
#[derive(Debug, Clone)]
pub struct RelationshipPattern {
    /// Block name
    pub name: String,
    /// Link rules in declaration order
    pub links: Vec<LinkRule>,
}
