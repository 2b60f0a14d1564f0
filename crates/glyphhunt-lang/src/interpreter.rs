//! HUNT interpreter: compiles parsed blocks and registers their patterns.

use std::collections::BTreeSet;

use glyphhunt_core::{MatchingSettings, Result, Scent, Stage, DEFAULT_COMPONENT_TYPES};

use crate::ast::HuntBlock;
use crate::parser;
use crate::pattern::{ComponentPattern, ExtractionPattern, RelationshipPattern, TrackingPattern};
use crate::registry::PatternRegistry;
use crate::rules::Rule;

/// Outcome of interpreting one source.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct Interpretation {
    /// Block names registered, in source order
    pub registered: Vec<String>,
    /// Recoverable anomalies found while compiling
    pub scents: Vec<Scent>,
}

/// Patterns compiled from one block, registered together.
struct CompiledBlock {
    tracking: TrackingPattern,
    extraction: Option<ExtractionPattern>,
    component: Option<ComponentPattern>,
    relationship: Option<RelationshipPattern>,
}

/// Interprets HUNT sources into a [`PatternRegistry`].
#[derive(Debug, Clone)]
pub struct HuntInterpreter {
    known_types: BTreeSet<String>,
}

impl Default for HuntInterpreter {
    fn default() -> Self {
        Self::with_known_types(DEFAULT_COMPONENT_TYPES.iter().copied())
    }
}

impl HuntInterpreter {
    /// Interpreter recognizing the default component types.
    pub fn new() -> Self {
        Self::default()
    }

    /// Interpreter recognizing an explicit set of component types.
    pub fn with_known_types<I, S>(types: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        Self {
            known_types: types.into_iter().map(Into::into).collect(),
        }
    }

    /// Interpreter configured from matching settings.
    pub fn from_settings(settings: &MatchingSettings) -> Self {
        Self::with_known_types(settings.known_component_types.iter().cloned())
    }

    /// Whether a tag target registers a component pattern.
    pub fn is_known_type(&self, name: &str) -> bool {
        self.known_types.contains(name)
    }

    /// Parse `source` and register every block it contains.
    ///
    /// The whole source is parsed and compiled before anything is
    /// registered, so a syntax error leaves the registry untouched.
    /// Re-registering a block name replaces all of its earlier patterns,
    /// including kinds the new definition no longer produces.
    pub fn interpret(&self, source: &str, registry: &mut PatternRegistry) -> Result<Interpretation> {
        let blocks = parser::parse(source)?;

        let mut interpretation = Interpretation::default();
        let mut compiled = Vec::with_capacity(blocks.len());
        for block in &blocks {
            compiled.push(self.compile(block, &mut interpretation.scents)?);
        }

        for block in compiled {
            let name = block.tracking.name.clone();
            tracing::debug!(
                pattern = %name,
                component = block.component.as_ref().map(|c| c.component_type.as_str()),
                extraction = block.extraction.is_some(),
                relationship = block.relationship.is_some(),
                "registering hunt pattern"
            );

            match block.component {
                Some(pattern) => registry.register_component(name.clone(), pattern),
                None => {
                    registry.remove_component(&name);
                }
            }
            match block.extraction {
                Some(pattern) => registry.register_extraction(name.clone(), pattern),
                None => {
                    registry.remove_extraction(&name);
                }
            }
            match block.relationship {
                Some(pattern) => registry.register_relationship(name.clone(), pattern),
                None => {
                    registry.remove_relationship(&name);
                }
            }
            registry.register_tracking(name.clone(), block.tracking);
            interpretation.registered.push(name);
        }

        for scent in &interpretation.scents {
            tracing::warn!(%scent, "hunt source");
        }
        Ok(interpretation)
    }

    fn compile(&self, block: &HuntBlock, scents: &mut Vec<Scent>) -> Result<CompiledBlock> {
        let rules = block
            .gather
            .params
            .iter()
            .map(Rule::from_param)
            .collect::<Result<Vec<_>>>()?;

        let mut tags = Vec::new();
        let mut plucks = Vec::new();
        let mut links = Vec::new();
        for rule in &rules {
            match rule {
                Rule::Tag(tag) => tags.push(tag.clone()),
                Rule::Pluck(pluck) => plucks.push(pluck.clone()),
                Rule::Link(link) => links.push(link.clone()),
            }
        }

        for pluck in &plucks {
            for (expr, error) in pluck.invalid_expressions() {
                scents.push(Scent::new(
                    Stage::Load,
                    &block.name,
                    format!("pluck `{}` has an invalid regex `{expr}`: {error}", pluck.target),
                ));
            }
        }

        let component_type = match tags.first() {
            Some(first) if self.is_known_type(&first.target) => Some(first.target.clone()),
            _ => None,
        };
        for tag in &tags {
            if !self.is_known_type(&tag.target) {
                scents.push(Scent::new(
                    Stage::Load,
                    &block.name,
                    format!("tag target `{}` is not a known component type", tag.target),
                ));
            }
        }

        let component = component_type.map(|component_type| ComponentPattern {
            name: block.name.clone(),
            component_type,
            tags: tags.clone(),
            plucks: plucks.clone(),
        });
        let extraction = (!plucks.is_empty()).then(|| ExtractionPattern {
            name: block.name.clone(),
            guards: tags,
            plucks,
        });
        let relationship = (!links.is_empty()).then(|| RelationshipPattern {
            name: block.name.clone(),
            links,
        });

        Ok(CompiledBlock {
            tracking: TrackingPattern {
                name: block.name.clone(),
                rules,
                line: block.line,
            },
            extraction,
            component,
            relationship,
        })
    }
}
