//! Evaluates registered HUNT patterns against components.

use std::collections::BTreeSet;

use serde_json::json;

use glyphhunt_core::{BoundingBox, Component, MatchStrategy, MatchingSettings, Relationship, Result};
use glyphhunt_grid::Grid;
use glyphhunt_lang::{Extraction, PatternMatch, PatternRegistry};

/// Property recording the name of the pattern that classified a component.
pub const MATCHED_PATTERN_PROPERTY: &str = "matched_pattern";

/// Property recording the confidence of the applied match.
pub const MATCH_CONFIDENCE_PROPERTY: &str = "match_confidence";

/// What a pattern sees of a component: boundary symbols and interior text.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ComponentView {
    /// Distinct characters on the boundary cells
    pub symbols: BTreeSet<char>,
    /// Interior text, row-major, rows trimmed and joined by `\n`
    pub text: String,
}

impl ComponentView {
    /// Read a component's boundary and interior from the grid.
    pub fn of(grid: &Grid, component: &Component) -> Self {
        Self {
            symbols: grid.symbols_at(component.boundary_cells().iter()),
            text: grid.text_at(&component.interior_cells()),
        }
    }
}

/// Matches component and relationship patterns.
#[derive(Debug, Clone, Copy, Default)]
pub struct PatternMatcher {
    strategy: MatchStrategy,
}

impl PatternMatcher {
    /// Matcher with an explicit strategy.
    pub fn new(strategy: MatchStrategy) -> Self {
        Self { strategy }
    }

    /// Matcher configured from settings.
    pub fn from_settings(settings: &MatchingSettings) -> Self {
        Self::new(settings.strategy)
    }

    /// Strategy used to order candidates.
    pub fn strategy(&self) -> MatchStrategy {
        self.strategy
    }

    /// Candidate matches for a component, best first.
    ///
    /// Fails if a pattern that gets as far as its pluck rules holds an
    /// expression that does not compile.
    pub fn match_component(
        &self,
        registry: &PatternRegistry,
        grid: &Grid,
        component: &Component,
    ) -> Result<Vec<PatternMatch>> {
        let view = ComponentView::of(grid, component);
        self.match_view(registry, &view)
    }

    /// Candidate matches for an already extracted view, best first.
    pub fn match_view(&self, registry: &PatternRegistry, view: &ComponentView) -> Result<Vec<PatternMatch>> {
        let mut candidates = Vec::new();
        for pattern in registry.get_all_component().values() {
            if let Some(found) = pattern.evaluate(&view.symbols, &view.text)? {
                candidates.push(found);
            }
        }
        if self.strategy == MatchStrategy::HighestConfidence {
            // Stable: equal confidence keeps registration order.
            candidates.sort_by(|a, b| b.confidence.total_cmp(&a.confidence));
        }
        Ok(candidates)
    }

    /// Values of standalone extraction patterns for a component.
    ///
    /// Extraction patterns that share a name with a component pattern are
    /// skipped: their plucks already ran as part of classification.
    pub fn extract(&self, registry: &PatternRegistry, view: &ComponentView) -> Result<Vec<(String, Extraction)>> {
        let mut values = Vec::new();
        for (name, pattern) in registry.get_all_extraction() {
            if registry.get_component(name).is_some() {
                continue;
            }
            values.extend(pattern.extract(&view.symbols, &view.text)?);
        }
        Ok(values)
    }

    /// Names of tracking patterns whose tag rules accept the component.
    pub fn tracks(&self, registry: &PatternRegistry, view: &ComponentView) -> Vec<String> {
        registry
            .get_all_tracking()
            .iter()
            .filter(|(_, pattern)| pattern.tracks(&view.symbols))
            .map(|(name, _)| name.clone())
            .collect()
    }

    /// Relationships produced by every link rule over every ordered pair.
    ///
    /// Order follows pattern registration, then rule declaration, then the
    /// source and target positions. Components without a box never relate;
    /// duplicate triples are dropped.
    pub fn match_relationships(&self, registry: &PatternRegistry, components: &[Component]) -> Vec<Relationship> {
        let boxed: Vec<(&Component, BoundingBox)> = components
            .iter()
            .filter_map(|c| c.effective_box().map(|b| (c, b)))
            .collect();

        let mut seen = BTreeSet::new();
        let mut relationships = Vec::new();
        for pattern in registry.get_all_relationship().values() {
            for link in &pattern.links {
                for (ai, (a, a_box)) in boxed.iter().enumerate() {
                    for (bi, (b, b_box)) in boxed.iter().enumerate() {
                        if ai == bi
                            || !link.relates(&a.component_type, a_box, &b.component_type, b_box)
                        {
                            continue;
                        }
                        let Some(relationship) = Relationship::new(a.id.clone(), b.id.clone(), link.kind.clone())
                        else {
                            continue;
                        };
                        if seen.insert(relationship.clone()) {
                            relationships.push(relationship);
                        }
                    }
                }
            }
        }
        relationships
    }
}

/// Apply a match: type, `is_<type>` marker, pattern name, confidence and extracted values.
pub fn apply_match(component: &mut Component, found: &PatternMatch) {
    component.component_type = found.component_type.clone();
    component.set_property(format!("is_{}", found.component_type), true);
    component.set_property(MATCHED_PATTERN_PROPERTY, found.pattern.clone());
    component.set_property(MATCH_CONFIDENCE_PROPERTY, json!(found.confidence));
    apply_extractions(component, &found.extracted);
}

/// Store extracted values (and their named captures) as properties.
pub fn apply_extractions(component: &mut Component, extracted: &[(String, Extraction)]) {
    for (target, extraction) in extracted {
        component.set_property(target.clone(), extraction.value.clone());
        for (name, value) in &extraction.captures {
            component.set_property(name.clone(), value.clone());
        }
    }
}
