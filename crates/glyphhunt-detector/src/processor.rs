//! One recognition pass: load patterns, classify components, relate them, publish.

use std::collections::BTreeMap;
use std::time::Instant;

use serde::{Deserialize, Serialize};

use glyphhunt_core::{
    trap, Component, ComponentModel, Error, RecognitionConfig, Relationship, Result, Scent, Stage,
};
use glyphhunt_grid::Grid;
use glyphhunt_lang::{HuntInterpreter, PatternMatch, PatternRegistry};

use crate::containment::ContainmentAnalyzer;
use crate::matcher::{apply_extractions, apply_match, ComponentView, PatternMatcher};

/// Inputs and outputs of a recognition pass.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct RecognitionContext {
    /// Components to classify; replaced with the classified list
    #[serde(default)]
    pub components: Option<Vec<Component>>,
    /// HUNT sources loaded at the start of every pass, in order
    #[serde(default)]
    pub hunt_patterns: Vec<String>,
    /// Grid used when `process` is not given one
    #[serde(skip)]
    pub grid: Option<Grid>,
    /// Relationships found by the last pass
    #[serde(default)]
    pub relationships: Vec<Relationship>,
    /// One entry per component of the last pass
    #[serde(default)]
    pub component_classification_results: Vec<ClassificationResult>,
    /// Soft warnings of the last pass
    #[serde(default)]
    pub scents: Vec<Scent>,
    /// Open slot for downstream markers
    #[serde(default)]
    pub extra: BTreeMap<String, serde_json::Value>,
}

impl RecognitionContext {
    /// Context holding a component list.
    pub fn new(components: Vec<Component>) -> Self {
        Self {
            components: Some(components),
            ..Self::default()
        }
    }

    /// Builder: append a HUNT source.
    pub fn with_hunt_pattern(mut self, source: impl Into<String>) -> Self {
        self.hunt_patterns.push(source.into());
        self
    }

    /// Builder: attach a grid.
    pub fn with_grid(mut self, grid: Grid) -> Self {
        self.grid = Some(grid);
        self
    }
}

/// Classification outcome of one component.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(tag = "outcome", rename_all = "snake_case")]
pub enum ClassificationOutcome {
    /// A component pattern matched and was applied
    Matched {
        /// Pattern applied
        pattern: String,
        /// Type assigned
        component_type: String,
        /// Confidence of the applied match
        confidence: f64,
    },
    /// No component pattern matched
    Unmatched,
    /// Matching failed for this component only
    Failed {
        /// Error description
        message: String,
    },
}

/// Per-component record of the match stage.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ClassificationResult {
    /// Component id
    pub component_id: String,
    /// What happened
    #[serde(flatten)]
    pub outcome: ClassificationOutcome,
    /// Tracking patterns whose tag rules accepted the component
    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    pub tracks: Vec<String>,
}

impl ClassificationResult {
    /// Whether a pattern was applied.
    pub fn is_matched(&self) -> bool {
        matches!(self.outcome, ClassificationOutcome::Matched { .. })
    }
}

/// Drives recognition passes against a session-owned pattern registry.
#[derive(Debug, Clone)]
pub struct HuntRecognitionProcessor {
    registry: PatternRegistry,
    interpreter: HuntInterpreter,
    matcher: PatternMatcher,
    containment: Option<ContainmentAnalyzer>,
}

impl Default for HuntRecognitionProcessor {
    fn default() -> Self {
        Self {
            registry: PatternRegistry::new(),
            interpreter: HuntInterpreter::new(),
            matcher: PatternMatcher::default(),
            containment: Some(ContainmentAnalyzer::default()),
        }
    }
}

impl HuntRecognitionProcessor {
    /// Processor with default settings and an empty registry.
    pub fn new() -> Self {
        Self::default()
    }

    /// Processor configured from a validated config.
    pub fn from_config(config: &RecognitionConfig) -> Result<Self> {
        config.validate()?;
        let containment = if config.containment.enabled {
            Some(ContainmentAnalyzer::from_settings(&config.containment, &config.index)?)
        } else {
            None
        };
        Ok(Self {
            registry: PatternRegistry::new(),
            interpreter: HuntInterpreter::from_settings(&config.matching),
            matcher: PatternMatcher::from_settings(&config.matching),
            containment,
        })
    }

    /// Registry shared by every pass of this processor.
    pub fn registry(&self) -> &PatternRegistry {
        &self.registry
    }

    /// Mutable registry, for registering patterns directly.
    pub fn registry_mut(&mut self) -> &mut PatternRegistry {
        &mut self.registry
    }

    /// Run one pass.
    ///
    /// The grid is `grid_data`, else `context.grid`. Loading a bad HUNT
    /// source, a missing grid and a missing component list abort the pass
    /// with an [`Error::Stage`] naming the failing stage. Failures of single
    /// components are recorded in the context and do not abort.
    pub fn process(
        &mut self,
        grid_data: Option<&Grid>,
        context: &mut RecognitionContext,
    ) -> Result<Vec<Component>> {
        let started = Instant::now();

        let mut scents = self.load(&context.hunt_patterns).map_err(|e| e.in_stage(Stage::Load))?;
        tracing::debug!(elapsed = ?started.elapsed(), patterns = self.registry.len(), "load stage done");

        let grid = grid_data.or(context.grid.as_ref()).ok_or_else(|| {
            Error::Validation("no grid supplied to the pass or the context".to_string())
                .in_stage(Stage::MatchComponents)
        })?;
        let components = take_components(&mut context.components, grid)
            .map_err(|e| e.in_stage(Stage::MatchComponents))?;
        let expected = components.len();

        let (components, results) = self.match_components(grid, components, &mut scents);
        tracing::debug!(elapsed = ?started.elapsed(), "match_components stage done");

        let (components, relationships) = self.match_relationships(components);
        tracing::debug!(elapsed = ?started.elapsed(), "match_relationships stage done");

        trap(
            components.len() == expected,
            format!("pass produced {} components from {expected}", components.len()),
        )
        .map_err(|e| e.in_stage(Stage::Publish))?;

        let matched = results.iter().filter(|r| r.is_matched()).count();
        tracing::info!(
            components = components.len(),
            matched,
            relationships = relationships.len(),
            scents = scents.len(),
            elapsed = ?started.elapsed(),
            "recognition pass complete"
        );

        context.components = Some(components.clone());
        context.relationships = relationships;
        context.component_classification_results = results;
        context.scents = scents;
        Ok(components)
    }

    /// Interpret every source into a staged copy of the registry. The copy
    /// replaces the live registry only once all sources have loaded.
    fn load(&mut self, sources: &[String]) -> Result<Vec<Scent>> {
        if sources.is_empty() {
            return Ok(Vec::new());
        }
        let mut staged = self.registry.clone();
        let mut scents = Vec::new();
        for source in sources {
            let interpretation = self.interpreter.interpret(source, &mut staged)?;
            tracing::debug!(registered = ?interpretation.registered, "hunt source loaded");
            scents.extend(interpretation.scents);
        }
        self.registry = staged;
        Ok(scents)
    }

    fn match_components(
        &self,
        grid: &Grid,
        components: Vec<Component>,
        scents: &mut Vec<Scent>,
    ) -> (Vec<Component>, Vec<ClassificationResult>) {
        let mut results = Vec::with_capacity(components.len());
        let mut classified = Vec::with_capacity(components.len());

        for mut component in components {
            let view = ComponentView::of(grid, &component);
            let tracks = self.matcher.tracks(&self.registry, &view);
            let outcome = match self.classify(&mut component, &view) {
                Ok(Some(found)) => {
                    tracing::debug!(
                        id = %component.id,
                        pattern = %found.pattern,
                        component_type = %found.component_type,
                        confidence = found.confidence,
                        "component matched"
                    );
                    ClassificationOutcome::Matched {
                        pattern: found.pattern,
                        component_type: found.component_type,
                        confidence: found.confidence,
                    }
                }
                Ok(None) => {
                    tracing::debug!(id = %component.id, "component unmatched");
                    ClassificationOutcome::Unmatched
                }
                Err(e) => {
                    let scent = Scent::new(Stage::MatchComponents, &component.id, e.to_string());
                    tracing::warn!(%scent, "component match failed");
                    scents.push(scent);
                    ClassificationOutcome::Failed {
                        message: e.to_string(),
                    }
                }
            };
            results.push(ClassificationResult {
                component_id: component.id.clone(),
                outcome,
                tracks,
            });
            classified.push(component);
        }
        (classified, results)
    }

    /// Best candidate plus standalone extractions. Nothing is applied on error.
    fn classify(&self, component: &mut Component, view: &ComponentView) -> Result<Option<PatternMatch>> {
        let candidates = self.matcher.match_view(&self.registry, view)?;
        let extracted = self.matcher.extract(&self.registry, view)?;
        let best = candidates.into_iter().next();
        if let Some(found) = &best {
            apply_match(component, found);
        }
        apply_extractions(component, &extracted);
        Ok(best)
    }

    fn match_relationships(&self, components: Vec<Component>) -> (Vec<Component>, Vec<Relationship>) {
        let relationships = self.matcher.match_relationships(&self.registry, &components);
        let model = ComponentModel {
            components,
            relationships,
        };
        let model = match &self.containment {
            Some(analyzer) => analyzer.analyze(model),
            None => model,
        };
        (model.components, model.relationships)
    }
}

/// Move the component list out of the context after validating it.
///
/// On error the list is left in the context.
fn take_components(slot: &mut Option<Vec<Component>>, grid: &Grid) -> Result<Vec<Component>> {
    let Some(components) = slot.take() else {
        return Err(Error::Validation("context has no component list".to_string()));
    };
    let model = ComponentModel::new(components);
    match validate_components(&model, grid) {
        Ok(()) => Ok(model.components),
        Err(e) => {
            *slot = Some(model.components);
            Err(e)
        }
    }
}

fn validate_components(model: &ComponentModel, grid: &Grid) -> Result<()> {
    let duplicates = model.duplicate_ids();
    if !duplicates.is_empty() {
        return Err(Error::Validation(format!(
            "duplicate component ids: {}",
            duplicates.join(", ")
        )));
    }

    let bounds = grid.bounds();
    for component in &model.components {
        let boxes = [component.bounding_box, component.refined_bounding_box];
        for bbox in boxes.into_iter().flatten() {
            let inside = bounds.is_some_and(|b| b.strictly_contains(&bbox, 0));
            if !inside {
                return Err(Error::Validation(format!(
                    "component {} box {bbox:?} lies outside the {}x{} grid",
                    component.id,
                    grid.width(),
                    grid.height()
                )));
            }
        }
    }
    Ok(())
}
