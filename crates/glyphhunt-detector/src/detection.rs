//! Upstream component detection: traits, context and pipeline.

use std::collections::{BTreeSet, HashMap};
use std::sync::Arc;

use glyphhunt_core::{Component, Point};
use glyphhunt_grid::Grid;

/// Detection confidence level.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord)]
pub enum Confidence {
    /// Low confidence (<60% certain)
    Low,
    /// Medium confidence (60-90% certain)
    Medium,
    /// High confidence (>90% certain)
    High,
}

/// Raw detection result. The pipeline assigns the id.
#[derive(Debug, Clone, PartialEq)]
pub struct DetectedComponent {
    /// The detected component
    pub component: Component,
    /// Confidence level
    pub confidence: Confidence,
}

/// Context passed to each detector.
#[derive(Debug, Clone, Default)]
pub struct DetectionContext {
    /// Boundary cells already claimed by higher-priority detectors
    pub claimed_cells: BTreeSet<Point>,

    /// Reference ID counter
    pub ref_counter: RefIdGenerator,
}

impl DetectionContext {
    /// Create a new detection context.
    pub fn new() -> Self {
        Self::default()
    }

    /// Check if any of the cells is claimed.
    pub fn is_claimed<'a>(&self, cells: impl IntoIterator<Item = &'a Point>) -> bool {
        cells.into_iter().any(|p| self.claimed_cells.contains(p))
    }

    /// Claim cells (prevent other detectors from using them).
    pub fn claim<'a>(&mut self, cells: impl IntoIterator<Item = &'a Point>) {
        self.claimed_cells.extend(cells.into_iter().copied());
    }
}

/// Reference ID generator for components.
///
/// Generates unique IDs in the format `kind_counter` (e.g., "frame_1", "bracket_2").
#[derive(Debug, Clone, Default)]
pub struct RefIdGenerator {
    counters: HashMap<String, usize>,
}

impl RefIdGenerator {
    /// Create a new RefIdGenerator.
    pub fn new() -> Self {
        Self::default()
    }

    /// Generate the next ID for a given detector kind.
    ///
    /// # Example
    /// ```
    /// use glyphhunt_detector::detection::RefIdGenerator;
    ///
    /// let mut gen = RefIdGenerator::new();
    /// assert_eq!(gen.next("frame"), "frame_1");
    /// assert_eq!(gen.next("frame"), "frame_2");
    /// assert_eq!(gen.next("bracket"), "bracket_1");
    /// ```
    pub fn next(&mut self, kind: &str) -> String {
        let counter = self.counters.entry(kind.to_string()).or_insert(0);
        *counter += 1;
        format!("{kind}_{counter}")
    }

    /// Reset all counters.
    pub fn reset(&mut self) {
        self.counters.clear();
    }
}

/// Trait for component detectors.
pub trait ComponentDetector: Send + Sync {
    /// Detector name, also the id prefix of its components.
    fn name(&self) -> &'static str;

    /// Priority (higher = runs first, claims its boundary cells).
    ///
    /// Typical priorities:
    /// - 100: Structural components (frames)
    /// - 60: Inline widgets (brackets)
    fn priority(&self) -> u32;

    /// Detect components in the grid.
    fn detect(&self, grid: &Grid, context: &DetectionContext) -> Vec<DetectedComponent>;

    /// Whether this detector is enabled.
    fn enabled(&self) -> bool {
        true
    }
}

/// Detection pipeline that runs detectors in priority order.
#[derive(Default)]
pub struct DetectionPipeline {
    detectors: Vec<Arc<dyn ComponentDetector>>,
}

impl DetectionPipeline {
    /// Create an empty pipeline.
    pub fn new() -> Self {
        Self::default()
    }

    /// Pipeline with the built-in frame and bracket detectors.
    pub fn with_default_detectors() -> Self {
        let mut pipeline = Self::new();
        pipeline.add_detector(Arc::new(crate::detectors::FrameDetector::new()));
        pipeline.add_detector(Arc::new(crate::detectors::BracketDetector::new()));
        pipeline
    }

    /// Add a detector to the pipeline.
    pub fn add_detector(&mut self, detector: Arc<dyn ComponentDetector>) {
        self.detectors.push(detector);
        // Sort by priority (descending)
        self.detectors.sort_by_key(|d| std::cmp::Reverse(d.priority()));
    }

    /// Run all detectors on the grid.
    ///
    /// Components come back in detector priority order with ids assigned.
    pub fn detect(&self, grid: &Grid) -> Vec<Component> {
        let mut context = DetectionContext::new();
        let mut components = Vec::new();

        for detector in &self.detectors {
            if !detector.enabled() {
                continue;
            }

            let detected = detector.detect(grid, &context);
            tracing::debug!(detector = detector.name(), count = detected.len(), "detector finished");

            for DetectedComponent { mut component, .. } in detected {
                context.claim(component.boundary.iter());
                component.id = context.ref_counter.next(detector.name());
                components.push(component);
            }
        }

        components
    }
}
