//! Named pattern store with four independent namespaces.

use indexmap::IndexMap;

use crate::pattern::{ComponentPattern, ExtractionPattern, RelationshipPattern, TrackingPattern};

/// Pattern registry owned by one recognition session.
///
/// Each namespace iterates in registration order. Registering an existing
/// name replaces the pattern but keeps its original position.
#[derive(Debug, Clone, Default)]
pub struct PatternRegistry {
    tracking: IndexMap<String, TrackingPattern>,
    extraction: IndexMap<String, ExtractionPattern>,
    component: IndexMap<String, ComponentPattern>,
    relationship: IndexMap<String, RelationshipPattern>,
}

impl PatternRegistry {
    /// Create an empty registry.
    pub fn new() -> Self {
        Self::default()
    }

    /// Register a tracking pattern, replacing any previous one of that name.
    pub fn register_tracking(&mut self, name: impl Into<String>, pattern: TrackingPattern) {
        self.tracking.insert(name.into(), pattern);
    }

    /// Register an extraction pattern, replacing any previous one of that name.
    pub fn register_extraction(&mut self, name: impl Into<String>, pattern: ExtractionPattern) {
        self.extraction.insert(name.into(), pattern);
    }

    /// Register a component pattern, replacing any previous one of that name.
    pub fn register_component(&mut self, name: impl Into<String>, pattern: ComponentPattern) {
        self.component.insert(name.into(), pattern);
    }

    /// Register a relationship pattern, replacing any previous one of that name.
    pub fn register_relationship(&mut self, name: impl Into<String>, pattern: RelationshipPattern) {
        self.relationship.insert(name.into(), pattern);
    }

    /// Look up a tracking pattern.
    pub fn get_tracking(&self, name: &str) -> Option<&TrackingPattern> {
        self.tracking.get(name)
    }

    /// Look up an extraction pattern.
    pub fn get_extraction(&self, name: &str) -> Option<&ExtractionPattern> {
        self.extraction.get(name)
    }

    /// Look up a component pattern.
    pub fn get_component(&self, name: &str) -> Option<&ComponentPattern> {
        self.component.get(name)
    }

    /// Look up a relationship pattern.
    pub fn get_relationship(&self, name: &str) -> Option<&RelationshipPattern> {
        self.relationship.get(name)
    }

    /// All tracking patterns in registration order.
    pub fn get_all_tracking(&self) -> &IndexMap<String, TrackingPattern> {
        &self.tracking
    }

    /// All extraction patterns in registration order.
    pub fn get_all_extraction(&self) -> &IndexMap<String, ExtractionPattern> {
        &self.extraction
    }

    /// All component patterns in registration order.
    pub fn get_all_component(&self) -> &IndexMap<String, ComponentPattern> {
        &self.component
    }

    /// All relationship patterns in registration order.
    pub fn get_all_relationship(&self) -> &IndexMap<String, RelationshipPattern> {
        &self.relationship
    }

    /// Remove a tracking pattern, preserving the order of the rest.
    pub fn remove_tracking(&mut self, name: &str) -> Option<TrackingPattern> {
        self.tracking.shift_remove(name)
    }

    /// Remove an extraction pattern, preserving the order of the rest.
    pub fn remove_extraction(&mut self, name: &str) -> Option<ExtractionPattern> {
        self.extraction.shift_remove(name)
    }

    /// Remove a component pattern, preserving the order of the rest.
    pub fn remove_component(&mut self, name: &str) -> Option<ComponentPattern> {
        self.component.shift_remove(name)
    }

    /// Remove a relationship pattern, preserving the order of the rest.
    pub fn remove_relationship(&mut self, name: &str) -> Option<RelationshipPattern> {
        self.relationship.shift_remove(name)
    }

    /// Drop every pattern in every namespace.
    pub fn clear(&mut self) {
        self.tracking.clear();
        self.extraction.clear();
        self.component.clear();
        self.relationship.clear();
    }

    /// Total number of patterns across namespaces.
    pub fn len(&self) -> usize {
        self.tracking.len() + self.extraction.len() + self.component.len() + self.relationship.len()
    }

    /// Whether every namespace is empty.
    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }
}
