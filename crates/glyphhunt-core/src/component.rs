//! Component model: detected UI elements and the relationships between them.

use std::collections::{BTreeMap, BTreeSet};

use serde::{Deserialize, Serialize};

use crate::{BoundingBox, Point};

/// Free-form property value attached to a component.
pub type PropertyValue = serde_json::Value;

/// Component type assigned before any pattern has classified the component.
pub const UNCLASSIFIED: &str = "unknown";

/// A rectangular UI element detected in the grid.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Component {
    /// Unique identifier within a component model
    pub id: String,
    /// Component type (e.g. `button`, `checkbox`)
    #[serde(rename = "type", default = "unclassified")]
    pub component_type: String,
    /// Bounding box from upstream detection
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub bounding_box: Option<BoundingBox>,
    /// Refined bounding box, preferred over `bounding_box` when present
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub refined_bounding_box: Option<BoundingBox>,
    /// Cells on the component's border
    #[serde(default, skip_serializing_if = "BTreeSet::is_empty")]
    pub boundary: BTreeSet<Point>,
    /// Cells strictly inside the border
    #[serde(default, skip_serializing_if = "BTreeSet::is_empty")]
    pub interior: BTreeSet<Point>,
    /// Open property map (extracted text, states, classification markers)
    #[serde(default)]
    pub properties: BTreeMap<String, PropertyValue>,
}

fn unclassified() -> String {
    UNCLASSIFIED.to_string()
}

impl Component {
    /// Create an unclassified component with no geometry.
    pub fn new(id: impl Into<String>) -> Self {
        Self {
            id: id.into(),
            component_type: unclassified(),
            bounding_box: None,
            refined_bounding_box: None,
            boundary: BTreeSet::new(),
            interior: BTreeSet::new(),
            properties: BTreeMap::new(),
        }
    }

    /// Builder: set the bounding box.
    pub fn with_box(mut self, bounding_box: BoundingBox) -> Self {
        self.bounding_box = Some(bounding_box);
        self
    }

    /// Builder: set the component type.
    pub fn with_type(mut self, component_type: impl Into<String>) -> Self {
        self.component_type = component_type.into();
        self
    }

    /// Builder: set the boundary cells.
    pub fn with_boundary(mut self, cells: impl IntoIterator<Item = Point>) -> Self {
        self.boundary = cells.into_iter().collect();
        self
    }

    /// Builder: set the interior cells.
    pub fn with_interior(mut self, cells: impl IntoIterator<Item = Point>) -> Self {
        self.interior = cells.into_iter().collect();
        self
    }

    /// Box used for geometric queries: the refined box if present, else the plain one.
    pub fn effective_box(&self) -> Option<BoundingBox> {
        self.refined_bounding_box.or(self.bounding_box)
    }

    /// Boundary cells, falling back to the box perimeter when none were recorded.
    pub fn boundary_cells(&self) -> BTreeSet<Point> {
        if !self.boundary.is_empty() {
            return self.boundary.clone();
        }
        match self.effective_box() {
            Some(b) => b.perimeter().collect(),
            None => BTreeSet::new(),
        }
    }

    /// Interior cells, falling back to box cells minus boundary cells.
    pub fn interior_cells(&self) -> BTreeSet<Point> {
        if !self.interior.is_empty() {
            return self.interior.clone();
        }
        let Some(b) = self.effective_box() else {
            return BTreeSet::new();
        };
        let boundary = self.boundary_cells();
        b.cells().filter(|p| !boundary.contains(p)).collect()
    }

    /// Get a property value.
    pub fn property(&self, key: &str) -> Option<&PropertyValue> {
        self.properties.get(key)
    }

    /// Set a property, replacing any previous value.
    pub fn set_property(&mut self, key: impl Into<String>, value: impl Into<PropertyValue>) {
        self.properties.insert(key.into(), value.into());
    }
}

/// Directed relationship between two components (e.g. `contains`).
#[derive(Debug, Clone, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
pub struct Relationship {
    /// Source component id
    pub source_id: String,
    /// Target component id
    pub target_id: String,
    /// Relationship kind
    pub kind: String,
}

impl Relationship {
    /// Kind used for geometric containment edges.
    pub const CONTAINS: &'static str = "contains";

    /// Create a relationship. Self-relationships are rejected.
    pub fn new(
        source_id: impl Into<String>,
        target_id: impl Into<String>,
        kind: impl Into<String>,
    ) -> Option<Self> {
        let source_id = source_id.into();
        let target_id = target_id.into();
        if source_id == target_id {
            return None;
        }
        Some(Self {
            source_id,
            target_id,
            kind: kind.into(),
        })
    }

    /// Shorthand for a `contains` relationship.
    pub fn contains(outer: impl Into<String>, inner: impl Into<String>) -> Option<Self> {
        Self::new(outer, inner, Self::CONTAINS)
    }
}

/// Components of one recognition pass plus the relationships derived so far.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct ComponentModel {
    /// Components in detection order
    pub components: Vec<Component>,
    /// Derived relationships in discovery order
    #[serde(default)]
    pub relationships: Vec<Relationship>,
}

impl ComponentModel {
    /// Create a model with no relationships.
    pub fn new(components: Vec<Component>) -> Self {
        Self {
            components,
            relationships: Vec::new(),
        }
    }

    /// Find a component by id.
    pub fn find(&self, id: &str) -> Option<&Component> {
        self.components.iter().find(|c| c.id == id)
    }

    /// Record a relationship unless the identical triple is already present.
    ///
    /// Returns true if the relationship was added.
    pub fn add_relationship(&mut self, relationship: Relationship) -> bool {
        if relationship.source_id == relationship.target_id
            || self.relationships.contains(&relationship)
        {
            return false;
        }
        self.relationships.push(relationship);
        true
    }

    /// Relationships of a given kind.
    pub fn relationships_of_kind<'a>(
        &'a self,
        kind: &'a str,
    ) -> impl Iterator<Item = &'a Relationship> + 'a {
        self.relationships.iter().filter(move |r| r.kind == kind)
    }

    /// Ids that appear more than once, in first-seen order.
    pub fn duplicate_ids(&self) -> Vec<String> {
        let mut seen = BTreeSet::new();
        let mut duplicates = Vec::new();
        for component in &self.components {
            if !seen.insert(component.id.as_str()) && !duplicates.contains(&component.id) {
                duplicates.push(component.id.clone());
            }
        }
        duplicates
    }
}
