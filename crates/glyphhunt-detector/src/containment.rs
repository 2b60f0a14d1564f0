//! Containment analysis: derives `contains` edges from box nesting.
//!
//! A component contains another when the inner box fits inside the outer
//! one with at least one cell of margin on every side. Strict nesting means
//! a box can never contain a box that contains it, so the resulting graph
//! is acyclic without an explicit cycle check.

use std::collections::{BTreeMap, BTreeSet};
use std::num::NonZeroUsize;

use serde_json::json;

use glyphhunt_core::{
    BoundingBox, ComponentModel, ContainmentSettings, Error, IndexSettings, Relationship, Result,
    DEFAULT_CELL_SIZE,
};

use crate::spatial::SpatialIndex;

/// Margin required between an outer and an inner box.
const CONTAINMENT_MARGIN: i32 = 1;

/// Largest index side, in cells. Boxes beyond it share the edge buckets.
const MAX_INDEX_EXTENT: i64 = 4096;

/// Property listing the ids a container holds.
pub const CHILDREN_PROPERTY: &str = "children";

/// Property naming the tightest container of a component.
pub const PARENT_PROPERTY: &str = "parent";

/// Builds the containment hierarchy of a component model.
#[derive(Debug, Clone)]
pub struct ContainmentAnalyzer {
    cell_size: NonZeroUsize,
    direct_children_only: bool,
}

impl Default for ContainmentAnalyzer {
    fn default() -> Self {
        Self {
            cell_size: NonZeroUsize::new(DEFAULT_CELL_SIZE).unwrap_or(NonZeroUsize::MIN),
            direct_children_only: false,
        }
    }
}

impl ContainmentAnalyzer {
    /// Analyzer using `cell_size` for its internal spatial index.
    pub fn new(cell_size: usize) -> Result<Self> {
        let cell_size = NonZeroUsize::new(cell_size)
            .ok_or_else(|| Error::Config("cell_size must be at least 1".to_string()))?;
        Ok(Self {
            cell_size,
            ..Self::default()
        })
    }

    /// Analyzer configured from settings.
    pub fn from_settings(containment: &ContainmentSettings, index: &IndexSettings) -> Result<Self> {
        Ok(Self::new(index.cell_size)?.direct_children_only(containment.direct_children_only))
    }

    /// Keep only the tightest container of each component.
    pub fn direct_children_only(mut self, enabled: bool) -> Self {
        self.direct_children_only = enabled;
        self
    }

    /// Add `contains` relationships (and `children`/`parent` properties) to a model.
    ///
    /// Components without a box are left out. Relationships already present
    /// are not duplicated, so analyzing a model twice changes nothing.
    pub fn analyze(&self, mut model: ComponentModel) -> ComponentModel {
        let pairs = self.containment_pairs(&model);
        let parents = tightest_containers(&model, &pairs);

        let kept: Vec<(usize, usize)> = if self.direct_children_only {
            pairs
                .into_iter()
                .filter(|(outer, inner)| parents.get(inner) == Some(outer))
                .collect()
        } else {
            pairs
        };

        let mut children: BTreeMap<usize, BTreeSet<usize>> = BTreeMap::new();
        let mut added = 0usize;
        for &(outer, inner) in &kept {
            children.entry(outer).or_default().insert(inner);
            let relationship = Relationship::contains(
                model.components[outer].id.clone(),
                model.components[inner].id.clone(),
            );
            if let Some(relationship) = relationship {
                if model.add_relationship(relationship) {
                    added += 1;
                }
            }
        }

        for (outer, inner) in children {
            let ids: Vec<String> = inner
                .into_iter()
                .map(|i| model.components[i].id.clone())
                .collect();
            model.components[outer].set_property(CHILDREN_PROPERTY, json!(ids));
        }
        for (inner, outer) in parents {
            let parent_id = model.components[outer].id.clone();
            model.components[inner].set_property(PARENT_PROPERTY, parent_id);
        }

        tracing::debug!(
            pairs = kept.len(),
            added,
            direct_children_only = self.direct_children_only,
            "containment analysis complete"
        );
        model
    }

    /// Every `(outer, inner)` pair of model positions in strict containment.
    ///
    /// Outer components are visited by area, largest first (ties keep model
    /// order); inner candidates are visited in model order.
    pub fn containment_pairs(&self, model: &ComponentModel) -> Vec<(usize, usize)> {
        let boxed: Vec<(usize, BoundingBox)> = model
            .components
            .iter()
            .enumerate()
            .filter_map(|(i, c)| c.effective_box().map(|b| (i, b)))
            .collect();
        if boxed.is_empty() {
            return Vec::new();
        }

        // Shift into the index's non-negative space. Coordinates are clamped
        // to the index extent, which keeps overlapping boxes overlapping.
        let offset_x = boxed.iter().map(|(_, b)| i64::from(b.x1)).min().unwrap_or(0).min(0);
        let offset_y = boxed.iter().map(|(_, b)| i64::from(b.y1)).min().unwrap_or(0).min(0);
        let extent = |max: i64, offset: i64| (max - offset + 1).clamp(1, MAX_INDEX_EXTENT);
        let width = extent(boxed.iter().map(|(_, b)| i64::from(b.x2)).max().unwrap_or(0), offset_x);
        let height = extent(boxed.iter().map(|(_, b)| i64::from(b.y2)).max().unwrap_or(0), offset_y);
        let place = |v: i32, offset: i64, extent: i64| {
            i32::try_from((i64::from(v) - offset).clamp(0, extent - 1)).unwrap_or(i32::MAX)
        };
        let shift = |b: &BoundingBox| {
            BoundingBox::new(
                place(b.x1, offset_x, width),
                place(b.y1, offset_y, height),
                place(b.x2, offset_x, width),
                place(b.y2, offset_y, height),
            )
        };

        let to_usize = |v: i64| usize::try_from(v).unwrap_or(1);
        let mut index = SpatialIndex::with_cell_size(to_usize(width), to_usize(height), self.cell_size);
        let mut position_of: BTreeMap<String, usize> = BTreeMap::new();
        for (i, bbox) in &boxed {
            let key = i.to_string();
            index.insert(&key, shift(bbox));
            position_of.insert(key, *i);
        }

        let mut by_area = boxed.clone();
        by_area.sort_by_key(|(_, b)| std::cmp::Reverse(b.area()));

        let mut pairs = Vec::new();
        for (outer, outer_box) in &by_area {
            let shifted = shift(outer_box);
            let mut candidates: Vec<usize> = index
                .query_region(shifted.x1, shifted.y1, shifted.x2, shifted.y2)
                .iter()
                .filter_map(|key| position_of.get(key).copied())
                .filter(|candidate| candidate != outer)
                .collect();
            candidates.sort_unstable();

            for inner in candidates {
                let Some(inner_box) = model.components[inner].effective_box() else {
                    continue;
                };
                if outer_box.strictly_contains(&inner_box, CONTAINMENT_MARGIN) {
                    pairs.push((*outer, inner));
                }
            }
        }
        pairs
    }
}

/// Smallest container of every contained position (ties: earliest in model order).
fn tightest_containers(model: &ComponentModel, pairs: &[(usize, usize)]) -> BTreeMap<usize, usize> {
    let area = |i: usize| {
        model.components[i]
            .effective_box()
            .map(|b| b.area())
            .unwrap_or(i64::MAX)
    };
    let mut parents: BTreeMap<usize, usize> = BTreeMap::new();
    for &(outer, inner) in pairs {
        parents
            .entry(inner)
            .and_modify(|current| {
                let better = (area(outer), outer) < (area(*current), *current);
                if better {
                    *current = outer;
                }
            })
            .or_insert(outer);
    }
    parents
}

#[cfg(test)]
mod tests {
    use super::*;
    use glyphhunt_core::Component;

    fn component(id: &str, x1: i32, y1: i32, x2: i32, y2: i32) -> Component {
        Component::new(id).with_box(BoundingBox::new(x1, y1, x2, y2))
    }

    fn contains_pairs(model: &ComponentModel) -> Vec<(&str, &str)> {
        model
            .relationships_of_kind(Relationship::CONTAINS)
            .map(|r| (r.source_id.as_str(), r.target_id.as_str()))
            .collect()
    }

    #[test]
    fn test_outer_contains_inner() {
        let model = ComponentModel::new(vec![
            component("outer_id", 0, 0, 9, 9),
            component("inner_id", 2, 2, 5, 5),
        ]);
        let model = ContainmentAnalyzer::default().analyze(model);
        assert_eq!(contains_pairs(&model), vec![("outer_id", "inner_id")]);
    }

    #[test]
    fn test_overlap_is_not_containment() {
        let model = ComponentModel::new(vec![component("a", 0, 0, 3, 3), component("b", 2, 2, 3, 3)]);
        let model = ContainmentAnalyzer::default().analyze(model);
        assert!(model.relationships.is_empty());
    }

    #[test]
    fn test_touching_edge_is_not_containment() {
        let model = ComponentModel::new(vec![component("a", 0, 0, 9, 9), component("b", 0, 2, 4, 4)]);
        let model = ContainmentAnalyzer::default().analyze(model);
        assert!(model.relationships.is_empty());
    }

    #[test]
    fn test_extreme_coordinates_do_not_overflow() {
        let model = ComponentModel::new(vec![
            component("left", -1, 0, 0, 0),
            component("wide", 0, 0, i32::MAX, 0),
            component("far", i32::MIN, i32::MIN, i32::MAX, i32::MAX),
            component("inside", 5, 5, 6, 6),
        ]);
        let model = ContainmentAnalyzer::default().analyze(model);
        assert_eq!(contains_pairs(&model), vec![("far", "left"), ("far", "inside")]);
    }

    #[test]
    fn test_unboxed_components_are_skipped() {
        let model = ComponentModel::new(vec![
            Component::new("ghost"),
            component("outer", 0, 0, 9, 9),
            component("inner", 2, 2, 3, 3),
        ]);
        let model = ContainmentAnalyzer::default().analyze(model);
        assert_eq!(contains_pairs(&model), vec![("outer", "inner")]);
        assert!(model.components[0].properties.is_empty());
    }

    #[test]
    fn test_transitive_and_direct_modes() {
        let components = vec![
            component("window", 0, 0, 29, 19),
            component("panel", 2, 2, 20, 15),
            component("button", 4, 4, 10, 5),
        ];

        let full = ContainmentAnalyzer::default().analyze(ComponentModel::new(components.clone()));
        assert_eq!(
            contains_pairs(&full),
            vec![("window", "panel"), ("window", "button"), ("panel", "button")]
        );

        let direct = ContainmentAnalyzer::default()
            .direct_children_only(true)
            .analyze(ComponentModel::new(components));
        assert_eq!(contains_pairs(&direct), vec![("window", "panel"), ("panel", "button")]);
    }

    #[test]
    fn test_parent_and_children_properties() {
        let model = ComponentModel::new(vec![
            component("window", 0, 0, 29, 19),
            component("panel", 2, 2, 20, 15),
            component("button", 4, 4, 10, 5),
        ]);
        let model = ContainmentAnalyzer::default().analyze(model);

        assert_eq!(model.components[0].property(CHILDREN_PROPERTY), Some(&json!(["panel", "button"])));
        assert_eq!(model.components[1].property(CHILDREN_PROPERTY), Some(&json!(["button"])));
        assert_eq!(model.components[2].property(PARENT_PROPERTY), Some(&json!("panel")));
        assert_eq!(model.components[1].property(PARENT_PROPERTY), Some(&json!("window")));
        assert_eq!(model.components[0].property(PARENT_PROPERTY), None);
    }

    #[test]
    fn test_analyze_is_idempotent() {
        let model = ComponentModel::new(vec![
            component("outer", 0, 0, 9, 9),
            component("inner", 2, 2, 5, 5),
        ]);
        let analyzer = ContainmentAnalyzer::default();
        let once = analyzer.analyze(model);
        let twice = analyzer.analyze(once.clone());
        assert_eq!(once, twice);
    }

    #[test]
    fn test_negative_coordinates() {
        let model = ComponentModel::new(vec![
            component("outer", -10, -10, 0, 0),
            component("inner", -8, -8, -2, -2),
        ]);
        let model = ContainmentAnalyzer::default().analyze(model);
        assert_eq!(contains_pairs(&model), vec![("outer", "inner")]);
    }

    #[test]
    fn test_zero_cell_size_rejected() {
        assert!(matches!(ContainmentAnalyzer::new(0), Err(Error::Config(_))));
    }
}
