//! Property-based tests for the spatial index and containment analysis.
//!
//! Uses proptest to generate random boxes and verify index and hierarchy invariants.

use std::collections::{BTreeMap, BTreeSet};

use proptest::prelude::*;

use glyphhunt_core::{BoundingBox, Component, ComponentModel, Point, Relationship};
use glyphhunt_detector::{ContainmentAnalyzer, SpatialIndex};

const WIDTH: i32 = 30;
const HEIGHT: i32 = 20;

/// Generate a box lying inside the test grid.
fn grid_box() -> impl Strategy<Value = BoundingBox> {
    (0..WIDTH, 0..HEIGHT, 0..WIDTH, 0..HEIGHT).prop_map(|(x1, y1, x2, y2)| BoundingBox::new(x1, y1, x2, y2))
}

/// Generate a list of uniquely named components.
fn components(max: usize) -> impl Strategy<Value = Vec<Component>> {
    prop::collection::vec(grid_box(), 0..max).prop_map(|boxes| {
        boxes
            .into_iter()
            .enumerate()
            .map(|(i, b)| Component::new(format!("c{i}")).with_box(b))
            .collect()
    })
}

/// Index operation applied in sequence.
#[derive(Debug, Clone)]
enum IndexOp {
    Insert(usize, BoundingBox),
    Remove(usize),
}

fn index_ops() -> impl Strategy<Value = Vec<IndexOp>> {
    let op = prop_oneof![
        (0usize..8, grid_box()).prop_map(|(id, b)| IndexOp::Insert(id, b)),
        (0usize..8).prop_map(IndexOp::Remove),
    ];
    prop::collection::vec(op, 0..40)
}

proptest! {
    /// query_point answers exactly the ids whose current box holds the point.
    #[test]
    fn prop_query_point_is_exact(ops in index_ops(), cell_size in 1usize..8) {
        let mut index = SpatialIndex::new(WIDTH as usize, HEIGHT as usize, cell_size).unwrap();
        let mut live: BTreeMap<String, BoundingBox> = BTreeMap::new();

        for op in ops {
            match op {
                IndexOp::Insert(id, b) => {
                    index.insert(&format!("c{id}"), b);
                    live.insert(format!("c{id}"), b);
                }
                IndexOp::Remove(id) => {
                    let removed = index.remove(&format!("c{id}"));
                    prop_assert_eq!(removed, live.remove(&format!("c{id}")).is_some());
                }
            }
        }

        for y in 0..HEIGHT {
            for x in 0..WIDTH {
                let expected: BTreeSet<String> = live
                    .iter()
                    .filter(|(_, b)| b.contains_point(Point::new(x, y)))
                    .map(|(id, _)| id.clone())
                    .collect();
                prop_assert_eq!(index.query_point(x, y), expected);
            }
        }
    }

    /// A whole-grid region query returns every boxed component after a rebuild.
    #[test]
    fn prop_whole_grid_region_returns_all(components in components(20), cell_size in 1usize..8) {
        let mut index = SpatialIndex::new(WIDTH as usize, HEIGHT as usize, cell_size).unwrap();
        index.rebuild(components.iter());

        let expected: BTreeSet<String> = components.iter().map(|c| c.id.clone()).collect();
        prop_assert_eq!(index.query_region(0, 0, WIDTH - 1, HEIGHT - 1), expected);
        prop_assert_eq!(index.len(), components.len());
    }

    /// Containment edges are geometric, never self-loops and never mutual.
    #[test]
    fn prop_containment_is_acyclic(components in components(16), direct in any::<bool>()) {
        let model = ContainmentAnalyzer::default()
            .direct_children_only(direct)
            .analyze(ComponentModel::new(components));

        let edges: BTreeSet<(String, String)> = model
            .relationships_of_kind(Relationship::CONTAINS)
            .map(|r| (r.source_id.clone(), r.target_id.clone()))
            .collect();

        for (outer, inner) in &edges {
            prop_assert_ne!(outer, inner);
            prop_assert!(!edges.contains(&(inner.clone(), outer.clone())));

            let outer_box = model.find(outer).and_then(|c| c.effective_box()).unwrap();
            let inner_box = model.find(inner).and_then(|c| c.effective_box()).unwrap();
            prop_assert!(outer_box.strictly_contains(&inner_box, 1));
        }
    }

    /// Direct mode keeps at most one container per component.
    #[test]
    fn prop_direct_mode_has_single_parent(components in components(16)) {
        let model = ContainmentAnalyzer::default()
            .direct_children_only(true)
            .analyze(ComponentModel::new(components));

        let mut seen = BTreeSet::new();
        for relationship in model.relationships_of_kind(Relationship::CONTAINS) {
            prop_assert!(seen.insert(relationship.target_id.clone()));
        }
    }
}
