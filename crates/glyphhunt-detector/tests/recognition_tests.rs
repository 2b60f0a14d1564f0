//! End-to-end recognition: detection, classification and containment on real grids.

use serde_json::json;

use glyphhunt_core::{BoundingBox, Component, ComponentModel, Relationship};
use glyphhunt_detector::{
    ClassificationOutcome, ContainmentAnalyzer, DetectionPipeline, HuntRecognitionProcessor,
    RecognitionContext, SpatialIndex, CHILDREN_PROPERTY, PARENT_PROPERTY,
};
use glyphhunt_grid::Grid;

const PATTERNS: &str = r#"
# inline widgets
< hunt checkbox_rule: [INIT GATHER = {param tag:checkbox = (val "[x]", "[ ]")}] ><EXEC>
< hunt button_rule: [INIT GATHER =
    {param tag:button = (val "<", ">")}
    {param pluck:caption = (val "(\S.*)")}
] ><EXEC>

# containers
< hunt window_rule: [INIT GATHER = {param tag:window = (val "┌", "┐", "└", "┘", "─", "│")}] ><EXEC>
"#;

/// A titled login window holding a checkbox and two buttons.
fn login_grid() -> Grid {
    let inner = ["", "  [x] Remember me", "  < OK >  < Cancel >", ""];
    let mut rows = vec![format!("┌─ Login {}┐", "─".repeat(14))];
    rows.extend(inner.iter().map(|line| format!("│{line:<22}│")));
    rows.push(format!("└{}┘", "─".repeat(22)));
    Grid::from_rows(rows)
}

#[test]
fn test_point_query_on_single_component() {
    let c1 = Component::new("c1").with_box(BoundingBox::new(0, 0, 9, 4));
    let mut index = SpatialIndex::new(10, 5, 5).unwrap();
    index.add_component(&c1);

    let hits: Vec<String> = index.query_point(5, 2).into_iter().collect();
    assert_eq!(hits, vec!["c1"]);
}

#[test]
fn test_containment_is_one_directional() {
    let model = ComponentModel::new(vec![
        Component::new("outer_id").with_box(BoundingBox::new(0, 0, 9, 9)),
        Component::new("inner_id").with_box(BoundingBox::new(2, 2, 5, 5)),
    ]);
    let model = ContainmentAnalyzer::default().analyze(model);

    assert_eq!(
        model.relationships,
        vec![Relationship::new("outer_id", "inner_id", "contains").unwrap()]
    );
}

#[test]
fn test_overlapping_boxes_do_not_contain() {
    let model = ComponentModel::new(vec![
        Component::new("a").with_box(BoundingBox::new(0, 0, 3, 3)),
        Component::new("b").with_box(BoundingBox::new(2, 2, 3, 3)),
    ]);
    let model = ContainmentAnalyzer::default().analyze(model);
    assert_eq!(model.relationships_of_kind(Relationship::CONTAINS).count(), 0);
}

#[test]
fn test_detection_pipeline_on_login_window() {
    let components = DetectionPipeline::with_default_detectors().detect(&login_grid());

    let ids: Vec<&str> = components.iter().map(|c| c.id.as_str()).collect();
    assert_eq!(ids, vec!["frame_1", "bracket_1", "bracket_2", "bracket_3"]);

    assert_eq!(components[0].bounding_box, Some(BoundingBox::new(0, 0, 23, 5)));
    assert_eq!(components[0].property("title"), Some(&json!("Login")));
    assert_eq!(components[1].property("label"), Some(&json!("Remember me")));
    assert_eq!(components[3].bounding_box, Some(BoundingBox::new(11, 3, 20, 3)));
}

#[test]
fn test_full_recognition_pass() {
    let grid = login_grid();
    let components = DetectionPipeline::with_default_detectors().detect(&grid);

    let mut processor = HuntRecognitionProcessor::new();
    let mut context = RecognitionContext::new(components).with_hunt_pattern(PATTERNS);
    let out = processor.process(Some(&grid), &mut context).unwrap();

    let types: Vec<&str> = out.iter().map(|c| c.component_type.as_str()).collect();
    assert_eq!(types, vec!["window", "checkbox", "button", "button"]);
    assert_eq!(out[2].property("caption"), Some(&json!("OK")));
    assert_eq!(out[3].property("caption"), Some(&json!("Cancel")));

    assert_eq!(
        context.relationships,
        vec![
            Relationship::contains("frame_1", "bracket_1").unwrap(),
            Relationship::contains("frame_1", "bracket_2").unwrap(),
            Relationship::contains("frame_1", "bracket_3").unwrap(),
        ]
    );
    assert_eq!(
        out[0].property(CHILDREN_PROPERTY),
        Some(&json!(["bracket_1", "bracket_2", "bracket_3"]))
    );
    assert_eq!(out[1].property(PARENT_PROPERTY), Some(&json!("frame_1")));
    assert!(context
        .component_classification_results
        .iter()
        .all(|r| r.is_matched()));
    assert!(context.scents.is_empty());
}

#[test]
fn test_process_is_idempotent() {
    let grid = login_grid();
    let components = DetectionPipeline::with_default_detectors().detect(&grid);

    let mut processor = HuntRecognitionProcessor::new();
    let mut context = RecognitionContext::new(components).with_hunt_pattern(PATTERNS);
    let first = processor.process(Some(&grid), &mut context).unwrap();
    let first_relationships = context.relationships.clone();

    let second = processor.process(Some(&grid), &mut context).unwrap();
    assert_eq!(first, second);
    assert_eq!(first_relationships, context.relationships);
    assert_eq!(processor.registry().get_all_component().len(), 3);
}

#[test]
fn test_unmatched_components_keep_detector_properties() {
    let grid = login_grid();
    let components = DetectionPipeline::with_default_detectors().detect(&grid);

    let mut processor = HuntRecognitionProcessor::new();
    let mut context = RecognitionContext::new(components);
    let out = processor.process(Some(&grid), &mut context).unwrap();

    assert!(out.iter().all(|c| c.component_type == "unknown"));
    assert_eq!(out[0].property("title"), Some(&json!("Login")));
    assert!(context
        .component_classification_results
        .iter()
        .all(|r| r.outcome == ClassificationOutcome::Unmatched));
    assert_eq!(context.relationships.len(), 3);
}
