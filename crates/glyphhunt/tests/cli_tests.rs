//! Integration tests for the glyphhunt command line library.

use std::path::PathBuf;

use clap::Parser;
use glyphhunt::{recognize, run, CliOptions};
use glyphhunt_core::{RecognitionConfig, Relationship};
use glyphhunt_grid::Grid;

const SCREEN: &str = "\
+----------------+
| [x] Autosave   |
| < Save >       |
+----------------+
";

const RULES: &str = r#"
< hunt checkbox_rule: [INIT GATHER = {param tag:checkbox = (val "[x]", "[ ]")}] ><EXEC>
< hunt button_rule: [INIT GATHER = {param tag:button = (val "<", ">")} {param pluck:caption = (val "(\S.*)")}] ><EXEC>
< hunt frame_rule: [INIT GATHER = {param tag:frame = (val "+", "-", "|")}] ><EXEC>
"#;

/// Write a fixture into a per-process scratch directory.
fn fixture(name: &str, content: &str) -> PathBuf {
    let dir = std::env::temp_dir().join(format!("glyphhunt-cli-{}", std::process::id()));
    std::fs::create_dir_all(&dir).unwrap();
    let path = dir.join(name);
    std::fs::write(&path, content).unwrap();
    path
}

#[test]
fn test_parse_arguments() {
    let options =
        CliOptions::try_parse_from(["glyphhunt", "screen.txt", "a.hunt", "--config", "g.yaml", "b.hunt"])
            .unwrap();
    assert_eq!(options.grid_path, PathBuf::from("screen.txt"));
    assert_eq!(options.hunt_paths, vec![PathBuf::from("a.hunt"), PathBuf::from("b.hunt")]);
    assert_eq!(options.config_path, Some(PathBuf::from("g.yaml")));
}

#[test]
fn test_parse_rejects_bad_arguments() {
    assert!(CliOptions::try_parse_from(["glyphhunt"]).is_err());
    assert!(CliOptions::try_parse_from(["glyphhunt", "screen.txt", "--config"]).is_err());
    assert!(CliOptions::try_parse_from(["glyphhunt", "screen.txt", "--verbose"]).is_err());
}

#[test]
fn test_parse_short_config_flag() {
    let options = CliOptions::try_parse_from(["glyphhunt", "-c", "g.yaml", "screen.txt"]).unwrap();
    assert_eq!(options.grid_path, PathBuf::from("screen.txt"));
    assert!(options.hunt_paths.is_empty());
    assert_eq!(options.config_path, Some(PathBuf::from("g.yaml")));
}

#[test]
fn test_recognize_in_memory() {
    let grid = Grid::from_text(SCREEN);
    let report = recognize(&grid, vec![RULES.to_string()], &RecognitionConfig::default()).unwrap();

    assert_eq!(report.grid.width, 18);
    assert_eq!(report.grid.height, 4);

    let types: Vec<&str> = report.components.iter().map(|c| c.component_type.as_str()).collect();
    assert_eq!(types, vec!["frame", "checkbox", "button"]);
    assert_eq!(report.relationships.len(), 2);
    assert!(report
        .relationships
        .contains(&Relationship::contains("frame_1", "bracket_2").unwrap()));
    assert_eq!(report.classification.len(), 3);
}

#[test]
fn test_run_from_files() {
    let screen = fixture("screen.txt", SCREEN);
    let rules = fixture("rules.hunt", RULES);
    let config = fixture("glyphhunt.yaml", "matching:\n  strategy: highest_confidence\n");

    let options = CliOptions {
        grid_path: screen,
        hunt_paths: vec![rules],
        config_path: Some(config),
    };
    let config = options.load_config().unwrap();
    let report = run(&options, &config).unwrap();

    assert_eq!(report.components.len(), 3);
    let json = serde_json::to_value(&report).unwrap();
    assert_eq!(json["components"][2]["properties"]["caption"], "Save");
    assert_eq!(json["classification"][0]["outcome"], "matched");
    assert!(json["generated_at"].is_string());
}

#[test]
fn test_run_reports_missing_files() {
    let options = CliOptions {
        grid_path: PathBuf::from("/nonexistent/screen.txt"),
        ..CliOptions::default()
    };
    let err = run(&options, &RecognitionConfig::default()).unwrap_err();
    assert!(format!("{err:#}").contains("reading grid"));
}

#[test]
fn test_bad_hunt_source_fails_run() {
    let grid = Grid::from_text(SCREEN);
    let err = recognize(&grid, vec!["< hunt x: [INIT".to_string()], &RecognitionConfig::default()).unwrap_err();
    assert!(err.to_string().starts_with("load stage failed"));
}
