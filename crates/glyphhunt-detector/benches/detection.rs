use criterion::{black_box, criterion_group, criterion_main, BenchmarkId, Criterion};
use glyphhunt_core::{BoundingBox, Component, ComponentModel};
use glyphhunt_detector::{
    ContainmentAnalyzer, DetectionPipeline, HuntRecognitionProcessor, RecognitionContext,
    SpatialIndex,
};
use glyphhunt_grid::Grid;

const PATTERNS: &str = r#"
< hunt checkbox_rule: [INIT GATHER = {param tag:checkbox = (val "[x]", "[ ]")}] ><EXEC>
< hunt button_rule: [INIT GATHER = {param tag:button = (val "<", ">")} {param pluck:caption = (val "(\S.*)")}] ><EXEC>
< hunt window_rule: [INIT GATHER = {param tag:window = (val "┌", "┐", "└", "┘", "─", "│")}] ><EXEC>
"#;

/// Tiled windows, each holding a checkbox and a button.
fn create_dashboard(tiles_x: usize, tiles_y: usize) -> Grid {
    let tile = [
        format!("┌{}┐", "─".repeat(18)),
        format!("│{:<18}│", " [x] Enabled"),
        format!("│{:<18}│", " < Apply >"),
        format!("└{}┘", "─".repeat(18)),
    ];
    let mut rows = Vec::new();
    for _ in 0..tiles_y {
        for line in &tile {
            rows.push(line.repeat(tiles_x));
        }
    }
    Grid::from_rows(rows)
}

/// Nested boxes: a grid of windows, each with one inner panel.
fn create_components(count: usize) -> Vec<Component> {
    let mut components = Vec::with_capacity(count * 2);
    for i in 0..count {
        let x = (i % 20) as i32 * 12;
        let y = (i / 20) as i32 * 8;
        components.push(Component::new(format!("w{i}")).with_box(BoundingBox::new(x, y, x + 10, y + 6)));
        components.push(Component::new(format!("p{i}")).with_box(BoundingBox::new(x + 2, y + 2, x + 6, y + 4)));
    }
    components
}

fn bench_index_build(c: &mut Criterion) {
    let mut group = c.benchmark_group("index_build");

    for count in [50usize, 200, 800] {
        let components = create_components(count);
        group.bench_with_input(BenchmarkId::from_parameter(count), &components, |b, components| {
            b.iter(|| {
                let mut index = SpatialIndex::with_default_cell_size(240, 400);
                index.rebuild(black_box(components.iter()));
                black_box(index);
            });
        });
    }

    group.finish();
}

fn bench_index_query(c: &mut Criterion) {
    let mut index = SpatialIndex::with_default_cell_size(240, 400);
    index.rebuild(create_components(800).iter());

    c.bench_function("query_point", |b| {
        b.iter(|| black_box(index.query_point(black_box(123), black_box(77))));
    });
    c.bench_function("query_region", |b| {
        b.iter(|| black_box(index.query_region(black_box(10), black_box(10), black_box(60), black_box(40))));
    });
}

fn bench_containment(c: &mut Criterion) {
    let mut group = c.benchmark_group("containment");
    let analyzer = ContainmentAnalyzer::default();

    for count in [50usize, 200, 800] {
        let model = ComponentModel::new(create_components(count));
        group.bench_with_input(BenchmarkId::from_parameter(count), &model, |b, model| {
            b.iter(|| black_box(analyzer.analyze(black_box(model.clone()))));
        });
    }

    group.finish();
}

fn bench_detection_pipeline(c: &mut Criterion) {
    let grid = create_dashboard(4, 6);
    let pipeline = DetectionPipeline::with_default_detectors();

    c.bench_function("detection_pipeline", |b| {
        b.iter(|| black_box(pipeline.detect(black_box(&grid))));
    });
}

fn bench_recognition_pass(c: &mut Criterion) {
    let grid = create_dashboard(4, 6);
    let components = DetectionPipeline::with_default_detectors().detect(&grid);

    c.bench_function("recognition_pass", |b| {
        b.iter(|| {
            let mut processor = HuntRecognitionProcessor::new();
            let mut context = RecognitionContext::new(components.clone()).with_hunt_pattern(PATTERNS);
            black_box(processor.process(Some(&grid), &mut context).ok());
        });
    });
}

criterion_group!(
    benches,
    bench_index_build,
    bench_index_query,
    bench_containment,
    bench_detection_pipeline,
    bench_recognition_pass
);
criterion_main!(benches);
