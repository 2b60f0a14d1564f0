//! Bracket detector for inline `[ ]`, `( )` and `< >` widgets.

use lazy_static::lazy_static;
use regex::Regex;

use glyphhunt_core::{BoundingBox, Component, Point};
use glyphhunt_grid::{Grid, BLANK};

use crate::detection::{ComponentDetector, Confidence, DetectedComponent, DetectionContext};

lazy_static! {
    /// Caption right after a closing bracket: one optional blank, then words
    /// separated by single blanks.
    static ref TRAILING_LABEL: Regex =
        Regex::new(r"^ ?([^\s\[\(<]+(?: [^\s\[\(<]+)*)").expect("trailing label regex is valid");
}

/// Opening and closing delimiter pair.
#[derive(Debug, Clone, Copy)]
struct BracketPair {
    open: char,
    close: char,
}

const PAIRS: [BracketPair; 3] = [
    BracketPair { open: '[', close: ']' },
    BracketPair { open: '(', close: ')' },
    BracketPair { open: '<', close: '>' },
];

fn is_delimiter(ch: char) -> bool {
    PAIRS.iter().any(|p| p.open == ch || p.close == ch)
}

/// Bracket detector for single-row delimited spans.
///
/// The two delimiter cells form the boundary and the cells between them the
/// interior, so checkboxes (`[x]`), radio buttons (`( )`) and buttons
/// (`< OK >`) all come out as the same raw shape for patterns to classify.
#[derive(Debug, Clone)]
pub struct BracketDetector {
    max_interior: usize,
}

impl BracketDetector {
    /// Create a new bracket detector.
    pub fn new() -> Self {
        Self { max_interior: 30 }
    }

    /// Detect bracket spans in one row, left to right without overlap.
    fn detect_row(&self, y: i32, row: &[char], context: &DetectionContext) -> Vec<DetectedComponent> {
        let mut found = Vec::new();
        let mut x = 0;

        while x < row.len() {
            let Some(pair) = PAIRS.iter().find(|p| p.open == row[x]) else {
                x += 1;
                continue;
            };
            let Some(offset) = row[x + 1..].iter().position(|&c| c == pair.close) else {
                x += 1;
                continue;
            };
            let close = x + 1 + offset;
            let inside = &row[x + 1..close];

            if inside.len() > self.max_interior || inside.iter().any(|&c| is_delimiter(c)) {
                x += 1;
                continue;
            }

            let (Ok(x1), Ok(x2)) = (i32::try_from(x), i32::try_from(close)) else {
                break;
            };
            let boundary = [Point::new(x1, y), Point::new(x2, y)];
            if context.is_claimed(boundary.iter()) {
                x = close + 1;
                continue;
            }

            let mut component = Component::new("")
                .with_box(BoundingBox::new(x1, y, x2, y))
                .with_boundary(boundary)
                .with_interior((x1 + 1..x2).map(|cx| Point::new(cx, y)));
            component.set_property("shape", "bracket");
            component.set_property("delimiter", format!("{}{}", pair.open, pair.close));

            let trailing: String = row[close + 1..].iter().collect();
            if let Some(label) = TRAILING_LABEL.captures(&trailing).and_then(|c| c.get(1)) {
                component.set_property("label", label.as_str());
            }

            let blank = inside.iter().all(|&c| c == BLANK);
            found.push(DetectedComponent {
                component,
                confidence: if blank { Confidence::Medium } else { Confidence::High },
            });
            x = close + 1;
        }

        found
    }
}

impl Default for BracketDetector {
    fn default() -> Self {
        Self::new()
    }
}

impl ComponentDetector for BracketDetector {
    fn name(&self) -> &'static str {
        "bracket"
    }

    fn priority(&self) -> u32 {
        60
    }

    fn detect(&self, grid: &Grid, context: &DetectionContext) -> Vec<DetectedComponent> {
        let mut results = Vec::new();
        for y in 0..grid.height() {
            let (Some(row), Ok(row_y)) = (grid.row(y), i32::try_from(y)) else {
                continue;
            };
            results.extend(self.detect_row(row_y, row, context));
        }
        results
    }
}
