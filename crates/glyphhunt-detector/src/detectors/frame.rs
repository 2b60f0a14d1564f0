//! Frame detector for rectangles drawn with box characters.

use std::collections::BTreeSet;

use glyphhunt_core::{BoundingBox, Component, Point};
use glyphhunt_grid::{Grid, BLANK};

use crate::detection::{ComponentDetector, Confidence, DetectedComponent, DetectionContext};

/// Box-drawing character set.
#[derive(Debug, Clone)]
struct BoxCharSet {
    style: &'static str,
    top_left: char,
    top_right: char,
    bottom_left: char,
    bottom_right: char,
    horizontal: char,
    vertical: char,
}

impl BoxCharSet {
    fn is_glyph(&self, ch: char) -> bool {
        [
            self.top_left,
            self.top_right,
            self.bottom_left,
            self.bottom_right,
            self.horizontal,
            self.vertical,
        ]
        .contains(&ch)
    }
}

const BOX_SETS: [BoxCharSet; 5] = [
    // Light box: ┌─┐│└┘
    BoxCharSet {
        style: "light",
        top_left: '┌',
        top_right: '┐',
        bottom_left: '└',
        bottom_right: '┘',
        horizontal: '─',
        vertical: '│',
    },
    // Heavy box: ┏━┓┃┗┛
    BoxCharSet {
        style: "heavy",
        top_left: '┏',
        top_right: '┓',
        bottom_left: '┗',
        bottom_right: '┛',
        horizontal: '━',
        vertical: '┃',
    },
    // Double box: ╔═╗║╚╝
    BoxCharSet {
        style: "double",
        top_left: '╔',
        top_right: '╗',
        bottom_left: '╚',
        bottom_right: '╝',
        horizontal: '═',
        vertical: '║',
    },
    // Rounded: ╭─╮│╰╯
    BoxCharSet {
        style: "rounded",
        top_left: '╭',
        top_right: '╮',
        bottom_left: '╰',
        bottom_right: '╯',
        horizontal: '─',
        vertical: '│',
    },
    // ASCII: +-+|-+
    BoxCharSet {
        style: "ascii",
        top_left: '+',
        top_right: '+',
        bottom_left: '+',
        bottom_right: '+',
        horizontal: '-',
        vertical: '|',
    },
];

/// Frame detector for box-drawing rectangles.
///
/// Every closed rectangle is reported, nested ones included; deciding what
/// contains what is left to the containment analyzer.
#[derive(Debug, Clone, Default)]
pub struct FrameDetector;

impl FrameDetector {
    /// Create a new frame detector.
    pub fn new() -> Self {
        Self
    }

    /// Trace a frame starting from a top-left corner.
    fn trace_frame(&self, grid: &Grid, x: i32, y: i32, set: &BoxCharSet) -> Option<DetectedComponent> {
        // Top-right corner: any character may sit in the top edge (titles)
        let right = (x + 1..grid.width() as i32).find(|&cx| grid.get(cx, y) == Some(set.top_right))?;

        // Bottom-left corner: the left edge may only hold verticals or gaps
        let mut bottom = None;
        for cy in y + 1..grid.height() as i32 {
            match grid.get(x, cy) {
                Some(c) if c == set.bottom_left => {
                    bottom = Some(cy);
                    break;
                }
                Some(c) if c == set.vertical || c == BLANK => {}
                _ => return None,
            }
        }
        let bottom = bottom?;

        if grid.get(right, bottom) != Some(set.bottom_right) {
            return None;
        }

        let bbox = BoundingBox::new(x, y, right, bottom);
        let perimeter: BTreeSet<Point> = bbox.perimeter().collect();
        // Title text sits on the perimeter but is not part of the border.
        let boundary: Vec<Point> = perimeter
            .iter()
            .copied()
            .filter(|p| grid.at(*p).is_some_and(|c| set.is_glyph(c)))
            .collect();
        let interior: Vec<Point> = bbox.cells().filter(|p| !perimeter.contains(p)).collect();

        let mut component = Component::new("")
            .with_box(bbox)
            .with_boundary(boundary)
            .with_interior(interior);
        component.set_property("shape", "frame");
        component.set_property("style", set.style);
        if let Some(title) = self.extract_title(grid, &bbox, set) {
            component.set_property("title", title);
        }

        Some(DetectedComponent {
            component,
            confidence: Confidence::High,
        })
    }

    /// Extract title from top edge.
    fn extract_title(&self, grid: &Grid, bbox: &BoundingBox, set: &BoxCharSet) -> Option<String> {
        let mut title = String::new();
        let mut in_title = false;

        for cx in bbox.x1 + 1..bbox.x2 {
            let Some(ch) = grid.get(cx, bbox.y1) else {
                continue;
            };
            if ch == set.horizontal {
                if in_title && !title.trim().is_empty() {
                    break;
                }
            } else if ch != BLANK || in_title {
                in_title = true;
                title.push(ch);
            }
        }

        let title = title.trim().to_string();
        if title.is_empty() {
            None
        } else {
            Some(title)
        }
    }
}

impl ComponentDetector for FrameDetector {
    fn name(&self) -> &'static str {
        "frame"
    }

    fn priority(&self) -> u32 {
        100 // Highest priority
    }

    fn detect(&self, grid: &Grid, context: &DetectionContext) -> Vec<DetectedComponent> {
        let mut frames = Vec::new();

        // Scan for top-left corners
        for y in 0..grid.height() as i32 {
            for x in 0..grid.width() as i32 {
                if context.is_claimed([Point::new(x, y)].iter()) {
                    continue;
                }
                let Some(ch) = grid.get(x, y) else {
                    continue;
                };
                for set in BOX_SETS.iter().filter(|s| s.top_left == ch) {
                    if let Some(frame) = self.trace_frame(grid, x, y, set) {
                        frames.push(frame);
                    }
                }
            }
        }

        frames
    }
}
