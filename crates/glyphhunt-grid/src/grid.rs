//! Immutable character grid and clamped region views.

use std::collections::BTreeSet;

use glyphhunt_core::{BoundingBox, Point};

/// Character used for cells that were never written.
pub const BLANK: char = ' ';

/// Finite 2-D buffer of single characters addressed by `(x, y)`.
///
/// A grid has no mutation API; build a new one (or use [`crate::Parser`])
/// to change content.
#[derive(Debug, Clone, PartialEq, Eq, Default)]
pub struct Grid {
    /// Cell storage (row-major order)
    cells: Vec<char>,
    /// Number of columns
    width: usize,
    /// Number of rows
    height: usize,
}

impl Grid {
    /// Create a blank grid with the given dimensions.
    pub fn new(width: usize, height: usize) -> Self {
        Self {
            cells: vec![BLANK; width * height],
            width,
            height,
        }
    }

    /// Build a grid from rows of text.
    ///
    /// Rows shorter than the longest one are right-padded with blanks.
    pub fn from_rows<I, S>(rows: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: AsRef<str>,
    {
        let rows: Vec<Vec<char>> = rows
            .into_iter()
            .map(|row| row.as_ref().chars().collect())
            .collect();
        Self::from_char_rows(rows)
    }

    /// Build a grid from a block of text, expanding tabs to 8-column stops.
    pub fn from_text(text: &str) -> Self {
        Self::from_text_with_tabs(text, 8)
    }

    /// Build a grid from a block of text with a custom tab width.
    pub fn from_text_with_tabs(text: &str, tab_width: usize) -> Self {
        let tab_width = tab_width.max(1);
        let rows = text.lines().map(|line| {
            let mut row = Vec::with_capacity(line.len());
            for ch in line.chars() {
                if ch == '\t' {
                    let next_stop = (row.len() / tab_width + 1) * tab_width;
                    row.resize(next_stop, BLANK);
                } else if ch != '\r' {
                    row.push(ch);
                }
            }
            row
        });
        Self::from_char_rows(rows.collect())
    }

    pub(crate) fn from_char_rows(rows: Vec<Vec<char>>) -> Self {
        let width = rows.iter().map(Vec::len).max().unwrap_or(0);
        let height = if width == 0 { 0 } else { rows.len() };
        let mut cells = Vec::with_capacity(width * height);
        if width > 0 {
            for mut row in rows {
                row.resize(width, BLANK);
                cells.extend(row);
            }
        }
        Self {
            cells,
            width,
            height,
        }
    }

    /// Number of columns.
    pub fn width(&self) -> usize {
        self.width
    }

    /// Number of rows.
    pub fn height(&self) -> usize {
        self.height
    }

    /// Whether the grid has no cells.
    pub fn is_empty(&self) -> bool {
        self.cells.is_empty()
    }

    /// Check whether `(x, y)` addresses a cell.
    pub fn contains(&self, x: i32, y: i32) -> bool {
        self.index(x, y).is_some()
    }

    fn index(&self, x: i32, y: i32) -> Option<usize> {
        let x = usize::try_from(x).ok()?;
        let y = usize::try_from(y).ok()?;
        if x < self.width && y < self.height {
            Some(y * self.width + x)
        } else {
            None
        }
    }

    /// Get the character at `(x, y)`.
    ///
    /// Returns None if the position is out of bounds.
    pub fn get(&self, x: i32, y: i32) -> Option<char> {
        self.index(x, y).map(|idx| self.cells[idx])
    }

    /// Get the character at a point.
    pub fn at(&self, point: Point) -> Option<char> {
        self.get(point.x, point.y)
    }

    /// Get an entire row as a slice.
    ///
    /// Returns None if the row is out of bounds.
    pub fn row(&self, y: usize) -> Option<&[char]> {
        if y < self.height {
            let start = y * self.width;
            Some(&self.cells[start..start + self.width])
        } else {
            None
        }
    }

    /// Box covering the whole grid, `None` when empty.
    pub fn bounds(&self) -> Option<BoundingBox> {
        if self.is_empty() {
            return None;
        }
        Some(BoundingBox::new(
            0,
            0,
            i32::try_from(self.width - 1).unwrap_or(i32::MAX),
            i32::try_from(self.height - 1).unwrap_or(i32::MAX),
        ))
    }

    /// View of a rectangle, with every coordinate clamped into the grid.
    ///
    /// Never fails: out-of-range coordinates are pulled into range and
    /// reversed corners are swapped.
    pub fn region(&self, x1: i32, y1: i32, x2: i32, y2: i32) -> GridRegion<'_> {
        GridRegion {
            grid: self,
            area: BoundingBox::new(x1, y1, x2, y2).clamp_to(self.width, self.height),
        }
    }

    /// Distinct characters found at the given cells, skipping cells outside the grid.
    pub fn symbols_at<'a>(&self, cells: impl IntoIterator<Item = &'a Point>) -> BTreeSet<char> {
        cells.into_iter().filter_map(|p| self.at(*p)).collect()
    }

    /// Text of a set of cells laid out row-major.
    ///
    /// Cells on the same row are concatenated left to right (gaps are not
    /// filled), rows are joined with `\n` and each row is trimmed.
    pub fn text_at(&self, cells: &BTreeSet<Point>) -> String {
        let mut lines: Vec<String> = Vec::new();
        let mut current_row: Option<i32> = None;
        for point in cells {
            let Some(ch) = self.at(*point) else {
                continue;
            };
            if current_row != Some(point.y) {
                lines.push(String::new());
                current_row = Some(point.y);
            }
            if let Some(line) = lines.last_mut() {
                line.push(ch);
            }
        }
        lines
            .iter()
            .map(|l| l.trim())
            .filter(|l| !l.is_empty())
            .collect::<Vec<_>>()
            .join("\n")
    }

    /// Convert entire grid to plain text, trimming trailing whitespace per row.
    pub fn to_plain_text(&self) -> String {
        match self.bounds() {
            Some(b) => self.region(b.x1, b.y1, b.x2, b.y2).text(),
            None => String::new(),
        }
    }
}

/// Read-only rectangular view into a [`Grid`].
#[derive(Debug, Clone, Copy)]
pub struct GridRegion<'a> {
    grid: &'a Grid,
    area: Option<BoundingBox>,
}

impl<'a> GridRegion<'a> {
    /// Clamped area in grid coordinates, `None` if the region is empty.
    pub fn area(&self) -> Option<BoundingBox> {
        self.area
    }

    /// Whether the view covers no cells.
    pub fn is_empty(&self) -> bool {
        self.area.is_none()
    }

    /// Number of columns in the view.
    pub fn width(&self) -> usize {
        self.area
            .map(|a| usize::try_from(a.width()).unwrap_or(0))
            .unwrap_or(0)
    }

    /// Number of rows in the view.
    pub fn height(&self) -> usize {
        self.area
            .map(|a| usize::try_from(a.height()).unwrap_or(0))
            .unwrap_or(0)
    }

    /// Character at `(dx, dy)` relative to the view's top-left corner.
    pub fn get(&self, dx: i32, dy: i32) -> Option<char> {
        let area = self.area?;
        if dx < 0 || dy < 0 {
            return None;
        }
        let point = Point::new(area.x1.checked_add(dx)?, area.y1.checked_add(dy)?);
        if !area.contains_point(point) {
            return None;
        }
        self.grid.at(point)
    }

    /// Rows of the view as strings.
    pub fn rows(&self) -> Vec<String> {
        let Some(area) = self.area else {
            return Vec::new();
        };
        (area.y1..=area.y2)
            .map(|y| (area.x1..=area.x2).filter_map(|x| self.grid.get(x, y)).collect())
            .collect()
    }

    /// Text of the view, trailing whitespace trimmed from each line.
    pub fn text(&self) -> String {
        self.rows()
            .iter()
            .map(|l| l.trim_end())
            .collect::<Vec<_>>()
            .join("\n")
    }
}
