//! Geometry types for grid coordinates and rectangular regions.

use serde::{Deserialize, Serialize};

/// A cell coordinate in the character grid (column `x`, row `y`).
///
/// Points order row-major, so sets of cells iterate like text.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct Point {
    /// Column index (0-based)
    pub x: i32,
    /// Row index (0-based)
    pub y: i32,
}

impl Point {
    /// Create a new point.
    pub fn new(x: i32, y: i32) -> Self {
        Self { x, y }
    }
}

impl From<(i32, i32)> for Point {
    fn from((x, y): (i32, i32)) -> Self {
        Self::new(x, y)
    }
}

impl Ord for Point {
    fn cmp(&self, other: &Self) -> std::cmp::Ordering {
        (self.y, self.x).cmp(&(other.y, other.x))
    }
}

impl PartialOrd for Point {
    fn partial_cmp(&self, other: &Self) -> Option<std::cmp::Ordering> {
        Some(self.cmp(other))
    }
}

/// Inclusive rectangle `(x1, y1)..=(x2, y2)` enclosing a component.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(from = "RawBox", into = "RawBox")]
pub struct BoundingBox {
    /// Left column
    pub x1: i32,
    /// Top row
    pub y1: i32,
    /// Right column (inclusive)
    pub x2: i32,
    /// Bottom row (inclusive)
    pub y2: i32,
}

/// Wire form: `[x1, y1, x2, y2]`.
#[derive(Serialize, Deserialize)]
struct RawBox(i32, i32, i32, i32);

impl From<RawBox> for BoundingBox {
    fn from(raw: RawBox) -> Self {
        BoundingBox::new(raw.0, raw.1, raw.2, raw.3)
    }
}

impl From<BoundingBox> for RawBox {
    fn from(b: BoundingBox) -> Self {
        RawBox(b.x1, b.y1, b.x2, b.y2)
    }
}

impl BoundingBox {
    /// Create a bounding box, swapping reversed corners so `x1 <= x2` and `y1 <= y2`.
    pub fn new(x1: i32, y1: i32, x2: i32, y2: i32) -> Self {
        Self {
            x1: x1.min(x2),
            y1: y1.min(y2),
            x2: x1.max(x2),
            y2: y1.max(y2),
        }
    }

    /// A single-cell box.
    pub fn at(point: Point) -> Self {
        Self::new(point.x, point.y, point.x, point.y)
    }

    /// Number of columns covered.
    pub fn width(&self) -> i64 {
        i64::from(self.x2) - i64::from(self.x1) + 1
    }

    /// Number of rows covered.
    pub fn height(&self) -> i64 {
        i64::from(self.y2) - i64::from(self.y1) + 1
    }

    /// Cell count, `(x2-x1+1) * (y2-y1+1)`, saturating at `i64::MAX`.
    pub fn area(&self) -> i64 {
        self.width().saturating_mul(self.height())
    }

    /// Check if a point lies within the box (edges included).
    pub fn contains_point(&self, point: Point) -> bool {
        point.x >= self.x1 && point.x <= self.x2 && point.y >= self.y1 && point.y <= self.y2
    }

    /// Check if the two boxes share at least one cell.
    pub fn intersects(&self, other: &BoundingBox) -> bool {
        !(self.x2 < other.x1 || other.x2 < self.x1 || self.y2 < other.y1 || other.y2 < self.y1)
    }

    /// Strict containment with a margin.
    ///
    /// True when `inner` fits inside `self` with at least `margin` cells
    /// between the two edges on every side.
    pub fn strictly_contains(&self, inner: &BoundingBox, margin: i32) -> bool {
        let margin = i64::from(margin);
        i64::from(self.x1) + margin <= i64::from(inner.x1)
            && i64::from(inner.x2) <= i64::from(self.x2) - margin
            && i64::from(self.y1) + margin <= i64::from(inner.y1)
            && i64::from(inner.y2) <= i64::from(self.y2) - margin
    }

    /// Boxes that touch edge to edge (or corner to corner) without overlapping.
    pub fn is_adjacent(&self, other: &BoundingBox) -> bool {
        if self.intersects(other) {
            return false;
        }
        let grown = BoundingBox::new(
            self.x1.saturating_sub(1),
            self.y1.saturating_sub(1),
            self.x2.saturating_add(1),
            self.y2.saturating_add(1),
        );
        grown.intersects(other)
    }

    /// Clamp every coordinate into `[0, width-1] x [0, height-1]`.
    ///
    /// Returns `None` for an empty area.
    pub fn clamp_to(&self, width: usize, height: usize) -> Option<BoundingBox> {
        if width == 0 || height == 0 {
            return None;
        }
        let max_x = i32::try_from(width - 1).unwrap_or(i32::MAX);
        let max_y = i32::try_from(height - 1).unwrap_or(i32::MAX);
        Some(BoundingBox::new(
            self.x1.clamp(0, max_x),
            self.y1.clamp(0, max_y),
            self.x2.clamp(0, max_x),
            self.y2.clamp(0, max_y),
        ))
    }

    /// All cells of the box in row-major order.
    pub fn cells(&self) -> impl Iterator<Item = Point> + '_ {
        (self.y1..=self.y2).flat_map(move |y| (self.x1..=self.x2).map(move |x| Point::new(x, y)))
    }

    /// Cells on the outer edge of the box, row-major.
    pub fn perimeter(&self) -> impl Iterator<Item = Point> + '_ {
        self.cells().filter(move |p| {
            p.x == self.x1 || p.x == self.x2 || p.y == self.y1 || p.y == self.y2
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_point_creation() {
        let p = Point::new(5, 10);
        assert_eq!(p.x, 5);
        assert_eq!(p.y, 10);
        assert_eq!(Point::from((5, 10)), p);
    }

    #[test]
    fn test_point_orders_row_major() {
        assert!(Point::new(9, 0) < Point::new(0, 1));
        assert!(Point::new(1, 3) < Point::new(2, 3));
    }

    #[test]
    fn test_box_normalizes_corners() {
        let b = BoundingBox::new(9, 4, 0, 0);
        assert_eq!(b, BoundingBox::new(0, 0, 9, 4));
        assert_eq!(b.area(), 50);
    }

    #[test]
    fn test_box_contains_point() {
        let b = BoundingBox::new(10, 5, 29, 14);

        assert!(b.contains_point(Point::new(10, 5))); // top-left corner
        assert!(b.contains_point(Point::new(15, 10))); // inside
        assert!(b.contains_point(Point::new(29, 14))); // bottom-right corner (inclusive)

        assert!(!b.contains_point(Point::new(10, 4))); // above
        assert!(!b.contains_point(Point::new(10, 15))); // below
        assert!(!b.contains_point(Point::new(9, 10))); // left
        assert!(!b.contains_point(Point::new(30, 10))); // right
    }

    #[test]
    fn test_box_intersects() {
        let b1 = BoundingBox::new(10, 5, 29, 14);
        let b2 = BoundingBox::new(15, 10, 24, 19); // overlaps
        let b3 = BoundingBox::new(10, 20, 19, 29); // no overlap

        assert!(b1.intersects(&b2));
        assert!(b2.intersects(&b1));
        assert!(!b1.intersects(&b3));
        assert!(!b3.intersects(&b1));
    }

    #[test]
    fn test_strict_containment_margin() {
        let outer = BoundingBox::new(0, 0, 9, 9);
        assert!(outer.strictly_contains(&BoundingBox::new(2, 2, 5, 5), 1));
        assert!(outer.strictly_contains(&BoundingBox::new(1, 1, 8, 8), 1));
        // Touching the edge fails the margin
        assert!(!outer.strictly_contains(&BoundingBox::new(0, 2, 5, 5), 1));
        assert!(!outer.strictly_contains(&outer, 1));
    }

    #[test]
    fn test_extreme_boxes_do_not_overflow() {
        let all = BoundingBox::new(i32::MIN, i32::MIN, i32::MAX, i32::MAX);
        assert_eq!(all.area(), i64::MAX);
        assert!(all.strictly_contains(&BoundingBox::new(0, 0, 1, 1), 1));
        assert!(!all.strictly_contains(&BoundingBox::new(0, 0, i32::MAX, 0), 1));
        let edge = BoundingBox::new(i32::MAX, 0, i32::MAX, 0);
        assert!(edge.is_adjacent(&BoundingBox::new(i32::MAX - 1, 0, i32::MAX - 1, 0)));
    }

    #[test]
    fn test_overlap_is_not_containment() {
        let a = BoundingBox::new(0, 0, 3, 3);
        let b = BoundingBox::new(2, 2, 3, 3);
        assert!(!a.strictly_contains(&b, 1));
        assert!(!b.strictly_contains(&a, 1));
    }

    #[test]
    fn test_adjacency() {
        let a = BoundingBox::new(0, 0, 3, 0);
        assert!(a.is_adjacent(&BoundingBox::new(4, 0, 6, 0)));
        assert!(a.is_adjacent(&BoundingBox::new(0, 1, 3, 1)));
        assert!(!a.is_adjacent(&BoundingBox::new(5, 0, 6, 0)));
        assert!(!a.is_adjacent(&BoundingBox::new(3, 0, 6, 0))); // overlap
    }

    #[test]
    fn test_clamp_to() {
        let b = BoundingBox::new(-3, -1, 40, 2);
        assert_eq!(b.clamp_to(10, 5), Some(BoundingBox::new(0, 0, 9, 2)));
        assert_eq!(b.clamp_to(0, 5), None);
    }

    #[test]
    fn test_perimeter_and_cells() {
        let b = BoundingBox::new(0, 0, 2, 2);
        assert_eq!(b.cells().count(), 9);
        let perimeter: Vec<Point> = b.perimeter().collect();
        assert_eq!(perimeter.len(), 8);
        assert!(!perimeter.contains(&Point::new(1, 1)));
    }

    #[test]
    fn test_box_serializes_as_tuple() {
        let b = BoundingBox::new(1, 2, 3, 4);
        let json = serde_json::to_string(&b).unwrap();
        assert_eq!(json, "[1,2,3,4]");
        let back: BoundingBox = serde_json::from_str("[3,4,1,2]").unwrap();
        assert_eq!(back, b);
    }
}
