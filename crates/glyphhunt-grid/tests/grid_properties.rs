//! Property-based tests for grid reads and regions.

use std::collections::BTreeSet;

use proptest::prelude::*;

use glyphhunt_core::{GridSettings, Point};
use glyphhunt_grid::{Grid, Parser};

/// Generate small grids of printable text.
fn grid() -> impl Strategy<Value = Grid> {
    prop::collection::vec("[ a-z+|\\-\\[\\]]{0,12}", 0..8).prop_map(Grid::from_rows)
}

proptest! {
    /// Reads outside the grid return None instead of panicking.
    #[test]
    fn prop_get_is_bounds_checked(grid in grid(), x in any::<i32>(), y in any::<i32>()) {
        let inside = x >= 0 && y >= 0 && (x as usize) < grid.width() && (y as usize) < grid.height();
        prop_assert_eq!(grid.get(x, y).is_some(), inside);
    }

    /// Regions clamp any rectangle into the grid.
    #[test]
    fn prop_region_is_clamped(
        grid in grid(),
        x1 in any::<i32>(), y1 in any::<i32>(), x2 in any::<i32>(), y2 in any::<i32>(),
        dx in any::<i32>(), dy in any::<i32>(),
    ) {
        let region = grid.region(x1, y1, x2, y2);
        prop_assert!(region.width() <= grid.width());
        prop_assert!(region.height() <= grid.height());
        prop_assert_eq!(region.rows().len(), region.height());
        let _ = region.get(dx, dy);
        if let Some(area) = region.area() {
            prop_assert!(grid.bounds().is_some_and(|b| b.strictly_contains(&area, 0)));
        }
    }

    /// Symbols of a cell set are a subset of the grid's characters.
    #[test]
    fn prop_symbols_come_from_grid(grid in grid(), cells in prop::collection::vec((-2i32..14, -2i32..10), 0..20)) {
        let cells: BTreeSet<Point> = cells.into_iter().map(Point::from).collect();
        let all: BTreeSet<char> = grid.to_plain_text().chars().chain([' ']).collect();
        for symbol in grid.symbols_at(cells.iter()) {
            prop_assert!(all.contains(&symbol));
        }
        let _ = grid.text_at(&cells);
    }

    /// Plain text survives the ANSI loader unchanged.
    #[test]
    fn prop_parser_keeps_plain_text(rows in prop::collection::vec("[a-z+|\\-]{1,12}", 1..8)) {
        let text = rows.join("\n");
        let grid = Parser::parse(text.as_bytes(), GridSettings::default());
        prop_assert_eq!(grid.to_plain_text(), text);
    }
}
