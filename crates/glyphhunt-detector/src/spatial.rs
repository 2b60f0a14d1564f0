//! Bucketed spatial index over component bounding boxes.
//!
//! The grid is cut into `cell_size × cell_size` buckets. Each bucket holds
//! the ids of every component whose box overlaps it, so point and region
//! queries only touch the buckets they cover.

use std::collections::{BTreeMap, BTreeSet};
use std::num::NonZeroUsize;

use glyphhunt_core::{BoundingBox, Component, Error, Point, Result, DEFAULT_CELL_SIZE};

/// Bucket grid indexing component ids by bounding box.
#[derive(Debug, Clone)]
pub struct SpatialIndex {
    /// Grid width in cells
    width: usize,
    /// Grid height in cells
    height: usize,
    /// Bucket side length
    cell_size: usize,
    /// Buckets per row
    cols: usize,
    /// Bucket rows
    rows: usize,
    /// Bucket contents, row-major
    buckets: Vec<BTreeSet<String>>,
    /// Box of every indexed id, as passed in (unclamped)
    boxes: BTreeMap<String, BoundingBox>,
}

impl SpatialIndex {
    /// Create an index for a `width × height` grid.
    ///
    /// Fails with [`Error::Config`] when `cell_size` is zero.
    pub fn new(width: usize, height: usize, cell_size: usize) -> Result<Self> {
        let cell_size = NonZeroUsize::new(cell_size)
            .ok_or_else(|| Error::Config("cell_size must be at least 1".to_string()))?;
        Ok(Self::with_cell_size(width, height, cell_size))
    }

    /// Create an index with an already validated bucket size.
    pub fn with_cell_size(width: usize, height: usize, cell_size: NonZeroUsize) -> Self {
        let cell_size = cell_size.get();
        let cols = width.div_ceil(cell_size).max(1);
        let rows = height.div_ceil(cell_size).max(1);
        Self {
            width,
            height,
            cell_size,
            cols,
            rows,
            buckets: vec![BTreeSet::new(); cols * rows],
            boxes: BTreeMap::new(),
        }
    }

    /// Create an index with [`DEFAULT_CELL_SIZE`].
    pub fn with_default_cell_size(width: usize, height: usize) -> Self {
        let cell_size = NonZeroUsize::new(DEFAULT_CELL_SIZE).unwrap_or(NonZeroUsize::MIN);
        Self::with_cell_size(width, height, cell_size)
    }

    /// Bucket side length.
    pub fn cell_size(&self) -> usize {
        self.cell_size
    }

    /// Index dimensions as `(columns, rows)` of buckets.
    pub fn dimensions(&self) -> (usize, usize) {
        (self.cols, self.rows)
    }

    /// Number of indexed ids.
    pub fn len(&self) -> usize {
        self.boxes.len()
    }

    /// Whether nothing is indexed.
    pub fn is_empty(&self) -> bool {
        self.boxes.is_empty()
    }

    /// Box recorded for an id.
    pub fn bounds_of(&self, id: &str) -> Option<BoundingBox> {
        self.boxes.get(id).copied()
    }

    /// Index a component under its effective box.
    ///
    /// Components without a box are ignored.
    pub fn add_component(&mut self, component: &Component) {
        if let Some(bbox) = component.effective_box() {
            self.insert(&component.id, bbox);
        }
    }

    /// Index an id under a box, replacing any previous entry for that id.
    ///
    /// The box is clamped into the grid for bucket placement, so a box
    /// hanging off the edge still lands in the edge buckets. An empty grid
    /// indexes nothing.
    pub fn insert(&mut self, id: &str, bbox: BoundingBox) {
        self.remove(id);
        let Some(range) = self.bucket_range(&bbox) else {
            return;
        };
        let indices: Vec<usize> = self.bucket_indices(range).collect();
        for index in indices {
            self.buckets[index].insert(id.to_string());
        }
        self.boxes.insert(id.to_string(), bbox);
    }

    /// Remove an id from every bucket. Returns true if it was indexed.
    pub fn remove(&mut self, id: &str) -> bool {
        let Some(bbox) = self.boxes.remove(id) else {
            return false;
        };
        if let Some(range) = self.bucket_range(&bbox) {
            let indices: Vec<usize> = self.bucket_indices(range).collect();
            for index in indices {
                self.buckets[index].remove(id);
            }
        }
        true
    }

    /// Ids whose box contains `(x, y)`.
    ///
    /// Empty when the point lies outside the grid. The result is an owned
    /// copy; bucket candidates are checked against their boxes.
    pub fn query_point(&self, x: i32, y: i32) -> BTreeSet<String> {
        let (Ok(ux), Ok(uy)) = (usize::try_from(x), usize::try_from(y)) else {
            return BTreeSet::new();
        };
        if ux >= self.width || uy >= self.height {
            return BTreeSet::new();
        }
        let bucket = &self.buckets[self.bucket_index(ux / self.cell_size, uy / self.cell_size)];
        let point = Point::new(x, y);
        bucket
            .iter()
            .filter(|id| {
                self.boxes
                    .get(id.as_str())
                    .is_some_and(|b| b.contains_point(point))
            })
            .cloned()
            .collect()
    }

    /// Ids in every bucket the rectangle overlaps.
    ///
    /// Each coordinate is clamped into the grid independently, so a query
    /// partly outside the grid still answers for the part inside. The
    /// result is a candidate set: callers apply exact geometry.
    pub fn query_region(&self, x1: i32, y1: i32, x2: i32, y2: i32) -> BTreeSet<String> {
        let Some(range) = self.bucket_range(&BoundingBox::new(x1, y1, x2, y2)) else {
            return BTreeSet::new();
        };
        let mut found = BTreeSet::new();
        for index in self.bucket_indices(range) {
            found.extend(self.buckets[index].iter().cloned());
        }
        found
    }

    /// Clear everything, then index each component.
    pub fn rebuild<'a>(&mut self, components: impl IntoIterator<Item = &'a Component>) {
        self.clear();
        for component in components {
            self.add_component(component);
        }
    }

    /// Drop every indexed id.
    pub fn clear(&mut self) {
        for bucket in &mut self.buckets {
            bucket.clear();
        }
        self.boxes.clear();
    }

    fn bucket_index(&self, col: usize, row: usize) -> usize {
        row.min(self.rows - 1) * self.cols + col.min(self.cols - 1)
    }

    /// Inclusive bucket range `(c1, r1, c2, r2)` of a box clamped into the grid.
    fn bucket_range(&self, bbox: &BoundingBox) -> Option<(usize, usize, usize, usize)> {
        let clamped = bbox.clamp_to(self.width, self.height)?;
        let to_bucket = |v: i32, limit: usize| -> usize {
            (usize::try_from(v).unwrap_or(0) / self.cell_size).min(limit - 1)
        };
        Some((
            to_bucket(clamped.x1, self.cols),
            to_bucket(clamped.y1, self.rows),
            to_bucket(clamped.x2, self.cols),
            to_bucket(clamped.y2, self.rows),
        ))
    }

    fn bucket_indices(
        &self,
        (c1, r1, c2, r2): (usize, usize, usize, usize),
    ) -> impl Iterator<Item = usize> + '_ {
        (r1..=r2).flat_map(move |row| (c1..=c2).map(move |col| self.bucket_index(col, row)))
    }
}
