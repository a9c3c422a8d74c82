//! Uniform 2D grid index over triangle XY footprints.

use std::collections::HashMap;

use crate::triangle::GroundTriangle;

/// Axis-aligned rectangle in the ground XY plane.
///
/// Used both as the query footprint of a shell ("shadow box") and as the
/// 2D bounding box of a ground triangle.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct ShadowRect {
    /// Minimum X (inclusive).
    pub min_x: f64,
    /// Minimum Y (inclusive).
    pub min_y: f64,
    /// Maximum X (inclusive).
    pub max_x: f64,
    /// Maximum Y (inclusive).
    pub max_y: f64,
}

impl ShadowRect {
    /// Create a rect from two corner coordinates, automatically ordered.
    #[must_use]
    pub fn new(x0: f64, y0: f64, x1: f64, y1: f64) -> Self {
        Self {
            min_x: x0.min(x1),
            min_y: y0.min(y1),
            max_x: x0.max(x1),
            max_y: y0.max(y1),
        }
    }

    /// Rect centered on `(cx, cy)` with the given half-extents.
    #[must_use]
    pub fn from_center(cx: f64, cy: f64, half_x: f64, half_y: f64) -> Self {
        Self::new(cx - half_x, cy - half_y, cx + half_x, cy + half_y)
    }

    /// Whether two rects overlap (boundaries touching counts as overlap).
    #[must_use]
    pub fn overlaps(&self, other: &Self) -> bool {
        self.min_x <= other.max_x
            && self.max_x >= other.min_x
            && self.min_y <= other.max_y
            && self.max_y >= other.min_y
    }

    /// Width along X.
    #[must_use]
    pub fn width(&self) -> f64 {
        self.max_x - self.min_x
    }

    /// Height along Y.
    #[must_use]
    pub fn height(&self) -> f64 {
        self.max_y - self.min_y
    }
}

/// Uniform grid over the XY plane mapping cells to triangle indices.
///
/// Each triangle is registered in every cell its footprint covers; a query
/// gathers the candidate indices from the covered cells, then filters by
/// exact footprint overlap so callers never see false positives.
#[derive(Debug, Clone)]
pub struct ShadowIndex {
    cell_size: f64,
    cells: HashMap<(i64, i64), Vec<u32>>,
}

impl ShadowIndex {
    /// Build the index for a set of triangles.
    ///
    /// The cell size is twice the median footprint extent, so a typical
    /// triangle covers only a handful of cells while a typical shell
    /// footprint query touches a bounded cell neighborhood.
    #[must_use]
    pub fn build(triangles: &[GroundTriangle]) -> Self {
        let mut extents: Vec<f64> = triangles
            .iter()
            .map(|t| {
                let fp = t.footprint();
                fp.width().max(fp.height())
            })
            .collect();
        extents.sort_by(|a, b| a.total_cmp(b));
        let median = extents.get(extents.len() / 2).copied().unwrap_or(1.0);
        let cell_size = (2.0 * median).max(1e-3);

        let mut cells: HashMap<(i64, i64), Vec<u32>> = HashMap::new();
        for (i, tri) in triangles.iter().enumerate() {
            let fp = tri.footprint();
            let (cx0, cy0) = Self::cell_of(cell_size, fp.min_x, fp.min_y);
            let (cx1, cy1) = Self::cell_of(cell_size, fp.max_x, fp.max_y);
            for cx in cx0..=cx1 {
                for cy in cy0..=cy1 {
                    cells.entry((cx, cy)).or_default().push(i as u32);
                }
            }
        }

        Self { cell_size, cells }
    }

    /// Grid cell containing the point `(x, y)`.
    #[allow(clippy::cast_possible_truncation)]
    fn cell_of(cell_size: f64, x: f64, y: f64) -> (i64, i64) {
        ((x / cell_size).floor() as i64, (y / cell_size).floor() as i64)
    }

    /// Indices of all triangles whose footprint overlaps `rect`, sorted and
    /// deduplicated.
    #[must_use]
    pub fn query(&self, rect: &ShadowRect, triangles: &[GroundTriangle]) -> Vec<u32> {
        let (cx0, cy0) = Self::cell_of(self.cell_size, rect.min_x, rect.min_y);
        let (cx1, cy1) = Self::cell_of(self.cell_size, rect.max_x, rect.max_y);

        let mut found = Vec::new();
        for cx in cx0..=cx1 {
            for cy in cy0..=cy1 {
                if let Some(indices) = self.cells.get(&(cx, cy)) {
                    found.extend_from_slice(indices);
                }
            }
        }
        found.sort_unstable();
        found.dedup();
        found.retain(|&i| triangles[i as usize].footprint().overlaps(rect));
        found
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use nalgebra::Point3;

    fn tri_at(x: f64, y: f64, friction: f64) -> GroundTriangle {
        GroundTriangle::new(
            Point3::new(x, y, 0.0),
            Point3::new(x + 1.0, y, 0.0),
            Point3::new(x, y + 1.0, 0.0),
            friction,
        )
    }

    #[test]
    fn test_rect_overlap() {
        let a = ShadowRect::new(0.0, 0.0, 2.0, 2.0);
        let b = ShadowRect::new(1.0, 1.0, 3.0, 3.0);
        let c = ShadowRect::new(2.5, 2.5, 4.0, 4.0);
        assert!(a.overlaps(&b));
        assert!(b.overlaps(&c));
        assert!(!a.overlaps(&c));
        // Touching boundaries overlap
        let d = ShadowRect::new(2.0, 0.0, 3.0, 1.0);
        assert!(a.overlaps(&d));
    }

    #[test]
    fn test_query_finds_overlapping_only() {
        let triangles = vec![
            tri_at(0.0, 0.0, 1.0),
            tri_at(10.0, 10.0, 1.0),
            tri_at(0.5, 0.5, 1.0),
        ];
        let index = ShadowIndex::build(&triangles);

        let hits = index.query(&ShadowRect::new(0.0, 0.0, 1.0, 1.0), &triangles);
        assert_eq!(hits, vec![0, 2]);

        let far = index.query(&ShadowRect::new(50.0, 50.0, 51.0, 51.0), &triangles);
        assert!(far.is_empty());
    }

    #[test]
    fn test_query_dedup_across_cells() {
        // One large triangle spanning many cells must be reported once
        let big = GroundTriangle::new(
            Point3::new(-10.0, -10.0, 0.0),
            Point3::new(10.0, -10.0, 0.0),
            Point3::new(0.0, 10.0, 0.0),
            1.0,
        );
        let triangles = vec![big];
        let index = ShadowIndex::build(&triangles);
        let hits = index.query(&ShadowRect::new(-5.0, -5.0, 5.0, 5.0), &triangles);
        assert_eq!(hits, vec![0]);
    }
}
