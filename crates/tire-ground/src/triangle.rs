//! Ground triangles and ray intersection.

use nalgebra::{Point3, Vector3};

use crate::index::ShadowRect;

/// Minimum norm threshold for geometric operations.
///
/// Rejects near-parallel rays and near-degenerate triangles instead of
/// propagating NaN. f64::EPSILON ~= 2.2e-16, so 1e-10 keeps several orders
/// of magnitude of headroom above machine noise.
pub(crate) const GEOM_EPSILON: f64 = 1e-10;

/// Result of a ray cast against ground geometry.
#[derive(Debug, Clone, Copy)]
pub struct RayHit {
    /// Distance from ray origin to hit point.
    pub distance: f64,
    /// Hit point in ground-frame coordinates.
    pub point: Point3<f64>,
    /// Surface normal at the hit point (unit, oriented up from the ground).
    pub normal: Vector3<f64>,
    /// Friction factor of the hit surface element.
    pub friction: f64,
}

/// One ground triangle: three vertices plus a friction factor.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct GroundTriangle {
    /// First vertex.
    pub a: Point3<f64>,
    /// Second vertex.
    pub b: Point3<f64>,
    /// Third vertex.
    pub c: Point3<f64>,
    /// Friction factor of this surface element.
    pub friction: f64,
}

impl GroundTriangle {
    /// Create a triangle.
    #[must_use]
    pub const fn new(a: Point3<f64>, b: Point3<f64>, c: Point3<f64>, friction: f64) -> Self {
        Self { a, b, c, friction }
    }

    /// Unit normal oriented upward (`n.z >= 0`), or `None` when the
    /// triangle is (near) degenerate.
    ///
    /// The upward orientation makes "penetration below ground" well defined
    /// regardless of the winding in the source file.
    #[must_use]
    pub fn normal(&self) -> Option<Vector3<f64>> {
        let cross = (self.b - self.a).cross(&(self.c - self.a));
        let norm = cross.norm();
        if norm < GEOM_EPSILON {
            return None;
        }
        let n = cross / norm;
        Some(if n.z < 0.0 { -n } else { n })
    }

    /// XY bounding box of the triangle.
    #[must_use]
    pub fn footprint(&self) -> ShadowRect {
        ShadowRect {
            min_x: self.a.x.min(self.b.x).min(self.c.x),
            min_y: self.a.y.min(self.b.y).min(self.c.y),
            max_x: self.a.x.max(self.b.x).max(self.c.x),
            max_y: self.a.y.max(self.b.y).max(self.c.y),
        }
    }

    /// Möller–Trumbore ray-triangle intersection.
    ///
    /// Near-parallel rays and hits outside `(GEOM_EPSILON, max_distance]`
    /// report no intersection. The returned normal is the upward-oriented
    /// triangle normal.
    #[must_use]
    pub fn ray_intersect(
        &self,
        origin: Point3<f64>,
        direction: Vector3<f64>,
        max_distance: f64,
    ) -> Option<RayHit> {
        let edge1 = self.b - self.a;
        let edge2 = self.c - self.a;
        let h = direction.cross(&edge2);
        let det = edge1.dot(&h);

        if det.abs() < GEOM_EPSILON {
            return None; // Ray parallel to triangle
        }

        let inv_det = 1.0 / det;
        let s = origin - self.a;
        let u = inv_det * s.dot(&h);
        if !(0.0..=1.0).contains(&u) {
            return None;
        }

        let q = s.cross(&edge1);
        let v = inv_det * direction.dot(&q);
        if v < 0.0 || u + v > 1.0 {
            return None;
        }

        let t = inv_det * edge2.dot(&q);
        if t < GEOM_EPSILON || t > max_distance {
            return None;
        }

        let normal = self.normal()?;
        Some(RayHit {
            distance: t,
            point: origin + direction * t,
            normal,
            friction: self.friction,
        })
    }
}
