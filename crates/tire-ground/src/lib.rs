//! Ground surface representations for tire shell contact resolution.
//!
//! A ground is either an infinite flat plane or a triangulated mesh with a
//! spatial index for shadow queries:
//!
//! - [`FlatPlane`] - Analytic infinite plane (point + normal + friction)
//! - [`GroundMesh`] - Immutable triangle soup with per-triangle friction and
//!   a uniform 2D grid index over the XY footprint
//! - [`Ground`] - The variant dispatching between the two
//! - [`load_ground_mesh`] / [`parse_ground_str`] - Ground description file I/O
//!
//! # Shadow Queries
//!
//! The contact engine culls ground geometry by the shell's projected 2D
//! footprint. [`GroundMesh::shadow_triangles`] answers "which triangles'
//! XY bounding boxes overlap this rect"; an empty answer is a valid outcome
//! (no ground under the tire) and drives the engine's flat-plane fallback,
//! not an error.
//!
//! # Example
//!
//! ```
//! use tire_ground::{Ground, GroundMesh, GroundTriangle, ShadowRect};
//! use nalgebra::Point3;
//!
//! let tri = GroundTriangle::new(
//!     Point3::new(-1.0, -1.0, 0.0),
//!     Point3::new(1.0, -1.0, 0.0),
//!     Point3::new(0.0, 1.0, 0.0),
//!     1.0,
//! );
//! let ground = Ground::Mesh(GroundMesh::new(vec![tri]).unwrap());
//!
//! if let Ground::Mesh(mesh) = &ground {
//!     let hits = mesh.shadow_triangles(&ShadowRect::new(-0.5, -0.5, 0.5, 0.5));
//!     assert_eq!(hits, vec![0]);
//! }
//! ```

#![cfg_attr(not(test), deny(clippy::unwrap_used, clippy::expect_used))]
#![warn(missing_docs)]
#![warn(clippy::all)]
#![warn(clippy::pedantic)]
// Triangle counts stay far below 2^52 / 2^32.
#![allow(clippy::cast_precision_loss, clippy::cast_possible_truncation)]

mod error;
mod index;
mod loader;
mod plane;
mod triangle;

pub use error::GroundError;
pub use index::{ShadowIndex, ShadowRect};
pub use loader::{load_ground_mesh, parse_ground_str};
pub use plane::FlatPlane;
pub use triangle::{GroundTriangle, RayHit};

use nalgebra::{Point3, Vector3};

/// Result type for ground operations.
pub type Result<T> = std::result::Result<T, GroundError>;

/// A ground surface: an infinite flat plane or a triangulated mesh.
#[derive(Debug, Clone)]
pub enum Ground {
    /// Infinite analytic plane.
    Flat(FlatPlane),
    /// Triangulated mesh with a shadow index.
    Mesh(GroundMesh),
}

impl Ground {
    /// Cast a ray against the ground, returning the closest hit.
    #[must_use]
    pub fn ray_intersect(
        &self,
        origin: Point3<f64>,
        direction: Vector3<f64>,
        max_distance: f64,
    ) -> Option<RayHit> {
        match self {
            Self::Flat(plane) => plane.ray_intersect(origin, direction, max_distance),
            Self::Mesh(mesh) => mesh.ray_intersect(origin, direction, max_distance),
        }
    }
}

/// Immutable triangulated ground with a 2D shadow index.
///
/// Built once at initialization and shared read-only across all shell
/// instances; all queries take `&self`.
#[derive(Debug, Clone)]
pub struct GroundMesh {
    triangles: Vec<GroundTriangle>,
    index: ShadowIndex,
}

impl GroundMesh {
    /// Build a mesh from triangles, orienting every normal upward and
    /// constructing the shadow index.
    ///
    /// # Errors
    ///
    /// [`GroundError::EmptyMesh`] when `triangles` is empty,
    /// [`GroundError::DegenerateTriangle`] when a triangle has (near) zero
    /// area.
    pub fn new(triangles: Vec<GroundTriangle>) -> Result<Self> {
        if triangles.is_empty() {
            return Err(GroundError::EmptyMesh);
        }
        for (i, tri) in triangles.iter().enumerate() {
            if tri.normal().is_none() {
                return Err(GroundError::DegenerateTriangle { index: i });
            }
        }
        let index = ShadowIndex::build(&triangles);
        tracing::debug!(
            triangles = triangles.len(),
            "built ground mesh shadow index"
        );
        Ok(Self { triangles, index })
    }

    /// Number of triangles.
    #[must_use]
    pub fn len(&self) -> usize {
        self.triangles.len()
    }

    /// Whether the mesh holds no triangles (never true for a constructed mesh).
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.triangles.is_empty()
    }

    /// All triangles.
    #[must_use]
    pub fn triangles(&self) -> &[GroundTriangle] {
        &self.triangles
    }

    /// Triangle by index.
    #[must_use]
    pub fn triangle(&self, idx: u32) -> &GroundTriangle {
        &self.triangles[idx as usize]
    }

    /// Indices of all triangles whose XY bounding box overlaps `rect`.
    ///
    /// An empty result signals "no ground under the footprint" and is a
    /// valid outcome.
    #[must_use]
    pub fn shadow_triangles(&self, rect: &ShadowRect) -> Vec<u32> {
        self.index.query(rect, &self.triangles)
    }

    /// Closest ray hit against the mesh, if any.
    ///
    /// Culls candidates through the shadow index using the XY span of the
    /// ray segment before running the exact triangle tests.
    #[must_use]
    pub fn ray_intersect(
        &self,
        origin: Point3<f64>,
        direction: Vector3<f64>,
        max_distance: f64,
    ) -> Option<RayHit> {
        if !max_distance.is_finite() || max_distance <= 0.0 {
            return None;
        }
        let end = origin + direction * max_distance;
        let span = ShadowRect::new(origin.x, origin.y, end.x, end.y);

        let mut closest: Option<RayHit> = None;
        for idx in self.index.query(&span, &self.triangles) {
            let cutoff = closest.as_ref().map_or(max_distance, |h| h.distance);
            if let Some(hit) = self.triangles[idx as usize].ray_intersect(origin, direction, cutoff)
            {
                closest = Some(hit);
            }
        }
        closest
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use approx::assert_relative_eq;

    fn quad_mesh() -> GroundMesh {
        // Two triangles forming a flat unit quad at z = 0
        let a = Point3::new(-1.0, -1.0, 0.0);
        let b = Point3::new(1.0, -1.0, 0.0);
        let c = Point3::new(1.0, 1.0, 0.0);
        let d = Point3::new(-1.0, 1.0, 0.0);
        GroundMesh::new(vec![
            GroundTriangle::new(a, b, c, 0.8),
            GroundTriangle::new(a, c, d, 0.8),
        ])
        .unwrap()
    }

    #[test]
    fn test_empty_mesh_rejected() {
        assert!(matches!(
            GroundMesh::new(Vec::new()),
            Err(GroundError::EmptyMesh)
        ));
    }

    #[test]
    fn test_degenerate_triangle_rejected() {
        let p = Point3::new(0.0, 0.0, 0.0);
        let result = GroundMesh::new(vec![GroundTriangle::new(p, p, p, 1.0)]);
        assert!(matches!(
            result,
            Err(GroundError::DegenerateTriangle { index: 0 })
        ));
    }

    #[test]
    fn test_mesh_ray_intersect_down() {
        let mesh = quad_mesh();
        let hit = mesh
            .ray_intersect(Point3::new(0.2, 0.3, 5.0), -Vector3::z(), 10.0)
            .unwrap();
        assert_relative_eq!(hit.distance, 5.0, epsilon = 1e-10);
        assert_relative_eq!(hit.point.z, 0.0, epsilon = 1e-10);
        assert_relative_eq!(hit.friction, 0.8, epsilon = 1e-12);
    }

    #[test]
    fn test_mesh_ray_miss_outside() {
        let mesh = quad_mesh();
        let hit = mesh.ray_intersect(Point3::new(5.0, 5.0, 5.0), -Vector3::z(), 10.0);
        assert!(hit.is_none());
    }

    #[test]
    fn test_ground_dispatch() {
        let flat = Ground::Flat(FlatPlane::default());
        let hit = flat
            .ray_intersect(Point3::new(0.0, 0.0, 2.0), -Vector3::z(), 10.0)
            .unwrap();
        assert_relative_eq!(hit.distance, 2.0, epsilon = 1e-12);
    }
}
