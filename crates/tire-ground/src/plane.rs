//! Infinite flat ground plane.

use nalgebra::{Point3, UnitVector3, Vector3};

use crate::triangle::{RayHit, GEOM_EPSILON};

/// Infinite analytic ground plane: a point, a unit normal, and a friction
/// factor.
///
/// Doubles as the engine's cached "virtual plane" for the no-ground
/// fallback; the default is a Z-up plane through the origin with unit
/// friction.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct FlatPlane {
    /// A point on the plane.
    pub point: Point3<f64>,
    /// Unit normal (conventionally pointing up, away from the ground).
    pub normal: UnitVector3<f64>,
    /// Friction factor of the plane.
    pub friction: f64,
}

impl Default for FlatPlane {
    fn default() -> Self {
        Self {
            point: Point3::origin(),
            normal: Vector3::z_axis(),
            friction: 1.0,
        }
    }
}

impl FlatPlane {
    /// Create a plane from a point, a normal, and a friction factor.
    ///
    /// The normal is normalized; a near-zero input falls back to +Z.
    #[must_use]
    pub fn new(point: Point3<f64>, normal: Vector3<f64>, friction: f64) -> Self {
        let normal = UnitVector3::try_new(normal, GEOM_EPSILON).unwrap_or(Vector3::z_axis());
        Self {
            point,
            normal,
            friction,
        }
    }

    /// Signed distance of `p` from the plane (positive above, along the
    /// normal).
    #[must_use]
    pub fn signed_distance(&self, p: &Point3<f64>) -> f64 {
        self.normal.dot(&(p - self.point))
    }

    /// Orthogonal projection of `p` onto the plane.
    #[must_use]
    pub fn project(&self, p: &Point3<f64>) -> Point3<f64> {
        p - self.normal.as_ref() * self.signed_distance(p)
    }

    /// Analytic ray-plane intersection.
    ///
    /// Always computable without geometry enumeration; returns `None` only
    /// for rays (near) parallel to the plane or hits outside
    /// `[0, max_distance]`.
    #[must_use]
    pub fn ray_intersect(
        &self,
        origin: Point3<f64>,
        direction: Vector3<f64>,
        max_distance: f64,
    ) -> Option<RayHit> {
        let denom = self.normal.dot(&direction);
        if denom.abs() < GEOM_EPSILON {
            return None;
        }
        let t = (self.point - origin).dot(&self.normal) / denom;
        if t < 0.0 || t > max_distance {
            return None;
        }
        Some(RayHit {
            distance: t,
            point: origin + direction * t,
            normal: self.normal.into_inner(),
            friction: self.friction,
        })
    }
}
