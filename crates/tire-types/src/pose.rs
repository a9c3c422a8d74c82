//! Rigid transform of the shell hub (and of resolved contact frames).

use nalgebra::{Matrix4, Point3, UnitQuaternion, Vector3};

#[cfg(feature = "serde")]
use serde::{Deserialize, Serialize};

/// Position and orientation of a frame in the fixed ground frame.
///
/// Used both for the caller-supplied hub pose and for resolved contact
/// frames (per rib and per shell).
///
/// # Example
///
/// ```
/// use tire_types::Pose;
/// use nalgebra::Point3;
///
/// let pose = Pose::from_position(Point3::new(1.0, 2.0, 3.0));
/// let world = pose.transform_point(&Point3::new(1.0, 0.0, 0.0));
/// assert_eq!(world, Point3::new(2.0, 2.0, 3.0));
/// ```
#[derive(Debug, Clone, Copy, PartialEq)]
#[cfg_attr(feature = "serde", derive(Serialize, Deserialize))]
pub struct Pose {
    /// Position in ground-frame coordinates.
    pub position: Point3<f64>,
    /// Orientation as a unit quaternion.
    pub rotation: UnitQuaternion<f64>,
}

impl Default for Pose {
    fn default() -> Self {
        Self::identity()
    }
}

impl Pose {
    /// Create an identity pose (origin, no rotation).
    #[must_use]
    pub fn identity() -> Self {
        Self {
            position: Point3::origin(),
            rotation: UnitQuaternion::identity(),
        }
    }

    /// Create a pose from position only (identity rotation).
    #[must_use]
    pub fn from_position(position: Point3<f64>) -> Self {
        Self {
            position,
            rotation: UnitQuaternion::identity(),
        }
    }

    /// Create a pose from position and rotation.
    #[must_use]
    pub const fn from_position_rotation(
        position: Point3<f64>,
        rotation: UnitQuaternion<f64>,
    ) -> Self {
        Self { position, rotation }
    }

    /// Transform a point from local to ground-frame coordinates.
    #[must_use]
    pub fn transform_point(&self, local: &Point3<f64>) -> Point3<f64> {
        self.position + self.rotation * local.coords
    }

    /// Transform a vector from local to ground-frame coordinates (rotation only).
    #[must_use]
    pub fn transform_vector(&self, local: &Vector3<f64>) -> Vector3<f64> {
        self.rotation * local
    }

    /// Transform a point from ground-frame to local coordinates.
    #[must_use]
    pub fn inverse_transform_point(&self, world: &Point3<f64>) -> Point3<f64> {
        Point3::from(self.rotation.inverse() * (world - self.position))
    }

    /// Transform a vector from ground-frame to local coordinates.
    #[must_use]
    pub fn inverse_transform_vector(&self, world: &Vector3<f64>) -> Vector3<f64> {
        self.rotation.inverse() * world
    }

    /// Forward direction (local +X in ground-frame coordinates).
    #[must_use]
    pub fn forward(&self) -> Vector3<f64> {
        self.transform_vector(&Vector3::x())
    }

    /// Lateral direction (local +Y, the wheel spin axis, in ground-frame coordinates).
    #[must_use]
    pub fn lateral(&self) -> Vector3<f64> {
        self.transform_vector(&Vector3::y())
    }

    /// Up direction (local +Z in ground-frame coordinates).
    #[must_use]
    pub fn up(&self) -> Vector3<f64> {
        self.transform_vector(&Vector3::z())
    }

    /// Convert to a homogeneous 4x4 matrix (column-major affine transform).
    #[must_use]
    pub fn to_matrix(&self) -> Matrix4<f64> {
        let mut m = self.rotation.to_rotation_matrix().to_homogeneous();
        m.fixed_view_mut::<3, 1>(0, 3)
            .copy_from(&self.position.coords);
        m
    }

    /// Check if the pose contains `NaN` or `Inf` values.
    #[must_use]
    pub fn is_finite(&self) -> bool {
        self.position.coords.iter().all(|x| x.is_finite())
            && self.rotation.coords.iter().all(|x| x.is_finite())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use approx::assert_relative_eq;

    #[test]
    fn test_identity_transform() {
        let pose = Pose::identity();
        let p = Point3::new(1.0, 2.0, 3.0);
        assert_relative_eq!(pose.transform_point(&p).coords, p.coords, epsilon = 1e-12);
    }

    #[test]
    fn test_rotation_axes() {
        // 90 degrees around Z: forward (+X) maps to +Y
        let pose = Pose::from_position_rotation(
            Point3::origin(),
            UnitQuaternion::from_euler_angles(0.0, 0.0, std::f64::consts::FRAC_PI_2),
        );
        let fwd = pose.forward();
        assert_relative_eq!(fwd.x, 0.0, epsilon = 1e-12);
        assert_relative_eq!(fwd.y, 1.0, epsilon = 1e-12);
        // Up is unchanged by a yaw rotation
        assert_relative_eq!(pose.up().z, 1.0, epsilon = 1e-12);
    }

    #[test]
    fn test_inverse_round_trip() {
        let pose = Pose::from_position_rotation(
            Point3::new(1.0, -2.0, 0.5),
            UnitQuaternion::from_euler_angles(0.1, 0.2, 0.3),
        );
        let p = Point3::new(0.4, 0.5, 0.6);
        let back = pose.inverse_transform_point(&pose.transform_point(&p));
        assert_relative_eq!(back.coords, p.coords, epsilon = 1e-12);
    }

    #[test]
    fn test_to_matrix_matches_transform() {
        let pose = Pose::from_position_rotation(
            Point3::new(3.0, 1.0, -0.5),
            UnitQuaternion::from_euler_angles(0.3, -0.1, 1.2),
        );
        let p = Point3::new(0.2, -0.7, 0.9);
        let m = pose.to_matrix();
        let h = m * p.to_homogeneous();
        assert_relative_eq!(
            Vector3::new(h.x, h.y, h.z),
            pose.transform_point(&p).coords,
            epsilon = 1e-12
        );
    }
}
