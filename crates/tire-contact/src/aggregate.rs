//! Aggregation of per-rib contacts into a single shell contact frame.

use nalgebra::{Matrix3, Rotation3, UnitQuaternion, Vector3};

use tire_types::Pose;

use crate::rib::RibSurface;

const GEOM_EPSILON: f64 = 1e-10;

/// Best-fit shell contact extracted from the per-rib results.
#[derive(Debug, Clone, Copy)]
pub(crate) struct ShellFit {
    /// Fitted contact frame.
    pub frame: Pose,
    /// Deepest rib penetration.
    pub depth: f64,
    /// Friction of the deepest rib.
    pub friction: f64,
}

/// Orientation whose z-axis is `normal` and whose x-axis follows
/// `forward_hint` projected into the contact plane.
///
/// Degenerate hints (parallel to the normal) fall back to an arbitrary
/// in-plane axis so the result is always a proper rotation.
pub(crate) fn tangent_frame(normal: &Vector3<f64>, forward_hint: &Vector3<f64>) -> UnitQuaternion<f64> {
    let z = normalize_or(normal, Vector3::z());

    let mut x = forward_hint - z * z.dot(forward_hint);
    if x.norm() < GEOM_EPSILON {
        let alt = if z.x.abs() < 0.9 {
            Vector3::x()
        } else {
            Vector3::y()
        };
        x = alt - z * z.dot(&alt);
    }
    let x = normalize_or(&x, Vector3::x());
    let y = z.cross(&x);

    UnitQuaternion::from_rotation_matrix(&Rotation3::from_matrix_unchecked(
        Matrix3::from_columns(&[x, y, z]),
    ))
}

fn normalize_or(v: &Vector3<f64>, fallback: Vector3<f64>) -> Vector3<f64> {
    let n = v.norm();
    if n > GEOM_EPSILON { v / n } else { fallback }
}

/// Fit the shell contact frame from the resolved rib surfaces.
///
/// Weights each rib by its penetration beyond `threshold` (uniform weights
/// when nothing penetrates), averages the weighted normals, fits a plane
/// through the weighted centroid, and projects the hub origin onto it.
/// The overall depth is the deepest rib's; the overall friction is that
/// same rib's (worst-case selection, not an average).
///
/// Returns `None` when no rib resolved; the engine must route that case to
/// the flat fallback instead.
pub(crate) fn fit_shell_frame(
    hub: &Pose,
    surfaces: &[Option<RibSurface>],
    threshold: f64,
) -> Option<ShellFit> {
    let valid: Vec<&RibSurface> = surfaces.iter().flatten().collect();
    if valid.is_empty() {
        return None;
    }

    let mut weight_sum = 0.0;
    for s in &valid {
        weight_sum += (s.depth - threshold).max(0.0);
    }
    let uniform = weight_sum < GEOM_EPSILON;

    let mut normal_acc = Vector3::zeros();
    let mut centroid_acc = Vector3::zeros();
    let mut total = 0.0;
    for s in &valid {
        let w = if uniform {
            1.0
        } else {
            (s.depth - threshold).max(0.0)
        };
        normal_acc += s.normal * w;
        centroid_acc += s.point.coords * w;
        total += w;
    }

    let normal = normalize_or(&normal_acc, Vector3::z());
    let centroid = centroid_acc / total;

    // Hub origin projected onto the fitted plane
    let position = hub.position - normal * normal.dot(&(hub.position.coords - centroid));
    let rotation = tangent_frame(&normal, &hub.forward());

    // total_cmp: depths are finite by construction
    let deepest = valid
        .iter()
        .max_by(|a, b| a.depth.total_cmp(&b.depth))?;

    Some(ShellFit {
        frame: Pose::from_position_rotation(position, rotation),
        depth: deepest.depth,
        friction: deepest.friction,
    })
}
