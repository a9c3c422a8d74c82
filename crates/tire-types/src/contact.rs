//! Contact result types and the fixed-size host report.

use nalgebra::Matrix4;

#[cfg(feature = "serde")]
use serde::{Deserialize, Serialize};

use crate::Pose;

/// Compile-time maximum rib count per shell.
///
/// Bounds the fixed-size buffers of [`ShellContactReport`] so that host
/// adapters can allocate signal memory statically.
pub const MAX_RIBS: usize = 16;

/// Rib resolution strategy.
///
/// Both strategies resolve the deepest penetrating point of one rib against
/// the candidate ground geometry; they trade robustness against cost.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
#[cfg_attr(feature = "serde", derive(Serialize, Deserialize))]
pub enum EnvelopingMethod {
    /// Single downward ray per rib. Cost scales with candidate count.
    #[default]
    Geometric,
    /// Dense arc sampling of the rib cross-section. More robust on coarse
    /// or irregular meshes; cost scales with samples x candidates.
    Sampling,
}

/// Resolved contact of a single rib.
///
/// Overwritten on every engine resolution call. When `valid` is false the
/// rib found no ground geometry and the remaining fields hold the neutral
/// values from [`RibContact::invalid`].
#[derive(Debug, Clone, Copy, PartialEq)]
#[cfg_attr(feature = "serde", derive(Serialize, Deserialize))]
pub struct RibContact {
    /// Contact frame: origin on the ground surface, z-axis along the
    /// local ground normal.
    pub frame: Pose,
    /// Signed penetration depth. Positive means the rib surface is below
    /// the ground; zero or negative means touching or hovering.
    pub depth: f64,
    /// Penetration depth rate `(depth - previous) / dt`, zero when no
    /// positive time step was supplied.
    pub depth_rate: f64,
    /// Friction scaling factor of the governing ground element.
    pub friction: f64,
    /// Whether this rib found ground geometry (real or virtual plane).
    pub valid: bool,
}

impl RibContact {
    /// A rib that found no ground geometry.
    #[must_use]
    pub fn invalid() -> Self {
        Self {
            frame: Pose::identity(),
            depth: 0.0,
            depth_rate: 0.0,
            friction: 0.0,
            valid: false,
        }
    }
}

impl Default for RibContact {
    fn default() -> Self {
        Self::invalid()
    }
}

/// Aggregate contact of the whole shell.
#[derive(Debug, Clone, Copy, PartialEq)]
#[cfg_attr(feature = "serde", derive(Serialize, Deserialize))]
pub struct ShellContact {
    /// Best-fit shell contact frame.
    pub frame: Pose,
    /// Overall penetration depth (deepest rib).
    pub depth: f64,
    /// Overall penetration depth rate.
    pub depth_rate: f64,
    /// Friction of the deepest-penetrating rib (worst-case selection).
    pub friction: f64,
    /// True when the resolution used real ground geometry, false when the
    /// shell fell back to the cached virtual plane.
    pub in_mesh: bool,
}

impl Default for ShellContact {
    fn default() -> Self {
        Self {
            frame: Pose::identity(),
            depth: 0.0,
            depth_rate: 0.0,
            friction: 0.0,
            in_mesh: false,
        }
    }
}

/// Fixed-size per-step output buffer for host co-simulation adapters.
///
/// All rib arrays are sized [`MAX_RIBS`] regardless of the configured rib
/// count; slots at index >= the configured count are filled entirely with
/// quiet `NaN` (frame matrix, depth, and friction), never stale values.
#[derive(Debug, Clone, Copy)]
pub struct ShellContactReport {
    /// Shell contact frame as a homogeneous matrix.
    pub shell_frame: Matrix4<f64>,
    /// Overall penetration depth.
    pub depth: f64,
    /// Overall penetration depth rate.
    pub depth_rate: f64,
    /// Overall friction.
    pub friction: f64,
    /// Per-rib contact frames.
    pub rib_frames: [Matrix4<f64>; MAX_RIBS],
    /// Per-rib penetration depths.
    pub rib_depths: [f64; MAX_RIBS],
    /// Per-rib friction factors.
    pub rib_frictions: [f64; MAX_RIBS],
    /// Whether real ground geometry was used.
    pub in_mesh: bool,
}

impl ShellContactReport {
    /// Assemble a report from the aggregate result and the per-rib results.
    ///
    /// `ribs` may be shorter than [`MAX_RIBS`]; trailing slots get the NaN
    /// sentinel. Ribs beyond [`MAX_RIBS`] are ignored (the engine never
    /// produces them).
    #[must_use]
    pub fn new(shell: &ShellContact, ribs: &[RibContact]) -> Self {
        let nan = f64::NAN;
        let mut rib_frames = [Matrix4::from_element(nan); MAX_RIBS];
        let mut rib_depths = [nan; MAX_RIBS];
        let mut rib_frictions = [nan; MAX_RIBS];

        for (i, rib) in ribs.iter().take(MAX_RIBS).enumerate() {
            rib_frames[i] = rib.frame.to_matrix();
            rib_depths[i] = rib.depth;
            rib_frictions[i] = rib.friction;
        }

        Self {
            shell_frame: shell.frame.to_matrix(),
            depth: shell.depth,
            depth_rate: shell.depth_rate,
            friction: shell.friction,
            rib_frames,
            rib_depths,
            rib_frictions,
            in_mesh: shell.in_mesh,
        }
    }
}
