//! Per-rib contact resolution.
//!
//! A rib is one lateral cross-section of the shell. Against a triangulated
//! ground it is resolved with one of two strategies:
//!
//! - **Geometric**: a single downward ray through the rib center; among the
//!   candidate-triangle hits the minimum ray parameter is the deepest
//!   penetration. Cost scales with the candidate count.
//! - **Sampling**: the lower arc of the rib circle is discretized and every
//!   sample is projected down onto the candidates; the deepest sample wins.
//!   More robust on coarse or irregular meshes, cost scales with
//!   samples x candidates.
//!
//! Against a plane (real flat ground or the engine's cached virtual plane)
//! the support point of the rib circle is computed analytically.

use nalgebra::{Point3, Vector3};

use tire_ground::{FlatPlane, GroundMesh, RayHit};
use tire_types::EnvelopingMethod;

use crate::profile::ShapeProfile;

/// Minimum norm threshold for geometric operations (matches the ground
/// crate's ray tolerance).
const GEOM_EPSILON: f64 = 1e-10;

/// Two ray hits whose depths differ by less than this are treated as equal
/// and tie-broken on friction continuity.
pub(crate) const DEPTH_TIE_TOLERANCE: f64 = 1e-9;

/// Ray origins sit this many center radii above the rib center, clear of
/// the carcass.
const CAST_CLEARANCE_FACTOR: f64 = 2.0;

/// Total downward cast range in center radii. Ground further below the
/// footprint than this is treated as absent.
const CAST_RANGE_FACTOR: f64 = 4.0;

/// Half-opening of the sampled arc around straight-down, degrees. Beyond
/// this the cross-section surface faces sideways and cannot be the deepest
/// point under a downward projection.
const SAMPLING_ARC_DEG: f64 = 70.0;

/// One lateral cross-section of the shell.
///
/// Built once at engine construction; the lateral offset and cached
/// cross-section radius never change afterwards.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Rib {
    /// Lateral offset from the shell centerline (hub-frame y).
    pub lateral_offset: f64,
    /// Cross-section surface radius at this offset.
    pub radius: f64,
}

impl Rib {
    pub(crate) fn new(profile: &ShapeProfile, lateral_offset: f64) -> Self {
        Self {
            lateral_offset,
            radius: profile.surface_radius(lateral_offset),
        }
    }
}

/// Raw resolved surface point of one rib, before frame construction.
#[derive(Debug, Clone, Copy)]
pub(crate) struct RibSurface {
    /// Contact point on the ground surface.
    pub point: Point3<f64>,
    /// Ground normal at the contact point (unit, up).
    pub normal: Vector3<f64>,
    /// Signed penetration depth along the shell's up axis.
    pub depth: f64,
    /// Friction of the governing ground element.
    pub friction: f64,
}

/// Pose-derived quantities shared by all ribs of one resolution call.
#[derive(Debug, Clone, Copy)]
pub(crate) struct ResolveContext {
    /// Shell up axis in ground-frame coordinates.
    pub up: Vector3<f64>,
    /// Shell forward axis (rib circle plane direction).
    pub forward: Vector3<f64>,
    /// Wheel spin axis.
    pub lateral: Vector3<f64>,
    /// Centerline radius of the profile.
    pub max_radius: f64,
    /// Sample count for the sampling strategy.
    pub sampling_resolution: usize,
}

/// Resolve one rib against a candidate triangle set.
///
/// Returns `None` when no candidate intersects the rib's cast window; the
/// engine marks such ribs invalid.
pub(crate) fn resolve_rib_mesh(
    rib: &Rib,
    center: Point3<f64>,
    ctx: &ResolveContext,
    mesh: &GroundMesh,
    candidates: &[u32],
    method: EnvelopingMethod,
    prev_friction: f64,
) -> Option<RibSurface> {
    match method {
        EnvelopingMethod::Geometric => {
            resolve_geometric(rib, center, ctx, mesh, candidates, prev_friction)
        }
        EnvelopingMethod::Sampling => {
            resolve_sampling(rib, center, ctx, mesh, candidates, prev_friction)
        }
    }
}

/// Single-ray strategy: cast straight down through the rib center.
fn resolve_geometric(
    rib: &Rib,
    center: Point3<f64>,
    ctx: &ResolveContext,
    mesh: &GroundMesh,
    candidates: &[u32],
    prev_friction: f64,
) -> Option<RibSurface> {
    let origin = center + ctx.up * (CAST_CLEARANCE_FACTOR * ctx.max_radius);
    let range = CAST_RANGE_FACTOR * ctx.max_radius;

    let mut best: Option<RayHit> = None;
    for &idx in candidates {
        if let Some(hit) = mesh.triangle(idx).ray_intersect(origin, -ctx.up, range) {
            best = Some(match best {
                None => hit,
                Some(current) => pick_closer(current, hit, prev_friction),
            });
        }
    }

    let hit = best?;
    // Vertical drop from the rib center to the ground surface; the rib
    // penetrates when the drop is less than its cross-section radius.
    let drop = ctx.up.dot(&(center - hit.point));
    Some(RibSurface {
        point: hit.point,
        normal: hit.normal,
        depth: rib.radius - drop,
        friction: hit.friction,
    })
}

/// Arc-sampling strategy: project a dense set of cross-section surface
/// points down onto the candidates and keep the deepest.
fn resolve_sampling(
    rib: &Rib,
    center: Point3<f64>,
    ctx: &ResolveContext,
    mesh: &GroundMesh,
    candidates: &[u32],
    prev_friction: f64,
) -> Option<RibSurface> {
    let arc = SAMPLING_ARC_DEG.to_radians();
    // Odd sample count keeps the straight-down sample in the set, so the
    // flat-ground case reproduces the geometric strategy exactly.
    let samples = (ctx.sampling_resolution | 1).max(3);
    let clearance = CAST_CLEARANCE_FACTOR * ctx.max_radius;
    let range = CAST_RANGE_FACTOR * ctx.max_radius;

    let mut best: Option<(f64, RayHit)> = None;
    for k in 0..samples {
        let theta = -arc + 2.0 * arc * (k as f64) / ((samples - 1) as f64);
        let surface_point =
            center + (ctx.forward * theta.sin() - ctx.up * theta.cos()) * rib.radius;
        let origin = surface_point + ctx.up * clearance;

        // Uppermost ground surface under this sample
        let mut closest: Option<RayHit> = None;
        for &idx in candidates {
            if let Some(hit) = mesh.triangle(idx).ray_intersect(origin, -ctx.up, range) {
                closest = Some(match closest {
                    None => hit,
                    Some(current) => pick_closer(current, hit, prev_friction),
                });
            }
        }

        if let Some(hit) = closest {
            let depth = ctx.up.dot(&(hit.point - surface_point));
            let replace = match &best {
                None => true,
                Some((best_depth, best_hit)) => {
                    if (depth - best_depth).abs() <= DEPTH_TIE_TOLERANCE {
                        (hit.friction - prev_friction).abs()
                            < (best_hit.friction - prev_friction).abs()
                    } else {
                        depth > *best_depth
                    }
                }
            };
            if replace {
                best = Some((depth, hit));
            }
        }
    }

    best.map(|(depth, hit)| RibSurface {
        point: hit.point,
        normal: hit.normal,
        depth,
        friction: hit.friction,
    })
}

/// Keep the closer of two hits on the same ray; depths equal within
/// tolerance prefer the friction closest to the previous step (stability
/// heuristic), first-found on a full tie.
fn pick_closer(current: RayHit, candidate: RayHit, prev_friction: f64) -> RayHit {
    if (current.distance - candidate.distance).abs() <= DEPTH_TIE_TOLERANCE {
        if (candidate.friction - prev_friction).abs() < (current.friction - prev_friction).abs() {
            candidate
        } else {
            current
        }
    } else if candidate.distance < current.distance {
        candidate
    } else {
        current
    }
}

/// Analytic resolution of one rib against a plane.
///
/// The deepest point of the rib circle is its support point toward the
/// plane: along the plane normal with the wheel-axis component removed
/// (same construction as a cylinder rim against a plane). Always succeeds.
pub(crate) fn resolve_rib_flat(
    rib: &Rib,
    center: Point3<f64>,
    ctx: &ResolveContext,
    plane: &FlatPlane,
) -> RibSurface {
    let n = plane.normal.into_inner();
    let radial = n - ctx.lateral * n.dot(&ctx.lateral);
    let radial_len = radial.norm();

    let support = if radial_len > GEOM_EPSILON {
        center - radial * (rib.radius / radial_len)
    } else {
        // Plane normal along the wheel axis: every circle point is
        // equidistant, pick the one straight toward the plane.
        center - n * rib.radius
    };

    RibSurface {
        point: plane.project(&support),
        normal: n,
        depth: -plane.signed_distance(&support),
        friction: plane.friction,
    }
}
