//! Shell contact engine: per-step orchestration and fallback policy.

use nalgebra::Point3;
use rayon::prelude::*;
use tracing::{debug, info};

use tire_ground::{FlatPlane, Ground, ShadowRect};
use tire_types::{
    EnvelopingMethod, Pose, RibContact, ShellConfig, ShellContact, ShellContactReport, MAX_RIBS,
};

use crate::aggregate::{fit_shell_frame, tangent_frame};
use crate::error::EngineError;
use crate::profile::ShapeProfile;
use crate::rib::{resolve_rib_flat, resolve_rib_mesh, ResolveContext, Rib, RibSurface};

/// Contact resolution engine for one shell (one wheel).
///
/// Owns the rib layout, the per-rib contact history (previous depths and
/// frictions), and the cached virtual plane used when no real ground is
/// found. The ground itself is shared read-only; several engines may
/// resolve against the same [`Ground`] concurrently.
#[derive(Debug, Clone)]
pub struct ShellContactEngine {
    profile: ShapeProfile,
    ribs: Vec<Rib>,
    depth_threshold: f64,
    sampling_resolution: usize,
    /// Fallback plane tracking the last successful contact.
    virtual_plane: FlatPlane,
    prev_rib_depths: Vec<f64>,
    prev_rib_frictions: Vec<f64>,
    prev_shell_depth: f64,
    rib_contacts: Vec<RibContact>,
    shell_contact: ShellContact,
}

impl ShellContactEngine {
    /// Build an engine with `config.rib_count` ribs spaced evenly across
    /// the tread half-width.
    ///
    /// # Errors
    ///
    /// [`EngineError::RibCountExceeded`] for a rib count of zero or above
    /// [`MAX_RIBS`], [`EngineError::InvalidProfile`] for malformed shape
    /// parameters. No partial state is retained on failure.
    pub fn new(config: &ShellConfig) -> Result<Self, EngineError> {
        if config.rib_count == 0 || config.rib_count > MAX_RIBS {
            return Err(EngineError::RibCountExceeded {
                requested: config.rib_count,
                max: MAX_RIBS,
            });
        }
        let profile = ShapeProfile::new(&config.profile)?;

        let n = config.rib_count;
        let ly = profile.half_width();
        let ribs: Vec<Rib> = (0..n)
            .map(|i| {
                let y = if n == 1 {
                    0.0
                } else {
                    -ly + 2.0 * ly * (i as f64) / ((n - 1) as f64)
                };
                Rib::new(&profile, y)
            })
            .collect();

        info!(
            ribs = n,
            radius = profile.max_radius(),
            half_width = ly,
            "built shell contact engine"
        );

        Ok(Self {
            profile,
            ribs,
            depth_threshold: config.depth_threshold,
            sampling_resolution: config.sampling_resolution.max(2),
            virtual_plane: FlatPlane::default(),
            prev_rib_depths: vec![0.0; n],
            prev_rib_frictions: vec![1.0; n],
            prev_shell_depth: 0.0,
            rib_contacts: vec![RibContact::invalid(); n],
            shell_contact: ShellContact::default(),
        })
    }

    /// Number of configured ribs.
    #[must_use]
    pub fn rib_count(&self) -> usize {
        self.ribs.len()
    }

    /// Rib layout (lateral offsets and cross-section radii).
    #[must_use]
    pub fn ribs(&self) -> &[Rib] {
        &self.ribs
    }

    /// The cross-section profile.
    #[must_use]
    pub fn profile(&self) -> &ShapeProfile {
        &self.profile
    }

    /// The cached virtual plane the fallback resolves against.
    #[must_use]
    pub fn virtual_plane(&self) -> &FlatPlane {
        &self.virtual_plane
    }

    /// Latest aggregate result.
    #[must_use]
    pub fn shell_contact(&self) -> &ShellContact {
        &self.shell_contact
    }

    /// Latest per-rib results.
    #[must_use]
    pub fn rib_contacts(&self) -> &[RibContact] {
        &self.rib_contacts
    }

    /// Fixed-size host report of the latest results (NaN sentinels in
    /// slots beyond the configured rib count).
    #[must_use]
    pub fn report(&self) -> ShellContactReport {
        ShellContactReport::new(&self.shell_contact, &self.rib_contacts)
    }

    /// Resolve the shell against the ground for one simulation step.
    ///
    /// - `flat_override` skips the ground entirely and resolves against the
    ///   cached virtual plane, reporting `in_mesh = true` (the override
    ///   always "succeeds").
    /// - A mesh ground with no triangles under the footprint (or none
    ///   intersecting any rib) degrades to the cached virtual plane with
    ///   `in_mesh = false`.
    /// - After every resolution the cached plane is refit from the fresh
    ///   shell frame, so later fallbacks track the last good contact.
    ///
    /// Never fails; always produces a result.
    pub fn resolve(
        &mut self,
        ground: &Ground,
        pose: &Pose,
        method: EnvelopingMethod,
        flat_override: bool,
        time_step: f64,
    ) -> &ShellContact {
        let ctx = self.context(pose);

        if flat_override {
            let plane = self.virtual_plane;
            self.resolve_with_plane(&plane, pose, &ctx, time_step, true);
            return &self.shell_contact;
        }

        match ground {
            Ground::Flat(plane) => {
                let plane = *plane;
                self.resolve_with_plane(&plane, pose, &ctx, time_step, true);
            }
            Ground::Mesh(mesh) => {
                let rect = self.shadow_rect(pose);
                let candidates = mesh.shadow_triangles(&rect);
                if candidates.is_empty() {
                    debug!("no triangles under footprint, using cached plane");
                    let plane = self.virtual_plane;
                    self.resolve_with_plane(&plane, pose, &ctx, time_step, false);
                } else {
                    let surfaces: Vec<Option<RibSurface>> = self
                        .ribs
                        .par_iter()
                        .zip(self.prev_rib_frictions.par_iter())
                        .map(|(rib, &prev_friction)| {
                            let center =
                                pose.transform_point(&Point3::new(0.0, rib.lateral_offset, 0.0));
                            resolve_rib_mesh(
                                rib,
                                center,
                                &ctx,
                                mesh,
                                &candidates,
                                method,
                                prev_friction,
                            )
                        })
                        .collect();

                    if surfaces.iter().all(Option::is_none) {
                        debug!(
                            candidates = candidates.len(),
                            "no rib intersected ground, using cached plane"
                        );
                        let plane = self.virtual_plane;
                        self.resolve_with_plane(&plane, pose, &ctx, time_step, false);
                    } else {
                        self.finish(pose, surfaces, time_step, true);
                    }
                }
            }
        }

        &self.shell_contact
    }

    /// Pose-derived quantities shared by all ribs of this call.
    fn context(&self, pose: &Pose) -> ResolveContext {
        ResolveContext {
            up: pose.up(),
            forward: pose.forward(),
            lateral: pose.lateral(),
            max_radius: self.profile.max_radius(),
            sampling_resolution: self.sampling_resolution,
        }
    }

    /// XY bounding box of the shell's oriented bounding volume under `pose`.
    fn shadow_rect(&self, pose: &Pose) -> ShadowRect {
        let rx = self.profile.max_radius();
        let ly = self.profile.half_width();
        let f = pose.forward();
        let l = pose.lateral();
        let u = pose.up();
        let ext_x = rx * f.x.abs() + ly * l.x.abs() + rx * u.x.abs();
        let ext_y = rx * f.y.abs() + ly * l.y.abs() + rx * u.y.abs();
        ShadowRect::from_center(pose.position.x, pose.position.y, ext_x, ext_y)
    }

    /// Resolve every rib analytically against `plane`.
    fn resolve_with_plane(
        &mut self,
        plane: &FlatPlane,
        pose: &Pose,
        ctx: &ResolveContext,
        time_step: f64,
        in_mesh: bool,
    ) {
        let surfaces: Vec<Option<RibSurface>> = self
            .ribs
            .iter()
            .map(|rib| {
                let center = pose.transform_point(&Point3::new(0.0, rib.lateral_offset, 0.0));
                Some(resolve_rib_flat(rib, center, ctx, plane))
            })
            .collect();
        self.finish(pose, surfaces, time_step, in_mesh);
    }

    /// Build per-rib contacts, fit the shell frame, update the history and
    /// the cached plane.
    fn finish(
        &mut self,
        pose: &Pose,
        surfaces: Vec<Option<RibSurface>>,
        time_step: f64,
        in_mesh: bool,
    ) {
        let Some(fit) = fit_shell_frame(pose, &surfaces, self.depth_threshold) else {
            // Callers only reach finish() with at least one resolved rib;
            // degrade to the cached plane if that ever breaks.
            let plane = self.virtual_plane;
            let ctx = self.context(pose);
            self.resolve_with_plane(&plane, pose, &ctx, time_step, false);
            return;
        };

        for (i, surface) in surfaces.iter().enumerate() {
            let contact = match surface {
                Some(s) => RibContact {
                    frame: Pose::from_position_rotation(
                        s.point,
                        tangent_frame(&s.normal, &pose.forward()),
                    ),
                    depth: s.depth,
                    depth_rate: depth_rate(s.depth, self.prev_rib_depths[i], time_step),
                    friction: s.friction,
                    valid: true,
                },
                None => RibContact::invalid(),
            };
            self.prev_rib_depths[i] = contact.depth;
            if contact.valid {
                self.prev_rib_frictions[i] = contact.friction;
            }
            self.rib_contacts[i] = contact;
        }

        let shell_rate = depth_rate(fit.depth, self.prev_shell_depth, time_step);
        self.prev_shell_depth = fit.depth;
        self.shell_contact = ShellContact {
            frame: fit.frame,
            depth: fit.depth,
            depth_rate: shell_rate,
            friction: fit.friction,
            in_mesh,
        };

        // Feedback loop: the fallback plane tracks the last good contact
        self.virtual_plane = FlatPlane::new(fit.frame.position, fit.frame.up(), fit.friction);
    }
}

/// `(depth - previous) / dt` for a positive time step, zero otherwise.
fn depth_rate(depth: f64, previous: f64, time_step: f64) -> f64 {
    if time_step > 0.0 {
        (depth - previous) / time_step
    } else {
        0.0
    }
}
