//! Construction-time configuration for the contact engine.

#[cfg(feature = "serde")]
use serde::{Deserialize, Serialize};

/// Default sample count for the arc-sampling resolution strategy.
pub const DEFAULT_SAMPLING_RESOLUTION: usize = 64;

/// Superellipse cross-section parameters of the shell.
///
/// The cross-section radius at lateral offset `y` follows
/// `r(y) = rx * (1 - (|y|/ry)^my)^(1/mx)` on the domain `|y| <= ly`.
/// All parameters must be strictly positive and `ly <= ry`; validation
/// happens when the engine builds its `ShapeProfile`.
#[derive(Debug, Clone, Copy, PartialEq)]
#[cfg_attr(feature = "serde", derive(Serialize, Deserialize))]
pub struct ProfileParams {
    /// Unloaded radius at the centerline (m).
    pub rx: f64,
    /// Radial curvature exponent.
    pub mx: f64,
    /// Lateral reference half-width of the superellipse (m).
    pub ry: f64,
    /// Lateral curvature exponent.
    pub my: f64,
    /// Half-width of the tread, the rib placement domain (m).
    pub ly: f64,
}

impl Default for ProfileParams {
    /// A generic passenger-car sized profile.
    fn default() -> Self {
        Self {
            rx: 0.35,
            mx: 2.0,
            ry: 0.12,
            my: 2.0,
            ly: 0.1,
        }
    }
}

/// Configuration of one shell contact engine (one wheel).
#[derive(Debug, Clone, Copy, PartialEq)]
#[cfg_attr(feature = "serde", derive(Serialize, Deserialize))]
pub struct ShellConfig {
    /// Number of ribs, `1..=MAX_RIBS`.
    pub rib_count: usize,
    /// Cross-section shape parameters.
    pub profile: ProfileParams,
    /// Minimum penetration for a rib to contribute depth weight to the
    /// aggregate frame fit. Ribs below the threshold still report their
    /// signed depth.
    pub depth_threshold: f64,
    /// Sample count for [`EnvelopingMethod::Sampling`](crate::EnvelopingMethod).
    pub sampling_resolution: usize,
}

impl ShellConfig {
    /// Config with the given rib count and profile, default tuning.
    #[must_use]
    pub fn new(rib_count: usize, profile: ProfileParams) -> Self {
        Self {
            rib_count,
            profile,
            depth_threshold: 0.0,
            sampling_resolution: DEFAULT_SAMPLING_RESOLUTION,
        }
    }

    /// Override the depth threshold.
    #[must_use]
    pub fn with_depth_threshold(mut self, threshold: f64) -> Self {
        self.depth_threshold = threshold;
        self
    }

    /// Override the sampling resolution.
    #[must_use]
    pub fn with_sampling_resolution(mut self, samples: usize) -> Self {
        self.sampling_resolution = samples.max(2);
        self
    }
}

impl Default for ShellConfig {
    fn default() -> Self {
        Self::new(8, ProfileParams::default())
    }
}
