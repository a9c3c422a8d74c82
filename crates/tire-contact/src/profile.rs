//! Superellipse cross-section profile of the shell.

use tire_types::ProfileParams;

use crate::error::EngineError;

/// Immutable cross-section geometry model of one shell.
///
/// The surface radius at lateral offset `y` follows the superellipse law
///
/// ```text
/// r(y) = rx * (1 - (|y|/ry)^my)^(1/mx),   |y| <= ly
/// ```
///
/// so `rx` is the centerline radius, `ry`/`my` shape the lateral falloff,
/// and `mx` shapes the radial curvature. Offsets outside the tread
/// half-width `ly` are clamped to the domain boundary.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct ShapeProfile {
    rx: f64,
    mx: f64,
    ry: f64,
    my: f64,
    ly: f64,
}

impl ShapeProfile {
    /// Validate the parameters and build a profile.
    ///
    /// # Errors
    ///
    /// [`EngineError::InvalidProfile`] when any parameter is non-positive
    /// or non-finite, or when `ly > ry` (the tread would extend past the
    /// superellipse domain and the radius law becomes complex-valued).
    pub fn new(params: &ProfileParams) -> Result<Self, EngineError> {
        let checks = [
            (params.rx, "rx"),
            (params.mx, "mx"),
            (params.ry, "ry"),
            (params.my, "my"),
            (params.ly, "ly"),
        ];
        for (value, name) in checks {
            if !value.is_finite() || value <= 0.0 {
                return Err(EngineError::invalid_profile(format!(
                    "{name} must be positive and finite, got {value}"
                )));
            }
        }
        if params.ly > params.ry {
            return Err(EngineError::invalid_profile(format!(
                "half-width ly ({}) exceeds lateral reference ry ({})",
                params.ly, params.ry
            )));
        }
        Ok(Self {
            rx: params.rx,
            mx: params.mx,
            ry: params.ry,
            my: params.my,
            ly: params.ly,
        })
    }

    /// Centerline (maximum) radius.
    #[must_use]
    pub fn max_radius(&self) -> f64 {
        self.rx
    }

    /// Tread half-width, the rib placement domain.
    #[must_use]
    pub fn half_width(&self) -> f64 {
        self.ly
    }

    /// Clamp a lateral offset into the profile domain.
    fn clamp_offset(&self, y: f64) -> f64 {
        y.clamp(-self.ly, self.ly)
    }

    /// Cross-section surface radius at lateral offset `y`.
    #[must_use]
    pub fn surface_radius(&self, y: f64) -> f64 {
        let y = self.clamp_offset(y);
        let u = (y.abs() / self.ry).powf(self.my);
        self.rx * (1.0 - u).powf(1.0 / self.mx)
    }

    /// Analytic derivative dr/dy at lateral offset `y`.
    ///
    /// Zero at the centerline; negative on the positive-y shoulder.
    #[must_use]
    pub fn surface_derivative(&self, y: f64) -> f64 {
        let y = self.clamp_offset(y);
        if y == 0.0 {
            return 0.0;
        }
        let u = (y.abs() / self.ry).powf(self.my);
        // d/dy [rx (1-u)^(1/mx)] with du/dy = my * u / y
        -self.rx * (1.0 - u).powf(1.0 / self.mx - 1.0) * self.my * u / (self.mx * y)
    }

    /// Tangent angle of the cross-section at lateral offset `y`, radians.
    #[must_use]
    pub fn surface_angle(&self, y: f64) -> f64 {
        self.surface_derivative(y).atan()
    }
}
