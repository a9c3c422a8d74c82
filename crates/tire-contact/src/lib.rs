//! Shell/ground contact resolution for tire simulation.
//!
//! Given the rigid pose of a tire shell and a [`Ground`](tire_ground::Ground)
//! representation, the engine resolves — once per simulation step — the
//! contact geometry a tire force model needs: per-rib contact frames and
//! penetration depths, and a best-fit aggregate shell frame.
//!
//! - [`ShapeProfile`] - Superellipse cross-section of the shell
//! - [`Rib`] - One lateral cross-section, resolved independently
//! - [`ShellContactEngine`] - Per-wheel orchestration, fallback policy,
//!   contact history
//! - [`ShellRegistry`] / [`ShellHandle`] - Opaque-token lifecycle for host
//!   adapters
//!
//! # Resolution Pipeline
//!
//! 1. Project the shell's bounding volume onto the ground XY plane and
//!    query the mesh for candidate triangles under that footprint.
//! 2. Resolve each rib against the candidates (single-ray geometric or
//!    dense arc sampling), in parallel across ribs.
//! 3. Fit one shell contact frame from the per-rib results.
//! 4. If no real ground was found anywhere under the shell, resolve the
//!    whole shell against a cached virtual plane instead and report
//!    `in_mesh = false`. The cached plane is refit from every successful
//!    resolution, so the fallback tracks the last good contact across mesh
//!    gaps.
//!
//! # Example
//!
//! ```
//! use tire_contact::ShellContactEngine;
//! use tire_ground::{FlatPlane, Ground};
//! use tire_types::{EnvelopingMethod, Pose, ProfileParams, ShellConfig};
//! use nalgebra::Point3;
//!
//! let config = ShellConfig::new(9, ProfileParams::default());
//! let mut engine = ShellContactEngine::new(&config).unwrap();
//!
//! let ground = Ground::Flat(FlatPlane::default());
//! let pose = Pose::from_position(Point3::new(0.0, 0.0, 0.3));
//! let contact = engine.resolve(&ground, &pose, EnvelopingMethod::Geometric, false, 1e-3);
//!
//! assert!(contact.in_mesh);
//! assert!(contact.depth > 0.0);
//! ```

#![cfg_attr(not(test), deny(clippy::unwrap_used, clippy::expect_used))]
#![warn(missing_docs)]
#![warn(clippy::all)]
#![warn(clippy::pedantic)]
// Rib counts stay far below 2^52.
#![allow(clippy::cast_precision_loss)]

mod aggregate;
mod engine;
mod error;
mod profile;
mod registry;
mod rib;

pub use engine::ShellContactEngine;
pub use error::EngineError;
pub use profile::ShapeProfile;
pub use registry::{ShellHandle, ShellRegistry};
pub use rib::Rib;

// Re-export the companion crates' surface so hosts can depend on one crate
pub use tire_ground::{
    load_ground_mesh, FlatPlane, Ground, GroundError, GroundMesh, GroundTriangle,
};
pub use tire_types::{
    EnvelopingMethod, Pose, ProfileParams, RibContact, ShellConfig, ShellContact,
    ShellContactReport, MAX_RIBS,
};
