//! Core types for tire shell/ground contact resolution.
//!
//! This crate provides the foundational types shared by the ground
//! representation and the contact engine:
//!
//! - [`Pose`] - Rigid transform of the shell hub relative to the ground frame
//! - [`RibContact`] / [`ShellContact`] - Per-rib and aggregate contact results
//! - [`ShellContactReport`] - Fixed-size host buffer with NaN sentinels
//! - [`EnvelopingMethod`] - Selector between the two rib resolution strategies
//! - [`ProfileParams`] / [`ShellConfig`] - Construction-time configuration
//!
//! # Design Philosophy
//!
//! These types are **pure data**. They have no geometry queries, no contact
//! resolution, no I/O. They're the common language between:
//!
//! - Ground representations (tire-ground)
//! - The contact engine (tire-contact)
//! - Host co-simulation adapters (fixed-size signal buffers)
//!
//! # Coordinate System
//!
//! Right-handed, consistent across the workspace:
//!
//! - X: forward (rolling direction)
//! - Y: lateral (wheel spin axis)
//! - Z: up
//!
//! # Example
//!
//! ```
//! use tire_types::{Pose, RibContact};
//! use nalgebra::Point3;
//!
//! let hub = Pose::from_position(Point3::new(0.0, 0.0, 0.3));
//! assert!(hub.up().z > 0.99);
//!
//! let missed = RibContact::invalid();
//! assert!(!missed.valid);
//! ```

#![cfg_attr(not(test), deny(clippy::unwrap_used, clippy::expect_used))]
#![warn(missing_docs)]
#![warn(clippy::all)]
#![warn(clippy::pedantic)]
// Counts converted to f64 stay far below 2^52.
#![allow(clippy::cast_precision_loss)]
// Many constructors can't be const because of nalgebra internals.
#![allow(clippy::missing_const_for_fn)]

mod config;
mod contact;
mod pose;

pub use config::{ProfileParams, ShellConfig, DEFAULT_SAMPLING_RESOLUTION};
pub use contact::{
    EnvelopingMethod, RibContact, ShellContact, ShellContactReport, MAX_RIBS,
};
pub use pose::Pose;

// Re-export math types for convenience
pub use nalgebra::{Matrix4, Point3, UnitQuaternion, UnitVector3, Vector3};
