//! Handle registry for host-owned engine instances.
//!
//! Host co-simulation adapters address engines through opaque tokens
//! instead of raw pointers: the registry owns the instances, handles are
//! plain identifiers, and destruction is idempotent and safe on handles
//! that were never created or were already destroyed.

use std::collections::HashMap;

use tire_types::ShellConfig;

use crate::engine::ShellContactEngine;
use crate::error::EngineError;

/// Opaque token identifying one engine instance in a [`ShellRegistry`].
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct ShellHandle(u64);

impl ShellHandle {
    /// Raw identifier value (for host-side bookkeeping/logging only).
    #[must_use]
    pub const fn raw(self) -> u64 {
        self.0
    }
}

impl std::fmt::Display for ShellHandle {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "Shell({})", self.0)
    }
}

/// Caller-owned collection of engine instances, one per wheel.
///
/// Handles stay unique for the registry's lifetime; a destroyed handle is
/// never reissued, so stale tokens resolve to `None` instead of aliasing a
/// newer engine.
#[derive(Debug, Default)]
pub struct ShellRegistry {
    engines: HashMap<u64, ShellContactEngine>,
    next_id: u64,
}

impl ShellRegistry {
    /// Create an empty registry.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Build a new engine and return its handle.
    ///
    /// # Errors
    ///
    /// The construction errors of [`ShellContactEngine::new`].
    pub fn create(&mut self, config: &ShellConfig) -> Result<ShellHandle, EngineError> {
        let engine = ShellContactEngine::new(config)?;
        let id = self.next_id;
        self.next_id += 1;
        self.engines.insert(id, engine);
        Ok(ShellHandle(id))
    }

    /// Destroy the engine behind `handle`.
    ///
    /// Idempotent: returns `true` when an engine was removed, `false` when
    /// the handle was unknown or already destroyed.
    pub fn destroy(&mut self, handle: ShellHandle) -> bool {
        self.engines.remove(&handle.0).is_some()
    }

    /// Shared access to an engine.
    #[must_use]
    pub fn engine(&self, handle: ShellHandle) -> Option<&ShellContactEngine> {
        self.engines.get(&handle.0)
    }

    /// Exclusive access to an engine (needed for `resolve`).
    #[must_use]
    pub fn engine_mut(&mut self, handle: ShellHandle) -> Option<&mut ShellContactEngine> {
        self.engines.get_mut(&handle.0)
    }

    /// Number of live engines.
    #[must_use]
    pub fn len(&self) -> usize {
        self.engines.len()
    }

    /// Whether the registry holds no engines.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.engines.is_empty()
    }

    /// Logical AND of every engine's latest `in_mesh` flag.
    ///
    /// Engines that have never resolved count as `false`. An empty registry
    /// is vacuously `true`.
    #[must_use]
    pub fn in_mesh_all(&self) -> bool {
        self.engines.values().all(|e| e.shell_contact().in_mesh)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use nalgebra::Point3;
    use tire_ground::{FlatPlane, Ground};
    use tire_types::{EnvelopingMethod, Pose, ProfileParams};

    fn config() -> ShellConfig {
        ShellConfig::new(4, ProfileParams::default())
    }

    #[test]
    fn test_create_destroy_idempotent() {
        let mut registry = ShellRegistry::new();
        let handle = registry.create(&config()).unwrap();
        assert_eq!(registry.len(), 1);

        assert!(registry.destroy(handle));
        assert!(!registry.destroy(handle));
        assert!(registry.engine(handle).is_none());
        assert!(registry.is_empty());
    }

    #[test]
    fn test_handles_not_reissued() {
        let mut registry = ShellRegistry::new();
        let first = registry.create(&config()).unwrap();
        registry.destroy(first);
        let second = registry.create(&config()).unwrap();
        assert_ne!(first, second);
        assert!(registry.engine(first).is_none());
        assert!(registry.engine(second).is_some());
    }

    #[test]
    fn test_create_propagates_config_error() {
        let mut registry = ShellRegistry::new();
        let bad = ShellConfig::new(0, ProfileParams::default());
        assert!(registry.create(&bad).is_err());
        assert!(registry.is_empty());
    }

    #[test]
    fn test_in_mesh_all() {
        let mut registry = ShellRegistry::new();
        assert!(registry.in_mesh_all()); // vacuous

        let a = registry.create(&config()).unwrap();
        let b = registry.create(&config()).unwrap();
        // Neither wheel has resolved yet
        assert!(!registry.in_mesh_all());

        let ground = Ground::Flat(FlatPlane::default());
        let pose = Pose::from_position(Point3::new(0.0, 0.0, 0.3));
        for handle in [a, b] {
            registry
                .engine_mut(handle)
                .unwrap()
                .resolve(&ground, &pose, EnvelopingMethod::Geometric, false, 0.0);
        }
        assert!(registry.in_mesh_all());
    }
}
