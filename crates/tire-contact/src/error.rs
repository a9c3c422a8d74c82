//! Engine construction errors.

use thiserror::Error;

/// Errors that can occur while building a shell contact engine.
///
/// Construction is the only failing operation; per-step resolution never
/// errors (no-ground conditions degrade to the virtual-plane fallback).
#[derive(Debug, Error, Clone, PartialEq, Eq)]
pub enum EngineError {
    /// Requested rib count is zero or exceeds the compile-time maximum.
    #[error("rib count {requested} outside supported range 1..={max}")]
    RibCountExceeded {
        /// The requested count.
        requested: usize,
        /// The compile-time maximum.
        max: usize,
    },

    /// Shape parameters are not a valid superellipse profile.
    #[error("invalid shape profile: {reason}")]
    InvalidProfile {
        /// Description of the offending parameter.
        reason: String,
    },
}

impl EngineError {
    /// Create an `InvalidProfile` error.
    #[must_use]
    pub fn invalid_profile(reason: impl Into<String>) -> Self {
        Self::InvalidProfile {
            reason: reason.into(),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_error_display() {
        let err = EngineError::RibCountExceeded {
            requested: 40,
            max: 16,
        };
        assert!(err.to_string().contains("40"));
        assert!(err.to_string().contains("16"));

        let err = EngineError::invalid_profile("rx must be positive");
        assert!(err.to_string().contains("rx"));
    }
}
