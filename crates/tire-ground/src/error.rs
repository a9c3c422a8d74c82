//! Error types for ground loading and construction.

use std::path::PathBuf;
use thiserror::Error;

/// Errors that can occur while loading or building a ground representation.
///
/// All of these are fatal at initialization time; no error is produced by
/// per-step queries.
#[derive(Debug, Error)]
pub enum GroundError {
    /// Ground description file not found.
    #[error("ground file not found: {path}")]
    FileNotFound {
        /// Path that was not found.
        path: PathBuf,
    },

    /// Malformed record in the ground description.
    #[error("ground file line {line}: {message}")]
    Parse {
        /// 1-based line number.
        line: usize,
        /// Description of what was invalid.
        message: String,
    },

    /// Triangle references a vertex that was never declared.
    #[error("ground file line {line}: vertex index {index} out of range (have {len})")]
    IndexOutOfRange {
        /// 1-based line number.
        line: usize,
        /// The offending index.
        index: usize,
        /// Number of declared vertices.
        len: usize,
    },

    /// Triangle with (near) zero area.
    #[error("degenerate ground triangle at index {index}")]
    DegenerateTriangle {
        /// Index of the triangle in the mesh.
        index: usize,
    },

    /// Ground description contained no triangles.
    #[error("ground description contains no triangles")]
    EmptyMesh,

    /// I/O error from the standard library.
    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),
}

impl GroundError {
    /// Create a `Parse` error for the given line.
    #[must_use]
    pub fn parse(line: usize, message: impl Into<String>) -> Self {
        Self::Parse {
            line,
            message: message.into(),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_error_display() {
        let err = GroundError::parse(3, "expected 3 coordinates");
        assert!(err.to_string().contains("line 3"));

        let err = GroundError::IndexOutOfRange {
            line: 7,
            index: 12,
            len: 4,
        };
        assert!(err.to_string().contains("12"));
        assert!(err.to_string().contains('4'));
    }
}
