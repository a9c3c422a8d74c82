//! Ground description file loading.
//!
//! The format is line-oriented plain text:
//!
//! ```text
//! # comment
//! v <x> <y> <z>            vertex, ground-frame coordinates
//! f <i> <j> <k> [mu]       triangle, 0-based vertex indices, optional
//!                          friction factor (default 1.0)
//! ```
//!
//! Loading happens once at initialization; any malformed record is a fatal
//! [`GroundError`], reported before resolution calls are possible.

use std::fs;
use std::path::Path;

use nalgebra::Point3;
use tracing::info;

use crate::error::GroundError;
use crate::triangle::GroundTriangle;
use crate::{GroundMesh, Result};

/// Load a ground mesh from a description file.
///
/// # Errors
///
/// [`GroundError::FileNotFound`] when the path does not exist, otherwise
/// any parse/construction error from [`parse_ground_str`].
pub fn load_ground_mesh(path: impl AsRef<Path>) -> Result<GroundMesh> {
    let path = path.as_ref();
    if !path.exists() {
        return Err(GroundError::FileNotFound {
            path: path.to_path_buf(),
        });
    }
    let text = fs::read_to_string(path)?;
    let mesh = parse_ground_str(&text)?;
    info!(
        path = %path.display(),
        triangles = mesh.len(),
        "loaded ground mesh"
    );
    Ok(mesh)
}

/// Parse a ground description from text.
///
/// # Errors
///
/// [`GroundError::Parse`] for malformed records,
/// [`GroundError::IndexOutOfRange`] for dangling vertex references, and
/// the construction errors of [`GroundMesh::new`].
pub fn parse_ground_str(text: &str) -> Result<GroundMesh> {
    let mut vertices: Vec<Point3<f64>> = Vec::new();
    let mut triangles: Vec<GroundTriangle> = Vec::new();

    for (lineno, raw) in text.lines().enumerate() {
        let lineno = lineno + 1;
        let line = raw.trim();
        if line.is_empty() || line.starts_with('#') {
            continue;
        }

        let mut fields = line.split_whitespace();
        match fields.next() {
            Some("v") => {
                let coords = parse_floats(lineno, fields, 3)?;
                vertices.push(Point3::new(coords[0], coords[1], coords[2]));
            }
            Some("f") => {
                let rest: Vec<&str> = fields.collect();
                if rest.len() < 3 || rest.len() > 4 {
                    return Err(GroundError::parse(
                        lineno,
                        format!("expected 3 indices and optional friction, got {} fields", rest.len()),
                    ));
                }
                let mut idx = [0_usize; 3];
                for (slot, field) in idx.iter_mut().zip(&rest) {
                    *slot = field.parse().map_err(|e| {
                        GroundError::parse(lineno, format!("invalid vertex index {field:?}: {e}"))
                    })?;
                }
                let friction = match rest.get(3) {
                    Some(field) => field.parse().map_err(|e| {
                        GroundError::parse(lineno, format!("invalid friction {field:?}: {e}"))
                    })?,
                    None => 1.0,
                };
                let vertex = |i: usize| -> Result<Point3<f64>> {
                    vertices.get(i).copied().ok_or(GroundError::IndexOutOfRange {
                        line: lineno,
                        index: i,
                        len: vertices.len(),
                    })
                };
                triangles.push(GroundTriangle::new(
                    vertex(idx[0])?,
                    vertex(idx[1])?,
                    vertex(idx[2])?,
                    friction,
                ));
            }
            Some(other) => {
                return Err(GroundError::parse(
                    lineno,
                    format!("unknown record type {other:?}"),
                ));
            }
            None => unreachable!("empty lines are skipped above"),
        }
    }

    GroundMesh::new(triangles)
}

fn parse_floats<'a>(
    lineno: usize,
    fields: impl Iterator<Item = &'a str>,
    expected: usize,
) -> Result<Vec<f64>> {
    let mut values = Vec::with_capacity(expected);
    for field in fields {
        let value: f64 = field.parse().map_err(|e| {
            GroundError::parse(lineno, format!("invalid number {field:?}: {e}"))
        })?;
        values.push(value);
    }
    if values.len() != expected {
        return Err(GroundError::parse(
            lineno,
            format!("expected {expected} coordinates, got {}", values.len()),
        ));
    }
    Ok(values)
}
