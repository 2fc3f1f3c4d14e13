//! Loading of Wavefront (`.obj`) files as triangle soups.
//!
//! This module is enabled by the `wavefront` feature flag.

use crate::math::{Point, Real};
use crate::shape::{Triangle, TriangleSoup};
use obj::{IndexTuple, ObjData, ObjError};
use std::io::Read;
use std::path::Path;

/// Errors that can occur when loading a mesh from a Wavefront file.
#[derive(thiserror::Error, Debug)]
pub enum MeshLoadError {
    /// The file could not be opened.
    #[error("failed to open the Wavefront file: {0}")]
    Io(#[from] std::io::Error),
    /// The file could not be parsed.
    #[error("failed to load the Wavefront data: {0}")]
    Obj(#[from] ObjError),
    /// A face references a vertex position that does not exist.
    #[error("face references position {index}, but only {num_positions} positions exist")]
    IndexOutOfBounds {
        /// The faulty position index.
        index: usize,
        /// The number of positions in the file.
        num_positions: usize,
    },
}

impl TriangleSoup {
    /// Loads every face of a Wavefront (`.obj`) file at the given path.
    ///
    /// Polygons with more than three vertices are fan-triangulated. Faces with less than
    /// three vertices (lines, points) are ignored.
    pub fn from_obj_file(path: impl AsRef<Path>) -> Result<Self, MeshLoadError> {
        let file = std::fs::File::open(path)?;
        Self::from_obj_reader(std::io::BufReader::new(file))
    }

    /// Loads every face of Wavefront data read from `input`.
    pub fn from_obj_reader(input: impl Read) -> Result<Self, MeshLoadError> {
        let data = ObjData::load_buf(input)?;
        let position = |tuple: &IndexTuple| -> Result<Point<Real>, MeshLoadError> {
            data.position
                .get(tuple.0)
                .map(|p| Point::new(p[0], p[1], p[2]))
                .ok_or(MeshLoadError::IndexOutOfBounds {
                    index: tuple.0,
                    num_positions: data.position.len(),
                })
        };

        let mut triangles = Vec::new();

        for object in &data.objects {
            for group in &object.groups {
                for poly in &group.polys {
                    if poly.0.len() < 3 {
                        continue;
                    }

                    let first = position(&poly.0[0])?;
                    for k in 1..poly.0.len() - 1 {
                        triangles.push(Triangle::new(
                            first,
                            position(&poly.0[k])?,
                            position(&poly.0[k + 1])?,
                        ));
                    }
                }
            }
        }

        Ok(TriangleSoup::new(triangles))
    }
}
