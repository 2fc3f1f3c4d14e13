use crate::bounding_volume::Aabb;
use crate::math::{Point, Real, Rotation, Vector};
use crate::shape::Triangle;

/// Errors that can occur when building a [`TriangleSoup`] from indexed geometry.
#[derive(thiserror::Error, Copy, Clone, Debug, PartialEq, Eq)]
pub enum TriangleSoupError {
    /// A triangle references a vertex that does not exist.
    #[error("triangle {triangle} references vertex {index}, but only {num_vertices} vertices exist")]
    IndexOutOfBounds {
        /// The faulty triangle.
        triangle: usize,
        /// The out-of-bounds vertex index.
        index: u32,
        /// The length of the vertex buffer.
        num_vertices: usize,
    },
}

/// The object-space placement of a mesh: position, rotation and non-uniform scale.
///
/// Fragments inherit the placement of the mesh they were cut from, so that a
/// freshly shattered set lines up exactly with the source object.
#[cfg_attr(
    feature = "serde-serialize",
    derive(serde::Serialize, serde::Deserialize)
)]
#[derive(Copy, Clone, Debug, PartialEq)]
pub struct MeshPlacement {
    /// The translation of the mesh.
    pub position: Point<Real>,
    /// The orientation of the mesh.
    pub rotation: Rotation<Real>,
    /// The per-axis scale of the mesh.
    pub scale: Vector<Real>,
}

impl Default for MeshPlacement {
    fn default() -> Self {
        Self {
            position: Point::origin(),
            rotation: Rotation::identity(),
            scale: Vector::repeat(1.0),
        }
    }
}

/// A non-indexed triangle mesh.
///
/// Every triangle owns its three vertices: no topology is shared between triangles.
/// This is the input of the partitioner.
#[derive(Clone, Debug, Default, PartialEq)]
pub struct TriangleSoup {
    triangles: Vec<Triangle>,
    placement: MeshPlacement,
}

impl TriangleSoup {
    /// Creates a mesh from its triangles.
    pub fn new(triangles: Vec<Triangle>) -> Self {
        Self {
            triangles,
            placement: MeshPlacement::default(),
        }
    }

    /// Creates a mesh from a flat position buffer, three consecutive points per triangle.
    ///
    /// Trailing positions that do not form a full triangle are ignored.
    pub fn from_positions(positions: &[Point<Real>]) -> Self {
        let triangles = positions
            .chunks_exact(3)
            .map(|tri| Triangle::new(tri[0], tri[1], tri[2]))
            .collect();
        Self::new(triangles)
    }

    /// Creates a mesh from an indexed triangle mesh, copying every referenced vertex.
    pub fn from_indexed(
        vertices: &[Point<Real>],
        indices: &[[u32; 3]],
    ) -> Result<Self, TriangleSoupError> {
        let mut triangles = Vec::with_capacity(indices.len());

        for (triangle, idx) in indices.iter().enumerate() {
            let mut pts = [Point::origin(); 3];

            for k in 0..3 {
                pts[k] = *vertices.get(idx[k] as usize).ok_or(
                    TriangleSoupError::IndexOutOfBounds {
                        triangle,
                        index: idx[k],
                        num_vertices: vertices.len(),
                    },
                )?;
            }

            triangles.push(Triangle::from(pts));
        }

        Ok(Self::new(triangles))
    }

    /// Sets the object-space placement of this mesh.
    #[must_use]
    pub fn with_placement(mut self, placement: MeshPlacement) -> Self {
        self.placement = placement;
        self
    }

    /// The object-space placement of this mesh.
    #[inline]
    pub fn placement(&self) -> &MeshPlacement {
        &self.placement
    }

    /// The triangles of this mesh.
    #[inline]
    pub fn triangles(&self) -> &[Triangle] {
        &self.triangles
    }

    /// The number of triangles of this mesh.
    #[inline]
    pub fn len(&self) -> usize {
        self.triangles.len()
    }

    /// Does this mesh contain no triangle at all?
    #[inline]
    pub fn is_empty(&self) -> bool {
        self.triangles.is_empty()
    }

    /// Iterates through all the vertex copies of this mesh.
    pub fn vertices(&self) -> impl Iterator<Item = Point<Real>> + '_ {
        self.triangles.iter().flat_map(|tri| tri.vertices())
    }

    /// The local-space AABB of this mesh.
    ///
    /// Returns [`Aabb::new_invalid`] if the mesh is empty.
    pub fn local_aabb(&self) -> Aabb {
        Aabb::from_points(self.vertices())
    }

    /// The center of the local-space AABB of this mesh.
    ///
    /// This is the origin of every explosion direction.
    pub fn center(&self) -> Point<Real> {
        if self.is_empty() {
            Point::origin()
        } else {
            self.local_aabb().center()
        }
    }
}
