use crate::bounding_volume::Aabb;
use crate::math::{Point, Real, Vector};
use crate::shape::Triangle;
use core::sync::atomic::{AtomicUsize, Ordering};
use std::sync::Arc;

/// How the geometry of a fragment was obtained.
#[cfg_attr(
    feature = "serde-serialize",
    derive(serde::Serialize, serde::Deserialize)
)]
#[derive(Copy, Clone, Debug, PartialEq, Eq, Hash)]
pub enum GeometryKind {
    /// The convex hull of the fragment points: a closed, outward-facing surface.
    Solid,
    /// The original triangles of the fragment, possibly open and non-manifold.
    Shell,
}

#[derive(Debug, Default)]
struct LedgerCounts {
    allocated: AtomicUsize,
    released: AtomicUsize,
}

/// Shared bookkeeping of the fragment geometry currently alive.
///
/// Every [`FragmentMesh`] holds a [`GeometryLease`] taken from a ledger. The lease is
/// released when the mesh is dropped, so a renderer mirroring fragment buffers (or a
/// test) can check that replacing or clearing a fragment set released all of them.
#[derive(Clone, Debug, Default)]
pub struct GeometryLedger {
    counts: Arc<LedgerCounts>,
}

impl GeometryLedger {
    /// Creates an empty ledger.
    pub fn new() -> Self {
        Self::default()
    }

    /// Registers a new piece of geometry.
    pub fn lease(&self) -> GeometryLease {
        let _ = self.counts.allocated.fetch_add(1, Ordering::AcqRel);
        GeometryLease {
            ledger: self.clone(),
        }
    }

    /// Total number of leases ever handed out.
    pub fn allocated(&self) -> usize {
        self.counts.allocated.load(Ordering::Acquire)
    }

    /// Total number of leases released.
    pub fn released(&self) -> usize {
        self.counts.released.load(Ordering::Acquire)
    }

    /// Number of leases still alive.
    pub fn live(&self) -> usize {
        self.allocated() - self.released()
    }
}

/// Proof of ownership of one piece of fragment geometry.
///
/// Released exactly once, when dropped.
#[derive(Debug)]
pub struct GeometryLease {
    ledger: GeometryLedger,
}

impl Drop for GeometryLease {
    fn drop(&mut self) {
        let _ = self.ledger.counts.released.fetch_add(1, Ordering::AcqRel);
    }
}

/// The owned, indexed geometry of a fragment.
#[derive(Debug)]
pub struct FragmentMesh {
    kind: GeometryKind,
    vertices: Vec<Point<Real>>,
    indices: Vec<[u32; 3]>,
    normals: Vec<Vector<Real>>,
    aabb: Aabb,
    _lease: GeometryLease,
}

impl FragmentMesh {
    /// Creates solid geometry from a convex hull vertex and index buffer.
    pub fn solid(vertices: Vec<Point<Real>>, indices: Vec<[u32; 3]>, lease: GeometryLease) -> Self {
        Self::with_kind(GeometryKind::Solid, vertices, indices, lease)
    }

    /// Creates shell geometry made of verbatim copies of `triangles`.
    pub fn shell(triangles: &[Triangle], lease: GeometryLease) -> Self {
        let vertices: Vec<_> = triangles.iter().flat_map(|tri| tri.vertices()).collect();
        let indices = (0..triangles.len() as u32)
            .map(|i| [i * 3, i * 3 + 1, i * 3 + 2])
            .collect();
        Self::with_kind(GeometryKind::Shell, vertices, indices, lease)
    }

    fn with_kind(
        kind: GeometryKind,
        vertices: Vec<Point<Real>>,
        indices: Vec<[u32; 3]>,
        lease: GeometryLease,
    ) -> Self {
        let normals = vertex_normals(&vertices, &indices);
        let aabb = Aabb::from_points_ref(&vertices);

        Self {
            kind,
            vertices,
            indices,
            normals,
            aabb,
            _lease: lease,
        }
    }

    /// Whether this is a hull or a shell.
    #[inline]
    pub fn kind(&self) -> GeometryKind {
        self.kind
    }

    /// The vertex buffer.
    #[inline]
    pub fn vertices(&self) -> &[Point<Real>] {
        &self.vertices
    }

    /// The index buffer.
    #[inline]
    pub fn indices(&self) -> &[[u32; 3]] {
        &self.indices
    }

    /// The per-vertex normals, parallel to [`Self::vertices`].
    #[inline]
    pub fn normals(&self) -> &[Vector<Real>] {
        &self.normals
    }

    /// The local-space AABB of this geometry.
    #[inline]
    pub fn local_aabb(&self) -> &Aabb {
        &self.aabb
    }

    /// The number of triangles.
    #[inline]
    pub fn num_triangles(&self) -> usize {
        self.indices.len()
    }

    /// Iterates through the triangles of this geometry.
    pub fn triangles(&self) -> impl ExactSizeIterator<Item = Triangle> + '_ {
        self.indices.iter().map(|idx| {
            Triangle::new(
                self.vertices[idx[0] as usize],
                self.vertices[idx[1] as usize],
                self.vertices[idx[2] as usize],
            )
        })
    }

    /// The non-indexed position buffer: three points per triangle.
    pub fn positions(&self) -> Vec<Point<Real>> {
        self.triangles().flat_map(|tri| tri.vertices()).collect()
    }
}

// Angle-weighted face normals, accumulated per vertex.
fn vertex_normals(vertices: &[Point<Real>], indices: &[[u32; 3]]) -> Vec<Vector<Real>> {
    let mut normals = vec![Vector::zeros(); vertices.len()];

    for idx in indices {
        let tri = Triangle::new(
            vertices[idx[0] as usize],
            vertices[idx[1] as usize],
            vertices[idx[2] as usize],
        );

        if let Some(n) = tri.normal() {
            let angles = tri.angles();
            for k in 0..3 {
                normals[idx[k] as usize] += *n * angles[k];
            }
        }
    }

    for n in &mut normals {
        *n = n.try_normalize(crate::math::DEFAULT_EPSILON).unwrap_or_else(Vector::zeros);
    }

    normals
}
