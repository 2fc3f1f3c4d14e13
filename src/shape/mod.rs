//! Shapes handled by the shattering pipeline.

pub use self::fragment_mesh::{FragmentMesh, GeometryKind, GeometryLease, GeometryLedger};
pub use self::triangle::Triangle;
pub use self::triangle_soup::{MeshPlacement, TriangleSoup, TriangleSoupError};

mod fragment_mesh;
mod triangle;
mod triangle_soup;
