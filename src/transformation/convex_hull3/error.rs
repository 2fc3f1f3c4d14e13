/// Errors that can occur during convex hull computation.
///
/// The incremental algorithm behind [`try_convex_hull`] can fail when the input is degenerate
/// (too few points, coplanar or collinear points), contains invalid data (NaN values,
/// duplicates), or when floating-point rounding breaks the topology of the hull being built.
///
/// The shattering pipeline never surfaces these errors: a fragment whose hull cannot be
/// computed is emitted as a shell instead.
///
/// ```
/// use shard3d::transformation::{try_convex_hull, ConvexHullError};
/// use nalgebra::Point3;
///
/// let flat = vec![
///     Point3::new(0.0, 0.0, 0.0),
///     Point3::new(1.0, 0.0, 0.0),
///     Point3::new(0.0, 1.0, 0.0),
///     Point3::new(1.0, 1.0, 0.0),
/// ];
///
/// assert_eq!(
///     try_convex_hull(&flat),
///     Err(ConvexHullError::FlatInput { dimension: 2 })
/// );
/// ```
///
/// [`try_convex_hull`]: crate::transformation::try_convex_hull
#[derive(thiserror::Error, Debug, PartialEq)]
pub enum ConvexHullError {
    /// An internal error occurred during convex hull computation.
    ///
    /// This is generally the consequence of rounding errors on nearly degenerate input.
    #[error("Internal error: {0}")]
    InternalError(&'static str),

    /// The algorithm could not find a valid support point.
    ///
    /// The input contains points with NaN or infinite coordinates.
    #[error("Input points are either invalid (NaN) or are almost coplanar.")]
    MissingSupportPoint,

    /// Less than 4 points were provided.
    #[error("Less than 4 points were given to the convex-hull algorithm.")]
    IncompleteInput,

    /// The points span less than three dimensions, so they do not enclose any volume.
    ///
    /// `dimension` is 0 for coincident points, 1 for collinear points, and 2 for coplanar
    /// points.
    #[error("Input points span only {dimension} dimension(s).")]
    FlatInput {
        /// The dimension of the affine space spanned by the input.
        dimension: usize,
    },

    /// An edge of the output is used by a single triangle, so the hull is not closed.
    #[error("Detected unfinished triangle")]
    UnfinishedTriangle,

    /// An edge of the output is shared by more than two triangles.
    ///
    /// The error reports the triangle index where the T-junction was detected and the vertex
    /// indices forming the problematic edge.
    #[error("Detected t-junction for triangle {0}, edge: ({1}, {2})")]
    TJunction(usize, u32, u32),

    /// The output contains two vertices at the same location.
    #[error("Detected duplicate points {0} and {1}")]
    DuplicatePoints(usize, usize),
}
