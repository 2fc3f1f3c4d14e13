/*!
shard3d
========

**shard3d** breaks a triangle mesh into spatially coherent fragments, drives
their explosion animation, and turns randomized shatters into labeled
object-detection samples.

The pipeline is:

1. [`shatter::partition`] assigns every triangle to its nearest random seed.
2. [`shatter::build_fragments`] turns each bucket into a convex solid or a shell.
3. [`shatter::PosePlanner`] gives every fragment a direction, spin axis and
   optional target position.
4. [`projection::project_aabb`] maps fragment bounds to screen-space boxes.
5. [`dataset::DatasetOrchestrator`] repeats the above to produce samples.
*/

#![deny(non_camel_case_types)]
#![deny(unused_parens)]
#![deny(non_upper_case_globals)]
#![deny(unused_results)]
#![warn(missing_docs)]
#![warn(unused_imports)]
#![allow(missing_copy_implementations)]
#![allow(clippy::too_many_arguments)]
#![allow(clippy::module_inception)]
#![allow(clippy::manual_range_contains)]

#[macro_use]
extern crate approx;

pub extern crate nalgebra as na;

pub mod bounding_volume;
pub mod dataset;
pub mod projection;
pub mod shape;
pub mod shatter;
pub mod transformation;
pub mod utils;

/// Aliases for the mathematical types used throughout this crate.
pub mod math {
    pub use na::{Isometry3, Matrix3, Matrix4, Point3, Translation3, UnitVector3, Vector3};
    use na::UnitQuaternion;

    /// The scalar type used throughout this crate.
    pub type Real = f32;

    /// The default tolerance used for geometric operations.
    pub const DEFAULT_EPSILON: Real = Real::EPSILON;

    /// The dimension of the space.
    pub const DIM: usize = 3;

    /// The point type.
    pub use Point3 as Point;

    /// The vector type.
    pub use Vector3 as Vector;

    /// The unit vector type.
    pub use UnitVector3 as UnitVector;

    /// The matrix type.
    pub use Matrix3 as Matrix;

    /// The transformation matrix type.
    pub use Isometry3 as Isometry;

    /// The rotation type.
    pub type Rotation<N> = UnitQuaternion<N>;

    /// The translation type.
    pub use Translation3 as Translation;
}
