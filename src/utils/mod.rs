//! Various unsorted geometrical and logical operators.

pub use self::center::center;
pub use self::cleanup::remove_unused_points;
pub use self::cov::{center_cov, cov};
pub use self::dedup::{dedup_points, PointKey};
pub use self::isometry_ops::IsometryOps;
pub use self::sorted_pair::SortedPair;

mod center;
mod cleanup;
mod cov;
mod dedup;
pub mod hashmap;
mod isometry_ops;
mod sorted_pair;
