//! Transformation of point sets and meshes: convex hulls and file import.

pub use self::convex_hull3::{check_convex_hull, try_convex_hull, ConvexHullError};

mod convex_hull3;
pub(crate) mod convex_hull_utils;

#[cfg(feature = "wavefront")]
pub mod wavefront;
