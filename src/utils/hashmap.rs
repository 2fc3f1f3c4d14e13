//! The hash-map used by the geometric algorithms of this crate.

pub use hashbrown::hash_map::{Entry, HashMap};
