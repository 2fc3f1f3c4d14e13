//! Mesh shattering: partitioning, fragment construction, and explosion poses.

pub use self::config::{
    ConfigError, ShatterConfig, ShatterVolume, EXPLOSION_SCALE, MIN_FRAGMENT_POINTS, SPIN_SCALE,
};
pub use self::fragment::{build_fragment, build_fragments, Fragment};
pub use self::partition::{nearest_seed, partition, partition_with_seeds, sample_seeds, FragmentBucket};
pub use self::pose::{random_unit_vector, FragmentPose, PosePlanner};
pub use self::session::{shatter, ShatterSession};

mod config;
mod fragment;
mod partition;
mod pose;
mod session;
