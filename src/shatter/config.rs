use crate::bounding_volume::Aabb;
use crate::math::{Point, Real, Vector};

/// Distance travelled along its explosion direction by a fragment at full force.
pub const EXPLOSION_SCALE: Real = 2.0;

/// Spin angle, in radians, of a fragment at full force and unit rotation force.
pub const SPIN_SCALE: Real = core::f32::consts::PI;

/// The minimum number of distinct points a bucket needs to become a fragment.
pub const MIN_FRAGMENT_POINTS: usize = 4;

/// Errors reported when validating a configuration.
#[derive(thiserror::Error, Copy, Clone, Debug, PartialEq)]
pub enum ConfigError {
    /// The shatter volume has a zero, negative, or non-finite extent.
    #[error("shatter volume half-extents must be positive and finite, got {0:?}")]
    InvalidVolume([Real; 3]),
    /// At least one fragment is required.
    #[error("the fragment count must be at least 1")]
    ZeroFragments,
    /// The capture viewport has no pixel.
    #[error("the viewport must be at least 1x1 pixels, got {width}x{height}")]
    EmptyViewport {
        /// The viewport width.
        width: u32,
        /// The viewport height.
        height: u32,
    },
    /// A `[min, max]` range with `min > max` or a non-finite bound.
    #[error("invalid range for {name}: [{min}, {max}]")]
    InvalidRange {
        /// The name of the faulty parameter.
        name: &'static str,
        /// The lower bound.
        min: Real,
        /// The upper bound.
        max: Real,
    },
}

/// An origin-centered box bounding the random target positions of fragments.
///
/// The volume never clips geometry: it only bounds where fragments fly to when volume
/// targeting is enabled.
#[cfg_attr(
    feature = "serde-serialize",
    derive(serde::Serialize, serde::Deserialize)
)]
#[derive(Copy, Clone, Debug, PartialEq)]
pub struct ShatterVolume {
    half_extents: Vector<Real>,
}

impl ShatterVolume {
    /// Creates a volume from its three half-extents.
    pub fn new(half_extents: Vector<Real>) -> Result<Self, ConfigError> {
        if half_extents.iter().all(|e| e.is_finite() && *e > 0.0) {
            Ok(Self { half_extents })
        } else {
            Err(ConfigError::InvalidVolume(half_extents.into()))
        }
    }

    /// The half-extents of this volume.
    #[inline]
    pub fn half_extents(&self) -> &Vector<Real> {
        &self.half_extents
    }

    /// This volume as an AABB.
    #[inline]
    pub fn aabb(&self) -> Aabb {
        Aabb::from_half_extents(Point::origin(), self.half_extents)
    }
}

impl Default for ShatterVolume {
    fn default() -> Self {
        Self {
            half_extents: Vector::new(5.0, 5.0, 5.0),
        }
    }
}

/// The parameters of one shatter.
#[cfg_attr(
    feature = "serde-serialize",
    derive(serde::Serialize, serde::Deserialize)
)]
#[derive(Copy, Clone, Debug, PartialEq)]
pub struct ShatterConfig {
    /// The number of seeds, i.e., the maximum number of fragments.
    pub fragment_count: usize,
    /// Rebuild each fragment as a convex hull instead of keeping its triangles as a shell.
    pub solid: bool,
    /// If set, fragments fly to random positions inside this volume instead of along
    /// their explosion direction.
    pub volume: Option<ShatterVolume>,
}

impl Default for ShatterConfig {
    fn default() -> Self {
        Self {
            fragment_count: 10,
            solid: true,
            volume: None,
        }
    }
}

impl ShatterConfig {
    /// Checks that this configuration can be used.
    pub fn validate(&self) -> Result<(), ConfigError> {
        if self.fragment_count == 0 {
            return Err(ConfigError::ZeroFragments);
        }

        if let Some(volume) = &self.volume {
            let _ = ShatterVolume::new(volume.half_extents)?;
        }

        Ok(())
    }
}
