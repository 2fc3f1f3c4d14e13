use crate::math::Real;
use crate::projection::{CameraJitter, OrbitCamera, Viewport};
use crate::shatter::{ConfigError, ShatterConfig};

/// The parameters of a dataset generation run.
#[cfg_attr(
    feature = "serde-serialize",
    derive(serde::Serialize, serde::Deserialize)
)]
#[derive(Copy, Clone, Debug, PartialEq)]
pub struct DatasetConfig {
    /// How every sample is shattered.
    pub shatter: ShatterConfig,
    /// The explosion force at which samples are captured and labeled, in `[0, 1]`.
    pub final_force: Real,
    /// The spin multiplier at which samples are captured and labeled.
    pub final_rot_force: Real,
    /// The camera used when `randomize_camera` is off, and the base of the jitter otherwise.
    pub camera: OrbitCamera,
    /// Draw a new camera for every sample.
    pub randomize_camera: bool,
    /// The ranges of the camera randomization.
    pub camera_jitter: CameraJitter,
    /// Draw a new environment for every sample.
    pub randomize_environment: bool,
    /// The class of every annotation.
    pub class_id: u32,
    /// The size of the captured images.
    pub viewport: Viewport,
}

impl Default for DatasetConfig {
    fn default() -> Self {
        Self {
            shatter: ShatterConfig::default(),
            final_force: 1.0,
            final_rot_force: 1.0,
            camera: OrbitCamera::default(),
            randomize_camera: true,
            camera_jitter: CameraJitter::default(),
            randomize_environment: true,
            class_id: 0,
            viewport: Viewport::default(),
        }
    }
}

impl DatasetConfig {
    /// Checks that this configuration can be used.
    pub fn validate(&self) -> Result<(), ConfigError> {
        self.shatter.validate()?;
        self.viewport.validate()?;
        self.camera.to_camera(self.viewport.aspect()).validate()?;

        if self.randomize_camera {
            self.camera_jitter.validate()?;
        }

        if !(0.0..=1.0).contains(&self.final_force) {
            return Err(ConfigError::InvalidRange {
                name: "final force",
                min: 0.0,
                max: self.final_force,
            });
        }

        if !(self.final_rot_force >= 0.0 && self.final_rot_force.is_finite()) {
            return Err(ConfigError::InvalidRange {
                name: "final rotation force",
                min: 0.0,
                max: self.final_rot_force,
            });
        }

        Ok(())
    }
}
