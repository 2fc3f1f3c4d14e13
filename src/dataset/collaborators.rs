use crate::math::Real;
use crate::projection::{Camera, Viewport};
use crate::shatter::Fragment;
use rand::RngCore;

/// Everything a renderer needs to draw one dataset sample.
#[derive(Copy, Clone, Debug)]
pub struct SceneSnapshot<'a> {
    /// The fragments to draw, posed with `force` and `rot_force`.
    pub fragments: &'a [Fragment],
    /// The camera to render from.
    pub camera: &'a Camera,
    /// The size of the image to produce.
    pub viewport: Viewport,
    /// The explosion force of the sample.
    pub force: Real,
    /// The spin multiplier of the sample.
    pub rot_force: Real,
}

/// An encoded image produced by a [`FrameCapture`].
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct CapturedImage {
    /// The image width in pixels.
    pub width: u32,
    /// The image height in pixels.
    pub height: u32,
    /// The encoded image. Opaque to this crate.
    pub bytes: Vec<u8>,
    /// The file extension matching the encoding of `bytes`, without the dot.
    pub extension: String,
}

/// The failure of a single frame capture.
#[derive(thiserror::Error, Debug)]
pub enum CaptureError {
    /// The renderer could not produce a frame.
    #[error("renderer failure: {0}")]
    Renderer(String),
    /// The frame could not be encoded.
    #[error("image encoding failed: {0}")]
    Encoding(String),
    /// The capture produced no data.
    #[error("the captured image is empty")]
    EmptyImage,
}

/// The failure of an environment randomization.
#[derive(thiserror::Error, Debug, Clone, PartialEq, Eq)]
pub enum EnvironmentError {
    /// An environment asset could not be loaded.
    #[error("failed to load environment asset `{asset}`: {reason}")]
    AssetLoad {
        /// The name or path of the asset.
        asset: String,
        /// Why loading failed.
        reason: String,
    },
    /// Any other failure of the environment backend.
    #[error("environment failure: {0}")]
    Backend(String),
}

/// Renders and encodes one frame of the scene.
pub trait FrameCapture {
    /// Captures `scene`.
    fn capture(&mut self, scene: &SceneSnapshot<'_>) -> Result<CapturedImage, CaptureError>;
}

/// The backgrounds and lights surrounding the shattered mesh.
pub trait Environment {
    /// Picks a new random background and lighting.
    fn randomize(&mut self, rng: &mut dyn RngCore) -> Result<(), EnvironmentError>;

    /// Switches to the default background and lighting. Cannot fail.
    fn use_fallback(&mut self);
}

/// An environment that never changes.
#[derive(Copy, Clone, Debug, Default)]
pub struct StaticEnvironment;

impl Environment for StaticEnvironment {
    fn randomize(&mut self, _: &mut dyn RngCore) -> Result<(), EnvironmentError> {
        Ok(())
    }

    fn use_fallback(&mut self) {}
}

impl<T: FrameCapture + ?Sized> FrameCapture for &mut T {
    fn capture(&mut self, scene: &SceneSnapshot<'_>) -> Result<CapturedImage, CaptureError> {
        (**self).capture(scene)
    }
}

impl<T: Environment + ?Sized> Environment for &mut T {
    fn randomize(&mut self, rng: &mut dyn RngCore) -> Result<(), EnvironmentError> {
        (**self).randomize(rng)
    }

    fn use_fallback(&mut self) {
        (**self).use_fallback()
    }
}
