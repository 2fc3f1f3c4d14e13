use crate::math::{Isometry, Matrix4, Point, Real, Vector, DEFAULT_EPSILON};
use crate::shatter::ConfigError;
use na::Perspective3;
use rand::Rng;

/// The size, in pixels, of the captured image.
#[cfg_attr(
    feature = "serde-serialize",
    derive(serde::Serialize, serde::Deserialize)
)]
#[derive(Copy, Clone, Debug, PartialEq, Eq, Hash)]
pub struct Viewport {
    /// The width in pixels.
    pub width: u32,
    /// The height in pixels.
    pub height: u32,
}

impl Viewport {
    /// Creates a new viewport.
    pub fn new(width: u32, height: u32) -> Self {
        Self { width, height }
    }

    /// The width divided by the height.
    pub fn aspect(&self) -> Real {
        self.width as Real / self.height.max(1) as Real
    }

    /// Checks that this viewport contains at least one pixel.
    pub fn validate(&self) -> Result<(), ConfigError> {
        if self.width == 0 || self.height == 0 {
            Err(ConfigError::EmptyViewport {
                width: self.width,
                height: self.height,
            })
        } else {
            Ok(())
        }
    }
}

impl Default for Viewport {
    fn default() -> Self {
        Self::new(640, 640)
    }
}

/// A perspective camera looking at a target point.
#[cfg_attr(
    feature = "serde-serialize",
    derive(serde::Serialize, serde::Deserialize)
)]
#[derive(Copy, Clone, Debug, PartialEq)]
pub struct Camera {
    /// The position of the camera.
    pub eye: Point<Real>,
    /// The point the camera looks at.
    pub target: Point<Real>,
    /// The up direction of the camera.
    pub up: Vector<Real>,
    /// The vertical field of view, in radians.
    pub fovy: Real,
    /// The width divided by the height of the image plane.
    pub aspect: Real,
    /// The distance to the near clipping plane.
    pub near: Real,
    /// The distance to the far clipping plane.
    pub far: Real,
}

impl Default for Camera {
    fn default() -> Self {
        Self::look_at(Point::new(0.0, 2.0, 6.0), Point::origin(), 1.0)
    }
}

impl Camera {
    /// A camera at `eye` looking at `target`, with a 50 degrees vertical field of view.
    pub fn look_at(eye: Point<Real>, target: Point<Real>, aspect: Real) -> Self {
        Self {
            eye,
            target,
            up: Vector::y(),
            fovy: 50.0f32.to_radians(),
            aspect,
            near: 0.1,
            far: 1000.0,
        }
    }

    /// The world-to-camera transform.
    ///
    /// The camera looks toward its local `-z` axis.
    pub fn view(&self) -> Isometry<Real> {
        Isometry::look_at_rh(&self.eye, &self.target, &self.up)
    }

    /// The perspective projection of this camera.
    ///
    /// # Panics
    /// Panics if `aspect` is zero or `near == far`. See [`Self::validate`].
    pub fn projection(&self) -> Perspective3<Real> {
        Perspective3::new(self.aspect, self.fovy, self.near, self.far)
    }

    /// The world-to-clip-space matrix.
    pub fn view_projection(&self) -> Matrix4<Real> {
        self.projection().to_homogeneous() * self.view().to_homogeneous()
    }

    /// Checks that this camera defines a valid projection.
    pub fn validate(&self) -> Result<(), ConfigError> {
        let range = |name, min: Real, max: Real| {
            if min.is_finite() && max.is_finite() && min < max {
                Ok(())
            } else {
                Err(ConfigError::InvalidRange { name, min, max })
            }
        };

        range("camera near/far", self.near, self.far)?;
        range("camera near", 0.0, self.near)?;
        range("camera fovy", 0.0, self.fovy)?;
        range("camera fovy", self.fovy, core::f32::consts::PI)?;
        range("camera aspect", 0.0, self.aspect)?;

        let dir = self.target - self.eye;
        if dir.norm_squared() == 0.0 {
            return Err(ConfigError::InvalidRange {
                name: "camera eye/target distance",
                min: 0.0,
                max: 0.0,
            });
        }

        // The view basis is undefined when `up` is parallel to the view direction.
        let sin_sq =
            dir.cross(&self.up).norm_squared() / (dir.norm_squared() * self.up.norm_squared());
        if sin_sq.is_nan() || sin_sq <= DEFAULT_EPSILON {
            return Err(ConfigError::InvalidRange {
                name: "camera up/view angle",
                min: 0.0,
                max: sin_sq.sqrt(),
            });
        }

        Ok(())
    }
}

/// Maximum absolute pitch of an orbit camera, slightly under 90 degrees.
const MAX_PITCH: Real = 1.5;

/// A camera orbiting around a target point.
#[cfg_attr(
    feature = "serde-serialize",
    derive(serde::Serialize, serde::Deserialize)
)]
#[derive(Copy, Clone, Debug, PartialEq)]
pub struct OrbitCamera {
    /// The point the camera looks at.
    pub target: Point<Real>,
    /// The distance from the target.
    pub distance: Real,
    /// Horizontal angle, in radians.
    pub yaw: Real,
    /// Vertical angle, in radians, clamped to `[-MAX_PITCH, MAX_PITCH]` when converted.
    pub pitch: Real,
    /// The vertical field of view, in radians.
    pub fovy: Real,
    /// The distance to the near clipping plane.
    pub near: Real,
    /// The distance to the far clipping plane.
    pub far: Real,
}

impl Default for OrbitCamera {
    fn default() -> Self {
        Self {
            target: Point::origin(),
            distance: 6.0,
            yaw: 0.0,
            pitch: 0.3,
            fovy: 50.0f32.to_radians(),
            near: 0.1,
            far: 1000.0,
        }
    }
}

impl OrbitCamera {
    /// The position of the camera.
    pub fn eye(&self) -> Point<Real> {
        let pitch = self.pitch.clamp(-MAX_PITCH, MAX_PITCH);
        let offset = Vector::new(
            pitch.cos() * self.yaw.sin(),
            pitch.sin(),
            pitch.cos() * self.yaw.cos(),
        );
        self.target + offset * self.distance
    }

    /// Rotates the camera around its target.
    pub fn orbit(&mut self, delta_yaw: Real, delta_pitch: Real) {
        self.yaw += delta_yaw;
        self.pitch = (self.pitch + delta_pitch).clamp(-MAX_PITCH, MAX_PITCH);
    }

    /// The perspective camera matching this orbit, for an image of the given aspect ratio.
    pub fn to_camera(&self, aspect: Real) -> Camera {
        Camera {
            eye: self.eye(),
            target: self.target,
            up: Vector::y(),
            fovy: self.fovy,
            aspect,
            near: self.near,
            far: self.far,
        }
    }
}

/// Ranges of the random perturbations applied to an orbit camera.
#[cfg_attr(
    feature = "serde-serialize",
    derive(serde::Serialize, serde::Deserialize)
)]
#[derive(Copy, Clone, Debug, PartialEq)]
pub struct CameraJitter {
    /// The `[min, max]` orbit distance.
    pub distance: [Real; 2],
    /// The `[min, max]` yaw, in radians.
    pub yaw: [Real; 2],
    /// The `[min, max]` pitch, in radians.
    pub pitch: [Real; 2],
    /// The maximum offset of the target along each axis.
    pub target_offset: Real,
}

impl Default for CameraJitter {
    fn default() -> Self {
        Self {
            distance: [4.0, 8.0],
            yaw: [-core::f32::consts::PI, core::f32::consts::PI],
            pitch: [-0.2, 1.0],
            target_offset: 0.5,
        }
    }
}

impl CameraJitter {
    /// Checks that every range is well-formed.
    pub fn validate(&self) -> Result<(), ConfigError> {
        let check = |name, [min, max]: [Real; 2]| {
            if min.is_finite() && max.is_finite() && min <= max {
                Ok(())
            } else {
                Err(ConfigError::InvalidRange { name, min, max })
            }
        };

        check("jitter distance", self.distance)?;
        check("jitter yaw", self.yaw)?;
        check("jitter pitch", self.pitch)?;
        check("jitter target offset", [0.0, self.target_offset])?;

        if self.distance[0] <= 0.0 {
            return Err(ConfigError::InvalidRange {
                name: "jitter distance",
                min: self.distance[0],
                max: self.distance[1],
            });
        }

        Ok(())
    }

    /// A copy of `base` with a random distance, yaw, pitch and target.
    pub fn sample<R: Rng + ?Sized>(&self, base: &OrbitCamera, rng: &mut R) -> OrbitCamera {
        let mut lerp = |[min, max]: [Real; 2]| min + (max - min) * rng.gen::<Real>();

        let distance = lerp(self.distance);
        let yaw = lerp(self.yaw);
        let pitch = lerp(self.pitch);
        let offset = Vector::new(
            lerp([-self.target_offset, self.target_offset]),
            lerp([-self.target_offset, self.target_offset]),
            lerp([-self.target_offset, self.target_offset]),
        );

        OrbitCamera {
            target: base.target + offset,
            distance,
            yaw,
            pitch: pitch.clamp(-MAX_PITCH, MAX_PITCH),
            ..*base
        }
    }
}

#[cfg(test)]
mod test {
    use super::{Camera, CameraJitter, OrbitCamera, Viewport};
    use crate::math::{Point, Vector};
    use crate::shatter::ConfigError;
    use rand::SeedableRng;
    use rand_isaac::IsaacRng;

    #[test]
    fn orbit_eye_is_at_distance() {
        let orbit = OrbitCamera {
            yaw: 1.0,
            pitch: 0.5,
            distance: 3.0,
            ..OrbitCamera::default()
        };

        assert_relative_eq!(
            na::distance(&orbit.eye(), &orbit.target),
            3.0,
            epsilon = 1.0e-5
        );
        assert_relative_eq!(
            OrbitCamera::default().to_camera(1.0).eye,
            Point::new(0.0, 6.0 * 0.3f32.sin(), 6.0 * 0.3f32.cos()),
            epsilon = 1.0e-5
        );
    }

    #[test]
    fn target_projects_to_screen_center() {
        let camera = Camera::look_at(Point::new(1.0, 2.0, 3.0), Point::new(0.0, 0.5, 0.0), 1.5);
        let clip = camera.view_projection() * camera.target.to_homogeneous();
        let ndc = clip.xyz() / clip.w;

        assert_relative_eq!(ndc.x, 0.0, epsilon = 1.0e-5);
        assert_relative_eq!(ndc.y, 0.0, epsilon = 1.0e-5);
    }

    #[test]
    fn invalid_cameras_are_rejected() {
        assert_eq!(Camera::default().validate(), Ok(()));

        let mut camera = Camera::default();
        camera.near = 10.0;
        camera.far = 1.0;
        assert!(camera.validate().is_err());

        let camera = Camera::look_at(Point::origin(), Point::origin(), 1.0);
        assert!(camera.validate().is_err());

        let camera = Camera::look_at(Point::new(0.0, 10.0, 0.0), Point::origin(), 1.0);
        assert!(matches!(
            camera.validate(),
            Err(ConfigError::InvalidRange {
                name: "camera up/view angle",
                ..
            })
        ));

        let mut camera = Camera::look_at(Point::new(0.0, 10.0, 0.0), Point::origin(), 1.0);
        camera.up = Vector::z();
        assert_eq!(camera.validate(), Ok(()));

        let mut camera = Camera::default();
        camera.up = Vector::zeros();
        assert!(camera.validate().is_err());

        assert_eq!(
            Viewport::new(0, 10).validate(),
            Err(ConfigError::EmptyViewport {
                width: 0,
                height: 10
            })
        );
    }

    #[test]
    fn jitter_stays_in_range() {
        let jitter = CameraJitter::default();
        let base = OrbitCamera::default();
        let mut rng = IsaacRng::seed_from_u64(11);

        for _ in 0..50 {
            let cam = jitter.sample(&base, &mut rng);
            assert!(cam.distance >= 4.0 && cam.distance <= 8.0);
            assert!(cam.pitch >= -0.2 && cam.pitch <= 1.0);
            assert!((cam.target - base.target).amax() <= 0.5);
        }

        let inverted = CameraJitter {
            distance: [8.0, 4.0],
            ..jitter
        };
        assert!(inverted.validate().is_err());
    }
}
