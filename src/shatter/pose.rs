use super::{Fragment, ShatterConfig, ShatterVolume, EXPLOSION_SCALE, SPIN_SCALE};
use crate::math::{Isometry, Point, Real, Rotation, Translation, UnitVector, Vector};
use crate::shape::MeshPlacement;
use na::Unit;
use rand::Rng;

/// The explosion parameters of a fragment and the law interpolating its rigid pose.
///
/// A pose is a pure function of two scalars: `force` in `[0, 1]`, the progress of the
/// explosion, and `rot_force >= 0`, a multiplier of the spin.
#[cfg_attr(
    feature = "serde-serialize",
    derive(serde::Serialize, serde::Deserialize)
)]
#[derive(Copy, Clone, Debug, PartialEq)]
pub struct FragmentPose {
    /// The position of the fragment at rest.
    pub original_position: Point<Real>,
    /// The orientation of the fragment at rest.
    pub original_rotation: Rotation<Real>,
    /// The direction followed when no target position is set.
    pub direction: UnitVector<Real>,
    /// The axis the fragment spins around.
    pub rotation_axis: UnitVector<Real>,
    /// The position reached at full force, if volume targeting is enabled.
    pub target_position: Option<Point<Real>>,
}

impl FragmentPose {
    /// A pose that stays at `placement` for any force.
    pub fn at_rest(placement: &MeshPlacement, direction: UnitVector<Real>) -> Self {
        Self {
            original_position: placement.position,
            original_rotation: placement.rotation,
            direction,
            rotation_axis: Vector::y_axis(),
            target_position: None,
        }
    }

    /// The position at the given force.
    pub fn position_at(&self, force: Real) -> Point<Real> {
        let force = clamp_force(force);

        match &self.target_position {
            Some(target) => self.original_position + (target - self.original_position) * force,
            None => self.original_position + self.direction.into_inner() * (force * EXPLOSION_SCALE),
        }
    }

    /// The orientation at the given forces.
    ///
    /// The spin is applied on top of the rest orientation.
    pub fn rotation_at(&self, force: Real, rot_force: Real) -> Rotation<Real> {
        let angle = clamp_force(force) * SPIN_SCALE * clamp_rot_force(rot_force);
        Rotation::from_axis_angle(&self.rotation_axis, angle) * self.original_rotation
    }

    /// The rigid pose at the given forces.
    ///
    /// At `force = 0` this is exactly the rest pose.
    pub fn at(&self, force: Real, rot_force: Real) -> Isometry<Real> {
        Isometry::from_parts(
            Translation::from(self.position_at(force).coords),
            self.rotation_at(force, rot_force),
        )
    }
}

fn clamp_force(force: Real) -> Real {
    if force.is_nan() {
        0.0
    } else {
        force.clamp(0.0, 1.0)
    }
}

fn clamp_rot_force(rot_force: Real) -> Real {
    if rot_force.is_nan() {
        0.0
    } else {
        rot_force.max(0.0)
    }
}

/// A unit vector drawn uniformly on the sphere.
pub fn random_unit_vector<R: Rng + ?Sized>(rng: &mut R) -> UnitVector<Real> {
    let z = rng.gen::<Real>() * 2.0 - 1.0;
    let phi = rng.gen::<Real>() * core::f32::consts::TAU;
    let r = (1.0 - z * z).max(0.0).sqrt();

    Unit::new_normalize(Vector::new(r * phi.cos(), r * phi.sin(), z))
}

/// Assigns the random explosion parameters of fragments.
#[derive(Copy, Clone, Debug, Default, PartialEq)]
pub struct PosePlanner {
    volume: Option<ShatterVolume>,
}

impl PosePlanner {
    /// A planner sending fragments inside `volume`, or along their direction if `None`.
    pub fn new(volume: Option<ShatterVolume>) -> Self {
        Self { volume }
    }

    /// The planner matching `config`.
    pub fn from_config(config: &ShatterConfig) -> Self {
        Self::new(config.volume)
    }

    /// Is volume targeting enabled?
    pub fn targets_volume(&self) -> bool {
        self.volume.is_some()
    }

    /// Resets the pose of `fragment` to its placement, with a fresh spin axis and target.
    pub fn plan<R: Rng + ?Sized>(&self, fragment: &mut Fragment, rng: &mut R) {
        let rotation_axis = random_unit_vector(rng);
        let target_position = self.volume.map(|volume| {
            let t = Vector::new(rng.gen::<Real>(), rng.gen::<Real>(), rng.gen::<Real>());
            let aabb = volume.aabb();
            aabb.mins + aabb.extents().component_mul(&t)
        });

        let placement = fragment.placement();
        fragment.pose = FragmentPose {
            original_position: placement.position,
            original_rotation: placement.rotation,
            direction: *fragment.direction(),
            rotation_axis,
            target_position,
        };
    }

    /// Plans every fragment of a set, in order.
    pub fn plan_all<R: Rng + ?Sized>(&self, fragments: &mut [Fragment], rng: &mut R) {
        for fragment in fragments {
            self.plan(fragment, rng);
        }
    }
}

#[cfg(test)]
mod test {
    use super::{random_unit_vector, FragmentPose};
    use crate::math::{Point, Rotation, Vector};
    use crate::shape::MeshPlacement;
    use crate::shatter::EXPLOSION_SCALE;
    use rand::SeedableRng;
    use rand_isaac::IsaacRng;

    fn pose(target: Option<Point<f32>>) -> FragmentPose {
        let placement = MeshPlacement {
            position: Point::new(1.0, -2.0, 0.5),
            rotation: Rotation::from_euler_angles(0.3, 0.2, 0.1),
            scale: Vector::repeat(2.0),
        };
        let mut pose = FragmentPose::at_rest(&placement, Vector::x_axis());
        pose.rotation_axis = Vector::z_axis();
        pose.target_position = target;
        pose
    }

    #[test]
    fn zero_force_is_the_rest_pose() {
        for target in [None, Some(Point::new(4.0, 4.0, 4.0))] {
            let pose = pose(target);
            let iso = pose.at(0.0, 3.0);

            assert_eq!(Point::from(iso.translation.vector), pose.original_position);
            assert_eq!(iso.rotation, pose.original_rotation);
        }
    }

    #[test]
    fn full_force_reaches_the_target() {
        let target = Point::new(4.0, 4.0, 4.0);
        assert_relative_eq!(pose(Some(target)).position_at(1.0), target, epsilon = 1.0e-6);
        assert_relative_eq!(pose(Some(target)).position_at(7.0), target, epsilon = 1.0e-6);
    }

    #[test]
    fn direction_mode_moves_along_direction() {
        let pose = pose(None);
        let expected = pose.original_position + Vector::x() * (0.5 * EXPLOSION_SCALE);
        assert_relative_eq!(pose.position_at(0.5), expected, epsilon = 1.0e-6);
    }

    #[test]
    fn no_spin_without_rotation_force() {
        let pose = pose(None);
        assert_eq!(pose.rotation_at(1.0, 0.0), pose.original_rotation);
        assert_eq!(pose.rotation_at(1.0, -2.0), pose.original_rotation);
    }

    #[test]
    fn random_axes_are_unit() {
        let mut rng = IsaacRng::seed_from_u64(42);

        for _ in 0..100 {
            assert_relative_eq!(random_unit_vector(&mut rng).norm(), 1.0, epsilon = 1.0e-5);
        }
    }
}
