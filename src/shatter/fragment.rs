use super::{FragmentBucket, FragmentPose, ShatterConfig, MIN_FRAGMENT_POINTS};
use crate::bounding_volume::Aabb;
use crate::math::{Isometry, Point, Real, UnitVector, Vector, DEFAULT_EPSILON};
use crate::shape::{FragmentMesh, GeometryKind, GeometryLedger, MeshPlacement, TriangleSoup};
use crate::transformation::try_convex_hull;
use na::Unit;
use rand::Rng;
#[cfg(feature = "parallel")]
use rayon::prelude::*;

/// A piece of a shattered mesh, ready to be rendered and animated.
#[derive(Debug)]
pub struct Fragment {
    index: usize,
    mesh: FragmentMesh,
    placement: MeshPlacement,
    centroid: Point<Real>,
    direction: UnitVector<Real>,
    color: [f32; 3],
    pub(super) pose: FragmentPose,
}

impl Fragment {
    /// The index of this fragment within its shatter.
    #[inline]
    pub fn index(&self) -> usize {
        self.index
    }

    /// The geometry of this fragment, expressed in the object space of the source mesh.
    #[inline]
    pub fn mesh(&self) -> &FragmentMesh {
        &self.mesh
    }

    /// Whether this fragment is a hull or a shell.
    #[inline]
    pub fn kind(&self) -> GeometryKind {
        self.mesh.kind()
    }

    /// The rest placement of this fragment, copied from the source mesh.
    #[inline]
    pub fn placement(&self) -> &MeshPlacement {
        &self.placement
    }

    /// The center of the local AABB of this fragment geometry.
    #[inline]
    pub fn centroid(&self) -> &Point<Real> {
        &self.centroid
    }

    /// The unit direction from the source mesh center to the centroid of this fragment.
    #[inline]
    pub fn direction(&self) -> &UnitVector<Real> {
        &self.direction
    }

    /// The display color of this fragment, as linear RGB in `[0, 1]`.
    #[inline]
    pub fn color(&self) -> [f32; 3] {
        self.color
    }

    /// The explosion parameters of this fragment.
    #[inline]
    pub fn pose(&self) -> &FragmentPose {
        &self.pose
    }

    /// The rigid transform of this fragment at the given explosion forces.
    ///
    /// The rest scale is not part of the isometry; see [`Self::placement`].
    #[inline]
    pub fn world_pose(&self, force: Real, rot_force: Real) -> Isometry<Real> {
        self.pose.at(force, rot_force)
    }

    /// The world-space AABB of this fragment at the given explosion forces.
    pub fn world_aabb(&self, force: Real, rot_force: Real) -> Aabb {
        self.mesh
            .local_aabb()
            .scaled(&self.placement.scale)
            .transform_by(&self.world_pose(force, rot_force))
    }
}

/// Builds the geometry of one bucket.
///
/// Returns `None` if the bucket has fewer than [`MIN_FRAGMENT_POINTS`] distinct points. If
/// `config.solid` is set but the hull cannot be computed, a shell is built instead.
///
/// The hull treats its input as flat when the variance of the points along their thinnest
/// axis is below `1.0e-7`, measured after scaling the points so their AABB diagonal is 1.
/// A bucket thinner than roughly a thousandth of its extent can thus become a shell even if
/// its points are not exactly coplanar.
pub fn build_fragment(
    bucket: &FragmentBucket,
    source: &TriangleSoup,
    config: &ShatterConfig,
    ledger: &GeometryLedger,
) -> Option<Fragment> {
    if bucket.num_distinct_points() < MIN_FRAGMENT_POINTS {
        log::trace!(
            "Dropping bucket {}: only {} distinct points.",
            bucket.seed_index,
            bucket.num_distinct_points()
        );
        return None;
    }

    let mesh = if config.solid {
        match try_convex_hull(&bucket.points) {
            Ok((vertices, indices)) => FragmentMesh::solid(vertices, indices, ledger.lease()),
            Err(err) => {
                log::debug!(
                    "Convex hull of bucket {} failed ({}), using its shell instead.",
                    bucket.seed_index,
                    err
                );
                FragmentMesh::shell(&bucket.triangles, ledger.lease())
            }
        }
    } else {
        FragmentMesh::shell(&bucket.triangles, ledger.lease())
    };

    let placement = *source.placement();
    let centroid = mesh.local_aabb().center();
    let direction = explosion_direction(&source.center(), &centroid);

    Some(Fragment {
        index: bucket.seed_index,
        mesh,
        placement,
        centroid,
        direction,
        color: [1.0; 3],
        pose: FragmentPose::at_rest(&placement, direction),
    })
}

/// Builds every non-degenerate bucket and gives the resulting fragments a random color.
///
/// Fragments are numbered in bucket order. With the `parallel` feature, geometry is built
/// on the rayon thread pool; colors are always drawn sequentially so the output only
/// depends on `rng`.
pub fn build_fragments<R: Rng + ?Sized>(
    buckets: &[FragmentBucket],
    source: &TriangleSoup,
    config: &ShatterConfig,
    ledger: &GeometryLedger,
    rng: &mut R,
) -> Vec<Fragment> {
    #[cfg(feature = "parallel")]
    let mut fragments: Vec<_> = buckets
        .par_iter()
        .filter_map(|bucket| build_fragment(bucket, source, config, ledger))
        .collect();
    #[cfg(not(feature = "parallel"))]
    let mut fragments: Vec<_> = buckets
        .iter()
        .filter_map(|bucket| build_fragment(bucket, source, config, ledger))
        .collect();

    for (i, fragment) in fragments.iter_mut().enumerate() {
        fragment.index = i;
        fragment.color = random_color(rng);
    }

    fragments
}

fn explosion_direction(mesh_center: &Point<Real>, centroid: &Point<Real>) -> UnitVector<Real> {
    Unit::try_new(centroid - mesh_center, DEFAULT_EPSILON).unwrap_or_else(Vector::y_axis)
}

fn random_color<R: Rng + ?Sized>(rng: &mut R) -> [f32; 3] {
    hsl_to_rgb(rng.gen::<f32>(), 0.7, 0.55)
}

fn hsl_to_rgb(hue: f32, saturation: f32, lightness: f32) -> [f32; 3] {
    let chroma = (1.0 - (2.0 * lightness - 1.0).abs()) * saturation;
    let h = hue.rem_euclid(1.0) * 6.0;
    let x = chroma * (1.0 - (h % 2.0 - 1.0).abs());
    let m = lightness - chroma / 2.0;

    let (r, g, b) = match h as u32 {
        0 => (chroma, x, 0.0),
        1 => (x, chroma, 0.0),
        2 => (0.0, chroma, x),
        3 => (0.0, x, chroma),
        4 => (x, 0.0, chroma),
        _ => (chroma, 0.0, x),
    };

    [r + m, g + m, b + m]
}
