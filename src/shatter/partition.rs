use crate::bounding_volume::Aabb;
use crate::math::{Point, Real, Vector};
use crate::shape::{Triangle, TriangleSoup};
use crate::utils::dedup_points;
use rand::Rng;

/// The triangles assigned to one seed.
#[derive(Clone, Debug, PartialEq)]
pub struct FragmentBucket {
    /// The index of the seed this bucket belongs to.
    pub seed_index: usize,
    /// The seed position.
    pub seed: Point<Real>,
    /// The triangles closest to this seed, in mesh order.
    pub triangles: Vec<Triangle>,
    /// The distinct vertices of `triangles`, in order of first occurrence.
    pub points: Vec<Point<Real>>,
}

impl FragmentBucket {
    fn new(seed_index: usize, seed: Point<Real>) -> Self {
        Self {
            seed_index,
            seed,
            triangles: Vec::new(),
            points: Vec::new(),
        }
    }

    /// Does this bucket contain no triangle?
    #[inline]
    pub fn is_empty(&self) -> bool {
        self.triangles.is_empty()
    }

    /// The number of distinct points of this bucket.
    #[inline]
    pub fn num_distinct_points(&self) -> usize {
        self.points.len()
    }
}

/// Draws `count` points uniformly inside `aabb`.
///
/// Flat boxes are fine: the seeds then lie on the degenerate face.
pub fn sample_seeds<R: Rng + ?Sized>(aabb: &Aabb, count: usize, rng: &mut R) -> Vec<Point<Real>> {
    let extents = aabb.extents();

    (0..count)
        .map(|_| {
            let t = Vector::new(rng.gen::<Real>(), rng.gen::<Real>(), rng.gen::<Real>());
            aabb.mins + extents.component_mul(&t)
        })
        .collect()
}

/// The index of the seed closest to `point`.
///
/// Ties are resolved in favor of the lowest index. Returns `None` if `seeds` is empty.
pub fn nearest_seed(point: &Point<Real>, seeds: &[Point<Real>]) -> Option<usize> {
    let mut best = None;
    let mut best_dist = Real::MAX;

    for (i, seed) in seeds.iter().enumerate() {
        let dist = na::distance_squared(point, seed);

        // Strict comparison so the first seed wins ties.
        if best.is_none() || dist < best_dist {
            best = Some(i);
            best_dist = dist;
        }
    }

    best
}

/// Assigns every triangle of `mesh` to the seed closest to its centroid.
///
/// Returns exactly one bucket per seed, in seed order. Buckets may be empty. If the mesh
/// is empty, no bucket is returned.
pub fn partition_with_seeds(mesh: &TriangleSoup, seeds: &[Point<Real>]) -> Vec<FragmentBucket> {
    if mesh.is_empty() || seeds.is_empty() {
        return Vec::new();
    }

    let mut buckets: Vec<_> = seeds
        .iter()
        .enumerate()
        .map(|(i, seed)| FragmentBucket::new(i, *seed))
        .collect();

    for tri in mesh.triangles() {
        let centroid = tri.center();

        if let Some(i) = nearest_seed(&centroid, seeds) {
            buckets[i].triangles.push(*tri);
        }
    }

    for bucket in &mut buckets {
        bucket.points = dedup_points(bucket.triangles.iter().flat_map(|t| [&t.a, &t.b, &t.c]));
    }

    buckets
}

/// Splits `mesh` into `fragment_count` buckets around random seeds.
///
/// The seeds are drawn uniformly inside the AABB of the mesh vertices. A `fragment_count`
/// of zero is treated as one.
pub fn partition<R: Rng + ?Sized>(
    mesh: &TriangleSoup,
    fragment_count: usize,
    rng: &mut R,
) -> Vec<FragmentBucket> {
    if mesh.is_empty() {
        return Vec::new();
    }

    let seeds = sample_seeds(&mesh.local_aabb(), fragment_count.max(1), rng);
    partition_with_seeds(mesh, &seeds)
}
