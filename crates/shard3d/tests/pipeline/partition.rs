use super::cube;
use rand::{Rng, SeedableRng};
use rand_isaac::IsaacRng;
use shard3d::math::{Point, Vector};
use shard3d::shape::{Triangle, TriangleSoup};
use shard3d::shatter::{partition, partition_with_seeds};

fn random_soup(rng: &mut IsaacRng, len: usize) -> TriangleSoup {
    let mut pt = || Point::from(Vector::new(rng.gen(), rng.gen(), rng.gen()) * 10.0);
    TriangleSoup::new((0..len).map(|_| Triangle::new(pt(), pt(), pt())).collect())
}

#[test]
fn every_triangle_lands_in_exactly_one_bucket() {
    let mut rng = IsaacRng::seed_from_u64(0);

    for fragment_count in [1, 3, 7, 50] {
        let mesh = random_soup(&mut rng, 200);
        let buckets = partition(&mesh, fragment_count, &mut rng);
        assert_eq!(buckets.len(), fragment_count);

        let total: usize = buckets.iter().map(|b| b.triangles.len()).sum();
        assert_eq!(total, mesh.len());

        for tri in mesh.triangles() {
            let occurrences = buckets
                .iter()
                .flat_map(|b| &b.triangles)
                .filter(|t| *t == tri)
                .count();
            assert_eq!(occurrences, 1);
        }
    }
}

#[test]
fn triangles_go_to_their_nearest_seed() {
    let mut rng = IsaacRng::seed_from_u64(1);
    let mesh = random_soup(&mut rng, 300);
    let buckets = partition(&mesh, 6, &mut rng);

    for bucket in &buckets {
        for tri in &bucket.triangles {
            let centroid = tri.center();
            let own = na::distance_squared(&centroid, &bucket.seed);

            for other in &buckets {
                assert!(own <= na::distance_squared(&centroid, &other.seed));
            }
        }
    }
}

#[test]
fn well_separated_clusters_follow_their_seed() {
    let a = Point::new(-10.0, 0.0, 0.0);
    let b = Point::new(10.0, 0.0, 0.0);
    let around = |c: Point<f32>, i: f32| {
        let d = Vector::new(0.1 * i, 0.2, 0.0);
        Triangle::new(c + d, c - d, c)
    };

    let mut triangles = Vec::new();
    for i in 0..5 {
        triangles.push(around(a, i as f32));
        triangles.push(around(b, i as f32));
    }

    let mesh = TriangleSoup::new(triangles);
    let buckets = partition_with_seeds(&mesh, &[a, b]);

    assert_eq!(buckets.len(), 2);
    assert!(buckets[0].triangles.iter().all(|t| relative_eq!(t.center(), a, epsilon = 1.0e-4)));
    assert!(buckets[1].triangles.iter().all(|t| relative_eq!(t.center(), b, epsilon = 1.0e-4)));
    assert_eq!(buckets[0].triangles.len(), 5);
    assert_eq!(buckets[1].triangles.len(), 5);
}

#[test]
fn partition_is_deterministic_for_a_seed() {
    let mesh = cube();
    let first = partition(&mesh, 4, &mut IsaacRng::seed_from_u64(9));
    let second = partition(&mesh, 4, &mut IsaacRng::seed_from_u64(9));

    assert_eq!(first, second);
}

#[test]
fn seeds_lie_inside_the_mesh_bounds() {
    let mesh = cube();
    let aabb = mesh.local_aabb();

    for bucket in partition(&mesh, 20, &mut IsaacRng::seed_from_u64(5)) {
        assert!(aabb.contains_local_point(&bucket.seed));
    }
}
