use super::cube;
use rand::SeedableRng;
use rand_isaac::IsaacRng;
use shard3d::math::{Point, Rotation, Vector};
use shard3d::shape::{GeometryKind, GeometryLedger, MeshPlacement, Triangle, TriangleSoup};
use shard3d::shatter::{
    build_fragment, build_fragments, partition, partition_with_seeds, PosePlanner,
    ShatterConfig, ShatterSession, ShatterVolume, MIN_FRAGMENT_POINTS,
};

#[test]
fn small_buckets_never_become_fragments() {
    let ledger = GeometryLedger::new();
    let config = ShatterConfig::default();

    for seed in 0..20 {
        let mesh = cube();
        let buckets = partition(&mesh, 8, &mut IsaacRng::seed_from_u64(seed));

        for bucket in &buckets {
            let fragment = build_fragment(bucket, &mesh, &config, &ledger);
            assert_eq!(
                fragment.is_some(),
                bucket.num_distinct_points() >= MIN_FRAGMENT_POINTS
            );
        }
    }
}

#[test]
fn non_coplanar_buckets_are_solid() {
    let mesh = cube();
    let buckets = partition_with_seeds(&mesh, &[Point::origin()]);
    let ledger = GeometryLedger::new();
    let fragment = build_fragment(&buckets[0], &mesh, &ShatterConfig::default(), &ledger).unwrap();

    assert_eq!(fragment.kind(), GeometryKind::Solid);
    assert_eq!(fragment.mesh().vertices().len(), 8);
    assert_eq!(fragment.mesh().num_triangles(), 12);
    assert_eq!(fragment.mesh().normals().len(), 8);
    assert_eq!(
        *fragment.mesh().local_aabb(),
        mesh.local_aabb(),
        "the hull of a whole cube is the cube"
    );

    for n in fragment.mesh().normals() {
        assert_relative_eq!(n.norm(), 1.0, epsilon = 1.0e-5);
    }
}

#[test]
fn fragments_inherit_the_source_placement() {
    let placement = MeshPlacement {
        position: Point::new(3.0, 0.0, -1.0),
        rotation: Rotation::from_euler_angles(0.0, 1.0, 0.0),
        scale: Vector::new(2.0, 1.0, 1.0),
    };
    let mesh = cube().with_placement(placement);
    let ledger = GeometryLedger::new();
    let buckets = partition(&mesh, 3, &mut IsaacRng::seed_from_u64(2));
    let fragments = build_fragments(
        &buckets,
        &mesh,
        &ShatterConfig::default(),
        &ledger,
        &mut IsaacRng::seed_from_u64(2),
    );

    for (i, fragment) in fragments.iter().enumerate() {
        assert_eq!(fragment.index(), i);
        assert_eq!(fragment.placement(), &placement);
        assert_relative_eq!(fragment.direction().norm(), 1.0, epsilon = 1.0e-5);
        assert_eq!(*fragment.centroid(), fragment.mesh().local_aabb().center());
        assert!(fragment.color().iter().all(|c| (0.0..=1.0).contains(c)));
    }
}

#[test]
fn zero_force_is_the_rest_pose() {
    let volume = ShatterVolume::new(Vector::new(4.0, 2.0, 4.0)).unwrap();
    let placement = MeshPlacement {
        position: Point::new(0.5, 1.0, 0.0),
        rotation: Rotation::from_euler_angles(0.2, 0.0, 0.4),
        scale: Vector::repeat(1.5),
    };
    let mesh = cube().with_placement(placement);

    for planner in [PosePlanner::new(None), PosePlanner::new(Some(volume))] {
        let ledger = GeometryLedger::new();
        let mut rng = IsaacRng::seed_from_u64(4);
        let buckets = partition(&mesh, 4, &mut rng);
        let mut fragments =
            build_fragments(&buckets, &mesh, &ShatterConfig::default(), &ledger, &mut rng);
        planner.plan_all(&mut fragments, &mut rng);

        for fragment in &fragments {
            let rest = fragment.world_pose(0.0, 1.0);
            assert_eq!(rest.translation.vector, placement.position.coords);
            assert_eq!(rest.rotation, placement.rotation);
            assert_eq!(fragment.pose().target_position.is_some(), planner.targets_volume());

            let exploded = fragment.world_pose(1.0, 1.0);
            if let Some(target) = fragment.pose().target_position {
                assert!(volume.aabb().contains_local_point(&target));
                assert_relative_eq!(
                    exploded.translation.vector,
                    target.coords,
                    epsilon = 1.0e-5
                );
            }
        }
    }
}

#[test]
fn cube_shatter_end_to_end() {
    let config = ShatterConfig {
        fragment_count: 3,
        solid: true,
        volume: None,
    };
    let mut session = ShatterSession::new(cube(), config);
    let mut rng = IsaacRng::seed_from_u64(123);
    let mut previous = 0;

    for round in 0..10 {
        let released_before = session.ledger().released();
        let count = session.shatter(&mut rng).len();

        assert!((1..=3).contains(&count), "got {} fragments", count);
        assert_eq!(session.ledger().released(), released_before + previous);
        assert_eq!(session.ledger().live(), count, "round {}", round);

        for fragment in session.fragments() {
            assert!(!fragment.mesh().vertices().is_empty());
            assert!(fragment.mesh().local_aabb().is_valid());
        }

        previous = count;
    }

    session.reset();
    assert_eq!(session.ledger().live(), 0);
}

#[test]
fn flat_mesh_falls_back_to_shells() {
    let quad = TriangleSoup::new(vec![
        Triangle::new(
            Point::new(0.0, 0.0, 0.0),
            Point::new(1.0, 0.0, 0.0),
            Point::new(1.0, 1.0, 0.0),
        ),
        Triangle::new(
            Point::new(0.0, 0.0, 0.0),
            Point::new(1.0, 1.0, 0.0),
            Point::new(0.0, 1.0, 0.0),
        ),
    ]);
    let mut session = ShatterSession::new(
        quad,
        ShatterConfig {
            fragment_count: 1,
            ..ShatterConfig::default()
        },
    );

    let fragments = session.shatter(&mut IsaacRng::seed_from_u64(0));
    assert_eq!(fragments.len(), 1);
    assert_eq!(fragments[0].kind(), GeometryKind::Shell);
    assert_eq!(fragments[0].mesh().num_triangles(), 2);
}
