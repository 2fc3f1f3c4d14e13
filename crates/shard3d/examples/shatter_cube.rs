use rand::SeedableRng;
use rand_isaac::IsaacRng;
use shard3d::math::{Point, Vector};
use shard3d::projection::{OrbitCamera, Viewport};
use shard3d::shape::{Triangle, TriangleSoup};
use shard3d::shatter::{ShatterConfig, ShatterSession, ShatterVolume};

fn cube() -> TriangleSoup {
    let mut positions = Vec::new();

    for axis in 0..3 {
        for sign in [-1.0f32, 1.0] {
            let corner = |u: f32, v: f32| {
                let mut p = Vector::zeros();
                p[axis] = sign;
                p[(axis + 1) % 3] = u * sign;
                p[(axis + 2) % 3] = v;
                Point::from(p)
            };
            let quad = [corner(-1.0, -1.0), corner(1.0, -1.0), corner(1.0, 1.0), corner(-1.0, 1.0)];
            positions.extend_from_slice(&[quad[0], quad[1], quad[2], quad[0], quad[2], quad[3]]);
        }
    }

    TriangleSoup::from_positions(&positions)
}

fn main() {
    let config = ShatterConfig {
        fragment_count: 6,
        solid: true,
        volume: ShatterVolume::new(Vector::new(4.0, 3.0, 4.0)).ok(),
    };
    let mut session = ShatterSession::new(cube(), config);
    let mut rng = IsaacRng::seed_from_u64(0);
    let viewport = Viewport::new(1280, 720);
    let camera = OrbitCamera::default().to_camera(viewport.aspect());

    for round in 0..2 {
        let fragments = session.shatter(&mut rng);
        println!("Round {}: {} fragments.", round, fragments.len());

        for fragment in fragments {
            let first: Triangle = fragment.mesh().triangles().next().unwrap_or(Triangle::new(
                Point::origin(),
                Point::origin(),
                Point::origin(),
            ));
            println!(
                "  #{} {:?}: {} triangles, direction {:?}, first triangle area {:.3}",
                fragment.index(),
                fragment.kind(),
                fragment.mesh().num_triangles(),
                fragment.direction().into_inner(),
                first.area()
            );
        }

        for force in [0.0, 0.5, 1.0] {
            for b in session.boxes(&camera, &viewport, force, 1.0) {
                println!(
                    "  force {:.1} {}: [{:.1}, {:.1}, {:.1}, {:.1}]",
                    force, b.label, b.left, b.top, b.width, b.height
                );
            }
        }

        println!("  live geometry: {}", session.ledger().live());
    }

    session.reset();
    println!("After reset: {} live geometry.", session.ledger().live());
}
