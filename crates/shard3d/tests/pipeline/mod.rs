use shard3d::math::Point;
use shard3d::shape::{Triangle, TriangleSoup};

mod dataset;
mod fragments;
mod partition;
mod projection;

/// The 12 triangles of the cube `[-1, 1]³`, facing outward.
pub fn cube() -> TriangleSoup {
    let v = |x: f32, y: f32, z: f32| Point::new(x, y, z);
    let quads = [
        [v(-1., -1., -1.), v(-1., 1., -1.), v(1., 1., -1.), v(1., -1., -1.)],
        [v(-1., -1., 1.), v(1., -1., 1.), v(1., 1., 1.), v(-1., 1., 1.)],
        [v(-1., -1., -1.), v(1., -1., -1.), v(1., -1., 1.), v(-1., -1., 1.)],
        [v(-1., 1., -1.), v(-1., 1., 1.), v(1., 1., 1.), v(1., 1., -1.)],
        [v(-1., -1., -1.), v(-1., -1., 1.), v(-1., 1., 1.), v(-1., 1., -1.)],
        [v(1., -1., -1.), v(1., 1., -1.), v(1., 1., 1.), v(1., -1., 1.)],
    ];

    TriangleSoup::new(
        quads
            .iter()
            .flat_map(|[a, b, c, d]| [Triangle::new(*a, *b, *c), Triangle::new(*a, *c, *d)])
            .collect(),
    )
}
