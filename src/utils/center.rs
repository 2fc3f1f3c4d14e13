use crate::math::{Point, Real};

/// Computes the center of a set of point.
///
/// Returns the origin if `pts` is empty.
#[inline]
pub fn center(pts: &[Point<Real>]) -> Point<Real> {
    if pts.is_empty() {
        return Point::origin();
    }

    let denom: Real = 1.0 / pts.len() as Real;

    let mut res = Point::origin();

    for pt in pts {
        res += pt.coords * denom;
    }

    res
}
