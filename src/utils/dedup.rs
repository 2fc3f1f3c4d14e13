use crate::math::{Point, Real};
use crate::utils::hashmap::{Entry, HashMap};

/// A hashable key identifying a point by the exact bit pattern of its coordinates.
///
/// `-0.0` and `0.0` are folded together so that the key agrees with `==` on finite inputs.
#[derive(Copy, Clone, Debug, PartialEq, Eq, Hash)]
pub struct PointKey([u32; 3]);

impl PointKey {
    /// The key of `pt`.
    pub fn new(pt: &Point<Real>) -> Self {
        let bits = |x: Real| if x == 0.0 { 0u32 } else { x.to_bits() };
        PointKey([bits(pt.x), bits(pt.y), bits(pt.z)])
    }
}

/// Returns the distinct points of `pts`, in order of first occurrence.
pub fn dedup_points<'a, I>(pts: I) -> Vec<Point<Real>>
where
    I: IntoIterator<Item = &'a Point<Real>>,
{
    let mut seen = HashMap::new();
    let mut result = Vec::new();

    for pt in pts {
        if let Entry::Vacant(e) = seen.entry(PointKey::new(pt)) {
            let _ = e.insert(());
            result.push(*pt);
        }
    }

    result
}

#[cfg(test)]
mod test {
    use super::dedup_points;
    use crate::math::Point;

    #[test]
    fn dedup_keeps_first_occurrence_order() {
        let pts = [
            Point::new(1.0, 0.0, 0.0),
            Point::new(0.0, 0.0, 0.0),
            Point::new(1.0, 0.0, 0.0),
            Point::new(-0.0, 0.0, 0.0),
            Point::new(0.0, 2.0, 0.0),
        ];

        let distinct = dedup_points(&pts);

        assert_eq!(
            distinct,
            vec![
                Point::new(1.0, 0.0, 0.0),
                Point::new(0.0, 0.0, 0.0),
                Point::new(0.0, 2.0, 0.0),
            ]
        );
    }
}
