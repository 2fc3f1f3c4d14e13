use super::ConvexHullError;
#[cfg(debug_assertions)]
use super::TriangleFacet;
use crate::math::{Point, Real};
use crate::utils::hashmap::{Entry, HashMap};
use crate::utils::{PointKey, SortedPair};

/// Checks that the adjacency information of a facet is symmetric.
#[cfg(debug_assertions)]
pub fn check_facet_links(ifacet: usize, facets: &[TriangleFacet]) -> bool {
    let facet = &facets[ifacet];

    if facet.adj.iter().any(|adj| !facets[*adj].valid) {
        return false;
    }

    (0..3).all(|i| {
        let adj_facet = &facets[facet.adj[i]];
        let back = facet.indirect_adj_id[i];

        adj_facet.adj[back] == ifacet
            && adj_facet.indirect_adj_id[back] == i
            && adj_facet.first_point_from_edge(back) == facet.second_point_from_edge(i)
            && adj_facet.second_point_from_edge(back) == facet.first_point_from_edge(i)
    })
}

/// Checks if a convex-hull is properly formed.
///
/// The hull must have no duplicate vertex, no degenerate index triplet, every edge must be
/// shared by exactly two triangles, and its Euler characteristic must be 2.
pub fn check_convex_hull(
    points: &[Point<Real>],
    triangles: &[[u32; 3]],
) -> Result<(), ConvexHullError> {
    let mut seen = HashMap::new();
    for (i, pt) in points.iter().enumerate() {
        match seen.entry(PointKey::new(pt)) {
            Entry::Vacant(e) => {
                let _ = e.insert(i);
            }
            Entry::Occupied(e) => return Err(ConvexHullError::DuplicatePoints(*e.get(), i)),
        }
    }

    let mut edges: HashMap<SortedPair<u32>, [usize; 2]> = HashMap::new();

    for (itri, tri) in triangles.iter().enumerate() {
        if tri[0] == tri[1] || tri[0] == tri[2] || tri[2] == tri[1] {
            return Err(ConvexHullError::InternalError(
                "degenerate triangle in the output.",
            ));
        }

        for i in 0..3 {
            let ivtx1 = tri[i];
            let ivtx2 = tri[(i + 1) % 3];
            let edge_key = SortedPair::new(ivtx1, ivtx2);

            match edges.entry(edge_key) {
                Entry::Vacant(e) => {
                    let _ = e.insert([itri, usize::MAX]);
                }
                Entry::Occupied(mut e) => {
                    if e.get()[1] != usize::MAX {
                        return Err(ConvexHullError::TJunction(itri, ivtx1, ivtx2));
                    }

                    e.get_mut()[1] = itri;
                }
            }
        }
    }

    if edges.values().any(|adj| adj[1] == usize::MAX) {
        return Err(ConvexHullError::UnfinishedTriangle);
    }

    // Check Euler characteristic.
    if points.len() + triangles.len() != edges.len() + 2 {
        return Err(ConvexHullError::InternalError(
            "the Euler characteristic of the hull is not 2.",
        ));
    }

    Ok(())
}
