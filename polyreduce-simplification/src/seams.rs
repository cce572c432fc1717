//! Seam detection
//!
//! A seam vertex sits on a boundary of the surface (an open edge, a UV split,
//! the border between two terrain chunks). Moving one would open a visible
//! gap, so the simplifier never collapses them.

use crate::mesh_graph::MeshGraph;
use std::collections::{BTreeMap, BTreeSet};

/// Ends of the open chain of fan edges collected so far, in winding order.
type Chain = (usize, usize);

/// Classify every vertex of `graph`, returning the set of seam vertices.
///
/// A vertex is interior (not a seam) when it has at least three adjacent
/// triangles and the edges opposite to it can be chained into one closed
/// loop of at least three triangles. Vertices that no triangle references
/// are not seams: removing them cannot open a gap.
pub fn find_seams(graph: &MeshGraph) -> BTreeSet<usize> {
    (0..graph.vertex_count())
        .filter(|&v| is_seam(graph, v))
        .collect()
}

pub fn is_seam(graph: &MeshGraph, v: usize) -> bool {
    let triangles = graph.adjacent_triangles(v);

    if triangles.is_empty() {
        return false;
    }
    if triangles.len() < 3 {
        return true;
    }

    let pairs: BTreeMap<usize, Chain> = triangles
        .iter()
        .filter_map(|&t| opposite_pair(graph, v, t).map(|pair| (t, pair)))
        .collect();

    let mut in_loop = BTreeSet::new();

    for (&start, &pair) in &pairs {
        in_loop.clear();
        in_loop.insert(start);

        if close_loop(pair, &mut in_loop, &pairs) && in_loop.len() >= 3 {
            return false;
        }
    }

    true
}

/// The two vertices of `t` other than `v`, in the triangle's winding order
/// starting after `v`.
fn opposite_pair(graph: &MeshGraph, v: usize, t: usize) -> Option<Chain> {
    match graph.triangle(t) {
        [a, b, c] if a == v => Some((b, c)),
        [a, b, c] if b == v => Some((c, a)),
        [a, b, c] if c == v => Some((a, b)),
        _ => None,
    }
}

/// Grow `chain` with unused fan edges until its ends meet.
///
/// Every round either consumes one triangle or gives up, so the walk is
/// bounded by the fan size even on non-manifold input.
fn close_loop(
    mut chain: Chain,
    in_loop: &mut BTreeSet<usize>,
    pairs: &BTreeMap<usize, Chain>,
) -> bool {
    'grow: while in_loop.len() < pairs.len() {
        for (&t, &(a, b)) in pairs {
            if in_loop.contains(&t) {
                continue;
            }

            let a_match = chain.0 == b;
            let b_match = chain.1 == a;

            if !a_match && !b_match {
                continue;
            }

            in_loop.insert(t);

            if a_match && b_match {
                return true;
            }

            chain = if a_match { (a, chain.1) } else { (chain.0, b) };
            continue 'grow;
        }

        return false;
    }

    false
}
