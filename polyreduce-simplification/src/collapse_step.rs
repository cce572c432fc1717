//! Recorded, reversible edge collapses
//!
//! A [`CollapseStep`] is computed once from the graph state right before the
//! collapse and is plain data afterwards. [`CollapseStep::apply`] and
//! [`CollapseStep::undo`] replay that delta against the graph, so moving
//! between quality levels never recomputes costs or adjacency.

use crate::mesh_graph::MeshGraph;
use polyreduce_core::Vector3f;
use std::collections::{BTreeMap, BTreeSet};

/// Normal of a triangle before and after the collapse
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct NormalUpdate {
    pub triangle: usize,
    pub from: Vector3f,
    pub to: Vector3f,
}

/// Everything that changes in a [`MeshGraph`] when `from` collapses into `to`.
#[derive(Debug, Clone, PartialEq)]
pub struct CollapseStep {
    from: usize,
    to: Option<usize>,
    /// Triangles holding both endpoints; they degenerate and are deleted.
    triangle_deletions: BTreeSet<usize>,
    /// Surviving triangles of `from` whose slot is rewritten to `to`
    vertex_replacements: Vec<usize>,
    normal_updates: Vec<NormalUpdate>,
    adjacent_triangle_removals: BTreeMap<usize, BTreeSet<usize>>,
    adjacent_triangle_additions: BTreeMap<usize, BTreeSet<usize>>,
    /// Vertices whose neighbor sets must be rebuilt after the change
    affected_vertices: BTreeSet<usize>,
}

impl CollapseStep {
    /// Record the collapse of `from` into `to` against the current state of
    /// `graph`. With `to == None`, `from` is an isolated vertex and the step
    /// only deletes it.
    pub fn new(graph: &MeshGraph, from: usize, to: Option<usize>) -> Self {
        let mut step = Self {
            from,
            to,
            triangle_deletions: BTreeSet::new(),
            vertex_replacements: Vec::new(),
            normal_updates: Vec::new(),
            adjacent_triangle_removals: BTreeMap::new(),
            adjacent_triangle_additions: BTreeMap::new(),
            affected_vertices: BTreeSet::new(),
        };

        let Some(v) = to else {
            return step;
        };
        let u = from;

        for &t in graph.adjacent_triangles(u) {
            if graph.triangle_has_vertex(t, v) {
                step.triangle_deletions.insert(t);

                // u keeps its own adjacency; it is deleted along with the step
                for vertex in graph.triangle(t) {
                    if vertex != u {
                        step.adjacent_triangle_removals
                            .entry(vertex)
                            .or_default()
                            .insert(t);
                    }
                }
                continue;
            }

            step.vertex_replacements.push(t);
            // t cannot already be at v: every triangle holding both u and v
            // is deleted above
            step.adjacent_triangle_additions
                .entry(v)
                .or_default()
                .insert(t);
            step.normal_updates.push(NormalUpdate {
                triangle: t,
                from: graph.triangle_normal(t),
                to: graph.triangle_normal_with_replacement(t, u, v),
            });
        }

        step.affected_vertices.insert(v);
        step.affected_vertices.extend(graph.neighbor_vertices(u));
        step.affected_vertices.extend(graph.neighbor_vertices(v));

        step
    }

    pub fn from_vertex(&self) -> usize {
        self.from
    }

    pub fn to_vertex(&self) -> Option<usize> {
        self.to
    }

    pub fn triangle_deletions(&self) -> &BTreeSet<usize> {
        &self.triangle_deletions
    }

    pub fn vertex_replacements(&self) -> &[usize] {
        &self.vertex_replacements
    }

    pub fn normal_updates(&self) -> &[NormalUpdate] {
        &self.normal_updates
    }

    /// Replay the collapse on `graph`.
    pub fn apply(&self, graph: &mut MeshGraph) {
        graph.set_vertex_deleted(self.from, true);

        let Some(v) = self.to else {
            return;
        };

        for &t in &self.triangle_deletions {
            graph.set_triangle_deleted(t, true);
        }

        // Removals first: v must drop the triangles it shared with u before
        // it gains u's remaining ones.
        for (&vertex, triangles) in &self.adjacent_triangle_removals {
            for &t in triangles {
                graph.remove_adjacent_triangle(vertex, t);
            }
        }
        for (&vertex, triangles) in &self.adjacent_triangle_additions {
            for &t in triangles {
                graph.add_adjacent_triangle(vertex, t);
            }
        }

        for &t in &self.vertex_replacements {
            graph.replace_vertex(t, self.from, v);
        }

        for update in &self.normal_updates {
            graph.set_triangle_normal(update.triangle, update.to);
        }

        self.recalculate_neighbor_vertices(graph);
    }

    /// Exact reverse of [`apply`](Self::apply).
    pub fn undo(&self, graph: &mut MeshGraph) {
        graph.set_vertex_deleted(self.from, false);

        let Some(v) = self.to else {
            return;
        };

        for update in &self.normal_updates {
            graph.set_triangle_normal(update.triangle, update.from);
        }

        for &t in &self.vertex_replacements {
            graph.replace_vertex(t, v, self.from);
        }

        for (&vertex, triangles) in &self.adjacent_triangle_additions {
            for &t in triangles {
                graph.remove_adjacent_triangle(vertex, t);
            }
        }
        for (&vertex, triangles) in &self.adjacent_triangle_removals {
            for &t in triangles {
                graph.add_adjacent_triangle(vertex, t);
            }
        }

        for &t in &self.triangle_deletions {
            graph.set_triangle_deleted(t, false);
        }

        self.recalculate_neighbor_vertices(graph);
    }

    fn recalculate_neighbor_vertices(&self, graph: &mut MeshGraph) {
        for &vertex in &self.affected_vertices {
            graph.recalculate_neighbor_vertices(vertex);
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::test_meshes::*;

    #[test]
    fn test_collapse_on_octahedron() {
        let mut graph = MeshGraph::from_triangle_mesh(&octahedron()).unwrap();
        // 0 (+x) into 2 (+y): they share triangles 0 and 4
        let step = CollapseStep::new(&graph, 0, Some(2));

        assert_eq!(step.triangle_deletions().iter().copied().collect::<Vec<_>>(), vec![0, 4]);
        assert_eq!(step.vertex_replacements(), &[3, 7]);
        assert_eq!(step.normal_updates().len(), 2);

        step.apply(&mut graph);

        assert!(graph.is_vertex_deleted(0));
        assert_eq!(graph.live_vertex_count(), 5);
        assert_eq!(graph.live_triangle_count(), 6);
        assert_eq!(graph.triangle(3), [3, 2, 4]);
        assert_eq!(graph.triangle(7), [2, 3, 5]);

        for t in graph.live_triangles() {
            assert!(!graph.triangle_has_vertex(t, 0));
        }
        for v in graph.live_vertices() {
            assert!(!graph.neighbor_vertices(v).contains(&0), "vertex {v} still sees 0");
            for &t in graph.adjacent_triangles(v) {
                assert!(!graph.is_triangle_deleted(t));
                assert!(graph.triangle_has_vertex(t, v));
            }
        }
        assert_eq!(
            graph.neighbor_vertices(2).iter().copied().collect::<Vec<_>>(),
            vec![1, 3, 4, 5]
        );
    }

    #[test]
    fn test_apply_undo_round_trip() {
        let original = MeshGraph::from_triangle_mesh(&octahedron()).unwrap();
        let mut graph = original.clone();

        let step = CollapseStep::new(&graph, 0, Some(2));
        step.apply(&mut graph);
        assert_ne!(graph, original);

        step.undo(&mut graph);
        assert_eq!(graph, original);

        // Replaying after an undo lands on the same state as the first apply
        let mut once = original.clone();
        step.apply(&mut once);
        step.apply(&mut graph);
        assert_eq!(graph, once);
    }

    #[test]
    fn test_chained_round_trip() {
        let original = MeshGraph::from_triangle_mesh(&cube()).unwrap();
        let mut graph = original.clone();
        let mut steps = Vec::new();

        for (u, v) in [(0, 1), (3, 2), (4, 5)] {
            let step = CollapseStep::new(&graph, u, Some(v));
            step.apply(&mut graph);
            steps.push(step);
        }
        assert_eq!(graph.live_vertex_count(), 5);

        for step in steps.iter().rev() {
            step.undo(&mut graph);
        }
        assert_eq!(graph, original);
    }

    #[test]
    fn test_isolated_step_only_deletes_vertex() {
        let original = MeshGraph::from_triangle_mesh(&cube_with_isolated_vertex()).unwrap();
        let mut graph = original.clone();

        let step = CollapseStep::new(&graph, 8, None);
        assert!(step.triangle_deletions().is_empty());
        assert!(step.vertex_replacements().is_empty());

        step.apply(&mut graph);
        assert!(graph.is_vertex_deleted(8));
        assert_eq!(graph.live_triangle_count(), 12);

        step.undo(&mut graph);
        assert_eq!(graph, original);
    }
}
