//! Progressive simplification driver
//!
//! The [`Simplifier`] owns the graph, the collapse queue and the log of
//! every collapse it has ever performed. Lowering the vertex count past the
//! end of the log computes new collapses; anything already in the log is
//! replayed forward or backward, so scrubbing between quality levels costs
//! time proportional to the change in vertex count.

use crate::collapse_queue::{CollapseQueue, Edge};
use crate::collapse_step::CollapseStep;
use crate::cost::CostModel;
use crate::mesh_graph::MeshGraph;
use crate::seams::find_seams;
use polyreduce_core::{Error, Result, TriangleMesh};
use std::collections::BTreeSet;
use tracing::{debug, error, info, trace};

#[derive(Debug)]
pub struct Simplifier {
    graph: MeshGraph,
    seams: BTreeSet<usize>,
    queue: CollapseQueue,
    cost_model: CostModel,
    steps: Vec<CollapseStep>,
    /// Number of steps of `steps` currently applied to `graph`
    applied_steps: usize,
}

impl Simplifier {
    /// Take ownership of `graph`, classify its seams and rank every
    /// collapsible vertex.
    pub fn new(graph: MeshGraph, cost_model: CostModel) -> Result<Self> {
        let seams = find_seams(&graph);

        let mut simplifier = Self {
            graph,
            seams,
            queue: CollapseQueue::new(),
            cost_model,
            steps: Vec::new(),
            applied_steps: 0,
        };

        for u in 0..simplifier.graph.vertex_count() {
            if simplifier.seams.contains(&u) || simplifier.graph.is_vertex_deleted(u) {
                continue;
            }
            let edge = simplifier.cheapest_collapse(u)?;
            simplifier.queue.add(edge)?;
        }

        info!(
            vertices = simplifier.graph.vertex_count(),
            triangles = simplifier.graph.triangle_count(),
            seams = simplifier.seams.len(),
            "built simplification graph"
        );

        Ok(simplifier)
    }

    pub fn from_triangle_mesh(mesh: &TriangleMesh, cost_model: CostModel) -> Result<Self> {
        Self::new(MeshGraph::from_triangle_mesh(mesh)?, cost_model)
    }

    pub fn graph(&self) -> &MeshGraph {
        &self.graph
    }

    pub fn seams(&self) -> &BTreeSet<usize> {
        &self.seams
    }

    pub fn queue(&self) -> &CollapseQueue {
        &self.queue
    }

    pub fn cost_model(&self) -> CostModel {
        self.cost_model
    }

    /// Every collapse recorded so far, applied or not
    pub fn steps(&self) -> &[CollapseStep] {
        &self.steps
    }

    /// Index of the last applied step, `None` when the mesh is at full detail
    pub fn last_applied_step(&self) -> Option<usize> {
        self.applied_steps.checked_sub(1)
    }

    pub fn current_vertex_count(&self) -> usize {
        self.graph.live_vertex_count()
    }

    /// Vertex count for a reduction factor in [0, 1]. Seams are always
    /// kept; the remaining vertices shrink proportionally.
    pub fn target_vertex_count(&self, reduction_factor: f32) -> usize {
        let seam_count = self.seams.len();
        let collapsible = self.graph.vertex_count() - seam_count;
        let keep = 1.0 - reduction_factor.clamp(0.0, 1.0);

        seam_count + (collapsible as f32 * keep).floor() as usize
    }

    pub fn set_reduction_factor(&mut self, reduction_factor: f32) -> Result<()> {
        self.set_target_vertex_count(self.target_vertex_count(reduction_factor))
    }

    /// Collapse, replay or undo steps until `target` vertices are live.
    ///
    /// Undo stops early when every recorded step has been undone. On an
    /// invariant violation the pass stops; the graph is left in the state of
    /// the last fully applied step.
    pub fn set_target_vertex_count(&mut self, target: usize) -> Result<()> {
        let start = self.current_vertex_count();
        let (mut computed, mut replayed, mut undone) = (0usize, 0usize, 0usize);

        while self.current_vertex_count() > target {
            if self.applied_steps == self.steps.len() {
                self.apply_new_collapse_step().inspect_err(|e| {
                    error!(
                        target_vertices = target,
                        current = self.current_vertex_count(),
                        "simplification aborted: {e}"
                    );
                })?;
                computed += 1;
            } else {
                self.redo_collapse_step();
                replayed += 1;
            }
        }

        while self.applied_steps > 0 && self.current_vertex_count() < target {
            self.undo_collapse_step();
            undone += 1;
        }

        if start != self.current_vertex_count() {
            debug!(
                from = start,
                to = self.current_vertex_count(),
                computed,
                replayed,
                undone,
                "changed quality level"
            );
        }

        Ok(())
    }

    fn redo_collapse_step(&mut self) {
        self.steps[self.applied_steps].apply(&mut self.graph);
        self.applied_steps += 1;
    }

    fn undo_collapse_step(&mut self) {
        self.applied_steps -= 1;
        self.steps[self.applied_steps].undo(&mut self.graph);
    }

    fn apply_new_collapse_step(&mut self) -> Result<()> {
        let edge = self.queue.pop_minimum_cost()?;
        let step = CollapseStep::new(&self.graph, edge.from, edge.to);

        // Snapshot: applying the step rebuilds this set
        let neighbors = self.graph.neighbor_vertices(edge.from).clone();

        step.apply(&mut self.graph);
        self.steps.push(step);
        self.applied_steps += 1;

        trace!(from = edge.from, to = ?edge.to, cost = edge.cost, "collapsed vertex");

        for n in neighbors {
            if self.seams.contains(&n) {
                continue;
            }
            self.update_cost(n)?;
        }

        Ok(())
    }

    fn update_cost(&mut self, u: usize) -> Result<()> {
        self.queue.remove_by_vertex(u)?;
        let edge = self.cheapest_collapse(u)?;
        self.queue.add(edge)
    }

    /// Cheapest collapse leaving `u`, or the isolated sentinel when `u` has
    /// no triangles left.
    fn cheapest_collapse(&self, u: usize) -> Result<Edge> {
        let u_triangles = self.graph.adjacent_triangles(u);

        if u_triangles.is_empty() {
            return Ok(Edge::isolated(u));
        }

        let candidates: BTreeSet<usize> = u_triangles
            .iter()
            .flat_map(|&t| self.graph.triangle(t))
            .filter(|&v| v != u)
            .collect();

        let mut best: Option<Edge> = None;
        for v in candidates {
            let cost = self.cost_model.cost(u, v, &self.graph);
            if best.map_or(true, |b| cost < b.cost) {
                best = Some(Edge::new(cost, u, v));
            }
        }

        best.ok_or_else(|| Error::invariant(format!("could not determine a collapse cost for vertex {u}")))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::test_meshes::*;

    fn simplifier(mesh: &TriangleMesh) -> Simplifier {
        Simplifier::from_triangle_mesh(mesh, CostModel::PreserveDetail).unwrap()
    }

    /// Every collapsible vertex holds exactly one queue entry
    fn assert_queue_consistent(s: &Simplifier) {
        let expected: BTreeSet<usize> = (0..s.graph().vertex_count())
            .filter(|&v| !s.seams().contains(&v) && !s.graph().is_vertex_deleted(v))
            .collect();
        let queued: BTreeSet<usize> = s.queue().vertices().collect();
        assert_eq!(queued, expected);
        assert_eq!(s.queue().len(), expected.len());
    }

    #[test]
    fn test_initial_queue_covers_collapsible_vertices() {
        let s = simplifier(&curved_grid(6));
        assert_eq!(s.seams().len(), 20);
        assert_eq!(s.queue().len(), 16);
        assert_queue_consistent(&s);
        assert_eq!(s.last_applied_step(), None);
    }

    #[test]
    fn test_target_vertex_count() {
        let s = simplifier(&curved_grid(6));
        assert_eq!(s.target_vertex_count(0.0), 36);
        assert_eq!(s.target_vertex_count(0.5), 20 + 8);
        assert_eq!(s.target_vertex_count(1.0), 20);
        assert_eq!(s.target_vertex_count(7.0), 20);
    }

    #[test]
    fn test_cube_half_reduction() {
        let mut s = simplifier(&cube());
        assert!(s.seams().is_empty());

        s.set_reduction_factor(0.5).unwrap();
        assert_eq!(s.current_vertex_count(), 4);
        assert_eq!(s.last_applied_step(), Some(3));

        let graph = s.graph();
        for t in graph.live_triangles() {
            for v in graph.triangle(t) {
                assert!(!graph.is_vertex_deleted(v), "triangle {t} references deleted vertex {v}");
            }
        }
        assert_queue_consistent(&s);
    }

    #[test]
    fn test_exact_vertex_counts() {
        let mut s = simplifier(&curved_grid(7));
        let seam_count = s.seams().len();
        let total = s.graph().vertex_count();

        for target in (seam_count..=total).rev().step_by(3).chain([total, seam_count + 1]) {
            s.set_target_vertex_count(target).unwrap();
            assert_eq!(s.current_vertex_count(), target);
            assert_queue_consistent(&s);
        }
    }

    #[test]
    fn test_undo_restores_original_graph() {
        let original = simplifier(&curved_grid(6));
        let mut s = simplifier(&curved_grid(6));

        s.set_reduction_factor(0.8).unwrap();
        assert_ne!(s.graph(), original.graph());

        s.set_reduction_factor(0.0).unwrap();
        assert_eq!(s.graph(), original.graph());
        assert_eq!(s.last_applied_step(), None);
        assert!(!s.steps().is_empty());
    }

    #[test]
    fn test_replay_reuses_recorded_steps() {
        let mut s = simplifier(&curved_grid(6));

        s.set_reduction_factor(1.0).unwrap();
        let recorded = s.steps().len();
        let reduced = s.graph().clone();

        s.set_reduction_factor(0.25).unwrap();
        s.set_reduction_factor(1.0).unwrap();

        assert_eq!(s.steps().len(), recorded);
        assert_eq!(s.graph(), &reduced);
    }

    #[test]
    fn test_same_target_twice_is_noop() {
        let mut s = simplifier(&cube());
        s.set_reduction_factor(0.5).unwrap();

        let steps = s.steps().len();
        let cursor = s.last_applied_step();
        let graph = s.graph().clone();

        s.set_reduction_factor(0.5).unwrap();
        assert_eq!(s.steps().len(), steps);
        assert_eq!(s.last_applied_step(), cursor);
        assert_eq!(s.graph(), &graph);
    }

    #[test]
    fn test_seams_survive_full_reduction() {
        let mut s = simplifier(&curved_grid(6));
        s.set_reduction_factor(1.0).unwrap();

        for &v in s.seams() {
            assert!(!s.graph().is_vertex_deleted(v));
        }
        assert_eq!(s.current_vertex_count(), s.seams().len());
    }

    #[test]
    fn test_target_below_seams_aborts_pass() {
        let mut s = simplifier(&curved_grid(6));
        let seam_count = s.seams().len();

        let result = s.set_target_vertex_count(seam_count - 1);
        assert!(matches!(result, Err(Error::Invariant(_))));

        assert_eq!(s.current_vertex_count(), seam_count);
        for &v in s.seams() {
            assert!(!s.graph().is_vertex_deleted(v));
        }
        assert!(s.queue().is_empty());
        assert_queue_consistent(&s);

        s.set_reduction_factor(0.5).unwrap();
        assert_eq!(s.current_vertex_count(), s.target_vertex_count(0.5));
        assert_eq!(s.current_vertex_count(), 28);
        assert_queue_consistent(&s);
    }

    #[test]
    fn test_flat_quad_never_changes() {
        let mut s = simplifier(&flat_quad());
        assert_eq!(s.seams().len(), 4);
        assert!(s.queue().is_empty());

        for factor in [0.0, 0.5, 1.0] {
            s.set_reduction_factor(factor).unwrap();
            assert_eq!(s.current_vertex_count(), 4);
        }
        assert!(s.steps().is_empty());
    }

    #[test]
    fn test_isolated_vertex_goes_first() {
        for model in [CostModel::PreserveDetail, CostModel::RemoveDetail] {
            let mut s = Simplifier::from_triangle_mesh(&cube_with_isolated_vertex(), model).unwrap();
            s.set_target_vertex_count(8).unwrap();

            assert!(s.graph().is_vertex_deleted(8));
            assert_eq!(s.steps()[0].from_vertex(), 8);
            assert_eq!(s.steps()[0].to_vertex(), None);
        }
    }
}
