//! Cost-ranked queue of collapse candidates
//!
//! Holds exactly one candidate edge per collapsible vertex: the cheapest
//! collapse leaving that vertex. Ties in cost are broken by insertion
//! order, which keeps the order total without perturbing the costs.

use polyreduce_core::{Error, Result};
use priority_queue::PriorityQueue;
use std::cmp::Ordering;

/// Cost reported for a vertex no triangle references. It sorts before every
/// real cost, so such vertices are always removed first.
pub const ISOLATED_COST: f32 = -1.0;

/// A candidate collapse of `from` into `to`.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Edge {
    pub cost: f32,
    pub from: usize,
    /// `None` when `from` has no triangles left and is simply deleted
    pub to: Option<usize>,
}

impl Edge {
    pub fn new(cost: f32, from: usize, to: usize) -> Self {
        Self {
            cost,
            from,
            to: Some(to),
        }
    }

    /// Candidate for a vertex with no adjacent triangles
    pub fn isolated(from: usize) -> Self {
        Self {
            cost: ISOLATED_COST,
            from,
            to: None,
        }
    }
}

#[derive(Debug, Clone)]
struct EdgeCost {
    cost: f32,
    sequence: u64,
    to: Option<usize>,
}

impl PartialEq for EdgeCost {
    fn eq(&self, other: &Self) -> bool {
        self.cmp(other) == Ordering::Equal
    }
}
impl Eq for EdgeCost {}

impl PartialOrd for EdgeCost {
    fn partial_cmp(&self, other: &Self) -> Option<Ordering> {
        Some(self.cmp(other))
    }
}

impl Ord for EdgeCost {
    fn cmp(&self, other: &Self) -> Ordering {
        // Min-heap: smallest cost first, earliest insertion first among equals
        other
            .cost
            .total_cmp(&self.cost)
            .then_with(|| other.sequence.cmp(&self.sequence))
    }
}

/// Priority queue keyed by source vertex.
#[derive(Debug, Clone, Default)]
pub struct CollapseQueue {
    queue: PriorityQueue<usize, EdgeCost>,
    next_sequence: u64,
}

impl CollapseQueue {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn len(&self) -> usize {
        self.queue.len()
    }

    pub fn is_empty(&self) -> bool {
        self.queue.is_empty()
    }

    pub fn contains(&self, vertex: usize) -> bool {
        self.queue.get_priority(&vertex).is_some()
    }

    /// Current candidate of `vertex`, if it has one
    pub fn get(&self, vertex: usize) -> Option<Edge> {
        self.queue.get_priority(&vertex).map(|p| Edge {
            cost: p.cost,
            from: vertex,
            to: p.to,
        })
    }

    /// Insert the candidate of `edge.from`. A vertex may only hold one
    /// candidate at a time.
    pub fn add(&mut self, edge: Edge) -> Result<()> {
        if self.contains(edge.from) {
            return Err(Error::invariant(format!(
                "vertex {} already has a collapse candidate",
                edge.from
            )));
        }

        let priority = EdgeCost {
            cost: edge.cost,
            sequence: self.next_sequence,
            to: edge.to,
        };
        self.next_sequence += 1;
        self.queue.push(edge.from, priority);

        Ok(())
    }

    /// Remove and return the candidate of `vertex`.
    pub fn remove_by_vertex(&mut self, vertex: usize) -> Result<Edge> {
        self.queue
            .remove(&vertex)
            .map(|(from, p)| Edge {
                cost: p.cost,
                from,
                to: p.to,
            })
            .ok_or_else(|| {
                Error::invariant(format!("vertex {vertex} has no collapse candidate to remove"))
            })
    }

    /// Remove and return the globally cheapest candidate.
    pub fn pop_minimum_cost(&mut self) -> Result<Edge> {
        self.queue
            .pop()
            .map(|(from, p)| Edge {
                cost: p.cost,
                from,
                to: p.to,
            })
            .ok_or_else(|| Error::invariant("collapse queue is empty"))
    }

    pub fn peek_minimum_cost(&self) -> Option<Edge> {
        self.queue.peek().map(|(&from, p)| Edge {
            cost: p.cost,
            from,
            to: p.to,
        })
    }

    /// Source vertices currently holding a candidate, in no particular order
    pub fn vertices(&self) -> impl Iterator<Item = usize> + '_ {
        self.queue.iter().map(|(&v, _)| v)
    }
}
