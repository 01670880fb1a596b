//! Topological ordering of the condensation DAG (Kahn's algorithm).
//!
//! Zero in-degree vertices seed a FIFO queue in increasing index order.
//! Successors are enqueued in adjacency order as their in-degree reaches
//! zero; they are never re-sorted. The output is therefore a deterministic
//! function of the graph's insertion order.
//!
//! If fewer vertices are emitted than the graph holds, the graph has a cycle.
//! For a condensation that can only happen through an upstream bug, so it is
//! reported as [`GraphError::CondensationCycle`] and no partial order escapes.

use std::collections::VecDeque;

use serde::Serialize;
use tracing::{debug, instrument};

use crate::error::GraphError;
use crate::graph::Graph;
use crate::metrics::{Metrics, Staged};

/// A permutation of `0..n` consistent with every edge of the ordered graph.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(transparent)]
pub struct TopoOrder(Vec<usize>);

impl TopoOrder {
    #[must_use]
    pub fn as_slice(&self) -> &[usize] {
        &self.0
    }

    #[must_use]
    pub fn len(&self) -> usize {
        self.0.len()
    }

    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.0.is_empty()
    }

    pub fn iter(&self) -> impl Iterator<Item = usize> + '_ {
        self.0.iter().copied()
    }

    /// Inverse permutation: `positions()[v]` is the rank of vertex `v`.
    #[must_use]
    pub fn positions(&self) -> Vec<usize> {
        let mut positions = vec![0; self.0.len()];
        for (rank, &vertex) in self.0.iter().enumerate() {
            if let Some(slot) = positions.get_mut(vertex) {
                *slot = rank;
            }
        }
        positions
    }

    /// Return `true` if every edge `u → v` of `graph` has `u` ranked before `v`.
    #[must_use]
    pub fn is_consistent_with(&self, graph: &Graph) -> bool {
        if self.0.len() != graph.vertex_count() {
            return false;
        }
        let positions = self.positions();
        graph
            .edges()
            .iter()
            .all(|e| positions[e.from] < positions[e.to])
    }

    #[must_use]
    pub fn into_inner(self) -> Vec<usize> {
        self.0
    }
}

/// Order the vertices of `dag` with Kahn's algorithm.
///
/// Each enqueue and dequeue is counted in the returned metrics.
///
/// # Errors
///
/// Returns [`GraphError::CondensationCycle`] if `dag` is not acyclic.
#[instrument(skip_all, fields(vertices = dag.vertex_count(), edges = dag.edge_count()))]
pub fn kahn(dag: &Graph) -> Result<Staged<TopoOrder>, GraphError> {
    let n = dag.vertex_count();
    let staged = Metrics::measure(|metrics| {
        let mut in_degree = vec![0_usize; n];
        for edge in dag.edges() {
            in_degree[edge.to] += 1;
        }

        let mut queue: VecDeque<usize> = VecDeque::new();
        for (vertex, _) in in_degree.iter().enumerate().filter(|(_, d)| **d == 0) {
            queue.push_back(vertex);
            metrics.record_push();
        }

        let mut order = Vec::with_capacity(n);
        while let Some(vertex) = queue.pop_front() {
            metrics.record_pop();
            order.push(vertex);
            for edge in dag.out_edges(vertex) {
                in_degree[edge.to] -= 1;
                if in_degree[edge.to] == 0 {
                    queue.push_back(edge.to);
                    metrics.record_push();
                }
            }
        }
        order
    });

    if staged.output.len() != n {
        return Err(GraphError::CondensationCycle {
            placed: staged.output.len(),
            expected: n,
        });
    }

    debug!(
        pushes = staged.metrics.counters.pushes,
        pops = staged.metrics.counters.pops,
        "topological sort complete"
    );
    Ok(staged.map(TopoOrder))
}
