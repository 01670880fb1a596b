//! Strongly connected components via Kosaraju's two-pass traversal.
//!
//! # Algorithm
//!
//! 1. Depth-first over the original graph, taking unvisited roots in
//!    increasing index order. A vertex is pushed onto the finish stack once
//!    all its outgoing edges have been explored (post-order).
//! 2. Depth-first over the **transpose**, popping roots from the finish
//!    stack. Each pop that lands on an unvisited vertex opens a new
//!    component; everything it reaches among unassigned vertices belongs to
//!    that component.
//!
//! Both traversals use an explicit stack of `(vertex, next edge index)`
//! frames, so depth is bounded by heap memory rather than the call stack.
//!
//! # Determinism
//!
//! Membership is fixed by the graph. Component *numbering* and the order of
//! vertices inside a component follow from root order and adjacency
//! insertion order, so the same input always yields the same [`SccResult`].

#![allow(clippy::module_name_repetitions)]

use serde::Serialize;
use tracing::{debug, instrument};

use crate::graph::Graph;
use crate::metrics::{Metrics, Staged};

/// A partition of the vertex set into strongly connected components.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct SccResult {
    comp_id: Vec<usize>,
    components: Vec<Vec<usize>>,
}

impl SccResult {
    /// Number of components.
    #[must_use]
    pub fn len(&self) -> usize {
        self.components.len()
    }

    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.components.is_empty()
    }

    /// Component id of every vertex, indexed by vertex.
    #[must_use]
    pub fn comp_id(&self) -> &[usize] {
        &self.comp_id
    }

    /// Vertex lists, indexed by component id, in discovery order.
    #[must_use]
    pub fn components(&self) -> &[Vec<usize>] {
        &self.components
    }

    /// Component of `vertex`, if it is in range.
    #[must_use]
    pub fn component_of(&self, vertex: usize) -> Option<usize> {
        self.comp_id.get(vertex).copied()
    }

    /// Members of component `id`.
    #[must_use]
    pub fn members(&self, id: usize) -> Option<&[usize]> {
        self.components.get(id).map(Vec::as_slice)
    }

    /// Ids of components that contain a cycle of `graph`: more than one
    /// member, or a single member with a self-loop.
    #[must_use]
    pub fn cycle_components(&self, graph: &Graph) -> Vec<usize> {
        self.components
            .iter()
            .enumerate()
            .filter(|(_, members)| match members.as_slice() {
                [only] => graph.has_self_loop(*only),
                _ => true,
            })
            .map(|(id, _)| id)
            .collect()
    }
}

/// Decompose `graph` into strongly connected components.
///
/// Every vertex entered and every edge examined, in both passes, is counted
/// in the returned metrics.
#[must_use]
#[instrument(skip_all, fields(vertices = graph.vertex_count(), edges = graph.edge_count()))]
pub fn kosaraju(graph: &Graph) -> Staged<SccResult> {
    let staged = Metrics::measure(|metrics| {
        let mut finish_stack = finish_order(graph, metrics);
        let transpose = graph.reverse();
        assign_components(&transpose, &mut finish_stack, metrics)
    });

    debug!(
        components = staged.output.len(),
        dfs_visits = staged.metrics.counters.dfs_visits,
        dfs_edges = staged.metrics.counters.dfs_edges,
        "scc decomposition complete"
    );
    staged
}

/// First pass: vertices in post-order, last finished on top.
fn finish_order(graph: &Graph, metrics: &mut Metrics) -> Vec<usize> {
    let n = graph.vertex_count();
    let mut visited = vec![false; n];
    let mut finished = Vec::with_capacity(n);
    let mut frames: Vec<(usize, usize)> = Vec::new();

    for root in 0..n {
        if visited[root] {
            continue;
        }
        visited[root] = true;
        metrics.record_visit();
        frames.push((root, 0));

        while let Some(frame) = frames.last_mut() {
            let vertex = frame.0;
            let Some(edge) = graph.out_edge_at(vertex, frame.1) else {
                frames.pop();
                finished.push(vertex);
                continue;
            };
            frame.1 += 1;
            metrics.record_edge();

            let next = edge.to;
            if !visited[next] {
                visited[next] = true;
                metrics.record_visit();
                frames.push((next, 0));
            }
        }
    }

    finished
}

/// Second pass over the transpose, consuming the finish stack.
fn assign_components(
    transpose: &Graph,
    finish_stack: &mut Vec<usize>,
    metrics: &mut Metrics,
) -> SccResult {
    let n = transpose.vertex_count();
    let mut visited = vec![false; n];
    let mut comp_id = vec![0; n];
    let mut components: Vec<Vec<usize>> = Vec::new();
    let mut frames: Vec<(usize, usize)> = Vec::new();

    while let Some(root) = finish_stack.pop() {
        if visited[root] {
            continue;
        }
        let id = components.len();
        let mut members = vec![root];
        visited[root] = true;
        comp_id[root] = id;
        metrics.record_visit();
        frames.push((root, 0));

        while let Some(frame) = frames.last_mut() {
            let Some(edge) = transpose.out_edge_at(frame.0, frame.1) else {
                frames.pop();
                continue;
            };
            frame.1 += 1;
            metrics.record_edge();

            let next = edge.to;
            if !visited[next] {
                visited[next] = true;
                comp_id[next] = id;
                members.push(next);
                metrics.record_visit();
                frames.push((next, 0));
            }
        }

        components.push(members);
    }

    SccResult {
        comp_id,
        components,
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn graph(n: i64, edges: &[(i64, i64)]) -> Graph {
        Graph::from_edges(n, true, edges.iter().map(|&(u, v)| (u, v, 1))).expect("valid graph")
    }

    // -----------------------------------------------------------------------
    // Trivial graphs
    // -----------------------------------------------------------------------

    #[test]
    fn empty_graph_has_no_components() {
        let staged = kosaraju(&graph(0, &[]));
        assert!(staged.output.is_empty());
        assert_eq!(staged.metrics.counters.dfs_visits, 0);
    }

    #[test]
    fn isolated_vertices_are_singletons() {
        let result = kosaraju(&graph(3, &[])).output;
        assert_eq!(result.len(), 3);
        for v in 0..3 {
            assert_eq!(result.members(result.component_of(v).expect("assigned")), Some(&[v][..]));
        }
    }

    // -----------------------------------------------------------------------
    // Cycles
    // -----------------------------------------------------------------------

    #[test]
    fn three_cycle_with_tail() {
        // 0 -> 1 -> 2 -> 0, plus 1 -> 3.
        let g = graph(4, &[(0, 1), (1, 2), (2, 0), (1, 3)]);
        let result = kosaraju(&g).output;

        assert_eq!(result.len(), 2);
        let cycle = result.component_of(0).expect("assigned");
        assert_eq!(result.component_of(1), Some(cycle));
        assert_eq!(result.component_of(2), Some(cycle));
        assert_ne!(result.component_of(3), Some(cycle));

        let mut members = result.members(cycle).expect("exists").to_vec();
        members.sort_unstable();
        assert_eq!(members, vec![0, 1, 2]);
    }

    #[test]
    fn numbering_follows_finish_stack() {
        // Finish order of pass 1 from root 0: 2, 3, 1, 0 -> 0 is popped first.
        let g = graph(4, &[(0, 1), (1, 2), (2, 0), (1, 3)]);
        let result = kosaraju(&g).output;
        assert_eq!(result.components(), &[vec![0, 2, 1], vec![3]]);
        assert_eq!(result.comp_id(), &[0, 0, 0, 1]);
    }

    #[test]
    fn chain_components_numbered_in_topological_order() {
        // Kosaraju on a DAG pops sources first.
        let g = graph(4, &[(0, 1), (1, 2), (0, 2), (2, 3)]);
        let result = kosaraju(&g).output;
        assert_eq!(result.comp_id(), &[0, 1, 2, 3]);
    }

    #[test]
    fn two_disjoint_cycles() {
        let g = graph(5, &[(0, 1), (1, 0), (2, 3), (3, 4), (4, 2)]);
        let result = kosaraju(&g).output;
        assert_eq!(result.len(), 2);
        assert_eq!(result.component_of(0), result.component_of(1));
        assert_eq!(result.component_of(2), result.component_of(4));
        assert_ne!(result.component_of(0), result.component_of(2));
    }

    #[test]
    fn cycle_components_include_self_loops() {
        let g = graph(4, &[(0, 1), (1, 0), (2, 2), (2, 3)]);
        let result = kosaraju(&g).output;
        let cycles: Vec<Vec<usize>> = result
            .cycle_components(&g)
            .into_iter()
            .map(|id| {
                let mut m = result.members(id).expect("exists").to_vec();
                m.sort_unstable();
                m
            })
            .collect();
        assert_eq!(cycles.len(), 2);
        assert!(cycles.contains(&vec![0, 1]));
        assert!(cycles.contains(&vec![2]));
    }

    // -----------------------------------------------------------------------
    // Metrics and robustness
    // -----------------------------------------------------------------------

    #[test]
    fn counts_visits_and_edges_in_both_passes() {
        let g = graph(4, &[(0, 1), (1, 2), (2, 0), (1, 3)]);
        let counters = kosaraju(&g).metrics.counters;
        assert_eq!(counters.dfs_visits, 8, "each vertex entered once per pass");
        assert_eq!(counters.dfs_edges, 8, "each edge examined once per pass");
        assert_eq!(counters.pushes, 0);
    }

    #[test]
    fn deep_path_does_not_overflow_the_stack() {
        let n: i64 = 200_000;
        let edges: Vec<(i64, i64)> = (0..n - 1).map(|v| (v, v + 1)).collect();
        let mut g = graph(n, &edges);
        g.add_edge(usize::try_from(n - 1).expect("fits"), 0, 1)
            .expect("closing edge");

        let result = kosaraju(&g).output;
        assert_eq!(result.len(), 1, "one long cycle");
        assert_eq!(result.members(0).map(<[usize]>::len), Some(200_000));
    }
}
