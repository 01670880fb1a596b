//! Quotient ("condensation") graph over a component assignment.
//!
//! Each component becomes one vertex. An original edge `u → v` with
//! `comp[u] != comp[v]` becomes a condensation edge `comp[u] → comp[v]`;
//! intra-component edges are dropped, so the result never has self-loops.
//!
//! # Parallel Edges
//!
//! At most one edge is kept per ordered component pair. Its position in the
//! adjacency list is always that of the first original edge crossing the
//! pair (edge-list order). [`ParallelEdgePolicy`] picks which weight the
//! kept edge carries:
//!
//! | Policy       | Retained weight                         |
//! |--------------|-----------------------------------------|
//! | `first-seen` | weight of the first crossing edge       |
//! | `min`        | minimum over all crossing edges         |
//! | `max`        | maximum over all crossing edges         |
//!
//! `first-seen` is the default; later parallel edges are silently dropped.

#![allow(clippy::module_name_repetitions)]

use std::collections::HashMap;
use std::fmt;
use std::str::FromStr;

use serde::{Deserialize, Serialize};
use tracing::instrument;

use crate::error::GraphError;
use crate::graph::store::{Edge, Graph, Weight};

/// How to merge the weights of parallel edges between one component pair.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "kebab-case")]
pub enum ParallelEdgePolicy {
    #[default]
    FirstSeen,
    Min,
    Max,
}

impl ParallelEdgePolicy {
    /// Weight to keep after seeing `incoming` on a pair that already holds `kept`.
    #[must_use]
    pub fn merge(self, kept: Weight, incoming: Weight) -> Weight {
        match self {
            Self::FirstSeen => kept,
            Self::Min => kept.min(incoming),
            Self::Max => kept.max(incoming),
        }
    }

    #[must_use]
    pub const fn as_str(self) -> &'static str {
        match self {
            Self::FirstSeen => "first-seen",
            Self::Min => "min",
            Self::Max => "max",
        }
    }
}

impl fmt::Display for ParallelEdgePolicy {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Returned when a policy name is not recognised.
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
#[error("unknown parallel-edge policy `{0}` (expected first-seen, min or max)")]
pub struct UnknownPolicy(pub String);

impl FromStr for ParallelEdgePolicy {
    type Err = UnknownPolicy;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_ascii_lowercase().as_str() {
            "first-seen" | "first_seen" | "first" => Ok(Self::FirstSeen),
            "min" => Ok(Self::Min),
            "max" => Ok(Self::Max),
            other => Err(UnknownPolicy(other.to_string())),
        }
    }
}

impl Graph {
    /// Collapse every component of `comp_id` into one vertex.
    ///
    /// `comp_id[v]` is the component of original vertex `v`; ids must lie in
    /// `[0, comp_count)`. The result is a new directed graph with
    /// `comp_count` vertices that shares no storage with `self`.
    ///
    /// # Errors
    ///
    /// Returns [`GraphError::UnassignedVertex`] if `comp_id` is shorter than
    /// the vertex count, or [`GraphError::ComponentOutOfRange`] for an id not
    /// below `comp_count`.
    #[instrument(skip_all, fields(vertices = self.vertex_count(), components = comp_count))]
    pub fn condensation(
        &self,
        comp_id: &[usize],
        comp_count: usize,
        policy: ParallelEdgePolicy,
    ) -> Result<Self, GraphError> {
        if comp_id.len() < self.vertex_count() {
            return Err(GraphError::UnassignedVertex {
                vertex: comp_id.len(),
            });
        }
        if let Some(&component) = comp_id.iter().find(|&&c| c >= comp_count) {
            return Err(GraphError::ComponentOutOfRange {
                component,
                count: comp_count,
            });
        }

        let mut dag = Self::new(comp_count, true);
        // (from component, to component) -> index of the kept edge in `dag`.
        let mut kept: HashMap<(usize, usize), usize> = HashMap::new();

        for edge in self.edges() {
            let (a, b) = (comp_id[edge.from], comp_id[edge.to]);
            if a == b {
                continue;
            }
            if let Some(&idx) = kept.get(&(a, b)) {
                if let Some(existing) = dag.edges().get(idx) {
                    let merged = policy.merge(existing.weight, edge.weight);
                    dag.set_weight(idx, merged);
                }
                continue;
            }
            let idx = dag.push_edge(Edge {
                from: a,
                to: b,
                weight: edge.weight,
            });
            kept.insert((a, b), idx);
        }

        Ok(dag)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn edge_triples(g: &Graph) -> Vec<(usize, usize, Weight)> {
        g.edges().iter().map(|e| (e.from, e.to, e.weight)).collect()
    }

    // -----------------------------------------------------------------------
    // Policy parsing
    // -----------------------------------------------------------------------

    #[test]
    fn policy_round_trips_through_str() {
        for policy in [
            ParallelEdgePolicy::FirstSeen,
            ParallelEdgePolicy::Min,
            ParallelEdgePolicy::Max,
        ] {
            assert_eq!(policy.as_str().parse::<ParallelEdgePolicy>(), Ok(policy));
        }
        assert_eq!(
            " MIN ".parse::<ParallelEdgePolicy>(),
            Ok(ParallelEdgePolicy::Min)
        );
        assert!("sum".parse::<ParallelEdgePolicy>().is_err());
    }

    #[test]
    fn policy_default_is_first_seen() {
        assert_eq!(ParallelEdgePolicy::default(), ParallelEdgePolicy::FirstSeen);
    }

    // -----------------------------------------------------------------------
    // Condensation shape
    // -----------------------------------------------------------------------

    #[test]
    fn identity_assignment_copies_simple_graph() {
        let g = Graph::from_edges(3, true, [(0, 1, 1), (1, 2, 2)]).expect("valid");
        let dag = g
            .condensation(&[0, 1, 2], 3, ParallelEdgePolicy::FirstSeen)
            .expect("condense");
        assert_eq!(dag.vertex_count(), 3);
        assert_eq!(edge_triples(&dag), vec![(0, 1, 1), (1, 2, 2)]);
        assert!(dag.is_directed());
    }

    #[test]
    fn intra_component_edges_are_dropped() {
        // 0 <-> 1 in component 0, 1 -> 2 crosses into component 1.
        let g = Graph::from_edges(3, true, [(0, 1, 1), (1, 0, 1), (1, 2, 9), (2, 2, 4)])
            .expect("valid");
        let dag = g
            .condensation(&[0, 0, 1], 2, ParallelEdgePolicy::FirstSeen)
            .expect("condense");
        assert_eq!(edge_triples(&dag), vec![(0, 1, 9)]);
        assert!(!dag.has_self_loop(0));
        assert!(!dag.has_self_loop(1));
    }

    #[test]
    fn isolated_components_still_get_vertices() {
        let g = Graph::new(4, true);
        let dag = g
            .condensation(&[0, 1, 2, 3], 4, ParallelEdgePolicy::FirstSeen)
            .expect("condense");
        assert_eq!(dag.vertex_count(), 4);
        assert_eq!(dag.edge_count(), 0);
    }

    // -----------------------------------------------------------------------
    // Parallel edges
    // -----------------------------------------------------------------------

    fn parallel_graph() -> Graph {
        // Component 0 = {0, 1}, component 1 = {2}. Three crossing edges 0/1 -> 2.
        Graph::from_edges(
            3,
            true,
            [(0, 1, 1), (1, 0, 1), (0, 2, 5), (1, 2, 2), (0, 2, 8)],
        )
        .expect("valid")
    }

    #[test]
    fn first_seen_keeps_first_weight() {
        let dag = parallel_graph()
            .condensation(&[0, 0, 1], 2, ParallelEdgePolicy::FirstSeen)
            .expect("condense");
        assert_eq!(edge_triples(&dag), vec![(0, 1, 5)]);
    }

    #[test]
    fn min_and_max_policies_merge_weights() {
        let g = parallel_graph();
        let min = g
            .condensation(&[0, 0, 1], 2, ParallelEdgePolicy::Min)
            .expect("condense");
        let max = g
            .condensation(&[0, 0, 1], 2, ParallelEdgePolicy::Max)
            .expect("condense");
        assert_eq!(edge_triples(&min), vec![(0, 1, 2)]);
        assert_eq!(edge_triples(&max), vec![(0, 1, 8)]);
    }

    #[test]
    fn opposite_directions_are_distinct_pairs() {
        // Not a valid SCC assignment, but the builder itself only dedupes ordered pairs.
        let g = Graph::from_edges(2, true, [(0, 1, 1), (1, 0, 2)]).expect("valid");
        let dag = g
            .condensation(&[0, 1], 2, ParallelEdgePolicy::FirstSeen)
            .expect("condense");
        assert_eq!(edge_triples(&dag), vec![(0, 1, 1), (1, 0, 2)]);
    }

    // -----------------------------------------------------------------------
    // Invalid assignments
    // -----------------------------------------------------------------------

    #[test]
    fn short_assignment_is_rejected() {
        let g = Graph::new(3, true);
        let err = g
            .condensation(&[0, 0], 1, ParallelEdgePolicy::FirstSeen)
            .expect_err("missing vertex 2");
        assert_eq!(err, GraphError::UnassignedVertex { vertex: 2 });
    }

    #[test]
    fn component_id_beyond_count_is_rejected() {
        let g = Graph::new(2, true);
        let err = g
            .condensation(&[0, 3], 2, ParallelEdgePolicy::FirstSeen)
            .expect_err("id 3 >= 2");
        assert_eq!(
            err,
            GraphError::ComponentOutOfRange {
                component: 3,
                count: 2
            }
        );
    }
}
