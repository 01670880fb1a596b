//! Single-source shortest and longest ("critical") paths over a DAG.
//!
//! # Algorithm
//!
//! Both objectives run the same dynamic-programming pass over a topological
//! order; only the sentinel and the comparison differ.
//!
//! 1. Every vertex starts at the objective's "unreached" sentinel, except the
//!    source, which starts at `0` with no parent.
//! 2. Vertices are processed strictly in topological order. A vertex still at
//!    the sentinel is skipped.
//! 3. Each outgoing edge `(u, v, w)` of a reached `u` is relaxed: if
//!    `dist[u] + w` improves on `dist[v]` (smaller for [`Objective::Shortest`],
//!    larger for [`Objective::Longest`]), `dist[v]` and `parent[v]` are updated.
//!    Every attempt is counted, improving or not.
//!
//! # Numeric Contract
//!
//! Weights are [`Weight`] (`i32`), distances [`Distance`] (`i64`). Sentinels
//! are `i64::MAX` (shortest) and `i64::MIN / 4` (longest). Unreached vertices
//! are never relaxed from, and reached sums saturate instead of wrapping, so
//! sentinel arithmetic can never produce a finite-looking value.

use serde::Serialize;
use tracing::{debug, instrument};

use crate::error::GraphError;
use crate::graph::{Distance, Graph};
use crate::metrics::{Metrics, Staged};
use crate::topo::TopoOrder;

/// Which extreme a path pass optimises.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum Objective {
    Shortest,
    Longest,
}

impl Objective {
    /// Distance recorded for vertices the source cannot reach.
    #[must_use]
    pub const fn unreached(self) -> Distance {
        match self {
            Self::Shortest => Distance::MAX,
            Self::Longest => Distance::MIN / 4,
        }
    }

    const fn improves(self, candidate: Distance, current: Distance) -> bool {
        match self {
            Self::Shortest => candidate < current,
            Self::Longest => candidate > current,
        }
    }
}

/// Distances and parent pointers from one source vertex.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct PathResult {
    objective: Objective,
    source: usize,
    dist: Vec<Distance>,
    parent: Vec<Option<usize>>,
}

impl PathResult {
    #[must_use]
    pub const fn objective(&self) -> Objective {
        self.objective
    }

    #[must_use]
    pub const fn source(&self) -> usize {
        self.source
    }

    /// Raw distances, with [`Objective::unreached`] for unreached vertices.
    #[must_use]
    pub fn distances(&self) -> &[Distance] {
        &self.dist
    }

    /// Parent pointers of the path tree; `None` for the source and unreached vertices.
    #[must_use]
    pub fn parents(&self) -> &[Option<usize>] {
        &self.parent
    }

    /// Distance to `target`, or `None` if it is unreached or out of range.
    #[must_use]
    pub fn distance(&self, target: usize) -> Option<Distance> {
        self.dist
            .get(target)
            .copied()
            .filter(|&d| d != self.objective.unreached())
    }

    #[must_use]
    pub fn is_reached(&self, target: usize) -> bool {
        self.distance(target).is_some()
    }

    /// Vertices from the source to `target`, inclusive.
    ///
    /// Empty when `target` is unreached or out of range.
    #[must_use]
    pub fn path_to(&self, target: usize) -> Vec<usize> {
        if !self.is_reached(target) {
            return Vec::new();
        }

        let mut path = vec![target];
        let mut current = target;
        // A parent chain in a DAG visits each vertex at most once.
        while let Some(prev) = self.parent.get(current).copied().flatten() {
            if path.len() > self.parent.len() {
                break;
            }
            path.push(prev);
            current = prev;
        }
        path.reverse();
        path
    }
}

/// Minimum-weight paths from `source` along `order`.
///
/// # Errors
///
/// See [`dag_paths`].
pub fn shortest_paths(
    dag: &Graph,
    order: &TopoOrder,
    source: usize,
) -> Result<Staged<PathResult>, GraphError> {
    dag_paths(dag, order, source, Objective::Shortest)
}

/// Maximum-weight ("critical") paths from `source` along `order`.
///
/// # Errors
///
/// See [`dag_paths`].
pub fn longest_paths(
    dag: &Graph,
    order: &TopoOrder,
    source: usize,
) -> Result<Staged<PathResult>, GraphError> {
    dag_paths(dag, order, source, Objective::Longest)
}

/// Run one path pass over `dag` in topological `order`.
///
/// # Errors
///
/// Returns [`GraphError::SourceOutOfRange`] if `source` is not a vertex of
/// `dag`, and [`GraphError::OrderMismatch`] if `order` does not cover `dag`.
#[instrument(skip(dag, order), fields(vertices = dag.vertex_count()))]
pub fn dag_paths(
    dag: &Graph,
    order: &TopoOrder,
    source: usize,
    objective: Objective,
) -> Result<Staged<PathResult>, GraphError> {
    let n = dag.vertex_count();
    if source >= n {
        return Err(GraphError::SourceOutOfRange {
            vertex: i64::try_from(source).unwrap_or(i64::MAX),
            n,
        });
    }
    if order.len() != n {
        return Err(GraphError::OrderMismatch {
            order_len: order.len(),
            vertex_count: n,
        });
    }

    let staged = Metrics::measure(|metrics| {
        let unreached = objective.unreached();
        let mut dist = vec![unreached; n];
        let mut parent = vec![None; n];
        dist[source] = 0;

        for u in order.iter() {
            let base = dist[u];
            if base == unreached {
                continue;
            }
            for edge in dag.out_edges(u) {
                metrics.record_relaxation();
                let candidate = base.saturating_add(Distance::from(edge.weight));
                if objective.improves(candidate, dist[edge.to]) {
                    dist[edge.to] = candidate;
                    parent[edge.to] = Some(u);
                }
            }
        }

        PathResult {
            objective,
            source,
            dist,
            parent,
        }
    });

    debug!(
        ?objective,
        relaxations = staged.metrics.counters.relaxations,
        "dag path pass complete"
    );
    Ok(staged)
}
