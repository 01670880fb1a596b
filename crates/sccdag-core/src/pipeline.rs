//! End-to-end analysis: SCC → condensation → topological order → DAG paths.
//!
//! # Pipeline
//!
//! ```text
//! Graph (may contain cycles)
//!        ↓  scc::kosaraju()
//! SccResult (partition + component ids)
//!        ↓  Graph::condensation()
//! condensation DAG (one vertex per component)
//!        ↓  topo::kahn()
//! TopoOrder
//!        ↓  paths::shortest_paths() / paths::longest_paths()
//! PathResult × 2 (from the source vertex's component)
//! ```
//!
//! Stages run strictly in sequence and never mutate an earlier stage's
//! output. Each stage records into its own fresh [`Metrics`]. The first
//! failure aborts the run and is reported with the [`Stage`] it came from;
//! no partial [`Analysis`] is produced.

use std::fmt;

use serde::{Deserialize, Serialize};
use tracing::{info, instrument};

use crate::error::GraphError;
use crate::graph::{Graph, ParallelEdgePolicy};
use crate::metrics::{Metrics, Staged};
use crate::paths::{self, PathResult};
use crate::scc::{self, SccResult};
use crate::topo::{self, TopoOrder};

/// Tunables for one analysis run.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct AnalysisOptions {
    /// Weight merge rule for parallel condensation edges.
    #[serde(default)]
    pub parallel_edges: ParallelEdgePolicy,
}

/// A step of the pipeline, used to locate failures.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize)]
#[serde(rename_all = "kebab-case")]
pub enum Stage {
    Build,
    Scc,
    Condensation,
    TopoSort,
    ShortestPath,
    LongestPath,
}

impl Stage {
    #[must_use]
    pub const fn as_str(self) -> &'static str {
        match self {
            Self::Build => "build",
            Self::Scc => "scc",
            Self::Condensation => "condensation",
            Self::TopoSort => "topo-sort",
            Self::ShortestPath => "shortest-path",
            Self::LongestPath => "longest-path",
        }
    }
}

impl fmt::Display for Stage {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// A pipeline failure: which stage, and why.
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
#[error("{stage} stage failed: {source}")]
pub struct AnalysisError {
    pub stage: Stage,
    pub source: GraphError,
}

impl AnalysisError {
    fn at(stage: Stage) -> impl Fn(GraphError) -> Self {
        move |source| Self { stage, source }
    }
}

/// Shortest and longest reconstructed paths to one condensation vertex.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct ComponentPaths {
    pub target: usize,
    pub shortest: Vec<usize>,
    pub longest: Vec<usize>,
}

/// Every artifact of a successful run.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Analysis {
    /// Source vertex in the original graph.
    pub source: usize,
    /// Component containing `source`; the path passes start here.
    pub source_component: usize,
    pub scc: Staged<SccResult>,
    pub condensation: Graph,
    pub order: Staged<TopoOrder>,
    pub shortest: Staged<PathResult>,
    pub longest: Staged<PathResult>,
}

impl Analysis {
    /// Reconstructed shortest and longest path to every component.
    #[must_use]
    pub fn paths(&self) -> Vec<ComponentPaths> {
        (0..self.condensation.vertex_count())
            .map(|target| ComponentPaths {
                target,
                shortest: self.shortest.output.path_to(target),
                longest: self.longest.output.path_to(target),
            })
            .collect()
    }

    /// Sum of every stage's metrics.
    #[must_use]
    pub fn total_metrics(&self) -> Metrics {
        let mut total = Metrics::default();
        for m in [
            &self.scc.metrics,
            &self.order.metrics,
            &self.shortest.metrics,
            &self.longest.metrics,
        ] {
            total.merge(m);
        }
        total
    }
}

/// Run the full pipeline on `graph` from `source`.
///
/// # Errors
///
/// - [`Stage::Build`] with [`GraphError::SourceOutOfRange`] if `source` is
///   not a vertex of `graph`.
/// - [`Stage::Condensation`] or [`Stage::TopoSort`] with an
///   inconsistent-state error if an internal invariant breaks.
#[instrument(skip(graph, options), fields(vertices = graph.vertex_count(), edges = graph.edge_count()))]
pub fn analyze(
    graph: &Graph,
    source: usize,
    options: &AnalysisOptions,
) -> Result<Analysis, AnalysisError> {
    if source >= graph.vertex_count() {
        return Err(AnalysisError {
            stage: Stage::Build,
            source: GraphError::SourceOutOfRange {
                vertex: i64::try_from(source).unwrap_or(i64::MAX),
                n: graph.vertex_count(),
            },
        });
    }

    let scc = scc::kosaraju(graph);
    let source_component = scc
        .output
        .component_of(source)
        .ok_or(GraphError::UnassignedVertex { vertex: source })
        .map_err(AnalysisError::at(Stage::Scc))?;

    let condensation = graph
        .condensation(scc.output.comp_id(), scc.output.len(), options.parallel_edges)
        .map_err(AnalysisError::at(Stage::Condensation))?;

    let order = topo::kahn(&condensation).map_err(AnalysisError::at(Stage::TopoSort))?;

    let shortest = paths::shortest_paths(&condensation, &order.output, source_component)
        .map_err(AnalysisError::at(Stage::ShortestPath))?;
    let longest = paths::longest_paths(&condensation, &order.output, source_component)
        .map_err(AnalysisError::at(Stage::LongestPath))?;

    let analysis = Analysis {
        source,
        source_component,
        scc,
        condensation,
        order,
        shortest,
        longest,
    };

    info!(
        components = analysis.scc.output.len(),
        condensation_edges = analysis.condensation.edge_count(),
        source_component,
        elapsed_ms = analysis.total_metrics().elapsed_ms(),
        "analysis complete"
    );
    Ok(analysis)
}
