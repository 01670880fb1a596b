//! Serializable result records.
//!
//! The analysis report keeps one section per pipeline stage, in pipeline
//! order, each with that stage's own metrics:
//!
//! ```text
//! input_meta          { directed, n, weight_model, source, content_hash }
//! scc                 { components_count, components, metrics }
//! condensation_dag    { nodes, edges, parallel_edges }
//! topological_sort    { order, metrics }
//! dag_shortest_paths  { source_component, dist, metrics }
//! dag_longest_paths   { source_component, best, metrics }
//! paths_examples      [ { target_component, shortest_path, longest_path } ]
//! ```
//!
//! Unreached distances are written as the raw sentinels
//! (`i64::MAX` shortest, `i64::MIN / 4` longest).

use sccdag_core::{Analysis, Distance, Graph, Metrics, ParallelEdgePolicy, SccResult, Staged};
use serde::Serialize;

use crate::input::GraphInput;

/// Stage metrics with the report's key names.
#[derive(Debug, Clone, Copy, PartialEq, Serialize)]
pub struct MetricsReport {
    #[serde(rename = "dfsVisits")]
    pub dfs_visits: u64,
    #[serde(rename = "dfsEdges")]
    pub dfs_edges: u64,
    pub pushes: u64,
    pub pops: u64,
    pub relaxations: u64,
    pub time_ms: f64,
}

impl From<&Metrics> for MetricsReport {
    fn from(m: &Metrics) -> Self {
        Self {
            dfs_visits: m.counters.dfs_visits,
            dfs_edges: m.counters.dfs_edges,
            pushes: m.counters.pushes,
            pops: m.counters.pops,
            relaxations: m.counters.relaxations,
            time_ms: m.elapsed_ms(),
        }
    }
}

#[derive(Debug, Clone, Serialize)]
pub struct InputMeta {
    pub directed: bool,
    pub n: usize,
    pub weight_model: String,
    pub source: usize,
    pub content_hash: String,
}

#[derive(Debug, Clone, Serialize)]
pub struct SccSection {
    pub components_count: usize,
    pub components: Vec<Vec<usize>>,
    pub metrics: MetricsReport,
}

impl From<&Staged<SccResult>> for SccSection {
    fn from(scc: &Staged<SccResult>) -> Self {
        Self {
            components_count: scc.output.len(),
            components: scc.output.components().to_vec(),
            metrics: MetricsReport::from(&scc.metrics),
        }
    }
}

#[derive(Debug, Clone, Serialize)]
pub struct CondensationSection {
    pub nodes: usize,
    pub edges: usize,
    pub parallel_edges: ParallelEdgePolicy,
}

#[derive(Debug, Clone, Serialize)]
pub struct TopoSection {
    pub order: Vec<usize>,
    pub metrics: MetricsReport,
}

#[derive(Debug, Clone, Serialize)]
pub struct ShortestSection {
    pub source_component: usize,
    pub dist: Vec<Distance>,
    pub metrics: MetricsReport,
}

#[derive(Debug, Clone, Serialize)]
pub struct LongestSection {
    pub source_component: usize,
    pub best: Vec<Distance>,
    pub metrics: MetricsReport,
}

#[derive(Debug, Clone, Serialize)]
pub struct PathExample {
    pub target_component: usize,
    pub shortest_path: Vec<usize>,
    pub longest_path: Vec<usize>,
}

/// Full output of `sccdag analyze`.
#[derive(Debug, Clone, Serialize)]
pub struct AnalysisReport {
    pub input_meta: InputMeta,
    pub scc: SccSection,
    pub condensation_dag: CondensationSection,
    pub topological_sort: TopoSection,
    pub dag_shortest_paths: ShortestSection,
    pub dag_longest_paths: LongestSection,
    pub paths_examples: Vec<PathExample>,
}

impl AnalysisReport {
    pub fn new(
        input: &GraphInput,
        graph: &Graph,
        analysis: &Analysis,
        parallel_edges: ParallelEdgePolicy,
    ) -> Self {
        let source_component = analysis.source_component;
        Self {
            input_meta: InputMeta {
                directed: graph.is_directed(),
                n: graph.vertex_count(),
                weight_model: input.weight_model.clone(),
                source: analysis.source,
                content_hash: graph.content_hash(),
            },
            scc: SccSection::from(&analysis.scc),
            condensation_dag: CondensationSection {
                nodes: analysis.condensation.vertex_count(),
                edges: analysis.condensation.edge_count(),
                parallel_edges,
            },
            topological_sort: TopoSection {
                order: analysis.order.output.as_slice().to_vec(),
                metrics: MetricsReport::from(&analysis.order.metrics),
            },
            dag_shortest_paths: ShortestSection {
                source_component,
                dist: analysis.shortest.output.distances().to_vec(),
                metrics: MetricsReport::from(&analysis.shortest.metrics),
            },
            dag_longest_paths: LongestSection {
                source_component,
                best: analysis.longest.output.distances().to_vec(),
                metrics: MetricsReport::from(&analysis.longest.metrics),
            },
            paths_examples: analysis
                .paths()
                .into_iter()
                .map(|p| PathExample {
                    target_component: p.target,
                    shortest_path: p.shortest,
                    longest_path: p.longest,
                })
                .collect(),
        }
    }
}

/// Output of `sccdag components`.
#[derive(Debug, Clone, Serialize)]
pub struct ComponentsReport {
    pub content_hash: String,
    #[serde(flatten)]
    pub scc: SccSection,
    /// Ids of components containing a cycle.
    pub cycle_components: Vec<usize>,
}

impl ComponentsReport {
    pub fn new(graph: &Graph, scc: &Staged<SccResult>) -> Self {
        Self {
            content_hash: graph.content_hash(),
            scc: SccSection::from(scc),
            cycle_components: scc.output.cycle_components(graph),
        }
    }
}
