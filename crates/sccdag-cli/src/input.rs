//! JSON graph input.
//!
//! ```json
//! {
//!   "directed": true,
//!   "n": 4,
//!   "edges": [{ "u": 0, "v": 1, "w": 3 }],
//!   "source": 0,
//!   "weight_model": "edge"
//! }
//! ```
//!
//! Only `n` and `edges` are required. Range checks happen in
//! [`Graph::from_edges`], so a malformed record never yields a partial graph.

use std::path::Path;

use anyhow::{Context, Result};
use sccdag_core::{Graph, GraphError, Weight};
use serde::{Deserialize, Serialize};

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct EdgeInput {
    pub u: i64,
    pub v: i64,
    pub w: Weight,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct GraphInput {
    #[serde(default = "default_true")]
    pub directed: bool,
    pub n: i64,
    pub edges: Vec<EdgeInput>,
    #[serde(default)]
    pub source: i64,
    /// Carried through to the report; only `"edge"` weights are interpreted.
    #[serde(default = "default_weight_model")]
    pub weight_model: String,
}

impl GraphInput {
    /// Build the graph store from this record.
    ///
    /// # Errors
    ///
    /// Fails with an invalid-argument [`GraphError`] for a negative `n` or an
    /// edge endpoint outside `[0, n)`.
    pub fn to_graph(&self) -> Result<Graph, GraphError> {
        Graph::from_edges(
            self.n,
            self.directed,
            self.edges.iter().map(|e| (e.u, e.v, e.w)),
        )
    }
}

/// Read and decode a graph record from `path`.
pub fn read_input(path: &Path) -> Result<GraphInput> {
    let content = std::fs::read_to_string(path)
        .with_context(|| format!("Failed to read {}", path.display()))?;

    serde_json::from_str::<GraphInput>(&content)
        .with_context(|| format!("Failed to parse {}", path.display()))
}

/// Resolve the source vertex: `--source` wins over the record's `source`.
///
/// # Errors
///
/// Fails with [`GraphError::SourceOutOfRange`] if the chosen source is not a
/// vertex of `graph`.
pub fn resolve_source(
    graph: &Graph,
    record: i64,
    flag: Option<i64>,
) -> Result<usize, GraphError> {
    let source = flag.unwrap_or(record);
    usize::try_from(source)
        .ok()
        .filter(|&s| s < graph.vertex_count())
        .ok_or(GraphError::SourceOutOfRange {
            vertex: source,
            n: graph.vertex_count(),
        })
}

const fn default_true() -> bool {
    true
}

fn default_weight_model() -> String {
    "edge".to_string()
}
