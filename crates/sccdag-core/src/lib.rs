#![forbid(unsafe_code)]
//! sccdag-core library.
//!
//! Structural analytics for weighted directed graphs: strongly connected
//! components (Kosaraju), the component condensation DAG, a Kahn
//! topological order of that DAG, and single-source shortest and longest
//! path distances over it.
//!
//! # Conventions
//!
//! - **Errors**: stage functions return [`GraphError`]; the pipeline wraps it
//!   in [`AnalysisError`] with the failing [`Stage`].
//! - **Logging**: `tracing` spans per stage, `debug!` on stage completion.
//! - **Metrics**: every stage returns its own [`Metrics`] inside a [`Staged`].
//!
//! # Typical Usage
//!
//! ```rust
//! use sccdag_core::{AnalysisOptions, Graph, analyze};
//!
//! let graph = Graph::from_edges(4, true, [(0, 1, 1), (1, 2, 2), (0, 2, 5), (2, 3, 1)])?;
//! let analysis = analyze(&graph, 0, &AnalysisOptions::default())?;
//!
//! assert_eq!(analysis.shortest.output.distance(3), Some(4));
//! assert_eq!(analysis.longest.output.distance(3), Some(6));
//! # Ok::<(), Box<dyn std::error::Error>>(())
//! ```

pub mod error;
pub mod graph;
pub mod metrics;
pub mod paths;
pub mod pipeline;
pub mod scc;
pub mod topo;

pub use error::{ErrorKind, GraphError};
pub use graph::{Distance, Edge, Graph, ParallelEdgePolicy, Weight};
pub use metrics::{Counters, Metrics, Staged};
pub use paths::{Objective, PathResult};
pub use pipeline::{Analysis, AnalysisError, AnalysisOptions, ComponentPaths, Stage, analyze};
pub use scc::SccResult;
pub use topo::TopoOrder;
