//! Graph storage shared by every analysis stage.
//!
//! # Overview
//!
//! [`Graph`] owns an index-addressed vertex set, a global edge list, and
//! per-vertex adjacency buckets derived from it. Two derived graphs are built
//! from a stored graph:
//!
//! ```text
//! Graph (may contain cycles)
//!   ├─ reverse()        → transpose, used by the second Kosaraju pass
//!   └─ condensation()   → quotient DAG, one vertex per SCC
//! ```
//!
//! Derived graphs are freshly allocated; nothing is shared with the source.

pub mod condense;
pub mod store;

pub use condense::{ParallelEdgePolicy, UnknownPolicy};
pub use store::{Distance, Edge, Graph, Weight};
