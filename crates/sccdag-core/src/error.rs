//! Error types shared by every analysis stage.
//!
//! Two kinds of failure exist:
//!
//! - [`ErrorKind::InvalidArgument`]: the caller handed the graph store
//!   malformed input (negative size, endpoint out of range, bad source).
//!   Detected eagerly, before any partial graph escapes.
//! - [`ErrorKind::InconsistentState`]: an internal invariant broke, e.g. the
//!   condensation graph turned out to contain a cycle. These indicate a bug
//!   upstream of the failing stage, not bad input.
//!
//! Neither kind is retryable: the computation is deterministic, so re-running
//! with the same input reproduces the same failure.

use std::fmt;

use serde::Serialize;

/// Coarse classification of a [`GraphError`].
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum ErrorKind {
    InvalidArgument,
    InconsistentState,
}

impl ErrorKind {
    /// Stable code identifier (`E####`) for machine parsing.
    #[must_use]
    pub const fn code(self) -> &'static str {
        match self {
            Self::InvalidArgument => "E1001",
            Self::InconsistentState => "E2001",
        }
    }

    /// Short human-facing summary for logs and terminal output.
    #[must_use]
    pub const fn message(self) -> &'static str {
        match self {
            Self::InvalidArgument => "Invalid graph input",
            Self::InconsistentState => "Internal invariant violated",
        }
    }

    /// Optional remediation hint that can be surfaced to operators.
    #[must_use]
    pub const fn hint(self) -> Option<&'static str> {
        match self {
            Self::InvalidArgument => Some(
                "Check that `n` is non-negative and every edge endpoint and the source lie in [0, n).",
            ),
            Self::InconsistentState => {
                Some("This is a bug in the analysis pipeline. Report it together with the input graph.")
            }
        }
    }
}

impl fmt::Display for ErrorKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.code())
    }
}

/// Failure raised by the graph store or one of the analysis stages.
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum GraphError {
    /// A graph was requested with a negative vertex count.
    #[error("vertex count must be non-negative, got {n}")]
    NegativeVertexCount { n: i64 },

    /// An edge endpoint lies outside `[0, n)`.
    #[error("vertex {vertex} is out of range for a graph with {n} vertices")]
    VertexOutOfRange { vertex: i64, n: usize },

    /// The designated source vertex lies outside `[0, n)`.
    #[error("source vertex {vertex} is out of range for a graph with {n} vertices")]
    SourceOutOfRange { vertex: i64, n: usize },

    /// Kahn's algorithm could not place every vertex of the condensation.
    #[error(
        "topological sort placed {placed} of {expected} components; the condensation is not acyclic"
    )]
    CondensationCycle { placed: usize, expected: usize },

    /// A vertex of the original graph has no component id.
    #[error("vertex {vertex} has no component assignment")]
    UnassignedVertex { vertex: usize },

    /// A component id is not below the declared component count.
    #[error("component id {component} is out of range for {count} components")]
    ComponentOutOfRange { component: usize, count: usize },

    /// A topological order does not cover the graph it is applied to.
    #[error("topological order lists {order_len} vertices but the graph has {vertex_count}")]
    OrderMismatch { order_len: usize, vertex_count: usize },
}

impl GraphError {
    /// Classify this error.
    #[must_use]
    pub const fn kind(&self) -> ErrorKind {
        match self {
            Self::NegativeVertexCount { .. }
            | Self::VertexOutOfRange { .. }
            | Self::SourceOutOfRange { .. } => ErrorKind::InvalidArgument,
            Self::CondensationCycle { .. }
            | Self::UnassignedVertex { .. }
            | Self::ComponentOutOfRange { .. }
            | Self::OrderMismatch { .. } => ErrorKind::InconsistentState,
        }
    }

    /// Stable machine-readable code for this error's kind.
    #[must_use]
    pub const fn code(&self) -> &'static str {
        self.kind().code()
    }

    pub(crate) fn vertex_out_of_range(vertex: usize, n: usize) -> Self {
        Self::VertexOutOfRange {
            vertex: i64::try_from(vertex).unwrap_or(i64::MAX),
            n,
        }
    }
}
