//! Index-addressed weighted graph storage.
//!
//! # Representation
//!
//! Vertices are the integers `0..n`; they have no identity beyond their
//! index and exist for the whole lifetime of the [`Graph`]. Edges live once
//! in a global edge list. Each vertex's adjacency bucket stores *indices*
//! into that list, so adjacency is a grouping view derived from the edge list
//! rather than independent state.
//!
//! ## Undirected Mode
//!
//! With `directed == false`, [`Graph::add_edge`] stores the mirrored edge
//! `(v, u, w)` as a second, independent entry. There is no symmetry inferred
//! at lookup time.
//!
//! ## Fingerprint
//!
//! [`Graph::content_hash`] is a BLAKE3 hash of `(n, directed, edge list)`.
//! Two graphs built from the same input in the same order share it.

#![allow(clippy::module_name_repetitions)]

use serde::Serialize;

use crate::error::GraphError;

/// Edge weight as supplied by the input.
pub type Weight = i32;

/// Accumulated path length; wider than [`Weight`] so long paths cannot overflow.
pub type Distance = i64;

/// A directed, weighted edge `from → to`.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize)]
pub struct Edge {
    pub from: usize,
    pub to: usize,
    pub weight: Weight,
}

/// A fixed-size graph with integer-weighted edges.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Graph {
    vertex_count: usize,
    directed: bool,
    edges: Vec<Edge>,
    adjacency: Vec<Vec<usize>>,
}

impl Graph {
    /// Allocate a graph with `vertex_count` empty adjacency buckets.
    #[must_use]
    pub fn new(vertex_count: usize, directed: bool) -> Self {
        Self {
            vertex_count,
            directed,
            edges: Vec::new(),
            adjacency: vec![Vec::new(); vertex_count],
        }
    }

    /// Build a graph from signed input, as produced by a decoded record.
    ///
    /// Edges are inserted in iteration order, which fixes adjacency order
    /// and therefore every downstream tie-break.
    ///
    /// # Errors
    ///
    /// Returns [`GraphError::NegativeVertexCount`] if `n < 0` and
    /// [`GraphError::VertexOutOfRange`] for the first endpoint outside
    /// `[0, n)`. No partial graph is returned.
    pub fn from_edges<I>(n: i64, directed: bool, edges: I) -> Result<Self, GraphError>
    where
        I: IntoIterator<Item = (i64, i64, Weight)>,
    {
        let vertex_count =
            usize::try_from(n).map_err(|_| GraphError::NegativeVertexCount { n })?;
        let mut graph = Self::new(vertex_count, directed);

        for (u, v, w) in edges {
            let from = signed_index(u, vertex_count)?;
            let to = signed_index(v, vertex_count)?;
            graph.add_edge(from, to, w)?;
        }

        Ok(graph)
    }

    /// Append the edge `from → to` with weight `weight`.
    ///
    /// Duplicate edges and self-loops are stored as given. In undirected
    /// mode the mirrored edge is appended right after.
    ///
    /// # Errors
    ///
    /// Returns [`GraphError::VertexOutOfRange`] if either endpoint is not
    /// below [`Graph::vertex_count`]; the graph is left unchanged.
    pub fn add_edge(&mut self, from: usize, to: usize, weight: Weight) -> Result<(), GraphError> {
        for vertex in [from, to] {
            if vertex >= self.vertex_count {
                return Err(GraphError::vertex_out_of_range(vertex, self.vertex_count));
            }
        }

        self.push_edge(Edge { from, to, weight });
        if !self.directed {
            self.push_edge(Edge {
                from: to,
                to: from,
                weight,
            });
        }
        Ok(())
    }

    /// Build the transpose: same vertex count and flag, every stored edge flipped.
    ///
    /// In undirected mode both stored halves of an edge are flipped; no
    /// additional mirrors are created.
    #[must_use]
    pub fn reverse(&self) -> Self {
        let mut transposed = Self::new(self.vertex_count, self.directed);
        transposed.edges.reserve(self.edges.len());
        for edge in &self.edges {
            transposed.push_edge(Edge {
                from: edge.to,
                to: edge.from,
                weight: edge.weight,
            });
        }
        transposed
    }

    /// Number of vertices `n`.
    #[must_use]
    pub const fn vertex_count(&self) -> usize {
        self.vertex_count
    }

    /// Number of stored edges (mirrors included).
    #[must_use]
    pub fn edge_count(&self) -> usize {
        self.edges.len()
    }

    #[must_use]
    pub const fn is_directed(&self) -> bool {
        self.directed
    }

    /// The global edge list in insertion order.
    #[must_use]
    pub fn edges(&self) -> &[Edge] {
        &self.edges
    }

    /// Outgoing edges of `vertex` in insertion order.
    ///
    /// Yields nothing for an out-of-range vertex.
    pub fn out_edges(&self, vertex: usize) -> impl Iterator<Item = &Edge> + '_ {
        self.adjacency
            .get(vertex)
            .into_iter()
            .flatten()
            .filter_map(|&idx| self.edges.get(idx))
    }

    /// The `nth` outgoing edge of `vertex`, if any.
    #[must_use]
    pub fn out_edge_at(&self, vertex: usize, nth: usize) -> Option<&Edge> {
        let idx = *self.adjacency.get(vertex)?.get(nth)?;
        self.edges.get(idx)
    }

    #[must_use]
    pub fn out_degree(&self, vertex: usize) -> usize {
        self.adjacency.get(vertex).map_or(0, Vec::len)
    }

    /// Return `true` if `vertex` has an edge to itself.
    #[must_use]
    pub fn has_self_loop(&self, vertex: usize) -> bool {
        self.out_edges(vertex).any(|e| e.to == vertex)
    }

    /// BLAKE3 fingerprint of `(n, directed, edge list)`, formatted `blake3:<hex>`.
    #[must_use]
    pub fn content_hash(&self) -> String {
        let mut hasher = blake3::Hasher::new();
        hasher.update(&(self.vertex_count as u64).to_le_bytes());
        hasher.update(&[u8::from(self.directed)]);
        for edge in &self.edges {
            hasher.update(&(edge.from as u64).to_le_bytes());
            hasher.update(&(edge.to as u64).to_le_bytes());
            hasher.update(&edge.weight.to_le_bytes());
        }
        format!("blake3:{}", hasher.finalize())
    }

    /// Replace the weight of the edge stored at `idx` in the edge list.
    pub(crate) fn set_weight(&mut self, idx: usize, weight: Weight) {
        if let Some(edge) = self.edges.get_mut(idx) {
            edge.weight = weight;
        }
    }

    /// Store an edge whose endpoints are already known to be in range.
    ///
    /// Returns the edge's index in the edge list.
    pub(crate) fn push_edge(&mut self, edge: Edge) -> usize {
        let idx = self.edges.len();
        self.edges.push(edge);
        if let Some(bucket) = self.adjacency.get_mut(edge.from) {
            bucket.push(idx);
        }
        idx
    }
}

fn signed_index(vertex: i64, n: usize) -> Result<usize, GraphError> {
    usize::try_from(vertex)
        .ok()
        .filter(|&v| v < n)
        .ok_or(GraphError::VertexOutOfRange { vertex, n })
}
