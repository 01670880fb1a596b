//! Per-stage operation counters and elapsed time.
//!
//! Every stage builds its own [`Metrics`] and hands it back next to its
//! output as a [`Staged`] value. Nothing is global or thread-local; callers
//! that want a total [`Metrics::merge`] the per-stage values themselves.

use std::time::{Duration, Instant};

use serde::Serialize;

/// Monotonic operation counters.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Hash, Serialize)]
pub struct Counters {
    /// Vertices entered by a depth-first traversal.
    pub dfs_visits: u64,
    /// Edges examined by a depth-first traversal.
    pub dfs_edges: u64,
    /// Queue insertions (Kahn).
    pub pushes: u64,
    /// Queue removals (Kahn).
    pub pops: u64,
    /// Relaxation attempts, successful or not (DAG path engines).
    pub relaxations: u64,
}

impl Counters {
    fn merge(&mut self, other: &Self) {
        self.dfs_visits += other.dfs_visits;
        self.dfs_edges += other.dfs_edges;
        self.pushes += other.pushes;
        self.pops += other.pops;
        self.relaxations += other.relaxations;
    }
}

/// Counters plus accumulated wall-clock time for one algorithmic call.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize)]
pub struct Metrics {
    pub counters: Counters,
    pub elapsed: Duration,
}

/// A stage output paired with the metrics recorded while producing it.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Staged<T> {
    pub output: T,
    pub metrics: Metrics,
}

impl<T> Staged<T> {
    /// Transform the output, keeping the metrics.
    pub fn map<U>(self, f: impl FnOnce(T) -> U) -> Staged<U> {
        Staged {
            output: f(self.output),
            metrics: self.metrics,
        }
    }
}

impl Metrics {
    /// Run `f` against a fresh recorder and time it.
    pub fn measure<R>(f: impl FnOnce(&mut Self) -> R) -> Staged<R> {
        let mut metrics = Self::default();
        let started = Instant::now();
        let output = f(&mut metrics);
        metrics.elapsed += started.elapsed();
        Staged { output, metrics }
    }

    pub fn record_visit(&mut self) {
        self.counters.dfs_visits += 1;
    }

    pub fn record_edge(&mut self) {
        self.counters.dfs_edges += 1;
    }

    pub fn record_push(&mut self) {
        self.counters.pushes += 1;
    }

    pub fn record_pop(&mut self) {
        self.counters.pops += 1;
    }

    pub fn record_relaxation(&mut self) {
        self.counters.relaxations += 1;
    }

    /// Fold another recorder's counts and time into this one.
    pub fn merge(&mut self, other: &Self) {
        self.counters.merge(&other.counters);
        self.elapsed += other.elapsed;
    }

    /// Zero every counter and the clock.
    pub fn reset(&mut self) {
        *self = Self::default();
    }

    /// Elapsed time in fractional milliseconds.
    #[must_use]
    pub fn elapsed_ms(&self) -> f64 {
        self.elapsed.as_secs_f64() * 1_000.0
    }
}
