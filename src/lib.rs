//! Edge Path Bundling for weighted planar graphs
//!
//! Given a graph whose nodes carry 2-D coordinates and whose edges are weighted by
//! Euclidean length, this library builds a greedy t-spanner and reroutes every edge
//! that did not make it into the spanner along a shortest path through it. The
//! interior nodes of those detours are the control points a renderer uses to draw
//! bundles of nearly-parallel curves instead of a dense mesh of straight lines.
//!
//! Three shortest-path solvers back the routing step:
//! - [`Dijkstra`]: sequential label-setting with an array scan (no heap),
//! - [`BatchedDijkstra`]: the same kernel run over many independent queries in parallel,
//! - [`FloydWarshall`]: dense all-pairs distances with next-hop path reconstruction.
//!
//! The two Dijkstra variants share one kernel and return identical paths; all three
//! agree on lengths.

pub mod algorithm;
pub mod bundling;
pub mod cancel;
pub mod data_structures;
pub mod graph;
pub mod web;

pub use algorithm::{
    batched::BatchedDijkstra, dijkstra::Dijkstra, floyd_warshall::FloydWarshall,
    spanner::GreedySpanner, ShortestPath, ShortestPathAlgorithm,
};
pub use bundling::{
    bundle, BundledEdge, BundlingOptions, BundlingResult, DistortionPolicy, EdgePathBundling,
    RejectedEdge, Rejection, SolverKind,
};
pub use cancel::CancellationToken;
/// Re-export main types for convenient use
pub use graph::{AdjacencyList, Edge, Graph, GraphJson, Node, Point};

/// Error types for the library
#[derive(thiserror::Error, Debug)]
pub enum Error {
    #[error("Invalid node reference: {0}")]
    InvalidReference(usize),

    #[error("Invalid coordinate: ({x}, {y})")]
    InvalidCoordinate { x: f64, y: f64 },

    #[error("Invalid parameter: {0}")]
    InvalidParameter(String),

    #[error("Spanner does not share the graph's node set: expected {expected} nodes, found {found}")]
    SpannerMismatch { expected: usize, found: usize },

    #[error("No path between {start} and {end} in the spanner")]
    Unreachable { start: usize, end: usize },

    #[error("Detour for edge {start}-{end} has length {length}, exceeding the limit {limit}")]
    DistortionExceeded {
        start: usize,
        end: usize,
        length: f64,
        limit: f64,
    },

    #[error("Computation cancelled")]
    Cancelled,

    #[error("Serialization error: {0}")]
    Serialization(#[from] serde_json::Error),
}

/// Result type for the library
pub type Result<T> = std::result::Result<T, Error>;

/// Shortest path between two nodes using the sequential solver.
///
/// Returns `Ok(None)` when `end` cannot be reached from `start`.
pub fn shortest_path(graph: &Graph, start: usize, end: usize) -> Result<Option<ShortestPath>> {
    Dijkstra::new().shortest_path(graph, start, end)
}

/// Shortest paths for a batch of `(start, end)` queries, solved in parallel over the
/// graph's compact adjacency representation. Results are aligned with `pairs`.
pub fn shortest_paths(graph: &Graph, pairs: &[(usize, usize)]) -> Result<Vec<Option<ShortestPath>>> {
    let adjacency = graph.to_adjacency_list();
    BatchedDijkstra::new().shortest_paths(&adjacency, pairs)
}
