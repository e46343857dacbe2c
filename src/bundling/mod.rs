//! Edge path bundling: reroute every edge missing from a spanner along its shortest
//! detour through the spanner.

pub mod options;

pub use options::{BundlingOptions, DistortionPolicy, SolverKind};

use log::{info, warn};
use serde::Serialize;
use std::time::Instant;

use crate::algorithm::batched::BatchedDijkstra;
use crate::algorithm::dijkstra::Dijkstra;
use crate::algorithm::floyd_warshall::FloydWarshall;
use crate::algorithm::spanner::GreedySpanner;
use crate::algorithm::{ShortestPath, ShortestPathAlgorithm};
use crate::cancel::CancellationToken;
use crate::graph::{AdjacencyList, Edge, Graph, Point, WeightedGraph};
use crate::{Error, Result};

/// An edge rerouted through the spanner
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct BundledEdge {
    pub edge: Edge,
    /// Interior nodes of the detour, ordered from `edge.start()` to `edge.end()`
    pub control_points: Vec<Point>,
}

/// Why an edge was left unbundled
#[derive(Debug, Clone, Copy, PartialEq, Serialize)]
#[serde(tag = "kind", rename_all = "kebab-case")]
pub enum Rejection {
    /// The spanner has no path between the endpoints
    Unreachable,
    /// The best detour is longer than `max_distortion * weight`
    DistortionExceeded { length: f64, limit: f64 },
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct RejectedEdge {
    pub edge: Edge,
    pub reason: Rejection,
}

/// Output of a bundling run
#[derive(Debug, Clone)]
pub struct BundlingResult {
    /// The spanner the detours were routed through
    pub spanner: Graph,
    pub bundled_edges: Vec<BundledEdge>,
    pub rejected_edges: Vec<RejectedEdge>,
    /// The solver that routed the edges, with `Auto` resolved
    pub solver: SolverKind,
}

/// Bundles a graph with the given options, building the spanner first
pub fn bundle(graph: &Graph, options: BundlingOptions) -> Result<BundlingResult> {
    EdgePathBundling::new(options).bundle(graph)
}

/// Solves every `(start, end)` pair over a routing snapshot with the chosen solver.
///
/// `Auto` is treated as `Sequential`; resolve it with
/// [`BundlingOptions::resolve_solver`] first to get the size-based choice.
pub fn route_pairs(
    routing: &AdjacencyList,
    pairs: &[(usize, usize)],
    solver: SolverKind,
    cancellation: Option<&CancellationToken>,
) -> Result<Vec<Option<ShortestPath>>> {
    match solver {
        SolverKind::Batched => {
            let mut batched = BatchedDijkstra::new();
            if let Some(token) = cancellation {
                batched = batched.with_cancellation(token.clone());
            }
            batched.shortest_paths(routing, pairs)
        }
        SolverKind::AllPairs => {
            // Weights are already transformed in the routing snapshot
            let mut all_pairs = FloydWarshall::<f64>::new();
            if let Some(token) = cancellation {
                all_pairs = all_pairs.with_cancellation(token.clone());
            }
            all_pairs.compute(routing)?.paths(pairs)
        }
        SolverKind::Sequential | SolverKind::Auto => {
            let dijkstra = Dijkstra::new();
            pairs
                .iter()
                .map(|&(start, end)| {
                    if let Some(token) = cancellation {
                        token.check()?;
                    }
                    dijkstra.shortest_path(routing, start, end)
                })
                .collect()
        }
    }
}

/// The bundling pipeline: spanner, difference, routing, distortion check
#[derive(Debug, Clone, Default)]
pub struct EdgePathBundling {
    options: BundlingOptions,
    cancellation: Option<CancellationToken>,
}

impl EdgePathBundling {
    pub fn new(options: BundlingOptions) -> Self {
        EdgePathBundling {
            options,
            cancellation: None,
        }
    }

    /// Checked between routed edges and between all-pairs passes
    pub fn with_cancellation(mut self, token: CancellationToken) -> Self {
        self.cancellation = Some(token);
        self
    }

    pub fn options(&self) -> &BundlingOptions {
        &self.options
    }

    /// Builds a greedy spanner with the configured stretch factor, then bundles
    pub fn bundle(&self, graph: &Graph) -> Result<BundlingResult> {
        self.options.validate()?;
        let spanner = GreedySpanner::new(self.options.stretch_factor).build(graph)?;
        self.bundle_with_spanner(graph, spanner)
    }

    /// Bundles against a precomputed spanner over the same nodes.
    ///
    /// The spanner's stretch is unknown here, so `max_distortion` only has to be at
    /// least 1; it is not compared with the configured stretch factor.
    pub fn bundle_with_spanner(&self, graph: &Graph, spanner: Graph) -> Result<BundlingResult> {
        self.options.validate_routing()?;
        if spanner.nodes() != graph.nodes() {
            return Err(Error::SpannerMismatch {
                expected: graph.node_count(),
                found: spanner.node_count(),
            });
        }

        let factor = self.options.edge_weight_factor;
        let routing = spanner.to_adjacency_list_with(|weight| weight.abs().powf(factor));

        let started = Instant::now();
        // Loops are covered by their zero-length path and never routed
        let difference: Vec<&Edge> = graph
            .edges()
            .iter()
            .filter(|edge| !edge.is_loop() && !spanner.contains_edge_key(edge.key()))
            .collect();
        info!(
            "{} of {} edges are not in the spanner ({:?})",
            difference.len(),
            graph.edge_count(),
            started.elapsed()
        );

        let pairs: Vec<(usize, usize)> = difference
            .iter()
            .map(|edge| (edge.start(), edge.end()))
            .collect();
        let solver = self
            .options
            .resolve_solver(pairs.len(), routing.node_count());

        let started = Instant::now();
        let paths = route_pairs(&routing, &pairs, solver, self.cancellation.as_ref())?;
        info!(
            "Routed {} edges with the {:?} solver in {:?}",
            pairs.len(),
            solver,
            started.elapsed()
        );

        let max_distortion = self.options.effective_max_distortion();
        let mut bundled_edges = Vec::with_capacity(difference.len());
        let mut rejected_edges = Vec::new();

        for (edge, path) in difference.into_iter().zip(paths) {
            let outcome = match path {
                None => Err(Rejection::Unreachable),
                Some(path) => self.accept(graph, edge, &path, max_distortion)?,
            };

            match outcome {
                Ok(bundled) => bundled_edges.push(bundled),
                Err(reason) => {
                    self.reject(edge, reason)?;
                    rejected_edges.push(RejectedEdge { edge: *edge, reason });
                }
            }
        }

        info!(
            "Bundled {} edges, rejected {}",
            bundled_edges.len(),
            rejected_edges.len()
        );

        Ok(BundlingResult {
            spanner,
            bundled_edges,
            rejected_edges,
            solver,
        })
    }

    /// Applies the distortion bound to a routed detour.
    ///
    /// The bound is checked on the Euclidean length of the detour, so it keeps its
    /// geometric meaning whatever the edge weight factor.
    fn accept(
        &self,
        graph: &Graph,
        edge: &Edge,
        path: &ShortestPath,
        max_distortion: f64,
    ) -> Result<std::result::Result<BundledEdge, Rejection>> {
        let length = graph.polyline_length(&path.nodes)?;
        let limit = max_distortion * edge.weight();

        if length > limit {
            return Ok(Err(Rejection::DistortionExceeded { length, limit }));
        }

        let control_points = path
            .interior()
            .iter()
            .map(|&node| graph.node(node).copied().ok_or(Error::InvalidReference(node)))
            .collect::<Result<Vec<_>>>()?;

        Ok(Ok(BundledEdge {
            edge: *edge,
            control_points,
        }))
    }

    fn reject(&self, edge: &Edge, reason: Rejection) -> Result<()> {
        warn!(
            "Edge {}-{} left unbundled: {:?}",
            edge.start(),
            edge.end(),
            reason
        );

        if self.options.policy == DistortionPolicy::Strict {
            return Err(match reason {
                Rejection::Unreachable => Error::Unreachable {
                    start: edge.start(),
                    end: edge.end(),
                },
                Rejection::DistortionExceeded { length, limit } => Error::DistortionExceeded {
                    start: edge.start(),
                    end: edge.end(),
                    length,
                    limit,
                },
            });
        }

        Ok(())
    }
}
