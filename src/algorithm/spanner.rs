use log::{debug, info, trace};
use ordered_float::OrderedFloat;
use std::time::Instant;

use crate::algorithm::dijkstra::Dijkstra;
use crate::graph::{Graph, WeightedGraph};
use crate::{Error, Result};

/// Greedy t-spanner construction
///
/// Edges are considered by ascending weight (ties by insertion order). An edge is
/// kept only if the spanner built so far has no path between its endpoints of length
/// at most `t * weight`. Because every detour used to reject an edge is made of
/// edges no heavier than it, the result satisfies `dist_spanner(u, v) <= t * w` for
/// every edge `(u, v, w)` of the input graph.
///
/// Decisions depend on all previous ones, so the edge loop is sequential.
#[derive(Debug, Clone, Copy)]
pub struct GreedySpanner {
    stretch_factor: f64,
}

impl Default for GreedySpanner {
    fn default() -> Self {
        GreedySpanner {
            stretch_factor: 2.0,
        }
    }
}

impl GreedySpanner {
    /// Creates a builder with the given stretch factor `t`
    pub fn new(stretch_factor: f64) -> Self {
        GreedySpanner { stretch_factor }
    }

    pub fn stretch_factor(&self) -> f64 {
        self.stretch_factor
    }

    /// Builds the spanner: same nodes in the same order, a subset of the edges
    pub fn build(&self, graph: &Graph) -> Result<Graph> {
        let t = self.stretch_factor;
        if !t.is_finite() || t < 1.0 {
            return Err(Error::InvalidParameter(format!(
                "stretch factor must be a finite number >= 1, got {}",
                t
            )));
        }

        let started = Instant::now();
        let edges = graph.edges();
        let mut spanner = graph.edgeless_copy();

        let mut order: Vec<usize> = (0..edges.len()).collect();
        order.sort_by_key(|&index| (OrderedFloat(edges[index].weight()), index));

        let dijkstra = Dijkstra::new();
        for (step, &index) in order.iter().enumerate() {
            let edge = &edges[index];
            trace!("Processing spanner edge {} of {}", step, edges.len());

            // A loop is always covered by the zero-length path
            if edge.is_loop() {
                continue;
            }

            let limit = t * edge.weight();
            let detour = dijkstra.shortest_path_within(&spanner, edge.start(), edge.end(), limit)?;

            match detour {
                Some(path) => debug!(
                    "Skipping edge {}-{}: detour of {:.3} within {:.3}",
                    edge.start(),
                    edge.end(),
                    path.length,
                    limit
                ),
                None => {
                    spanner.add_edge(edge.start(), edge.end())?;
                }
            }
        }

        info!(
            "Greedy spanner (t = {}) kept {} of {} edges in {:?}",
            t,
            spanner.edge_count(),
            graph.edge_count(),
            started.elapsed()
        );

        Ok(spanner)
    }
}
