use log::debug;
use rayon::prelude::*;
use std::time::Instant;

use crate::algorithm::dijkstra::{label_setting, ScanState};
use crate::algorithm::traits::check_pairs;
use crate::algorithm::{ShortestPath, ShortestPathAlgorithm};
use crate::cancel::CancellationToken;
use crate::graph::WeightedGraph;
use crate::Result;

/// Solves many independent `(start, end)` queries concurrently
///
/// Parallelism runs across the batch, never inside one query: every query is a
/// rayon task running the same heap-free scan as [`Dijkstra`](super::Dijkstra) over
/// its own distance, predecessor and visited buffers, reading only the shared graph.
/// Intended to run over an [`AdjacencyList`](crate::graph::AdjacencyList) snapshot.
#[derive(Debug, Default, Clone)]
pub struct BatchedDijkstra {
    /// Checked before each query starts
    cancellation: Option<CancellationToken>,
}

impl BatchedDijkstra {
    pub fn new() -> Self {
        BatchedDijkstra::default()
    }

    /// Stop the batch with [`Error::Cancelled`](crate::Error) once the token fires
    pub fn with_cancellation(mut self, token: CancellationToken) -> Self {
        self.cancellation = Some(token);
        self
    }

    fn is_cancelled(&self) -> bool {
        self.cancellation
            .as_ref()
            .is_some_and(CancellationToken::is_cancelled)
    }
}

impl<G> ShortestPathAlgorithm<G> for BatchedDijkstra
where
    G: WeightedGraph + Sync + ?Sized,
{
    fn name(&self) -> &'static str {
        "Batched Dijkstra"
    }

    fn shortest_path(&self, graph: &G, start: usize, end: usize) -> Result<Option<ShortestPath>> {
        let mut results = self.shortest_paths(graph, &[(start, end)])?;
        Ok(results.pop().flatten())
    }

    fn shortest_paths(&self, graph: &G, pairs: &[(usize, usize)]) -> Result<Vec<Option<ShortestPath>>> {
        check_pairs(graph, pairs)?;

        if graph.edge_count() == 0 {
            return Ok(vec![None; pairs.len()]);
        }

        let started = Instant::now();
        let n = graph.node_count();

        // map_init hands each rayon job one scratch buffer; the kernel resets it
        // per query, so queries never observe each other's state
        let results = pairs
            .par_iter()
            .map_init(
                || ScanState::new(n),
                |scratch, &(start, end)| {
                    if self.is_cancelled() {
                        return Err(crate::Error::Cancelled);
                    }
                    Ok(label_setting(graph, start, end, None, scratch))
                },
            )
            .collect::<Result<Vec<_>>>()?;

        debug!(
            "Solved {} queries over {} nodes in {:?}",
            pairs.len(),
            n,
            started.elapsed()
        );

        Ok(results)
    }
}
