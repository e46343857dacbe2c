use crate::algorithm::traits::{check_node, walk_predecessors};
use crate::algorithm::{ShortestPath, ShortestPathAlgorithm};
use crate::data_structures::NodeBitmap;
use crate::graph::WeightedGraph;
use crate::Result;

/// Classic label-setting shortest path with an array scan instead of a heap
///
/// Each step selects the unvisited node with the smallest tentative distance,
/// breaking ties by the lowest node index. The scan is O(V²) but it is exactly the
/// kernel every batched worker runs, so both solvers produce identical paths and
/// bit-identical lengths.
#[derive(Debug, Default, Clone, Copy)]
pub struct Dijkstra;

impl Dijkstra {
    /// Creates a new Dijkstra algorithm instance
    pub fn new() -> Self {
        Dijkstra
    }

    /// Shortest path whose length does not exceed `limit`.
    ///
    /// The search stops as soon as the smallest tentative distance is above the
    /// limit, so `Ok(None)` means "no path of length <= limit".
    pub fn shortest_path_within<G>(
        &self,
        graph: &G,
        start: usize,
        end: usize,
        limit: f64,
    ) -> Result<Option<ShortestPath>>
    where
        G: WeightedGraph + ?Sized,
    {
        check_node(graph, start)?;
        check_node(graph, end)?;

        if graph.edge_count() == 0 {
            return Ok(None);
        }

        let mut scratch = ScanState::new(graph.node_count());
        Ok(label_setting(graph, start, end, Some(limit), &mut scratch))
    }
}

impl<G> ShortestPathAlgorithm<G> for Dijkstra
where
    G: WeightedGraph + ?Sized,
{
    fn name(&self) -> &'static str {
        "Dijkstra"
    }

    fn shortest_path(&self, graph: &G, start: usize, end: usize) -> Result<Option<ShortestPath>> {
        check_node(graph, start)?;
        check_node(graph, end)?;

        if graph.edge_count() == 0 {
            return Ok(None);
        }

        let mut scratch = ScanState::new(graph.node_count());
        Ok(label_setting(graph, start, end, None, &mut scratch))
    }
}

/// Per-query scratch: tentative distances, predecessors and the visited set
#[derive(Debug)]
pub(crate) struct ScanState {
    distances: Vec<f64>,
    predecessors: Vec<Option<usize>>,
    visited: NodeBitmap,
}

impl ScanState {
    pub(crate) fn new(node_count: usize) -> Self {
        ScanState {
            distances: vec![f64::INFINITY; node_count],
            predecessors: vec![None; node_count],
            visited: NodeBitmap::new(node_count),
        }
    }

    fn reset(&mut self, node_count: usize) {
        if self.distances.len() != node_count {
            *self = ScanState::new(node_count);
            return;
        }
        self.distances.iter_mut().for_each(|d| *d = f64::INFINITY);
        self.predecessors.iter_mut().for_each(|p| *p = None);
        self.visited.clear();
    }
}

/// The shared label-setting kernel.
///
/// Callers validate `start` and `end`. The scratch state is fully reset on entry,
/// so one buffer can serve consecutive queries without leaking state between them.
pub(crate) fn label_setting<G>(
    graph: &G,
    start: usize,
    end: usize,
    limit: Option<f64>,
    state: &mut ScanState,
) -> Option<ShortestPath>
where
    G: WeightedGraph + ?Sized,
{
    let n = graph.node_count();
    state.reset(n);
    state.distances[start] = 0.0;

    loop {
        // Select the closest unvisited node; strict `<` keeps the lowest index on ties
        let mut current = None;
        let mut best = f64::INFINITY;
        for node in 0..n {
            if !state.visited.contains(node) && state.distances[node] < best {
                best = state.distances[node];
                current = Some(node);
            }
        }

        // Every remaining node is at infinity
        let current = current?;

        if limit.is_some_and(|limit| best > limit) {
            return None;
        }

        if current == end {
            let nodes = walk_predecessors(&state.predecessors, start, end)?;
            return Some(ShortestPath {
                nodes,
                length: best,
            });
        }

        state.visited.insert(current);

        for (neighbor, weight) in graph.neighbors(current) {
            if state.visited.contains(neighbor) {
                continue;
            }

            let candidate = best + weight;
            if candidate < state.distances[neighbor] {
                state.distances[neighbor] = candidate;
                state.predecessors[neighbor] = Some(current);
            }
        }
    }
}
