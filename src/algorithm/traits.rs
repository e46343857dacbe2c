use serde::Serialize;

use crate::graph::WeightedGraph;
use crate::Result;

/// A shortest path between two nodes
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct ShortestPath {
    /// Node indices from start to end, both inclusive
    pub nodes: Vec<usize>,

    /// Total weight of the path
    pub length: f64,
}

impl ShortestPath {
    pub fn start(&self) -> Option<usize> {
        self.nodes.first().copied()
    }

    pub fn end(&self) -> Option<usize> {
        self.nodes.last().copied()
    }

    /// Nodes strictly between start and end
    pub fn interior(&self) -> &[usize] {
        if self.nodes.len() <= 2 {
            return &[];
        }
        &self.nodes[1..self.nodes.len() - 1]
    }

    pub fn hop_count(&self) -> usize {
        self.nodes.len().saturating_sub(1)
    }
}

/// Trait for point-to-point shortest path algorithms
pub trait ShortestPathAlgorithm<G>
where
    G: WeightedGraph + ?Sized,
{
    /// Get the name of the algorithm
    fn name(&self) -> &'static str;

    /// Shortest path from `start` to `end`.
    ///
    /// `Ok(None)` means the pair is unreachable (or the graph has no edges);
    /// an index outside the graph is an [`Error::InvalidReference`](crate::Error).
    fn shortest_path(&self, graph: &G, start: usize, end: usize) -> Result<Option<ShortestPath>>;

    /// Shortest paths for a batch of `(start, end)` queries, aligned with `pairs`
    fn shortest_paths(&self, graph: &G, pairs: &[(usize, usize)]) -> Result<Vec<Option<ShortestPath>>> {
        pairs
            .iter()
            .map(|&(start, end)| self.shortest_path(graph, start, end))
            .collect()
    }
}

/// Rebuilds a path by walking predecessors back from `end`.
///
/// Returns `None` when the chain is broken or longer than the node count.
pub(crate) fn walk_predecessors(
    predecessors: &[Option<usize>],
    start: usize,
    end: usize,
) -> Option<Vec<usize>> {
    let mut path = vec![end];
    let mut current = end;

    while current != start {
        current = predecessors.get(current).copied().flatten()?;
        path.push(current);

        if path.len() > predecessors.len() {
            return None;
        }
    }

    path.reverse();
    Some(path)
}

/// Fails with `InvalidReference` for the first query endpoint outside the graph
pub(crate) fn check_pairs<G>(graph: &G, pairs: &[(usize, usize)]) -> Result<()>
where
    G: WeightedGraph + ?Sized,
{
    for &(start, end) in pairs {
        check_node(graph, start)?;
        check_node(graph, end)?;
    }
    Ok(())
}

pub(crate) fn check_node<G>(graph: &G, node: usize) -> Result<()>
where
    G: WeightedGraph + ?Sized,
{
    if graph.has_node(node) {
        Ok(())
    } else {
        Err(crate::Error::InvalidReference(node))
    }
}
