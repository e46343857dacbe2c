//! Compact (CSR-style) adjacency representation.
//!
//! Memory layout:
//! - `offsets[i]` = starting index in `entries` of node i's incident-edge list
//! - `entries[offsets[i]..offsets[i + 1]]` = `(neighbor, weight)` pairs of node i
//!
//! `offsets` carries one trailing element equal to `entries.len()`, so the degree of
//! the last node is computed like every other. The snapshot is rebuilt from the
//! [`Graph`] whenever the graph changes and is never edited in place, which is what
//! lets many solver workers read it concurrently.

use serde::Serialize;

use crate::graph::traits::WeightedGraph;
use crate::graph::undirected::Graph;

/// One incident-edge slot: the node on the other side and the edge weight
#[derive(Debug, Clone, Copy, PartialEq, Serialize)]
pub struct AdjacencyEntry {
    pub neighbor: usize,
    pub weight: f64,
}

/// Read-only CSR snapshot of an undirected graph
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct AdjacencyList {
    offsets: Vec<usize>,
    entries: Vec<AdjacencyEntry>,
    edge_count: usize,
}

impl AdjacencyList {
    /// Builds the snapshot, mapping each stored weight through `weight_fn`.
    ///
    /// Neighbor order per node is the graph's edge insertion order, identical to
    /// what [`Graph::neighbors`](WeightedGraph::neighbors) yields.
    pub fn from_graph<F>(graph: &Graph, weight_fn: F) -> Self
    where
        F: Fn(f64) -> f64,
    {
        let n = graph.node_count();
        let mut offsets = Vec::with_capacity(n + 1);
        let mut entries = Vec::with_capacity(graph.edge_count() * 2);

        for node in 0..n {
            offsets.push(entries.len());
            entries.extend(graph.neighbors(node).map(|(neighbor, weight)| AdjacencyEntry {
                neighbor,
                weight: weight_fn(weight),
            }));
        }
        offsets.push(entries.len());

        AdjacencyList {
            offsets,
            entries,
            edge_count: graph.edge_count(),
        }
    }

    /// Per-node starting offsets into [`entries`](Self::entries), one per node
    pub fn node_offsets(&self) -> &[usize] {
        &self.offsets[..self.offsets.len() - 1]
    }

    /// The flattened incident-edge lists of all nodes, in node-index order
    pub fn entries(&self) -> &[AdjacencyEntry] {
        &self.entries
    }

    /// Incident-edge slice of one node (empty for unknown nodes)
    pub fn incident(&self, node: usize) -> &[AdjacencyEntry] {
        if node + 1 >= self.offsets.len() {
            return &[];
        }
        &self.entries[self.offsets[node]..self.offsets[node + 1]]
    }

    pub fn degree(&self, node: usize) -> usize {
        self.incident(node).len()
    }
}

impl WeightedGraph for AdjacencyList {
    fn node_count(&self) -> usize {
        self.offsets.len() - 1
    }

    fn edge_count(&self) -> usize {
        self.edge_count
    }

    fn neighbors(&self, node: usize) -> Box<dyn Iterator<Item = (usize, f64)> + '_> {
        Box::new(
            self.incident(node)
                .iter()
                .map(|entry| (entry.neighbor, entry.weight)),
        )
    }
}
