use std::fmt::Debug;

/// Trait representing a weighted undirected graph indexed by node position
///
/// Implemented by the editable [`Graph`](crate::graph::Graph) and by its compact
/// [`AdjacencyList`](crate::graph::AdjacencyList) snapshot, so the shortest-path
/// kernels run unchanged over either representation.
pub trait WeightedGraph: Debug {
    /// Returns the number of nodes in the graph
    fn node_count(&self) -> usize;

    /// Returns the number of undirected edges in the graph
    fn edge_count(&self) -> usize;

    /// Returns an iterator over `(neighbor, weight)` pairs incident to a node,
    /// in the order the edges were inserted
    fn neighbors(&self, node: usize) -> Box<dyn Iterator<Item = (usize, f64)> + '_>;

    /// Returns true if the node exists in the graph
    fn has_node(&self, node: usize) -> bool {
        node < self.node_count()
    }

    /// Returns true if there's an edge between the two nodes
    fn has_edge(&self, a: usize, b: usize) -> bool {
        self.edge_weight(a, b).is_some()
    }

    /// Gets the weight of an edge if it exists
    fn edge_weight(&self, a: usize, b: usize) -> Option<f64> {
        if !self.has_node(a) {
            return None;
        }
        self.neighbors(a)
            .find(|(neighbor, _)| *neighbor == b)
            .map(|(_, weight)| weight)
    }
}
