use std::collections::HashMap;

use log::debug;

use crate::graph::adjacency::AdjacencyList;
use crate::graph::edge::{Edge, EdgeKey};
use crate::graph::node::Node;
use crate::graph::traits::WeightedGraph;
use crate::{Error, Result};

/// An undirected graph with planar node positions and Euclidean edge weights
///
/// The graph owns its nodes and edges. Adjacency is answered through per-node
/// incident lists kept in edge insertion order; nodes carry no back-references.
#[derive(Debug, Clone, Default)]
pub struct Graph {
    /// Node positions, indexed by node id
    nodes: Vec<Node>,

    /// Edges in insertion order
    edges: Vec<Edge>,

    /// Canonical edge key -> position in `edges`
    edge_index: HashMap<EdgeKey, usize>,

    /// Incident edges for each node: node_id -> [(neighbor, edge_id)]
    incident: Vec<Vec<(usize, usize)>>,
}

impl Graph {
    /// Creates a new empty graph
    pub fn new() -> Self {
        Graph::default()
    }

    /// Creates an empty graph with room for the given number of nodes and edges
    pub fn with_capacity(nodes: usize, edges: usize) -> Self {
        Graph {
            nodes: Vec::with_capacity(nodes),
            edges: Vec::with_capacity(edges),
            edge_index: HashMap::with_capacity(edges),
            incident: Vec::with_capacity(nodes),
        }
    }

    /// Creates an edgeless graph over the given nodes
    pub fn from_nodes<I>(nodes: I) -> Result<Self>
    where
        I: IntoIterator<Item = Node>,
    {
        let mut graph = Graph::new();
        for node in nodes {
            graph.add_node(node)?;
        }
        Ok(graph)
    }

    /// Returns a graph with the same nodes (same order) and no edges
    pub fn edgeless_copy(&self) -> Self {
        Graph {
            nodes: self.nodes.clone(),
            edges: Vec::new(),
            edge_index: HashMap::new(),
            incident: vec![Vec::new(); self.nodes.len()],
        }
    }

    /// Adds a node and returns its index
    pub fn add_node(&mut self, node: Node) -> Result<usize> {
        if !node.is_finite() {
            return Err(Error::InvalidCoordinate { x: node.x, y: node.y });
        }

        let index = self.nodes.len();
        self.nodes.push(node);
        self.incident.push(Vec::new());
        Ok(index)
    }

    /// Adds an undirected edge between two existing nodes and returns its index
    ///
    /// The weight is the Euclidean distance between the endpoints. Adding an edge
    /// that already exists (in either orientation) returns the existing index.
    pub fn add_edge(&mut self, start: usize, end: usize) -> Result<usize> {
        let start_node = self.node(start).ok_or(Error::InvalidReference(start))?;
        let end_node = self.node(end).ok_or(Error::InvalidReference(end))?;

        let key = EdgeKey::new(start, end);
        if let Some(&existing) = self.edge_index.get(&key) {
            debug!("Edge {}-{} already present as edge {}", start, end, existing);
            return Ok(existing);
        }

        let weight = start_node.distance_to(end_node);
        let index = self.edges.len();
        self.edges.push(Edge::new(start, end, weight));
        self.edge_index.insert(key, index);

        self.incident[start].push((end, index));
        if start != end {
            self.incident[end].push((start, index));
        }

        Ok(index)
    }

    pub fn node(&self, index: usize) -> Option<&Node> {
        self.nodes.get(index)
    }

    pub fn nodes(&self) -> &[Node] {
        &self.nodes
    }

    pub fn edge(&self, index: usize) -> Option<&Edge> {
        self.edges.get(index)
    }

    pub fn edges(&self) -> &[Edge] {
        &self.edges
    }

    /// Looks up the edge joining two nodes, in either orientation
    pub fn edge_between(&self, a: usize, b: usize) -> Option<&Edge> {
        self.edge_index
            .get(&EdgeKey::new(a, b))
            .map(|&index| &self.edges[index])
    }

    pub fn contains_edge_key(&self, key: EdgeKey) -> bool {
        self.edge_index.contains_key(&key)
    }

    /// Number of edges incident to a node (0 for unknown nodes)
    pub fn degree(&self, node: usize) -> usize {
        self.incident.get(node).map_or(0, |edges| edges.len())
    }

    /// Edges incident to a node, in insertion order
    pub fn incident_edges(&self, node: usize) -> impl Iterator<Item = &Edge> + '_ {
        self.incident
            .get(node)
            .into_iter()
            .flatten()
            .map(move |&(_, edge)| &self.edges[edge])
    }

    /// Fails with [`Error::InvalidReference`] unless the node exists
    pub fn check_node(&self, node: usize) -> Result<()> {
        if node < self.nodes.len() {
            Ok(())
        } else {
            Err(Error::InvalidReference(node))
        }
    }

    /// Sum of the Euclidean lengths of consecutive hops along a node sequence
    pub fn polyline_length(&self, path: &[usize]) -> Result<f64> {
        let mut length = 0.0;
        for pair in path.windows(2) {
            let a = self.node(pair[0]).ok_or(Error::InvalidReference(pair[0]))?;
            let b = self.node(pair[1]).ok_or(Error::InvalidReference(pair[1]))?;
            length += a.distance_to(b);
        }
        Ok(length)
    }

    /// Builds the compact (CSR) adjacency representation with the stored weights
    pub fn to_adjacency_list(&self) -> AdjacencyList {
        AdjacencyList::from_graph(self, |weight| weight)
    }

    /// Builds the compact adjacency representation, mapping every weight through
    /// `weight_fn` (used to bias routing without touching the geometry)
    pub fn to_adjacency_list_with<F>(&self, weight_fn: F) -> AdjacencyList
    where
        F: Fn(f64) -> f64,
    {
        AdjacencyList::from_graph(self, weight_fn)
    }
}

impl WeightedGraph for Graph {
    fn node_count(&self) -> usize {
        self.nodes.len()
    }

    fn edge_count(&self) -> usize {
        self.edges.len()
    }

    fn neighbors(&self, node: usize) -> Box<dyn Iterator<Item = (usize, f64)> + '_> {
        match self.incident.get(node) {
            Some(edges) => Box::new(
                edges
                    .iter()
                    .map(move |&(neighbor, edge)| (neighbor, self.edges[edge].weight())),
            ),
            None => Box::new(std::iter::empty()),
        }
    }

    fn has_edge(&self, a: usize, b: usize) -> bool {
        self.edge_index.contains_key(&EdgeKey::new(a, b))
    }

    fn edge_weight(&self, a: usize, b: usize) -> Option<f64> {
        self.edge_between(a, b).map(Edge::weight)
    }
}
