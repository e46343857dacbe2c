use serde::{Deserialize, Serialize};

use crate::graph::node::Node;
use crate::graph::undirected::Graph;
use crate::Result;

/// Plain serializable form of a graph
///
/// ```json
/// { "nodes": [[x, y], ...], "edges": [[startIndex, endIndex], ...] }
/// ```
///
/// Node order is authoritative: edge endpoints refer to positions in `nodes`.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct GraphJson {
    pub nodes: Vec<[f64; 2]>,
    pub edges: Vec<[usize; 2]>,
}

impl Graph {
    /// Builds a graph from its serializable form.
    ///
    /// Fails on the first edge that references a missing node.
    pub fn from_serialized(data: &GraphJson) -> Result<Self> {
        let mut graph = Graph::with_capacity(data.nodes.len(), data.edges.len());

        for &coords in &data.nodes {
            graph.add_node(Node::from(coords))?;
        }
        for &[start, end] in &data.edges {
            graph.add_edge(start, end)?;
        }

        Ok(graph)
    }

    /// Serializable form preserving node order and edge insertion order
    pub fn to_serialized(&self) -> GraphJson {
        GraphJson {
            nodes: self.nodes().iter().map(|&node| node.into()).collect(),
            edges: self
                .edges()
                .iter()
                .map(|edge| [edge.start(), edge.end()])
                .collect(),
        }
    }

    pub fn from_json_str(json: &str) -> Result<Self> {
        let data: GraphJson = serde_json::from_str(json)?;
        Graph::from_serialized(&data)
    }

    pub fn to_json_string(&self) -> Result<String> {
        Ok(serde_json::to_string(&self.to_serialized())?)
    }
}
