use serde::{Deserialize, Serialize};

/// A graph node: a position in the plane
///
/// Nodes never change after creation; the owning graph identifies them by index.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct Node {
    pub x: f64,
    pub y: f64,
}

/// Control points handed to the renderer share the node layout
pub type Point = Node;

impl Node {
    pub fn new(x: f64, y: f64) -> Self {
        Node { x, y }
    }

    /// Textual identity derived from the coordinates, e.g. `"12.5_7"`
    pub fn key(&self) -> String {
        format!("{}_{}", self.x, self.y)
    }

    /// Euclidean distance to another node
    pub fn distance_to(&self, other: &Node) -> f64 {
        let dx = other.x - self.x;
        let dy = other.y - self.y;
        (dx * dx + dy * dy).sqrt()
    }

    pub fn is_finite(&self) -> bool {
        self.x.is_finite() && self.y.is_finite()
    }
}

impl From<[f64; 2]> for Node {
    fn from([x, y]: [f64; 2]) -> Self {
        Node { x, y }
    }
}

impl From<Node> for [f64; 2] {
    fn from(node: Node) -> Self {
        [node.x, node.y]
    }
}
