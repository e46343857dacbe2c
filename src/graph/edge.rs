use serde::Serialize;

/// Canonical identity of an undirected edge: the smaller node index first
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize)]
pub struct EdgeKey(pub usize, pub usize);

impl EdgeKey {
    pub fn new(a: usize, b: usize) -> Self {
        if a <= b {
            EdgeKey(a, b)
        } else {
            EdgeKey(b, a)
        }
    }
}

/// An undirected edge between two nodes of the owning graph
///
/// The weight is always the Euclidean distance between the endpoints; edges are
/// only created through [`Graph::add_edge`](crate::graph::Graph::add_edge), which
/// derives it. `start`/`end` keep the orientation the edge was inserted with so the
/// serialized form round-trips exactly.
#[derive(Debug, Clone, Copy, PartialEq, Serialize)]
pub struct Edge {
    start: usize,
    end: usize,
    weight: f64,
}

impl Edge {
    pub(crate) fn new(start: usize, end: usize, weight: f64) -> Self {
        Edge { start, end, weight }
    }

    pub fn start(&self) -> usize {
        self.start
    }

    pub fn end(&self) -> usize {
        self.end
    }

    pub fn weight(&self) -> f64 {
        self.weight
    }

    pub fn key(&self) -> EdgeKey {
        EdgeKey::new(self.start, self.end)
    }

    /// The endpoint opposite to `node`, or `None` if `node` is not an endpoint
    pub fn other(&self, node: usize) -> Option<usize> {
        if node == self.start {
            Some(self.end)
        } else if node == self.end {
            Some(self.start)
        } else {
            None
        }
    }

    pub fn is_loop(&self) -> bool {
        self.start == self.end
    }
}
