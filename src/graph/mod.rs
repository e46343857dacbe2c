pub mod adjacency;
pub mod edge;
pub mod generators;
pub mod node;
pub mod serialized;
pub mod traits;
pub mod undirected;

pub use adjacency::{AdjacencyEntry, AdjacencyList};
pub use edge::{Edge, EdgeKey};
pub use node::{Node, Point};
pub use serialized::GraphJson;
pub use traits::WeightedGraph;
pub use undirected::Graph;
