pub mod batched;
pub mod dijkstra;
pub mod floyd_warshall;
pub mod spanner;
pub mod traits;

pub use traits::{ShortestPath, ShortestPathAlgorithm};
