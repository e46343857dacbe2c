//! All-pairs shortest paths with next-hop path reconstruction.
//!
//! Worth its O(V³) cost when one graph is queried for many pairs: the matrices are
//! computed once and every path afterwards costs O(path length).

use log::info;
use num_traits::Float;
use rayon::prelude::*;
use std::fmt::Debug;
use std::marker::PhantomData;
use std::time::Instant;

use crate::algorithm::traits::{check_node, check_pairs};
use crate::algorithm::{ShortestPath, ShortestPathAlgorithm};
use crate::cancel::CancellationToken;
use crate::data_structures::SquareMatrix;
use crate::graph::WeightedGraph;
use crate::{Error, Result};

/// Next-hop value for pairs with no known path
pub const NO_NEXT_HOP: u32 = u32::MAX;

/// Floyd–Warshall solver configuration
///
/// `W` is the float type of the distance matrix: `f64` by default, `f32` halves
/// the memory of large matrices at the cost of precision.
#[derive(Debug, Clone)]
pub struct FloydWarshall<W = f64>
where
    W: Float + Debug + Send + Sync,
{
    /// Exponent applied to every edge weight before relaxation
    edge_weight_factor: f64,
    /// Checked before each k-pass
    cancellation: Option<CancellationToken>,
    _weight: PhantomData<W>,
}

impl<W> Default for FloydWarshall<W>
where
    W: Float + Debug + Send + Sync,
{
    fn default() -> Self {
        FloydWarshall {
            edge_weight_factor: 1.0,
            cancellation: None,
            _weight: PhantomData,
        }
    }
}

impl<W> FloydWarshall<W>
where
    W: Float + Debug + Send + Sync,
{
    pub fn new() -> Self {
        FloydWarshall::default()
    }

    /// Raise every edge weight to this power before computing distances.
    ///
    /// Values above 1 favour many short hops, values below 1 favour few long ones.
    pub fn with_edge_weight_factor(mut self, factor: f64) -> Self {
        self.edge_weight_factor = factor;
        self
    }

    pub fn with_cancellation(mut self, token: CancellationToken) -> Self {
        self.cancellation = Some(token);
        self
    }

    /// Computes the distance and next-hop matrices of a graph
    pub fn compute<G>(&self, graph: &G) -> Result<AllPairsPaths<W>>
    where
        G: WeightedGraph + ?Sized,
    {
        let n = graph.node_count();
        if n >= NO_NEXT_HOP as usize {
            return Err(Error::InvalidParameter(format!(
                "graph with {} nodes is too large for the next-hop matrix",
                n
            )));
        }
        if !self.edge_weight_factor.is_finite() {
            return Err(Error::InvalidParameter(format!(
                "edge weight factor must be finite, got {}",
                self.edge_weight_factor
            )));
        }

        let started = Instant::now();
        let mut paths = self.initialize(graph);

        for k in 0..n {
            if let Some(token) = &self.cancellation {
                token.check()?;
            }
            paths.relax_through(k);
        }

        info!(
            "Floyd-Warshall over {} nodes finished in {:?}",
            n,
            started.elapsed()
        );

        Ok(paths)
    }

    fn initialize<G>(&self, graph: &G) -> AllPairsPaths<W>
    where
        G: WeightedGraph + ?Sized,
    {
        let n = graph.node_count();
        let mut distance = SquareMatrix::filled(n, W::infinity());
        let mut next = SquareMatrix::filled(n, NO_NEXT_HOP);

        for x in 0..n {
            distance.set(x, x, W::zero());
            next.set(x, x, x as u32);

            for (y, weight) in graph.neighbors(x) {
                if y == x {
                    continue;
                }

                let weight = W::from(weight.abs().powf(self.edge_weight_factor))
                    .unwrap_or_else(W::infinity);
                if distance.get(x, y).is_some_and(|current| weight < current) {
                    distance.set(x, y, weight);
                    next.set(x, y, y as u32);
                }
            }
        }

        AllPairsPaths {
            distance,
            next,
            edge_count: graph.edge_count(),
        }
    }
}

impl<G, W> ShortestPathAlgorithm<G> for FloydWarshall<W>
where
    G: WeightedGraph + ?Sized,
    W: Float + Debug + Send + Sync,
{
    fn name(&self) -> &'static str {
        "Floyd-Warshall"
    }

    /// Computes the full matrices for a single pair; prefer
    /// [`shortest_paths`](ShortestPathAlgorithm::shortest_paths) or
    /// [`compute`](FloydWarshall::compute) when querying more than once.
    fn shortest_path(&self, graph: &G, start: usize, end: usize) -> Result<Option<ShortestPath>> {
        check_node(graph, start)?;
        check_node(graph, end)?;
        self.compute(graph)?.path(start, end)
    }

    fn shortest_paths(&self, graph: &G, pairs: &[(usize, usize)]) -> Result<Vec<Option<ShortestPath>>> {
        check_pairs(graph, pairs)?;
        self.compute(graph)?.paths(pairs)
    }
}

/// Distance and next-hop matrices produced by [`FloydWarshall::compute`]
#[derive(Debug, Clone)]
pub struct AllPairsPaths<W>
where
    W: Float + Debug + Send + Sync,
{
    /// `distance[x][y]`: shortest distance from x to y, infinity if unreachable
    distance: SquareMatrix<W>,
    /// `next[x][y]`: the node after x on the shortest path toward y
    next: SquareMatrix<u32>,
    edge_count: usize,
}

impl<W> AllPairsPaths<W>
where
    W: Float + Debug + Send + Sync,
{
    /// One relaxation pass through intermediate node `k`.
    ///
    /// Rows are updated in parallel. Row k and column k cannot change during pass k
    /// (`d[x][k] + d[k][k]` never beats `d[x][k]`), and both are copied out before
    /// the pass starts, so every worker reads the state as of the start of the pass.
    /// `for_each` returns only after every row is done: that join is the barrier
    /// between pass k and pass k + 1.
    fn relax_through(&mut self, k: usize) {
        let row_k: Vec<W> = self.distance.row(k).to_vec();
        let column_k = self.distance.column(k);
        let next_column_k = self.next.column(k);

        self.distance
            .par_rows_mut()
            .zip(self.next.par_rows_mut())
            .enumerate()
            .for_each(|(x, (distances, hops))| {
                let through_k = column_k[x];
                if through_k.is_infinite() {
                    return;
                }

                let hop = next_column_k[x];
                for (y, (distance, next)) in distances.iter_mut().zip(hops.iter_mut()).enumerate() {
                    let candidate = through_k + row_k[y];
                    if candidate < *distance {
                        *distance = candidate;
                        *next = hop;
                    }
                }
            });
    }

    pub fn size(&self) -> usize {
        self.distance.size()
    }

    /// Shortest distance from x to y; `None` for out-of-range indices
    pub fn distance(&self, x: usize, y: usize) -> Option<W> {
        self.distance.get(x, y)
    }

    /// The node after x on the shortest path toward y, if any
    pub fn next_hop(&self, x: usize, y: usize) -> Option<usize> {
        self.next
            .get(x, y)
            .filter(|&hop| hop != NO_NEXT_HOP)
            .map(|hop| hop as usize)
    }

    /// Reconstructs the shortest path from `start` to `end` by following next hops
    pub fn path(&self, start: usize, end: usize) -> Result<Option<ShortestPath>> {
        let n = self.size();
        if start >= n {
            return Err(Error::InvalidReference(start));
        }
        if end >= n {
            return Err(Error::InvalidReference(end));
        }

        if self.edge_count == 0 {
            return Ok(None);
        }

        let length = match self.distance(start, end) {
            Some(length) if length.is_finite() => length,
            _ => return Ok(None),
        };

        let mut nodes = vec![start];
        let mut current = start;
        while current != end {
            current = match self.next_hop(current, end) {
                Some(hop) => hop,
                None => return Ok(None),
            };
            nodes.push(current);

            if nodes.len() > n {
                return Ok(None);
            }
        }

        Ok(Some(ShortestPath {
            nodes,
            length: length.to_f64().unwrap_or(f64::INFINITY),
        }))
    }

    /// Reconstructs many paths in parallel, aligned with `pairs`
    pub fn paths(&self, pairs: &[(usize, usize)]) -> Result<Vec<Option<ShortestPath>>> {
        pairs
            .par_iter()
            .map(|&(start, end)| self.path(start, end))
            .collect()
    }
}
