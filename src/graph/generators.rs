use rand::prelude::*;
use rand::rngs::StdRng;

use crate::graph::{Graph, Node};
use crate::{Error, Result};

/// Side length of the square the random generators place nodes in
pub const CANVAS_SIZE: f64 = 1000.0;

/// Generates a random geometric graph in the plane
/// n: number of nodes, placed uniformly in a `CANVAS_SIZE` square
/// radius: nodes within this distance of each other are connected
/// seed: makes the graph reproducible
pub fn generate_geometric_2d(n: usize, radius: f64, seed: u64) -> Result<Graph> {
    let mut rng = StdRng::seed_from_u64(seed);
    let edges = n.checked_mul(4).ok_or_else(|| too_large(n))?;
    let mut graph = Graph::with_capacity(n, edges);

    for _ in 0..n {
        let x = rng.gen_range(0.0..CANVAS_SIZE);
        let y = rng.gen_range(0.0..CANVAS_SIZE);
        graph.add_node(Node::new(x, y))?;
    }

    // Connect points that are within distance r
    for i in 0..n {
        for j in (i + 1)..n {
            let a = graph.nodes()[i];
            let b = graph.nodes()[j];
            if a.distance_to(&b) <= radius {
                graph.add_edge(i, j)?;
            }
        }
    }

    Ok(graph)
}

/// Generates a width x height grid with the given spacing
/// With `diagonals`, every cell also gets both of its diagonals, which gives the
/// spanner plenty of redundant edges to drop.
pub fn generate_grid(width: usize, height: usize, spacing: f64, diagonals: bool) -> Result<Graph> {
    let nodes = width
        .checked_mul(height)
        .ok_or_else(|| Error::InvalidParameter(format!("grid of {} x {} nodes is too large", width, height)))?;
    let edges = nodes.checked_mul(4).ok_or_else(|| too_large(nodes))?;
    let mut graph = Graph::with_capacity(nodes, edges);

    for row in 0..height {
        for col in 0..width {
            graph.add_node(Node::new(col as f64 * spacing, row as f64 * spacing))?;
        }
    }

    let index = |col: usize, row: usize| row * width + col;

    for row in 0..height {
        for col in 0..width {
            let current = index(col, row);

            if col + 1 < width {
                graph.add_edge(current, index(col + 1, row))?;
            }
            if row + 1 < height {
                graph.add_edge(current, index(col, row + 1))?;
            }
            if diagonals && col + 1 < width && row + 1 < height {
                graph.add_edge(current, index(col + 1, row + 1))?;
                graph.add_edge(index(col + 1, row), index(col, row + 1))?;
            }
        }
    }

    Ok(graph)
}

/// Generates a closed cycle through the given points, in order
pub fn generate_cycle(points: &[Node]) -> Result<Graph> {
    let mut graph = Graph::from_nodes(points.iter().copied())?;
    let n = points.len();

    if n < 2 {
        return Ok(graph);
    }

    for i in 0..n {
        let next = (i + 1) % n;
        if next != i {
            graph.add_edge(i, next)?;
        }
    }

    Ok(graph)
}

fn too_large(nodes: usize) -> Error {
    Error::InvalidParameter(format!("graph with {} nodes is too large to generate", nodes))
}
