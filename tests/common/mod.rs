#![allow(dead_code)]

use edge_path_bundling::graph::generators::generate_cycle;
use edge_path_bundling::{Graph, Node};

/// Six nodes on a closed cycle 0-1-2-3-4-5-0 where the closing edge 5-0 is much
/// longer than the rest, so a t=2 spanner drops it and routes it around the cycle.
pub const CYCLE_POINTS: [(f64, f64); 6] = [
    (120.0, 400.0),
    (430.0, 180.0),
    (748.323, 295.86),
    (760.0, 520.0),
    (560.0, 700.0),
    (812.76, 1138.45),
];

pub const CYCLE_0_TO_2: f64 = 718.8837841071212;
pub const CYCLE_5_TO_1: f64 = 1338.3576153917325;
pub const CYCLE_CLOSING_EDGE: f64 = 1012.5338612115646;
pub const CYCLE_CLOSING_DETOUR: f64 = 1718.4891715666968;

pub fn cycle_nodes() -> Vec<Node> {
    CYCLE_POINTS.iter().map(|&(x, y)| Node::new(x, y)).collect()
}

pub fn cycle_graph() -> Graph {
    generate_cycle(&cycle_nodes()).unwrap()
}

pub fn assert_close(actual: f64, expected: f64) {
    assert!(
        (actual - expected).abs() <= 1e-6,
        "expected {}, got {}",
        expected,
        actual
    );
}
