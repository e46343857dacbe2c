use std::time::{Duration, Instant};

use edge_path_bundling::bundling::route_pairs;
use edge_path_bundling::graph::generators::{generate_geometric_2d, CANVAS_SIZE};
use edge_path_bundling::graph::WeightedGraph;
use edge_path_bundling::{BundlingOptions, EdgePathBundling, GreedySpanner, ShortestPath, SolverKind};

// Radius giving roughly `degree` neighbours per node on the square canvas
fn radius_for_degree(nodes: usize, degree: f64) -> f64 {
    (degree * CANVAS_SIZE * CANVAS_SIZE / (std::f64::consts::PI * nodes as f64)).sqrt()
}

fn time_solver(
    solver: SolverKind,
    routing: &edge_path_bundling::AdjacencyList,
    pairs: &[(usize, usize)],
) -> Result<(Duration, Vec<Option<ShortestPath>>), Box<dyn std::error::Error>> {
    let start = Instant::now();
    let paths = route_pairs(routing, pairs, solver, None)?;
    let duration = start.elapsed();

    let found = paths.iter().filter(|path| path.is_some()).count();
    println!("  - {:?}: {} of {} paths in {:?}", solver, found, pairs.len(), duration);

    Ok((duration, paths))
}

fn same_lengths(a: &[Option<ShortestPath>], b: &[Option<ShortestPath>]) -> bool {
    a.len() == b.len()
        && a.iter().zip(b).all(|(a, b)| match (a, b) {
            (Some(a), Some(b)) => (a.length - b.length).abs() <= 1e-9 * a.length.max(1.0),
            (None, None) => true,
            _ => false,
        })
}

fn main() -> Result<(), Box<dyn std::error::Error>> {
    env_logger::init();

    let graph_sizes = [250, 500, 1_000, 2_000];
    let degree = 8.0;
    let stretch_factor = 2.0;

    println!("=====================================================");
    println!("Benchmark: spanner, routing solvers and bundling");
    println!("Random geometric graphs, ~{} neighbours per node, t = {}", degree, stretch_factor);
    println!("=====================================================");

    let mut results = Vec::new();

    for &size in &graph_sizes {
        println!("\nGenerating random geometric graph with {} nodes...", size);
        let graph = generate_geometric_2d(size, radius_for_degree(size, degree), 42)?;
        println!("Graph has {} nodes and {} edges", graph.node_count(), graph.edge_count());

        let start = Instant::now();
        let spanner = GreedySpanner::new(stretch_factor).build(&graph)?;
        let spanner_time = start.elapsed();
        println!("  - Spanner kept {} edges in {:?}", spanner.edge_count(), spanner_time);

        let routing = spanner.to_adjacency_list();
        let pairs: Vec<(usize, usize)> = graph
            .edges()
            .iter()
            .filter(|edge| !spanner.contains_edge_key(edge.key()))
            .map(|edge| (edge.start(), edge.end()))
            .collect();

        let (sequential_time, sequential) = time_solver(SolverKind::Sequential, &routing, &pairs)?;
        let (batched_time, batched) = time_solver(SolverKind::Batched, &routing, &pairs)?;
        let (all_pairs_time, all_pairs) = time_solver(SolverKind::AllPairs, &routing, &pairs)?;

        if !same_lengths(&sequential, &batched) || !same_lengths(&sequential, &all_pairs) {
            println!("  ! Solvers disagree on path lengths");
        }

        let start = Instant::now();
        let result = EdgePathBundling::new(BundlingOptions::new().with_stretch_factor(stretch_factor))
            .bundle(&graph)?;
        let bundling_time = start.elapsed();
        println!(
            "  - Bundling ({:?}): {} bundled, {} rejected in {:?}",
            result.solver,
            result.bundled_edges.len(),
            result.rejected_edges.len(),
            bundling_time
        );

        results.push((size, spanner_time, sequential_time, batched_time, all_pairs_time, bundling_time));
    }

    println!("\n=====================================================");
    println!("Summary of Results (ms)");
    println!("=====================================================");
    println!(
        "{:<8} | {:<10} | {:<12} | {:<10} | {:<10} | {:<10}",
        "Nodes", "Spanner", "Sequential", "Batched", "All-pairs", "Bundling"
    );
    println!("-----------------------------------------------------");

    for (size, spanner, sequential, batched, all_pairs, bundling) in &results {
        println!(
            "{:<8} | {:<10.2} | {:<12.2} | {:<10.2} | {:<10.2} | {:<10.2}",
            size,
            spanner.as_secs_f64() * 1000.0,
            sequential.as_secs_f64() * 1000.0,
            batched.as_secs_f64() * 1000.0,
            all_pairs.as_secs_f64() * 1000.0,
            bundling.as_secs_f64() * 1000.0
        );
    }

    Ok(())
}
