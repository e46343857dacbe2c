mod common;

use common::{assert_close, cycle_graph, CYCLE_CLOSING_DETOUR, CYCLE_CLOSING_EDGE, CYCLE_POINTS};
use edge_path_bundling::graph::generators::{generate_geometric_2d, generate_grid};
use edge_path_bundling::graph::{EdgeKey, WeightedGraph};
use edge_path_bundling::{
    bundle, BundlingOptions, CancellationToken, DistortionPolicy, EdgePathBundling, Error,
    GreedySpanner, Node, Rejection, SolverKind,
};

const ALL_SOLVERS: [SolverKind; 4] = [
    SolverKind::Sequential,
    SolverKind::Batched,
    SolverKind::AllPairs,
    SolverKind::Auto,
];

fn point(index: usize) -> Node {
    let (x, y) = CYCLE_POINTS[index];
    Node::new(x, y)
}

#[test]
fn test_cycle_closing_edge_is_bundled_around() {
    let graph = cycle_graph();

    for solver in ALL_SOLVERS {
        let result = bundle(&graph, BundlingOptions::new().with_solver(solver)).unwrap();

        assert_eq!(result.spanner.edge_count(), 5);
        assert!(result.rejected_edges.is_empty());
        assert_eq!(result.bundled_edges.len(), 1);

        let bundled = &result.bundled_edges[0];
        assert_eq!(bundled.edge.key(), EdgeKey::new(0, 5));
        assert_close(bundled.edge.weight(), CYCLE_CLOSING_EDGE);

        // The closing edge was inserted as 5 -> 0, so the detour runs 5, 4, 3, 2, 1, 0
        assert_eq!(bundled.edge.start(), 5);
        assert_eq!(
            bundled.control_points,
            vec![point(4), point(3), point(2), point(1)]
        );
    }
}

#[test]
fn test_auto_resolves_to_sequential_for_small_runs() {
    let result = bundle(&cycle_graph(), BundlingOptions::default()).unwrap();
    assert_eq!(result.solver, SolverKind::Sequential);
}

#[test]
fn test_tight_stretch_leaves_nothing_to_bundle() {
    let result = bundle(&cycle_graph(), BundlingOptions::new().with_stretch_factor(1.5)).unwrap();
    assert_eq!(result.spanner.edge_count(), 6);
    assert!(result.bundled_edges.is_empty());
    assert!(result.rejected_edges.is_empty());
}

#[test]
fn test_distortion_bound_best_effort() {
    // The spanner at t = 2 drops the closing edge; a 1.5 bound rejects its detour
    let graph = cycle_graph();
    let spanner = GreedySpanner::new(2.0).build(&graph).unwrap();
    let options = BundlingOptions::new().with_max_distortion(1.5);
    let result = EdgePathBundling::new(options)
        .bundle_with_spanner(&graph, spanner)
        .unwrap();

    assert!(result.bundled_edges.is_empty());
    assert_eq!(result.rejected_edges.len(), 1);

    let rejected = &result.rejected_edges[0];
    assert_eq!(rejected.edge.key(), EdgeKey::new(0, 5));
    match rejected.reason {
        Rejection::DistortionExceeded { length, limit } => {
            assert_close(length, CYCLE_CLOSING_DETOUR);
            assert_close(limit, 1.5 * CYCLE_CLOSING_EDGE);
        }
        other => panic!("unexpected rejection {:?}", other),
    }
}

#[test]
fn test_distortion_bound_strict() {
    let graph = cycle_graph();
    let spanner = GreedySpanner::new(2.0).build(&graph).unwrap();
    let options = BundlingOptions::new()
        .with_max_distortion(1.5)
        .with_policy(DistortionPolicy::Strict);

    match EdgePathBundling::new(options).bundle_with_spanner(&graph, spanner) {
        Err(Error::DistortionExceeded { start, end, .. }) => {
            assert_eq!(EdgeKey::new(start, end), EdgeKey::new(0, 5));
        }
        other => panic!("expected a distortion error, got {:?}", other.map(|r| r.solver)),
    }
}

#[test]
fn test_unreachable_against_custom_spanner() {
    let graph = cycle_graph();
    let empty = graph.edgeless_copy();

    let result = EdgePathBundling::new(BundlingOptions::default())
        .bundle_with_spanner(&graph, empty.clone())
        .unwrap();
    assert_eq!(result.rejected_edges.len(), 6);
    assert!(result
        .rejected_edges
        .iter()
        .all(|rejected| rejected.reason == Rejection::Unreachable));

    let strict = EdgePathBundling::new(BundlingOptions::new().with_policy(DistortionPolicy::Strict))
        .bundle_with_spanner(&graph, empty);
    assert!(matches!(strict, Err(Error::Unreachable { .. })));
}

#[test]
fn test_spanner_mismatch() {
    let graph = cycle_graph();
    let mut other = graph.edgeless_copy();
    other.add_node(Node::new(1.0, 1.0)).unwrap();

    let result = EdgePathBundling::default().bundle_with_spanner(&graph, other);
    assert!(matches!(
        result,
        Err(Error::SpannerMismatch {
            expected: 6,
            found: 7
        })
    ));
}

#[test]
fn test_precomputed_spanner_matches_full_run() {
    let graph = generate_geometric_2d(90, 180.0, 5).unwrap();
    let spanner = GreedySpanner::new(2.0).build(&graph).unwrap();

    let full = bundle(&graph, BundlingOptions::default()).unwrap();
    let reused = EdgePathBundling::default()
        .bundle_with_spanner(&graph, spanner)
        .unwrap();

    assert_eq!(full.bundled_edges, reused.bundled_edges);
    assert_eq!(full.rejected_edges, reused.rejected_edges);
}

#[test]
fn test_bundled_edges_respect_distortion_bound() {
    let graph = generate_grid(7, 7, 20.0, true).unwrap();

    for (t, bound) in [(2.0, None), (1.5, Some(2.5))] {
        let mut options = BundlingOptions::new().with_stretch_factor(t);
        if let Some(bound) = bound {
            options = options.with_max_distortion(bound);
        }
        let limit_factor = options.effective_max_distortion();
        let result = bundle(&graph, options).unwrap();

        let difference = graph.edge_count() - result.spanner.edge_count();
        assert_eq!(
            result.bundled_edges.len() + result.rejected_edges.len(),
            difference
        );

        for bundled in &result.bundled_edges {
            assert!(!result.spanner.contains_edge_key(bundled.edge.key()));

            let mut polyline = vec![*graph.node(bundled.edge.start()).unwrap()];
            polyline.extend(bundled.control_points.iter().copied());
            polyline.push(*graph.node(bundled.edge.end()).unwrap());

            let length: f64 = polyline.windows(2).map(|hop| hop[0].distance_to(&hop[1])).sum();
            assert!(length <= limit_factor * bundled.edge.weight() + 1e-9);
            assert!(!bundled.control_points.is_empty());
        }
    }
}

#[test]
fn test_solvers_produce_the_same_bundling() {
    let graph = generate_geometric_2d(120, 150.0, 8).unwrap();

    let runs: Vec<_> = [SolverKind::Sequential, SolverKind::Batched, SolverKind::AllPairs]
        .into_iter()
        .map(|solver| bundle(&graph, BundlingOptions::new().with_solver(solver)).unwrap())
        .collect();

    assert_eq!(runs[0].bundled_edges, runs[1].bundled_edges);
    assert_eq!(runs[0].rejected_edges, runs[1].rejected_edges);

    // All-pairs may pick another path on exact ties; with generic positions it does not
    assert_eq!(runs[0].bundled_edges.len(), runs[2].bundled_edges.len());
    for (a, b) in runs[0].bundled_edges.iter().zip(&runs[2].bundled_edges) {
        assert_eq!(a.edge, b.edge);
        assert_eq!(a.control_points, b.control_points);
    }
}

#[test]
fn test_edge_weight_factor_keeps_geometric_bound() {
    let graph = cycle_graph();
    let result = bundle(&graph, BundlingOptions::new().with_edge_weight_factor(2.0)).unwrap();

    assert_eq!(result.bundled_edges.len(), 1);
    assert_eq!(
        result.bundled_edges[0].control_points,
        vec![point(4), point(3), point(2), point(1)]
    );
}

#[test]
fn test_invalid_options() {
    let graph = cycle_graph();
    let invalid = [
        BundlingOptions::new().with_stretch_factor(0.9),
        BundlingOptions::new().with_max_distortion(0.5),
        BundlingOptions::new().with_edge_weight_factor(-1.0),
        BundlingOptions::new().with_edge_weight_factor(f64::NAN),
    ];

    for options in invalid {
        assert!(matches!(
            bundle(&graph, options),
            Err(Error::InvalidParameter(_))
        ));
    }
}

#[test]
fn test_max_distortion_below_stretch_factor_is_rejected() {
    let graph = cycle_graph();
    let options = BundlingOptions::new()
        .with_stretch_factor(3.0)
        .with_max_distortion(1.0);

    assert!(matches!(
        bundle(&graph, options.clone()),
        Err(Error::InvalidParameter(_))
    ));
    assert!(matches!(options.validate(), Err(Error::InvalidParameter(_))));

    // A supplied spanner carries no stretch guarantee, so only the bound itself is checked
    let spanner = GreedySpanner::new(3.0).build(&graph).unwrap();
    let result = EdgePathBundling::new(options)
        .bundle_with_spanner(&graph, spanner)
        .unwrap();
    assert!(result.bundled_edges.is_empty());
    assert_eq!(result.rejected_edges.len(), 1);
}

#[test]
fn test_self_loops_are_not_routed() {
    let mut graph = cycle_graph();
    graph.add_edge(2, 2).unwrap();
    assert_eq!(graph.edge_count(), 7);

    let strict = BundlingOptions::new().with_policy(DistortionPolicy::Strict);
    let result = bundle(&graph, strict).unwrap();
    assert_eq!(result.bundled_edges.len(), 1);
    assert_eq!(result.bundled_edges[0].edge.key(), EdgeKey::new(0, 5));
    assert!(result.rejected_edges.is_empty());

    let result = EdgePathBundling::default()
        .bundle_with_spanner(&graph, graph.edgeless_copy())
        .unwrap();
    assert_eq!(result.rejected_edges.len(), 6);
    assert!(result
        .rejected_edges
        .iter()
        .all(|rejected| !rejected.edge.is_loop()));
}

#[test]
fn test_cancelled_bundling() {
    let graph = cycle_graph();
    let token = CancellationToken::new();
    token.cancel();

    for solver in [SolverKind::Sequential, SolverKind::Batched, SolverKind::AllPairs] {
        let result = EdgePathBundling::new(BundlingOptions::new().with_solver(solver))
            .with_cancellation(token.clone())
            .bundle(&graph);
        assert!(matches!(result, Err(Error::Cancelled)));
    }
}

#[test]
fn test_solver_resolution() {
    let options = BundlingOptions::default();
    assert_eq!(options.resolve_solver(10, 5_000), SolverKind::Sequential);
    assert_eq!(options.resolve_solver(500, 400), SolverKind::AllPairs);
    assert_eq!(options.resolve_solver(500, 1_000), SolverKind::Batched);
    assert_eq!(options.resolve_solver(10_000, 5_000), SolverKind::Batched);

    let pinned = BundlingOptions::new().with_solver(SolverKind::Batched);
    assert_eq!(pinned.resolve_solver(1, 1), SolverKind::Batched);
}

#[test]
fn test_options_from_json() {
    let options: BundlingOptions =
        serde_json::from_str(r#"{"stretch_factor": 3.0, "solver": "all-pairs", "policy": "strict"}"#)
            .unwrap();

    assert_eq!(options.stretch_factor, 3.0);
    assert_eq!(options.solver, SolverKind::AllPairs);
    assert_eq!(options.policy, DistortionPolicy::Strict);
    assert_eq!(options.edge_weight_factor, 1.0);
    assert_eq!(options.effective_max_distortion(), 3.0);
}
