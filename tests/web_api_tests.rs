mod common;

use axum::extract::{Path, State};
use axum::http::StatusCode;
use axum::Json;
use common::{assert_close, cycle_graph, CYCLE_0_TO_2, CYCLE_5_TO_1};
use edge_path_bundling::web::api::*;
use edge_path_bundling::web::models::*;
use edge_path_bundling::{BundlingOptions, GraphJson, SolverKind};
use uuid::Uuid;

async fn upload_cycle(state: &AppState) -> Session {
    upload_graph(State(state.clone()), Json(cycle_graph().to_serialized()))
        .await
        .unwrap()
        .0
}

#[tokio::test]
async fn test_upload_and_fetch_graph() {
    let state = AppState::new();
    let session = upload_cycle(&state).await;

    assert_eq!(session.graph.nodes.len(), 6);
    assert_eq!(session.graph.edges.len(), 6);
    assert!(session.spanner.is_none());

    let graph = get_graph(State(state.clone()), Path(session.id)).await.unwrap().0;
    assert_eq!(graph, cycle_graph().to_serialized());

    let fetched = get_session(State(state), Path(session.id)).await.unwrap().0;
    assert_eq!(fetched.id, session.id);
}

#[tokio::test]
async fn test_upload_rejects_dangling_edge() {
    let state = AppState::new();
    let graph = GraphJson {
        nodes: vec![[0.0, 0.0], [1.0, 0.0]],
        edges: vec![[0, 4]],
    };

    let (status, Json(error)) = upload_graph(State(state.clone()), Json(graph)).await.unwrap_err();
    assert_eq!(status, StatusCode::BAD_REQUEST);
    assert_eq!(error.error, "invalid_reference");
    assert!(state.sessions.lock().unwrap().is_empty());
}

#[tokio::test]
async fn test_unknown_session() {
    let state = AppState::new();
    let (status, Json(error)) = get_graph(State(state), Path(Uuid::new_v4())).await.unwrap_err();
    assert_eq!(status, StatusCode::NOT_FOUND);
    assert_eq!(error.error, "session_not_found");
}

#[tokio::test]
async fn test_spanner_then_bundle() {
    let state = AppState::new();
    let session = upload_cycle(&state).await;

    let spanner = build_spanner(
        State(state.clone()),
        Path(session.id),
        Json(SpannerRequest { stretch_factor: 2.0 }),
    )
    .await
    .unwrap()
    .0;
    assert_eq!(spanner.total_edges, 6);
    assert_eq!(spanner.kept_edges, 5);

    let stored = get_session(State(state.clone()), Path(session.id)).await.unwrap().0;
    assert_eq!(stored.spanner, Some(spanner.spanner.clone()));
    assert_eq!(stored.spanner_stretch_factor, Some(2.0));

    let response = bundle_graph(
        State(state),
        Path(session.id),
        Json(BundleRequest {
            options: BundlingOptions::default(),
            reuse_spanner: true,
        }),
    )
    .await
    .unwrap()
    .0;

    assert_eq!(response.spanner, spanner.spanner);
    assert_eq!(response.solver, SolverKind::Sequential);
    assert_eq!(response.bundled_edges.len(), 1);
    assert_eq!(response.bundled_edges[0].control_points.len(), 4);
    assert!(response.rejected_edges.is_empty());
}

#[tokio::test]
async fn test_bundle_without_stored_spanner() {
    let state = AppState::new();
    let session = upload_cycle(&state).await;

    let (status, Json(error)) = bundle_graph(
        State(state.clone()),
        Path(session.id),
        Json(BundleRequest {
            options: BundlingOptions::default(),
            reuse_spanner: true,
        }),
    )
    .await
    .unwrap_err();
    assert_eq!(status, StatusCode::CONFLICT);
    assert_eq!(error.error, "spanner_not_built");

    // Building a fresh spanner works without a stored one
    let response = bundle_graph(State(state), Path(session.id), Json(BundleRequest::default()))
        .await
        .unwrap()
        .0;
    assert_eq!(response.bundled_edges.len(), 1);
}

#[tokio::test]
async fn test_bundle_strict_failure_is_unprocessable() {
    let state = AppState::new();
    let session = upload_cycle(&state).await;

    build_spanner(
        State(state.clone()),
        Path(session.id),
        Json(SpannerRequest { stretch_factor: 2.0 }),
    )
    .await
    .unwrap();

    // The stored spanner's closing detour is about 1.7 times the edge
    let request: BundleRequest = serde_json::from_str(
        r#"{"max_distortion": 1.5, "policy": "strict", "reuse_spanner": true}"#,
    )
    .unwrap();
    let (status, Json(error)) = bundle_graph(State(state), Path(session.id), Json(request))
        .await
        .unwrap_err();

    assert_eq!(status, StatusCode::UNPROCESSABLE_ENTITY);
    assert_eq!(error.error, "distortion_exceeded");
    assert!(error.details.is_some());
}

#[tokio::test]
async fn test_bundle_rejects_max_distortion_below_stretch_factor() {
    let state = AppState::new();
    let session = upload_cycle(&state).await;

    let request: BundleRequest =
        serde_json::from_str(r#"{"stretch_factor": 3.0, "max_distortion": 1.0}"#).unwrap();
    let (status, Json(error)) = bundle_graph(State(state), Path(session.id), Json(request))
        .await
        .unwrap_err();

    assert_eq!(status, StatusCode::BAD_REQUEST);
    assert_eq!(error.error, "invalid_parameter");
}

#[tokio::test]
async fn test_shortest_paths_with_every_solver() {
    let state = AppState::new();
    let session = upload_cycle(&state).await;

    for solver in [
        SolverKind::Sequential,
        SolverKind::Batched,
        SolverKind::AllPairs,
        SolverKind::Auto,
    ] {
        let response = shortest_paths(
            State(state.clone()),
            Path(session.id),
            Json(ShortestPathsRequest {
                pairs: vec![(0, 2), (5, 1)],
                solver,
                edge_weight_factor: 1.0,
                use_spanner: false,
            }),
        )
        .await
        .unwrap()
        .0;

        assert_eq!(response.paths.len(), 2);
        let first = response.paths[0].as_ref().unwrap();
        let second = response.paths[1].as_ref().unwrap();
        assert_eq!(first.nodes, vec![0, 1, 2]);
        assert_close(first.length, CYCLE_0_TO_2);
        assert_eq!(second.nodes, vec![5, 4, 3, 2, 1]);
        assert_close(second.length, CYCLE_5_TO_1);
    }
}

#[tokio::test]
async fn test_shortest_paths_invalid_node() {
    let state = AppState::new();
    let session = upload_cycle(&state).await;

    let (status, Json(error)) = shortest_paths(
        State(state),
        Path(session.id),
        Json(ShortestPathsRequest {
            pairs: vec![(0, 42)],
            solver: SolverKind::Batched,
            edge_weight_factor: 1.0,
            use_spanner: false,
        }),
    )
    .await
    .unwrap_err();

    assert_eq!(status, StatusCode::BAD_REQUEST);
    assert_eq!(error.error, "invalid_reference");
}

#[tokio::test]
async fn test_generate_graph() {
    let state = AppState::new();

    let request: GraphGenerationRequest =
        serde_json::from_str(r#"{"graph_type": "grid", "node_count": 16, "spacing": 10.0}"#).unwrap();
    let session = generate_graph(State(state.clone()), Json(request)).await.unwrap().0;
    assert_eq!(session.graph.nodes.len(), 16);
    assert_eq!(session.graph.edges.len(), 24);

    let request: GraphGenerationRequest =
        serde_json::from_str(r#"{"graph_type": "geometric", "node_count": 40, "seed": 4}"#).unwrap();
    let session = generate_graph(State(state.clone()), Json(request)).await.unwrap().0;
    assert_eq!(session.graph.nodes.len(), 40);

    let request: GraphGenerationRequest =
        serde_json::from_str(r#"{"graph_type": "scale-free", "node_count": 40}"#).unwrap();
    let (status, _) = generate_graph(State(state), Json(request)).await.unwrap_err();
    assert_eq!(status, StatusCode::BAD_REQUEST);
}

#[tokio::test]
async fn test_generate_graph_rejects_oversized_requests() {
    let state = AppState::new().with_max_generated_nodes(1000);

    let request: GraphGenerationRequest = serde_json::from_str(
        r#"{"graph_type": "grid", "node_count": 0, "grid_dimensions": [200000, 200000]}"#,
    )
    .unwrap();
    let (status, Json(error)) = generate_graph(State(state.clone()), Json(request))
        .await
        .unwrap_err();
    assert_eq!(status, StatusCode::BAD_REQUEST);
    assert_eq!(error.error, "invalid_parameter");

    // Width times height overflows usize
    let request: GraphGenerationRequest = serde_json::from_str(&format!(
        r#"{{"graph_type": "grid", "node_count": 0, "grid_dimensions": [{}, 2]}}"#,
        usize::MAX
    ))
    .unwrap();
    let (status, Json(error)) = generate_graph(State(state.clone()), Json(request))
        .await
        .unwrap_err();
    assert_eq!(status, StatusCode::BAD_REQUEST);
    assert_eq!(error.error, "invalid_parameter");

    let request: GraphGenerationRequest =
        serde_json::from_str(r#"{"graph_type": "geometric", "node_count": 1001}"#).unwrap();
    let (status, Json(error)) = generate_graph(State(state.clone()), Json(request))
        .await
        .unwrap_err();
    assert_eq!(status, StatusCode::BAD_REQUEST);
    assert_eq!(error.error, "invalid_parameter");
    assert!(state.sessions.lock().unwrap().is_empty());

    let request: GraphGenerationRequest =
        serde_json::from_str(r#"{"graph_type": "geometric", "node_count": 1000}"#).unwrap();
    let session = generate_graph(State(state), Json(request)).await.unwrap().0;
    assert_eq!(session.graph.nodes.len(), 1000);
}

#[tokio::test]
async fn test_sessions_are_listed_and_evicted() {
    let state = AppState::with_max_sessions(2);

    upload_cycle(&state).await;
    upload_cycle(&state).await;
    let latest = upload_cycle(&state).await;

    let sessions = list_sessions(State(state.clone())).await.unwrap().0;
    assert_eq!(sessions.len(), 2);
    assert!(sessions.iter().any(|summary| summary.id == latest.id));
    assert!(sessions.iter().all(|summary| summary.node_count == 6));

    let status = delete_session(State(state.clone()), Path(latest.id)).await.unwrap();
    assert_eq!(status, StatusCode::NO_CONTENT);
    assert_eq!(list_sessions(State(state)).await.unwrap().0.len(), 1);
}

#[tokio::test]
async fn test_health_check() {
    let health = health_check().await.unwrap().0;
    assert_eq!(health["status"], "healthy");
}
