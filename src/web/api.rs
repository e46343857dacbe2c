use axum::{
    extract::{Path, State},
    http::StatusCode,
    response::Json,
    routing::{get, post},
    Router,
};
use log::{debug, info, warn};
use std::collections::HashMap;
use std::sync::{Arc, Mutex, MutexGuard};
use std::time::Instant;
use uuid::Uuid;

use crate::algorithm::spanner::GreedySpanner;
use crate::bundling::{route_pairs, BundlingOptions, EdgePathBundling};
use crate::graph::generators::{generate_geometric_2d, generate_grid};
use crate::graph::{Graph, GraphJson, WeightedGraph};
use crate::web::models::*;
use crate::Error;

type ApiError = (StatusCode, Json<ErrorResponse>);

/// Shared application state
#[derive(Clone)]
pub struct AppState {
    pub sessions: Arc<Mutex<HashMap<Uuid, Session>>>,
    /// Once reached, storing a new session evicts the oldest one
    pub max_sessions: usize,
    /// Largest graph `/api/graphs/generate` will build
    pub max_generated_nodes: usize,
}

impl AppState {
    pub fn new() -> Self {
        Self::with_max_sessions(1000)
    }

    pub fn with_max_sessions(max_sessions: usize) -> Self {
        Self {
            sessions: Arc::new(Mutex::new(HashMap::new())),
            max_sessions: max_sessions.max(1),
            max_generated_nodes: 100_000,
        }
    }

    pub fn with_max_generated_nodes(mut self, max_generated_nodes: usize) -> Self {
        self.max_generated_nodes = max_generated_nodes;
        self
    }

    /// Rejects a generation request before any memory is reserved for it
    fn check_generated_size(&self, nodes: Option<usize>) -> Result<(), ApiError> {
        match nodes {
            Some(nodes) if nodes <= self.max_generated_nodes => Ok(()),
            _ => Err(library_error(Error::InvalidParameter(format!(
                "generated graphs are limited to {} nodes",
                self.max_generated_nodes
            )))),
        }
    }

    fn lock(&self) -> Result<MutexGuard<'_, HashMap<Uuid, Session>>, ApiError> {
        self.sessions.lock().map_err(|_| {
            error_response(
                StatusCode::INTERNAL_SERVER_ERROR,
                "session_store_poisoned",
                "Session store is unavailable".to_string(),
            )
        })
    }

    fn insert(&self, session: Session) -> Result<(), ApiError> {
        let mut sessions = self.lock()?;
        while sessions.len() >= self.max_sessions {
            let oldest = sessions
                .values()
                .min_by_key(|session| session.created_at)
                .map(|session| session.id);
            match oldest {
                Some(id) => {
                    debug!("Evicting session {}", id);
                    sessions.remove(&id);
                }
                None => break,
            }
        }
        sessions.insert(session.id, session);
        Ok(())
    }

    fn session(&self, session_id: Uuid) -> Result<Session, ApiError> {
        self.lock()?
            .get(&session_id)
            .cloned()
            .ok_or_else(session_not_found)
    }
}

impl Default for AppState {
    fn default() -> Self {
        Self::new()
    }
}

/// Create the API router
pub fn create_router() -> Router<AppState> {
    Router::new()
        .route("/api/graphs", post(upload_graph))
        .route("/api/graphs/generate", post(generate_graph))
        .route("/api/graphs/:session_id", get(get_graph))
        .route("/api/spanner/:session_id", post(build_spanner))
        .route("/api/bundle/:session_id", post(bundle_graph))
        .route("/api/shortest-paths/:session_id", post(shortest_paths))
        .route("/api/sessions", get(list_sessions))
        .route(
            "/api/sessions/:session_id",
            get(get_session).delete(delete_session),
        )
        .route("/api/health", get(health_check))
}

/// Store an uploaded graph in a new session
pub async fn upload_graph(
    State(state): State<AppState>,
    Json(request): Json<GraphJson>,
) -> Result<Json<Session>, ApiError> {
    let graph = Graph::from_serialized(&request).map_err(library_error)?;
    let session = Session::new(graph.to_serialized());
    info!(
        "Created session {} with {} nodes and {} edges",
        session.id,
        graph.node_count(),
        graph.edge_count()
    );

    state.insert(session.clone())?;
    Ok(Json(session))
}

/// Generate a new graph
pub async fn generate_graph(
    State(state): State<AppState>,
    Json(request): Json<GraphGenerationRequest>,
) -> Result<Json<Session>, ApiError> {
    let graph = match request.graph_type.as_str() {
        "geometric" => {
            let (n, radius, seed) = (request.node_count, request.radius, request.seed);
            state.check_generated_size(Some(n))?;
            run_blocking(move || generate_geometric_2d(n, radius, seed)).await?
        }
        "grid" => {
            let (width, height) = request.grid_dimensions.unwrap_or_else(|| {
                let side = (request.node_count as f64).sqrt().ceil() as usize;
                (side, side)
            });
            state.check_generated_size(width.checked_mul(height))?;
            let (spacing, diagonals) = (request.spacing, request.diagonals);
            run_blocking(move || generate_grid(width, height, spacing, diagonals)).await?
        }
        _ => {
            return Err(error_response(
                StatusCode::BAD_REQUEST,
                "invalid_graph_type",
                format!("Unknown graph type: {}", request.graph_type),
            ));
        }
    };

    let session = Session::new(graph.to_serialized());
    state.insert(session.clone())?;
    Ok(Json(session))
}

/// Get graph data for a session
pub async fn get_graph(
    State(state): State<AppState>,
    Path(session_id): Path<Uuid>,
) -> Result<Json<GraphJson>, ApiError> {
    Ok(Json(state.session(session_id)?.graph))
}

/// Build a greedy spanner and store it on the session
pub async fn build_spanner(
    State(state): State<AppState>,
    Path(session_id): Path<Uuid>,
    Json(request): Json<SpannerRequest>,
) -> Result<Json<SpannerResponse>, ApiError> {
    let session = state.session(session_id)?;
    let stretch_factor = request.stretch_factor;

    let start_time = Instant::now();
    let (total_edges, spanner) = run_blocking(move || {
        let graph = Graph::from_serialized(&session.graph)?;
        let spanner = GreedySpanner::new(stretch_factor).build(&graph)?;
        Ok((graph.edge_count(), spanner))
    })
    .await?;
    let execution_time = start_time.elapsed();

    let response = SpannerResponse {
        execution_id: Uuid::new_v4(),
        stretch_factor,
        execution_time_ms: execution_time.as_secs_f64() * 1000.0,
        total_edges,
        kept_edges: spanner.edge_count(),
        spanner: spanner.to_serialized(),
    };

    {
        let mut sessions = state.lock()?;
        if let Some(session) = sessions.get_mut(&session_id) {
            session.spanner = Some(response.spanner.clone());
            session.spanner_stretch_factor = Some(stretch_factor);
        }
    }

    Ok(Json(response))
}

/// Bundle the session's graph
pub async fn bundle_graph(
    State(state): State<AppState>,
    Path(session_id): Path<Uuid>,
    Json(request): Json<BundleRequest>,
) -> Result<Json<BundleResponse>, ApiError> {
    let session = state.session(session_id)?;
    let stored_spanner = if request.reuse_spanner {
        match session.spanner {
            Some(spanner) => Some(spanner),
            None => {
                return Err(error_response(
                    StatusCode::CONFLICT,
                    "spanner_not_built",
                    "No spanner has been built for this session".to_string(),
                ));
            }
        }
    } else {
        None
    };

    let graph_json = session.graph;
    let options = request.options;

    let start_time = Instant::now();
    let result = run_blocking(move || {
        let graph = Graph::from_serialized(&graph_json)?;
        let bundling = EdgePathBundling::new(options);
        match stored_spanner {
            Some(spanner) => {
                let spanner = Graph::from_serialized(&spanner)?;
                bundling.bundle_with_spanner(&graph, spanner)
            }
            None => bundling.bundle(&graph),
        }
    })
    .await?;
    let execution_time = start_time.elapsed();

    Ok(Json(BundleResponse {
        execution_id: Uuid::new_v4(),
        solver: result.solver,
        execution_time_ms: execution_time.as_secs_f64() * 1000.0,
        spanner: result.spanner.to_serialized(),
        bundled_edges: result.bundled_edges,
        rejected_edges: result.rejected_edges,
    }))
}

/// Answer a batch of shortest-path queries on the graph or its stored spanner
pub async fn shortest_paths(
    State(state): State<AppState>,
    Path(session_id): Path<Uuid>,
    Json(request): Json<ShortestPathsRequest>,
) -> Result<Json<ShortestPathsResponse>, ApiError> {
    let session = state.session(session_id)?;
    let graph_json = if request.use_spanner {
        session.spanner.ok_or_else(|| {
            error_response(
                StatusCode::CONFLICT,
                "spanner_not_built",
                "No spanner has been built for this session".to_string(),
            )
        })?
    } else {
        session.graph
    };

    let factor = request.edge_weight_factor;
    if !factor.is_finite() || factor < 0.0 {
        return Err(library_error(Error::InvalidParameter(format!(
            "edge weight factor must be a finite number >= 0, got {}",
            factor
        ))));
    }

    let solver = BundlingOptions::default()
        .with_solver(request.solver)
        .resolve_solver(request.pairs.len(), graph_json.nodes.len());
    let pairs = request.pairs;

    let start_time = Instant::now();
    let paths = run_blocking(move || {
        let graph = Graph::from_serialized(&graph_json)?;
        let routing = graph.to_adjacency_list_with(|weight| weight.abs().powf(factor));
        route_pairs(&routing, &pairs, solver, None)
    })
    .await?;
    let execution_time = start_time.elapsed();

    Ok(Json(ShortestPathsResponse {
        execution_id: Uuid::new_v4(),
        solver,
        execution_time_ms: execution_time.as_secs_f64() * 1000.0,
        paths,
    }))
}

/// List all active sessions, oldest first
pub async fn list_sessions(
    State(state): State<AppState>,
) -> Result<Json<Vec<SessionSummary>>, ApiError> {
    let sessions = state.lock()?;
    let mut summaries: Vec<SessionSummary> = sessions.values().map(SessionSummary::from).collect();
    summaries.sort_by_key(|summary| summary.created_at);
    Ok(Json(summaries))
}

/// Get session information
pub async fn get_session(
    State(state): State<AppState>,
    Path(session_id): Path<Uuid>,
) -> Result<Json<Session>, ApiError> {
    Ok(Json(state.session(session_id)?))
}

pub async fn delete_session(
    State(state): State<AppState>,
    Path(session_id): Path<Uuid>,
) -> Result<StatusCode, ApiError> {
    match state.lock()?.remove(&session_id) {
        Some(_) => Ok(StatusCode::NO_CONTENT),
        None => Err(session_not_found()),
    }
}

/// Health check endpoint
pub async fn health_check() -> Result<Json<serde_json::Value>, ApiError> {
    Ok(Json(serde_json::json!({
        "status": "healthy",
        "timestamp": chrono::Utc::now().to_rfc3339(),
        "version": env!("CARGO_PKG_VERSION")
    })))
}

// Helper functions

fn error_response(status: StatusCode, error: &str, message: String) -> ApiError {
    (
        status,
        Json(ErrorResponse {
            error: error.to_string(),
            message,
            details: None,
        }),
    )
}

fn session_not_found() -> ApiError {
    error_response(
        StatusCode::NOT_FOUND,
        "session_not_found",
        "Session not found".to_string(),
    )
}

fn library_error(err: Error) -> ApiError {
    let (status, error, details) = match &err {
        Error::InvalidReference(node) => (
            StatusCode::BAD_REQUEST,
            "invalid_reference",
            Some(serde_json::json!({ "node": node })),
        ),
        Error::InvalidCoordinate { .. } => (StatusCode::BAD_REQUEST, "invalid_coordinate", None),
        Error::InvalidParameter(_) => (StatusCode::BAD_REQUEST, "invalid_parameter", None),
        Error::SpannerMismatch { .. } => (StatusCode::BAD_REQUEST, "spanner_mismatch", None),
        Error::Serialization(_) => (StatusCode::BAD_REQUEST, "invalid_json", None),
        Error::Unreachable { start, end } => (
            StatusCode::UNPROCESSABLE_ENTITY,
            "unreachable",
            Some(serde_json::json!({ "start": start, "end": end })),
        ),
        Error::DistortionExceeded {
            start,
            end,
            length,
            limit,
        } => (
            StatusCode::UNPROCESSABLE_ENTITY,
            "distortion_exceeded",
            Some(serde_json::json!({
                "start": start,
                "end": end,
                "length": length,
                "limit": limit
            })),
        ),
        Error::Cancelled => (StatusCode::SERVICE_UNAVAILABLE, "cancelled", None),
    };

    if status.is_server_error() {
        warn!("Request failed: {}", err);
    }

    (
        status,
        Json(ErrorResponse {
            error: error.to_string(),
            message: err.to_string(),
            details,
        }),
    )
}

/// Runs CPU-bound library work off the async executor
async fn run_blocking<T, F>(work: F) -> Result<T, ApiError>
where
    F: FnOnce() -> crate::Result<T> + Send + 'static,
    T: Send + 'static,
{
    tokio::task::spawn_blocking(work)
        .await
        .map_err(|err| {
            error_response(
                StatusCode::INTERNAL_SERVER_ERROR,
                "task_failed",
                format!("Computation task failed: {}", err),
            )
        })?
        .map_err(library_error)
}
