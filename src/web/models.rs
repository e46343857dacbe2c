use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use uuid::Uuid;

use crate::algorithm::ShortestPath;
use crate::bundling::{BundledEdge, BundlingOptions, RejectedEdge, SolverKind};
use crate::graph::GraphJson;

/// Parameters for graph generation
#[derive(Debug, Deserialize)]
pub struct GraphGenerationRequest {
    /// `geometric` or `grid`
    pub graph_type: String,
    pub node_count: usize,
    #[serde(default = "default_radius")]
    pub radius: f64,
    #[serde(default)]
    pub seed: u64,
    /// Grid width and height; a square grid of about `node_count` nodes when unset
    #[serde(default)]
    pub grid_dimensions: Option<(usize, usize)>,
    #[serde(default = "default_spacing")]
    pub spacing: f64,
    #[serde(default)]
    pub diagonals: bool,
}

fn default_radius() -> f64 {
    150.0
}

fn default_spacing() -> f64 {
    50.0
}

/// Parameters for spanner construction
#[derive(Debug, Deserialize)]
pub struct SpannerRequest {
    #[serde(default = "default_stretch_factor")]
    pub stretch_factor: f64,
}

fn default_stretch_factor() -> f64 {
    2.0
}

#[derive(Debug, Clone, Serialize)]
pub struct SpannerResponse {
    pub execution_id: Uuid,
    pub stretch_factor: f64,
    pub execution_time_ms: f64,
    pub total_edges: usize,
    pub kept_edges: usize,
    pub spanner: GraphJson,
}

/// Parameters for a bundling run
#[derive(Debug, Default, Deserialize)]
pub struct BundleRequest {
    #[serde(flatten)]
    pub options: BundlingOptions,
    /// Route through the spanner stored by the last `/api/spanner` call instead of
    /// building a new one
    #[serde(default)]
    pub reuse_spanner: bool,
}

#[derive(Debug, Clone, Serialize)]
pub struct BundleResponse {
    pub execution_id: Uuid,
    pub solver: SolverKind,
    pub execution_time_ms: f64,
    pub spanner: GraphJson,
    pub bundled_edges: Vec<BundledEdge>,
    pub rejected_edges: Vec<RejectedEdge>,
}

/// A batch of shortest-path queries
#[derive(Debug, Deserialize)]
pub struct ShortestPathsRequest {
    pub pairs: Vec<(usize, usize)>,
    #[serde(default)]
    pub solver: SolverKind,
    #[serde(default = "default_edge_weight_factor")]
    pub edge_weight_factor: f64,
    /// Query the stored spanner rather than the full graph
    #[serde(default)]
    pub use_spanner: bool,
}

fn default_edge_weight_factor() -> f64 {
    1.0
}

#[derive(Debug, Clone, Serialize)]
pub struct ShortestPathsResponse {
    pub execution_id: Uuid,
    pub solver: SolverKind,
    pub execution_time_ms: f64,
    /// Aligned with the request's `pairs`; `null` where no path exists
    pub paths: Vec<Option<ShortestPath>>,
}

/// Error response for API
#[derive(Debug, Serialize)]
pub struct ErrorResponse {
    pub error: String,
    pub message: String,
    pub details: Option<serde_json::Value>,
}

/// Session holding an uploaded graph and the last spanner built for it
#[derive(Debug, Clone, Serialize)]
pub struct Session {
    pub id: Uuid,
    pub graph: GraphJson,
    pub spanner: Option<GraphJson>,
    pub spanner_stretch_factor: Option<f64>,
    pub created_at: DateTime<Utc>,
}

impl Session {
    pub fn new(graph: GraphJson) -> Self {
        Self {
            id: Uuid::new_v4(),
            graph,
            spanner: None,
            spanner_stretch_factor: None,
            created_at: Utc::now(),
        }
    }
}

/// Compact session listing entry
#[derive(Debug, Clone, Serialize)]
pub struct SessionSummary {
    pub id: Uuid,
    pub node_count: usize,
    pub edge_count: usize,
    pub has_spanner: bool,
    pub created_at: DateTime<Utc>,
}

impl From<&Session> for SessionSummary {
    fn from(session: &Session) -> Self {
        SessionSummary {
            id: session.id,
            node_count: session.graph.nodes.len(),
            edge_count: session.graph.edges.len(),
            has_spanner: session.spanner.is_some(),
            created_at: session.created_at,
        }
    }
}
