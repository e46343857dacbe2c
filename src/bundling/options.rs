use serde::{Deserialize, Serialize};

use crate::{Error, Result};

/// Which solver routes the edges that are not in the spanner
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "kebab-case")]
pub enum SolverKind {
    /// One sequential query per edge
    Sequential,
    /// All queries at once, in parallel, over the compact adjacency snapshot
    Batched,
    /// Floyd–Warshall matrices once, then next-hop reconstruction per edge
    AllPairs,
    /// Pick from the number of edges to route and the node count
    #[default]
    Auto,
}

/// What to do with an edge whose detour is missing or too long
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "kebab-case")]
pub enum DistortionPolicy {
    /// Record the edge as rejected and keep bundling the rest
    #[default]
    BestEffort,
    /// Abort the whole run with an error
    Strict,
}

/// Configuration for [`EdgePathBundling`](super::EdgePathBundling)
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct BundlingOptions {
    /// Stretch factor `t` of the greedy spanner
    pub stretch_factor: f64,

    /// Longest accepted detour as a multiple of the edge length; the stretch factor
    /// when unset
    pub max_distortion: Option<f64>,

    /// Routing weights are `|weight|^edge_weight_factor`
    pub edge_weight_factor: f64,

    pub solver: SolverKind,

    pub policy: DistortionPolicy,

    /// Below this many edges to route, `Auto` stays sequential
    pub batch_threshold: usize,

    /// Above this many nodes, `Auto` never builds all-pairs matrices
    pub all_pairs_node_limit: usize,
}

impl Default for BundlingOptions {
    fn default() -> Self {
        BundlingOptions {
            stretch_factor: 2.0,
            max_distortion: None,
            edge_weight_factor: 1.0,
            solver: SolverKind::Auto,
            policy: DistortionPolicy::BestEffort,
            batch_threshold: 64,
            all_pairs_node_limit: 2048,
        }
    }
}

impl BundlingOptions {
    pub fn new() -> Self {
        BundlingOptions::default()
    }

    pub fn with_stretch_factor(mut self, stretch_factor: f64) -> Self {
        self.stretch_factor = stretch_factor;
        self
    }

    pub fn with_max_distortion(mut self, max_distortion: f64) -> Self {
        self.max_distortion = Some(max_distortion);
        self
    }

    pub fn with_edge_weight_factor(mut self, factor: f64) -> Self {
        self.edge_weight_factor = factor;
        self
    }

    pub fn with_solver(mut self, solver: SolverKind) -> Self {
        self.solver = solver;
        self
    }

    pub fn with_policy(mut self, policy: DistortionPolicy) -> Self {
        self.policy = policy;
        self
    }

    pub fn with_batch_threshold(mut self, threshold: usize) -> Self {
        self.batch_threshold = threshold;
        self
    }

    pub fn with_all_pairs_node_limit(mut self, limit: usize) -> Self {
        self.all_pairs_node_limit = limit;
        self
    }

    /// The distortion bound actually applied
    pub fn effective_max_distortion(&self) -> f64 {
        self.max_distortion.unwrap_or(self.stretch_factor)
    }

    /// Full validation for a run that builds its own spanner: on top of
    /// [`validate_routing`](Self::validate_routing), the distortion bound may not be
    /// tighter than the stretch factor the spanner guarantees.
    pub fn validate(&self) -> Result<()> {
        self.validate_routing()?;

        let max_distortion = self.effective_max_distortion();
        if max_distortion < self.stretch_factor {
            return Err(Error::InvalidParameter(format!(
                "max distortion {} is below the stretch factor {}",
                max_distortion, self.stretch_factor
            )));
        }

        Ok(())
    }

    /// Validation for routing through a supplied spanner, which carries no stretch
    /// guarantee the distortion bound must respect
    pub fn validate_routing(&self) -> Result<()> {
        if !self.stretch_factor.is_finite() || self.stretch_factor < 1.0 {
            return Err(Error::InvalidParameter(format!(
                "stretch factor must be a finite number >= 1, got {}",
                self.stretch_factor
            )));
        }

        let max_distortion = self.effective_max_distortion();
        if !max_distortion.is_finite() || max_distortion < 1.0 {
            return Err(Error::InvalidParameter(format!(
                "max distortion must be a finite number >= 1, got {}",
                max_distortion
            )));
        }

        if !self.edge_weight_factor.is_finite() || self.edge_weight_factor < 0.0 {
            return Err(Error::InvalidParameter(format!(
                "edge weight factor must be a finite number >= 0, got {}",
                self.edge_weight_factor
            )));
        }

        Ok(())
    }

    /// Resolves `Auto` for a run routing `pairs` edges over `nodes` nodes.
    ///
    /// All-pairs costs O(V³) once, a batched query O(V²) each, so the matrices pay
    /// off once there are at least as many edges to route as nodes.
    pub fn resolve_solver(&self, pairs: usize, nodes: usize) -> SolverKind {
        match self.solver {
            SolverKind::Auto if pairs < self.batch_threshold => SolverKind::Sequential,
            SolverKind::Auto if nodes <= self.all_pairs_node_limit && pairs >= nodes => {
                SolverKind::AllPairs
            }
            SolverKind::Auto => SolverKind::Batched,
            chosen => chosen,
        }
    }
}
