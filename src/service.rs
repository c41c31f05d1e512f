//! Request pipeline: build graph, check size, validate, solve, verify.

use std::fmt::Debug;
use std::hash::Hash;
use std::sync::Arc;
use std::sync::atomic::AtomicBool;

use serde::{Deserialize, Serialize};
use tracing::{debug, error, info, warn};

use crate::budget::Budget;
use crate::config::ServiceConfig;
use crate::error::{ErrorKind, MisError, Result};
use crate::graph::{Graph, GraphRequest};
use crate::solver::IndependentSetSolver;
use crate::validator::{self, OuterplanarityTest};

/// Successful reply.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct MisResponse<N> {
    pub mis: Vec<N>,
}

/// Rejection reply. `error` never carries internal detail.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ErrorResponse {
    pub error: String,
    pub kind: ErrorKind,
}

impl From<&MisError> for ErrorResponse {
    fn from(err: &MisError) -> Self {
        Self {
            error: err.public_message(),
            kind: err.kind(),
        }
    }
}

/// Stateless MIS service. Build it once and share it; every call works on
/// its own graph.
pub struct MisService {
    config: ServiceConfig,
    validator: Box<dyn OuterplanarityTest>,
}

impl Default for MisService {
    fn default() -> Self {
        Self::new(ServiceConfig::default())
    }
}

impl MisService {
    pub fn new(config: ServiceConfig) -> Self {
        let validator = validator::for_kind(config.validator);
        Self { config, validator }
    }

    pub fn config(&self) -> &ServiceConfig {
        &self.config
    }

    pub fn compute<N>(&self, request: &GraphRequest<N>) -> Result<MisResponse<N>>
    where
        N: Clone + Eq + Hash + Debug,
    {
        self.compute_with_cancel(request, None)
    }

    /// Like [`compute`](Self::compute); raising `cancel` from another thread
    /// stops the request at its next budget check.
    pub fn compute_with_cancel<N>(
        &self,
        request: &GraphRequest<N>,
        cancel: Option<Arc<AtomicBool>>,
    ) -> Result<MisResponse<N>>
    where
        N: Clone + Eq + Hash + Debug,
    {
        let graph = Graph::from_request(request, self.config.dangling_edges).inspect_err(|e| {
            warn!(error = %e, "rejected malformed graph");
        })?;
        let mut budget = Budget::new(self.config.time_limit());
        if let Some(flag) = cancel {
            budget = budget.with_cancel_flag(flag);
        }
        let mis = self.run(&graph, &budget)?;
        Ok(MisResponse { mis })
    }

    /// Runs validation and solving on an already built graph.
    pub fn compute_graph<N>(&self, graph: &Graph<N>) -> Result<Vec<N>>
    where
        N: Clone + Eq + Hash + Debug,
    {
        self.run(graph, &Budget::new(self.config.time_limit()))
    }

    fn run<N>(&self, graph: &Graph<N>, budget: &Budget) -> Result<Vec<N>>
    where
        N: Clone + Eq + Hash + Debug,
    {
        let topology = graph.topology();
        if topology.node_count() > self.config.max_nodes {
            warn!(
                nodes = topology.node_count(),
                limit = self.config.max_nodes,
                "graph too large"
            );
            return Err(MisError::TooLarge {
                nodes: topology.node_count(),
                limit: self.config.max_nodes,
            });
        }
        debug!(
            nodes = topology.node_count(),
            edges = topology.edge_count(),
            validator = self.validator.name(),
            "validating"
        );

        match self.validator.is_outerplanar(topology, budget) {
            Ok(true) => {}
            Ok(false) => {
                info!("graph rejected: not outerplanar");
                return Err(MisError::NotOuterplanar);
            }
            Err(e) => {
                if matches!(e, MisError::ValidationFailure(_)) {
                    error!(error = %e, "outerplanarity check failed");
                }
                return Err(e);
            }
        }

        let set = IndependentSetSolver::new(budget).solve(topology)?;
        if !topology.is_independent(&set) {
            error!(?set, "solver returned a dependent set");
            return Err(MisError::Internal(
                "solver returned a set that is not independent".to_string(),
            ));
        }
        info!(size = set.len(), "maximum independent set computed");
        Ok(graph.labels_of(&set))
    }
}

/// One-shot helper with the default configuration.
pub fn maximum_independent_set<N>(
    nodes: impl IntoIterator<Item = N>,
    edges: impl IntoIterator<Item = (N, N)>,
) -> Result<Vec<N>>
where
    N: Clone + Eq + Hash + Debug,
{
    let service = MisService::default();
    let graph = Graph::new(nodes, edges, service.config().dangling_edges)?;
    service.compute_graph(&graph)
}
