//! Service configuration, loaded from JSON with defaults for every field.

use std::path::Path;
use std::time::Duration;

use serde::{Deserialize, Serialize};

use crate::error::Result;

/// Which outerplanarity test the service runs.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum ValidatorKind {
    /// Planarity plus exhaustive K4 / K2,3 subset search.
    #[default]
    ForbiddenSubgraph,
    /// Planarity of the graph with an extra vertex joined to every node.
    ApexPlanarity,
}

/// What to do with edges whose endpoints are not in the node list.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum DanglingEdgePolicy {
    /// Reject the request with `InvalidGraph`.
    #[default]
    Reject,
    /// Append the missing endpoints to the node list.
    Register,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct ServiceConfig {
    /// Requests with more nodes are refused before validation.
    pub max_nodes: usize,
    /// Per-request wall-clock budget; `None` disables it.
    pub time_limit_ms: Option<u64>,
    pub validator: ValidatorKind,
    pub dangling_edges: DanglingEdgePolicy,
}

impl Default for ServiceConfig {
    fn default() -> Self {
        Self {
            max_nodes: 64,
            time_limit_ms: Some(10_000),
            validator: ValidatorKind::default(),
            dangling_edges: DanglingEdgePolicy::default(),
        }
    }
}

impl ServiceConfig {
    /// Read a config file. Missing fields fall back to their defaults.
    pub fn from_json_file(path: impl AsRef<Path>) -> Result<Self> {
        let s = std::fs::read_to_string(path)?;
        Ok(serde_json::from_str(&s)?)
    }

    pub fn time_limit(&self) -> Option<Duration> {
        self.time_limit_ms.map(Duration::from_millis)
    }
}
