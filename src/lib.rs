//! Maximum independent sets of outerplanar graphs.
//!
//! A request is turned into a [`Graph`], checked for outerplanarity by an
//! [`OuterplanarityTest`], and solved exactly by [`IndependentSetSolver`].
//! [`MisService`] runs that pipeline under a size limit and a time budget.
//!
//! ```
//! use outerplanar_mis::maximum_independent_set;
//!
//! let mis = maximum_independent_set(vec![1, 2, 3], vec![(1, 2), (2, 3)]).unwrap();
//! assert_eq!(mis.len(), 2);
//! ```

pub mod budget;
pub mod config;
pub mod cycles;
pub mod error;
pub mod graph;
pub mod planarity;
pub mod service;
pub mod solver;
pub mod validator;

pub use budget::Budget;
pub use config::{DanglingEdgePolicy, ServiceConfig, ValidatorKind};
pub use error::{ErrorKind, MisError, Result, Stage};
pub use graph::{Graph, GraphRequest, NodeId, Topology};
pub use service::{ErrorResponse, MisResponse, MisService, maximum_independent_set};
pub use solver::IndependentSetSolver;
pub use validator::{ApexPlanarityTest, ForbiddenSubgraphTest, OuterplanarityTest};
