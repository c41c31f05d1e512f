//! Outerplanarity tests.
//!
//! Both implementations sit behind [`OuterplanarityTest`] so the service can
//! swap one for the other without the solver noticing.

use itertools::Itertools;
use petgraph::algo::is_isomorphic;
use petgraph::graph::{NodeIndex, UnGraph};
use tracing::debug;

use crate::budget::Budget;
use crate::config::ValidatorKind;
use crate::error::{Result, Stage};
use crate::graph::Topology;
use crate::planarity::is_planar;

pub trait OuterplanarityTest: Send + Sync {
    fn name(&self) -> &'static str;

    /// `Ok(false)` is an ordinary answer; `Err` means the test itself failed
    /// or ran out of budget.
    fn is_outerplanar(&self, topology: &Topology, budget: &Budget) -> Result<bool>;
}

pub fn for_kind(kind: ValidatorKind) -> Box<dyn OuterplanarityTest> {
    match kind {
        ValidatorKind::ForbiddenSubgraph => Box::new(ForbiddenSubgraphTest::new()),
        ValidatorKind::ApexPlanarity => Box::new(ApexPlanarityTest),
    }
}

/// =============== forbidden subgraphs ===============

/// Planarity, then exhaustive search for an induced K4 on every 4-subset and
/// an induced K2,3 on every 5-subset.
///
/// This is O(n^5) in the worst case and meant for small graphs. It only sees
/// the patterns as subgraphs, not as minors: a subdivided K2,3 passes.
pub struct ForbiddenSubgraphTest {
    k4: UnGraph<(), ()>,
    k23: UnGraph<(), ()>,
}

impl Default for ForbiddenSubgraphTest {
    fn default() -> Self {
        Self::new()
    }
}

impl ForbiddenSubgraphTest {
    pub fn new() -> Self {
        Self {
            k4: complete_graph(4),
            k23: complete_bipartite_graph(2, 3),
        }
    }

    /// First 4-subset whose induced subgraph is K4.
    pub fn find_k4(&self, topology: &Topology, budget: &Budget) -> Result<Option<Vec<usize>>> {
        // every K4 node has three neighbours inside the pattern
        let candidates: Vec<usize> = (0..topology.node_count())
            .filter(|&v| topology.degree(v) >= 3)
            .collect();
        let mut ticks = 0;
        for subset in candidates.into_iter().combinations(4) {
            budget.tick(&mut ticks, Stage::Validation)?;
            if topology.induced_edge_count(&subset) != 6 {
                continue;
            }
            if is_isomorphic(&topology.induced_subgraph(&subset), &self.k4) {
                return Ok(Some(subset));
            }
        }
        Ok(None)
    }

    /// First 5-subset whose induced subgraph is K2,3.
    pub fn find_k23(&self, topology: &Topology, budget: &Budget) -> Result<Option<Vec<usize>>> {
        let candidates: Vec<usize> = (0..topology.node_count())
            .filter(|&v| topology.degree(v) >= 2)
            .collect();
        let mut ticks = 0;
        for subset in candidates.into_iter().combinations(5) {
            budget.tick(&mut ticks, Stage::Validation)?;
            if topology.induced_edge_count(&subset) != 6 || !has_k23_degrees(topology, &subset) {
                continue;
            }
            if is_isomorphic(&topology.induced_subgraph(&subset), &self.k23) {
                return Ok(Some(subset));
            }
        }
        Ok(None)
    }
}

impl OuterplanarityTest for ForbiddenSubgraphTest {
    fn name(&self) -> &'static str {
        "forbidden-subgraph"
    }

    fn is_outerplanar(&self, topology: &Topology, budget: &Budget) -> Result<bool> {
        budget.check(Stage::Validation)?;
        if !is_planar(topology)? {
            debug!("graph is not planar");
            return Ok(false);
        }
        if let Some(subset) = self.find_k4(topology, budget)? {
            debug!(?subset, "found K4");
            return Ok(false);
        }
        if let Some(subset) = self.find_k23(topology, budget)? {
            debug!(?subset, "found K2,3");
            return Ok(false);
        }
        Ok(true)
    }
}

/// Induced degree sequence {3, 3, 2, 2, 2}.
fn has_k23_degrees(topology: &Topology, subset: &[usize]) -> bool {
    let degrees: Vec<usize> = subset
        .iter()
        .map(|&u| subset.iter().filter(|&&v| topology.has_edge(u, v)).count())
        .sorted()
        .collect();
    degrees == [2, 2, 2, 3, 3]
}

/// =============== apex ===============

/// A graph is outerplanar iff adding one vertex adjacent to all nodes keeps it
/// planar. Linear-time apart from building the apex copy.
pub struct ApexPlanarityTest;

impl OuterplanarityTest for ApexPlanarityTest {
    fn name(&self) -> &'static str {
        "apex-planarity"
    }

    fn is_outerplanar(&self, topology: &Topology, budget: &Budget) -> Result<bool> {
        budget.check(Stage::Validation)?;
        is_planar(&topology.with_apex())
    }
}

fn complete_graph(n: usize) -> UnGraph<(), ()> {
    let mut g = UnGraph::<(), ()>::with_capacity(n, n * n.saturating_sub(1) / 2);
    for _ in 0..n {
        g.add_node(());
    }
    for (u, v) in (0..n).tuple_combinations() {
        g.add_edge(NodeIndex::new(u), NodeIndex::new(v), ());
    }
    g
}

fn complete_bipartite_graph(a: usize, b: usize) -> UnGraph<(), ()> {
    let mut g = UnGraph::<(), ()>::with_capacity(a + b, a * b);
    for _ in 0..a + b {
        g.add_node(());
    }
    for (u, v) in (0..a).cartesian_product(a..a + b) {
        g.add_edge(NodeIndex::new(u), NodeIndex::new(v), ());
    }
    g
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::error::MisError;
    use std::time::Duration;

    fn topo(n: usize, edges: &[(usize, usize)]) -> Topology {
        Topology::from_edges(n, edges.iter().copied())
    }

    fn both(t: &Topology) -> (bool, bool) {
        let b = Budget::unlimited();
        (
            ForbiddenSubgraphTest::new().is_outerplanar(t, &b).unwrap(),
            ApexPlanarityTest.is_outerplanar(t, &b).unwrap(),
        )
    }

    #[test]
    fn patterns_have_expected_shape() {
        assert_eq!(complete_graph(4).edge_count(), 6);
        let k23 = complete_bipartite_graph(2, 3);
        assert_eq!(k23.node_count(), 5);
        assert_eq!(k23.edge_count(), 6);
    }

    #[test]
    fn paths_cycles_and_fans_are_outerplanar() {
        assert_eq!(both(&topo(0, &[])), (true, true));
        assert_eq!(both(&topo(3, &[(0, 1), (1, 2)])), (true, true));
        let hexagon: Vec<_> = (0..6).map(|i| (i, (i + 1) % 6)).collect();
        assert_eq!(both(&topo(6, &hexagon)), (true, true));
        // fan triangulation of the hexagon
        let mut fan = hexagon.clone();
        fan.extend([(0, 2), (0, 3), (0, 4)]);
        assert_eq!(both(&topo(6, &fan)), (true, true));
    }

    #[test]
    fn k4_is_rejected() {
        let k4: Vec<_> = (0..4).tuple_combinations().collect();
        assert_eq!(both(&topo(4, &k4)), (false, false));
        let found = ForbiddenSubgraphTest::new()
            .find_k4(&topo(4, &k4), &Budget::unlimited())
            .unwrap();
        assert_eq!(found, Some(vec![0, 1, 2, 3]));
    }

    #[test]
    fn k23_is_rejected() {
        let k23: Vec<_> = (0..2).cartesian_product(2..5).collect();
        assert_eq!(both(&topo(5, &k23)), (false, false));
    }

    #[test]
    fn k23_inside_larger_graph_is_found() {
        let mut edges: Vec<_> = (0..2).cartesian_product(2..5).collect();
        edges.extend([(4, 5), (5, 6), (6, 7)]);
        let t = topo(8, &edges);
        let found = ForbiddenSubgraphTest::new()
            .find_k23(&t, &Budget::unlimited())
            .unwrap();
        assert_eq!(found, Some(vec![0, 1, 2, 3, 4]));
    }

    #[test]
    fn k33_fails_at_planarity() {
        let k33: Vec<_> = (0..3).cartesian_product(3..6).collect();
        assert_eq!(both(&topo(6, &k33)), (false, false));
    }

    #[test]
    fn subdivided_k23_only_caught_by_apex_test() {
        // two hubs joined by three paths of length two, with one path stretched
        let edges = [(0, 2), (2, 1), (0, 3), (3, 1), (0, 4), (4, 5), (5, 1)];
        assert_eq!(both(&topo(6, &edges)), (true, false));
    }

    #[test]
    fn zero_budget_times_out() {
        let t = topo(3, &[(0, 1)]);
        let err = ForbiddenSubgraphTest::new()
            .is_outerplanar(&t, &Budget::new(Some(Duration::ZERO)))
            .unwrap_err();
        assert!(matches!(err, MisError::Timeout { stage: Stage::Validation, .. }));
    }

    #[test]
    fn kind_selects_implementation() {
        assert_eq!(for_kind(ValidatorKind::ApexPlanarity).name(), "apex-planarity");
        assert_eq!(
            for_kind(ValidatorKind::ForbiddenSubgraph).name(),
            "forbidden-subgraph"
        );
    }
}
