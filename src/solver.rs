//! Exact maximum independent set for outerplanar graphs.
//!
//! Acyclic parts are solved by the include/exclude tree DP. Anything with a
//! cycle branches on a vertex of its first fundamental cycle: either drop the
//! vertex, or take it and drop its neighbours. Sub-problems are masks over one
//! shared [`Topology`]; the branching runs on an explicit task stack.

use std::cmp::max;

use fixedbitset::FixedBitSet;
use tracing::debug;

use crate::budget::Budget;
use crate::cycles::cycle_basis;
use crate::error::{MisError, Result, Stage};
use crate::graph::Topology;

enum Task {
    Solve(FixedBitSet),
    /// Combine the two topmost results: the pivot-free branch below, the
    /// branch that may take `pivot` on top.
    Merge { pivot: usize },
}

pub struct IndependentSetSolver<'a> {
    budget: &'a Budget,
}

impl<'a> IndependentSetSolver<'a> {
    pub fn new(budget: &'a Budget) -> Self {
        Self { budget }
    }

    /// Maximum independent set of `topology`, as node indices.
    ///
    /// The input is expected to be outerplanar. The branching is exact on any
    /// graph but only stays tractable on that class.
    pub fn solve(&self, topology: &Topology) -> Result<Vec<usize>> {
        self.solve_active(topology, topology.all_nodes())
    }

    /// Same as [`solve`](Self::solve), restricted to the nodes in `active`.
    pub fn solve_active(&self, topology: &Topology, active: FixedBitSet) -> Result<Vec<usize>> {
        let mut tasks = vec![Task::Solve(active)];
        let mut results: Vec<Vec<usize>> = Vec::new();
        let mut branches = 0usize;

        while let Some(task) = tasks.pop() {
            self.budget.check(Stage::Solving)?;
            match task {
                Task::Solve(active) => {
                    if active.is_clear() {
                        results.push(Vec::new());
                        continue;
                    }
                    let pivot = cycle_basis(topology, &active)
                        .first()
                        .and_then(|cycle| cycle.first().copied());
                    let Some(pivot) = pivot else {
                        results.push(solve_forest(topology, &active));
                        continue;
                    };
                    branches += 1;

                    let mut without = active;
                    without.set(pivot, false);
                    let mut with = without.clone();
                    for &w in topology.neighbors(pivot) {
                        with.set(w, false);
                    }
                    tasks.push(Task::Merge { pivot });
                    tasks.push(Task::Solve(with));
                    tasks.push(Task::Solve(without));
                }
                Task::Merge { pivot } => {
                    let (Some(mut with), Some(without)) = (results.pop(), results.pop()) else {
                        return Err(MisError::Internal(
                            "solver result stack underflow".to_string(),
                        ));
                    };
                    with.push(pivot);
                    // ties keep the branch without the pivot
                    results.push(if with.len() > without.len() { with } else { without });
                }
            }
        }

        debug!(branches, "branching finished");
        match (results.pop(), results.is_empty()) {
            (Some(set), true) => Ok(set),
            _ => Err(MisError::Internal(
                "solver finished with an unbalanced result stack".to_string(),
            )),
        }
    }
}

/// =============== tree DP ===============

/// Maximum independent set of the forest induced by `active`.
///
/// Each component is rooted at its lowest index. `include[u]` / `exclude[u]`
/// are the best subtree sizes with `u` taken / not taken; the set is then
/// rebuilt from the roots down. Roots and free children are taken only when
/// taking is strictly better.
pub fn solve_forest(topology: &Topology, active: &FixedBitSet) -> Vec<usize> {
    let n = topology.node_count();
    let mut parent: Vec<Option<usize>> = vec![None; n];
    let mut visited = FixedBitSet::with_capacity(n);
    let mut include = vec![0usize; n];
    let mut exclude = vec![0usize; n];
    let mut chosen = Vec::new();

    let children = |u: usize, parent: &[Option<usize>]| -> Vec<usize> {
        topology
            .neighbors(u)
            .iter()
            .copied()
            .filter(|&w| active.contains(w) && parent[w] == Some(u))
            .collect()
    };

    for root in active.ones() {
        if visited.contains(root) {
            continue;
        }
        visited.insert(root);
        let mut order = Vec::new();
        let mut stack = vec![root];
        while let Some(u) = stack.pop() {
            order.push(u);
            for &w in topology.neighbors(u) {
                if active.contains(w) && !visited.contains(w) {
                    visited.insert(w);
                    parent[w] = Some(u);
                    stack.push(w);
                }
            }
        }

        // discovery order reversed puts every child before its parent
        for &u in order.iter().rev() {
            let mut inc = 1;
            let mut exc = 0;
            for c in children(u, &parent) {
                inc += exclude[c];
                exc += max(include[c], exclude[c]);
            }
            include[u] = inc;
            exclude[u] = exc;
        }

        let mut stack = vec![(root, include[root] > exclude[root])];
        while let Some((u, take)) = stack.pop() {
            if take {
                chosen.push(u);
            }
            for c in children(u, &parent) {
                stack.push((c, !take && include[c] > exclude[c]));
            }
        }
    }
    chosen
}
