//! Fundamental cycle basis of the active part of a topology.

use std::collections::HashSet;

use fixedbitset::FixedBitSet;

use crate::graph::Topology;

/// Fundamental cycles of the sub-graph induced by `active`.
///
/// Spanning-forest search (Paton): every non-tree edge closes exactly one
/// cycle, found by walking predecessors until reaching a node that has
/// already seen the edge's far end. Roots are taken in ascending index
/// order; each cycle starts with the node that closes it. An acyclic
/// sub-graph yields no cycles.
pub fn cycle_basis(topology: &Topology, active: &FixedBitSet) -> Vec<Vec<usize>> {
    let n = topology.node_count();
    let mut pred: Vec<Option<usize>> = vec![None; n];
    let mut used: Vec<Option<HashSet<usize>>> = vec![None; n];
    let mut cycles = Vec::new();

    for root in active.ones() {
        if used[root].is_some() {
            continue;
        }
        pred[root] = Some(root);
        used[root] = Some(HashSet::new());
        let mut stack = vec![root];

        while let Some(z) = stack.pop() {
            for &nbr in topology.neighbors(z) {
                if !active.contains(nbr) {
                    continue;
                }
                if used[nbr].is_none() {
                    pred[nbr] = Some(z);
                    used[nbr] = Some(HashSet::from([z]));
                    stack.push(nbr);
                    continue;
                }
                if used[z].as_ref().is_some_and(|s| s.contains(&nbr)) {
                    continue;
                }
                let mut cycle = vec![nbr, z];
                let mut p = pred[z];
                while let Some(q) = p {
                    cycle.push(q);
                    let closes = used[nbr].as_ref().is_some_and(|pn| pn.contains(&q));
                    // the root is its own predecessor
                    if closes || pred[q] == Some(q) {
                        break;
                    }
                    p = pred[q];
                }
                cycles.push(cycle);
                if let Some(set) = used[nbr].as_mut() {
                    set.insert(z);
                }
            }
        }
    }
    cycles
}

/// `true` iff the active sub-graph has no cycle.
pub fn is_forest(topology: &Topology, active: &FixedBitSet) -> bool {
    cycle_basis(topology, active).is_empty()
}
