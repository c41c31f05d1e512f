#![allow(dead_code)]

use outerplanar_mis::Topology;
use proptest::prelude::*;

/// Largest independent set size by trying every subset. `n <= 20`.
pub fn brute_force_mis(t: &Topology) -> usize {
    let n = t.node_count();
    assert!(n <= 20, "brute force is for small graphs only");
    let adj: Vec<u32> = (0..n)
        .map(|u| t.neighbors(u).iter().fold(0u32, |m, &v| m | (1 << v)))
        .collect();
    (0u32..(1 << n))
        .filter(|&mask| (0..n).all(|u| mask & (1 << u) == 0 || adj[u] & mask == 0))
        .map(|mask| mask.count_ones() as usize)
        .max()
        .unwrap_or(0)
}

/// Forest on `n` nodes: node `i > 0` hangs off an earlier node unless its
/// choice is a multiple of 4, in which case it starts a new tree.
pub fn forest(choices: &[u32]) -> Topology {
    let n = choices.len();
    let edges = (1..n).filter_map(|i| {
        let c = choices[i] as usize;
        (c % 4 != 0).then_some((c % i, i))
    });
    Topology::from_edges(n, edges.collect::<Vec<_>>())
}

/// Maximal outerplanar graph grown from a triangle: each new node is glued to
/// both ends of a chosen outer edge.
pub fn maximal_outerplanar(n: usize, picks: &[u32]) -> Vec<(usize, usize)> {
    if n < 3 {
        return (1..n).map(|i| (i - 1, i)).collect();
    }
    let mut edges = vec![(0, 1), (1, 2), (0, 2)];
    let mut outer = vec![(0, 1), (1, 2), (2, 0)];
    for c in 3..n {
        let k = picks.get(c).copied().unwrap_or(0) as usize % outer.len();
        let (a, b) = outer[k];
        edges.push((a, c));
        edges.push((c, b));
        outer[k] = (a, c);
        outer.insert(k + 1, (c, b));
    }
    edges
}

/// Random outerplanar graph: a maximal one with some edges dropped.
pub fn outerplanar(n: usize, picks: &[u32], keep: &[bool]) -> Topology {
    let edges: Vec<_> = maximal_outerplanar(n, picks)
        .into_iter()
        .enumerate()
        .filter(|(i, _)| keep.get(*i).copied().unwrap_or(true))
        .map(|(_, e)| e)
        .collect();
    Topology::from_edges(n, edges)
}

pub fn outerplanar_strategy(max_n: usize) -> impl Strategy<Value = Topology> {
    (0..=max_n).prop_flat_map(|n| {
        (
            Just(n),
            proptest::collection::vec(any::<u32>(), n),
            proptest::collection::vec(any::<bool>(), 2 * n),
        )
            .prop_map(|(n, picks, keep)| outerplanar(n, &picks, &keep))
    })
}

pub fn forest_strategy(max_n: usize) -> impl Strategy<Value = Topology> {
    proptest::collection::vec(any::<u32>(), 0..=max_n).prop_map(|choices| forest(&choices))
}
