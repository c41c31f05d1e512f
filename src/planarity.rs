//! Left-right planarity test (Brandes' formulation, testing phase only).
//!
//! Phase 1 orients the graph by DFS and computes `height`, `lowpt`, `lowpt2`
//! and the nesting depth of every oriented edge. Phase 2 walks the DFS tree
//! again with each node's out-edges sorted by nesting depth and keeps a stack
//! of conflict pairs (two intervals of return edges that must go to opposite
//! sides). The graph is planar iff no conflict pair ever needs both of its
//! intervals on the same side.
//!
//! No embedding is built. Recursion depth is the DFS depth, which callers
//! bound through the service's node limit.

use std::collections::{HashMap, HashSet};

use crate::error::{MisError, Result};
use crate::graph::Topology;

/// Oriented edge `(source, target)`.
type Arc = (usize, usize);

#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
struct Interval {
    low: Option<Arc>,
    high: Option<Arc>,
}

impl Interval {
    fn single(arc: Arc) -> Self {
        Self {
            low: Some(arc),
            high: Some(arc),
        }
    }

    fn is_empty(&self) -> bool {
        self.low.is_none() && self.high.is_none()
    }
}

#[derive(Debug, Clone, Copy, Default)]
struct ConflictPair {
    left: Interval,
    right: Interval,
}

impl ConflictPair {
    fn swap(&mut self) {
        std::mem::swap(&mut self.left, &mut self.right);
    }

    fn is_empty(&self) -> bool {
        self.left.is_empty() && self.right.is_empty()
    }
}

/// `true` iff `topology` admits a planar embedding.
///
/// Graphs with more than `3n - 6` edges are rejected up front. An
/// `Err(ValidationFailure)` means the algorithm's own bookkeeping broke, which
/// is a bug rather than a property of the input.
pub fn is_planar(topology: &Topology) -> Result<bool> {
    let n = topology.node_count();
    if n > 2 && topology.edge_count() > 3 * n - 6 {
        return Ok(false);
    }
    LrPlanarity::new(topology).run()
}

struct LrPlanarity<'a> {
    topology: &'a Topology,
    height: Vec<Option<usize>>,
    parent_edge: Vec<Option<Arc>>,
    roots: Vec<usize>,
    oriented: HashSet<Arc>,
    /// Targets of the oriented out-edges of each node.
    out: Vec<Vec<usize>>,
    lowpt: HashMap<Arc, usize>,
    lowpt2: HashMap<Arc, usize>,
    nesting_depth: HashMap<Arc, usize>,
    lowpt_edge: HashMap<Arc, Arc>,
    reference: HashMap<Arc, Arc>,
    /// Conflict stack height when each edge was entered.
    stack_bottom: HashMap<Arc, usize>,
    stack: Vec<ConflictPair>,
}

fn broken(what: &str, arc: Arc) -> MisError {
    MisError::ValidationFailure(format!("planarity test: {what} missing for edge {arc:?}"))
}

impl<'a> LrPlanarity<'a> {
    fn new(topology: &'a Topology) -> Self {
        let n = topology.node_count();
        Self {
            topology,
            height: vec![None; n],
            parent_edge: vec![None; n],
            roots: Vec::new(),
            oriented: HashSet::new(),
            out: vec![Vec::new(); n],
            lowpt: HashMap::new(),
            lowpt2: HashMap::new(),
            nesting_depth: HashMap::new(),
            lowpt_edge: HashMap::new(),
            reference: HashMap::new(),
            stack_bottom: HashMap::new(),
            stack: Vec::new(),
        }
    }

    fn run(mut self) -> Result<bool> {
        for v in 0..self.topology.node_count() {
            if self.height[v].is_none() {
                self.height[v] = Some(0);
                self.roots.push(v);
                self.orient(v)?;
            }
        }

        for v in 0..self.out.len() {
            let mut targets = std::mem::take(&mut self.out[v]);
            let depths = &self.nesting_depth;
            targets.sort_by_key(|&w| depths.get(&(v, w)).copied().unwrap_or(usize::MAX));
            self.out[v] = targets;
        }

        let roots = std::mem::take(&mut self.roots);
        for root in roots {
            if !self.test(root)? {
                return Ok(false);
            }
        }
        Ok(true)
    }

    fn height(&self, v: usize) -> Result<usize> {
        self.height[v].ok_or_else(|| {
            MisError::ValidationFailure(format!("planarity test: height missing for node {v}"))
        })
    }

    fn lowpt(&self, arc: Arc) -> Result<usize> {
        self.lowpt.get(&arc).copied().ok_or_else(|| broken("lowpt", arc))
    }

    fn lowpt2(&self, arc: Arc) -> Result<usize> {
        self.lowpt2.get(&arc).copied().ok_or_else(|| broken("lowpt2", arc))
    }

    /// Sets or clears `reference[key]`; an absent key is a no-op.
    fn set_reference(&mut self, key: Option<Arc>, value: Option<Arc>) {
        if let Some(key) = key {
            match value {
                Some(value) => {
                    self.reference.insert(key, value);
                }
                None => {
                    self.reference.remove(&key);
                }
            }
        }
    }

    fn conflicting(&self, interval: &Interval, arc: Arc) -> Result<bool> {
        match interval.high {
            Some(high) if !interval.is_empty() => Ok(self.lowpt(high)? > self.lowpt(arc)?),
            _ => Ok(false),
        }
    }

    fn lowest(&self, pair: &ConflictPair) -> Result<usize> {
        let low = |interval: &Interval| -> Result<usize> {
            let arc = interval.low.ok_or_else(|| {
                MisError::ValidationFailure("planarity test: interval without low edge".into())
            })?;
            self.lowpt(arc)
        };
        if pair.left.is_empty() {
            return low(&pair.right);
        }
        if pair.right.is_empty() {
            return low(&pair.left);
        }
        Ok(low(&pair.left)?.min(low(&pair.right)?))
    }

    /// =============== phase 1: orientation ===============

    fn orient(&mut self, v: usize) -> Result<()> {
        let e = self.parent_edge[v];
        let hv = self.height(v)?;
        for i in 0..self.topology.degree(v) {
            let w = self.topology.neighbors(v)[i];
            if self.oriented.contains(&(v, w)) || self.oriented.contains(&(w, v)) {
                continue;
            }
            let vw = (v, w);
            self.oriented.insert(vw);
            self.out[v].push(w);
            self.lowpt.insert(vw, hv);
            self.lowpt2.insert(vw, hv);

            match self.height[w] {
                None => {
                    // tree edge
                    self.parent_edge[w] = Some(vw);
                    self.height[w] = Some(hv + 1);
                    self.orient(w)?;
                }
                Some(hw) => {
                    // back edge
                    self.lowpt.insert(vw, hw);
                }
            }

            let low = self.lowpt(vw)?;
            let low2 = self.lowpt2(vw)?;
            let chordal = usize::from(low2 < hv);
            self.nesting_depth.insert(vw, 2 * low + chordal);

            if let Some(e) = e {
                let (elow, elow2) = (self.lowpt(e)?, self.lowpt2(e)?);
                if low < elow {
                    self.lowpt2.insert(e, elow.min(low2));
                    self.lowpt.insert(e, low);
                } else if low > elow {
                    self.lowpt2.insert(e, elow2.min(low));
                } else {
                    self.lowpt2.insert(e, elow2.min(low2));
                }
            }
        }
        Ok(())
    }

    /// =============== phase 2: testing ===============

    fn test(&mut self, v: usize) -> Result<bool> {
        let e = self.parent_edge[v];
        let hv = self.height(v)?;
        for i in 0..self.out[v].len() {
            let w = self.out[v][i];
            let ei = (v, w);
            self.stack_bottom.insert(ei, self.stack.len());

            if self.parent_edge[w] == Some(ei) {
                if !self.test(w)? {
                    return Ok(false);
                }
            } else {
                self.lowpt_edge.insert(ei, ei);
                self.stack.push(ConflictPair {
                    left: Interval::default(),
                    right: Interval::single(ei),
                });
            }

            // integrate new return edges
            if self.lowpt(ei)? < hv {
                let e = e.ok_or_else(|| broken("parent edge", ei))?;
                if i == 0 {
                    let low_edge = *self
                        .lowpt_edge
                        .get(&ei)
                        .ok_or_else(|| broken("lowpt edge", ei))?;
                    self.lowpt_edge.insert(e, low_edge);
                } else if !self.add_constraints(ei, e)? {
                    return Ok(false);
                }
            }
        }

        if let Some(e) = e {
            self.remove_back_edges(e)?;
        }
        Ok(true)
    }

    fn add_constraints(&mut self, ei: Arc, e: Arc) -> Result<bool> {
        let mut p = ConflictPair::default();
        let bottom = *self
            .stack_bottom
            .get(&ei)
            .ok_or_else(|| broken("stack bottom", ei))?;
        let elow = self.lowpt(e)?;

        // merge return edges of ei into p.right
        loop {
            let mut q = self.stack.pop().ok_or_else(|| broken("conflict pair", ei))?;
            if !q.left.is_empty() {
                q.swap();
            }
            if !q.left.is_empty() {
                return Ok(false);
            }
            let qlow = q.right.low.ok_or_else(|| broken("right interval", ei))?;
            if self.lowpt(qlow)? > elow {
                if p.right.is_empty() {
                    p.right = q.right;
                } else {
                    self.set_reference(p.right.low, q.right.high);
                }
                p.right.low = q.right.low;
            } else {
                let low_edge = *self
                    .lowpt_edge
                    .get(&e)
                    .ok_or_else(|| broken("lowpt edge", e))?;
                self.reference.insert(qlow, low_edge);
            }
            if self.stack.len() <= bottom {
                break;
            }
        }

        // merge conflicting return edges of earlier siblings into p.left
        while let Some(top) = self.stack.last().copied() {
            if !(self.conflicting(&top.left, ei)? || self.conflicting(&top.right, ei)?) {
                break;
            }
            let mut q = top;
            self.stack.pop();
            if self.conflicting(&q.right, ei)? {
                q.swap();
            }
            if self.conflicting(&q.right, ei)? {
                return Ok(false);
            }
            self.set_reference(p.right.low, q.right.high);
            if q.right.low.is_some() {
                p.right.low = q.right.low;
            }
            if p.left.is_empty() {
                p.left = q.left;
            } else {
                self.set_reference(p.left.low, q.left.high);
            }
            p.left.low = q.left.low;
        }

        if !p.is_empty() {
            self.stack.push(p);
        }
        Ok(true)
    }

    fn remove_back_edges(&mut self, e: Arc) -> Result<()> {
        let u = e.0;
        let hu = self.height(u)?;

        // drop whole conflict pairs whose lowest return edge ends at u
        while let Some(top) = self.stack.last() {
            if self.lowest(top)? != hu {
                break;
            }
            self.stack.pop();
        }

        if let Some(mut p) = self.stack.pop() {
            // trim left interval
            while let Some(high) = p.left.high.filter(|h| h.1 == u) {
                p.left.high = self.reference.get(&high).copied();
            }
            if p.left.high.is_none() && p.left.low.is_some() {
                self.set_reference(p.left.low, p.right.low);
                p.left.low = None;
            }
            // trim right interval
            while let Some(high) = p.right.high.filter(|h| h.1 == u) {
                p.right.high = self.reference.get(&high).copied();
            }
            if p.right.high.is_none() && p.right.low.is_some() {
                self.set_reference(p.right.low, p.left.low);
                p.right.low = None;
            }
            if !p.is_empty() {
                self.stack.push(p);
            }
        }

        // side of e follows its highest return edge
        if self.lowpt(e)? < hu {
            if let Some(top) = self.stack.last().copied() {
                let (hl, hr) = (top.left.high, top.right.high);
                let pick_left = match (hl, hr) {
                    (Some(_), None) => true,
                    (Some(l), Some(r)) => self.lowpt(l)? > self.lowpt(r)?,
                    _ => false,
                };
                self.set_reference(Some(e), if pick_left { hl } else { hr });
            }
        }
        Ok(())
    }
}
