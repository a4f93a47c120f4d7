//! Dual search trees grown from the source and the sink.
//!
//! Every node is free or belongs to exactly one of the two trees, recorded
//! as a label plus a parent pointer toward the tree root. A tree arc always
//! has positive residual capacity in the tree direction: parent to child in
//! the source tree, child to parent in the sink tree. The trees survive
//! across augmentations; only the parts cut off by saturated arcs are
//! repaired through orphan adoption.

use std::collections::VecDeque;

use tracing::{debug, trace};

use crate::network::{Network, Residual, Solution};

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum Tree {
    Free,
    Source,
    Sink,
}

struct Forest<'a> {
    network: &'a Network,
    residual: Residual<'a>,
    tree: Vec<Tree>,
    parent: Vec<Option<usize>>,
    active: VecDeque<usize>,
    queued: Vec<bool>,
    orphans: VecDeque<usize>,
}

impl<'a> Forest<'a> {
    fn new(network: &'a Network) -> Self {
        let n = network.size();
        let mut forest = Forest {
            network,
            residual: Residual::new(network),
            tree: vec![Tree::Free; n],
            parent: vec![None; n],
            active: VecDeque::new(),
            queued: vec![false; n],
            orphans: VecDeque::new(),
        };
        forest.tree[network.source()] = Tree::Source;
        forest.tree[network.sink()] = Tree::Sink;
        forest.activate(network.source());
        forest.activate(network.sink());
        forest
    }

    fn root(&self, side: Tree) -> Option<usize> {
        match side {
            Tree::Source => Some(self.network.source()),
            Tree::Sink => Some(self.network.sink()),
            Tree::Free => None,
        }
    }

    /// Residual capacity of the arc between `from` (closer to the root)
    /// and `to`, read in the direction flow travels on `side`.
    fn tree_residual(&self, side: Tree, from: usize, to: usize) -> i64 {
        match side {
            Tree::Source => self.residual.residual(from, to),
            Tree::Sink => self.residual.residual(to, from),
            Tree::Free => 0,
        }
    }

    fn activate(&mut self, v: usize) {
        if !self.queued[v] {
            self.queued[v] = true;
            self.active.push_back(v);
        }
    }

    /// Grows both trees until they touch. The returned arc points from the
    /// source tree into the sink tree. The scanning node stays at the front
    /// of the queue so its remaining arcs are looked at after the repair.
    fn grow(&mut self) -> Option<(usize, usize)> {
        let network = self.network;
        while let Some(&u) = self.active.front() {
            let side = self.tree[u];
            if side != Tree::Free {
                for v in network.neighbours(u).iter().copied() {
                    if self.tree_residual(side, u, v) <= 0 {
                        continue;
                    }
                    match self.tree[v] {
                        Tree::Free => {
                            self.tree[v] = side;
                            self.parent[v] = Some(u);
                            self.activate(v);
                        }
                        other if other == side => {}
                        _ if side == Tree::Source => return Some((u, v)),
                        _ => return Some((v, u)),
                    }
                }
            }
            self.active.pop_front();
            self.queued[u] = false;
        }
        None
    }

    /// Pushes the bottleneck along source ~> u -> v ~> sink and orphans the
    /// child end of every tree arc that runs dry.
    fn augment(&mut self, u: usize, v: usize) -> i64 {
        let mut bottleneck = self.residual.residual(u, v);
        let mut cur = u;
        while let Some(p) = self.parent[cur] {
            bottleneck = bottleneck.min(self.residual.residual(p, cur));
            cur = p;
        }
        let mut cur = v;
        while let Some(p) = self.parent[cur] {
            bottleneck = bottleneck.min(self.residual.residual(cur, p));
            cur = p;
        }

        self.residual.push(u, v, bottleneck);
        let mut cur = u;
        while let Some(p) = self.parent[cur] {
            self.residual.push(p, cur, bottleneck);
            if self.residual.residual(p, cur) == 0 {
                self.parent[cur] = None;
                self.orphans.push_back(cur);
            }
            cur = p;
        }
        let mut cur = v;
        while let Some(p) = self.parent[cur] {
            self.residual.push(cur, p, bottleneck);
            if self.residual.residual(cur, p) == 0 {
                self.parent[cur] = None;
                self.orphans.push_back(cur);
            }
            cur = p;
        }
        bottleneck
    }

    /// Whether the parent chain of `v` reaches `root` without meeting `avoid`.
    fn reaches_root(&self, mut v: usize, avoid: usize, root: usize) -> bool {
        loop {
            if v == avoid {
                return false;
            }
            if v == root {
                return true;
            }
            match self.parent[v] {
                Some(p) => v = p,
                None => return false,
            }
        }
    }

    fn adopt(&mut self) {
        let network = self.network;
        while let Some(u) = self.orphans.pop_front() {
            let side = self.tree[u];
            let Some(root) = self.root(side) else {
                continue;
            };
            let new_parent = network.neighbours(u).iter().copied().find(|&v| {
                self.tree[v] == side
                    && self.tree_residual(side, v, u) > 0
                    && self.reaches_root(v, u, root)
            });
            if let Some(v) = new_parent {
                self.parent[u] = Some(v);
                continue;
            }

            trace!(node = u, ?side, "orphan freed");
            self.tree[u] = Tree::Free;
            self.parent[u] = None;
            for w in network.neighbours(u).iter().copied() {
                if self.tree[w] != side {
                    continue;
                }
                if self.parent[w] == Some(u) {
                    self.parent[w] = None;
                    self.orphans.push_back(w);
                }
                // w may be able to claim u again once it is adopted
                if self.tree_residual(side, w, u) > 0 {
                    self.activate(w);
                }
            }
        }
    }
}

pub fn solve(network: &Network) -> Solution {
    if network.is_degenerate() {
        return Solution::degenerate(network);
    }
    let mut forest = Forest::new(network);
    let mut max_flow = 0;
    let mut augmentations = 0usize;
    while let Some((u, v)) = forest.grow() {
        let bottleneck = forest.augment(u, v);
        trace!(u, v, bottleneck, "trees met");
        max_flow += bottleneck;
        augmentations += 1;
        forest.adopt();
    }
    debug!(augmentations, max_flow, "active queue exhausted");
    forest.residual.finish(max_flow)
}
