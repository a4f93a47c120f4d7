//! Generic push/relabel without any selection rule: every pass scans all
//! inner nodes in index order.

use tracing::{debug, trace};

use crate::network::{Network, Residual, Solution};

struct Preflow<'a> {
    residual: Residual<'a>,
    height: Vec<usize>,
    excess: Vec<i64>,
}

impl<'a> Preflow<'a> {
    /// Saturates every arc leaving the source.
    fn new(network: &'a Network) -> Self {
        let n = network.size();
        let source = network.source();
        let mut preflow = Preflow {
            residual: Residual::new(network),
            height: vec![0; n],
            excess: vec![0; n],
        };
        preflow.height[source] = n;
        for v in network.neighbours(source).iter().copied() {
            let cap = preflow.residual.residual(source, v);
            if cap > 0 {
                preflow.residual.push(source, v, cap);
                preflow.excess[v] += cap;
                preflow.excess[source] -= cap;
            }
        }
        preflow
    }

    fn push(&mut self, u: usize, v: usize) -> bool {
        let send = self.excess[u].min(self.residual.residual(u, v));
        if send > 0 && self.height[u] == self.height[v] + 1 {
            self.residual.push(u, v, send);
            self.excess[u] -= send;
            self.excess[v] += send;
            return true;
        }
        false
    }

    fn relabel(&mut self, u: usize) -> bool {
        let lowest = self
            .residual
            .network()
            .neighbours(u)
            .iter()
            .copied()
            .filter(|&v| self.residual.residual(u, v) > 0)
            .map(|v| self.height[v])
            .min();
        match lowest {
            Some(h) if h + 1 != self.height[u] => {
                self.height[u] = h + 1;
                true
            }
            _ => false,
        }
    }

    /// One full pass over the inner nodes; reports whether anything changed.
    fn discharge_all(&mut self) -> bool {
        let network = self.residual.network();
        let mut progress = false;
        for u in 0..network.size() {
            if u == network.source() || u == network.sink() || self.excess[u] <= 0 {
                continue;
            }
            for v in network.neighbours(u).iter().copied() {
                if self.push(u, v) {
                    progress = true;
                }
            }
            if self.excess[u] > 0 && self.relabel(u) {
                progress = true;
            }
        }
        progress
    }
}

pub fn solve(network: &Network) -> Solution {
    if network.is_degenerate() {
        return Solution::degenerate(network);
    }
    let mut preflow = Preflow::new(network);
    let mut passes = 0usize;
    while preflow.discharge_all() {
        passes += 1;
        trace!(passes, "push/relabel pass");
    }
    let source = network.source();
    let max_flow = (0..network.size())
        .map(|v| preflow.residual.flow(source, v))
        .sum();
    debug!(passes, max_flow, "preflow became a flow");
    preflow.residual.finish(max_flow)
}
