use std::collections::VecDeque;

use tracing::{debug, trace};

use crate::network::{Network, Residual, Solution};

const UNREACHED: usize = usize::MAX;

/// Breadth-first search for the fewest-hop augmenting path. Returns its
/// nodes from source to sink, or `None` when the sink is cut off.
fn shortest_path(residual: &Residual) -> Option<Vec<usize>> {
    let network = residual.network();
    let (source, sink) = (network.source(), network.sink());
    let mut parent = vec![UNREACHED; network.size()];
    parent[source] = source;
    let mut queue = VecDeque::from([source]);
    while let Some(u) = queue.pop_front() {
        if parent[sink] != UNREACHED {
            break;
        }
        for v in network.neighbours(u).iter().copied() {
            if parent[v] == UNREACHED && residual.residual(u, v) > 0 {
                parent[v] = u;
                queue.push_back(v);
            }
        }
    }
    if parent[sink] == UNREACHED {
        return None;
    }
    let mut path = vec![sink];
    let mut cur = sink;
    while cur != source {
        cur = parent[cur];
        path.push(cur);
    }
    path.reverse();
    Some(path)
}

pub fn solve(network: &Network) -> Solution {
    if network.is_degenerate() {
        return Solution::degenerate(network);
    }
    let mut residual = Residual::new(network);
    let mut max_flow = 0;
    let mut augmentations = 0usize;
    while let Some(path) = shortest_path(&residual) {
        let bottleneck = path
            .windows(2)
            .map(|arc| residual.residual(arc[0], arc[1]))
            .fold(i64::MAX, i64::min);
        for arc in path.windows(2) {
            residual.push(arc[0], arc[1], bottleneck);
        }
        trace!(hops = path.len() - 1, bottleneck, "augmented along shortest path");
        max_flow += bottleneck;
        augmentations += 1;
    }
    debug!(augmentations, max_flow, "no augmenting path left");
    residual.finish(max_flow)
}
