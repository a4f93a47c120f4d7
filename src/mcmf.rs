//! Minimum-cost maximum flow by successive shortest paths.
//!
//! Every aggregated arc costs one unit per unit of flow; its residual twin
//! costs minus one, so shortest paths are found with Bellman-Ford.

use tracing::{debug, trace};

use crate::network::{Matrix, Network, Solution};

/// Cost per unit of flow on every input arc.
pub const UNIT_COST: i64 = 1;

struct Arc {
    points: (usize, usize),
    cap: i64,
    flow: i64,
    cost: i64,
}

impl Arc {
    fn space(&self) -> i64 {
        self.cap - self.flow
    }
}

pub struct CostGraph {
    adjacency: Vec<Vec<usize>>,
    /// arc storage, every arc is followed by its reverse
    arcs: Vec<Arc>,
    source: usize,
    sink: usize,
}

impl CostGraph {
    pub fn new(n: usize, source: usize, sink: usize) -> Self {
        CostGraph {
            adjacency: vec![vec![]; n],
            arcs: vec![],
            source,
            sink,
        }
    }

    pub fn add_arc(&mut self, from: usize, to: usize, cap: i64, cost: i64) {
        let m = self.arcs.len();
        self.arcs.push(Arc {
            points: (from, to),
            cap,
            flow: 0,
            cost,
        });
        self.arcs.push(Arc {
            points: (to, from),
            cap: 0,
            flow: 0,
            cost: -cost,
        });
        self.adjacency[from].push(m);
        self.adjacency[to].push(m + 1);
    }

    /// Bellman-Ford over arcs with spare capacity. Returns the cost of the
    /// cheapest path to the sink and the arc used to enter every node.
    fn cheapest_path(&self) -> Option<(i64, Vec<usize>)> {
        let n = self.adjacency.len();
        let mut dist: Vec<Option<i64>> = vec![None; n];
        let mut via = vec![usize::MAX; n];
        dist[self.source] = Some(0);
        for _ in 1..n {
            let mut relaxed = false;
            for u in 0..n {
                let Some(du) = dist[u] else {
                    continue;
                };
                for id in self.adjacency[u].iter().copied() {
                    let arc = &self.arcs[id];
                    if arc.space() <= 0 {
                        continue;
                    }
                    let candidate = du + arc.cost;
                    let v = arc.points.1;
                    if dist[v].is_none_or(|dv| candidate < dv) {
                        dist[v] = Some(candidate);
                        via[v] = id;
                        relaxed = true;
                    }
                }
            }
            if !relaxed {
                break;
            }
        }
        dist[self.sink].map(|d| (d, via))
    }

    /// Returns the flow value and its total cost.
    pub fn calculate_flow(&mut self) -> (i64, i64) {
        let (mut flow, mut cost) = (0, 0);
        while let Some((distance, via)) = self.cheapest_path() {
            let mut bottleneck = i64::MAX;
            let mut v = self.sink;
            while v != self.source {
                let arc = &self.arcs[via[v]];
                bottleneck = bottleneck.min(arc.space());
                v = arc.points.0;
            }
            let mut v = self.sink;
            while v != self.source {
                let id = via[v];
                self.arcs[id].flow += bottleneck;
                self.arcs[id ^ 1].flow -= bottleneck;
                v = self.arcs[id].points.0;
            }
            trace!(bottleneck, distance, "augmented along cheapest path");
            flow += bottleneck;
            cost += bottleneck * distance;
        }
        debug!(flow, cost, "sink unreachable");
        (flow, cost)
    }

    /// Net flow per ordered node pair.
    pub fn current_flow(&self) -> Matrix {
        let mut flow = Matrix::new(self.adjacency.len(), 0);
        for arc in self.arcs.iter().step_by(2) {
            let (u, v) = arc.points;
            flow.add(u, v, arc.flow);
            flow.add(v, u, -arc.flow);
        }
        flow
    }
}

impl From<&Network> for CostGraph {
    fn from(network: &Network) -> Self {
        let mut graph = CostGraph::new(network.size(), network.source(), network.sink());
        for (u, v, cap) in network.arcs() {
            graph.add_arc(u, v, cap, UNIT_COST);
        }
        graph
    }
}

pub fn solve(network: &Network) -> Solution {
    if network.is_degenerate() {
        return Solution {
            cost: Some(0),
            ..Solution::degenerate(network)
        };
    }
    let mut graph = CostGraph::from(network);
    let (max_flow, cost) = graph.calculate_flow();
    Solution {
        max_flow,
        cost: Some(cost),
        flow: graph.current_flow(),
    }
}

#[cfg(test)]
mod test {
    use super::*;

    #[test]
    fn diamond_cost_counts_hops() {
        // a two-hop path and a three-hop path, both of capacity 2
        let network = Network::new(
            5,
            0,
            4,
            [(0, 1, 2), (1, 4, 2), (0, 2, 2), (2, 3, 2), (3, 4, 2)],
        )
        .unwrap();
        let solution = solve(&network);
        assert_eq!(solution.max_flow, 4);
        assert_eq!(solution.cost, Some(2 * 2 + 2 * 3));
    }

    #[test]
    fn cheaper_route_is_used_first() {
        // only one unit can leave the source; the two-hop route must win
        let network = Network::new(
            5,
            0,
            4,
            [(0, 1, 1), (1, 2, 1), (2, 3, 1), (3, 4, 1), (1, 4, 1)],
        )
        .unwrap();
        let solution = solve(&network);
        assert_eq!(solution.max_flow, 1);
        assert_eq!(solution.cost, Some(2));
        assert_eq!(solution.flow(1, 4), 1);
        assert_eq!(solution.flow(1, 2), 0);
    }

    #[test]
    fn negative_reverse_arcs_reroute_flow() {
        // the cheapest first path uses 1->4; the second path has to cancel
        // it through the reverse arc of cost -1
        let mut graph = CostGraph::new(6, 0, 5);
        graph.add_arc(0, 1, 1, 1);
        graph.add_arc(0, 3, 1, 1);
        graph.add_arc(1, 4, 1, 1);
        graph.add_arc(1, 2, 1, 5);
        graph.add_arc(3, 4, 1, 1);
        graph.add_arc(2, 5, 1, 1);
        graph.add_arc(4, 5, 1, 1);
        assert_eq!(graph.calculate_flow(), (2, 3 + 7));
        let flow = graph.current_flow();
        assert_eq!(flow.get(1, 4), 0);
        assert_eq!(flow.get(1, 2), 1);
        assert_eq!(flow.get(3, 4), 1);
    }

    #[test]
    fn degenerate_reports_zero_cost() {
        let network = Network::new(2, 0, 0, [(0, 1, 1)]).unwrap();
        let solution = solve(&network);
        assert_eq!(solution.max_flow, crate::network::DEGENERATE_FLOW);
        assert_eq!(solution.cost, Some(0));
    }
}
