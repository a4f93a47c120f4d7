use std::collections::VecDeque;

use tracing::{debug, trace};

use crate::network::{Matrix, Network, Solution};

struct Arc {
    points: (usize, usize),
    cap: i64,
    flow: i64,
}

pub struct DinicGraph {
    /// current flow
    flow: i64,
    /// map from node to arcs
    adjacency: Vec<Vec<usize>>,
    /// arc storage, every arc is followed by its reverse
    arcs: Vec<Arc>,
    /// level graph
    level: Vec<usize>,
    /// resume cursor into each adjacency list
    pointer: Vec<usize>,
    /// source node
    source: usize,
    /// sink node
    sink: usize,
}

impl DinicGraph {
    pub fn new(n: usize, source: usize, sink: usize) -> Self {
        DinicGraph {
            flow: 0,
            adjacency: vec![vec![]; n],
            arcs: vec![],
            level: vec![usize::MAX; n],
            pointer: vec![0; n],
            source,
            sink,
        }
    }

    fn reset(&mut self) {
        self.level.fill(usize::MAX);
        self.pointer.fill(0);
    }

    pub fn add_arc(&mut self, from: usize, to: usize, cap: i64) {
        let m = self.arcs.len();
        self.arcs.push(Arc {
            points: (from, to),
            cap,
            flow: 0,
        });
        self.arcs.push(Arc {
            points: (to, from),
            cap: 0,
            flow: 0,
        });
        self.adjacency[from].push(m);
        self.adjacency[to].push(m + 1);
    }

    fn bfs(&mut self) -> bool {
        let mut queue = VecDeque::new();
        queue.push_back(self.source);
        self.level[self.source] = 0;
        while let Some(v) = queue.pop_front() {
            for id in self.adjacency[v].iter().copied() {
                if self.arcs[id].cap - self.arcs[id].flow < 1 {
                    continue;
                }
                if self.level[self.arcs[id].points.1] != usize::MAX {
                    continue;
                }
                self.level[self.arcs[id].points.1] = self.level[v] + 1;
                queue.push_back(self.arcs[id].points.1);
            }
        }
        self.level[self.sink] != usize::MAX
    }

    fn dfs(&mut self, v: usize, budget: i64) -> i64 {
        stacker::maybe_grow(32 * 1024, 1024 * 1024, || {
            if budget == 0 {
                return 0;
            }
            if v == self.sink {
                return budget;
            }
            while self.pointer[v] < self.adjacency[v].len() {
                let id = self.adjacency[v][self.pointer[v]];
                let u = self.arcs[id].points.1;
                let space = self.arcs[id].cap - self.arcs[id].flow;
                if self.level[v] + 1 == self.level[u] && space > 0 {
                    let update = self.dfs(u, budget.min(space));
                    if update > 0 {
                        self.arcs[id].flow += update;
                        self.arcs[id ^ 1].flow -= update;
                        return update;
                    }
                }
                // saturated, off-level or leads to a dead end for this phase
                self.pointer[v] += 1;
            }
            0
        })
    }

    pub fn calculate_flow(&mut self) -> i64 {
        let mut phase = 0;
        while self.bfs() {
            phase += 1;
            trace!(phase, sink_level = self.level[self.sink], "level graph built");
            loop {
                let update = self.dfs(self.source, i64::MAX);
                if update < 1 {
                    break;
                }
                self.flow += update;
            }
            self.reset();
        }
        debug!(phases = phase, flow = self.flow, "blocking flow exhausted");
        self.flow
    }

    /// Net flow per ordered node pair.
    pub fn current_flow(&self) -> Matrix {
        let mut flow = Matrix::new(self.level.len(), 0);
        for arc in self.arcs.iter().step_by(2) {
            let (u, v) = arc.points;
            flow.add(u, v, arc.flow);
            flow.add(v, u, -arc.flow);
        }
        flow
    }
}

impl From<&Network> for DinicGraph {
    fn from(network: &Network) -> Self {
        let mut graph = DinicGraph::new(network.size(), network.source(), network.sink());
        for (u, v, cap) in network.arcs() {
            graph.add_arc(u, v, cap);
        }
        graph
    }
}

pub fn solve(network: &Network) -> Solution {
    if network.is_degenerate() {
        return Solution::degenerate(network);
    }
    let mut graph = DinicGraph::from(network);
    let max_flow = graph.calculate_flow();
    Solution {
        max_flow,
        cost: None,
        flow: graph.current_flow(),
    }
}
