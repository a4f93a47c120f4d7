use std::collections::HashSet;

use thiserror::Error;

/// Flow value reported when source and sink coincide.
pub const DEGENERATE_FLOW: i64 = -1;

#[derive(Debug, Error, Clone, PartialEq, Eq)]
pub enum NetworkError {
    #[error("node count must be positive (found {0})")]
    EmptyNetwork(i64),
    #[error("{0} nodes do not fit in a dense capacity table")]
    TooLarge(i64),
    #[error("{role} {id} is outside of [0, {size})")]
    TerminalOutOfRange {
        role: &'static str,
        id: i64,
        size: usize,
    },
    #[error("edge #{index} ({tail} -> {head}) has an endpoint outside of [0, {size})")]
    EdgeOutOfRange {
        index: usize,
        tail: i64,
        head: i64,
        size: usize,
    },
    #[error("edge #{index} is a self-loop on node {node}")]
    SelfLoop { index: usize, node: i64 },
    #[error("edge #{index} ({tail} -> {head}) has negative capacity {capacity}")]
    NegativeCapacity {
        index: usize,
        tail: i64,
        head: i64,
        capacity: i64,
    },
    #[error("total capacity overflows at edge #{index} ({tail} -> {head})")]
    CapacityOverflow { index: usize, tail: i64, head: i64 },
}

/// Dense square table indexed by ordered node pairs.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Matrix {
    size: usize,
    data: Box<[i64]>,
}

impl Matrix {
    pub fn new(size: usize, initial: i64) -> Self {
        Matrix {
            size,
            data: vec![initial; size * size].into_boxed_slice(),
        }
    }
    /// Like [`Matrix::new`], but gives up instead of aborting when the table
    /// cannot be indexed or allocated.
    pub fn try_new(size: usize, initial: i64) -> Option<Self> {
        let cells = size.checked_mul(size)?;
        let mut data = Vec::new();
        data.try_reserve_exact(cells).ok()?;
        data.resize(cells, initial);
        Some(Matrix {
            size,
            data: data.into_boxed_slice(),
        })
    }
    pub fn get(&self, u: usize, v: usize) -> i64 {
        self.data[u * self.size + v]
    }
    pub fn add(&mut self, u: usize, v: usize, delta: i64) {
        self.data[u * self.size + v] += delta;
    }
}

/// One edge exactly as it was supplied.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Edge {
    pub tail: usize,
    pub head: usize,
    pub capacity: i64,
}

/// A validated capacitated network. Read-only once built.
#[derive(Debug)]
pub struct Network {
    size: usize,
    source: usize,
    sink: usize,
    /// input edges in input order
    edges: Box<[Edge]>,
    /// capacities summed over parallel edges
    capacity: Matrix,
    /// distinct (tail, head) pairs in order of first appearance
    arcs: Box<[(usize, usize)]>,
    /// forward and reverse neighbours of every node
    adjacency: Box<[Box<[usize]>]>,
}

impl Network {
    pub fn new<I>(size: i64, source: i64, sink: i64, edges: I) -> Result<Self, NetworkError>
    where
        I: IntoIterator<Item = (i64, i64, i64)>,
    {
        if size <= 0 {
            return Err(NetworkError::EmptyNetwork(size));
        }
        let n = usize::try_from(size).map_err(|_| NetworkError::TooLarge(size))?;
        let in_range = |id: i64| id >= 0 && id < size;
        for (role, id) in [("source", source), ("sink", sink)] {
            if !in_range(id) {
                return Err(NetworkError::TerminalOutOfRange { role, id, size: n });
            }
        }

        // bounds every flow, excess, residual and unit cost the solvers produce
        let mut total: i64 = 0;
        let mut checked = Vec::new();
        for (index, (tail, head, capacity)) in edges.into_iter().enumerate() {
            if !in_range(tail) || !in_range(head) {
                return Err(NetworkError::EdgeOutOfRange {
                    index,
                    tail,
                    head,
                    size: n,
                });
            }
            if tail == head {
                return Err(NetworkError::SelfLoop { index, node: tail });
            }
            if capacity < 0 {
                return Err(NetworkError::NegativeCapacity {
                    index,
                    tail,
                    head,
                    capacity,
                });
            }
            total = total
                .checked_add(capacity)
                .ok_or(NetworkError::CapacityOverflow { index, tail, head })?;
            checked.push(Edge {
                tail: tail as usize,
                head: head as usize,
                capacity,
            });
        }

        let mut capacity = Matrix::try_new(n, 0).ok_or(NetworkError::TooLarge(size))?;
        let mut seen = HashSet::new();
        let mut arcs = Vec::new();
        let mut adjacency = vec![Vec::new(); n];
        for edge in checked.iter() {
            capacity.add(edge.tail, edge.head, edge.capacity);
            if !seen.insert((edge.tail, edge.head)) {
                continue;
            }
            arcs.push((edge.tail, edge.head));
            // the reverse pair may already link these two nodes
            if !seen.contains(&(edge.head, edge.tail)) {
                adjacency[edge.tail].push(edge.head);
                adjacency[edge.head].push(edge.tail);
            }
        }

        Ok(Network {
            size: n,
            source: source as usize,
            sink: sink as usize,
            edges: checked.into_boxed_slice(),
            capacity,
            arcs: arcs.into_boxed_slice(),
            adjacency: adjacency.into_iter().map(Vec::into_boxed_slice).collect(),
        })
    }

    pub fn size(&self) -> usize {
        self.size
    }
    pub fn source(&self) -> usize {
        self.source
    }
    pub fn sink(&self) -> usize {
        self.sink
    }
    pub fn edges(&self) -> &[Edge] {
        &self.edges
    }
    /// Aggregated capacity of the ordered pair.
    pub fn capacity(&self, u: usize, v: usize) -> i64 {
        self.capacity.get(u, v)
    }
    /// Aggregated arcs as `(tail, head, capacity)`.
    pub fn arcs(&self) -> impl Iterator<Item = (usize, usize, i64)> + '_ {
        self.arcs
            .iter()
            .map(|&(u, v)| (u, v, self.capacity.get(u, v)))
    }
    pub fn neighbours(&self, u: usize) -> &[usize] {
        &self.adjacency[u]
    }
    /// Source and sink coincide; every solver answers [`DEGENERATE_FLOW`].
    pub fn is_degenerate(&self) -> bool {
        self.source == self.sink
    }
}

/// Outcome of one solver run: net flow per ordered pair, skew-symmetric.
#[derive(Debug, Clone)]
pub struct Solution {
    pub max_flow: i64,
    pub cost: Option<i64>,
    pub flow: Matrix,
}

impl Solution {
    pub fn degenerate(network: &Network) -> Self {
        Solution {
            max_flow: DEGENERATE_FLOW,
            cost: None,
            flow: Matrix::new(network.size(), 0),
        }
    }
    pub fn flow(&self, u: usize, v: usize) -> i64 {
        self.flow.get(u, v)
    }
}

/// Per-run residual view over a network.
pub struct Residual<'a> {
    network: &'a Network,
    flow: Matrix,
}

impl<'a> Residual<'a> {
    pub fn new(network: &'a Network) -> Self {
        Residual {
            network,
            flow: Matrix::new(network.size(), 0),
        }
    }
    pub fn network(&self) -> &'a Network {
        self.network
    }
    pub fn residual(&self, u: usize, v: usize) -> i64 {
        self.network.capacity(u, v) - self.flow.get(u, v)
    }
    pub fn flow(&self, u: usize, v: usize) -> i64 {
        self.flow.get(u, v)
    }
    pub fn push(&mut self, u: usize, v: usize, amount: i64) {
        self.flow.add(u, v, amount);
        self.flow.add(v, u, -amount);
    }
    pub fn finish(self, max_flow: i64) -> Solution {
        Solution {
            max_flow,
            cost: None,
            flow: self.flow,
        }
    }
}
