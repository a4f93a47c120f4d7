//! Shared fixtures and flow checks for the solver tests.

use rand::Rng;

use crate::network::{Network, Solution};

/// Four nodes, source 0, sink 3, maximum flow 5.
pub fn example_network() -> Network {
    Network::new(
        4,
        0,
        3,
        [(0, 1, 3), (0, 2, 2), (1, 2, 1), (1, 3, 2), (2, 3, 3)],
    )
    .unwrap()
}

/// Random network on `n` nodes with source 0 and sink `n - 1`. Parallel and
/// anti-parallel edges are allowed, self-loops are not.
pub fn random_network<R: Rng>(rng: &mut R, n: usize, m: usize, max_cap: i64) -> Network {
    assert!(n >= 2);
    let edges: Vec<_> = (0..m)
        .map(|_| {
            let tail = rng.random_range(0..n);
            let head = (tail + rng.random_range(1..n)) % n;
            (tail as i64, head as i64, rng.random_range(0..=max_cap))
        })
        .collect();
    Network::new(n as i64, 0, n as i64 - 1, edges).unwrap()
}

/// Smallest source/sink cut, by enumerating every node subset.
pub fn min_cut_capacity(network: &Network) -> i64 {
    let n = network.size();
    let (source, sink) = (network.source(), network.sink());
    assert!(n <= 16);
    (0u32..1 << n)
        .filter(|mask| mask & (1 << source) != 0 && mask & (1 << sink) == 0)
        .map(|mask| {
            network
                .arcs()
                .filter(|&(u, v, _)| mask & (1 << u) != 0 && mask & (1 << v) == 0)
                .map(|(_, _, cap)| cap)
                .sum::<i64>()
        })
        .min()
        .unwrap_or(0)
}

/// Asserts skew symmetry, capacity bounds and conservation, and returns the
/// unit cost of the flow.
pub fn check_flow(network: &Network, solution: &Solution) -> i64 {
    let n = network.size();
    for u in 0..n {
        for v in 0..n {
            let flow = solution.flow(u, v);
            assert_eq!(flow, -solution.flow(v, u), "skew symmetry on ({u}, {v})");
            assert!(
                flow <= network.capacity(u, v),
                "flow {flow} exceeds capacity on ({u}, {v})"
            );
        }
        let net: i64 = (0..n).map(|v| solution.flow(u, v)).sum();
        let expected = if u == network.source() {
            solution.max_flow
        } else if u == network.sink() {
            -solution.max_flow
        } else {
            0
        };
        assert_eq!(net, expected, "conservation at node {u}");
    }
    network
        .arcs()
        .map(|(u, v, _)| solution.flow(u, v).max(0))
        .sum()
}
