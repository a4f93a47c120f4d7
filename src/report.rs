use serde::Serialize;

use crate::network::{Network, Solution};

/// Flow attributed to one input edge.
#[derive(Serialize, Debug, Clone, Copy, PartialEq, Eq)]
pub struct EdgeFlow {
    pub u: usize,
    pub v: usize,
    /// capacity of this particular input edge
    pub cap: i64,
    /// net flow of the whole (u, v) pair, shared by parallel edges
    pub flow: i64,
}

#[derive(Serialize, Debug, Clone, PartialEq, Eq)]
#[serde(rename_all = "camelCase")]
pub struct FlowResult {
    pub algorithm: &'static str,
    pub max_flow: i64,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub cost: Option<i64>,
    pub edge_flows: Box<[EdgeFlow]>,
}

impl FlowResult {
    pub fn new(algorithm: &'static str, network: &Network, solution: &Solution) -> Self {
        let edge_flows = network
            .edges()
            .iter()
            .map(|edge| EdgeFlow {
                u: edge.tail,
                v: edge.head,
                cap: edge.capacity,
                flow: solution.flow(edge.tail, edge.head),
            })
            .collect();
        FlowResult {
            algorithm,
            max_flow: solution.max_flow,
            cost: solution.cost,
            edge_flows,
        }
    }

    pub fn to_json(&self) -> Result<String, simd_json::Error> {
        simd_json::to_string(self)
    }
}
