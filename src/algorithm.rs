use std::{fmt, str::FromStr};

use thiserror::Error;
use tracing::info;

use crate::{
    boykov_kolmogorov, dinic, edmonds_karp, goldberg_tarjan, mcmf,
    network::{Network, Solution},
    report::FlowResult,
};

#[derive(Debug, Error, Clone, PartialEq, Eq)]
#[error("Unknown algorithm: {0}")]
pub struct UnknownAlgorithm(pub String);

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Algorithm {
    Dinic,
    EdmondsKarp,
    GoldbergTarjan,
    MinCostMaxFlow,
    BoykovKolmogorov,
}

impl Algorithm {
    pub const ALL: [Algorithm; 5] = [
        Algorithm::Dinic,
        Algorithm::EdmondsKarp,
        Algorithm::GoldbergTarjan,
        Algorithm::MinCostMaxFlow,
        Algorithm::BoykovKolmogorov,
    ];

    /// Name accepted on the command line.
    pub fn name(self) -> &'static str {
        match self {
            Algorithm::Dinic => "dinic",
            Algorithm::EdmondsKarp => "edmonds_karp",
            Algorithm::GoldbergTarjan => "goldberg_tarjan",
            Algorithm::MinCostMaxFlow => "mcmf",
            Algorithm::BoykovKolmogorov => "bk",
        }
    }

    /// Name written into the result record.
    pub fn display_name(self) -> &'static str {
        match self {
            Algorithm::Dinic => "Dinic Algorithm",
            Algorithm::EdmondsKarp => "Edmonds-Karp Algorithm",
            Algorithm::GoldbergTarjan => "Goldberg-Tarjan Algorithm",
            Algorithm::MinCostMaxFlow => "Min-Cost Max-Flow (MCMF) Algorithm",
            Algorithm::BoykovKolmogorov => "Boykov-Kolmogorov Algorithm",
        }
    }

    pub fn run(self, network: &Network) -> Solution {
        match self {
            Algorithm::Dinic => dinic::solve(network),
            Algorithm::EdmondsKarp => edmonds_karp::solve(network),
            Algorithm::GoldbergTarjan => goldberg_tarjan::solve(network),
            Algorithm::MinCostMaxFlow => mcmf::solve(network),
            Algorithm::BoykovKolmogorov => boykov_kolmogorov::solve(network),
        }
    }

    pub fn solve(self, network: &Network) -> FlowResult {
        let solution = self.run(network);
        info!(
            algorithm = self.name(),
            max_flow = solution.max_flow,
            cost = ?solution.cost,
            "flow computed"
        );
        FlowResult::new(self.display_name(), network, &solution)
    }
}

impl FromStr for Algorithm {
    type Err = UnknownAlgorithm;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Algorithm::ALL
            .into_iter()
            .find(|algorithm| algorithm.name() == s)
            .ok_or_else(|| UnknownAlgorithm(s.to_owned()))
    }
}

impl fmt::Display for Algorithm {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.name())
    }
}
