use std::{
    fs::File,
    io::{Read, Write},
    path::PathBuf,
};

use anyhow::Context;
use clap::Parser;
use tracing::{debug, info, level_filters::LevelFilter};
use tracing_subscriber::EnvFilter;

use crate::{algorithm::Algorithm, network::Network};

pub mod algorithm;
pub mod boykov_kolmogorov;
pub mod dinic;
pub mod edmonds_karp;
pub mod goldberg_tarjan;
pub mod input;
pub mod mcmf;
pub mod network;
pub mod report;

#[cfg(test)]
mod testing;

#[global_allocator]
static GLOBAL: mimalloc::MiMalloc = mimalloc::MiMalloc;

/// Maximum flow on a network read as whitespace-separated integers:
/// `n source sink` followed by `tail head capacity` triples.
#[derive(Parser, Debug)]
#[command(name = "flow_solver")]
pub struct Cli {
    /// One of dinic, edmonds_karp, goldberg_tarjan, mcmf, bk.
    pub algorithm: String,
    /// Read the network from this file instead of standard input.
    #[arg(short, long)]
    pub input: Option<PathBuf>,
}

fn load_network<R: Read>(cli: &Cli, stdin: R) -> anyhow::Result<Network> {
    let network = match &cli.input {
        Some(path) => {
            let file = File::open(path)
                .with_context(|| format!("cannot open {}", path.display()))?;
            input::read_network(file)
        }
        None => input::read_network(stdin),
    };
    network.context("invalid network description")
}

/// Solves the network from `--input` (or `stdin`) and writes the JSON record
/// to `out`. An unknown algorithm name is reported on `out` and is not an
/// error.
fn run<R: Read, W: Write>(cli: &Cli, stdin: R, mut out: W) -> anyhow::Result<()> {
    let algorithm = match cli.algorithm.parse::<Algorithm>() {
        Ok(algorithm) => algorithm,
        Err(unknown) => {
            writeln!(out, "{unknown}")?;
            return Ok(());
        }
    };
    let network = load_network(cli, stdin)?;
    info!(
        nodes = network.size(),
        edges = network.edges().len(),
        source = network.source(),
        sink = network.sink(),
        "network loaded"
    );
    let result = algorithm.solve(&network);
    let json = result.to_json().context("failed to encode result")?;
    debug!(bytes = json.len(), "writing result");
    writeln!(out, "{json}")?;
    out.flush()?;
    Ok(())
}

fn main() -> anyhow::Result<()> {
    tracing_subscriber::fmt()
        .with_env_filter(
            EnvFilter::builder()
                .with_default_directive(LevelFilter::WARN.into())
                .with_env_var("FLOW_SOLVER_LOG_LEVEL")
                .from_env_lossy(),
        )
        .with_writer(std::io::stderr)
        .init();
    let cli = Cli::parse();
    run(&cli, std::io::stdin().lock(), std::io::stdout().lock())
}
