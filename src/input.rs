use std::io::Read;

use thiserror::Error;
use tracing::debug;

use crate::network::{Network, NetworkError};

#[derive(Debug, Error)]
pub enum InputError {
    #[error("failed to read network description")]
    Io(#[from] std::io::Error),
    #[error("expected node count, source and sink, found {0} integer(s)")]
    MissingHeader(usize),
    #[error(transparent)]
    Network(#[from] NetworkError),
}

/// Parses `n source sink` followed by `(tail, head, capacity)` triples.
/// Reading stops at the first token that is not an integer; a trailing
/// incomplete triple is dropped.
pub fn parse_network(text: &str) -> Result<Network, InputError> {
    let numbers: Vec<i64> = text
        .split_whitespace()
        .map_while(|token| token.parse().ok())
        .collect();
    let [size, source, sink, rest @ ..] = numbers.as_slice() else {
        return Err(InputError::MissingHeader(numbers.len()));
    };
    if rest.len() % 3 != 0 {
        debug!(dropped = rest.len() % 3, "incomplete trailing edge ignored");
    }
    let edges = rest
        .chunks_exact(3)
        .map(|triple| (triple[0], triple[1], triple[2]));
    Ok(Network::new(*size, *source, *sink, edges)?)
}

pub fn read_network<R: Read>(mut reader: R) -> Result<Network, InputError> {
    let mut text = String::new();
    reader.read_to_string(&mut text)?;
    parse_network(&text)
}

#[cfg(test)]
mod test {
    use super::*;
    use std::{fs::File, path::PathBuf};

    fn fixture(name: &str) -> Network {
        let path = PathBuf::from(env!("CARGO_MANIFEST_DIR"))
            .join("data")
            .join(name);
        read_network(File::open(path).unwrap()).unwrap()
    }

    #[test]
    fn header_and_triples() {
        let network = parse_network("4 0 3\n0 1 3\n0 2 2\n1 2 1\n1 3 2\n2 3 3\n").unwrap();
        assert_eq!(network.size(), 4);
        assert_eq!((network.source(), network.sink()), (0, 3));
        assert_eq!(network.edges().len(), 5);
        assert_eq!(network.capacity(2, 3), 3);
    }

    #[test]
    fn stops_at_first_non_integer() {
        let network = parse_network("3 0 2 0 1 5 1 2 4 oops 0 2 9").unwrap();
        assert_eq!(network.edges().len(), 2);
        assert_eq!(network.capacity(0, 2), 0);

        // a bad token in the middle of a triple drops the whole triple
        let network = parse_network("3 0 2 0 1 5 1 2.5 4").unwrap();
        assert_eq!(network.edges().len(), 1);
    }

    #[test]
    fn trailing_partial_triple_is_dropped() {
        let network = parse_network("3 0 2 0 1 5 1 2").unwrap();
        assert_eq!(network.edges().len(), 1);
    }

    #[test]
    fn missing_header() {
        assert!(matches!(
            parse_network("4 0"),
            Err(InputError::MissingHeader(2))
        ));
        assert!(matches!(parse_network(""), Err(InputError::MissingHeader(0))));
    }

    #[test]
    fn invalid_network_is_reported() {
        assert!(matches!(
            parse_network("3 0 2 0 1 -1"),
            Err(InputError::Network(NetworkError::NegativeCapacity { .. }))
        ));
        assert!(matches!(
            parse_network("-2 0 1"),
            Err(InputError::Network(NetworkError::EmptyNetwork(-2)))
        ));
    }

    #[test]
    fn fixtures() {
        assert_eq!(fixture("diamond.txt").edges().len(), 5);
        let parallel = fixture("parallel.txt");
        assert_eq!(parallel.capacity(0, 1), 5);
        assert_eq!(parallel.arcs().count(), 1);
        let disconnected = fixture("disconnected.txt");
        assert!(disconnected.neighbours(disconnected.sink()).iter().all(|&v| v != 0));
    }
}
