//! Error types for corpus ingestion, configuration and path queries.

use std::path::PathBuf;

use thiserror::Error;

use crate::graph::ActorId;

/// Failures while turning a corpus into a graph. All of them are fatal.
#[derive(Error, Debug)]
pub enum CorpusError {
    #[error("cannot open corpus {}", path.display())]
    Unavailable {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    #[error("failed reading corpus at line {line}")]
    Read {
        line: u64,
        #[source]
        source: std::io::Error,
    },

    #[error("corpus line {line} is not valid UTF-8")]
    Malformed {
        line: u64,
        #[source]
        source: std::io::Error,
    },

    #[error("too many distinct names at corpus line {line}")]
    Capacity {
        line: u64,
        #[source]
        source: TableFull,
    },
}

/// An identity table ran out of `u32` ids.
#[derive(Error, Debug, Clone, Copy, PartialEq, Eq)]
#[error("identity table is full ({} names)", u64::from(u32::MAX) + 1)]
pub struct TableFull;

/// Per-query failures. `NotConnected` is deliberately absent: an unreachable
/// reference actor is a normal outcome, see `search::Outcome`.
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum SearchError {
    #[error("{0} was not in my database")]
    UnknownActor(String),

    #[error("couldn't find reference actor {0}")]
    NoReferenceActor(String),

    #[error("path reconstruction exceeded {max_depth} hops without reaching the source")]
    InvariantViolation { max_depth: usize },

    #[error("no recorded predecessor for actor #{} while backtracking", actor.0)]
    MissingPredecessor { actor: ActorId },
}

impl SearchError {
    /// True for the variants that mean the search bookkeeping is corrupt.
    pub fn is_internal(&self) -> bool {
        matches!(
            self,
            SearchError::InvariantViolation { .. } | SearchError::MissingPredecessor { .. }
        )
    }
}

#[derive(Error, Debug)]
pub enum ConfigError {
    #[error("cannot read config file {}", path.display())]
    Read {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    #[error("invalid config file {}", path.display())]
    Parse {
        path: PathBuf,
        #[source]
        source: toml::de::Error,
    },

    #[error("invalid configuration: {0}")]
    Invalid(String),
}
