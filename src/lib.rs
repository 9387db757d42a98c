//! Degrees of separation over a movie co-appearance graph.
//!
//! [`corpus`] turns `TITLE/ACTOR/ACTOR/...` lines into a [`graph::Graph`];
//! [`search::PathFinder`] answers shortest-path queries against one
//! reference actor.

pub mod config;
pub mod corpus;
pub mod error;
pub mod graph;
pub mod report;
pub mod search;

pub use config::Config;
pub use error::{ConfigError, CorpusError, SearchError, TableFull};
pub use graph::{ActorId, Edge, Graph, GraphBuilder, MovieId};
pub use report::Report;
pub use search::{shortest_path, NotConnected, Outcome, Path, PathFinder};
