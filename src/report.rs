//! Human and JSON renderings of query results.

use std::fmt;

use serde::Serialize;

use crate::error::SearchError;
use crate::graph::{ActorId, Graph};
use crate::search::{NotConnected, Outcome, PathFinder};

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct HopReport {
    pub actor: String,
    pub movie: String,
    pub with: String,
}

/// A query result with every handle resolved to its name.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(tag = "status", rename_all = "snake_case")]
pub enum Report {
    Found {
        actor: String,
        reference: String,
        degrees: usize,
        hops: Vec<HopReport>,
    },
    Isolated {
        actor: String,
    },
    NotConnected {
        actor: String,
        reference: String,
    },
    UnknownActor {
        actor: String,
    },
    NoReferenceActor {
        reference: String,
    },
    InvariantViolation {
        actor: String,
        reason: String,
    },
}

impl Report {
    pub fn new(finder: &PathFinder<'_>, actor: &str, result: &Result<Outcome, SearchError>) -> Self {
        let graph = finder.graph();
        let reference = finder.reference_name().to_string();
        let actor = actor.to_string();
        match result {
            Ok(Outcome::Found(path)) => Report::Found {
                actor,
                reference,
                degrees: path.degrees(),
                hops: path
                    .hops
                    .iter()
                    .map(|hop| HopReport {
                        actor: graph.actor_name(hop.from).to_string(),
                        movie: graph.movie_title(hop.movie).to_string(),
                        with: graph.actor_name(hop.to).to_string(),
                    })
                    .collect(),
            },
            Ok(Outcome::NotConnected(NotConnected::IsolatedVertex)) => Report::Isolated { actor },
            Ok(Outcome::NotConnected(NotConnected::Unreachable)) => {
                Report::NotConnected { actor, reference }
            }
            Err(SearchError::UnknownActor(_)) => Report::UnknownActor { actor },
            Err(SearchError::NoReferenceActor(reference)) => Report::NoReferenceActor {
                reference: reference.clone(),
            },
            Err(err @ (SearchError::InvariantViolation { .. }
            | SearchError::MissingPredecessor { .. })) => Report::InvariantViolation {
                actor,
                reason: err.to_string(),
            },
        }
    }

    pub fn to_json(&self) -> serde_json::Result<String> {
        serde_json::to_string(self)
    }
}

impl fmt::Display for Report {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Report::Found {
                actor,
                reference,
                degrees,
                hops,
            } => {
                write!(f, "{actor} is {degrees} degree(s) away from {reference}")?;
                for (i, hop) in hops.iter().enumerate() {
                    write!(f, "\n{i}) {} was in {} with {}", hop.actor, hop.movie, hop.with)?;
                }
                Ok(())
            }
            Report::Isolated { actor } => write!(
                f,
                "{actor} is not connected to anybody.  The actor must have been in a movie by themselves."
            ),
            Report::NotConnected { actor, reference } => {
                write!(f, "{actor} doesn't have a path to {reference}")
            }
            Report::UnknownActor { actor } => write!(f, "{actor} was not in my database"),
            Report::NoReferenceActor { reference } => write!(f, "Couldn't find {reference}"),
            Report::InvariantViolation { actor, reason } => {
                write!(f, "Internal error while searching from {actor}: {reason}")
            }
        }
    }
}

/// Degree line plus one line per adjacency entry, in adjacency order.
pub fn describe_actor(graph: &Graph, id: ActorId) -> String {
    let name = graph.actor_name(id);
    let edges = graph.edges(id);
    let mut out = format!("{name} (# {}) has {} edges.", id.0, edges.len());
    for edge in edges {
        out.push_str(&format!(
            "\n{name} was in {} with {}",
            graph.movie_title(edge.movie),
            graph.actor_name(edge.actor)
        ));
    }
    out
}
