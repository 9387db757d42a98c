//! Shortest co-appearance paths to a fixed reference actor.

use std::collections::VecDeque;

use tracing::{debug, error};

use crate::error::SearchError;
use crate::graph::{ActorId, DenseId, Graph, MovieId};

/// Default bound on path reconstruction.
pub const DEFAULT_MAX_DEPTH: usize = 255;

/// One hand-off in a path: `from` was in `movie` with `to`.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Hop {
    pub from: ActorId,
    pub movie: MovieId,
    pub to: ActorId,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Path {
    pub source: ActorId,
    pub target: ActorId,
    pub hops: Vec<Hop>,
}

impl Path {
    /// Degrees of separation, i.e. the hop count.
    pub fn degrees(&self) -> usize {
        self.hops.len()
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum NotConnected {
    /// The actor only ever appeared in single-cast movies.
    IsolatedVertex,
    /// The search exhausted the actor's component.
    Unreachable,
}

/// Result of a query that resolved both names.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Outcome {
    Found(Path),
    NotConnected(NotConnected),
}

/// How the search first reached a vertex.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Step {
    pub movie: MovieId,
    pub from: ActorId,
}

/// Breadth-first search against one reference actor. Holds no per-query
/// state, so a single finder can serve any number of queries.
#[derive(Debug, Clone, Copy)]
pub struct PathFinder<'g> {
    graph: &'g Graph,
    reference: ActorId,
    max_depth: usize,
}

impl<'g> PathFinder<'g> {
    pub fn new(graph: &'g Graph, reference: &str) -> Result<Self, SearchError> {
        let reference = graph
            .actor_id(reference)
            .ok_or_else(|| SearchError::NoReferenceActor(reference.to_string()))?;
        Ok(Self {
            graph,
            reference,
            max_depth: DEFAULT_MAX_DEPTH,
        })
    }

    pub fn with_max_depth(mut self, max_depth: usize) -> Self {
        self.max_depth = max_depth;
        self
    }

    pub fn graph(&self) -> &'g Graph {
        self.graph
    }

    pub fn reference(&self) -> ActorId {
        self.reference
    }

    pub fn reference_name(&self) -> &'g str {
        self.graph.actor_name(self.reference)
    }

    pub fn shortest_path(&self, source: &str) -> Result<Outcome, SearchError> {
        let source = self
            .graph
            .actor_id(source)
            .ok_or_else(|| SearchError::UnknownActor(source.to_string()))?;
        self.shortest_path_from(source)
    }

    pub fn shortest_path_from(&self, source: ActorId) -> Result<Outcome, SearchError> {
        let graph = self.graph;
        if graph.edges(source).is_empty() {
            return Ok(Outcome::NotConnected(NotConnected::IsolatedVertex));
        }

        let n = graph.num_actors();
        let mut visited = vec![false; n];
        let mut came_from: Vec<Option<Step>> = vec![None; n];
        let mut queue = VecDeque::new();

        visited[source.index()] = true;
        queue.push_back(source);

        let mut found = false;
        let mut dequeued = 0usize;
        while let Some(current) = queue.pop_front() {
            dequeued += 1;
            if current == self.reference {
                found = true;
                break;
            }
            for edge in graph.edges(current) {
                let next = edge.actor.index();
                if !visited[next] {
                    visited[next] = true; // first discovery wins
                    came_from[next] = Some(Step {
                        movie: edge.movie,
                        from: current,
                    });
                    queue.push_back(edge.actor);
                }
            }
        }
        debug!(
            source = graph.actor_name(source),
            dequeued, found, "breadth-first search finished"
        );

        if !found {
            return Ok(Outcome::NotConnected(NotConnected::Unreachable));
        }
        let path = reconstruct(&came_from, source, self.reference, self.max_depth).map_err(
            |err| {
                error!(source = graph.actor_name(source), %err, "corrupt search bookkeeping");
                err
            },
        )?;
        Ok(Outcome::Found(path))
    }

    /// Runs a query and hands the rendered result to `display`.
    pub fn query<F>(&self, source: &str, display: F)
    where
        F: FnOnce(&crate::report::Report),
    {
        let result = self.shortest_path(source);
        display(&crate::report::Report::new(self, source, &result));
    }
}

/// One-shot form: resolve `reference`, then search from `source`.
pub fn shortest_path(graph: &Graph, source: &str, reference: &str) -> Result<Outcome, SearchError> {
    PathFinder::new(graph, reference)?.shortest_path(source)
}

/// Walks `came_from` backwards from `target` to `source`.
///
/// Both failure modes mean the table is corrupt: more than `max_depth` steps
/// yields [`SearchError::InvariantViolation`], a vertex with no recorded step
/// yields [`SearchError::MissingPredecessor`].
pub fn reconstruct(
    came_from: &[Option<Step>],
    source: ActorId,
    target: ActorId,
    max_depth: usize,
) -> Result<Path, SearchError> {
    let mut hops = Vec::new();
    let mut current = target;
    while current != source {
        if hops.len() >= max_depth {
            return Err(SearchError::InvariantViolation { max_depth });
        }
        let step = came_from
            .get(current.index())
            .copied()
            .flatten()
            .ok_or(SearchError::MissingPredecessor { actor: current })?;
        hops.push(Hop {
            from: step.from,
            movie: step.movie,
            to: current,
        });
        current = step.from;
    }
    hops.reverse();
    Ok(Path {
        source,
        target,
        hops,
    })
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::graph::GraphBuilder;

    fn build(records: &[&[&str]]) -> Graph {
        let mut builder = GraphBuilder::new();
        for record in records {
            builder.add_record(record[0], record[1..].iter().copied()).unwrap();
        }
        builder.finish()
    }

    fn names<'a>(graph: &'a Graph, path: &Path) -> Vec<(&'a str, &'a str, &'a str)> {
        path.hops
            .iter()
            .map(|h| {
                (
                    graph.actor_name(h.from),
                    graph.movie_title(h.movie),
                    graph.actor_name(h.to),
                )
            })
            .collect()
    }

    fn found(outcome: Outcome) -> Path {
        match outcome {
            Outcome::Found(path) => path,
            other => panic!("expected a path, got {other:?}"),
        }
    }

    #[test]
    fn test_two_hop_path() {
        let graph = build(&[&["movie1", "A", "B"], &["movie2", "B", "C"]]);
        let path = found(shortest_path(&graph, "A", "C").unwrap());
        assert_eq!(path.degrees(), 2);
        assert_eq!(
            names(&graph, &path),
            vec![("A", "movie1", "B"), ("B", "movie2", "C")]
        );
        let path = found(shortest_path(&graph, "B", "C").unwrap());
        assert_eq!(path.degrees(), 1);
    }

    #[test]
    fn test_shorter_path_beats_earlier_edges() {
        let graph = build(&[
            &["long1", "A", "X"],
            &["long2", "X", "Y"],
            &["long3", "Y", "R"],
            &["short", "A", "R"],
        ]);
        let path = found(shortest_path(&graph, "A", "R").unwrap());
        assert_eq!(names(&graph, &path), vec![("A", "short", "R")]);
    }

    #[test]
    fn test_ties_go_to_first_ingested_edge() {
        let graph = build(&[
            &["first", "A", "B"],
            &["second", "A", "C"],
            &["via b", "B", "R"],
            &["via c", "C", "R"],
            &["again", "A", "B"],
        ]);
        let finder = PathFinder::new(&graph, "R").unwrap();
        let expected = vec![("A", "first", "B"), ("B", "via b", "R")];
        for _ in 0..3 {
            let path = found(finder.shortest_path("A").unwrap());
            assert_eq!(names(&graph, &path), expected); // deterministic
        }
    }

    #[test]
    fn test_reference_itself_is_zero_hops() {
        let graph = build(&[&["m", "A", "R"]]);
        let path = found(shortest_path(&graph, "R", "R").unwrap());
        assert_eq!(path.degrees(), 0);
    }

    #[test]
    fn test_isolated_actor() {
        let graph = build(&[&["m", "A", "R"], &["alone", "S"]]);
        assert_eq!(
            shortest_path(&graph, "S", "R").unwrap(),
            Outcome::NotConnected(NotConnected::IsolatedVertex)
        );
    }

    #[test]
    fn test_unreachable_actor() {
        let graph = build(&[&["m", "A", "R"], &["other", "X", "Y"]]);
        assert_eq!(
            shortest_path(&graph, "X", "R").unwrap(),
            Outcome::NotConnected(NotConnected::Unreachable)
        );
    }

    #[test]
    fn test_unknown_actor() {
        let graph = build(&[&["m", "A", "R"]]);
        assert_eq!(
            shortest_path(&graph, "Nobody", "R"),
            Err(SearchError::UnknownActor("Nobody".into()))
        );
    }

    #[test]
    fn test_missing_reference() {
        let graph = build(&[&["m", "A", "B"]]);
        assert_eq!(
            PathFinder::new(&graph, "Bacon, Kevin").unwrap_err(),
            SearchError::NoReferenceActor("Bacon, Kevin".into())
        );
        assert_eq!(
            shortest_path(&graph, "Nobody", "Bacon, Kevin"),
            Err(SearchError::NoReferenceActor("Bacon, Kevin".into()))
        ); // reference is resolved first
    }

    #[test]
    fn test_depth_bound_is_an_invariant_violation() {
        let graph = build(&[&["m1", "A", "B"], &["m2", "B", "C"], &["m3", "C", "R"]]);
        let finder = PathFinder::new(&graph, "R").unwrap().with_max_depth(2);
        assert_eq!(
            finder.shortest_path("A"),
            Err(SearchError::InvariantViolation { max_depth: 2 })
        );
        assert_eq!(found(finder.shortest_path("B").unwrap()).degrees(), 2);
    }

    #[test]
    fn test_reconstruct_detects_cycles() {
        let m = MovieId(0);
        let came_from = vec![
            None,
            Some(Step { movie: m, from: ActorId(2) }),
            Some(Step { movie: m, from: ActorId(1) }),
        ];
        assert_eq!(
            reconstruct(&came_from, ActorId(0), ActorId(1), DEFAULT_MAX_DEPTH),
            Err(SearchError::InvariantViolation { max_depth: DEFAULT_MAX_DEPTH })
        );
    }

    #[test]
    fn test_reconstruct_detects_missing_steps() {
        let came_from = vec![None, None];
        let err = reconstruct(&came_from, ActorId(0), ActorId(1), DEFAULT_MAX_DEPTH).unwrap_err();
        assert_eq!(err, SearchError::MissingPredecessor { actor: ActorId(1) });
        assert!(err.is_internal());
        assert!(!err.to_string().contains("exceeded")); // not reported as a depth overrun
    }

    #[test]
    fn test_queries_do_not_disturb_each_other() {
        let graph = build(&[&["m1", "A", "B"], &["m2", "B", "R"], &["x", "X", "Y"]]);
        let finder = PathFinder::new(&graph, "R").unwrap();
        assert!(finder.shortest_path("Nope").is_err());
        assert_eq!(
            finder.shortest_path("X").unwrap(),
            Outcome::NotConnected(NotConnected::Unreachable)
        );
        assert_eq!(found(finder.shortest_path("A").unwrap()).degrees(), 2);
    }
}
