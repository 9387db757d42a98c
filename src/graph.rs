//! Co-appearance graph over actors.
//!
//! Actors and movies are interned once into [`SymbolTable`]s and referred to
//! everywhere else by dense `u32` handles. Each actor owns one [`Vertex`]
//! whose adjacency list keeps edges in the order ingestion produced them;
//! the breadth-first search relies on that order for its tie-break.

use std::collections::HashMap;
use std::sync::Arc;

use crate::error::TableFull;

/// Dense identifier handed out by a [`SymbolTable`].
pub trait DenseId: Copy {
    /// `None` once `index` no longer fits the id width.
    fn from_index(index: usize) -> Option<Self>;
    fn index(self) -> usize;
}

macro_rules! dense_id {
    ($(#[$meta:meta])* $name:ident) => {
        $(#[$meta])*
        #[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
        pub struct $name(pub u32);

        impl DenseId for $name {
            fn from_index(index: usize) -> Option<Self> {
                u32::try_from(index).ok().map($name)
            }

            fn index(self) -> usize {
                self.0 as usize
            }
        }
    };
}

dense_id!(
    /// Actor handle, in `[0, num_actors)` in first-seen order.
    ActorId
);
dense_id!(
    /// Movie handle, in `[0, num_movies)` in first-seen order.
    MovieId
);

/// Name interner: one allocation per distinct name, shared between the
/// lookup map and the id-indexed table.
#[derive(Debug, Clone)]
pub struct SymbolTable<I> {
    ids: HashMap<Arc<str>, I>,
    names: Vec<Arc<str>>,
}

impl<I> Default for SymbolTable<I> {
    fn default() -> Self {
        Self {
            ids: HashMap::new(),
            names: Vec::new(),
        }
    }
}

impl<I: DenseId> SymbolTable<I> {
    /// Returns the id for `name`, allocating the next dense id if the name is
    /// new. The flag is `true` when a new id was allocated.
    pub fn intern(&mut self, name: &str) -> Result<(I, bool), TableFull> {
        if let Some(&id) = self.ids.get(name) {
            return Ok((id, false));
        }
        let id = I::from_index(self.names.len()).ok_or(TableFull)?;
        let name: Arc<str> = Arc::from(name);
        self.names.push(Arc::clone(&name));
        self.ids.insert(name, id);
        Ok((id, true))
    }

    pub fn get(&self, name: &str) -> Option<I> {
        self.ids.get(name).copied()
    }

    /// Panics if `id` was not issued by this table.
    pub fn name(&self, id: I) -> &str {
        &self.names[id.index()]
    }

    pub fn len(&self) -> usize {
        self.names.len()
    }

    pub fn is_empty(&self) -> bool {
        self.names.is_empty()
    }

    pub fn iter(&self) -> impl Iterator<Item = (I, &str)> + '_ {
        self.names
            .iter()
            .enumerate()
            .filter_map(|(index, name)| Some((I::from_index(index)?, name.as_ref())))
    }
}

/// One directed half of a co-appearance: "shares `movie` with `actor`".
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Edge {
    pub movie: MovieId,
    pub actor: ActorId,
}

#[derive(Debug, Clone, Default)]
pub struct Vertex {
    edges: Vec<Edge>,
}

impl Vertex {
    pub fn edges(&self) -> &[Edge] {
        &self.edges
    }
}

/// Finished co-appearance graph. There is no mutation API; build one with
/// [`GraphBuilder`].
#[derive(Debug, Clone)]
pub struct Graph {
    actors: SymbolTable<ActorId>,
    movies: SymbolTable<MovieId>,
    vertices: Vec<Vertex>,
}

impl Graph {
    pub fn actor_id(&self, name: &str) -> Option<ActorId> {
        self.actors.get(name)
    }

    pub fn actor_name(&self, id: ActorId) -> &str {
        self.actors.name(id)
    }

    pub fn movie_id(&self, title: &str) -> Option<MovieId> {
        self.movies.get(title)
    }

    pub fn movie_title(&self, id: MovieId) -> &str {
        self.movies.name(id)
    }

    pub fn vertex(&self, id: ActorId) -> &Vertex {
        &self.vertices[id.index()]
    }

    pub fn edges(&self, id: ActorId) -> &[Edge] {
        self.vertex(id).edges()
    }

    pub fn actors(&self) -> impl Iterator<Item = (ActorId, &str)> + '_ {
        self.actors.iter()
    }

    pub fn num_actors(&self) -> usize {
        self.vertices.len()
    }

    pub fn num_movies(&self) -> usize {
        self.movies.len()
    }

    /// Directed edge count, i.e. twice the number of co-appearances.
    pub fn num_edges(&self) -> usize {
        self.vertices.iter().map(|v| v.edges.len()).sum()
    }

    pub fn is_empty(&self) -> bool {
        self.vertices.is_empty()
    }
}

/// Incremental graph construction, one movie record at a time.
#[derive(Debug, Default)]
pub struct GraphBuilder {
    actors: SymbolTable<ActorId>,
    movies: SymbolTable<MovieId>,
    vertices: Vec<Vertex>,
    cast: Vec<ActorId>, // reused between records
}

impl GraphBuilder {
    pub fn new() -> Self {
        Self::default()
    }

    /// Adds one movie and links every pair of its cast members.
    ///
    /// A name repeated within the same cast is counted once, so a record can
    /// never produce a self-loop. Empty names are ignored.
    pub fn add_record<'a, C>(&mut self, title: &str, cast: C) -> Result<MovieId, TableFull>
    where
        C: IntoIterator<Item = &'a str>,
    {
        let (movie, _) = self.movies.intern(title)?;

        self.cast.clear();
        for name in cast {
            if name.is_empty() {
                continue;
            }
            let (actor, is_new) = self.actors.intern(name)?;
            if is_new {
                self.vertices.push(Vertex::default()); // vertex index == actor id
            }
            if !self.cast.contains(&actor) {
                self.cast.push(actor);
            }
        }

        // O(k^2) in cast size, edges appended in (i, j) order
        let cast = &self.cast;
        let vertices = &mut self.vertices;
        for (i, &src) in cast.iter().enumerate() {
            for &dst in &cast[i + 1..] {
                vertices[src.index()].edges.push(Edge { movie, actor: dst });
                vertices[dst.index()].edges.push(Edge { movie, actor: src });
            }
        }
        Ok(movie)
    }

    pub fn finish(self) -> Graph {
        Graph {
            actors: self.actors,
            movies: self.movies,
            vertices: self.vertices,
        }
    }
}
