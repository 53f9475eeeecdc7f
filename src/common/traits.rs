use std::fmt::Debug;
use std::hash::Hash;

use serde::{Deserialize, Serialize};

/// Which way to follow edges when walking a [GraphView].
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum Direction {
    /// Follow edges from their start vertex to their end vertex.
    Outgoing,
    /// Follow edges backwards, from their end vertex to their start vertex.
    Incoming,
}

/// Trait that encapsulates the read-only view of a graph that the search
/// algorithms need: for a vertex, which `(edge, vertex)` pairs are adjacent to it.
///
/// Vertex and edge identifiers are opaque keys; the algorithms only hash and
/// compare them, they never look inside. Implementations must return the same
/// neighbors for the same vertex for the duration of a single search call.
pub trait GraphView {
    type Vertex: Copy + Eq + Hash + Ord + Debug;
    type Edge: Copy + Eq + Hash + Debug;

    /// Edges leaving `vertex`, paired with the vertex each one ends at.
    fn outgoing_neighbors(&self, vertex: Self::Vertex) -> Vec<(Self::Edge, Self::Vertex)>;

    /// Edges entering `vertex`, paired with the vertex each one starts at.
    fn incoming_neighbors(&self, vertex: Self::Vertex) -> Vec<(Self::Edge, Self::Vertex)>;

    /// Dispatches to [outgoing_neighbors](GraphView::outgoing_neighbors) or
    /// [incoming_neighbors](GraphView::incoming_neighbors).
    fn neighbors(
        &self,
        vertex: Self::Vertex,
        direction: Direction,
    ) -> Vec<(Self::Edge, Self::Vertex)> {
        match direction {
            Direction::Outgoing => self.outgoing_neighbors(vertex),
            Direction::Incoming => self.incoming_neighbors(vertex),
        }
    }
}

impl<G: GraphView + ?Sized> GraphView for &G {
    type Vertex = G::Vertex;
    type Edge = G::Edge;

    fn outgoing_neighbors(&self, vertex: Self::Vertex) -> Vec<(Self::Edge, Self::Vertex)> {
        (**self).outgoing_neighbors(vertex)
    }

    fn incoming_neighbors(&self, vertex: Self::Vertex) -> Vec<(Self::Edge, Self::Vertex)> {
        (**self).incoming_neighbors(vertex)
    }
}
