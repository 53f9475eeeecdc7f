use serde::{Deserialize, Serialize};
use thiserror::Error;

use crate::common::traits::GraphView;

/// Errors returned when mutating a [DiGraph].
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum DiGraphError {
    #[error("vertex {0} does not exist")]
    UnknownVertex(usize),
}

/// A small adjacency-list directed graph with dense `usize` vertex and edge ids.
///
/// This is a reference [GraphView] implementation, enough to build test graphs
/// and simple inputs; larger applications are expected to implement
/// [GraphView] over their own storage. Parallel edges and self-loops are allowed.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct DiGraph {
    /// `(start, end)` for every edge, indexed by edge id
    edges: Vec<(usize, usize)>,
    /// `(edge, end)` pairs leaving each vertex
    outgoing: Vec<Vec<(usize, usize)>>,
    /// `(edge, start)` pairs entering each vertex
    incoming: Vec<Vec<(usize, usize)>>,
}

impl DiGraph {
    /// Creates a graph with no vertices.
    pub fn new() -> Self {
        Self::default()
    }

    /// Creates a graph with vertices `0..count` and no edges.
    pub fn with_vertices(count: usize) -> Self {
        Self {
            edges: Vec::new(),
            outgoing: vec![Vec::new(); count],
            incoming: vec![Vec::new(); count],
        }
    }

    /// Adds a vertex and returns its id.
    pub fn add_vertex(&mut self) -> usize {
        self.outgoing.push(Vec::new());
        self.incoming.push(Vec::new());
        self.outgoing.len() - 1
    }

    /// Adds an edge from `start` to `end` and returns its id.
    pub fn add_edge(&mut self, start: usize, end: usize) -> Result<usize, DiGraphError> {
        for vertex in [start, end] {
            if vertex >= self.vertex_count() {
                return Err(DiGraphError::UnknownVertex(vertex));
            }
        }

        Ok(self.connect(start, end))
    }

    /// The `(start, end)` vertices of an edge.
    pub fn edge(&self, edge: usize) -> Option<(usize, usize)> {
        self.edges.get(edge).copied()
    }

    /// Ids of every edge from `start` to `end`.
    pub fn find_edges(&self, start: usize, end: usize) -> Vec<usize> {
        self.outgoing_neighbors(start)
            .into_iter()
            .filter(|(_, vertex)| *vertex == end)
            .map(|(edge, _)| edge)
            .collect()
    }

    pub fn vertex_count(&self) -> usize {
        self.outgoing.len()
    }

    pub fn edge_count(&self) -> usize {
        self.edges.len()
    }

    /// All vertex ids.
    pub fn vertices(&self) -> std::ops::Range<usize> {
        0..self.vertex_count()
    }

    // Callers must have checked both endpoints exist.
    fn connect(&mut self, start: usize, end: usize) -> usize {
        let edge = self.edges.len();
        self.edges.push((start, end));
        self.outgoing[start].push((edge, end));
        self.incoming[end].push((edge, start));
        edge
    }
}

impl GraphView for DiGraph {
    type Vertex = usize;
    type Edge = usize;

    fn outgoing_neighbors(&self, vertex: usize) -> Vec<(usize, usize)> {
        self.outgoing.get(vertex).cloned().unwrap_or_default()
    }

    fn incoming_neighbors(&self, vertex: usize) -> Vec<(usize, usize)> {
        self.incoming.get(vertex).cloned().unwrap_or_default()
    }
}

/// Builds a directed path with `length` edges.
///
/// Returns the graph along with its first and last vertex.
///
/// # Example
/// ```rust
/// use graph_pathfinding::utils::digraph::di_path;
///
/// let (graph, first, last) = di_path(3);
/// assert_eq!(graph.vertex_count(), 4);
/// assert_eq!(graph.edge_count(), 3);
/// assert_eq!((first, last), (0, 3));
/// ```
pub fn di_path(length: usize) -> (DiGraph, usize, usize) {
    let mut graph = DiGraph::with_vertices(length + 1);
    for vertex in 0..length {
        graph.connect(vertex, vertex + 1);
    }
    (graph, 0, length)
}

/// Builds a directed circuit with `length` vertices and `length` edges.
///
/// Panics if `length` is 0.
pub fn di_circuit(length: usize) -> DiGraph {
    assert!(length > 0, "di_circuit: a circuit needs at least one vertex");

    let (mut graph, first, last) = di_path(length - 1);
    graph.connect(last, first);
    graph
}

/// Builds a grid with the given size along each axis, with an edge in each
/// direction between every pair of vertices adjacent along one axis.
///
/// Returns the graph and a function mapping coordinates to vertex ids. The
/// first coordinate varies fastest: in a `[w, h]` grid, `(x, y)` is `x + w * y`.
///
/// # Example
/// ```rust
/// use graph_pathfinding::utils::digraph::di_grid;
///
/// let (grid, index) = di_grid(&[10, 10]);
/// assert_eq!(grid.vertex_count(), 100);
/// assert_eq!(grid.edge_count(), 18 * 10 + 18 * 10);
/// assert_eq!(index(&[3, 2]), 23);
/// ```
pub fn di_grid(dimensions: &[usize]) -> (DiGraph, impl Fn(&[usize]) -> usize) {
    let dimensions = dimensions.to_vec();

    let mut strides = Vec::with_capacity(dimensions.len());
    let mut vertex_count = 1;
    for size in &dimensions {
        strides.push(vertex_count);
        vertex_count *= size;
    }

    let mut graph = DiGraph::with_vertices(vertex_count);
    for vertex in 0..vertex_count {
        for (axis, size) in dimensions.iter().enumerate() {
            let stride = strides[axis];
            let coordinate = (vertex / stride) % size;
            if coordinate > 0 {
                graph.connect(vertex, vertex - stride);
            }
            if coordinate + 1 < *size {
                graph.connect(vertex, vertex + stride);
            }
        }
    }

    let index = move |coordinates: &[usize]| -> usize {
        coordinates
            .iter()
            .zip(&strides)
            .map(|(coordinate, stride)| coordinate * stride)
            .sum()
    };

    (graph, index)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn add_edge_rejects_unknown_vertices() {
        let mut graph = DiGraph::new();
        let a = graph.add_vertex();
        let b = graph.add_vertex();

        assert_eq!(graph.add_edge(a, b), Ok(0));
        assert_eq!(graph.add_edge(a, 7), Err(DiGraphError::UnknownVertex(7)));
        assert_eq!(graph.edge_count(), 1);
        assert_eq!(graph.edge(0), Some((a, b)));
        assert_eq!(graph.edge(1), None);
    }

    #[test]
    fn neighbors_track_both_directions() {
        let mut graph = DiGraph::with_vertices(3);
        let e0 = graph.add_edge(0, 1).unwrap();
        let e1 = graph.add_edge(0, 1).unwrap();
        let e2 = graph.add_edge(2, 1).unwrap();

        assert_eq!(graph.outgoing_neighbors(0), vec![(e0, 1), (e1, 1)]);
        assert_eq!(graph.incoming_neighbors(1), vec![(e0, 0), (e1, 0), (e2, 2)]);
        assert_eq!(graph.find_edges(0, 1), vec![e0, e1]);
        assert_eq!(graph.find_edges(1, 0), Vec::<usize>::new());
        assert_eq!(graph.outgoing_neighbors(42), Vec::<(usize, usize)>::new());
    }

    #[test]
    fn circuit_closes_the_path() {
        let circuit = di_circuit(5);
        assert_eq!(circuit.vertex_count(), 5);
        assert_eq!(circuit.edge_count(), 5);
        assert_eq!(circuit.find_edges(4, 0).len(), 1);

        let single = di_circuit(1);
        assert_eq!(single.find_edges(0, 0).len(), 1);
    }

    #[test]
    #[should_panic]
    fn empty_circuit_panics() {
        di_circuit(0);
    }

    #[test]
    fn grid_sizes() {
        let (grid, _) = di_grid(&[10]);
        assert_eq!(grid.vertex_count(), 10);
        assert_eq!(grid.edge_count(), 18);

        let (grid, index) = di_grid(&[10, 10, 10]);
        assert_eq!(grid.vertex_count(), 1000);
        assert_eq!(grid.edge_count(), ((18 * 10 + 18 * 10) * 10) + (10 * 18 * 10));
        assert_eq!(index(&[9, 9, 9]), 999);
        assert_eq!(grid.find_edges(index(&[0, 0, 0]), index(&[0, 0, 1])).len(), 1);
        assert_eq!(grid.find_edges(index(&[9, 0, 0]), index(&[0, 1, 0])).len(), 0);
    }

    #[test]
    fn graph_serializes() {
        let (graph, _, _) = di_path(2);
        let json = serde_json::to_string(&graph).unwrap();
        let restored: DiGraph = serde_json::from_str(&json).unwrap();
        assert_eq!(restored, graph);
    }
}
