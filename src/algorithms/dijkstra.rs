// https://en.wikipedia.org/wiki/Dijkstra%27s_algorithm

use std::collections::{HashMap, HashSet};
use std::hash::Hash;

use serde::{Deserialize, Serialize};
use tracing::{debug, debug_span};

use crate::common::traits::GraphView;
use crate::data_structures::OpenMinSet;

/// The finalized distances and shortest-path tree from a single source vertex.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ShortestPaths<V, E>
where
    V: Copy + Eq + Hash,
{
    source: V,
    ops_used: usize,
    distances: HashMap<V, f64>,
    predecessors: HashMap<V, (E, V)>,
}

impl<V, E> ShortestPaths<V, E>
where
    V: Copy + Eq + Hash,
    E: Copy,
{
    /// The vertex the search started from
    pub fn source(&self) -> V {
        self.source
    }

    /// The number of vertices whose distance was finalized
    pub fn ops(&self) -> usize {
        self.ops_used
    }

    /// The shortest distance from the source to `vertex`.
    ///
    /// Returns None if `vertex` is unreachable, or was not reached before the
    /// search stopped early.
    pub fn distance(&self, vertex: V) -> Option<f64> {
        self.distances.get(&vertex).copied()
    }

    /// Whether a shortest path to `vertex` is known
    pub fn is_reached(&self, vertex: V) -> bool {
        self.distances.contains_key(&vertex)
    }

    /// All finalized distances
    pub fn distances(&self) -> &HashMap<V, f64> {
        &self.distances
    }

    pub fn into_distances(self) -> HashMap<V, f64> {
        self.distances
    }

    /// Reconstructs a shortest path from the source to `target` as
    /// `(edge, vertex)` steps, where each edge ends at the paired vertex.
    ///
    /// The path to the source itself is empty. Returns None if no shortest
    /// path to `target` is known.
    pub fn path(&self, target: V) -> Option<Vec<(E, V)>> {
        if !self.is_reached(target) {
            return None;
        }

        let mut path = Vec::new();
        let mut current = target;

        while current != self.source {
            let (edge, previous) = *self.predecessors.get(&current)?;
            assert!(
                path.len() < self.predecessors.len(),
                "dijkstra: predecessor links form a cycle"
            );
            path.push((edge, current));
            current = previous;
        }

        path.reverse();
        Some(path)
    }

    /// Reconstructs paths to each of `targets`, skipping targets with no known path.
    pub fn paths(&self, targets: &[V]) -> HashMap<V, Vec<(E, V)>> {
        targets
            .iter()
            .filter_map(|target| self.path(*target).map(|path| (*target, path)))
            .collect()
    }
}

/// Calculates shortest paths from `source` using Dijkstra's Algorithm.
///
/// The algorithm itself doesn't care what the vertex and edge types are, as
/// long as the graph implements [GraphView] and you provide a length function
/// that converts an edge into a non-negative `f64` length.
///
/// If `targets` is empty, every vertex reachable from `source` is finalized.
/// Otherwise the search stops as soon as every target has been finalized (or
/// the reachable graph is exhausted); distances to the targets are the same
/// either way, but fewer other vertices may be present in the result.
///
/// The length function may return `f64::INFINITY` for edges that can't be
/// traversed; those edges are skipped. Panics if it returns a negative or NaN
/// length, since the algorithm is only correct for non-negative lengths.
///
/// # Example
/// ```rust
/// use graph_pathfinding::algorithms::dijkstra::shortest_paths;
/// use graph_pathfinding::utils::digraph::di_grid;
/// use graph_pathfinding::utils::lengths::unit_lengths;
///
/// let (grid, index) = di_grid(&[10, 10]);
/// let start = index(&[0, 0]);
/// let goal = index(&[9, 9]);
///
/// let results = shortest_paths(&grid, start, &[goal], unit_lengths());
///
/// assert_eq!(results.distance(goal), Some(18.0));
/// if let Some(path) = results.path(goal) {
///     assert_eq!(path.len(), 18);
///     assert_eq!(path.last().map(|(_, vertex)| *vertex), Some(goal));
/// }
/// ```
///
/// Reference: https://en.wikipedia.org/wiki/Dijkstra%27s_algorithm
pub fn shortest_paths<G, L>(
    graph: &G,
    source: G::Vertex,
    targets: &[G::Vertex],
    lengths: L,
) -> ShortestPaths<G::Vertex, G::Edge>
where
    G: GraphView,
    L: Fn(G::Edge) -> f64,
{
    let span = debug_span!("dijkstra", ?source, targets = targets.len());
    let _enter = span.enter();

    let mut pending: HashSet<G::Vertex> = targets.iter().copied().collect();

    // distances[vertex] = finalized shortest distance from `source` to `vertex`.
    // Tentative distances live in the open set as scores.
    let mut distances: HashMap<G::Vertex, f64> = HashMap::new();
    let mut predecessors: HashMap<G::Vertex, (G::Edge, G::Vertex)> = HashMap::new();
    let mut open: OpenMinSet<G::Vertex, f64> = OpenMinSet::new();

    // We're at `source`, with a zero cost
    open.push(source, 0.0);

    // Examine the frontier with lower cost vertices first
    while let Some((vertex, distance)) = open.pop_with_score() {
        distances.insert(vertex, distance);

        if pending.remove(&vertex) && pending.is_empty() {
            debug!(
                settled = distances.len(),
                frontier = open.len(),
                "all targets reached, stopping early"
            );
            break;
        }

        // For each vertex we can reach, see if we can find a way with
        // a lower cost going through this vertex
        for (edge, neighbor) in graph.outgoing_neighbors(vertex) {
            // Checked for every edge, including ones back into finalized vertices
            let length = lengths(edge);
            assert!(
                length >= 0.0,
                "dijkstra: edge {edge:?} has a negative or NaN length ({length})"
            );

            // Already finalized, nothing can improve on it
            if distances.contains_key(&neighbor) {
                continue;
            }

            // Infinite length marks an impassable edge, skip this neighbor
            if length == f64::INFINITY {
                continue;
            }

            let candidate = distance + length;

            // Relaxation, we have now found a better way
            match open.score(&neighbor) {
                Some(known) if candidate < known => open.decrease_key(&neighbor, candidate),
                Some(_) => continue,
                None => open.push(neighbor, candidate),
            }
            predecessors.insert(neighbor, (edge, vertex));
        }
    }

    debug!(settled = distances.len(), "dijkstra finished");

    ShortestPaths {
        source,
        ops_used: distances.len(),
        distances,
        predecessors,
    }
}

/// Shortest distances from `source` to every reachable vertex.
pub fn distances_from<G, L>(graph: &G, source: G::Vertex, lengths: L) -> HashMap<G::Vertex, f64>
where
    G: GraphView,
    L: Fn(G::Edge) -> f64,
{
    shortest_paths(graph, source, &[], lengths).into_distances()
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::utils::digraph::{di_circuit, di_grid, di_path, DiGraph};
    use crate::utils::lengths::{lengths_from_map, unit_lengths};

    // Helper Functions

    fn assert_path_is_well_formed(graph: &DiGraph, source: usize, path: &[(usize, usize)]) {
        let mut visited = HashSet::new();
        visited.insert(source);

        let mut current = source;
        for (edge, vertex) in path {
            assert_eq!(graph.edge(*edge), Some((current, *vertex)));
            assert!(visited.insert(*vertex), "vertex {vertex} visited twice");
            current = *vertex;
        }
    }

    // Test Cases

    #[test]
    fn path_graph_distance_equals_length() {
        let (path_graph, start, end) = di_path(1000);
        let results = shortest_paths(&path_graph, start, &[end], unit_lengths());

        assert_eq!(results.distance(end), Some(1000.0));

        let path = results.path(end).unwrap();
        assert_eq!(path.len(), 1000);
        assert_path_is_well_formed(&path_graph, start, &path);
    }

    #[test]
    fn circuit_distance_to_predecessor_is_the_long_way() {
        let circuit = di_circuit(1000);
        let start = 0;
        let (_, predecessor) = circuit.incoming_neighbors(start)[0];

        let results = shortest_paths(&circuit, start, &[predecessor], unit_lengths());

        assert_eq!(results.distance(predecessor), Some(999.0));
        assert_eq!(results.path(predecessor).unwrap().len(), 999);
    }

    #[test]
    fn grid_distance_is_manhattan() {
        let (grid, index) = di_grid(&[10, 10, 10]);
        let start = index(&[0, 0, 0]);
        let end = index(&[9, 9, 9]);

        let results = shortest_paths(&grid, start, &[end], unit_lengths());

        assert_eq!(results.distance(end), Some(27.0));
        let path = results.path(end).unwrap();
        assert_eq!(path.len(), 27);
        assert_path_is_well_formed(&grid, start, &path);
    }

    #[test]
    fn unreachable_target_has_no_path() {
        // 0 -> 1 -> 2, and 3 -> 2 with nothing leading into 3
        let mut graph = DiGraph::with_vertices(4);
        graph.add_edge(0, 1).unwrap();
        graph.add_edge(1, 2).unwrap();
        graph.add_edge(3, 2).unwrap();

        let results = shortest_paths(&graph, 0, &[2, 3], unit_lengths());

        assert_eq!(results.distance(2), Some(2.0));
        assert_eq!(results.distance(3), None);
        assert_eq!(results.path(3), None);

        let paths = results.paths(&[2, 3]);
        assert_eq!(paths.len(), 1);
        assert!(paths.contains_key(&2));
    }

    #[test]
    fn source_path_is_empty() {
        let (path_graph, start, _) = di_path(3);
        let results = shortest_paths(&path_graph, start, &[start], unit_lengths());

        assert_eq!(results.distance(start), Some(0.0));
        assert_eq!(results.path(start), Some(vec![]));
        assert_eq!(results.ops(), 1);
    }

    #[test]
    fn early_exit_finalizes_fewer_vertices() {
        let (path_graph, start, end) = di_path(100);

        let full = shortest_paths(&path_graph, start, &[], unit_lengths());
        let partial = shortest_paths(&path_graph, start, &[10], unit_lengths());

        assert_eq!(full.ops(), 101);
        assert_eq!(full.distance(end), Some(100.0));
        assert_eq!(partial.distance(10), Some(10.0));
        assert_eq!(partial.ops(), 11);
        assert_eq!(partial.distance(end), None);
    }

    #[test]
    fn relaxation_prefers_the_cheaper_detour() {
        // 0 -> 1 directly costs 10, 0 -> 2 -> 1 costs 2 + 3
        let mut graph = DiGraph::with_vertices(3);
        let direct = graph.add_edge(0, 1).unwrap();
        let first_leg = graph.add_edge(0, 2).unwrap();
        let second_leg = graph.add_edge(2, 1).unwrap();
        let lengths = HashMap::from([(direct, 10.0), (first_leg, 2.0), (second_leg, 3.0)]);

        let results = shortest_paths(&graph, 0, &[1], lengths_from_map(&lengths));

        assert_eq!(results.distance(1), Some(5.0));
        assert_eq!(results.path(1), Some(vec![(first_leg, 2), (second_leg, 1)]));
    }

    #[test]
    fn impassable_edges_are_skipped() {
        let mut graph = DiGraph::with_vertices(2);
        let blocked = graph.add_edge(0, 1).unwrap();
        let lengths = HashMap::from([(blocked, f64::INFINITY)]);

        let results = shortest_paths(&graph, 0, &[1], lengths_from_map(&lengths));

        assert_eq!(results.distance(1), None);
        assert_eq!(results.path(1), None);
    }

    #[test]
    fn distances_from_covers_the_reachable_graph() {
        let (grid, index) = di_grid(&[5, 5]);
        let distances = distances_from(&grid, index(&[0, 0]), unit_lengths());

        assert_eq!(distances.len(), 25);
        assert_eq!(distances[&index(&[4, 4])], 8.0);
        assert_eq!(distances[&index(&[2, 3])], 5.0);
    }

    #[test]
    #[should_panic(expected = "negative or NaN length")]
    fn negative_length_into_a_finalized_vertex_panics() {
        // 0 -> 1 costs 1, 1 -> 0 costs -5 and leads back to the settled source
        let mut graph = DiGraph::with_vertices(2);
        let forward = graph.add_edge(0, 1).unwrap();
        let back = graph.add_edge(1, 0).unwrap();
        let lengths = HashMap::from([(forward, 1.0), (back, -5.0)]);

        shortest_paths(&graph, 0, &[], lengths_from_map(&lengths));
    }

    #[test]
    #[should_panic(expected = "negative or NaN length")]
    fn negative_length_panics() {
        let (path_graph, start, end) = di_path(2);
        shortest_paths(&path_graph, start, &[end], |_| -1.0);
    }
}
