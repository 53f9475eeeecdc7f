// https://en.wikipedia.org/wiki/Breadth-first_search

use std::collections::{HashSet, VecDeque};

use crate::common::traits::{Direction, GraphView};

/// Visits vertices in breadth-first order starting at `start`, following edges
/// in `direction`.
///
/// `visit` is called once per vertex with its hop count from `start`, as soon as
/// the vertex is discovered; `start` itself is visited first with 0. Returning
/// false from `visit` stops the traversal. Vertices more than `max_depth` hops
/// away are not visited.
///
/// Returns true if the traversal ran to completion, false if `visit` stopped it.
///
/// # Example
/// ```rust
/// use graph_pathfinding::algorithms::bfs::breadth_first_search;
/// use graph_pathfinding::common::Direction;
/// use graph_pathfinding::utils::digraph::di_path;
///
/// let (graph, first, _) = di_path(10);
/// let mut reached = Vec::new();
///
/// breadth_first_search(&graph, first, Direction::Outgoing, Some(3), |vertex, hops| {
///     reached.push((vertex, hops));
///     true
/// });
///
/// assert_eq!(reached, vec![(0, 0), (1, 1), (2, 2), (3, 3)]);
/// ```
pub fn breadth_first_search<G, F>(
    graph: &G,
    start: G::Vertex,
    direction: Direction,
    max_depth: Option<usize>,
    visit: F,
) -> bool
where
    G: GraphView,
    F: FnMut(G::Vertex, usize) -> bool,
{
    traverse(start, max_depth, |vertex| graph.neighbors(vertex, direction), visit)
}

/// Every vertex reachable from `start` in at most `hops` outgoing steps,
/// including `start`.
pub fn vertices_within_hops<G: GraphView>(
    graph: &G,
    start: G::Vertex,
    hops: usize,
) -> HashSet<G::Vertex> {
    let mut reached = HashSet::new();
    breadth_first_search(graph, start, Direction::Outgoing, Some(hops), |vertex, _| {
        reached.insert(vertex);
        true
    });
    reached
}

/// The weakly connected component containing `vertex`: everything reachable
/// when edge direction is ignored.
pub fn component_of<G: GraphView>(graph: &G, vertex: G::Vertex) -> HashSet<G::Vertex> {
    let mut component = HashSet::new();
    traverse(vertex, None, |v| undirected_neighbors(graph, v), |v, _| {
        component.insert(v);
        true
    });
    component
}

/// Whether all of `vertices` lie in the same weakly connected component.
///
/// An empty slice is trivially connected.
pub fn all_connected<G: GraphView>(graph: &G, vertices: &[G::Vertex]) -> bool {
    let Some(first) = vertices.first() else {
        return true;
    };

    let mut unvisited: HashSet<G::Vertex> = vertices.iter().copied().collect();
    traverse(*first, None, |v| undirected_neighbors(graph, v), |v, _| {
        unvisited.remove(&v);
        !unvisited.is_empty()
    });

    unvisited.is_empty()
}

/// Whether all of `vertices` lie in the same weakly connected component, and
/// that component also holds at least one vertex of `any_of`.
///
/// An empty `vertices` slice is trivially connected and needs no vertex of `any_of`.
pub fn all_connected_with_any<G: GraphView>(
    graph: &G,
    vertices: &[G::Vertex],
    any_of: &[G::Vertex],
) -> bool {
    let Some(first) = vertices.first() else {
        return true;
    };

    let mut unvisited: HashSet<G::Vertex> = vertices.iter().copied().collect();
    let wanted: HashSet<G::Vertex> = any_of.iter().copied().collect();
    let mut found_any = false;

    traverse(*first, None, |v| undirected_neighbors(graph, v), |v, _| {
        unvisited.remove(&v);
        found_any |= wanted.contains(&v);
        !(unvisited.is_empty() && found_any)
    });

    unvisited.is_empty() && found_any
}

/// Partitions `vertices` into weakly connected components.
///
/// Components come out in the order of their first vertex in `vertices`, and
/// each lists its vertices in breadth-first order from that vertex. Vertices
/// reachable from `vertices` but not listed in it are still included in their
/// component.
///
/// # Example
/// ```rust
/// use graph_pathfinding::algorithms::bfs::components;
/// use graph_pathfinding::utils::digraph::DiGraph;
///
/// let mut graph = DiGraph::with_vertices(5);
/// graph.add_edge(1, 0).unwrap();
/// graph.add_edge(3, 4).unwrap();
///
/// let parts = components(&graph, graph.vertices());
/// assert_eq!(parts, vec![vec![0, 1], vec![2], vec![3, 4]]);
/// ```
pub fn components<G, I>(graph: &G, vertices: I) -> Vec<Vec<G::Vertex>>
where
    G: GraphView,
    I: IntoIterator<Item = G::Vertex>,
{
    let mut assigned = HashSet::new();
    let mut parts = Vec::new();

    for start in vertices {
        if assigned.contains(&start) {
            continue;
        }

        let mut component = Vec::new();
        traverse(start, None, |v| undirected_neighbors(graph, v), |v, _| {
            assigned.insert(v);
            component.push(v);
            true
        });
        parts.push(component);
    }

    parts
}

/// Whether every vertex of `vertices` is in one weakly connected component.
///
/// A graph with no vertices is connected.
pub fn is_connected<G, I>(graph: &G, vertices: I) -> bool
where
    G: GraphView,
    I: IntoIterator<Item = G::Vertex>,
{
    components(graph, vertices).len() <= 1
}

fn undirected_neighbors<G: GraphView>(graph: &G, vertex: G::Vertex) -> Vec<(G::Edge, G::Vertex)> {
    let mut neighbors = graph.outgoing_neighbors(vertex);
    neighbors.extend(graph.incoming_neighbors(vertex));
    neighbors
}

fn traverse<V, E, N, F>(start: V, max_depth: Option<usize>, neighbors: N, mut visit: F) -> bool
where
    V: Copy + Eq + std::hash::Hash,
    N: Fn(V) -> Vec<(E, V)>,
    F: FnMut(V, usize) -> bool,
{
    let max_depth = max_depth.unwrap_or(usize::MAX);
    let mut discovered = HashSet::new();
    let mut queue = VecDeque::new();

    discovered.insert(start);
    if !visit(start, 0) {
        return false;
    }
    queue.push_back((start, 0));

    while let Some((vertex, hops)) = queue.pop_front() {
        if hops >= max_depth {
            continue;
        }

        for (_, neighbor) in neighbors(vertex) {
            if !discovered.insert(neighbor) {
                continue;
            }
            if !visit(neighbor, hops + 1) {
                return false;
            }
            queue.push_back((neighbor, hops + 1));
        }
    }

    true
}
