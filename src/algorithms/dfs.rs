// https://en.wikipedia.org/wiki/Depth-first_search

use std::collections::HashSet;

use crate::common::traits::{Direction, GraphView};

/// Visits vertices in depth-first preorder starting at `start`, following
/// edges in `direction`.
///
/// Neighbors are explored in the order the graph lists them. `visit` is called
/// once per vertex with its depth in the search tree; `start` is visited first
/// with 0. Returning false from `visit` stops the search. Vertices are not
/// expanded past `max_depth`, so with a limit a vertex first reached along a
/// long branch may hide shallower vertices behind it.
///
/// Returns true if the search ran to completion, false if `visit` stopped it.
///
/// # Example
/// ```rust
/// use graph_pathfinding::algorithms::dfs::depth_first_search;
/// use graph_pathfinding::common::Direction;
/// use graph_pathfinding::utils::digraph::DiGraph;
///
/// // 0 -> 1 -> 3, and 0 -> 2
/// let mut graph = DiGraph::with_vertices(4);
/// graph.add_edge(0, 1).unwrap();
/// graph.add_edge(0, 2).unwrap();
/// graph.add_edge(1, 3).unwrap();
///
/// let mut order = Vec::new();
/// depth_first_search(&graph, 0, Direction::Outgoing, None, |vertex, _| {
///     order.push(vertex);
///     true
/// });
///
/// assert_eq!(order, vec![0, 1, 3, 2]);
/// ```
pub fn depth_first_search<G, F>(
    graph: &G,
    start: G::Vertex,
    direction: Direction,
    max_depth: Option<usize>,
    mut visit: F,
) -> bool
where
    G: GraphView,
    F: FnMut(G::Vertex, usize) -> bool,
{
    let max_depth = max_depth.unwrap_or(usize::MAX);
    let mut visited = HashSet::new();
    let mut stack = vec![(start, 0)];

    while let Some((vertex, depth)) = stack.pop() {
        if !visited.insert(vertex) {
            continue;
        }
        if !visit(vertex, depth) {
            return false;
        }
        if depth >= max_depth {
            continue;
        }

        // Reversed so the first listed neighbor is on top of the stack
        for (_, neighbor) in graph.neighbors(vertex, direction).into_iter().rev() {
            if !visited.contains(&neighbor) {
                stack.push((neighbor, depth + 1));
            }
        }
    }

    true
}

/// Every vertex reachable from `start` along outgoing edges, including `start`.
pub fn reachable_from<G: GraphView>(graph: &G, start: G::Vertex) -> HashSet<G::Vertex> {
    let mut reached = HashSet::new();
    depth_first_search(graph, start, Direction::Outgoing, None, |vertex, _| {
        reached.insert(vertex);
        true
    });
    reached
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::utils::digraph::{di_circuit, di_path, DiGraph};

    // Helper Functions

    fn order_from(graph: &DiGraph, start: usize, max_depth: Option<usize>) -> Vec<(usize, usize)> {
        let mut order = Vec::new();
        depth_first_search(graph, start, Direction::Outgoing, max_depth, |vertex, depth| {
            order.push((vertex, depth));
            true
        });
        order
    }

    // Test Cases

    #[test]
    fn branches_are_finished_before_siblings() {
        // 0 -> {1, 4}, 1 -> {2, 3}
        let mut graph = DiGraph::with_vertices(5);
        graph.add_edge(0, 1).unwrap();
        graph.add_edge(0, 4).unwrap();
        graph.add_edge(1, 2).unwrap();
        graph.add_edge(1, 3).unwrap();

        assert_eq!(
            order_from(&graph, 0, None),
            vec![(0, 0), (1, 1), (2, 2), (3, 2), (4, 1)]
        );
    }

    #[test]
    fn max_depth_limits_expansion() {
        let (graph, first, _) = di_path(10);
        assert_eq!(order_from(&graph, first, Some(2)), vec![(0, 0), (1, 1), (2, 2)]);
        assert_eq!(order_from(&graph, first, Some(0)), vec![(0, 0)]);
    }

    #[test]
    fn each_vertex_is_visited_once_on_a_cycle() {
        let circuit = di_circuit(6);
        let order = order_from(&circuit, 3, None);

        assert_eq!(order.len(), 6);
        assert_eq!(order.last(), Some(&(2, 5)));
    }

    #[test]
    fn visit_can_stop_the_search() {
        let (graph, first, _) = di_path(10);
        let mut seen = 0;

        let completed = depth_first_search(&graph, first, Direction::Outgoing, None, |_, _| {
            seen += 1;
            seen < 3
        });

        assert!(!completed);
        assert_eq!(seen, 3);
    }

    #[test]
    fn incoming_direction_and_reachability() {
        let (graph, _, last) = di_path(4);

        let mut backwards = Vec::new();
        depth_first_search(&graph, last, Direction::Incoming, None, |vertex, _| {
            backwards.push(vertex);
            true
        });
        assert_eq!(backwards, vec![4, 3, 2, 1, 0]);

        assert_eq!(reachable_from(&graph, 2), HashSet::from([2, 3, 4]));
        assert_eq!(reachable_from(&graph, last), HashSet::from([last]));
    }
}
