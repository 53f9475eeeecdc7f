/// Helper function to create a goal function closure for exact vertex matching with a single goal vertex.
///
/// # Examples
/// ```rust
/// use graph_pathfinding::algorithms::astar::{shortest_path_on_graph, AStarOptions};
/// use graph_pathfinding::utils::digraph::di_path;
/// use graph_pathfinding::utils::goals::goal_exact_vertex;
/// use graph_pathfinding::utils::heuristics::heuristic_zero;
/// use graph_pathfinding::utils::lengths::unit_lengths;
///
/// let (graph, start, end) = di_path(4);
/// let result = shortest_path_on_graph(
///     &graph,
///     start,
///     goal_exact_vertex(end),
///     unit_lengths(),
///     heuristic_zero(),
///     AStarOptions::default(),
/// );
/// assert_eq!(result.map(|found| found.cost()), Ok(4.0));
/// ```
pub fn goal_exact_vertex<V: PartialEq + 'static>(goal: V) -> impl Fn(V) -> bool {
    move |vertex: V| vertex == goal
}

/// Helper function to create a goal function closure for exact vertex matching with multiple goal vertices.
///
/// The search stops at whichever goal it finalizes first, which is the nearest one.
pub fn goal_any_vertex<V: PartialEq>(goals: &[V]) -> impl Fn(V) -> bool + '_ {
    move |vertex: V| goals.contains(&vertex)
}
