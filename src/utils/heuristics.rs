use std::collections::HashMap;
use std::hash::Hash;

/// Helper function to create a heuristic that always estimates 0.
///
/// This is trivially admissible, and turns A* into Dijkstra's Algorithm.
pub fn heuristic_zero<V>() -> impl Fn(V) -> f64 {
    |_| 0.0
}

/// Helper function to create a heuristic closure that pulls estimates from a map.
///
/// Vertices missing from the map get an estimate of 0, which keeps the
/// heuristic admissible as long as every listed estimate is.
pub fn heuristic_from_map<V>(estimates: &HashMap<V, f64>) -> impl Fn(V) -> f64 + '_
where
    V: Eq + Hash,
{
    |vertex| estimates.get(&vertex).copied().unwrap_or(0.0)
}

/// Helper function to create a heuristic closure for multiple goal vertices.
///
/// The estimate is the minimum of `estimate(vertex, goal)` over every goal, so
/// it stays admissible if `estimate` is admissible for each goal on its own.
///
/// # Examples
/// ```rust
/// use graph_pathfinding::utils::heuristics::heuristic_min_over_goals;
///
/// // Vertices on a line, where the distance is the difference between ids
/// let goals = [10, 20];
/// let heuristic = heuristic_min_over_goals(&goals, |a: i32, b: i32| (a - b).abs() as f64);
///
/// assert_eq!(heuristic(12), 2.0);
/// assert_eq!(heuristic(18), 2.0);
/// assert_eq!(heuristic(30), 10.0);
/// ```
pub fn heuristic_min_over_goals<V, F>(goals: &[V], estimate: F) -> impl Fn(V) -> f64 + '_
where
    V: Copy,
    F: Fn(V, V) -> f64 + 'static,
{
    move |vertex: V| {
        goals
            .iter()
            .map(|goal| estimate(vertex, *goal))
            .min_by(|a, b| a.total_cmp(b))
            .unwrap_or(0.0)
    }
}
