use std::collections::HashMap;
use std::hash::Hash;

/// Builds a length function where every edge has length 1.
///
/// With unit lengths, shortest distances are hop counts.
pub fn unit_lengths<E>() -> impl Fn(E) -> f64 {
    |_| 1.0
}

/// Builds a length function closure that pulls lengths from a map keyed by edge.
///
/// Edges missing from the map are treated as impassable and get `f64::INFINITY`,
/// which the search algorithms skip.
///
/// # Example
/// ```rust
/// use std::collections::HashMap;
/// use graph_pathfinding::utils::lengths::lengths_from_map;
///
/// let lengths = HashMap::from([(0, 2.5), (1, 4.0)]);
/// let length_fn = lengths_from_map(&lengths);
///
/// assert_eq!(length_fn(0), 2.5);
/// assert_eq!(length_fn(7), f64::INFINITY);
/// ```
pub fn lengths_from_map<E>(lengths: &HashMap<E, f64>) -> impl Fn(E) -> f64 + '_
where
    E: Eq + Hash,
{
    |edge| match lengths.get(&edge) {
        Some(length) => *length,
        None => f64::INFINITY,
    }
}
