use std::collections::{BTreeSet, HashMap, HashSet};

use serde::{Deserialize, Serialize};
use tracing::debug;

use crate::algorithms::dijkstra::shortest_paths;
use crate::common::traits::GraphView;
use crate::data_structures::OpenMinSet;

/// Which vertex a [greedy_tour] moves to next.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum TourOrder {
    /// The closest unvisited vertex.
    Nearest,
    /// The most distant reachable unvisited vertex.
    Farthest,
}

/// A walk through a set of vertices, built from shortest paths between them.
#[derive(Debug, Clone, PartialEq)]
pub struct Tour<V, E> {
    cost: f64,
    stops: Vec<V>,
    path: Vec<(E, V)>,
}

impl<V, E> Tour<V, E> {
    /// Total length of the walk
    pub fn cost(&self) -> f64 {
        self.cost
    }

    /// The visited vertices, in the order they were reached
    pub fn stops(&self) -> &[V] {
        &self.stops
    }

    /// `(edge, vertex)` steps of the whole walk
    pub fn path(&self) -> &[(E, V)] {
        &self.path
    }
}

/// Builds a walk from `from` through every vertex of `visiting`, repeatedly
/// moving along a shortest path to the nearest (or farthest) unvisited vertex.
///
/// This is a heuristic, not an optimal tour. Ties are broken towards the
/// smaller vertex. Returns None if some vertex of `visiting` can't be reached.
///
/// # Example
/// ```rust
/// use graph_pathfinding::algorithms::routes::{greedy_tour, TourOrder};
/// use graph_pathfinding::utils::digraph::di_grid;
/// use graph_pathfinding::utils::lengths::unit_lengths;
///
/// let (grid, index) = di_grid(&[5, 5]);
/// let stops = [index(&[4, 4]), index(&[1, 0]), index(&[3, 0])];
///
/// let tour = greedy_tour(&grid, index(&[0, 0]), &stops, unit_lengths(), TourOrder::Nearest).unwrap();
///
/// assert_eq!(tour.stops(), &[index(&[1, 0]), index(&[3, 0]), index(&[4, 4])]);
/// assert_eq!(tour.cost(), 8.0);
/// assert_eq!(tour.path().len(), 8);
/// ```
pub fn greedy_tour<G, L>(
    graph: &G,
    from: G::Vertex,
    visiting: &[G::Vertex],
    lengths: L,
    order: TourOrder,
) -> Option<Tour<G::Vertex, G::Edge>>
where
    G: GraphView,
    L: Fn(G::Edge) -> f64,
{
    let mut unvisited: BTreeSet<G::Vertex> = visiting.iter().copied().collect();
    let mut tour = Tour {
        cost: 0.0,
        stops: Vec::with_capacity(unvisited.len()),
        path: Vec::new(),
    };
    let mut current = from;

    while !unvisited.is_empty() {
        let targets: Vec<G::Vertex> = unvisited.iter().copied().collect();
        let results = shortest_paths(graph, current, &targets, &lengths);

        // BTreeSet iteration is ascending, so keeping only strict improvements
        // breaks ties towards the smaller vertex
        let mut chosen: Option<(G::Vertex, f64)> = None;
        for vertex in &unvisited {
            let Some(distance) = results.distance(*vertex) else {
                continue;
            };
            let better = match (chosen, order) {
                (None, _) => true,
                (Some((_, best)), TourOrder::Nearest) => distance < best,
                (Some((_, best)), TourOrder::Farthest) => distance > best,
            };
            if better {
                chosen = Some((*vertex, distance));
            }
        }

        let Some((next, distance)) = chosen else {
            debug!(
                ?current,
                remaining = unvisited.len(),
                "greedy tour: remaining vertices are unreachable"
            );
            return None;
        };

        tour.path.extend(results.path(next)?);
        tour.cost += distance;
        tour.stops.push(next);
        unvisited.remove(&next);
        current = next;
    }

    Some(tour)
}

/// The shortest distance between one vertex of a start group and one of an end group.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct GroupDistance<V> {
    pub start: V,
    pub end: V,
    /// None if `end` is unreachable from `start`
    pub distance: Option<f64>,
}

/// Shortest distances from every vertex of `starts` to every vertex of `ends`.
///
/// Runs one Dijkstra search per start vertex. Results are ordered by start,
/// then by end, following the input order.
pub fn group_distances<G, L>(
    graph: &G,
    starts: &[G::Vertex],
    ends: &[G::Vertex],
    lengths: L,
) -> Vec<GroupDistance<G::Vertex>>
where
    G: GraphView,
    L: Fn(G::Edge) -> f64,
{
    let mut distances = Vec::with_capacity(starts.len() * ends.len());

    for start in starts {
        let results = shortest_paths(graph, *start, ends, &lengths);
        distances.extend(ends.iter().map(|end| GroupDistance {
            start: *start,
            end: *end,
            distance: results.distance(*end),
        }));
    }

    distances
}

/// Greedily pairs vertices of `starts` with vertices of `ends`, cheapest pair first.
///
/// Each vertex is used at most as many times as it appears in its group. Pairs
/// with equal distance are taken in [group_distances] order, and unreachable
/// pairs are never matched. The result is ordered by increasing distance.
///
/// This is not a minimum-cost matching; it just never skips a cheaper
/// available pair for a more expensive one.
pub fn greedy_group_matching<G, L>(
    graph: &G,
    starts: &[G::Vertex],
    ends: &[G::Vertex],
    lengths: L,
) -> Vec<GroupDistance<G::Vertex>>
where
    G: GraphView,
    L: Fn(G::Edge) -> f64,
{
    let candidates = group_distances(graph, starts, ends, lengths);

    // Score is (distance, position in `candidates`), so equal distances keep input order
    let mut open: OpenMinSet<usize, (f64, usize)> = candidates
        .iter()
        .enumerate()
        .filter_map(|(index, pair)| pair.distance.map(|distance| (index, (distance, index))))
        .collect();

    let mut unmatched_starts = count_occurrences(starts);
    let mut unmatched_ends = count_occurrences(ends);
    let mut matching = Vec::new();

    while let Some(index) = open.pop() {
        let pair = candidates[index];
        if is_left(&unmatched_starts, &pair.start) && is_left(&unmatched_ends, &pair.end) {
            take_one(&mut unmatched_starts, &pair.start);
            take_one(&mut unmatched_ends, &pair.end);
            matching.push(pair);
        }
    }

    matching
}

/// A pair of vertices close enough to be joined by a shortcut edge.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct TransitivePair<V> {
    pub start: V,
    pub end: V,
    pub distance: f64,
}

/// Pairs of distinct vertices of `vertices` whose shortest distance is at most
/// `max_distance` but which have no direct edge between them.
///
/// These are the edges a bounded transitive closure would add. Each is reported
/// once per direction, ordered by start and then end following `vertices`.
/// Runs one Dijkstra search per vertex.
///
/// # Example
/// ```rust
/// use graph_pathfinding::algorithms::routes::transitive_pairs;
/// use graph_pathfinding::utils::digraph::di_path;
/// use graph_pathfinding::utils::lengths::unit_lengths;
///
/// let (graph, _, _) = di_path(3);
/// let shortcuts = transitive_pairs(&graph, &[0, 1, 2, 3], 2.0, unit_lengths());
///
/// let pairs: Vec<(usize, usize)> = shortcuts.iter().map(|pair| (pair.start, pair.end)).collect();
/// assert_eq!(pairs, vec![(0, 2), (1, 3)]);
/// ```
pub fn transitive_pairs<G, L>(
    graph: &G,
    vertices: &[G::Vertex],
    max_distance: f64,
    lengths: L,
) -> Vec<TransitivePair<G::Vertex>>
where
    G: GraphView,
    L: Fn(G::Edge) -> f64,
{
    let mut pairs = Vec::new();

    for start in vertices {
        let results = shortest_paths(graph, *start, &[], &lengths);
        let direct: HashSet<G::Vertex> = graph
            .outgoing_neighbors(*start)
            .into_iter()
            .map(|(_, end)| end)
            .collect();

        for end in vertices {
            if end == start || direct.contains(end) {
                continue;
            }
            match results.distance(*end) {
                Some(distance) if distance <= max_distance => pairs.push(TransitivePair {
                    start: *start,
                    end: *end,
                    distance,
                }),
                _ => {}
            }
        }
    }

    debug!(pairs = pairs.len(), max_distance, "transitive pairs collected");
    pairs
}

fn count_occurrences<V: Copy + Eq + std::hash::Hash>(vertices: &[V]) -> HashMap<V, usize> {
    let mut counts = HashMap::new();
    for vertex in vertices {
        *counts.entry(*vertex).or_insert(0) += 1;
    }
    counts
}

fn is_left<V: Eq + std::hash::Hash>(counts: &HashMap<V, usize>, vertex: &V) -> bool {
    counts.get(vertex).is_some_and(|count| *count > 0)
}

fn take_one<V: Eq + std::hash::Hash>(counts: &mut HashMap<V, usize>, vertex: &V) {
    if let Some(count) = counts.get_mut(vertex) {
        *count = count.saturating_sub(1);
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::utils::digraph::{di_circuit, di_path, DiGraph};
    use crate::utils::lengths::unit_lengths;

    // Helper Functions

    fn pairs(matching: &[GroupDistance<usize>]) -> Vec<(usize, usize)> {
        matching.iter().map(|pair| (pair.start, pair.end)).collect()
    }

    // Test Cases

    #[test]
    fn nearest_and_farthest_tours_on_a_path() {
        let (graph, first, _) = di_path(10);

        let nearest = greedy_tour(&graph, first, &[7, 3, 5], unit_lengths(), TourOrder::Nearest).unwrap();
        assert_eq!(nearest.stops(), &[3, 5, 7]);
        assert_eq!(nearest.cost(), 7.0);

        // Farthest jumps to 7 first, after which 3 and 5 are behind it on a one-way path
        let farthest = greedy_tour(&graph, first, &[7, 3, 5], unit_lengths(), TourOrder::Farthest);
        assert_eq!(farthest, None);
    }

    #[test]
    fn farthest_tour_on_a_circuit() {
        let circuit = di_circuit(10);
        let tour = greedy_tour(&circuit, 0, &[2, 8], unit_lengths(), TourOrder::Farthest).unwrap();

        assert_eq!(tour.stops(), &[8, 2]);
        assert_eq!(tour.cost(), 8.0 + 4.0);
        assert_eq!(tour.path().len(), 12);
        assert_eq!(tour.path().last().map(|(_, vertex)| *vertex), Some(2));
    }

    #[test]
    fn empty_tour_stays_put() {
        let (graph, first, _) = di_path(3);
        let tour = greedy_tour(&graph, first, &[], unit_lengths(), TourOrder::Nearest).unwrap();

        assert_eq!(tour.cost(), 0.0);
        assert!(tour.stops().is_empty());
        assert!(tour.path().is_empty());
    }

    #[test]
    fn group_distances_cover_every_pair() {
        let (graph, _, _) = di_path(4);
        let distances = group_distances(&graph, &[0, 2], &[3, 1], unit_lengths());

        let flat: Vec<(usize, usize, Option<f64>)> = distances
            .iter()
            .map(|pair| (pair.start, pair.end, pair.distance))
            .collect();
        assert_eq!(
            flat,
            vec![
                (0, 3, Some(3.0)),
                (0, 1, Some(1.0)),
                (2, 3, Some(1.0)),
                (2, 1, None),
            ]
        );
    }

    #[test]
    fn matching_takes_cheapest_pairs_first() {
        let (graph, _, _) = di_path(10);
        let matching = greedy_group_matching(&graph, &[0, 5], &[6, 2], unit_lengths());

        // 5 -> 6 costs 1, then 0 -> 2 costs 2; 5 can't reach 2
        assert_eq!(pairs(&matching), vec![(5, 6), (0, 2)]);
        assert_eq!(matching[0].distance, Some(1.0));
        assert_eq!(matching[1].distance, Some(2.0));
    }

    #[test]
    fn matching_respects_multiplicity_and_ties() {
        // A star: 0 -> 1, 0 -> 2, 0 -> 3, all unit length
        let mut graph = DiGraph::with_vertices(4);
        for end in 1..4 {
            graph.add_edge(0, end).unwrap();
        }

        let matching = greedy_group_matching(&graph, &[0, 0], &[3, 1, 2], unit_lengths());

        // Two copies of 0 match the first two ends in input order
        assert_eq!(pairs(&matching), vec![(0, 3), (0, 1)]);
    }

    #[test]
    fn matching_does_not_use_up_a_start_on_a_taken_end() {
        // Both starts reach end 1 in one step; end 3 is reachable only from 0
        let mut graph = DiGraph::with_vertices(4);
        graph.add_edge(2, 1).unwrap();
        graph.add_edge(0, 1).unwrap();
        graph.add_edge(0, 3).unwrap();
        graph.add_edge(3, 1).unwrap();

        let matching = greedy_group_matching(&graph, &[2, 0], &[1, 3], unit_lengths());

        // 2 -> 1 goes first, then 0 -> 1 is skipped since 1 is taken, leaving 0 -> 3
        assert_eq!(pairs(&matching), vec![(2, 1), (0, 3)]);
    }

    #[test]
    fn transitive_pairs_respect_the_distance_bound() {
        let circuit = di_circuit(5);
        let everything: Vec<usize> = circuit.vertices().collect();

        let within_two = transitive_pairs(&circuit, &everything, 2.0, unit_lengths());
        let flat: Vec<(usize, usize, f64)> = within_two
            .iter()
            .map(|pair| (pair.start, pair.end, pair.distance))
            .collect();
        assert_eq!(
            flat,
            vec![(0, 2, 2.0), (1, 3, 2.0), (2, 4, 2.0), (3, 0, 2.0), (4, 1, 2.0)]
        );

        // Every non-adjacent ordered pair is within 4 on a 5-circuit
        let within_four = transitive_pairs(&circuit, &everything, 4.0, unit_lengths());
        assert_eq!(within_four.len(), 5 * 3);

        assert!(transitive_pairs(&circuit, &everything, 1.0, unit_lengths()).is_empty());
    }

    #[test]
    fn transitive_pairs_only_consider_listed_vertices() {
        // 0 -> 1 -> 2 with 1 left out of the list; 2 -> 0 is already direct
        let mut graph = DiGraph::with_vertices(3);
        graph.add_edge(0, 1).unwrap();
        graph.add_edge(1, 2).unwrap();
        graph.add_edge(2, 0).unwrap();

        let pairs = transitive_pairs(&graph, &[0, 2], 10.0, unit_lengths());
        assert_eq!(
            pairs,
            vec![TransitivePair {
                start: 0,
                end: 2,
                distance: 2.0
            }]
        );
    }

    #[test]
    fn matching_skips_unreachable_pairs() {
        let (graph, _, _) = di_path(3);
        let matching = greedy_group_matching(&graph, &[3], &[0], unit_lengths());
        assert!(matching.is_empty());
    }
}
