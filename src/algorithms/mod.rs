/// Provides methods for pathfinding using the A* algorithm.
///
/// You most likely want to start with one of the following:
/// - [shortest_path_on_graph](crate::algorithms::astar::shortest_path_on_graph)
/// - [AStarSearch](crate::algorithms::astar::AStarSearch), for implicit state spaces
pub mod astar;

/// Provides breadth-first traversal and connectivity checks
pub mod bfs;

/// Provides depth-first traversal
pub mod dfs;

/// Provides methods for pathfinding using Dijkstra's Shortest Paths algorithm
pub mod dijkstra;

/// Provides greedy multi-target routing and bounded transitive closure built on Dijkstra
pub mod routes;
