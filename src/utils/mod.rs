/// A reference adjacency-list graph and generators for common shapes
pub mod digraph;

/// Goal predicates for A*
pub mod goals;

/// Heuristic functions for A*
pub mod heuristics;

/// Edge length functions
pub mod lengths;
