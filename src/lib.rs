//! Shortest-path and best-first search over arbitrary graphs.
//!
//! The algorithms only need a read-only [GraphView](common::GraphView) of your
//! graph, or for A* an [AStarNode](algorithms::astar::AStarNode) state type, so
//! they work over implicit and infinite graphs as well as stored ones.

/// Provides common definitions used across the crate
pub mod common;

/// Provides the data structures the algorithms are built on
pub mod data_structures;

/// Provides individual algorithm implementations
pub mod algorithms;

/// Provides helper methods to simplify using algorithms
pub mod utils;
