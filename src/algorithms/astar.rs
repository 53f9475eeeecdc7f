// https://en.wikipedia.org/wiki/A*_search_algorithm

use std::collections::{HashMap, HashSet};
use std::fmt;
use std::hash::{Hash, Hasher};

use serde::{Deserialize, Serialize};
use thiserror::Error;
use tracing::{debug, debug_span, trace};

use crate::common::traits::GraphView;
use crate::data_structures::OpenMinSet;

/// A simple trait encapsulating what a search state must provide to be
/// usable in A*.
///
/// Nodes are generated lazily from [neighbor](AStarNode::neighbor), so the
/// state space can be implicit or even infinite. The same logical state reached
/// along different action sequences must compare equal and hash the same, or
/// it will be expanded more than once.
pub trait AStarNode: Eq + Hash + Clone {
    type Action: Clone;

    /// The actions that can be taken from this state.
    fn outgoing_actions(&self) -> Vec<Self::Action>;

    /// The state reached by taking `action`, and the non-negative cost of doing so.
    ///
    /// Returning None skips the action.
    fn neighbor(&self, action: &Self::Action) -> Option<(Self, f64)>;

    /// An estimate of the remaining cost to the nearest goal.
    ///
    /// This must never overestimate for the result to be optimal; the search
    /// trusts it and does not check.
    fn heuristic(&self) -> f64;

    /// Whether this state is a goal.
    fn is_goal(&self) -> bool;
}

/// Limits and intervals for a single A* search.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct AStarOptions {
    /// Abort once the closed set or the frontier holds more nodes than this.
    pub max_frontier: usize,

    /// Poll the continuation predicate every this many iterations.
    pub check_every: usize,

    /// Emit a progress trace event every this many iterations.
    pub progress_every: usize,
}

impl Default for AStarOptions {
    fn default() -> Self {
        Self {
            max_frontier: 2_000_000,
            check_every: 1,
            progress_every: 100,
        }
    }
}

impl AStarOptions {
    /// Builder: set the maximum closed set and frontier size.
    #[must_use]
    pub fn max_frontier(mut self, max_frontier: usize) -> Self {
        self.max_frontier = max_frontier;
        self
    }

    /// Builder: set the cancellation polling interval. 0 is treated as 1.
    #[must_use]
    pub fn check_every(mut self, iterations: usize) -> Self {
        self.check_every = iterations;
        self
    }

    /// Builder: set the progress trace interval. 0 is treated as 1.
    #[must_use]
    pub fn progress_every(mut self, iterations: usize) -> Self {
        self.progress_every = iterations;
        self
    }
}

/// Counters collected while searching.
#[derive(Debug, Clone, Copy, PartialEq, Default, Serialize, Deserialize)]
pub struct AStarLog {
    /// Nodes popped and closed
    pub iterations: usize,
    /// Actions examined while expanding nodes
    pub inner_iterations: usize,
    pub closed_set_size: usize,
    /// The largest the frontier got
    pub max_frontier_size: usize,
    /// f-score of the goal node, if one was reached
    pub final_f_score: Option<f64>,
    /// g-score of the goal node, if one was reached
    pub final_cost: Option<f64>,
}

impl fmt::Display for AStarLog {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(
            f,
            "iterations: {}, inner iterations: {}, closed set: {}, max frontier: {}",
            self.iterations, self.inner_iterations, self.closed_set_size, self.max_frontier_size
        )?;
        if let (Some(f_score), Some(cost)) = (self.final_f_score, self.final_cost) {
            write!(f, ", f-score: {f_score}, cost: {cost}")?;
        }
        Ok(())
    }
}

/// Ways an A* search can end without a solution.
#[derive(Debug, Clone, PartialEq, Error)]
pub enum AStarError {
    /// The continuation predicate asked the search to stop.
    #[error("search cancelled ({log})")]
    Cancelled { log: AStarLog },

    /// The closed set or frontier grew past the configured limit.
    #[error("search exceeded the frontier limit of {limit} ({log})")]
    FrontierExhausted { limit: usize, log: AStarLog },

    /// Every reachable node was expanded without finding a goal.
    #[error("no goal is reachable ({log})")]
    NoSolution { log: AStarLog },
}

impl AStarError {
    /// The counters collected up to the point the search ended
    pub fn log(&self) -> &AStarLog {
        match self {
            AStarError::Cancelled { log }
            | AStarError::FrontierExhausted { log, .. }
            | AStarError::NoSolution { log } => log,
        }
    }
}

#[derive(Debug, Clone)]
pub struct AStarSolution<N>
where
    N: AStarNode,
{
    solution: N,
    path: Vec<N::Action>,
    cost: f64,
    log: AStarLog,
}

impl<N: AStarNode> AStarSolution<N> {
    /// The goal node that was reached
    pub fn solution(&self) -> &N {
        &self.solution
    }

    /// The actions leading from the initial node to the goal node
    pub fn path(&self) -> &[N::Action] {
        &self.path
    }

    /// The cost of the path
    pub fn cost(&self) -> f64 {
        self.cost
    }

    pub fn log(&self) -> &AStarLog {
        &self.log
    }

    pub fn into_parts(self) -> (N, Vec<N::Action>, f64, AStarLog) {
        (self.solution, self.path, self.cost, self.log)
    }
}

type Prune<'a, N> = Box<dyn Fn(&N) -> bool + 'a>;
type Continue<'a> = Box<dyn FnMut() -> bool + 'a>;

/// A configured A* search, run with [run](AStarSearch::run).
///
/// # Example
/// ```rust
/// use graph_pathfinding::algorithms::astar::{AStarError, AStarNode, AStarSearch};
///
/// // Count up from 0 towards 10 in steps of 1 or 3.
/// #[derive(Clone, PartialEq, Eq, Hash)]
/// struct Counter(u32);
///
/// impl AStarNode for Counter {
///     type Action = u32;
///
///     fn outgoing_actions(&self) -> Vec<u32> {
///         vec![1, 3]
///     }
///
///     fn neighbor(&self, step: &u32) -> Option<(Self, f64)> {
///         (self.0 + step <= 10).then(|| (Counter(self.0 + step), 1.0))
///     }
///
///     fn heuristic(&self) -> f64 {
///         ((10 - self.0) as f64 / 3.0).ceil()
///     }
///
///     fn is_goal(&self) -> bool {
///         self.0 == 10
///     }
/// }
///
/// let found = AStarSearch::new(Counter(0)).run().unwrap();
/// assert_eq!(found.cost(), 4.0);
///
/// let cancelled = AStarSearch::new(Counter(0)).continue_while(|| false).run();
/// assert!(matches!(cancelled, Err(AStarError::Cancelled { .. })));
/// ```
pub struct AStarSearch<'a, N: AStarNode> {
    initial: N,
    prune: Option<Prune<'a, N>>,
    should_continue: Option<Continue<'a>>,
    options: AStarOptions,
}

impl<'a, N: AStarNode> AStarSearch<'a, N> {
    pub fn new(initial: N) -> Self {
        Self {
            initial,
            prune: None,
            should_continue: None,
            options: AStarOptions::default(),
        }
    }

    /// Builder: discard popped nodes matching `prune` without expanding them.
    #[must_use]
    pub fn prune(mut self, prune: impl Fn(&N) -> bool + 'a) -> Self {
        self.prune = Some(Box::new(prune));
        self
    }

    /// Builder: poll `should_continue` every
    /// [check_every](AStarOptions::check_every) iterations, cancelling the
    /// search when it returns false.
    #[must_use]
    pub fn continue_while(mut self, should_continue: impl FnMut() -> bool + 'a) -> Self {
        self.should_continue = Some(Box::new(should_continue));
        self
    }

    /// Builder: replace all options.
    #[must_use]
    pub fn options(mut self, options: AStarOptions) -> Self {
        self.options = options;
        self
    }

    /// Builder: set the maximum closed set and frontier size.
    #[must_use]
    pub fn max_frontier(mut self, max_frontier: usize) -> Self {
        self.options.max_frontier = max_frontier;
        self
    }

    /// Builder: set the cancellation polling interval.
    #[must_use]
    pub fn check_every(mut self, iterations: usize) -> Self {
        self.options.check_every = iterations;
        self
    }

    /// Runs the search until a goal node is popped, the frontier empties, the
    /// frontier limit is exceeded, or the search is cancelled.
    ///
    /// Among nodes with equal f-scores, the one inserted into the frontier
    /// first is expanded first, so results are reproducible.
    pub fn run(self) -> Result<AStarSolution<N>, AStarError> {
        let AStarSearch {
            initial,
            prune,
            mut should_continue,
            options,
        } = self;

        let check_every = options.check_every.max(1);
        let progress_every = options.progress_every.max(1);

        let span = debug_span!("astar", max_frontier = options.max_frontier, check_every);
        let _enter = span.enter();

        let mut closed: HashSet<N> = HashSet::new();
        let mut g_score: HashMap<N, f64> = HashMap::new();
        let mut predecessors: HashMap<N, (N, N::Action)> = HashMap::new();

        // Scores are (f_score, insertion order), so equal f-scores pop first in, first out
        let mut open: OpenMinSet<N, (f64, u64)> = OpenMinSet::new();
        let mut insertion_order: u64 = 0;
        let mut log = AStarLog::default();

        let initial_f_score = initial.heuristic();
        g_score.insert(initial.clone(), 0.0);
        open.push(initial, (initial_f_score, insertion_order));
        insertion_order += 1;

        while let Some((current, (f_score, _))) = open.pop_with_score() {
            let cost = g_score[&current];
            log.max_frontier_size = log.max_frontier_size.max(open.len() + 1);
            log.closed_set_size = closed.len();

            if closed.len() > options.max_frontier || open.len() > options.max_frontier {
                debug!(
                    iterations = log.iterations,
                    closed = closed.len(),
                    frontier = open.len(),
                    "frontier limit exceeded, giving up"
                );
                return Err(AStarError::FrontierExhausted {
                    limit: options.max_frontier,
                    log,
                });
            }

            if log.iterations % progress_every == 0 {
                trace!(
                    iteration = log.iterations,
                    closed = closed.len(),
                    frontier = open.len(),
                    f_score,
                    cost,
                    "astar progress"
                );
            }

            if log.iterations % check_every == 0 {
                if let Some(should_continue) = should_continue.as_mut() {
                    if !should_continue() {
                        debug!(iterations = log.iterations, "search cancelled");
                        return Err(AStarError::Cancelled { log });
                    }
                }
            }

            // Goal nodes only count once popped; a cheaper path could still
            // have been found while they sat in the frontier
            if current.is_goal() {
                log.final_f_score = Some(f_score);
                log.final_cost = Some(cost);
                debug!(
                    iterations = log.iterations,
                    inner_iterations = log.inner_iterations,
                    closed = log.closed_set_size,
                    max_frontier = log.max_frontier_size,
                    cost,
                    "goal reached"
                );

                let path = reconstruct_path(&predecessors, &current);
                return Ok(AStarSolution {
                    solution: current,
                    path,
                    cost,
                    log,
                });
            }

            closed.insert(current.clone());
            log.closed_set_size = closed.len();
            log.iterations += 1;

            if let Some(prune) = prune.as_ref() {
                if prune(&current) {
                    continue;
                }
            }

            for action in current.outgoing_actions() {
                log.inner_iterations += 1;

                let Some((neighbor, transition_cost)) = current.neighbor(&action) else {
                    continue;
                };

                assert!(
                    transition_cost >= 0.0,
                    "astar: transition cost {transition_cost} is negative or NaN"
                );

                if closed.contains(&neighbor) {
                    continue;
                }

                let tentative_g_score = cost + transition_cost;
                let improves = match g_score.get(&neighbor) {
                    Some(known) => tentative_g_score < *known,
                    None => true,
                };
                if !improves {
                    continue;
                }

                let neighbor_f_score = tentative_g_score + neighbor.heuristic();
                g_score.insert(neighbor.clone(), tentative_g_score);
                predecessors.insert(neighbor.clone(), (current.clone(), action));

                // A node keeps its original insertion order when its score improves
                match open.score(&neighbor) {
                    Some((_, order)) => open.decrease_key(&neighbor, (neighbor_f_score, order)),
                    None => {
                        open.push(neighbor, (neighbor_f_score, insertion_order));
                        insertion_order += 1;
                    }
                }
            }
        }

        debug!(
            iterations = log.iterations,
            closed = log.closed_set_size,
            "frontier exhausted without reaching a goal"
        );
        Err(AStarError::NoSolution { log })
    }
}

/// Runs an A* search from `initial` with no prune or continuation hooks.
pub fn search<N: AStarNode>(
    initial: N,
    options: AStarOptions,
) -> Result<AStarSolution<N>, AStarError> {
    AStarSearch::new(initial).options(options).run()
}

fn reconstruct_path<N: AStarNode>(
    predecessors: &HashMap<N, (N, N::Action)>,
    end: &N,
) -> Vec<N::Action> {
    let mut path = Vec::new();
    let mut current = end;

    while let Some((previous, action)) = predecessors.get(current) {
        assert!(
            path.len() < predecessors.len(),
            "astar: predecessor links form a cycle"
        );
        path.push(action.clone());
        current = previous;
    }

    path.reverse();
    path
}

/// A shortest path found by [shortest_path_on_graph].
#[derive(Debug, Clone, PartialEq)]
pub struct GraphPath<V, E> {
    target: V,
    path: Vec<(E, V)>,
    cost: f64,
    log: AStarLog,
}

impl<V: Copy, E> GraphPath<V, E> {
    /// The goal vertex that was reached
    pub fn target(&self) -> V {
        self.target
    }

    /// `(edge, vertex)` steps from the source to the target
    pub fn path(&self) -> &[(E, V)] {
        &self.path
    }

    pub fn cost(&self) -> f64 {
        self.cost
    }

    pub fn log(&self) -> &AStarLog {
        &self.log
    }
}

struct GraphContext<'a, G: GraphView> {
    graph: &'a G,
    lengths: &'a dyn Fn(G::Edge) -> f64,
    heuristic: &'a dyn Fn(G::Vertex) -> f64,
    is_goal: &'a dyn Fn(G::Vertex) -> bool,
}

/// Adapts a vertex of a [GraphView] into an [AStarNode]; identity is the vertex alone.
struct GraphNode<'a, G: GraphView> {
    vertex: G::Vertex,
    context: &'a GraphContext<'a, G>,
}

impl<G: GraphView> Clone for GraphNode<'_, G> {
    fn clone(&self) -> Self {
        Self {
            vertex: self.vertex,
            context: self.context,
        }
    }
}

impl<G: GraphView> PartialEq for GraphNode<'_, G> {
    fn eq(&self, other: &Self) -> bool {
        self.vertex == other.vertex
    }
}

impl<G: GraphView> Eq for GraphNode<'_, G> {}

impl<G: GraphView> Hash for GraphNode<'_, G> {
    fn hash<H: Hasher>(&self, state: &mut H) {
        self.vertex.hash(state);
    }
}

impl<G: GraphView> AStarNode for GraphNode<'_, G> {
    type Action = (G::Edge, G::Vertex);

    fn outgoing_actions(&self) -> Vec<Self::Action> {
        self.context.graph.outgoing_neighbors(self.vertex)
    }

    fn neighbor(&self, action: &Self::Action) -> Option<(Self, f64)> {
        let (edge, vertex) = *action;
        let length = (self.context.lengths)(edge);

        // Infinite length marks an impassable edge
        if length == f64::INFINITY {
            return None;
        }

        Some((
            GraphNode {
                vertex,
                context: self.context,
            },
            length,
        ))
    }

    fn heuristic(&self) -> f64 {
        (self.context.heuristic)(self.vertex)
    }

    fn is_goal(&self) -> bool {
        (self.context.is_goal)(self.vertex)
    }
}

/// Calculates a shortest path from `source` to the nearest vertex accepted by
/// `is_goal` using A*, over any [GraphView].
///
/// `lengths` follows the same rules as in
/// [shortest_paths](crate::algorithms::dijkstra::shortest_paths): non-negative,
/// with `f64::INFINITY` for impassable edges. `heuristic` must not overestimate
/// the remaining distance for the result to be optimal.
pub fn shortest_path_on_graph<G, F, L, H>(
    graph: &G,
    source: G::Vertex,
    is_goal: F,
    lengths: L,
    heuristic: H,
    options: AStarOptions,
) -> Result<GraphPath<G::Vertex, G::Edge>, AStarError>
where
    G: GraphView,
    F: Fn(G::Vertex) -> bool,
    L: Fn(G::Edge) -> f64,
    H: Fn(G::Vertex) -> f64,
{
    let context = GraphContext {
        graph,
        lengths: &lengths,
        heuristic: &heuristic,
        is_goal: &is_goal,
    };
    let initial = GraphNode {
        vertex: source,
        context: &context,
    };

    let (solution, path, cost, log) = search(initial, options)?.into_parts();

    Ok(GraphPath {
        target: solution.vertex,
        path,
        cost,
        log,
    })
}
