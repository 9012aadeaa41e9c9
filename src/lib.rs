//! lavaqua - search and reinforcement-learning solvers for Lava & Aqua levels
//!
//! A level is an immutable [`GridState`]: a shared static board plus a small
//! hashable snapshot of everything that moves. Solvers turn an initial state
//! into a [`SolveReport`] whose plan replays to a win.
//!
//! - [`algorithms::search`]: BFS, DFS, uniform-cost, A* and greedy best-first
//!   on one frontier-driven engine.
//! - [`algorithms::rl`]: tabular Q-learning (feature `rl`).
//! - [`algorithms::runner`]: run any solver on a background thread.

pub mod algorithms;
pub mod grid;

pub use algorithms::{
    Outcome, Plan, SearchConfig, SearchSolver, SolveReport, Solver, SolverKind, SolverSettings,
    Strategy,
};
pub use grid::{Action, Cell, GridState, IllegalMove, LevelError, LevelSpec};
