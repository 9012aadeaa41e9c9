//! Uninformed and informed graph search over [`GridState`]s.
//!
//! Every strategy runs the same loop in [`engine::run`]; they differ only in
//! the [`Frontier`](frontier::Frontier) that decides which node is expanded next.

pub mod engine;
pub mod frontier;
pub mod heuristic;
pub mod node;


use std::fmt;
use std::str::FromStr;
use std::sync::atomic::AtomicBool;

#[cfg(feature = "serde")]
use serde::{Deserialize, Serialize};
use tracing::info;

use crate::algorithms::error::ConfigError;
use crate::algorithms::report::SolveReport;
use crate::algorithms::Solver;
use crate::grid::GridState;

use frontier::{ByCost, ByCostAndEstimate, ByEstimate, Fifo, Lifo, PriorityFrontier};
use heuristic::KeysThenExit;

/// Frontier discipline.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
#[cfg_attr(feature = "serde", derive(Serialize, Deserialize))]
#[cfg_attr(feature = "serde", serde(rename_all = "snake_case"))]
pub enum Strategy {
    BreadthFirst,
    DepthFirst,
    UniformCost,
    AStar,
    Greedy,
}

impl Strategy {
    pub const ALL: [Strategy; 5] = [
        Strategy::BreadthFirst,
        Strategy::DepthFirst,
        Strategy::UniformCost,
        Strategy::AStar,
        Strategy::Greedy,
    ];

    /// Short name used on the command line and in reports.
    pub fn name(&self) -> &'static str {
        match self {
            Strategy::BreadthFirst => "bfs",
            Strategy::DepthFirst => "dfs",
            Strategy::UniformCost => "ucs",
            Strategy::AStar => "astar",
            Strategy::Greedy => "greedy",
        }
    }

    /// Whether the first plan found is guaranteed to have minimum cost.
    pub fn is_optimal(&self) -> bool {
        matches!(
            self,
            Strategy::BreadthFirst | Strategy::UniformCost | Strategy::AStar
        )
    }
}

impl fmt::Display for Strategy {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.name())
    }
}

impl FromStr for Strategy {
    type Err = ConfigError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        if s.eq_ignore_ascii_case("dijkstra") {
            return Ok(Strategy::UniformCost);
        }
        Strategy::ALL
            .into_iter()
            .find(|strategy| strategy.name().eq_ignore_ascii_case(s))
            .ok_or_else(|| ConfigError::UnknownSolver(s.to_string()))
    }
}

/// Limits and diagnostics for a search run.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
#[cfg_attr(feature = "serde", derive(Serialize, Deserialize))]
#[cfg_attr(feature = "serde", serde(default))]
pub struct SearchConfig {
    /// Nodes at this depth are not expanded. `None` means unbounded.
    pub max_depth: Option<u32>,
    /// Stop after this many expansions. `None` means unbounded.
    pub max_expansions: Option<usize>,
    /// Keep every expanded state, in order, in the report.
    pub record_trace: bool,
}

impl SearchConfig {
    pub fn with_max_depth(mut self, depth: u32) -> Self {
        self.max_depth = Some(depth);
        self
    }

    pub fn with_max_expansions(mut self, expansions: usize) -> Self {
        self.max_expansions = Some(expansions);
        self
    }

    pub fn with_trace(mut self) -> Self {
        self.record_trace = true;
        self
    }

    pub fn validate(&self) -> Result<(), ConfigError> {
        if self.max_expansions == Some(0) {
            return Err(ConfigError::invalid("max_expansions", "0", "must be positive"));
        }
        Ok(())
    }
}

/// A [`Solver`] backed by graph search.
#[derive(Debug, Clone)]
pub struct SearchSolver {
    strategy: Strategy,
    config: SearchConfig,
}

impl SearchSolver {
    pub fn new(strategy: Strategy, config: SearchConfig) -> Self {
        Self { strategy, config }
    }

    pub fn bfs() -> Self {
        Self::new(Strategy::BreadthFirst, SearchConfig::default())
    }

    pub fn dfs() -> Self {
        Self::new(Strategy::DepthFirst, SearchConfig::default())
    }

    pub fn ucs() -> Self {
        Self::new(Strategy::UniformCost, SearchConfig::default())
    }

    pub fn astar() -> Self {
        Self::new(Strategy::AStar, SearchConfig::default())
    }

    pub fn greedy() -> Self {
        Self::new(Strategy::Greedy, SearchConfig::default())
    }

    pub fn strategy(&self) -> Strategy {
        self.strategy
    }

    pub fn config(&self) -> &SearchConfig {
        &self.config
    }
}

impl Solver for SearchSolver {
    fn name(&self) -> &str {
        self.strategy.name()
    }

    fn solve_with_cancel(&mut self, initial: &GridState, cancel: &AtomicBool) -> SolveReport {
        info!(
            strategy = %self.strategy,
            optimal = self.strategy.is_optimal(),
            level = initial.board().name(),
            "starting search"
        );
        let config = &self.config;
        let run = match self.strategy {
            Strategy::BreadthFirst => engine::run(initial, Fifo::default(), config, cancel),
            Strategy::DepthFirst => engine::run(initial, Lifo::default(), config, cancel),
            Strategy::UniformCost => {
                engine::run(initial, PriorityFrontier::new(ByCost), config, cancel)
            }
            Strategy::AStar => engine::run(
                initial,
                PriorityFrontier::new(ByCostAndEstimate(KeysThenExit)),
                config,
                cancel,
            ),
            Strategy::Greedy => engine::run(
                initial,
                PriorityFrontier::new(ByEstimate(KeysThenExit)),
                config,
                cancel,
            ),
        };
        info!(
            strategy = %self.strategy,
            explored = run.stats.nodes_explored,
            "{}",
            run.outcome
        );
        SolveReport {
            solver: self.strategy.name().to_string(),
            outcome: run.outcome,
            stats: run.stats,
            trace: run.trace,
        }
    }
}
