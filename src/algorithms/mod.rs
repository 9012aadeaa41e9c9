pub mod error;
pub mod report;
pub mod rl;
pub mod runner;
pub mod search;

pub use error::{ConfigError, RunnerError};
pub use report::{Interrupt, Outcome, Plan, SearchStats, SolveReport};
pub use runner::{spawn, SolveHandle};
pub use search::{SearchConfig, SearchSolver, Strategy};

use std::fmt;
use std::str::FromStr;
use std::sync::atomic::AtomicBool;

#[cfg(feature = "rl")]
use rl::{QLearningConfig, QLearningSolver};

use crate::grid::GridState;

/// Algorithm that turns an initial level state into a [`SolveReport`].
///
/// Implementations must be deterministic: solving the same state twice with
/// the same configuration yields the same outcome.
pub trait Solver {
    /// Short identifier, e.g. `"bfs"`.
    fn name(&self) -> &str;

    /// Solves from `initial`, polling `cancel` for cooperative cancellation.
    ///
    /// A raised flag yields [`Outcome::Interrupted`] with
    /// [`Interrupt::Cancelled`].
    fn solve_with_cancel(&mut self, initial: &GridState, cancel: &AtomicBool) -> SolveReport;

    /// Solves from `initial` to completion.
    fn solve(&mut self, initial: &GridState) -> SolveReport {
        self.solve_with_cancel(initial, &AtomicBool::new(false))
    }
}

/// Solver variants selectable by name.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum SolverKind {
    Search(Strategy),
    /// Trains a fresh agent on the level, then unrolls its greedy policy.
    #[cfg(feature = "rl")]
    QLearning,
}

impl SolverKind {
    /// Every selectable variant, searches first.
    pub fn all() -> Vec<SolverKind> {
        #[allow(unused_mut)]
        let mut kinds: Vec<SolverKind> =
            Strategy::ALL.into_iter().map(SolverKind::Search).collect();
        #[cfg(feature = "rl")]
        kinds.push(SolverKind::QLearning);
        kinds
    }

    pub fn name(&self) -> &'static str {
        match self {
            SolverKind::Search(strategy) => strategy.name(),
            #[cfg(feature = "rl")]
            SolverKind::QLearning => "qlearning",
        }
    }

    /// Builds the solver described by `self` and `settings`.
    pub fn build(&self, settings: &SolverSettings) -> Result<Box<dyn Solver + Send>, ConfigError> {
        match *self {
            SolverKind::Search(strategy) => {
                settings.search.validate()?;
                Ok(Box::new(SearchSolver::new(strategy, settings.search.clone())))
            }
            #[cfg(feature = "rl")]
            SolverKind::QLearning => Ok(Box::new(QLearningSolver::new(
                settings.qlearning.clone(),
                settings.training_episodes,
            )?)),
        }
    }
}

impl fmt::Display for SolverKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.name())
    }
}

impl FromStr for SolverKind {
    type Err = ConfigError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        #[cfg(feature = "rl")]
        if s.eq_ignore_ascii_case("qlearning") || s.eq_ignore_ascii_case("q-learning") {
            return Ok(SolverKind::QLearning);
        }
        s.parse().map(SolverKind::Search)
    }
}

/// Everything [`SolverKind::build`] may need.
#[derive(Debug, Clone)]
pub struct SolverSettings {
    pub search: SearchConfig,
    #[cfg(feature = "rl")]
    pub qlearning: QLearningConfig,
    /// Episodes a Q-learning solver trains for before unrolling its policy.
    #[cfg(feature = "rl")]
    pub training_episodes: usize,
}

impl Default for SolverSettings {
    fn default() -> Self {
        Self {
            search: SearchConfig::default(),
            #[cfg(feature = "rl")]
            qlearning: QLearningConfig::default(),
            #[cfg(feature = "rl")]
            training_episodes: 1000,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::grid::LevelSpec;

    fn open_3x3() -> GridState {
        GridState::new(&LevelSpec::from_rows(&["P..", "...", "..E"]).unwrap()).unwrap()
    }

    #[test]
    fn kinds_parse_by_name() {
        for kind in SolverKind::all() {
            assert_eq!(kind.name().parse::<SolverKind>().unwrap(), kind);
        }
        assert_eq!(
            "BFS".parse::<SolverKind>().unwrap(),
            SolverKind::Search(Strategy::BreadthFirst)
        );
        assert_eq!(
            "Dijkstra".parse::<SolverKind>().unwrap(),
            SolverKind::Search(Strategy::UniformCost)
        );
        assert_eq!(
            "beam".parse::<SolverKind>().unwrap_err(),
            ConfigError::UnknownSolver("beam".to_string())
        );
    }

    #[test]
    fn built_solvers_report_their_name() {
        let settings = SolverSettings::default();
        for kind in SolverKind::all() {
            let solver = kind.build(&settings).unwrap();
            assert_eq!(solver.name(), kind.name());
        }
    }

    #[test]
    fn invalid_settings_fail_to_build() {
        let mut settings = SolverSettings::default();
        settings.search.max_expansions = Some(0);
        assert!(SolverKind::Search(Strategy::AStar).build(&settings).is_err());
    }

    #[test]
    fn boxed_search_solves() {
        let mut solver = SolverKind::Search(Strategy::UniformCost)
            .build(&SolverSettings::default())
            .unwrap();
        let report = solver.solve(&open_3x3());
        assert_eq!(report.plan().map(Plan::len), Some(4));
    }

    #[cfg(feature = "rl")]
    #[test]
    fn invalid_qlearning_settings_fail_to_build() {
        let mut settings = SolverSettings::default();
        settings.qlearning.alpha = 2.0;
        assert!(SolverKind::QLearning.build(&settings).is_err());
    }
}
