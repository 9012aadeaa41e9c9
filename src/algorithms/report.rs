//! Result shape shared by every solver.

use std::fmt;
use std::time::Duration;

#[cfg(feature = "serde")]
use serde::{Deserialize, Serialize};

use crate::grid::{Action, GridState, IllegalMove};

/// An executable solution: the actions to take from the initial state and their total cost.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
#[cfg_attr(feature = "serde", derive(Serialize, Deserialize))]
pub struct Plan {
    pub actions: Vec<Action>,
    pub cost: u32,
}

impl Plan {
    pub fn new(actions: Vec<Action>, cost: u32) -> Self {
        Self { actions, cost }
    }

    /// Number of moves.
    pub fn len(&self) -> usize {
        self.actions.len()
    }

    pub fn is_empty(&self) -> bool {
        self.actions.is_empty()
    }

    /// Applies every action in order from `initial`.
    ///
    /// On failure returns the index of the offending action and why it was rejected.
    pub fn replay(&self, initial: &GridState) -> Result<GridState, (usize, IllegalMove)> {
        initial.replay(&self.actions)
    }

    /// Returns true if replaying the plan from `initial` ends in a won state.
    pub fn verify(&self, initial: &GridState) -> bool {
        self.replay(initial).is_ok_and(|end| end.is_won())
    }
}

impl fmt::Display for Plan {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let moves: Vec<String> = self.actions.iter().map(|a| a.to_string()).collect();
        write!(f, "[{}] (cost {})", moves.join(", "), self.cost)
    }
}

/// Why a solver stopped without a definitive answer.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
#[cfg_attr(feature = "serde", derive(Serialize, Deserialize))]
#[cfg_attr(feature = "serde", serde(rename_all = "snake_case"))]
pub enum Interrupt {
    /// The cancel flag was raised.
    Cancelled,
    /// Some nodes were not expanded because of the depth limit.
    DepthLimit,
    /// The expansion budget ran out.
    ExpansionLimit,
    /// A policy rollout hit its step cap.
    StepLimit,
    /// A policy rollout revisited a state (a greedy policy would cycle forever).
    Cycle,
    /// A policy rollout reached a state with no legal action, or died.
    DeadEnd,
}

impl fmt::Display for Interrupt {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Interrupt::Cancelled => write!(f, "cancelled"),
            Interrupt::DepthLimit => write!(f, "depth limit reached"),
            Interrupt::ExpansionLimit => write!(f, "expansion limit reached"),
            Interrupt::StepLimit => write!(f, "step limit reached"),
            Interrupt::Cycle => write!(f, "policy cycles"),
            Interrupt::DeadEnd => write!(f, "policy reached a dead end"),
        }
    }
}

/// Solver verdict.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Outcome {
    Solved(Plan),
    /// The whole reachable state space was searched without reaching the exit.
    Unsolvable,
    Interrupted(Interrupt),
}

impl Outcome {
    pub fn is_solved(&self) -> bool {
        matches!(self, Outcome::Solved(_))
    }

    pub fn plan(&self) -> Option<&Plan> {
        match self {
            Outcome::Solved(plan) => Some(plan),
            _ => None,
        }
    }

    pub fn into_plan(self) -> Option<Plan> {
        match self {
            Outcome::Solved(plan) => Some(plan),
            _ => None,
        }
    }
}

impl fmt::Display for Outcome {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Outcome::Solved(plan) => write!(f, "solved in {} moves: {}", plan.len(), plan),
            Outcome::Unsolvable => write!(f, "unsolvable"),
            Outcome::Interrupted(why) => write!(f, "interrupted: {}", why),
        }
    }
}

/// Counters collected during one solve.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct SearchStats {
    /// States popped and expanded (each at most once).
    pub nodes_explored: usize,
    /// Nodes inserted into the frontier, root included.
    pub nodes_generated: usize,
    /// Pops discarded because the state was already explored.
    pub duplicates_skipped: usize,
    pub max_depth: u32,
    pub max_frontier: usize,
    pub elapsed: Duration,
    pub solution_length: usize,
}

impl fmt::Display for SearchStats {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        writeln!(f, "  Nodes explored:   {}", self.nodes_explored)?;
        writeln!(f, "  Nodes generated:  {}", self.nodes_generated)?;
        writeln!(f, "  Duplicates:       {}", self.duplicates_skipped)?;
        writeln!(f, "  Max depth:        {}", self.max_depth)?;
        writeln!(f, "  Max frontier:     {}", self.max_frontier)?;
        writeln!(f, "  Time taken:       {:.3}s", self.elapsed.as_secs_f64())?;
        writeln!(f, "  Solution length:  {}", self.solution_length)
    }
}

/// Everything a solver hands back to the caller.
#[derive(Debug, Clone)]
pub struct SolveReport {
    /// Name of the solver that produced this report.
    pub solver: String,
    pub outcome: Outcome,
    pub stats: SearchStats,
    /// Expanded states in expansion order, when tracing was requested.
    pub trace: Option<Vec<GridState>>,
}

impl SolveReport {
    pub fn is_solved(&self) -> bool {
        self.outcome.is_solved()
    }

    pub fn plan(&self) -> Option<&Plan> {
        self.outcome.plan()
    }
}

impl fmt::Display for SolveReport {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        writeln!(f, "=== {} ===", self.solver)?;
        writeln!(f, "  Outcome:          {}", self.outcome)?;
        write!(f, "{}", self.stats)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::grid::LevelSpec;

    #[test]
    fn plan_verifies_against_level() {
        let initial = GridState::new(&LevelSpec::from_rows(&["P.E"]).unwrap()).unwrap();
        let good = Plan::new(vec![Action::Right, Action::Right], 2);
        let short = Plan::new(vec![Action::Right], 1);
        let illegal = Plan::new(vec![Action::Up], 1);
        assert!(good.verify(&initial));
        assert!(!short.verify(&initial));
        assert!(!illegal.verify(&initial));
    }

    #[test]
    fn plan_display() {
        let plan = Plan::new(vec![Action::Down, Action::Left], 2);
        assert_eq!(plan.to_string(), "[down, left] (cost 2)");
    }

    #[test]
    fn outcome_accessors() {
        let solved = Outcome::Solved(Plan::new(vec![Action::Up], 1));
        assert!(solved.is_solved());
        assert_eq!(solved.plan().map(Plan::len), Some(1));
        assert!(Outcome::Unsolvable.plan().is_none());
        assert_eq!(
            Outcome::Interrupted(Interrupt::Cancelled).to_string(),
            "interrupted: cancelled"
        );
    }
}
