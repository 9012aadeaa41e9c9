//! Bridges a Q-learning agent to the [`Solver`] trait.

use std::collections::HashSet;
use std::sync::atomic::{AtomicBool, Ordering};
use std::time::Instant;

use tracing::{debug, info, warn};

use super::agent::QLearningAgent;
use super::config::QLearningConfig;
use super::environment::Environment;
use super::trainer::{Trainer, TrainingReport};
use crate::algorithms::error::ConfigError;
use crate::algorithms::report::{Interrupt, Outcome, Plan, SearchStats, SolveReport};
use crate::algorithms::Solver;
use crate::grid::{GridState, Snapshot};

/// Solves a level by unrolling a Q-learning agent's greedy policy.
///
/// Built with [`QLearningSolver::new`], every solve resets the agent and trains
/// it from scratch on the level it is asked to solve, so repeated solves are
/// independent. Built with [`QLearningSolver::from_agent`], it uses the given
/// agent as is and never trains it.
#[derive(Debug, Clone)]
pub struct QLearningSolver {
    agent: QLearningAgent,
    training_episodes: usize,
    last_training: Option<TrainingReport>,
}

impl QLearningSolver {
    pub fn new(config: QLearningConfig, training_episodes: usize) -> Result<Self, ConfigError> {
        Ok(Self {
            agent: QLearningAgent::new(config)?,
            training_episodes,
            last_training: None,
        })
    }

    pub fn from_agent(agent: QLearningAgent) -> Self {
        Self {
            agent,
            training_episodes: 0,
            last_training: None,
        }
    }

    pub fn agent(&self) -> &QLearningAgent {
        &self.agent
    }

    pub fn into_agent(self) -> QLearningAgent {
        self.agent
    }

    /// Report of the training done by the last [`solve`](Solver::solve), if any.
    pub fn last_training(&self) -> Option<&TrainingReport> {
        self.last_training.as_ref()
    }

    /// Follows the greedy policy from `initial` with ε = 0.
    ///
    /// Stops on a win, a dead state, a state with no legal move, a revisited
    /// state (the policy would loop) or the episode step cap.
    pub fn rollout(&self, initial: &GridState, stats: &mut SearchStats) -> Outcome {
        let max_steps = self.agent.config().max_steps_per_episode;
        let mut visited: HashSet<Snapshot> = HashSet::new();
        let mut state = initial.clone();
        let mut actions = Vec::new();
        let mut cost = 0;

        loop {
            if state.is_won() {
                return Outcome::Solved(Plan::new(actions, cost));
            }
            if state.is_dead() {
                return Outcome::Interrupted(Interrupt::DeadEnd);
            }
            if !visited.insert(state.snapshot().clone()) {
                return Outcome::Interrupted(Interrupt::Cycle);
            }
            stats.nodes_explored += 1;
            if actions.len() >= max_steps {
                return Outcome::Interrupted(Interrupt::StepLimit);
            }
            let Some(action) = self.agent.greedy_action(&state) else {
                return Outcome::Interrupted(Interrupt::DeadEnd);
            };
            let transition = match state.apply(action) {
                Ok(transition) => transition,
                Err(err) => {
                    warn!(%action, %err, "greedy policy chose an illegal move");
                    return Outcome::Interrupted(Interrupt::DeadEnd);
                }
            };
            stats.nodes_generated += 1;
            actions.push(action);
            cost += transition.cost;
            stats.max_depth = actions.len() as u32;
            state = transition.state;
        }
    }
}

impl Solver for QLearningSolver {
    fn name(&self) -> &str {
        "qlearning"
    }

    fn solve_with_cancel(&mut self, initial: &GridState, cancel: &AtomicBool) -> SolveReport {
        let started = Instant::now();
        let mut stats = SearchStats::default();

        if self.training_episodes > 0 {
            self.agent.reset();
            let config = self.agent.config();
            let mut env = Environment::new(
                initial.clone(),
                config.rewards,
                config.max_steps_per_episode,
            );
            let report =
                Trainer::new(self.training_episodes).train(&mut self.agent, &mut env, cancel);
            self.last_training = Some(report);
        }

        let outcome = if cancel.load(Ordering::Relaxed) {
            Outcome::Interrupted(Interrupt::Cancelled)
        } else {
            self.rollout(initial, &mut stats)
        };

        stats.elapsed = started.elapsed();
        if let Outcome::Solved(plan) = &outcome {
            stats.solution_length = plan.len();
        }
        debug!(states = self.agent.table().len(), "policy rollout finished");
        info!(solver = "qlearning", "{}", outcome);

        SolveReport {
            solver: self.name().to_string(),
            outcome,
            stats,
            trace: None,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::algorithms::rl::metrics::EvaluationMetrics;
    use crate::grid::LevelSpec;

    fn open_3x3() -> GridState {
        GridState::new(&LevelSpec::from_rows(&["P..", "...", "..E"]).unwrap()).unwrap()
    }

    #[test]
    fn converges_to_shortest_route_on_open_grid() {
        let initial = open_3x3();
        let config = QLearningConfig::default().with_seed(7);
        let mut solver = QLearningSolver::new(config, 2000).unwrap();

        let report = solver.solve(&initial);
        let plan = report.plan().expect("trained policy reaches the exit");
        assert!(plan.len() <= 4);
        assert!(plan.verify(&initial));

        let training = solver.last_training().unwrap();
        assert_eq!(training.episodes(), 2000);
        assert!(training.wins > 0);

        let config = solver.agent().config().clone();
        let mut env = Environment::new(initial, config.rewards, config.max_steps_per_episode);
        let mut agent = solver.into_agent();
        let metrics = EvaluationMetrics::evaluate(&mut agent, &mut env, 3, 0.0);
        assert_eq!(metrics.success_rate, 1.0);
        assert_eq!(metrics.mean_steps, 4.0);
    }

    #[test]
    fn repeated_solves_train_from_scratch() {
        let initial = open_3x3();
        let mut solver = QLearningSolver::new(QLearningConfig::default().with_seed(7), 50).unwrap();

        let first = solver.solve(&initial);
        let first_training = solver.last_training().unwrap().clone();
        let second = solver.solve(&initial);
        let second_training = solver.last_training().unwrap();

        assert_eq!(first.outcome, second.outcome);
        assert_eq!(first_training.final_epsilon, second_training.final_epsilon);
        assert_eq!(first_training.episode_rewards, second_training.episode_rewards);
        assert_eq!(solver.agent().episodes_trained(), 50);
    }

    #[test]
    fn other_level_does_not_inherit_values() {
        let mut solver = QLearningSolver::new(QLearningConfig::default().with_seed(7), 30).unwrap();
        solver.solve(&open_3x3());
        let corridor = GridState::new(&LevelSpec::from_rows(&["P.E"]).unwrap()).unwrap();
        solver.solve(&corridor);

        let mut fresh = QLearningSolver::new(QLearningConfig::default().with_seed(7), 30).unwrap();
        fresh.solve(&corridor);
        assert_eq!(solver.agent().table(), fresh.agent().table());
    }

    #[test]
    fn pretrained_agent_is_not_retrained() {
        let agent = QLearningAgent::new(QLearningConfig::default()).unwrap();
        let mut solver = QLearningSolver::from_agent(agent);
        solver.solve(&open_3x3());
        assert!(solver.last_training().is_none());
        assert!(solver.agent().table().is_empty());
    }

    #[test]
    fn untrained_policy_cycles() {
        // All values tie, so the greedy policy bounces Down/Up in the first column.
        let agent = QLearningAgent::new(QLearningConfig::default()).unwrap();
        let solver = QLearningSolver::from_agent(agent);
        let mut stats = SearchStats::default();
        let outcome = solver.rollout(&open_3x3(), &mut stats);
        assert_eq!(outcome, Outcome::Interrupted(Interrupt::Cycle));
    }

    #[test]
    fn fatal_only_move_is_a_dead_end() {
        let initial = GridState::new(&LevelSpec::from_rows(&["LP#E"]).unwrap()).unwrap();
        let mut solver = QLearningSolver::new(QLearningConfig::default(), 20).unwrap();
        let report = solver.solve(&initial);
        assert_eq!(report.outcome, Outcome::Interrupted(Interrupt::DeadEnd));
    }

    #[test]
    fn cancel_flag_skips_rollout() {
        let mut solver = QLearningSolver::new(QLearningConfig::default(), 10).unwrap();
        let report = solver.solve_with_cancel(&open_3x3(), &AtomicBool::new(true));
        assert_eq!(report.outcome, Outcome::Interrupted(Interrupt::Cancelled));
        assert_eq!(solver.last_training().unwrap().episodes(), 0);
    }
}
