//! Episodic wrapper around a level for reinforcement learning.

use super::reward::{RewardComputer, RewardConfig};
use crate::grid::{Action, GridState, IllegalMove};

/// How an episode ended.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum EpisodeEnd {
    /// Reached the exit with every key.
    Won,
    /// Stepped into lava or was caught by it.
    Died,
    /// No legal action was left.
    Stuck,
    /// Hit the step cap.
    TimedOut,
}

/// Result of a single environment step.
#[derive(Debug, Clone)]
pub struct StepResult {
    pub state: GridState,
    pub reward: f64,
    /// Whether the episode is over. `end` says why.
    pub done: bool,
    pub end: Option<EpisodeEnd>,
    /// Steps taken so far this episode.
    pub steps: usize,
}

/// Replays one level from its initial state, episode after episode.
///
/// # Lifecycle
///
/// 1. [`Environment::reset`] returns the initial state.
/// 2. [`Environment::step`] applies an action until the result is `done`.
#[derive(Debug, Clone)]
pub struct Environment {
    initial: GridState,
    current: GridState,
    rewards: RewardConfig,
    max_steps: usize,
    steps: usize,
    /// Cumulative reward this episode.
    pub cumulative_reward: f64,
}

impl Environment {
    pub fn new(initial: GridState, rewards: RewardConfig, max_steps: usize) -> Self {
        Self {
            current: initial.clone(),
            initial,
            rewards,
            max_steps,
            steps: 0,
            cumulative_reward: 0.0,
        }
    }

    pub fn initial(&self) -> &GridState {
        &self.initial
    }

    pub fn state(&self) -> &GridState {
        &self.current
    }

    pub fn steps(&self) -> usize {
        self.steps
    }

    pub fn reset(&mut self) -> GridState {
        self.current = self.initial.clone();
        self.steps = 0;
        self.cumulative_reward = 0.0;
        self.current.clone()
    }

    /// Applies `action` to the current state.
    ///
    /// An illegal action leaves the environment untouched.
    pub fn step(&mut self, action: Action) -> Result<StepResult, IllegalMove> {
        let transition = self.current.apply(action)?;
        let next = transition.state;
        let reward = RewardComputer::compute(&self.current, &next, &self.rewards);
        self.steps += 1;
        self.cumulative_reward += reward;

        let end = if next.is_won() {
            Some(EpisodeEnd::Won)
        } else if next.is_dead() {
            Some(EpisodeEnd::Died)
        } else if next.legal_actions().is_empty() {
            Some(EpisodeEnd::Stuck)
        } else if self.steps >= self.max_steps {
            Some(EpisodeEnd::TimedOut)
        } else {
            None
        };
        self.current = next.clone();

        Ok(StepResult {
            state: next,
            reward,
            done: end.is_some(),
            end,
            steps: self.steps,
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::grid::LevelSpec;

    fn env(rows: &[&str], max_steps: usize) -> Environment {
        let state = GridState::new(&LevelSpec::from_rows(rows).unwrap()).unwrap();
        Environment::new(state, RewardConfig::default(), max_steps)
    }

    #[test]
    fn episode_ends_at_exit() {
        let mut env = env(&["P.E"], 10);
        let first = env.step(Action::Right).unwrap();
        assert!(!first.done);
        let second = env.step(Action::Right).unwrap();
        assert_eq!(second.end, Some(EpisodeEnd::Won));
        assert_eq!(env.cumulative_reward, 99.0);
    }

    #[test]
    fn lava_ends_episode() {
        let mut env = env(&["LP.E"], 10);
        let result = env.step(Action::Left).unwrap();
        assert_eq!(result.end, Some(EpisodeEnd::Died));
        assert_eq!(result.reward, -100.0);
    }

    #[test]
    fn step_cap_times_out() {
        let mut env = env(&["P..", "...", "..E"], 2);
        env.step(Action::Right).unwrap();
        let result = env.step(Action::Left).unwrap();
        assert_eq!(result.end, Some(EpisodeEnd::TimedOut));
    }

    #[test]
    fn illegal_action_is_rejected_without_side_effects() {
        let mut env = env(&["P.E"], 10);
        assert!(env.step(Action::Up).is_err());
        assert_eq!(env.steps(), 0);
        assert_eq!(env.state(), env.initial());
    }

    #[test]
    fn reset_restores_initial_state() {
        let mut env = env(&["P.E"], 10);
        env.step(Action::Right).unwrap();
        let state = env.reset();
        assert_eq!(&state, env.initial());
        assert_eq!(env.steps(), 0);
        assert_eq!(env.cumulative_reward, 0.0);
    }
}
