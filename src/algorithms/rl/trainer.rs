//! Episode loop and training runs.

use std::sync::atomic::{AtomicBool, Ordering};

use tracing::{debug, info};

use super::agent::QLearningAgent;
use super::environment::{EpisodeEnd, Environment};

/// What happened in one episode.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct EpisodeSummary {
    pub reward: f64,
    pub steps: usize,
    pub end: EpisodeEnd,
}

/// Runs one episode from a fresh reset.
///
/// With `learn` set, every transition updates the agent's Q-table. ε is not
/// decayed here.
pub fn run_episode(
    agent: &mut QLearningAgent,
    env: &mut Environment,
    learn: bool,
) -> EpisodeSummary {
    let mut state = env.reset();
    let end = loop {
        if state.is_won() {
            break EpisodeEnd::Won;
        }
        if state.is_dead() {
            break EpisodeEnd::Died;
        }
        let Some(action) = agent.choose_action(&state) else {
            break EpisodeEnd::Stuck;
        };
        let result = match env.step(action) {
            Ok(result) => result,
            // choose_action only offers legal moves
            Err(_) => break EpisodeEnd::Stuck,
        };
        if learn {
            // Stuck and timed-out states keep their bootstrap value; the
            // episode is cut, not the underlying process.
            let terminal = matches!(result.end, Some(EpisodeEnd::Won | EpisodeEnd::Died));
            agent.update(&state, action, result.reward, &result.state, terminal);
            agent.total_steps += 1;
        }
        state = result.state;
        if let Some(end) = result.end {
            break end;
        }
    };
    EpisodeSummary {
        reward: env.cumulative_reward,
        steps: env.steps(),
        end,
    }
}

/// Outcome of a training run.
#[derive(Debug, Clone, Default)]
pub struct TrainingReport {
    pub episode_rewards: Vec<f64>,
    pub episode_lengths: Vec<usize>,
    pub wins: usize,
    pub deaths: usize,
    pub timeouts: usize,
    pub stuck: usize,
    pub final_epsilon: f64,
    /// Distinct states in the Q-table at the end of the run.
    pub states_seen: usize,
    /// The run stopped early because its cancel flag was raised.
    pub cancelled: bool,
}

impl TrainingReport {
    pub fn episodes(&self) -> usize {
        self.episode_rewards.len()
    }

    pub fn success_rate(&self) -> f64 {
        if self.episodes() == 0 {
            return 0.0;
        }
        self.wins as f64 / self.episodes() as f64
    }

    /// Mean reward over the last `window` episodes.
    pub fn recent_mean_reward(&self, window: usize) -> f64 {
        let start = self.episode_rewards.len().saturating_sub(window);
        mean(&self.episode_rewards[start..])
    }
}

pub(crate) fn mean(values: &[f64]) -> f64 {
    if values.is_empty() {
        return 0.0;
    }
    values.iter().sum::<f64>() / values.len() as f64
}

/// Drives a fixed number of training episodes.
#[derive(Debug, Clone, Copy)]
pub struct Trainer {
    episodes: usize,
}

impl Trainer {
    pub fn new(episodes: usize) -> Self {
        Self { episodes }
    }

    pub fn episodes(&self) -> usize {
        self.episodes
    }

    /// Trains `agent` in `env`, decaying ε after every episode.
    ///
    /// `cancel` is checked between episodes.
    pub fn train(
        &self,
        agent: &mut QLearningAgent,
        env: &mut Environment,
        cancel: &AtomicBool,
    ) -> TrainingReport {
        let log_every = agent.config.log_every;
        let mut report = TrainingReport::default();
        info!(
            episodes = self.episodes,
            level = env.initial().board().name(),
            "training started"
        );

        for episode in 1..=self.episodes {
            if cancel.load(Ordering::Relaxed) {
                report.cancelled = true;
                debug!(episode, "training cancelled");
                break;
            }

            let summary = run_episode(agent, env, true);
            agent.decay_epsilon();
            agent.episodes_trained += 1;

            report.episode_rewards.push(summary.reward);
            report.episode_lengths.push(summary.steps);
            match summary.end {
                EpisodeEnd::Won => report.wins += 1,
                EpisodeEnd::Died => report.deaths += 1,
                EpisodeEnd::TimedOut => report.timeouts += 1,
                EpisodeEnd::Stuck => report.stuck += 1,
            }

            if log_every > 0 && episode % log_every == 0 {
                let start = report.episode_lengths.len().saturating_sub(log_every);
                let lengths: Vec<f64> = report.episode_lengths[start..]
                    .iter()
                    .map(|&n| n as f64)
                    .collect();
                info!(
                    episode,
                    reward = report.recent_mean_reward(log_every),
                    steps = mean(&lengths),
                    epsilon = agent.epsilon(),
                    states = agent.table().len(),
                    "training progress"
                );
            }
        }

        report.final_epsilon = agent.epsilon();
        report.states_seen = agent.table().len();
        info!(
            episodes = report.episodes(),
            wins = report.wins,
            success_rate = report.success_rate(),
            "training finished"
        );
        report
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::algorithms::rl::config::QLearningConfig;
    use crate::algorithms::rl::reward::RewardConfig;
    use crate::grid::{GridState, LevelSpec};

    fn setup(rows: &[&str], seed: u64) -> (QLearningAgent, Environment) {
        let config = QLearningConfig::default().with_seed(seed);
        let state = GridState::new(&LevelSpec::from_rows(rows).unwrap()).unwrap();
        let env = Environment::new(state, RewardConfig::default(), config.max_steps_per_episode);
        (QLearningAgent::new(config).unwrap(), env)
    }

    #[test]
    fn training_counts_every_episode() {
        let (mut agent, mut env) = setup(&["P..", "...", "..E"], 1);
        let report = Trainer::new(50).train(&mut agent, &mut env, &AtomicBool::new(false));
        assert_eq!(report.episodes(), 50);
        assert_eq!(
            report.wins + report.deaths + report.timeouts + report.stuck,
            50
        );
        assert_eq!(agent.episodes_trained(), 50);
        assert_eq!(report.final_epsilon, agent.config().epsilon.after(50));
        assert!(report.states_seen > 0);
    }

    #[test]
    fn cancelled_before_start_trains_nothing() {
        let (mut agent, mut env) = setup(&["P.E"], 1);
        let report = Trainer::new(10).train(&mut agent, &mut env, &AtomicBool::new(true));
        assert!(report.cancelled);
        assert_eq!(report.episodes(), 0);
        assert!(agent.table().is_empty());
    }

    #[test]
    fn evaluation_episode_does_not_learn() {
        let (mut agent, mut env) = setup(&["PE"], 1);
        let summary = run_episode(&mut agent, &mut env, false);
        assert_eq!(summary.end, EpisodeEnd::Won);
        assert_eq!(summary.steps, 1);
        assert_eq!(summary.reward, 100.0);
        assert!(agent.table().is_empty());
    }

    #[test]
    fn lava_level_records_deaths() {
        // Only Left is legal from the start, and it is fatal.
        let (mut agent, mut env) = setup(&["LP#E"], 1);
        let report = Trainer::new(5).train(&mut agent, &mut env, &AtomicBool::new(false));
        assert_eq!(report.deaths, 5);
        assert_eq!(report.success_rate(), 0.0);
        assert_eq!(report.recent_mean_reward(2), -100.0);
    }
}
