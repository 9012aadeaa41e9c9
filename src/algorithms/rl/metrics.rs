//! Evaluation of a trained agent.
//!
//! Runs episodes without learning and aggregates success rate, reward and
//! episode length.

use std::fmt;

use super::agent::QLearningAgent;
use super::environment::{EpisodeEnd, Environment};
use super::trainer::{mean, run_episode};

/// Aggregated evaluation metrics over multiple episodes.
#[derive(Debug, Clone, PartialEq)]
pub struct EvaluationMetrics {
    /// Number of episodes evaluated.
    pub n_episodes: usize,
    /// Episodes that reached the exit.
    pub successes: usize,
    /// Fraction of episodes that reached the exit.
    pub success_rate: f64,
    pub mean_reward: f64,
    pub std_reward: f64,
    pub mean_steps: f64,
    pub std_steps: f64,
}

fn std_dev(values: &[f64], mean: f64) -> f64 {
    if values.is_empty() {
        return 0.0;
    }
    let var = values.iter().map(|v| (v - mean).powi(2)).sum::<f64>() / values.len() as f64;
    var.sqrt()
}

impl EvaluationMetrics {
    /// Evaluates `agent` over `n_episodes` at exploration rate `epsilon`.
    ///
    /// The Q-table is left untouched and the agent's own ε is restored
    /// afterwards. With `epsilon = 0` every episode is identical.
    pub fn evaluate(
        agent: &mut QLearningAgent,
        env: &mut Environment,
        n_episodes: usize,
        epsilon: f64,
    ) -> Self {
        let saved_epsilon = agent.epsilon();
        agent.set_epsilon(epsilon);

        let mut rewards = Vec::with_capacity(n_episodes);
        let mut steps = Vec::with_capacity(n_episodes);
        let mut successes = 0;
        for _ in 0..n_episodes {
            let summary = run_episode(agent, env, false);
            rewards.push(summary.reward);
            steps.push(summary.steps as f64);
            if summary.end == EpisodeEnd::Won {
                successes += 1;
            }
        }
        agent.set_epsilon(saved_epsilon);

        let mean_reward = mean(&rewards);
        let mean_steps = mean(&steps);
        Self {
            n_episodes,
            successes,
            success_rate: if n_episodes == 0 {
                0.0
            } else {
                successes as f64 / n_episodes as f64
            },
            mean_reward,
            std_reward: std_dev(&rewards, mean_reward),
            mean_steps,
            std_steps: std_dev(&steps, mean_steps),
        }
    }
}

impl fmt::Display for EvaluationMetrics {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        writeln!(
            f,
            "=== Evaluation Metrics ({} episodes) ===",
            self.n_episodes
        )?;
        writeln!(
            f,
            "  Success rate:            {:.1}%",
            self.success_rate * 100.0
        )?;
        writeln!(
            f,
            "  Mean reward:             {:.2} (std {:.2})",
            self.mean_reward, self.std_reward
        )?;
        writeln!(
            f,
            "  Mean steps:              {:.1} (std {:.1})",
            self.mean_steps, self.std_steps
        )
    }
}
