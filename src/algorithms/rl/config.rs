//! Hyperparameters for tabular Q-learning.

#[cfg(feature = "serde")]
use serde::{Deserialize, Serialize};

use super::reward::RewardConfig;
use crate::algorithms::error::ConfigError;

/// Multiplicative ε decay, applied once at the end of every training episode.
#[derive(Debug, Clone, Copy, PartialEq)]
#[cfg_attr(feature = "serde", derive(Serialize, Deserialize))]
pub struct EpsilonSchedule {
    /// Exploration rate for the first episode.
    pub start: f64,
    /// Factor applied after each episode.
    pub decay: f64,
    /// Floor the decayed rate never drops below.
    pub min: f64,
}

impl EpsilonSchedule {
    /// The rate that follows `epsilon` after one episode.
    pub fn next(&self, epsilon: f64) -> f64 {
        (epsilon * self.decay).max(self.min)
    }

    /// The rate after `episodes` decays from `start`.
    pub fn after(&self, episodes: usize) -> f64 {
        (0..episodes).fold(self.start, |eps, _| self.next(eps))
    }
}

impl Default for EpsilonSchedule {
    fn default() -> Self {
        Self {
            start: 1.0,
            decay: 0.998,
            min: 0.05,
        }
    }
}

/// Configuration for a [`QLearningAgent`](super::agent::QLearningAgent) and its training runs.
#[derive(Debug, Clone, PartialEq)]
#[cfg_attr(feature = "serde", derive(Serialize, Deserialize))]
#[cfg_attr(feature = "serde", serde(default))]
pub struct QLearningConfig {
    // --- Learning ---
    /// Learning rate α, in (0, 1].
    pub alpha: f64,
    /// Discount factor γ, in [0, 1].
    pub gamma: f64,
    /// Value of a state-action pair never updated.
    pub q_init: f64,

    // --- Exploration ---
    pub epsilon: EpsilonSchedule,

    // --- Episodes ---
    /// An episode that has not ended after this many steps is cut off.
    pub max_steps_per_episode: usize,
    /// Training progress is logged every this many episodes. 0 disables it.
    pub log_every: usize,

    // --- Reward shaping ---
    pub rewards: RewardConfig,

    /// Seed for the agent's random number generator.
    pub seed: u64,
}

impl QLearningConfig {
    pub fn with_seed(mut self, seed: u64) -> Self {
        self.seed = seed;
        self
    }

    /// Checks every rate against its admissible range.
    pub fn validate(&self) -> Result<(), ConfigError> {
        if !(self.alpha > 0.0 && self.alpha <= 1.0) {
            return Err(ConfigError::invalid("alpha", self.alpha, "must be in (0, 1]"));
        }
        if !(0.0..=1.0).contains(&self.gamma) {
            return Err(ConfigError::invalid("gamma", self.gamma, "must be in [0, 1]"));
        }
        let eps = &self.epsilon;
        for (name, value) in [
            ("epsilon.start", eps.start),
            ("epsilon.decay", eps.decay),
            ("epsilon.min", eps.min),
        ] {
            if !(0.0..=1.0).contains(&value) {
                return Err(ConfigError::invalid(name, value, "must be in [0, 1]"));
            }
        }
        if eps.min > eps.start {
            return Err(ConfigError::invalid(
                "epsilon.min",
                eps.min,
                "must not exceed epsilon.start",
            ));
        }
        if self.max_steps_per_episode == 0 {
            return Err(ConfigError::invalid(
                "max_steps_per_episode",
                0,
                "must be positive",
            ));
        }
        if !self.q_init.is_finite() {
            return Err(ConfigError::invalid("q_init", self.q_init, "must be finite"));
        }
        Ok(())
    }
}

impl Default for QLearningConfig {
    fn default() -> Self {
        Self {
            alpha: 0.2,
            gamma: 0.95,
            q_init: 0.0,
            epsilon: EpsilonSchedule::default(),
            max_steps_per_episode: 500,
            log_every: 100,
            rewards: RewardConfig::default(),
            seed: 42,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn default_config_is_valid() {
        let cfg = QLearningConfig::default();
        assert!(cfg.validate().is_ok());
        assert_eq!(cfg.alpha, 0.2);
        assert_eq!(cfg.max_steps_per_episode, 500);
    }

    #[test]
    fn out_of_range_rates_are_rejected() {
        let mut cfg = QLearningConfig::default();
        cfg.alpha = 0.0;
        assert_eq!(
            cfg.validate().unwrap_err().to_string(),
            "invalid alpha = 0: must be in (0, 1]"
        );

        let mut cfg = QLearningConfig::default();
        cfg.gamma = 1.5;
        assert!(cfg.validate().is_err());

        let mut cfg = QLearningConfig::default();
        cfg.epsilon.min = 0.5;
        cfg.epsilon.start = 0.1;
        assert!(cfg.validate().is_err());

        let mut cfg = QLearningConfig::default();
        cfg.alpha = f64::NAN;
        assert!(cfg.validate().is_err());
    }

    #[test]
    fn epsilon_decays_to_floor() {
        let schedule = EpsilonSchedule::default();
        assert_eq!(schedule.next(1.0), 0.998);
        assert_eq!(schedule.next(0.05), 0.05);
        assert_eq!(schedule.after(0), 1.0);
        assert_eq!(schedule.after(5000), 0.05);
        assert!(schedule.after(100) < 1.0);
    }
}
