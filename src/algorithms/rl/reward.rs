//! Reward shaping for the Q-learning environment.

#[cfg(feature = "serde")]
use serde::{Deserialize, Serialize};

use crate::grid::GridState;

/// Reward values for each kind of transition.
#[derive(Debug, Clone, Copy, PartialEq)]
#[cfg_attr(feature = "serde", derive(Serialize, Deserialize))]
pub struct RewardConfig {
    /// Reaching the exit with every key collected.
    pub exit: f64,
    /// Dying in lava.
    pub lava: f64,
    /// Any other move.
    pub step: f64,
    /// Bonus for each key picked up by the move.
    pub key: f64,
}

impl Default for RewardConfig {
    fn default() -> Self {
        Self {
            exit: 100.0,
            lava: -100.0,
            step: -1.0,
            key: 10.0,
        }
    }
}

/// Computes rewards for the Q-learning environment.
pub struct RewardComputer;

impl RewardComputer {
    /// Reward for the move that took `before` to `after`.
    ///
    /// A terminal outcome replaces the step penalty: a win pays `exit`, a
    /// death pays `lava`. Key bonuses are added on top in every case.
    pub fn compute(before: &GridState, after: &GridState, config: &RewardConfig) -> f64 {
        let picked_up = before.keys_remaining().saturating_sub(after.keys_remaining());
        let base = if after.is_dead() {
            config.lava
        } else if after.is_won() {
            config.exit
        } else {
            config.step
        };
        base + config.key * picked_up as f64
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::grid::{Action, LevelSpec};

    fn state(rows: &[&str]) -> GridState {
        GridState::new(&LevelSpec::from_rows(rows).unwrap()).unwrap()
    }

    #[test]
    fn plain_step_is_penalised() {
        let s = state(&["P..E"]);
        let next = s.apply(Action::Right).unwrap().state;
        assert_eq!(RewardComputer::compute(&s, &next, &RewardConfig::default()), -1.0);
    }

    #[test]
    fn exit_and_lava_replace_step_penalty() {
        let config = RewardConfig::default();
        let s = state(&["LPE"]);
        let won = s.apply(Action::Right).unwrap().state;
        let dead = s.apply(Action::Left).unwrap().state;
        assert_eq!(RewardComputer::compute(&s, &won, &config), 100.0);
        assert_eq!(RewardComputer::compute(&s, &dead, &config), -100.0);
    }

    #[test]
    fn key_pickup_earns_bonus() {
        let s = state(&["PK.E"]);
        let next = s.apply(Action::Right).unwrap().state;
        assert_eq!(RewardComputer::compute(&s, &next, &RewardConfig::default()), 9.0);
    }
}
