//! ε-greedy tabular Q-learning agent.

use rand::rngs::StdRng;
use rand::seq::SliceRandom;
use rand::{Rng, SeedableRng};

use super::config::QLearningConfig;
use super::q_table::QTable;
use crate::algorithms::error::ConfigError;
use crate::grid::{Action, GridState};

/// Learner state: the Q-table, the current exploration rate and a seeded RNG.
#[derive(Debug, Clone)]
pub struct QLearningAgent {
    pub(crate) config: QLearningConfig,
    pub(crate) table: QTable,
    pub(crate) epsilon: f64,
    pub(crate) episodes_trained: usize,
    pub(crate) total_steps: usize,
    rng: StdRng,
}

impl QLearningAgent {
    /// Creates an untrained agent after validating `config`.
    pub fn new(config: QLearningConfig) -> Result<Self, ConfigError> {
        config.validate()?;
        Ok(Self {
            table: QTable::new(config.q_init),
            epsilon: config.epsilon.start,
            episodes_trained: 0,
            total_steps: 0,
            rng: StdRng::seed_from_u64(config.seed),
            config,
        })
    }

    pub(crate) fn from_parts(
        config: QLearningConfig,
        table: QTable,
        epsilon: f64,
        episodes_trained: usize,
        total_steps: usize,
    ) -> Self {
        Self {
            rng: StdRng::seed_from_u64(config.seed),
            config,
            table,
            epsilon,
            episodes_trained,
            total_steps,
        }
    }

    /// Forgets everything learned: empty table, initial ε, reseeded RNG.
    pub fn reset(&mut self) {
        self.table = QTable::new(self.config.q_init);
        self.epsilon = self.config.epsilon.start;
        self.episodes_trained = 0;
        self.total_steps = 0;
        self.rng = StdRng::seed_from_u64(self.config.seed);
    }

    pub fn config(&self) -> &QLearningConfig {
        &self.config
    }

    pub fn table(&self) -> &QTable {
        &self.table
    }

    /// Current exploration rate.
    pub fn epsilon(&self) -> f64 {
        self.epsilon
    }

    pub fn set_epsilon(&mut self, epsilon: f64) {
        self.epsilon = epsilon.clamp(0.0, 1.0);
    }

    pub fn episodes_trained(&self) -> usize {
        self.episodes_trained
    }

    pub fn total_steps(&self) -> usize {
        self.total_steps
    }

    /// ε-greedy choice among the legal actions of `state`.
    ///
    /// With probability ε a uniformly random legal action, otherwise
    /// [`greedy_action`](Self::greedy_action). `None` when nothing is legal.
    pub fn choose_action(&mut self, state: &GridState) -> Option<Action> {
        if self.epsilon > 0.0 && self.rng.gen::<f64>() < self.epsilon {
            let legal = state.legal_actions();
            return legal.choose(&mut self.rng).copied();
        }
        self.greedy_action(state)
    }

    /// Highest-valued legal action, ties going to the earliest in [`Action::ALL`].
    pub fn greedy_action(&self, state: &GridState) -> Option<Action> {
        self.table.best(state).map(|(action, _)| action)
    }

    /// Temporal-difference update of Q(state, action).
    ///
    /// The bootstrap term is dropped when `done`, and is 0 anyway when
    /// `next` has no legal action.
    pub fn update(
        &mut self,
        state: &GridState,
        action: Action,
        reward: f64,
        next: &GridState,
        done: bool,
    ) {
        let current = self.table.get(state, action);
        let bootstrap = if done { 0.0 } else { self.table.max_value(next) };
        let target = reward + self.config.gamma * bootstrap;
        let updated = current + self.config.alpha * (target - current);
        self.table.set(state, action, updated);
    }

    /// Applies one step of the ε schedule.
    pub fn decay_epsilon(&mut self) {
        self.epsilon = self.config.epsilon.next(self.epsilon);
    }
}
