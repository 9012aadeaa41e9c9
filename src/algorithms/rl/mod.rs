//! Tabular Q-learning for grid levels.
//!
//! The agent, its environment and the training loop are behind the `rl`
//! feature flag (which brings in `rand`). Saving and loading trained agents
//! additionally requires the `serde` feature.
//!
//! The [`QLearningSolver`] bridges a trained agent to the
//! [`Solver`](crate::algorithms::Solver) trait.

// Modules that require the `rl` feature (rand dependency).
#[cfg(feature = "rl")]
pub mod agent;
#[cfg(feature = "rl")]
pub mod config;
#[cfg(feature = "rl")]
pub mod environment;
#[cfg(feature = "rl")]
pub mod metrics;
#[cfg(feature = "rl")]
pub mod q_table;
#[cfg(feature = "rl")]
pub mod reward;
#[cfg(feature = "rl")]
pub mod solver;
#[cfg(feature = "rl")]
pub mod trainer;

#[cfg(all(feature = "rl", feature = "serde"))]
pub mod persistence;

#[cfg(feature = "rl")]
pub use agent::QLearningAgent;
#[cfg(feature = "rl")]
pub use config::{EpsilonSchedule, QLearningConfig};
#[cfg(feature = "rl")]
pub use environment::{EpisodeEnd, Environment, StepResult};
#[cfg(feature = "rl")]
pub use metrics::EvaluationMetrics;
#[cfg(feature = "rl")]
pub use q_table::{QEntry, QTable};
#[cfg(feature = "rl")]
pub use reward::{RewardComputer, RewardConfig};
#[cfg(feature = "rl")]
pub use solver::QLearningSolver;
#[cfg(feature = "rl")]
pub use trainer::{run_episode, EpisodeSummary, Trainer, TrainingReport};

#[cfg(all(feature = "rl", feature = "serde"))]
pub use persistence::{PersistenceError, SavedPolicy, TrainingStats};
