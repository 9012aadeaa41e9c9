//! JSON save format for trained agents.

use std::fs::File;
use std::io::{BufReader, BufWriter};
use std::path::Path;

use serde::{Deserialize, Serialize};
use thiserror::Error;
use tracing::info;

use super::agent::QLearningAgent;
use super::config::QLearningConfig;
use super::q_table::{QEntry, QTable};
use crate::grid::GridState;

#[derive(Debug, Error)]
pub enum PersistenceError {
    #[error("i/o error on {path}: {source}")]
    Io {
        path: String,
        #[source]
        source: std::io::Error,
    },

    #[error("malformed policy file: {0}")]
    Json(#[from] serde_json::Error),

    #[error("unsupported policy format version {found}, expected {expected}")]
    VersionMismatch { found: u32, expected: u32 },

    #[error("policy was trained on level '{saved}', not '{target}'")]
    LevelMismatch { saved: String, target: String },

    #[error("invalid saved configuration: {0}")]
    Config(#[from] crate::algorithms::error::ConfigError),
}

/// Counters carried along with a saved table.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct TrainingStats {
    pub episodes_trained: usize,
    pub total_steps: usize,
    pub unique_states: usize,
}

/// A trained agent as written to disk.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct SavedPolicy {
    pub version: u32,
    /// Name of the level the table was trained on.
    pub level: String,
    pub config: QLearningConfig,
    pub epsilon: f64,
    pub stats: TrainingStats,
    pub entries: Vec<QEntry>,
}

impl SavedPolicy {
    /// Current save format version.
    pub const VERSION: u32 = 1;

    pub fn from_agent(agent: &QLearningAgent, level: impl Into<String>) -> Self {
        Self {
            version: Self::VERSION,
            level: level.into(),
            config: agent.config().clone(),
            epsilon: agent.epsilon(),
            stats: TrainingStats {
                episodes_trained: agent.episodes_trained(),
                total_steps: agent.total_steps(),
                unique_states: agent.table().len(),
            },
            entries: agent.table().entries(),
        }
    }

    /// Rebuilds the agent. The RNG is reseeded from the saved configuration.
    pub fn to_agent(&self) -> Result<QLearningAgent, PersistenceError> {
        if self.version != Self::VERSION {
            return Err(PersistenceError::VersionMismatch {
                found: self.version,
                expected: Self::VERSION,
            });
        }
        self.config.validate()?;
        let table = QTable::from_entries(self.config.q_init, self.entries.iter().cloned());
        Ok(QLearningAgent::from_parts(
            self.config.clone(),
            table,
            self.epsilon,
            self.stats.episodes_trained,
            self.stats.total_steps,
        ))
    }

    /// Rebuilds the agent for play on `state`, whose level must carry the saved name.
    pub fn to_agent_for(&self, state: &GridState) -> Result<QLearningAgent, PersistenceError> {
        let target = state.board().name();
        if self.level != target {
            return Err(PersistenceError::LevelMismatch {
                saved: self.level.clone(),
                target: target.to_string(),
            });
        }
        self.to_agent()
    }

    pub fn to_json(&self) -> Result<String, PersistenceError> {
        Ok(serde_json::to_string_pretty(self)?)
    }

    pub fn from_json(text: &str) -> Result<Self, PersistenceError> {
        Ok(serde_json::from_str(text)?)
    }

    pub fn save_to_file<P: AsRef<Path>>(&self, path: P) -> Result<(), PersistenceError> {
        let path = path.as_ref();
        let file = File::create(path).map_err(|source| PersistenceError::Io {
            path: path.display().to_string(),
            source,
        })?;
        serde_json::to_writer_pretty(BufWriter::new(file), self)?;
        info!(path = %path.display(), states = self.entries.len(), "policy saved");
        Ok(())
    }

    pub fn load_from_file<P: AsRef<Path>>(path: P) -> Result<Self, PersistenceError> {
        let path = path.as_ref();
        let file = File::open(path).map_err(|source| PersistenceError::Io {
            path: path.display().to_string(),
            source,
        })?;
        let saved: Self = serde_json::from_reader(BufReader::new(file))?;
        info!(path = %path.display(), states = saved.entries.len(), "policy loaded");
        Ok(saved)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::algorithms::rl::environment::Environment;
    use crate::algorithms::rl::trainer::Trainer;
    use crate::grid::{GridState, LevelSpec};
    use std::sync::atomic::AtomicBool;

    fn trained_agent() -> (QLearningAgent, GridState) {
        let spec = LevelSpec::from_rows(&["P..", "...", "..E"]).unwrap().named("open");
        let state = GridState::new(&spec).unwrap();
        let config = QLearningConfig::default().with_seed(5);
        let mut env = Environment::new(state.clone(), config.rewards, config.max_steps_per_episode);
        let mut agent = QLearningAgent::new(config).unwrap();
        Trainer::new(30).train(&mut agent, &mut env, &AtomicBool::new(false));
        (agent, state)
    }

    #[test]
    fn file_roundtrip_preserves_table() {
        let (agent, _) = trained_agent();
        let saved = SavedPolicy::from_agent(&agent, "open");
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("policy.json");

        saved.save_to_file(&path).unwrap();
        let loaded = SavedPolicy::load_from_file(&path).unwrap();
        assert_eq!(loaded, saved);

        let restored = loaded.to_agent().unwrap();
        assert_eq!(restored.table(), agent.table());
        assert_eq!(restored.epsilon(), agent.epsilon());
        assert_eq!(restored.episodes_trained(), 30);
    }

    #[test]
    fn version_mismatch_is_rejected() {
        let (agent, _) = trained_agent();
        let mut saved = SavedPolicy::from_agent(&agent, "open");
        saved.version = 99;
        let err = saved.to_agent().unwrap_err();
        assert_eq!(
            err.to_string(),
            "unsupported policy format version 99, expected 1"
        );
    }

    #[test]
    fn restoring_checks_the_level_name() {
        let (agent, state) = trained_agent();
        let saved = SavedPolicy::from_agent(&agent, "open");
        let restored = saved.to_agent_for(&state).unwrap();
        assert_eq!(restored.table(), agent.table());

        let other = LevelSpec::from_rows(&["P..", "...", "..E"]).unwrap().named("corridor");
        let other = GridState::new(&other).unwrap();
        let err = saved.to_agent_for(&other).unwrap_err();
        assert!(matches!(err, PersistenceError::LevelMismatch { .. }));
        assert_eq!(
            err.to_string(),
            "policy was trained on level 'open', not 'corridor'"
        );
    }

    #[test]
    fn missing_file_reports_path() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("absent.json");
        let err = SavedPolicy::load_from_file(&path).unwrap_err();
        assert!(matches!(err, PersistenceError::Io { .. }));
        assert!(err.to_string().contains("absent.json"));
    }

    #[test]
    fn garbage_is_a_json_error() {
        assert!(matches!(
            SavedPolicy::from_json("{ not json"),
            Err(PersistenceError::Json(_))
        ));
    }
}
