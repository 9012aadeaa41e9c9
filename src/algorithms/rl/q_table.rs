//! Tabular action values keyed by the dynamic part of a grid state.

use std::collections::HashMap;

#[cfg(feature = "serde")]
use serde::{Deserialize, Serialize};

use crate::grid::{Action, GridState, Snapshot};

/// One row of the table, in a form that serializes without map keys.
#[derive(Debug, Clone, PartialEq)]
#[cfg_attr(feature = "serde", derive(Serialize, Deserialize))]
pub struct QEntry {
    pub state: Snapshot,
    /// Values indexed by [`Action::index`].
    pub values: [f64; Action::COUNT],
}

/// Q-values for every visited state.
///
/// The board is static for a level, so the [`Snapshot`] identifies a state.
/// A table trained on one level is meaningless on another.
#[derive(Debug, Clone, PartialEq)]
pub struct QTable {
    values: HashMap<Snapshot, [f64; Action::COUNT]>,
    q_init: f64,
}

impl QTable {
    pub fn new(q_init: f64) -> Self {
        Self {
            values: HashMap::new(),
            q_init,
        }
    }

    /// Number of states with at least one stored value.
    pub fn len(&self) -> usize {
        self.values.len()
    }

    pub fn is_empty(&self) -> bool {
        self.values.is_empty()
    }

    pub fn q_init(&self) -> f64 {
        self.q_init
    }

    pub fn get(&self, state: &GridState, action: Action) -> f64 {
        self.values
            .get(state.snapshot())
            .map_or(self.q_init, |row| row[action.index()])
    }

    pub fn set(&mut self, state: &GridState, action: Action, value: f64) {
        let q_init = self.q_init;
        let row = self
            .values
            .entry(state.snapshot().clone())
            .or_insert([q_init; Action::COUNT]);
        row[action.index()] = value;
    }

    /// Best legal action and its value, ties going to the earliest in [`Action::ALL`].
    ///
    /// `None` when no action is legal from `state`.
    pub fn best(&self, state: &GridState) -> Option<(Action, f64)> {
        let mut best: Option<(Action, f64)> = None;
        for action in state.legal_actions() {
            let value = self.get(state, action);
            if best.map_or(true, |(_, v)| value > v) {
                best = Some((action, value));
            }
        }
        best
    }

    /// max over legal actions of Q(state, a), or 0 when there is none.
    pub fn max_value(&self, state: &GridState) -> f64 {
        self.best(state).map_or(0.0, |(_, value)| value)
    }

    /// Rows sorted by state, for stable serialization.
    pub fn entries(&self) -> Vec<QEntry> {
        let mut entries: Vec<QEntry> = self
            .values
            .iter()
            .map(|(state, values)| QEntry {
                state: state.clone(),
                values: *values,
            })
            .collect();
        entries.sort_by(|a, b| a.state.cmp(&b.state));
        entries
    }

    pub fn from_entries(q_init: f64, entries: impl IntoIterator<Item = QEntry>) -> Self {
        Self {
            values: entries
                .into_iter()
                .map(|entry| (entry.state, entry.values))
                .collect(),
            q_init,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::grid::LevelSpec;

    fn corner() -> GridState {
        GridState::new(&LevelSpec::from_rows(&["P.", ".E"]).unwrap()).unwrap()
    }

    #[test]
    fn unseen_pairs_read_q_init() {
        let table = QTable::new(0.5);
        assert_eq!(table.get(&corner(), Action::Down), 0.5);
        assert!(table.is_empty());
    }

    #[test]
    fn best_considers_only_legal_actions() {
        let state = corner();
        let mut table = QTable::new(0.0);
        table.set(&state, Action::Up, 50.0);
        table.set(&state, Action::Right, -3.0);
        // Up is illegal from the top-left corner; Down (0.0) beats Right.
        assert_eq!(table.best(&state), Some((Action::Down, 0.0)));
        assert_eq!(table.len(), 1);
    }

    #[test]
    fn ties_go_to_first_action() {
        let state = corner();
        let table = QTable::new(1.0);
        assert_eq!(table.best(&state), Some((Action::Down, 1.0)));
    }

    #[test]
    fn terminal_states_have_no_best_action() {
        let won = corner().apply(Action::Down).unwrap().state.apply(Action::Right).unwrap().state;
        let table = QTable::new(7.0);
        assert_eq!(table.best(&won), None);
        assert_eq!(table.max_value(&won), 0.0);
    }

    #[test]
    fn entries_rebuild_the_table() {
        let state = corner();
        let mut table = QTable::new(0.0);
        table.set(&state, Action::Right, 2.5);
        let rebuilt = QTable::from_entries(0.0, table.entries());
        assert_eq!(rebuilt, table);
    }
}
