//! Distance estimates for informed search.

use crate::grid::GridState;

/// Estimates the remaining cost from a state to a win.
pub trait Heuristic {
    fn estimate(&self, state: &GridState) -> u32;
}

/// Manhattan distance to the exit, detouring through the farthest uncollected key.
///
/// Every key must be visited before the exit, so the walk to any single key
/// and on to the exit is a lower bound on the remaining moves. Taking the
/// maximum over keys keeps the bound admissible and consistent.
#[derive(Debug, Clone, Copy, Default)]
pub struct KeysThenExit;

impl Heuristic for KeysThenExit {
    fn estimate(&self, state: &GridState) -> u32 {
        if state.is_dead() {
            return 0;
        }
        let player = state.player();
        let exit = state.exit();
        state
            .uncollected_keys()
            .map(|key| player.manhattan(&key) + key.manhattan(&exit))
            .max()
            .unwrap_or_else(|| player.manhattan(&exit))
    }
}
