//! Transition model: `GridState × Action → GridState`.
//!
//! A move proceeds in this order:
//!
//! 1. The target cell must be in bounds and not blocked (wall, stone, active
//!    temporary wall).
//! 2. A box in the target is pushed one cell further if that cell is free.
//! 3. The player moves; a key under the player is collected.
//! 4. The elapsed-move counter ticks, expiring temporary walls.
//! 5. Lava and aqua spread one cell; where they meet, stone forms.
//!
//! Walking into lava is legal and produces a dead state, as does lava flowing
//! onto the player. Dead and won states accept no further moves.

use std::collections::BTreeSet;

use thiserror::Error;

use super::state::{Board, GridState, Snapshot};
use super::types::{Action, Cell};

/// Cost of every move, pushes included.
pub const STEP_COST: u32 = 1;

/// Why an action cannot be applied to a state.
#[derive(Debug, Error, Clone, Copy, PartialEq, Eq)]
pub enum IllegalMove {
    #[error("State is terminal, no further moves")]
    Terminal,

    #[error("Target {0} is outside the grid")]
    OutOfBounds(Cell),

    #[error("Target {0} is blocked")]
    Blocked(Cell),

    #[error("Box at {from} cannot be pushed to {to}")]
    BoxBlocked { from: Cell, to: Cell },
}

/// A legal move's result.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Transition {
    pub state: GridState,
    pub cost: u32,
}

impl GridState {
    /// Applies `action`, returning the successor state or the reason it is illegal.
    ///
    /// Pure and deterministic: `self` is never modified and equal inputs yield
    /// equal outputs.
    pub fn apply(&self, action: Action) -> Result<Transition, IllegalMove> {
        if self.is_terminal() {
            return Err(IllegalMove::Terminal);
        }

        let board = &*self.board;
        let target = self.snapshot.player.step(action);
        if !board.in_bounds(target) {
            return Err(IllegalMove::OutOfBounds(target));
        }
        if self.is_blocked(target) {
            return Err(IllegalMove::Blocked(target));
        }

        let mut next = self.snapshot.clone();
        if next.boxes.contains(&target) {
            let beyond = target.step(action);
            if !self.box_can_enter(beyond) {
                return Err(IllegalMove::BoxBlocked {
                    from: target,
                    to: beyond,
                });
            }
            next.boxes.remove(&target);
            next.boxes.insert(beyond);
            next.aqua.remove(&beyond);
        }

        next.player = target;
        if let Some(i) = board.key_index(target) {
            next.collected_keys |= 1u64 << i;
        }
        next.elapsed = (next.elapsed + 1).min(board.elapsed_cap());
        spread_fluids(board, &mut next);

        Ok(Transition {
            state: GridState::from_parts(self.board.clone(), next),
            cost: STEP_COST,
        })
    }

    /// Actions that [`GridState::apply`] accepts, in [`Action::ALL`] order.
    pub fn legal_actions(&self) -> Vec<Action> {
        Action::ALL
            .into_iter()
            .filter(|a| self.apply(*a).is_ok())
            .collect()
    }

    /// All legal successors, in [`Action::ALL`] order.
    pub fn successors(&self) -> impl Iterator<Item = (Action, Transition)> + '_ {
        Action::ALL
            .into_iter()
            .filter_map(move |a| self.apply(a).ok().map(|t| (a, t)))
    }

    /// Applies a whole action sequence, stopping at the first illegal move.
    pub fn replay(&self, actions: &[Action]) -> Result<GridState, (usize, IllegalMove)> {
        let mut state = self.clone();
        for (i, action) in actions.iter().enumerate() {
            state = state.apply(*action).map_err(|e| (i, e))?.state;
        }
        Ok(state)
    }

    fn box_can_enter(&self, cell: Cell) -> bool {
        let board = &*self.board;
        board.in_bounds(cell)
            && !self.is_blocked(cell)
            && !self.snapshot.boxes.contains(&cell)
            && !self.snapshot.lava.contains(&cell)
            && board.key_index(cell).is_none()
            && cell != board.exit()
    }
}

/// Returns true if a fluid may flow into `cell`.
fn flowable(board: &Board, snap: &Snapshot, cell: Cell) -> bool {
    board.in_bounds(cell)
        && !board.is_wall(cell)
        && !board.temp_wall_active(cell, snap.elapsed)
        && !snap.stone.contains(&cell)
        && !snap.boxes.contains(&cell)
        && cell != board.exit()
        && board
            .key_index(cell)
            .map_or(true, |i| snap.collected_keys & (1u64 << i) != 0)
}

/// Cells a fluid reaches this step that it does not already cover.
fn front(board: &Board, snap: &Snapshot, fluid: &BTreeSet<Cell>) -> BTreeSet<Cell> {
    fluid
        .iter()
        .flat_map(|c| c.neighbours())
        .filter(|c| !fluid.contains(c) && flowable(board, snap, *c))
        .collect()
}

/// Both fluids advance simultaneously from their pre-step extent.
fn spread_fluids(board: &Board, snap: &mut Snapshot) {
    if snap.lava.is_empty() && snap.aqua.is_empty() {
        return;
    }

    let lava_front = front(board, snap, &snap.lava);
    let aqua_front = front(board, snap, &snap.aqua);

    let mut solidified = Vec::new();
    for cell in &lava_front {
        if snap.aqua.contains(cell) || aqua_front.contains(cell) {
            solidified.push(*cell);
        } else {
            snap.lava.insert(*cell);
        }
    }
    for cell in &aqua_front {
        if snap.lava.contains(cell) && !lava_front.contains(cell) {
            solidified.push(*cell);
        } else if !lava_front.contains(cell) {
            snap.aqua.insert(*cell);
        }
    }

    for cell in solidified {
        snap.lava.remove(&cell);
        snap.aqua.remove(&cell);
        snap.stone.insert(cell);
    }
}
