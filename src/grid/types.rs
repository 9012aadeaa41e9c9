//! Core types for the puzzle grid.
//!
//! Defines grid cells and the four movement actions used throughout the
//! transition model, the search engine and the Q-learning agent.

use std::fmt;

#[cfg(feature = "serde")]
use serde::{Deserialize, Serialize};

/// A movement direction.
///
/// The declaration order is also the fixed expansion and tie-breaking order
/// used by every solver: `Up, Down, Left, Right`.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
#[cfg_attr(feature = "serde", derive(Serialize, Deserialize))]
#[cfg_attr(feature = "serde", serde(rename_all = "snake_case"))]
pub enum Action {
    Up,
    Down,
    Left,
    Right,
}

impl Action {
    /// All actions in expansion order.
    pub const ALL: [Action; 4] = [Action::Up, Action::Down, Action::Left, Action::Right];

    /// Number of distinct actions.
    pub const COUNT: usize = 4;

    /// Returns the `(dx, dy)` displacement of this action. `y` grows downwards.
    pub fn delta(&self) -> (i32, i32) {
        match self {
            Action::Up => (0, -1),
            Action::Down => (0, 1),
            Action::Left => (-1, 0),
            Action::Right => (1, 0),
        }
    }

    /// Returns the index of this action in [`Action::ALL`].
    pub fn index(&self) -> usize {
        match self {
            Action::Up => 0,
            Action::Down => 1,
            Action::Left => 2,
            Action::Right => 3,
        }
    }
}

impl fmt::Display for Action {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Action::Up => write!(f, "up"),
            Action::Down => write!(f, "down"),
            Action::Left => write!(f, "left"),
            Action::Right => write!(f, "right"),
        }
    }
}

/// A cell coordinate on the grid. `(0, 0)` is the top-left corner.
///
/// Coordinates are signed so that neighbours of border cells can be formed
/// and then rejected by a bounds check.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Hash, PartialOrd, Ord)]
#[cfg_attr(feature = "serde", derive(Serialize, Deserialize))]
pub struct Cell {
    pub x: i32,
    pub y: i32,
}

impl Cell {
    /// Creates a new cell coordinate.
    pub const fn new(x: i32, y: i32) -> Self {
        Self { x, y }
    }

    /// Returns the neighbouring cell in the direction of `action`.
    pub fn step(&self, action: Action) -> Cell {
        let (dx, dy) = action.delta();
        Cell::new(self.x + dx, self.y + dy)
    }

    /// The four orthogonal neighbours, in [`Action::ALL`] order.
    pub fn neighbours(&self) -> [Cell; 4] {
        Action::ALL.map(|a| self.step(a))
    }

    /// Manhattan distance to another cell.
    pub fn manhattan(&self, other: &Cell) -> u32 {
        self.x.abs_diff(other.x) + self.y.abs_diff(other.y)
    }
}

impl From<(i32, i32)> for Cell {
    fn from((x, y): (i32, i32)) -> Self {
        Cell::new(x, y)
    }
}

impl fmt::Display for Cell {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "({}, {})", self.x, self.y)
    }
}
