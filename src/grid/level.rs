//! Typed level input.
//!
//! A [`LevelSpec`] is the structured record a level loader hands to
//! [`GridState::new`](super::GridState::new). It carries raw coordinates only;
//! all validation happens when the state is built.

#[cfg(feature = "serde")]
use serde::{Deserialize, Serialize};

use super::error::LevelError;
use super::types::Cell;

/// Maximum number of exit keys in one level (collected keys are a bit set).
pub const MAX_KEYS: usize = 64;

/// A wall that blocks movement for a fixed number of moves, then disappears.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
#[cfg_attr(feature = "serde", derive(Serialize, Deserialize))]
pub struct TempWall {
    pub cell: Cell,
    /// Number of successful moves after which the wall stops blocking.
    pub duration: u32,
}

/// Level description: grid size plus the initial position of every entity.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
#[cfg_attr(feature = "serde", derive(Serialize, Deserialize))]
pub struct LevelSpec {
    pub name: String,
    pub width: i32,
    pub height: i32,
    pub walls: Vec<Cell>,
    pub lava: Vec<Cell>,
    #[cfg_attr(feature = "serde", serde(default))]
    pub aqua: Vec<Cell>,
    #[cfg_attr(feature = "serde", serde(default))]
    pub boxes: Vec<Cell>,
    #[cfg_attr(feature = "serde", serde(default))]
    pub keys: Vec<Cell>,
    #[cfg_attr(feature = "serde", serde(default))]
    pub temp_walls: Vec<TempWall>,
    pub player: Cell,
    pub exit: Cell,
}

impl LevelSpec {
    /// Creates an empty, wall-less level of the given size.
    pub fn open(width: i32, height: i32, player: Cell, exit: Cell) -> Self {
        Self {
            name: String::from("Unnamed Level"),
            width,
            height,
            player,
            exit,
            ..Self::default()
        }
    }

    /// Parses the compact ASCII notation, one string per row.
    ///
    /// | glyph       | meaning                                 |
    /// |-------------|-----------------------------------------|
    /// | `#`         | wall                                    |
    /// | ` ` or `.`  | floor                                   |
    /// | `P`         | player start                            |
    /// | `E`         | exit                                    |
    /// | `L`         | lava                                    |
    /// | `A`         | aqua                                    |
    /// | `B`         | box                                     |
    /// | `K`         | exit key                                |
    /// | `1`..=`9`   | temporary wall lasting that many moves  |
    pub fn from_rows<S: AsRef<str>>(rows: &[S]) -> Result<Self, LevelError> {
        let height = rows.len();
        let width = rows.first().map(|r| r.as_ref().chars().count()).unwrap_or(0);
        if height == 0 || width == 0 {
            return Err(LevelError::EmptyGrid {
                width: width as i32,
                height: height as i32,
            });
        }

        let mut spec = LevelSpec {
            width: width as i32,
            height: height as i32,
            ..LevelSpec::default()
        };
        let mut player = None;
        let mut exit = None;

        for (y, row) in rows.iter().enumerate() {
            let row = row.as_ref();
            let found = row.chars().count();
            if found != width {
                return Err(LevelError::RaggedRow {
                    row: y,
                    expected: width,
                    found,
                });
            }
            for (x, glyph) in row.chars().enumerate() {
                let cell = Cell::new(x as i32, y as i32);
                match glyph {
                    ' ' | '.' => {}
                    '#' => spec.walls.push(cell),
                    'L' => spec.lava.push(cell),
                    'A' => spec.aqua.push(cell),
                    'B' => spec.boxes.push(cell),
                    'K' => spec.keys.push(cell),
                    'P' => {
                        if player.replace(cell).is_some() {
                            return Err(LevelError::Duplicate("player"));
                        }
                    }
                    'E' => {
                        if exit.replace(cell).is_some() {
                            return Err(LevelError::Duplicate("exit"));
                        }
                    }
                    '1'..='9' => spec.temp_walls.push(TempWall {
                        cell,
                        duration: glyph.to_digit(10).unwrap_or(1),
                    }),
                    other => return Err(LevelError::UnknownGlyph { glyph: other, cell }),
                }
            }
        }

        spec.player = player.ok_or(LevelError::MissingPlayer)?;
        spec.exit = exit.ok_or(LevelError::MissingExit)?;
        Ok(spec)
    }

    /// Parses a multi-line string; see [`LevelSpec::from_rows`].
    pub fn from_ascii(text: &str) -> Result<Self, LevelError> {
        let rows: Vec<&str> = text.lines().collect();
        Self::from_rows(&rows)
    }

    /// Sets the level name.
    pub fn named(mut self, name: impl Into<String>) -> Self {
        self.name = name.into();
        self
    }
}


/// Property-test generators for levels mixing every kind of entity.
#[cfg(test)]
pub(crate) mod strategies {
    use proptest::prelude::*;
    use proptest::sample::select;

    use super::LevelSpec;
    use crate::grid::GridState;

    const GLYPHS: [char; 11] = ['.', '.', '.', '.', '#', 'L', 'A', 'B', 'K', '2', '4'];

    /// Small levels with walls, lava, aqua, boxes, keys and temporary walls.
    pub(crate) fn mixed_level() -> impl Strategy<Value = LevelSpec> {
        (3usize..6, 2usize..5).prop_flat_map(|(w, h)| {
            let n = w * h;
            (proptest::collection::vec(select(GLYPHS.to_vec()), n), 0..n, 0..n)
                .prop_filter_map("player and exit must differ", move |(mut glyphs, p, e)| {
                    if p == e {
                        return None;
                    }
                    glyphs[p] = 'P';
                    glyphs[e] = 'E';
                    let rows: Vec<String> =
                        glyphs.chunks(w).map(|row| row.iter().collect()).collect();
                    LevelSpec::from_rows(&rows)
                        .ok()
                        .filter(|spec| GridState::new(spec).is_ok())
                })
        })
    }
}
