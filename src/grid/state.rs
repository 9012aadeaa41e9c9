//! Immutable puzzle state.
//!
//! A [`GridState`] is split in two halves:
//!
//! - [`Board`]: everything that never changes during play (size, walls, exit,
//!   key cells, temporary walls). Shared between all derived states via [`Arc`].
//! - [`Snapshot`]: the small dynamic part (player, boxes, fluids, stone,
//!   collected keys, elapsed moves). This is what gets cloned per successor and
//!   what the search engine and the Q-table use as a key.

use std::collections::BTreeSet;
use std::fmt;
use std::hash::{Hash, Hasher};
use std::sync::Arc;

#[cfg(feature = "serde")]
use serde::{Deserialize, Serialize};

use super::error::LevelError;
use super::level::{LevelSpec, TempWall, MAX_KEYS};
use super::types::Cell;

/// Largest accepted grid side.
pub const MAX_SIDE: i32 = 1024;

/// Static part of a level.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Board {
    name: String,
    width: i32,
    height: i32,
    walls: Vec<bool>,
    exit: Cell,
    keys: Vec<Cell>,
    temp_walls: Vec<TempWall>,
    /// Elapsed-move counter saturates here; past it no temporary wall changes.
    elapsed_cap: u32,
}

impl Board {
    pub fn name(&self) -> &str {
        &self.name
    }

    pub fn width(&self) -> i32 {
        self.width
    }

    pub fn height(&self) -> i32 {
        self.height
    }

    pub fn exit(&self) -> Cell {
        self.exit
    }

    /// Key cells, indexed by their bit in [`Snapshot::collected_keys`].
    pub fn keys(&self) -> &[Cell] {
        &self.keys
    }

    pub fn temp_walls(&self) -> &[TempWall] {
        &self.temp_walls
    }

    /// Returns true if `cell` lies inside the grid.
    pub fn in_bounds(&self, cell: Cell) -> bool {
        cell.x >= 0 && cell.y >= 0 && cell.x < self.width && cell.y < self.height
    }

    fn index(&self, cell: Cell) -> Option<usize> {
        self.in_bounds(cell)
            .then(|| (cell.y * self.width + cell.x) as usize)
    }

    /// Returns true if `cell` is a permanent wall. Out-of-bounds cells are not walls.
    pub fn is_wall(&self, cell: Cell) -> bool {
        self.index(cell).is_some_and(|i| self.walls[i])
    }

    /// Returns the bit index of the key at `cell`, if any.
    pub fn key_index(&self, cell: Cell) -> Option<usize> {
        self.keys.iter().position(|k| *k == cell)
    }

    /// Returns true if a temporary wall at `cell` still blocks after `elapsed` moves.
    pub fn temp_wall_active(&self, cell: Cell, elapsed: u32) -> bool {
        self.temp_walls
            .iter()
            .any(|w| w.cell == cell && elapsed < w.duration)
    }

    /// Bit mask with one bit set per key of this level.
    pub fn all_keys_mask(&self) -> u64 {
        match self.keys.len() {
            0 => 0,
            MAX_KEYS => u64::MAX,
            n => (1u64 << n) - 1,
        }
    }

    pub(crate) fn elapsed_cap(&self) -> u32 {
        self.elapsed_cap
    }
}

/// Dynamic part of a state. Cheap to clone, hashable, order-independent for boxes.
#[derive(Debug, Clone, PartialEq, Eq, Hash, PartialOrd, Ord)]
#[cfg_attr(feature = "serde", derive(Serialize, Deserialize))]
pub struct Snapshot {
    pub(crate) player: Cell,
    pub(crate) boxes: BTreeSet<Cell>,
    pub(crate) lava: BTreeSet<Cell>,
    pub(crate) aqua: BTreeSet<Cell>,
    pub(crate) stone: BTreeSet<Cell>,
    pub(crate) collected_keys: u64,
    pub(crate) elapsed: u32,
}

impl Snapshot {
    pub fn player(&self) -> Cell {
        self.player
    }

    pub fn boxes(&self) -> &BTreeSet<Cell> {
        &self.boxes
    }

    pub fn lava(&self) -> &BTreeSet<Cell> {
        &self.lava
    }

    pub fn aqua(&self) -> &BTreeSet<Cell> {
        &self.aqua
    }

    pub fn stone(&self) -> &BTreeSet<Cell> {
        &self.stone
    }

    /// Bit set of collected keys (bit `i` ↔ `Board::keys()[i]`).
    pub fn collected_keys(&self) -> u64 {
        self.collected_keys
    }

    /// Successful moves so far, saturated at the board's longest temporary wall.
    pub fn elapsed(&self) -> u32 {
        self.elapsed
    }
}

/// A complete, immutable puzzle state.
///
/// Successor states are produced by [`GridState::apply`](crate::grid::GridState::apply);
/// nothing mutates a state after construction.
#[derive(Debug, Clone)]
pub struct GridState {
    pub(crate) board: Arc<Board>,
    pub(crate) snapshot: Snapshot,
}

impl GridState {
    /// Validates a level record and builds its initial state.
    ///
    /// # Errors
    ///
    /// Returns a [`LevelError`] when the grid is empty or too large, when any
    /// coordinate lies outside the grid, when the player, a box, the exit, a key
    /// or a fluid cell sits on a wall, when the player or a box starts inside an
    /// active temporary wall, when a box covers the exit, a key or lava, when
    /// boxes overlap each other or the player, or when there are more than
    /// [`MAX_KEYS`] keys.
    pub fn new(spec: &LevelSpec) -> Result<Self, LevelError> {
        let (width, height) = (spec.width, spec.height);
        if width <= 0 || height <= 0 {
            return Err(LevelError::EmptyGrid { width, height });
        }
        if width > MAX_SIDE || height > MAX_SIDE {
            return Err(LevelError::GridTooLarge { width, height });
        }
        if spec.keys.len() > MAX_KEYS {
            return Err(LevelError::TooManyKeys(spec.keys.len()));
        }

        let mut board = Board {
            name: spec.name.clone(),
            width,
            height,
            walls: vec![false; (width * height) as usize],
            exit: spec.exit,
            keys: Vec::new(),
            temp_walls: spec.temp_walls.clone(),
            elapsed_cap: spec.temp_walls.iter().map(|w| w.duration).max().unwrap_or(0),
        };

        for &wall in &spec.walls {
            let idx = board.index(wall).ok_or(LevelError::OutOfBounds {
                what: "wall",
                cell: wall,
            })?;
            board.walls[idx] = true;
        }

        let check = |what: &'static str, cell: Cell| -> Result<(), LevelError> {
            if !board.in_bounds(cell) {
                Err(LevelError::OutOfBounds { what, cell })
            } else if board.is_wall(cell) {
                Err(LevelError::OnWall { what, cell })
            } else {
                Ok(())
            }
        };

        let check_mobile = |what: &'static str, cell: Cell| -> Result<(), LevelError> {
            check(what, cell)?;
            if board.temp_wall_active(cell, 0) {
                return Err(LevelError::OnTemporaryWall { what, cell });
            }
            Ok(())
        };

        check_mobile("player", spec.player)?;
        check("exit", spec.exit)?;
        for &cell in &spec.keys {
            check("key", cell)?;
        }
        for wall in &spec.temp_walls {
            check("temporary wall", wall.cell)?;
        }
        for &cell in &spec.lava {
            check("lava", cell)?;
        }
        for &cell in &spec.aqua {
            check("aqua", cell)?;
        }

        let mut boxes = BTreeSet::new();
        for &cell in &spec.boxes {
            check_mobile("box", cell)?;
            let beneath = if cell == spec.exit {
                Some("the exit")
            } else if spec.keys.contains(&cell) {
                Some("a key")
            } else if spec.lava.contains(&cell) {
                Some("lava")
            } else {
                None
            };
            if let Some(what) = beneath {
                return Err(LevelError::BoxOn { what, cell });
            }
            if !boxes.insert(cell) {
                return Err(LevelError::OverlappingBoxes(cell));
            }
        }
        if boxes.contains(&spec.player) {
            return Err(LevelError::PlayerOnBox(spec.player));
        }

        let mut keys = Vec::new();
        for &cell in &spec.keys {
            if !keys.contains(&cell) {
                keys.push(cell);
            }
        }
        board.keys = keys;

        let mut lava: BTreeSet<Cell> = spec.lava.iter().copied().collect();
        // A box standing in aqua has displaced it, as a push would.
        let mut aqua: BTreeSet<Cell> = spec
            .aqua
            .iter()
            .copied()
            .filter(|cell| !boxes.contains(cell))
            .collect();
        let stone: BTreeSet<Cell> = lava.intersection(&aqua).copied().collect();
        for cell in &stone {
            lava.remove(cell);
            aqua.remove(cell);
        }

        let collected_keys = board
            .key_index(spec.player)
            .map(|i| 1u64 << i)
            .unwrap_or(0);

        Ok(Self {
            board: Arc::new(board),
            snapshot: Snapshot {
                player: spec.player,
                boxes,
                lava,
                aqua,
                stone,
                collected_keys,
                elapsed: 0,
            },
        })
    }

    /// Rebuilds a state from a shared board and a snapshot taken from it.
    pub fn from_parts(board: Arc<Board>, snapshot: Snapshot) -> Self {
        Self { board, snapshot }
    }

    pub fn board(&self) -> &Arc<Board> {
        &self.board
    }

    pub fn snapshot(&self) -> &Snapshot {
        &self.snapshot
    }

    pub fn into_snapshot(self) -> Snapshot {
        self.snapshot
    }

    pub fn player(&self) -> Cell {
        self.snapshot.player
    }

    pub fn exit(&self) -> Cell {
        self.board.exit
    }

    pub fn width(&self) -> i32 {
        self.board.width
    }

    pub fn height(&self) -> i32 {
        self.board.height
    }

    pub fn has_box(&self, cell: Cell) -> bool {
        self.snapshot.boxes.contains(&cell)
    }

    pub fn has_lava(&self, cell: Cell) -> bool {
        self.snapshot.lava.contains(&cell)
    }

    /// Returns true if movement into `cell` is stopped by a wall, stone or an
    /// active temporary wall. Boxes are handled separately by the push rule.
    pub fn is_blocked(&self, cell: Cell) -> bool {
        self.board.is_wall(cell)
            || self.snapshot.stone.contains(&cell)
            || self.board.temp_wall_active(cell, self.snapshot.elapsed)
    }

    /// Returns true if the key at bit `index` has been collected.
    pub fn has_key(&self, index: usize) -> bool {
        index < MAX_KEYS && self.snapshot.collected_keys & (1u64 << index) != 0
    }

    /// Number of keys not yet collected.
    pub fn keys_remaining(&self) -> u32 {
        (self.board.all_keys_mask() & !self.snapshot.collected_keys).count_ones()
    }

    /// Cells of the keys not yet collected.
    pub fn uncollected_keys(&self) -> impl Iterator<Item = Cell> + '_ {
        self.board
            .keys
            .iter()
            .enumerate()
            .filter(|(i, _)| !self.has_key(*i))
            .map(|(_, c)| *c)
    }

    /// Player stands in lava: failure terminal.
    pub fn is_dead(&self) -> bool {
        self.snapshot.lava.contains(&self.snapshot.player)
    }

    /// Player stands on the exit with every key collected, and is alive.
    pub fn is_won(&self) -> bool {
        !self.is_dead() && self.snapshot.player == self.board.exit && self.keys_remaining() == 0
    }

    /// Either win or failure.
    pub fn is_terminal(&self) -> bool {
        self.is_won() || self.is_dead()
    }

    fn glyph(&self, cell: Cell) -> char {
        let snap = &self.snapshot;
        if cell == snap.player {
            return if self.is_dead() { 'X' } else { 'P' };
        }
        if snap.boxes.contains(&cell) {
            return 'B';
        }
        if snap.stone.contains(&cell) {
            return '%';
        }
        if snap.lava.contains(&cell) {
            return 'L';
        }
        if snap.aqua.contains(&cell) {
            return 'A';
        }
        if self.board.is_wall(cell) {
            return '#';
        }
        if let Some(wall) = self
            .board
            .temp_walls
            .iter()
            .find(|w| w.cell == cell && snap.elapsed < w.duration)
        {
            let left = (wall.duration - snap.elapsed).min(9);
            return char::from_digit(left, 10).unwrap_or('9');
        }
        if let Some(i) = self.board.key_index(cell) {
            if !self.has_key(i) {
                return 'K';
            }
        }
        if cell == self.board.exit {
            return 'E';
        }
        '.'
    }
}

impl PartialEq for GridState {
    fn eq(&self, other: &Self) -> bool {
        self.snapshot == other.snapshot
            && (Arc::ptr_eq(&self.board, &other.board) || self.board == other.board)
    }
}

impl Eq for GridState {}

impl Hash for GridState {
    fn hash<H: Hasher>(&self, state: &mut H) {
        self.snapshot.hash(state);
    }
}

/// Renders the state with the same glyphs [`LevelSpec::from_rows`] accepts,
/// plus `%` for stone and `X` for a dead player.
impl fmt::Display for GridState {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        for y in 0..self.board.height {
            let row: String = (0..self.board.width)
                .map(|x| self.glyph(Cell::new(x, y)))
                .collect();
            writeln!(f, "{}", row)?;
        }
        Ok(())
    }
}
