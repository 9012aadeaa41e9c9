use thiserror::Error;

use super::types::Cell;

/// Errors raised while validating level input, before any solver runs.
#[derive(Debug, Error, Clone, PartialEq, Eq)]
pub enum LevelError {
    #[error("Grid dimensions must be positive, got {width}x{height}")]
    EmptyGrid { width: i32, height: i32 },

    #[error("Grid of {width}x{height} exceeds the supported size")]
    GridTooLarge { width: i32, height: i32 },

    #[error("{what} at {cell} is outside the grid")]
    OutOfBounds { what: &'static str, cell: Cell },

    #[error("{what} at {cell} overlaps a wall")]
    OnWall { what: &'static str, cell: Cell },

    #[error("{what} at {cell} starts inside a temporary wall")]
    OnTemporaryWall { what: &'static str, cell: Cell },

    #[error("Box at {cell} starts on {what}")]
    BoxOn { what: &'static str, cell: Cell },

    #[error("Two boxes share cell {0}")]
    OverlappingBoxes(Cell),

    #[error("Player starts inside a box at {0}")]
    PlayerOnBox(Cell),

    #[error("Level has {0} keys, at most {max} are supported", max = super::level::MAX_KEYS)]
    TooManyKeys(usize),

    #[error("Level has no player start position")]
    MissingPlayer,

    #[error("Level has no exit")]
    MissingExit,

    #[error("Level has more than one {0}")]
    Duplicate(&'static str),

    #[error("Row {row} has width {found}, expected {expected}")]
    RaggedRow {
        row: usize,
        expected: usize,
        found: usize,
    },

    #[error("Unknown tile '{glyph}' at {cell}")]
    UnknownGlyph { glyph: char, cell: Cell },
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn out_of_bounds_display() {
        let e = LevelError::OutOfBounds {
            what: "exit",
            cell: Cell::new(4, -1),
        };
        assert_eq!(e.to_string(), "exit at (4, -1) is outside the grid");
    }

    #[test]
    fn on_wall_display() {
        let e = LevelError::OnWall {
            what: "player",
            cell: Cell::new(0, 0),
        };
        assert_eq!(e.to_string(), "player at (0, 0) overlaps a wall");
    }

    #[test]
    fn start_overlap_display() {
        let e = LevelError::OnTemporaryWall {
            what: "box",
            cell: Cell::new(1, 0),
        };
        assert_eq!(e.to_string(), "box at (1, 0) starts inside a temporary wall");
        let e = LevelError::BoxOn {
            what: "the exit",
            cell: Cell::new(2, 2),
        };
        assert_eq!(e.to_string(), "Box at (2, 2) starts on the exit");
    }

    #[test]
    fn too_many_keys_display() {
        let e = LevelError::TooManyKeys(70);
        assert!(e.to_string().starts_with("Level has 70 keys"));
    }

    #[test]
    fn ragged_row_display() {
        let e = LevelError::RaggedRow {
            row: 2,
            expected: 5,
            found: 3,
        };
        assert_eq!(e.to_string(), "Row 2 has width 3, expected 5");
    }
}
