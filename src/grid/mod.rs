//! Grid puzzle model: level input, immutable states and the transition model.

pub mod error;
pub mod level;
pub mod state;
pub mod transition;
pub mod types;

pub use error::LevelError;
pub use level::{LevelSpec, TempWall, MAX_KEYS};
pub use state::{Board, GridState, Snapshot};
pub use transition::{IllegalMove, Transition, STEP_COST};
pub use types::{Action, Cell};
