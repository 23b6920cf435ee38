pub mod cell;
pub mod clue;
pub mod direction;
pub mod error;
pub mod grid;
pub mod numbering;
pub mod puzzle;

pub use cell::{CellSolution, CellStyle, PlayerState};
pub use clue::Clues;
pub use direction::Direction;
pub use error::{ClueAssignError, GridError};
pub use grid::{Coordinate, Grid};
pub use numbering::{ClueNumber, Entry, Numbering};
pub use puzzle::{Puzzle, Timer};
