use crate::Coordinate;
use thiserror::Error;

#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum GridError {
    #[error("Coordinate {coord} is outside the {width}x{height} grid")]
    OutOfBounds {
        coord: Coordinate,
        width: usize,
        height: usize,
    },

    #[error("Grid holds {found} cells, expected {expected}")]
    SizeMismatch { expected: usize, found: usize },
}

/// Raised when a flat clue list does not line up with the numbered entries of a grid.
#[derive(Error, Debug, Clone, PartialEq, Eq)]
#[error("Grid has {expected} numbered entries but {found} clues were supplied")]
pub struct ClueAssignError {
    pub expected: usize,
    pub found: usize,
}
