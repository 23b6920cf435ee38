//! Standard crossword clue numbering.
//!
//! Cells are visited in row-major order. A non-block cell starts an across
//! entry when the cell to its left is a block (or off the grid) and the cell to
//! its right is not; down entries mirror this vertically. Every cell that starts
//! at least one entry receives the next number, beginning at 1.

use crate::{Coordinate, Direction, Grid};
use serde::{Deserialize, Serialize};

/// Numbering outcome for a single cell.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct ClueNumber {
    /// 0 when the cell is unnumbered.
    pub number: u16,
    pub starts_across: bool,
    pub starts_down: bool,
}

impl ClueNumber {
    pub fn is_numbered(&self) -> bool {
        self.number > 0
    }

    pub fn starts(&self, direction: Direction) -> bool {
        match direction {
            Direction::Across => self.starts_across,
            Direction::Down => self.starts_down,
        }
    }
}

/// One clue slot: a numbered cell plus the direction it runs in.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct Entry {
    pub number: u16,
    pub direction: Direction,
    pub start: Coordinate,
}

/// The numbered form of a block pattern.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Numbering {
    cells: Grid<ClueNumber>,
}

impl Numbering {
    /// Numbers a `width` x `height` grid. `is_block` is only consulted for
    /// in-grid coordinates; everything outside the grid counts as a block.
    pub fn compute(width: usize, height: usize, is_block: impl Fn(Coordinate) -> bool) -> Self {
        let blocked = |coord: Option<Coordinate>| match coord {
            Some(c) if c.col <= width && c.row <= height => is_block(c),
            _ => true,
        };

        let mut next_number = 0u16;
        let cells = Grid::from_fn(width, height, |coord| {
            if is_block(coord) {
                return ClueNumber::default();
            }

            let opens = |direction: Direction| {
                blocked(coord.step(direction, -1)) && !blocked(coord.step(direction, 1))
            };
            let starts_across = opens(Direction::Across);
            let starts_down = opens(Direction::Down);

            if starts_across || starts_down {
                next_number += 1;
                ClueNumber {
                    number: next_number,
                    starts_across,
                    starts_down,
                }
            } else {
                ClueNumber::default()
            }
        });

        Self { cells }
    }

    /// Numbers the block pattern of an existing grid.
    pub fn of_blocks<T>(grid: &Grid<T>, is_block: impl Fn(&T) -> bool) -> Self {
        Self::compute(grid.width(), grid.height(), |c| is_block(&grid[c]))
    }

    pub fn get(&self, coord: Coordinate) -> Option<&ClueNumber> {
        self.cells.get(coord)
    }

    pub fn grid(&self) -> &Grid<ClueNumber> {
        &self.cells
    }

    pub fn number_at(&self, coord: Coordinate) -> u16 {
        self.cells.get(coord).map_or(0, |n| n.number)
    }

    /// Entries in PUZ clue order: row-major by start cell, across before down.
    pub fn entries(&self) -> impl Iterator<Item = Entry> + '_ {
        self.cells.iter().flat_map(|(start, n)| {
            Direction::ALL
                .into_iter()
                .filter(move |&d| n.starts(d))
                .map(move |direction| Entry {
                    number: n.number,
                    direction,
                    start,
                })
        })
    }

    /// Number of clue slots (an across+down cell counts twice).
    pub fn entry_count(&self) -> usize {
        self.cells
            .values()
            .iter()
            .map(|n| n.starts_across as usize + n.starts_down as usize)
            .sum()
    }

    pub fn highest_number(&self) -> u16 {
        self.cells.values().iter().map(|n| n.number).max().unwrap_or(0)
    }
}
