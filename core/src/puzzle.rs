use crate::{
    CellSolution, CellStyle, ClueAssignError, Clues, Coordinate, Grid, Numbering, PlayerState,
};
use serde::{Deserialize, Serialize};
use std::fmt;

/// Solving-timer state carried with a puzzle.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct Timer {
    pub elapsed_secs: u32,
    pub running: bool,
}

impl Timer {
    pub fn is_default(&self) -> bool {
        self.elapsed_secs == 0 && !self.running
    }
}

/// A complete crossword: grid contents, solver progress, markup, clues and metadata.
///
/// Dimensions are fixed at construction; every per-cell grid covers the same
/// `width` x `height` rectangle.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Puzzle {
    width: usize,
    height: usize,
    pub title: Option<String>,
    pub author: Option<String>,
    pub copyright: Option<String>,
    pub notes: Option<String>,
    pub diagramless: bool,
    pub timer: Timer,
    /// Four digits 1-9; present iff the solution is (to be) locked.
    pub unlock_code: Option<String>,
    pub solutions: Grid<CellSolution>,
    pub player_state: Grid<PlayerState>,
    pub styles: Grid<CellStyle>,
    pub clues: Clues,
}

impl Puzzle {
    /// An open (block-free, unnumbered) puzzle.
    pub fn new(width: usize, height: usize) -> Self {
        Self {
            width,
            height,
            title: None,
            author: None,
            copyright: None,
            notes: None,
            diagramless: false,
            timer: Timer::default(),
            unlock_code: None,
            solutions: Grid::filled(width, height, CellSolution::default()),
            player_state: Grid::filled(width, height, PlayerState::default()),
            styles: Grid::filled(width, height, CellStyle::default()),
            clues: Clues::new(),
        }
    }

    /// Builds a puzzle from solution rows where `.` marks a block and any other
    /// character is that cell's letter. Cells are numbered; clues are left empty.
    pub fn from_solution_rows(rows: &[&str]) -> Self {
        let height = rows.len();
        let width = rows.iter().map(|r| r.chars().count()).max().unwrap_or(0);
        let mut puzzle = Self::new(width, height);

        for (row_i, row) in rows.iter().enumerate() {
            for (col_i, ch) in row.chars().enumerate() {
                let coord = Coordinate::new(col_i + 1, row_i + 1);
                if ch == '.' {
                    puzzle.styles[coord].block = true;
                } else {
                    puzzle.solutions[coord] = CellSolution::letter(ch);
                }
            }
        }
        // short rows are padded with blocks
        for coord in puzzle.coordinates().collect::<Vec<_>>() {
            if puzzle.solutions[coord].letter.is_none() {
                puzzle.styles[coord].block = true;
            }
        }

        puzzle.assign_clue_numbers();
        puzzle
    }

    pub fn width(&self) -> usize {
        self.width
    }

    pub fn height(&self) -> usize {
        self.height
    }

    pub fn cell_count(&self) -> usize {
        self.width * self.height
    }

    pub fn coordinates(&self) -> impl Iterator<Item = Coordinate> + use<> {
        let (width, height) = (self.width, self.height);
        (1..=height).flat_map(move |row| (1..=width).map(move |col| Coordinate::new(col, row)))
    }

    pub fn is_block(&self, coord: Coordinate) -> bool {
        self.styles.get(coord).is_some_and(|s| s.block)
    }

    pub fn is_solution_encrypted(&self) -> bool {
        self.unlock_code.is_some()
    }

    /// Numbering derived from the current block pattern.
    pub fn numbering(&self) -> Numbering {
        Numbering::of_blocks(&self.styles, |s| s.block)
    }

    /// Rewrites every cell style's number from the current block pattern.
    pub fn assign_clue_numbers(&mut self) {
        let numbering = self.numbering();
        for (coord, n) in numbering.grid().iter() {
            self.styles[coord].number = n.number;
        }
    }

    /// Replaces the clue maps by distributing `clues` over the numbered entries.
    pub fn assign_clues(&mut self, clues: Vec<String>) -> Result<(), ClueAssignError> {
        self.clues = Clues::assign(&self.numbering(), clues)?;
        Ok(())
    }

    /// Clue text in PUZ order, following the numbers stored in the cell styles:
    /// for each numbered cell, its across clue (if any) then its down clue (if any).
    pub fn flattened_clues(&self) -> Vec<String> {
        let mut out = Vec::with_capacity(self.clues.len());
        for (_, style) in self.styles.iter() {
            if style.number == 0 {
                continue;
            }
            if let Some(text) = self.clues.across.get(&style.number) {
                out.push(text.clone());
            }
            if let Some(text) = self.clues.down.get(&style.number) {
                out.push(text.clone());
            }
        }
        out
    }

    /// True when every open cell holds the correct entry.
    pub fn is_solved(&self) -> bool {
        self.coordinates()
            .filter(|&c| !self.is_block(c))
            .all(|c| {
                let solution = &self.solutions[c];
                match &self.player_state[c] {
                    PlayerState::Empty => false,
                    PlayerState::Letter(l) => solution.rebus.is_none() && solution.letter == Some(*l),
                    PlayerState::Rebus(r) => solution.rebus.as_deref() == Some(r.as_str()),
                }
            })
    }
}

impl fmt::Display for Puzzle {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(
            f,
            "{} by {} [{}x{}]",
            self.title.as_deref().unwrap_or("Untitled"),
            self.author.as_deref().unwrap_or("Unknown"),
            self.width,
            self.height
        )
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::Direction;

    #[test]
    fn test_from_solution_rows_numbers_grid() {
        let p = Puzzle::from_solution_rows(&["CAT", "A.A", "BAT"]);
        assert!(p.is_block(Coordinate::new(2, 2)));
        assert_eq!(p.styles[Coordinate::new(1, 1)].number, 1);
        assert_eq!(p.styles[Coordinate::new(3, 1)].number, 2);
        assert_eq!(p.styles[Coordinate::new(1, 3)].number, 3);
        assert_eq!(p.numbering().entry_count(), 4);
    }

    #[test]
    fn test_assign_and_flatten_clues() {
        let mut p = Puzzle::from_solution_rows(&["CAT", "A.A", "BAT"]);
        let clues = ["Pet", "Taxi", "Label", "Hit lightly"]
            .map(String::from)
            .to_vec();
        p.assign_clues(clues.clone()).unwrap();
        assert_eq!(p.clues.get(Direction::Across, 1), Some("Pet"));
        assert_eq!(p.clues.get(Direction::Down, 1), Some("Taxi"));
        assert_eq!(p.clues.get(Direction::Down, 2), Some("Label"));
        assert_eq!(p.clues.get(Direction::Across, 3), Some("Hit lightly"));
        assert_eq!(p.flattened_clues(), clues);

        let err = p.assign_clues(vec!["only one".to_string()]).unwrap_err();
        assert_eq!(err.expected, 4);
        assert_eq!(err.found, 1);
    }

    #[test]
    fn test_is_solved() {
        let mut p = Puzzle::from_solution_rows(&["AB", "CD"]);
        assert!(!p.is_solved());
        for (coord, ch) in [((1, 1), 'A'), ((2, 1), 'B'), ((1, 2), 'C'), ((2, 2), 'D')] {
            p.player_state[Coordinate::new(coord.0, coord.1)] = PlayerState::Letter(ch);
        }
        assert!(p.is_solved());
    }

    #[test]
    fn test_display() {
        let mut p = Puzzle::new(15, 15);
        p.title = Some("Monday".to_string());
        p.author = Some("A. Setter".to_string());
        assert_eq!(p.to_string(), "Monday by A. Setter [15x15]");
    }
}
