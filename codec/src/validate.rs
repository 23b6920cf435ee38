//! Structural checks a puzzle must pass before it can be encoded.

use crate::cipher::UnlockKey;
use crate::error::{PuzError, Result};
use puzkit_core::{CellSolution, Clues, Grid, PlayerState, Puzzle};

const MAX_DIMENSION: usize = 255;

/// Confirms that `puzzle` can be written as a PUZ image.
///
/// Reports the first problem found. Text that cannot be stored is caught while
/// encoding, not here.
pub fn validate(puzzle: &Puzzle) -> Result<()> {
    check_dimensions(puzzle)?;
    check_grid_size("solution", &puzzle.solutions, puzzle)?;
    check_grid_size("player state", &puzzle.player_state, puzzle)?;
    check_grid_size("cell style", &puzzle.styles, puzzle)?;
    check_numbering(puzzle)?;
    check_blocks(puzzle)?;
    check_solution(puzzle)?;
    check_player_state(puzzle)?;
    check_strings(puzzle)?;
    check_clues(puzzle)?;
    if let Some(code) = &puzzle.unlock_code {
        code.parse::<UnlockKey>()?;
    }
    Ok(())
}

fn check_dimensions(puzzle: &Puzzle) -> Result<()> {
    let (width, height) = (puzzle.width(), puzzle.height());
    let valid = |d: usize| (1..=MAX_DIMENSION).contains(&d);
    if valid(width) && valid(height) {
        Ok(())
    } else {
        Err(PuzError::InvalidDimensions { width, height })
    }
}

fn check_grid_size<T>(name: &'static str, grid: &Grid<T>, puzzle: &Puzzle) -> Result<()> {
    if grid.width() == puzzle.width() && grid.height() == puzzle.height() {
        Ok(())
    } else {
        Err(PuzError::GridSizeMismatch {
            grid: name,
            expected: puzzle.cell_count(),
            found: grid.len(),
        })
    }
}

fn check_numbering(puzzle: &Puzzle) -> Result<()> {
    let numbering = puzzle.numbering();
    for (coord, style) in puzzle.styles.iter() {
        let expected = numbering.number_at(coord);
        if style.number != expected {
            return Err(PuzError::InconsistentNumbering(format!(
                "cell {coord} is numbered {} but its block pattern numbers it {expected}",
                style.number
            )));
        }
    }
    Ok(())
}

/// Block cells are stored as a bare `.`, so anything else on them would be lost.
fn check_blocks(puzzle: &Puzzle) -> Result<()> {
    for (coord, style) in puzzle.styles.iter() {
        if !style.block {
            continue;
        }
        let what = if style.has_markup() {
            "markup"
        } else if puzzle.solutions[coord] != CellSolution::default() {
            "a solution"
        } else if !puzzle.player_state[coord].is_empty() {
            "a player entry"
        } else {
            continue;
        };
        return Err(PuzError::OccupiedBlock { at: coord, what });
    }
    Ok(())
}

fn check_solution(puzzle: &Puzzle) -> Result<()> {
    for (coord, solution) in puzzle.solutions.iter() {
        if puzzle.styles[coord].block {
            continue;
        }
        match solution.letter {
            Some(c) if c.is_ascii_uppercase() => {}
            found => return Err(PuzError::InvalidSolutionCharacter { at: coord, found }),
        }
        if let Some(rebus) = &solution.rebus {
            let reason = if rebus.is_empty() {
                "empty rebus; use no rebus instead".to_string()
            } else if rebus.contains([':', ';']) {
                format!("{rebus:?} contains ':' or ';'")
            } else {
                continue;
            };
            return Err(PuzError::InvalidText {
                field: format!("rebus at {coord}"),
                reason,
            });
        }
    }
    Ok(())
}

/// A rebus entry needs two or more characters, and `-` is the empty-cell marker.
fn check_player_state(puzzle: &Puzzle) -> Result<()> {
    for (coord, state) in puzzle.player_state.iter() {
        let reason = match state {
            PlayerState::Letter('-') => "'-' marks an empty cell".to_string(),
            PlayerState::Rebus(entry) if entry.chars().count() < 2 => {
                format!("rebus entry {entry:?} is shorter than two characters")
            }
            _ => continue,
        };
        return Err(PuzError::InvalidText {
            field: format!("player entry at {coord}"),
            reason,
        });
    }
    Ok(())
}

/// Empty strings are written the same way as absent ones.
fn check_strings(puzzle: &Puzzle) -> Result<()> {
    let fields = [
        ("title", &puzzle.title),
        ("author", &puzzle.author),
        ("copyright", &puzzle.copyright),
        ("notes", &puzzle.notes),
    ];
    for (field, value) in fields {
        if value.as_deref() == Some("") {
            return Err(PuzError::InvalidText {
                field: field.to_string(),
                reason: "empty string; use no value instead".to_string(),
            });
        }
    }
    Ok(())
}

/// Flattens the clues in stored order, hands them back out along the
/// recomputed numbering, and requires the result to match cell for cell.
fn check_clues(puzzle: &Puzzle) -> Result<()> {
    let numbering = puzzle.numbering();
    let expected = numbering.entry_count();
    if puzzle.clues.len() != expected {
        return Err(PuzError::ClueCountMismatch {
            expected,
            found: puzzle.clues.len(),
        });
    }

    let reassigned = Clues::assign(&numbering, puzzle.flattened_clues())?;
    if reassigned != puzzle.clues {
        let stray = numbering
            .entries()
            .find(|e| puzzle.clues.get(e.direction, e.number).is_none())
            .map(|e| format!("no clue for {}{}", e.number, e.direction.suffix()))
            .unwrap_or_else(|| "clues are attached to entries the grid does not have".to_string());
        return Err(PuzError::InconsistentNumbering(stray));
    }
    Ok(())
}
