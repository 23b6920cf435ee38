//! Plain-text rendering of puzzles and checksum reports.

use puzkit_codec::ChecksumReport;
use puzkit_core::{Coordinate, Direction, PlayerState, Puzzle};

/// Renders metadata, the grid and both clue lists.
///
/// The grid shows the solver's entries (`-` for empty) unless `show_solution`
/// is set. Blocks are drawn as `#`; rebus cells show their first letter and
/// are listed in full below the grid.
pub fn to_text_format(puzzle: &Puzzle, show_solution: bool) -> String {
    let mut output = String::new();

    output.push_str(&format!("Title: {}\n", puzzle.title.as_deref().unwrap_or("Untitled")));
    output.push_str(&format!("Author: {}\n", puzzle.author.as_deref().unwrap_or("Unknown")));
    if let Some(copyright) = &puzzle.copyright {
        output.push_str(&format!("Copyright: {}\n", copyright));
    }
    output.push_str(&format!("Size: {}x{}\n", puzzle.width(), puzzle.height()));
    if puzzle.diagramless {
        output.push_str("Diagramless\n");
    }
    if let Some(code) = &puzzle.unlock_code {
        output.push_str(&format!("Locked with key: {}\n", code));
    }
    if !puzzle.timer.is_default() {
        let state = if puzzle.timer.running { "running" } else { "stopped" };
        output.push_str(&format!(
            "Timer: {}:{:02} ({})\n",
            puzzle.timer.elapsed_secs / 60,
            puzzle.timer.elapsed_secs % 60,
            state
        ));
    }
    if puzzle.is_solved() {
        output.push_str("Solved!\n");
    }
    output.push('\n');

    output.push_str("Grid:\n");
    let mut rebuses = Vec::new();
    for row in 1..=puzzle.height() {
        for col in 1..=puzzle.width() {
            let coord = Coordinate::new(col, row);
            output.push(cell_char(puzzle, coord, show_solution));

            let rebus = if show_solution {
                puzzle.solutions[coord].rebus.clone()
            } else {
                match &puzzle.player_state[coord] {
                    PlayerState::Rebus(entry) => Some(entry.clone()),
                    _ => None,
                }
            };
            if let Some(rebus) = rebus.filter(|_| !puzzle.is_block(coord)) {
                rebuses.push((coord, rebus));
            }
        }
        output.push('\n');
    }

    if !rebuses.is_empty() {
        output.push_str("\nRebus:\n");
        for (coord, rebus) in rebuses {
            output.push_str(&format!("{} {}\n", coord, rebus));
        }
    }

    for direction in Direction::ALL {
        output.push_str(&format!("\n{}:\n", direction));
        for (number, text) in puzzle.clues.by_direction(direction) {
            output.push_str(&format!("{}. {}\n", number, text));
        }
    }

    if let Some(notes) = &puzzle.notes {
        output.push_str(&format!("\nNotes: {}\n", notes));
    }

    output
}

fn cell_char(puzzle: &Puzzle, coord: Coordinate, show_solution: bool) -> char {
    if puzzle.is_block(coord) {
        '#'
    } else if show_solution {
        puzzle.solutions[coord].letter.unwrap_or('?')
    } else {
        puzzle.player_state[coord].first_char().unwrap_or('-')
    }
}

/// One line per checksum, mismatches flagged.
pub fn checksum_lines(report: &ChecksumReport) -> String {
    let mut output = String::new();
    for entry in &report.entries {
        let status = if entry.is_valid() { "ok" } else { "MISMATCH" };
        output.push_str(&format!(
            "{:<16} stored {:#010x}  computed {:#010x}  {}\n",
            entry.region.to_string(),
            entry.stored,
            entry.computed,
            status
        ));
    }
    output
}

#[cfg(test)]
mod tests {
    use super::*;
    use puzkit_codec::{PuzImage, encode};
    use puzkit_core::CellSolution;

    fn sample() -> Puzzle {
        let mut puzzle = Puzzle::from_solution_rows(&["CAT", "A.A", "BAT"]);
        puzzle
            .assign_clues(["Pet", "Taxi", "Label", "Tap"].map(String::from).to_vec())
            .unwrap();
        puzzle.title = Some("Cats".to_string());
        puzzle
    }

    #[test]
    fn test_text_format_shows_entries_or_solution() {
        let mut puzzle = sample();
        puzzle.player_state[Coordinate::new(1, 1)] = PlayerState::Letter('C');

        let text = to_text_format(&puzzle, false);
        assert!(text.contains("Title: Cats\n"));
        assert!(text.contains("Author: Unknown\n"));
        assert!(text.contains("Grid:\nC--\n-#-\n---\n"));
        assert!(text.contains("Across:\n1. Pet\n3. Tap\n"));
        assert!(text.contains("Down:\n1. Taxi\n2. Label\n"));

        let text = to_text_format(&puzzle, true);
        assert!(text.contains("Grid:\nCAT\nA#A\nBAT\n"));
    }

    #[test]
    fn test_text_format_lists_rebuses() {
        let mut puzzle = sample();
        puzzle.solutions[Coordinate::new(3, 3)] = CellSolution::rebus("TEA");
        let text = to_text_format(&puzzle, true);
        assert!(text.contains("Rebus:\n(3,3) TEA\n"));
    }

    #[test]
    fn test_checksum_lines() {
        let bytes = encode(&sample()).unwrap();
        let report = ChecksumReport::of(&PuzImage::new(&bytes).unwrap()).unwrap();
        let lines = checksum_lines(&report);
        assert_eq!(lines.lines().count(), 4);
        assert!(lines.lines().all(|l| l.ends_with("ok")));
    }
}
