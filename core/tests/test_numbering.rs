use puzkit_core::{ClueNumber, Coordinate, Direction, Numbering, Puzzle};

fn numbering(rows: &[&str]) -> Numbering {
    let width = rows[0].len();
    Numbering::compute(width, rows.len(), |c| {
        rows[c.row - 1].as_bytes()[c.col - 1] == b'#'
    })
}

fn cell(number: u16, starts_across: bool, starts_down: bool) -> ClueNumber {
    ClueNumber {
        number,
        starts_across,
        starts_down,
    }
}

#[test]
fn test_three_by_three_with_two_blocks() {
    // blocks at (1,1) and (2,2)
    let n = numbering(&["#..", ".#.", "..."]);

    assert_eq!(n.get(Coordinate::new(1, 1)), Some(&cell(0, false, false)));
    assert_eq!(n.get(Coordinate::new(2, 1)), Some(&cell(1, true, false)));
    assert_eq!(n.get(Coordinate::new(3, 1)), Some(&cell(2, false, true)));
    assert_eq!(n.get(Coordinate::new(1, 2)), Some(&cell(3, false, true)));
    assert_eq!(n.get(Coordinate::new(2, 2)), Some(&cell(0, false, false)));
    assert_eq!(n.get(Coordinate::new(3, 2)), Some(&cell(0, false, false)));
    assert_eq!(n.get(Coordinate::new(1, 3)), Some(&cell(4, true, false)));
    assert_eq!(n.get(Coordinate::new(2, 3)), Some(&cell(0, false, false)));
    assert_eq!(n.get(Coordinate::new(3, 3)), Some(&cell(0, false, false)));
    assert_eq!(n.entry_count(), 4);
}

#[test]
fn test_five_by_five_fixture() {
    let n = numbering(&["..#..", ".....", "#...#", ".....", "..#.."]);

    let expected = [
        ((1, 1), cell(1, true, true)),
        ((2, 1), cell(2, false, true)),
        ((4, 1), cell(3, true, true)),
        ((5, 1), cell(4, false, true)),
        ((1, 2), cell(5, true, false)),
        ((3, 2), cell(6, false, true)),
        ((2, 3), cell(7, true, false)),
        ((1, 4), cell(8, true, true)),
        ((5, 4), cell(9, false, true)),
        ((1, 5), cell(10, true, false)),
        ((4, 5), cell(11, true, false)),
    ];

    for ((col, row), want) in expected {
        assert_eq!(
            n.get(Coordinate::new(col, row)),
            Some(&want),
            "numbering at ({col},{row})"
        );
    }

    let numbered = n.grid().values().iter().filter(|c| c.is_numbered()).count();
    assert_eq!(numbered, expected.len());
    assert_eq!(n.entry_count(), 14);
    assert_eq!(n.highest_number(), 11);
}

#[test]
fn test_entries_follow_puz_clue_order() {
    let n = numbering(&["..#..", ".....", "#...#", ".....", "..#.."]);
    let order: Vec<String> = n
        .entries()
        .map(|e| format!("{}{}", e.number, e.direction.suffix()))
        .collect();

    assert_eq!(
        order,
        [
            "1A", "1D", "2D", "3A", "3D", "4D", "5A", "6D", "7A", "8A", "8D", "9D", "10A",
            "11A"
        ]
    );

    let first = n.entries().next().unwrap();
    assert_eq!(first.start, Coordinate::new(1, 1));
    assert_eq!(first.direction, Direction::Across);
}

#[test]
fn test_numbering_is_deterministic() {
    let rows = ["..#..", ".....", "#...#", ".....", "..#.."];
    assert_eq!(numbering(&rows), numbering(&rows));

    // same pattern reached through a puzzle's cell styles
    let puzzle = Puzzle::from_solution_rows(&["AB.CD", "EFGHI", ".JKL.", "MNOPQ", "RS.TU"]);
    assert_eq!(puzzle.numbering(), numbering(&rows));
}

#[test]
fn test_fully_blocked_grid_has_no_numbers() {
    let n = numbering(&["##", "##"]);
    assert_eq!(n.entry_count(), 0);
    assert!(n.entries().next().is_none());
}
