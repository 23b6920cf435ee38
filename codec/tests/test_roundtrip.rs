use pretty_assertions::assert_eq;
use puzkit_codec::image::{SOLUTION, SOLUTION_ENCRYPTED};
use puzkit_codec::section::{ExtraSection, GEXT, LTIM};
use puzkit_codec::{
    ChecksumRegion, PuzError, PuzImage, UnlockKey, decode, encode, find_unlock_key, lock, unlock,
};
use puzkit_core::{CellSolution, Coordinate, Direction, PlayerState, Puzzle, Timer};

const ROWS: [&str; 5] = ["AB.CD", "EFGHI", ".JKL.", "MNOPQ", "RS.TU"];

fn plain_puzzle() -> Puzzle {
    let mut puzzle = Puzzle::from_solution_rows(&ROWS);
    let count = puzzle.numbering().entry_count();
    let clues = (1..=count).map(|i| format!("Clue number {i}")).collect();
    puzzle.assign_clues(clues).unwrap();
    puzzle.title = Some("Round Trip".to_string());
    puzzle.author = Some("A. Setter".to_string());
    puzzle
}

fn featured_puzzle() -> Puzzle {
    let mut puzzle = plain_puzzle();
    puzzle.copyright = Some("© 2026 Café Puzzles".to_string());
    puzzle.notes = Some("Theme: rebus squares".to_string());
    puzzle.clues.insert(Direction::Across, 1, "Résumé “starter”");
    puzzle.timer = Timer {
        elapsed_secs: 95,
        running: true,
    };

    puzzle.solutions[Coordinate::new(2, 2)] = CellSolution::rebus("FIRE");
    puzzle.solutions[Coordinate::new(4, 2)] = CellSolution::rebus("HEART");
    puzzle.solutions[Coordinate::new(4, 4)] = CellSolution::rebus("FIRE");

    puzzle.styles[Coordinate::new(1, 1)].revealed = true;
    puzzle.styles[Coordinate::new(3, 3)].circled = true;
    puzzle.styles[Coordinate::new(5, 5)].previously_incorrect = true;
    puzzle.styles[Coordinate::new(5, 5)].currently_incorrect = true;

    puzzle.player_state[Coordinate::new(1, 1)] = PlayerState::Letter('A');
    puzzle.player_state[Coordinate::new(2, 2)] = PlayerState::Rebus("FIRE".to_string());
    puzzle.player_state[Coordinate::new(5, 5)] = PlayerState::Letter('Z');
    puzzle
}

fn contains_title(bytes: &[u8], title: &[u8; 4]) -> bool {
    bytes.windows(4).any(|w| w == title)
}

#[test]
fn test_plain_round_trip() {
    let puzzle = plain_puzzle();
    let bytes = encode(&puzzle).unwrap();
    assert_eq!(decode(&bytes, true).unwrap(), puzzle);
    println!("✅ Plain puzzle survives a round trip ({} bytes)", bytes.len());
}

#[test]
fn test_featured_round_trip() {
    let puzzle = featured_puzzle();
    let bytes = encode(&puzzle).unwrap();

    let image = PuzImage::new(&bytes).unwrap();
    let titles: Vec<String> = image
        .extra_sections()
        .unwrap()
        .iter()
        .map(ExtraSection::title_str)
        .collect();
    assert_eq!(titles, ["GRBS", "RTBL", "LTIM", "GEXT", "RUSR"]);

    let rtbl = image.section(b"RTBL").unwrap().unwrap();
    assert_eq!(rtbl.data, b" 1:FIRE; 2:HEART;");
    let grbs = image.section(b"GRBS").unwrap().unwrap();
    assert_eq!(grbs.data[6], 2);
    assert_eq!(grbs.data[8], 3);
    assert_eq!(grbs.data[18], 2);

    let decoded = decode(&bytes, true).unwrap();
    assert_eq!(decoded, puzzle);
    assert!(decoded.styles[Coordinate::new(3, 3)].circled);
    assert_eq!(decoded.timer.elapsed_secs, 95);
    println!("✅ Rebus, markup, timer and player rebus survive a round trip");
}

#[test]
fn test_corruption_is_detected() {
    let bytes = encode(&featured_puzzle()).unwrap();
    let cells = 25;

    // open cells only: flipping a block changes the clue layout itself
    let open: Vec<usize> = ROWS.concat().bytes().enumerate()
        .filter(|(_, b)| *b != b'.')
        .map(|(i, _)| i)
        .collect();

    for &i in &open {
        for offset in [SOLUTION + i, SOLUTION + cells + i] {
            let mut damaged = bytes.clone();
            damaged[offset] = if damaged[offset] == b'Z' { b'A' } else { damaged[offset] + 1 };

            assert!(
                matches!(
                    decode(&damaged, true),
                    Err(PuzError::ChecksumMismatch { .. })
                ),
                "strict decode accepted a flipped byte at {offset:#x}"
            );
            assert!(
                decode(&damaged, false).is_ok(),
                "lenient decode rejected a flipped byte at {offset:#x}"
            );
        }
    }
    println!("✅ Every flipped grid byte is caught in strict mode only");
}

#[test]
fn test_section_checksum_is_checked() {
    let bytes = encode(&featured_puzzle()).unwrap();
    let start = bytes
        .windows(4)
        .position(|w| w == LTIM)
        .unwrap();
    let mut damaged = bytes.clone();
    // "95,0" -> "96,0"
    damaged[start + 9] = b'6';

    let err = decode(&damaged, true).unwrap_err();
    assert!(err.is_recoverable());
    assert!(matches!(
        err,
        PuzError::ChecksumMismatch {
            region: ChecksumRegion::Section(ref title),
            ..
        } if title == "LTIM"
    ));
    assert_eq!(decode(&damaged, false).unwrap().timer.elapsed_secs, 96);
}

#[test]
fn test_unknown_sections_are_skipped() {
    let puzzle = featured_puzzle();
    let mut bytes = encode(&puzzle).unwrap();
    ExtraSection::new(*b"ZZZZ", b"opaque".to_vec())
        .write_to(&mut bytes)
        .unwrap();
    assert_eq!(decode(&bytes, true).unwrap(), puzzle);
}

#[test]
fn test_gext_omitted_without_markup() {
    let bytes = encode(&plain_puzzle()).unwrap();
    assert!(!contains_title(&bytes, &GEXT));
    assert!(!contains_title(&bytes, &LTIM));

    let decoded = decode(&bytes, true).unwrap();
    assert!(decoded.styles.values().iter().all(|s| !s.has_markup()));
    assert_eq!(decoded.timer, Timer::default());
}

#[test]
fn test_clue_count_mismatch() {
    let mut puzzle = plain_puzzle();
    puzzle.clues.across.remove(&1);
    assert_eq!(
        encode(&puzzle),
        Err(PuzError::ClueCountMismatch {
            expected: 14,
            found: 13,
        })
    );

    puzzle.clues.down.clear();
    assert!(matches!(
        encode(&puzzle),
        Err(PuzError::ClueCountMismatch { .. })
    ));
}

#[test]
fn test_locked_puzzle_recovers_key() {
    let mut puzzle = featured_puzzle();
    puzzle.unlock_code = Some("1123".to_string());
    let bytes = encode(&puzzle).unwrap();

    let image = PuzImage::new(&bytes).unwrap();
    assert!(image.is_encrypted());
    assert_eq!(image.solution_type(), SOLUTION_ENCRYPTED);
    assert_ne!(image.decrypted_solution_checksum(), 0);
    assert_ne!(image.solution_bytes(), ROWS.concat().as_bytes());
    assert!(image.verify().is_ok());

    assert_eq!(find_unlock_key(&bytes).map(|k| k.to_string()), Some("1123".to_string()));
    assert_eq!(decode(&bytes, true).unwrap(), puzzle);
    println!("✅ Recovered unlock key 1123 by search");
}

#[test]
fn test_lock_and_unlock_in_place() {
    let plain = plain_puzzle();
    let original = encode(&plain).unwrap();
    assert_eq!(find_unlock_key(&original), None);

    let key: UnlockKey = "1123".parse().unwrap();
    let mut bytes = original.clone();
    lock(&mut bytes, &key).unwrap();

    let mut locked_puzzle = plain.clone();
    locked_puzzle.unlock_code = Some("1123".to_string());
    assert_eq!(bytes, encode(&locked_puzzle).unwrap());
    assert!(matches!(
        lock(&mut bytes.clone(), &key),
        Err(PuzError::InvalidUnlockCode(_))
    ));

    let wrong: UnlockKey = "9999".parse().unwrap();
    let mut attempt = bytes.clone();
    assert!(matches!(
        unlock(&mut attempt, &wrong),
        Err(PuzError::InvalidUnlockCode(_))
    ));
    assert_eq!(attempt, bytes);

    unlock(&mut bytes, &key).unwrap();
    assert_eq!(bytes, original);
}

#[test]
fn test_unrecoverable_lock_is_rejected() {
    let mut puzzle = plain_puzzle();
    puzzle.unlock_code = Some("1123".to_string());
    let mut bytes = encode(&puzzle).unwrap();
    // 0x1E holds the plaintext checksum; point it somewhere no key reaches
    let stored = PuzImage::new(&bytes).unwrap().decrypted_solution_checksum();
    let bogus = stored.wrapping_add(1).to_le_bytes();
    bytes[0x1E..0x20].copy_from_slice(&bogus);
    puzkit_codec::write_checksums(&mut bytes).unwrap();

    assert_eq!(find_unlock_key(&bytes), None);
    assert!(matches!(
        decode(&bytes, true),
        Err(PuzError::InvalidUnlockCode(_))
    ));
}

#[test]
fn test_markup_on_blocks_is_rejected() {
    // (3,1) is a block
    let mut puzzle = plain_puzzle();
    puzzle.styles[Coordinate::new(3, 1)].circled = true;
    assert_eq!(
        encode(&puzzle),
        Err(PuzError::OccupiedBlock {
            at: Coordinate::new(3, 1),
            what: "markup",
        })
    );

    puzzle.styles[Coordinate::new(3, 1)].circled = false;
    let bytes = encode(&puzzle).unwrap();
    assert!(!contains_title(&bytes, &GEXT));
    assert_eq!(decode(&bytes, true).unwrap(), puzzle);
}

#[test]
fn test_empty_values_are_rejected_not_dropped() {
    let mut puzzle = plain_puzzle();
    puzzle.copyright = Some(String::new());
    assert!(matches!(encode(&puzzle), Err(PuzError::InvalidText { .. })));

    let mut puzzle = plain_puzzle();
    puzzle.player_state[Coordinate::new(1, 1)] = PlayerState::Rebus("A".to_string());
    assert!(matches!(encode(&puzzle), Err(PuzError::InvalidText { .. })));

    let mut puzzle = plain_puzzle();
    puzzle.solutions[Coordinate::new(1, 1)].rebus = Some(String::new());
    assert!(matches!(encode(&puzzle), Err(PuzError::InvalidText { .. })));
    println!("✅ Values that would decode differently are refused at encode");
}

#[test]
fn test_puz_parse_reads_our_output() {
    let puzzle = plain_puzzle();
    let bytes = encode(&puzzle).unwrap();
    let parsed = puz_parse::parse_bytes(&bytes).unwrap();

    assert_eq!(parsed.info.title, "Round Trip");
    assert_eq!(parsed.info.author, "A. Setter");
    assert_eq!(parsed.info.width, 5);
    assert_eq!(parsed.info.height, 5);
    assert_eq!(parsed.grid.solution, ROWS.map(String::from).to_vec());
    assert_eq!(parsed.clues.across.len(), puzzle.clues.across.len());
    assert_eq!(parsed.clues.down.len(), puzzle.clues.down.len());
    for (number, text) in &puzzle.clues.across {
        assert_eq!(parsed.clues.across.get(number), Some(text));
    }
    for (number, text) in &puzzle.clues.down {
        assert_eq!(parsed.clues.down.get(number), Some(text));
    }
    println!("✅ puz-parse accepts the encoded image");
}
