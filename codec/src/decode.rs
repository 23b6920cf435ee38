use crate::error::{PuzError, Result};
use crate::image::{is_block_byte, ChecksumReport, PuzImage, EMPTY_PLAYER_CELL};
use crate::lock::{find_unlock_key, unlock};
use crate::section::{self, CellFlags, ExtraSection, GEXT, GRBS, LTIM, RTBL, RUSR};
use crate::text;
use log::{debug, warn};
use puzkit_core::{CellSolution, PlayerState, Puzzle};

/// Decodes a PUZ image into a [`Puzzle`].
///
/// With `strict` set, any checksum mismatch aborts decoding. Otherwise
/// mismatches are logged and decoding carries on; every other problem is
/// fatal either way. Locked solutions are unlocked by key search and the key
/// is kept as the puzzle's unlock code.
pub fn decode(bytes: &[u8], strict: bool) -> Result<Puzzle> {
    let image = PuzImage::new(bytes)?;
    check_checksums(&image, strict)?;

    let (width, height) = (image.width(), image.height());
    if width == 0 || height == 0 {
        return Err(PuzError::InvalidDimensions { width, height });
    }
    debug!(
        "decoding {width}x{height} puzzle, version {:?}, {} clues",
        image.version_str(),
        image.clue_count()
    );

    let (unlock_code, unlocked) = if image.is_encrypted() {
        let key = find_unlock_key(bytes).ok_or_else(|| {
            PuzError::InvalidUnlockCode(
                "no key reproduces the stored solution checksum".to_string(),
            )
        })?;
        let mut plain = bytes.to_vec();
        unlock(&mut plain, &key)?;
        (Some(key.to_string()), Some(plain))
    } else {
        (None, None)
    };
    let solution = match &unlocked {
        Some(plain) => PuzImage::new(plain)?.solution_bytes().to_vec(),
        None => image.solution_bytes().to_vec(),
    };

    let mut puzzle = Puzzle::new(width, height);
    puzzle.diagramless = image.is_diagramless();
    puzzle.unlock_code = unlock_code;
    puzzle.title = non_empty(image.title());
    puzzle.author = non_empty(image.author());
    puzzle.copyright = non_empty(image.copyright());
    puzzle.notes = non_empty(image.notes());

    let player = image.player_bytes();
    for (i, coord) in puzzle.coordinates().enumerate() {
        if is_block_byte(solution[i]) {
            puzzle.styles[coord].block = true;
            continue;
        }
        puzzle.solutions[coord] = CellSolution {
            letter: Some(text::decode_char(solution[i])),
            rebus: None,
        };
        if player[i] != EMPTY_PLAYER_CELL {
            puzzle.player_state[coord] = PlayerState::Letter(text::decode_char(player[i]));
        }
    }
    puzzle.assign_clue_numbers();

    let expected = puzzle.numbering().entry_count();
    let found = usize::from(image.clue_count());
    if expected != found {
        return Err(PuzError::ClueCountMismatch { expected, found });
    }
    puzzle.assign_clues(image.clues())?;

    apply_sections(&mut puzzle, image.extra_sections()?)?;
    Ok(puzzle)
}

fn check_checksums(image: &PuzImage<'_>, strict: bool) -> Result<()> {
    let report = ChecksumReport::of(image)?;
    for entry in report.mismatches() {
        if strict {
            return Err(entry.to_error());
        }
        warn!(
            "ignoring {} checksum mismatch: stored {:#06x}, computed {:#06x}",
            entry.region, entry.stored, entry.computed
        );
    }
    Ok(())
}

fn non_empty(s: String) -> Option<String> {
    (!s.is_empty()).then_some(s)
}

fn check_len(section: &ExtraSection, cells: usize) -> Result<()> {
    if section.data.len() == cells {
        Ok(())
    } else {
        Err(PuzError::section(
            &section.title_str(),
            format!("{} bytes for {cells} cells", section.data.len()),
        ))
    }
}

fn apply_sections(puzzle: &mut Puzzle, sections: Vec<ExtraSection>) -> Result<()> {
    let cells = puzzle.cell_count();
    let mut grbs = None;
    let mut rtbl = None;

    for extra in sections {
        debug!("applying {} section ({} bytes)", extra.title_str(), extra.data.len());
        match extra.title {
            GEXT => {
                check_len(&extra, cells)?;
                for (coord, &bits) in puzzle.coordinates().zip(&extra.data) {
                    let style = &mut puzzle.styles[coord];
                    if !style.block {
                        CellFlags::from_bits_truncate(bits).apply_to(style);
                    }
                }
            }
            LTIM => puzzle.timer = section::parse_timer(&extra.data)?,
            GRBS => {
                check_len(&extra, cells)?;
                grbs = Some(extra.data);
            }
            RTBL => rtbl = Some(section::parse_rebus_table(&extra.data)?),
            RUSR => {
                let entries = section::parse_user_rebus(&extra.data, cells);
                for (coord, entry) in puzzle.coordinates().zip(entries) {
                    if !entry.is_empty() && !puzzle.styles[coord].block {
                        puzzle.player_state[coord] = PlayerState::from_entry(&entry);
                    }
                }
            }
            _ => warn!("skipping unknown {:?} section", extra.title_str()),
        }
    }

    match (grbs, rtbl) {
        (Some(grbs), Some(table)) => {
            for (coord, &value) in puzzle.coordinates().zip(&grbs) {
                if value == 0 || puzzle.styles[coord].block {
                    continue;
                }
                let key = u16::from(value - 1);
                let text = table.get(&key).ok_or_else(|| {
                    PuzError::section("GRBS", format!("cell {coord} refers to missing table key {key}"))
                })?;
                puzzle.solutions[coord].rebus = Some(text.clone());
            }
        }
        (None, None) => {}
        _ => warn!("ignoring rebus data: GRBS and RTBL must both be present"),
    }

    Ok(())
}
