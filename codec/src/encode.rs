use crate::cipher::UnlockKey;
use crate::error::{PuzError, Result};
use crate::image::{
    self, BLOCK, CLUE_COUNT, EMPTY_PLAYER_CELL, HEADER_LEN, HEIGHT, MAGIC, MAGIC_STRING,
    PUZZLE_TYPE, PUZZLE_TYPE_DIAGRAMLESS, PUZZLE_TYPE_NORMAL, SOLUTION_NORMAL, SOLUTION_TYPE,
    VERSION, WIDTH,
};
use crate::lock;
use crate::section::{self, ExtraSection, GEXT, GRBS, LTIM, RTBL, RUSR};
use crate::text;
use crate::validate::validate;
use byteorder::{ByteOrder, LittleEndian};
use log::debug;
use puzkit_core::Puzzle;

/// Knobs for [`encode_with`].
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct EncodeOptions {
    /// Written verbatim at 0x18.
    pub version: [u8; 4],
}

impl Default for EncodeOptions {
    fn default() -> Self {
        Self {
            version: *b"1.3\0",
        }
    }
}

/// Encodes `puzzle` with default options.
pub fn encode(puzzle: &Puzzle) -> Result<Vec<u8>> {
    encode_with(puzzle, &EncodeOptions::default())
}

/// Validates `puzzle` and produces a complete, checksummed PUZ image.
///
/// When the puzzle carries an unlock code the stored solution is locked with it.
pub fn encode_with(puzzle: &Puzzle, options: &EncodeOptions) -> Result<Vec<u8>> {
    validate(puzzle)?;
    let key = puzzle
        .unlock_code
        .as_deref()
        .map(str::parse::<UnlockKey>)
        .transpose()?;

    let clues = puzzle.flattened_clues();
    let clue_count = u16::try_from(clues.len()).map_err(|_| PuzError::ClueCountMismatch {
        expected: usize::from(u16::MAX),
        found: clues.len(),
    })?;

    let mut out = header(puzzle, options, clue_count);
    write_solution(puzzle, &mut out);
    write_player_state(puzzle, &mut out)?;

    write_string(&mut out, "title", puzzle.title.as_deref())?;
    write_string(&mut out, "author", puzzle.author.as_deref())?;
    write_string(&mut out, "copyright", puzzle.copyright.as_deref())?;
    for (i, clue) in clues.iter().enumerate() {
        write_string(&mut out, &format!("clue {}", i + 1), Some(clue))?;
    }
    write_string(&mut out, "notes", puzzle.notes.as_deref())?;

    let sections = extra_sections(puzzle)?;
    for section in &sections {
        section.write_to(&mut out)?;
    }

    match key {
        Some(key) => lock::lock(&mut out, &key)?,
        None => image::write_checksums(&mut out)?,
    }

    debug!(
        "encoded {}x{} puzzle: {} clues, {} extra sections, {} bytes",
        puzzle.width(),
        puzzle.height(),
        clue_count,
        sections.len(),
        out.len()
    );
    Ok(out)
}

/// The fixed header with zeroed checksums.
fn header(puzzle: &Puzzle, options: &EncodeOptions, clue_count: u16) -> Vec<u8> {
    let mut out = vec![0u8; HEADER_LEN];
    out[MAGIC..MAGIC + MAGIC_STRING.len()].copy_from_slice(MAGIC_STRING);
    out[VERSION..VERSION + 4].copy_from_slice(&options.version);

    // Dimensions are bounded by validation.
    out[WIDTH] = puzzle.width() as u8;
    out[HEIGHT] = puzzle.height() as u8;
    LittleEndian::write_u16(&mut out[CLUE_COUNT..CLUE_COUNT + 2], clue_count);

    let puzzle_type = if puzzle.diagramless {
        PUZZLE_TYPE_DIAGRAMLESS
    } else {
        PUZZLE_TYPE_NORMAL
    };
    LittleEndian::write_u16(&mut out[PUZZLE_TYPE..PUZZLE_TYPE + 2], puzzle_type);
    LittleEndian::write_u16(&mut out[SOLUTION_TYPE..SOLUTION_TYPE + 2], SOLUTION_NORMAL);
    out
}

fn write_solution(puzzle: &Puzzle, out: &mut Vec<u8>) {
    for (coord, solution) in puzzle.solutions.iter() {
        let byte = match solution.letter {
            Some(c) if !puzzle.styles[coord].block => c as u8,
            _ => BLOCK,
        };
        out.push(byte);
    }
}

fn write_player_state(puzzle: &Puzzle, out: &mut Vec<u8>) -> Result<()> {
    for (coord, state) in puzzle.player_state.iter() {
        let byte = if puzzle.styles[coord].block {
            BLOCK
        } else {
            match state.first_char() {
                Some(c) => text::encode_char(&format!("player entry at {coord}"), c)?,
                None => EMPTY_PLAYER_CELL,
            }
        };
        out.push(byte);
    }
    Ok(())
}

fn write_string(out: &mut Vec<u8>, field: &str, value: Option<&str>) -> Result<()> {
    if let Some(value) = value {
        out.extend(text::encode(field, value)?);
    }
    out.push(0);
    Ok(())
}

/// Sections with something to say, in GRBS, RTBL, LTIM, GEXT, RUSR order.
fn extra_sections(puzzle: &Puzzle) -> Result<Vec<ExtraSection>> {
    let mut sections = Vec::new();

    if let Some((grbs, rtbl)) = section::rebus_payloads(&puzzle.solutions, &puzzle.styles)? {
        sections.push(ExtraSection::new(GRBS, grbs));
        sections.push(ExtraSection::new(RTBL, rtbl));
    }
    if let Some(ltim) = section::timer_payload(&puzzle.timer) {
        sections.push(ExtraSection::new(LTIM, ltim));
    }
    if let Some(gext) = section::gext_payload(&puzzle.styles) {
        sections.push(ExtraSection::new(GEXT, gext));
    }
    if let Some(rusr) = section::user_rebus_payload(&puzzle.player_state, &puzzle.styles)? {
        sections.push(ExtraSection::new(RUSR, rusr));
    }

    Ok(sections)
}
