//! Extra sections: the optional, checksummed blocks that follow the string region.
//!
//! Layout of one section:
//!
//! ```text
//! [title: 4][length: u16 LE][checksum: u16 LE][data: length][0x00]
//! ```
//!
//! The checksum covers the data bytes only, seeded with 0.

use crate::checksum::checksum;
use crate::error::{PuzError, Result};
use crate::text;
use bitflags::bitflags;
use byteorder::{ByteOrder, LittleEndian};
use log::trace;
use puzkit_core::{CellSolution, CellStyle, Grid, PlayerState, Timer};
use std::collections::BTreeMap;

pub const GEXT: [u8; 4] = *b"GEXT";
pub const LTIM: [u8; 4] = *b"LTIM";
pub const GRBS: [u8; 4] = *b"GRBS";
pub const RTBL: [u8; 4] = *b"RTBL";
pub const RUSR: [u8; 4] = *b"RUSR";

const TITLE_LEN: usize = 4;
const LENGTH_OFFSET: usize = 4;
const CHECKSUM_OFFSET: usize = 6;
const DATA_OFFSET: usize = 8;

bitflags! {
    /// Per-cell markup bits stored in the GEXT section.
    #[derive(Debug, Default, Copy, Clone, PartialEq, Eq, Hash)]
    pub struct CellFlags: u8 {
        const PREVIOUSLY_INCORRECT = 0x10;
        const CURRENTLY_INCORRECT = 0x20;
        const REVEALED = 0x40;
        const CIRCLED = 0x80;
    }
}

impl CellFlags {
    pub fn from_style(style: &CellStyle) -> Self {
        let mut flags = CellFlags::empty();
        flags.set(CellFlags::PREVIOUSLY_INCORRECT, style.previously_incorrect);
        flags.set(CellFlags::CURRENTLY_INCORRECT, style.currently_incorrect);
        flags.set(CellFlags::REVEALED, style.revealed);
        flags.set(CellFlags::CIRCLED, style.circled);
        flags
    }

    pub fn apply_to(self, style: &mut CellStyle) {
        style.previously_incorrect = self.contains(CellFlags::PREVIOUSLY_INCORRECT);
        style.currently_incorrect = self.contains(CellFlags::CURRENTLY_INCORRECT);
        style.revealed = self.contains(CellFlags::REVEALED);
        style.circled = self.contains(CellFlags::CIRCLED);
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ExtraSection {
    pub title: [u8; 4],
    /// Checksum as stored; may disagree with the data when read from a damaged image.
    pub checksum: u16,
    pub data: Vec<u8>,
}

impl ExtraSection {
    pub fn new(title: [u8; 4], data: Vec<u8>) -> Self {
        Self {
            title,
            checksum: checksum(&data, 0),
            data,
        }
    }

    pub fn title_str(&self) -> String {
        text::decode(&self.title)
    }

    pub fn computed_checksum(&self) -> u16 {
        checksum(&self.data, 0)
    }

    pub fn is_checksum_valid(&self) -> bool {
        self.checksum == self.computed_checksum()
    }

    /// Size of the section on disk, terminator included.
    pub fn encoded_len(&self) -> usize {
        DATA_OFFSET + self.data.len() + 1
    }

    pub fn write_to(&self, out: &mut Vec<u8>) -> Result<()> {
        let len = u16::try_from(self.data.len()).map_err(|_| {
            PuzError::section(
                &self.title_str(),
                format!("{} bytes of data exceed the 65535 byte limit", self.data.len()),
            )
        })?;

        let mut header = [0u8; DATA_OFFSET];
        header[..TITLE_LEN].copy_from_slice(&self.title);
        LittleEndian::write_u16(&mut header[LENGTH_OFFSET..CHECKSUM_OFFSET], len);
        LittleEndian::write_u16(&mut header[CHECKSUM_OFFSET..DATA_OFFSET], self.checksum);

        out.extend_from_slice(&header);
        out.extend_from_slice(&self.data);
        out.push(0);
        Ok(())
    }
}

/// Reads consecutive sections from `start` to the end of `image`.
pub fn read_sections(image: &[u8], start: usize) -> Result<Vec<ExtraSection>> {
    let mut sections = Vec::new();
    let mut pos = start;

    while pos < image.len() {
        let Some(header) = image.get(pos..pos + DATA_OFFSET) else {
            return Err(PuzError::section(
                "extra",
                format!("{} trailing bytes at offset {pos:#x} are too short for a header", image.len() - pos),
            ));
        };

        let mut title = [0u8; TITLE_LEN];
        title.copy_from_slice(&header[..TITLE_LEN]);
        let len = usize::from(LittleEndian::read_u16(&header[LENGTH_OFFSET..CHECKSUM_OFFSET]));
        let stored = LittleEndian::read_u16(&header[CHECKSUM_OFFSET..DATA_OFFSET]);

        let data_start = pos + DATA_OFFSET;
        let Some(data) = image.get(data_start..data_start + len) else {
            return Err(PuzError::section(
                &text::decode(&title),
                format!("{len} data bytes declared but the image ends first"),
            ));
        };

        let section = ExtraSection {
            title,
            checksum: stored,
            data: data.to_vec(),
        };
        trace!(
            "extra section {} at {pos:#x}: {len} bytes, checksum {stored:#06x}",
            section.title_str()
        );
        pos += section.encoded_len();
        sections.push(section);
    }

    Ok(sections)
}

/// GEXT payload, or `None` when no open cell carries any markup.
///
/// Block cells are always written as 0.
pub fn gext_payload(styles: &Grid<CellStyle>) -> Option<Vec<u8>> {
    let data: Vec<u8> = styles
        .values()
        .iter()
        .map(|s| if s.block { 0 } else { CellFlags::from_style(s).bits() })
        .collect();
    data.iter().any(|&b| b != 0).then_some(data)
}

/// LTIM payload, or `None` for a stopped timer at zero.
pub fn timer_payload(timer: &Timer) -> Option<Vec<u8>> {
    if timer.is_default() {
        return None;
    }
    let running_flag = if timer.running { 0 } else { 1 };
    Some(format!("{},{}", timer.elapsed_secs, running_flag).into_bytes())
}

pub fn parse_timer(data: &[u8]) -> Result<Timer> {
    let raw = text::decode(until_nul(data));
    let malformed = || PuzError::section("LTIM", format!("{raw:?} is not \"<seconds>,<state>\""));

    let (elapsed, state) = raw.split_once(',').ok_or_else(malformed)?;
    let elapsed_secs = elapsed.trim().parse::<u32>().map_err(|_| malformed())?;
    let state = state.trim().parse::<u32>().map_err(|_| malformed())?;

    Ok(Timer {
        elapsed_secs,
        running: state == 0,
    })
}

/// GRBS and RTBL payloads, or `None` when no cell has a rebus solution.
///
/// Table keys are assigned from 1 in row-major order of first appearance; each
/// GRBS byte is its cell's key plus one.
pub fn rebus_payloads(
    solutions: &Grid<CellSolution>,
    styles: &Grid<CellStyle>,
) -> Result<Option<(Vec<u8>, Vec<u8>)>> {
    let mut keys: Vec<&str> = Vec::new();
    let mut grbs = vec![0u8; solutions.len()];

    for (i, (coord, solution)) in solutions.iter().enumerate() {
        if styles[coord].block {
            continue;
        }
        let Some(rebus) = solution.rebus.as_deref().filter(|r| !r.is_empty()) else {
            continue;
        };
        let key = match keys.iter().position(|k| *k == rebus) {
            Some(p) => p + 1,
            None => {
                keys.push(rebus);
                keys.len()
            }
        };
        grbs[i] = u8::try_from(key + 1).map_err(|_| PuzError::InvalidText {
            field: "rebus table".to_string(),
            reason: "more than 254 distinct rebus answers".to_string(),
        })?;
    }

    if keys.is_empty() {
        return Ok(None);
    }

    let mut rtbl = Vec::new();
    for (i, rebus) in keys.iter().enumerate() {
        rtbl.extend_from_slice(format!("{:>2}:", i + 1).as_bytes());
        rtbl.extend(text::encode("rebus", rebus)?);
        rtbl.push(b';');
    }

    Ok(Some((grbs, rtbl)))
}

/// Parses RTBL entries of the form `" <key>:<text>;"`.
pub fn parse_rebus_table(data: &[u8]) -> Result<BTreeMap<u16, String>> {
    let raw = text::decode(until_nul(data));
    let mut table = BTreeMap::new();

    for entry in raw.split(';').map(str::trim).filter(|e| !e.is_empty()) {
        let (key, value) = entry
            .split_once(':')
            .ok_or_else(|| PuzError::section("RTBL", format!("entry {entry:?} has no ':'")))?;
        let key = key
            .trim()
            .parse::<u16>()
            .map_err(|_| PuzError::section("RTBL", format!("entry {entry:?} has a bad key")))?;
        table.insert(key, value.to_string());
    }

    Ok(table)
}

/// RUSR payload, or `None` when no player entry is a multi-character rebus.
pub fn user_rebus_payload(
    player_state: &Grid<PlayerState>,
    styles: &Grid<CellStyle>,
) -> Result<Option<Vec<u8>>> {
    let has_rebus = player_state
        .iter()
        .any(|(c, p)| !styles[c].block && matches!(p, PlayerState::Rebus(_)));
    if !has_rebus {
        return Ok(None);
    }

    let mut data = Vec::new();
    for (coord, state) in player_state.iter() {
        if let (false, PlayerState::Rebus(entry)) = (styles[coord].block, state) {
            data.extend(text::encode("player rebus", entry)?);
        }
        data.push(0);
    }
    Ok(Some(data))
}

/// Splits RUSR data into one entry per cell; missing trailing entries are empty.
pub fn parse_user_rebus(data: &[u8], cells: usize) -> Vec<String> {
    let mut entries: Vec<String> = data
        .split(|&b| b == 0)
        .take(cells)
        .map(text::decode)
        .collect();
    entries.resize(cells, String::new());
    entries
}

fn until_nul(data: &[u8]) -> &[u8] {
    match data.iter().position(|&b| b == 0) {
        Some(end) => &data[..end],
        None => data,
    }
}
