//! Read-only view over a raw PUZ image.

use crate::checksum::{checksum, masked};
use crate::error::{ChecksumRegion, PuzError, Result};
use crate::section::{read_sections, ExtraSection};
use crate::text;
use byteorder::{ByteOrder, LittleEndian};
use puzkit_core::Coordinate;

pub const OVERALL_CHECKSUM: usize = 0x00;
pub const MAGIC: usize = 0x02;
pub const CIB_CHECKSUM: usize = 0x0E;
pub const MASKED_LOW: usize = 0x10;
pub const MASKED_HIGH: usize = 0x14;
pub const VERSION: usize = 0x18;
pub const RESERVED_1C: usize = 0x1C;
pub const DECRYPTED_CHECKSUM: usize = 0x1E;
pub const RESERVED_20: usize = 0x20;
pub const WIDTH: usize = 0x2C;
pub const HEIGHT: usize = 0x2D;
pub const CLUE_COUNT: usize = 0x2E;
pub const PUZZLE_TYPE: usize = 0x30;
pub const SOLUTION_TYPE: usize = 0x32;
pub const SOLUTION: usize = 0x34;

/// The CIB: width, height, clue count and both type words.
pub const CIB: usize = WIDTH;
pub const CIB_LEN: usize = SOLUTION - CIB;
pub const HEADER_LEN: usize = SOLUTION;

pub const MAGIC_STRING: &[u8; 12] = b"ACROSS&DOWN\0";

pub const PUZZLE_TYPE_NORMAL: u16 = 0x0001;
pub const PUZZLE_TYPE_DIAGRAMLESS: u16 = 0x0401;
pub const DIAGRAMLESS_FLAG: u16 = 0x0400;
pub const SOLUTION_NORMAL: u16 = 0x0000;
pub const SOLUTION_ENCRYPTED: u16 = 0x0004;

pub const BLOCK: u8 = b'.';
pub const DIAGRAMLESS_BLOCK: u8 = b':';
pub const EMPTY_PLAYER_CELL: u8 = b'-';

pub fn is_block_byte(b: u8) -> bool {
    b == BLOCK || b == DIAGRAMLESS_BLOCK
}

/// A validated view of an image: the header is present, the magic string
/// matches, and the grids and string region fit inside the buffer.
#[derive(Debug, Clone)]
pub struct PuzImage<'a> {
    bytes: &'a [u8],
    title: &'a [u8],
    author: &'a [u8],
    copyright: &'a [u8],
    clues: Vec<&'a [u8]>,
    notes: &'a [u8],
    sections_offset: usize,
}

impl<'a> PuzImage<'a> {
    pub fn new(bytes: &'a [u8]) -> Result<Self> {
        if bytes.len() < HEADER_LEN {
            return Err(PuzError::Truncated {
                context: "header",
                needed: HEADER_LEN,
                len: bytes.len(),
            });
        }
        if &bytes[MAGIC..MAGIC + MAGIC_STRING.len()] != MAGIC_STRING {
            return Err(PuzError::MalformedHeader(format!(
                "expected magic {:?}, found {:?}",
                text::decode(&MAGIC_STRING[..11]),
                text::decode(&bytes[MAGIC..MAGIC + 11])
            )));
        }

        let cells = usize::from(bytes[WIDTH]) * usize::from(bytes[HEIGHT]);
        let strings_offset = SOLUTION + 2 * cells;
        if bytes.len() < strings_offset {
            return Err(PuzError::Truncated {
                context: "solution and player grids",
                needed: strings_offset,
                len: bytes.len(),
            });
        }

        let mut reader = StringReader {
            bytes,
            pos: strings_offset,
        };
        let title = reader.next("title")?;
        let author = reader.next("author")?;
        let copyright = reader.next("copyright")?;
        let clue_count = LittleEndian::read_u16(&bytes[CLUE_COUNT..]);
        let clues = (0..clue_count)
            .map(|_| reader.next("clue"))
            .collect::<Result<Vec<_>>>()?;
        let notes = reader.next("notes")?;

        Ok(Self {
            bytes,
            title,
            author,
            copyright,
            clues,
            notes,
            sections_offset: reader.pos,
        })
    }

    pub fn bytes(&self) -> &'a [u8] {
        self.bytes
    }

    pub fn width(&self) -> usize {
        usize::from(self.bytes[WIDTH])
    }

    pub fn height(&self) -> usize {
        usize::from(self.bytes[HEIGHT])
    }

    pub fn cell_count(&self) -> usize {
        self.width() * self.height()
    }

    pub fn clue_count(&self) -> u16 {
        self.read_u16(CLUE_COUNT)
    }

    pub fn puzzle_type(&self) -> u16 {
        self.read_u16(PUZZLE_TYPE)
    }

    pub fn solution_type(&self) -> u16 {
        self.read_u16(SOLUTION_TYPE)
    }

    pub fn is_diagramless(&self) -> bool {
        self.puzzle_type() & DIAGRAMLESS_FLAG != 0
    }

    pub fn is_encrypted(&self) -> bool {
        self.solution_type() == SOLUTION_ENCRYPTED
    }

    /// The raw 4-byte version field, e.g. `1.3\0`.
    pub fn version(&self) -> &'a [u8] {
        &self.bytes[VERSION..VERSION + 4]
    }

    /// The version with its terminator and any trailing bytes removed.
    pub fn version_str(&self) -> String {
        let raw = self.version();
        let end = raw.iter().position(|&b| b == 0).unwrap_or(raw.len());
        text::decode(&raw[..end])
    }

    pub fn reserved_1c(&self) -> &'a [u8] {
        &self.bytes[RESERVED_1C..DECRYPTED_CHECKSUM]
    }

    pub fn reserved_20(&self) -> &'a [u8] {
        &self.bytes[RESERVED_20..WIDTH]
    }

    pub fn stored_overall_checksum(&self) -> u16 {
        self.read_u16(OVERALL_CHECKSUM)
    }

    pub fn stored_cib_checksum(&self) -> u16 {
        self.read_u16(CIB_CHECKSUM)
    }

    pub fn stored_masked_low(&self) -> [u8; 4] {
        self.quad(MASKED_LOW)
    }

    pub fn stored_masked_high(&self) -> [u8; 4] {
        self.quad(MASKED_HIGH)
    }

    /// Checksum of the plaintext solution letters; 0 unless the solution is locked.
    pub fn decrypted_solution_checksum(&self) -> u16 {
        self.read_u16(DECRYPTED_CHECKSUM)
    }

    pub fn solution_bytes(&self) -> &'a [u8] {
        &self.bytes[SOLUTION..SOLUTION + self.cell_count()]
    }

    pub fn player_bytes(&self) -> &'a [u8] {
        let start = SOLUTION + self.cell_count();
        &self.bytes[start..start + self.cell_count()]
    }

    /// Row-major offset of a 1-based coordinate within either grid.
    pub fn cell_offset(&self, coord: Coordinate) -> Option<usize> {
        let in_bounds = (1..=self.width()).contains(&coord.col)
            && (1..=self.height()).contains(&coord.row);
        in_bounds.then(|| (coord.row - 1) * self.width() + (coord.col - 1))
    }

    pub fn solution_at(&self, coord: Coordinate) -> Option<u8> {
        self.cell_offset(coord).map(|i| self.solution_bytes()[i])
    }

    pub fn player_at(&self, coord: Coordinate) -> Option<u8> {
        self.cell_offset(coord).map(|i| self.player_bytes()[i])
    }

    pub fn is_block(&self, coord: Coordinate) -> bool {
        self.solution_at(coord).is_some_and(is_block_byte)
    }

    pub fn title(&self) -> String {
        text::decode(self.title)
    }

    pub fn author(&self) -> String {
        text::decode(self.author)
    }

    pub fn copyright(&self) -> String {
        text::decode(self.copyright)
    }

    /// Clue texts in stored order (across before down per numbered cell).
    pub fn clues(&self) -> Vec<String> {
        self.clues.iter().map(|c| text::decode(c)).collect()
    }

    pub fn notes(&self) -> String {
        text::decode(self.notes)
    }

    /// Offset of the first byte after the notes terminator.
    pub fn sections_offset(&self) -> usize {
        self.sections_offset
    }

    pub fn extra_sections(&self) -> Result<Vec<ExtraSection>> {
        read_sections(self.bytes, self.sections_offset)
    }

    /// The first extra section titled `title`, if any.
    pub fn section(&self, title: &[u8; 4]) -> Result<Option<ExtraSection>> {
        Ok(self
            .extra_sections()?
            .into_iter()
            .find(|s| &s.title == title))
    }

    pub fn cib_checksum(&self) -> u16 {
        checksum(&self.bytes[CIB..CIB + CIB_LEN], 0)
    }

    pub fn solution_checksum(&self, seed: u16) -> u16 {
        checksum(self.solution_bytes(), seed)
    }

    pub fn grid_checksum(&self, seed: u16) -> u16 {
        checksum(self.player_bytes(), seed)
    }

    /// Checksum over the string region. Title, author, copyright and notes
    /// count only when non-empty and include their terminator; clues never do.
    pub fn partial_board_checksum(&self, seed: u16) -> u16 {
        let with_nul = |sum: u16, s: &[u8]| {
            if s.is_empty() {
                sum
            } else {
                checksum(&[0], checksum(s, sum))
            }
        };

        let mut sum = seed;
        sum = with_nul(sum, self.title);
        sum = with_nul(sum, self.author);
        sum = with_nul(sum, self.copyright);
        for clue in &self.clues {
            sum = checksum(clue, sum);
        }
        with_nul(sum, self.notes)
    }

    pub fn overall_checksum(&self) -> u16 {
        let sum = self.cib_checksum();
        let sum = self.solution_checksum(sum);
        let sum = self.grid_checksum(sum);
        self.partial_board_checksum(sum)
    }

    pub fn masked_checksums(&self) -> ([u8; 4], [u8; 4]) {
        masked([
            self.cib_checksum(),
            self.solution_checksum(0),
            self.grid_checksum(0),
            self.partial_board_checksum(0),
        ])
    }

    /// Fails with the first checksum mismatch found.
    pub fn verify(&self) -> Result<()> {
        match ChecksumReport::of(self)?.first_mismatch() {
            Some(err) => Err(err),
            None => Ok(()),
        }
    }

    fn read_u16(&self, offset: usize) -> u16 {
        LittleEndian::read_u16(&self.bytes[offset..offset + 2])
    }

    fn quad(&self, offset: usize) -> [u8; 4] {
        let mut out = [0u8; 4];
        out.copy_from_slice(&self.bytes[offset..offset + 4]);
        out
    }
}

struct StringReader<'a> {
    bytes: &'a [u8],
    pos: usize,
}

impl<'a> StringReader<'a> {
    /// The next null-terminated string, without its terminator.
    fn next(&mut self, context: &'static str) -> Result<&'a [u8]> {
        let rest = &self.bytes[self.pos..];
        let Some(end) = rest.iter().position(|&b| b == 0) else {
            return Err(PuzError::Truncated {
                context,
                needed: self.bytes.len() + 1,
                len: self.bytes.len(),
            });
        };
        self.pos += end + 1;
        Ok(&rest[..end])
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ChecksumEntry {
    pub region: ChecksumRegion,
    pub stored: u32,
    pub computed: u32,
}

impl ChecksumEntry {
    pub fn is_valid(&self) -> bool {
        self.stored == self.computed
    }

    pub fn to_error(&self) -> PuzError {
        PuzError::ChecksumMismatch {
            region: self.region.clone(),
            stored: self.stored,
            computed: self.computed,
        }
    }
}

/// Stored and computed values for every checksum in an image.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ChecksumReport {
    pub entries: Vec<ChecksumEntry>,
}

impl ChecksumReport {
    /// Fails only when the extra sections cannot be scanned.
    pub fn of(image: &PuzImage<'_>) -> Result<Self> {
        let (low, high) = image.masked_checksums();
        let mut entries = vec![
            ChecksumEntry {
                region: ChecksumRegion::Cib,
                stored: u32::from(image.stored_cib_checksum()),
                computed: u32::from(image.cib_checksum()),
            },
            ChecksumEntry {
                region: ChecksumRegion::Overall,
                stored: u32::from(image.stored_overall_checksum()),
                computed: u32::from(image.overall_checksum()),
            },
            ChecksumEntry {
                region: ChecksumRegion::MaskedLow,
                stored: u32::from_le_bytes(image.stored_masked_low()),
                computed: u32::from_le_bytes(low),
            },
            ChecksumEntry {
                region: ChecksumRegion::MaskedHigh,
                stored: u32::from_le_bytes(image.stored_masked_high()),
                computed: u32::from_le_bytes(high),
            },
        ];

        for section in image.extra_sections()? {
            entries.push(ChecksumEntry {
                region: ChecksumRegion::Section(section.title_str()),
                stored: u32::from(section.checksum),
                computed: u32::from(section.computed_checksum()),
            });
        }

        Ok(Self { entries })
    }

    pub fn is_valid(&self) -> bool {
        self.entries.iter().all(ChecksumEntry::is_valid)
    }

    pub fn mismatches(&self) -> impl Iterator<Item = &ChecksumEntry> {
        self.entries.iter().filter(|e| !e.is_valid())
    }

    pub fn first_mismatch(&self) -> Option<PuzError> {
        self.mismatches().next().map(ChecksumEntry::to_error)
    }
}

/// Recomputes every header checksum of `image` in place.
///
/// Extra-section checksums are left alone; they are written with their data.
pub fn write_checksums(image: &mut [u8]) -> Result<()> {
    let (overall, cib, low, high) = {
        let view = PuzImage::new(image)?;
        let (low, high) = view.masked_checksums();
        (view.overall_checksum(), view.cib_checksum(), low, high)
    };

    LittleEndian::write_u16(&mut image[OVERALL_CHECKSUM..OVERALL_CHECKSUM + 2], overall);
    LittleEndian::write_u16(&mut image[CIB_CHECKSUM..CIB_CHECKSUM + 2], cib);
    image[MASKED_LOW..MASKED_LOW + 4].copy_from_slice(&low);
    image[MASKED_HIGH..MASKED_HIGH + 4].copy_from_slice(&high);
    Ok(())
}
