//! Error type shared by the encoder, decoder and image accessors.

use puzkit_core::{ClueAssignError, Coordinate};
use std::fmt;
use thiserror::Error;

/// The checksummed regions of a PUZ image.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ChecksumRegion {
    Overall,
    Cib,
    MaskedLow,
    MaskedHigh,
    /// An extra section, by title.
    Section(String),
}

impl fmt::Display for ChecksumRegion {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            ChecksumRegion::Overall => write!(f, "overall"),
            ChecksumRegion::Cib => write!(f, "CIB"),
            ChecksumRegion::MaskedLow => write!(f, "masked low"),
            ChecksumRegion::MaskedHigh => write!(f, "masked high"),
            ChecksumRegion::Section(title) => write!(f, "{title} section"),
        }
    }
}

#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum PuzError {
    #[error("Malformed header: {0}")]
    MalformedHeader(String),

    #[error("Image truncated: {needed} bytes needed for {context}, but only {len} available")]
    Truncated {
        context: &'static str,
        needed: usize,
        len: usize,
    },

    #[error("Checksum mismatch in {region} checksum: stored {stored:#06x}, computed {computed:#06x}")]
    ChecksumMismatch {
        region: ChecksumRegion,
        stored: u32,
        computed: u32,
    },

    #[error("Inconsistent numbering: {0}")]
    InconsistentNumbering(String),

    #[error("Invalid solution character {found:?} at {at}")]
    InvalidSolutionCharacter { at: Coordinate, found: Option<char> },

    #[error("Invalid unlock code: {0}")]
    InvalidUnlockCode(String),

    #[error("Clue count mismatch: grid has {expected} numbered entries but {found} clues were given")]
    ClueCountMismatch { expected: usize, found: usize },

    #[error("Invalid dimensions {width}x{height}: both must be between 1 and 255")]
    InvalidDimensions { width: usize, height: usize },

    #[error("The {grid} grid holds {found} cells, expected {expected}")]
    GridSizeMismatch {
        grid: &'static str,
        expected: usize,
        found: usize,
    },

    #[error("Block cell {at} must not carry {what}")]
    OccupiedBlock { at: Coordinate, what: &'static str },

    #[error("Cannot store {field}: {reason}")]
    InvalidText { field: String, reason: String },

    #[error("Malformed {title} section: {reason}")]
    MalformedSection { title: String, reason: String },
}

impl PuzError {
    /// Checksum mismatches can be waved through by decoding leniently; nothing else can.
    pub fn is_recoverable(&self) -> bool {
        matches!(self, PuzError::ChecksumMismatch { .. })
    }

    pub(crate) fn section(title: &str, reason: impl Into<String>) -> Self {
        PuzError::MalformedSection {
            title: title.to_string(),
            reason: reason.into(),
        }
    }
}

impl From<ClueAssignError> for PuzError {
    fn from(err: ClueAssignError) -> Self {
        PuzError::ClueCountMismatch {
            expected: err.expected,
            found: err.found,
        }
    }
}

/// A convenience `Result` alias using [`PuzError`].
pub type Result<T> = std::result::Result<T, PuzError>;
