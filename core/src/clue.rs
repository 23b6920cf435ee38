use crate::numbering::Numbering;
use crate::{ClueAssignError, Direction};
use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;

/// Across and down clue text keyed by clue number.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct Clues {
    pub across: BTreeMap<u16, String>,
    pub down: BTreeMap<u16, String>,
}

impl Clues {
    pub fn new() -> Self {
        Self::default()
    }

    /// Hands out a flat clue list to the entries of `numbering`, in PUZ order.
    pub fn assign(numbering: &Numbering, clues: Vec<String>) -> Result<Self, ClueAssignError> {
        let expected = numbering.entry_count();
        if clues.len() != expected {
            return Err(ClueAssignError {
                expected,
                found: clues.len(),
            });
        }

        let mut out = Self::new();
        for (entry, text) in numbering.entries().zip(clues) {
            out.insert(entry.direction, entry.number, text);
        }
        Ok(out)
    }

    pub fn by_direction(&self, direction: Direction) -> &BTreeMap<u16, String> {
        match direction {
            Direction::Across => &self.across,
            Direction::Down => &self.down,
        }
    }

    pub fn get(&self, direction: Direction, number: u16) -> Option<&str> {
        self.by_direction(direction).get(&number).map(String::as_str)
    }

    pub fn insert(&mut self, direction: Direction, number: u16, text: impl Into<String>) {
        let map = match direction {
            Direction::Across => &mut self.across,
            Direction::Down => &mut self.down,
        };
        map.insert(number, text.into());
    }

    pub fn len(&self) -> usize {
        self.across.len() + self.down.len()
    }

    pub fn is_empty(&self) -> bool {
        self.across.is_empty() && self.down.is_empty()
    }
}
