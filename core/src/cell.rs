use serde::{Deserialize, Serialize};

/// The answer stored for one cell: a primary letter plus an optional rebus.
///
/// Block cells keep a default (empty) placeholder.
#[derive(Debug, Clone, Default, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct CellSolution {
    pub letter: Option<char>,
    pub rebus: Option<String>,
}

impl CellSolution {
    pub fn letter(letter: char) -> Self {
        Self {
            letter: Some(letter.to_ascii_uppercase()),
            rebus: None,
        }
    }

    /// A rebus answer; the primary letter is the first character of `text`.
    pub fn rebus(text: &str) -> Self {
        let text = text.to_uppercase();
        Self {
            letter: text.chars().next(),
            rebus: Some(text),
        }
    }

    /// The single A-Z letter that best represents this cell, if there is one.
    pub fn single_letter(&self) -> Option<char> {
        match self.letter {
            Some(c) if c.is_ascii_uppercase() => Some(c),
            _ => self
                .rebus
                .as_deref()
                .and_then(|r| r.chars().next())
                .filter(char::is_ascii_uppercase),
        }
    }

    pub fn has_rebus(&self) -> bool {
        self.rebus.as_deref().is_some_and(|r| !r.is_empty())
    }
}

/// What the solver has currently entered in a cell.
#[derive(Debug, Clone, Default, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum PlayerState {
    #[default]
    Empty,
    Letter(char),
    Rebus(String),
}

impl PlayerState {
    /// Classifies a raw entry: empty, one character, or a multi-character rebus.
    pub fn from_entry(entry: &str) -> Self {
        let mut chars = entry.chars();
        match (chars.next(), chars.next()) {
            (None, _) => PlayerState::Empty,
            (Some(c), None) => PlayerState::Letter(c),
            (Some(_), Some(_)) => PlayerState::Rebus(entry.to_string()),
        }
    }

    pub fn is_empty(&self) -> bool {
        matches!(self, PlayerState::Empty)
    }

    pub fn first_char(&self) -> Option<char> {
        match self {
            PlayerState::Empty => None,
            PlayerState::Letter(c) => Some(*c),
            PlayerState::Rebus(s) => s.chars().next(),
        }
    }

    pub fn as_entry(&self) -> String {
        match self {
            PlayerState::Empty => String::new(),
            PlayerState::Letter(c) => c.to_string(),
            PlayerState::Rebus(s) => s.clone(),
        }
    }
}

#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct CellStyle {
    pub block: bool,
    /// Clue number, 0 when the cell starts no entry.
    pub number: u16,
    pub previously_incorrect: bool,
    pub currently_incorrect: bool,
    pub revealed: bool,
    pub circled: bool,
}

impl CellStyle {
    pub fn block() -> Self {
        Self {
            block: true,
            ..Self::default()
        }
    }

    /// True when any solver/markup flag is set.
    pub fn has_markup(&self) -> bool {
        self.previously_incorrect || self.currently_incorrect || self.revealed || self.circled
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_player_state_from_entry() {
        assert_eq!(PlayerState::from_entry(""), PlayerState::Empty);
        assert_eq!(PlayerState::from_entry("Q"), PlayerState::Letter('Q'));
        assert_eq!(
            PlayerState::from_entry("HEART"),
            PlayerState::Rebus("HEART".to_string())
        );
        assert_eq!(PlayerState::from_entry("HEART").first_char(), Some('H'));
    }

    #[test]
    fn test_single_letter_falls_back_to_rebus() {
        assert_eq!(CellSolution::letter('q').single_letter(), Some('Q'));
        let odd = CellSolution {
            letter: Some('?'),
            rebus: Some("STAR".to_string()),
        };
        assert_eq!(odd.single_letter(), Some('S'));
        assert_eq!(CellSolution::default().single_letter(), None);
    }
}
