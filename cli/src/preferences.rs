//! User preferences persistence.
//!
//! Stores user preferences in `~/.puzkit/preferences.json`.

use log::{debug, warn};
use serde::{Deserialize, Serialize};
use std::path::PathBuf;
use thiserror::Error;

/// Error type for preferences operations.
#[derive(Error, Debug)]
pub enum PreferencesError {
    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),
    #[error("JSON error: {0}")]
    Serde(#[from] serde_json::Error),
    #[error("Could not determine home directory")]
    NoHomeDir,
}

/// User preferences.
#[derive(Serialize, Deserialize, Debug, Clone, PartialEq, Eq)]
pub struct Preferences {
    /// Refuse files whose checksums do not match.
    #[serde(default = "default_strict_checksums")]
    pub strict_checksums: bool,
    /// Print solution letters instead of the solver's entries.
    #[serde(default)]
    pub show_solution: bool,
}

fn default_strict_checksums() -> bool {
    true
}

impl Default for Preferences {
    fn default() -> Self {
        Self {
            strict_checksums: default_strict_checksums(),
            show_solution: false,
        }
    }
}

/// Get the preferences file path (`~/.puzkit/preferences.json`).
pub fn preferences_path() -> Result<PathBuf, PreferencesError> {
    let home = dirs::home_dir().ok_or(PreferencesError::NoHomeDir)?;
    Ok(home.join(".puzkit").join("preferences.json"))
}

/// Load preferences from disk.
///
/// Returns default preferences if the file doesn't exist or can't be read.
pub fn load_preferences() -> Preferences {
    let path = match preferences_path() {
        Ok(p) => p,
        Err(_) => return Preferences::default(),
    };

    if !path.exists() {
        return Preferences::default();
    }

    let contents = match std::fs::read_to_string(&path) {
        Ok(c) => c,
        Err(e) => {
            warn!("could not read {}: {e}", path.display());
            return Preferences::default();
        }
    };

    parse_preferences(&contents)
}

fn parse_preferences(contents: &str) -> Preferences {
    match serde_json::from_str(contents) {
        Ok(prefs) => {
            debug!("loaded preferences: {prefs:?}");
            prefs
        }
        Err(e) => {
            warn!("ignoring malformed preferences: {e}");
            Preferences::default()
        }
    }
}

/// Save preferences to disk.
pub fn save_preferences(prefs: &Preferences) -> Result<PathBuf, PreferencesError> {
    let path = preferences_path()?;

    if let Some(parent) = path.parent() {
        std::fs::create_dir_all(parent)?;
    }

    let json = serde_json::to_string_pretty(prefs)?;
    std::fs::write(&path, json)?;

    Ok(path)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_missing_fields_take_defaults() {
        assert_eq!(parse_preferences("{}"), Preferences::default());
        let prefs = parse_preferences(r#"{ "show_solution": true }"#);
        assert!(prefs.strict_checksums);
        assert!(prefs.show_solution);
    }

    #[test]
    fn test_malformed_file_falls_back() {
        assert_eq!(parse_preferences("not json"), Preferences::default());
    }

    #[test]
    fn test_json_round_trip() {
        let prefs = Preferences {
            strict_checksums: false,
            show_solution: true,
        };
        let json = serde_json::to_string_pretty(&prefs).unwrap();
        assert_eq!(parse_preferences(&json), prefs);
    }
}
