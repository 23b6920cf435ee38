//! Reading and writing `.puz` files.

use puzkit_codec::{PuzError, decode};
use puzkit_core::Puzzle;
use std::path::Path;
use thiserror::Error;

#[derive(Error, Debug)]
pub enum FileError {
    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),
    #[error("PUZ error: {0}")]
    Puz(#[from] PuzError),
    #[error("Invalid file format: expected {expected}, found {actual}")]
    InvalidFormat { expected: String, actual: String },
}

pub const EXTENSION: &str = "puz";

pub fn check_extension(path: &Path) -> Result<(), FileError> {
    let extension = path.extension().and_then(|s| s.to_str()).unwrap_or("");
    if extension.eq_ignore_ascii_case(EXTENSION) {
        Ok(())
    } else {
        Err(FileError::InvalidFormat {
            expected: format!(".{EXTENSION}"),
            actual: if extension.is_empty() {
                "no extension".to_string()
            } else {
                format!(".{extension}")
            },
        })
    }
}

pub fn read_puz(path: &Path) -> Result<Vec<u8>, FileError> {
    check_extension(path)?;
    Ok(std::fs::read(path)?)
}

pub fn write_puz(path: &Path, bytes: &[u8]) -> Result<(), FileError> {
    check_extension(path)?;
    std::fs::write(path, bytes)?;
    Ok(())
}

pub fn load_puzzle(path: &Path, strict: bool) -> Result<Puzzle, FileError> {
    let bytes = read_puz(path)?;
    Ok(decode(&bytes, strict)?)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_extension_check() {
        assert!(check_extension(Path::new("monday.puz")).is_ok());
        assert!(check_extension(Path::new("MONDAY.PUZ")).is_ok());
        assert!(matches!(
            check_extension(Path::new("monday.json")),
            Err(FileError::InvalidFormat { .. })
        ));
        assert!(check_extension(Path::new("monday")).is_err());
    }
}
