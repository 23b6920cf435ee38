//! Windows-1252 transcoding for PUZ strings.

use crate::error::{PuzError, Result};
use encoding_rs::WINDOWS_1252;

/// Decode PUZ string bytes. Every byte maps to some character, so this never fails.
pub fn decode(bytes: &[u8]) -> String {
    WINDOWS_1252.decode_without_bom_handling(bytes).0.into_owned()
}

/// Encode `text` for storage in a null-terminated PUZ string.
///
/// Fails on NUL (it would end the string early) and on characters that have no
/// Windows-1252 byte.
pub fn encode(field: &str, text: &str) -> Result<Vec<u8>> {
    if text.contains('\0') {
        return Err(PuzError::InvalidText {
            field: field.to_string(),
            reason: "contains a NUL character".to_string(),
        });
    }
    let (bytes, _, had_errors) = WINDOWS_1252.encode(text);
    if had_errors {
        return Err(PuzError::InvalidText {
            field: field.to_string(),
            reason: format!("{text:?} has characters outside Windows-1252"),
        });
    }
    Ok(bytes.into_owned())
}

/// Encode a single character to its one-byte form.
pub fn encode_char(field: &str, c: char) -> Result<u8> {
    let mut buf = [0u8; 4];
    match encode(field, c.encode_utf8(&mut buf))?.as_slice() {
        [b] => Ok(*b),
        _ => Err(PuzError::InvalidText {
            field: field.to_string(),
            reason: format!("{c:?} does not fit in one byte"),
        }),
    }
}

pub fn decode_char(byte: u8) -> char {
    decode(&[byte]).chars().next().unwrap_or(char::REPLACEMENT_CHARACTER)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_round_trip_accents() {
        let bytes = encode("title", "Café “quoted”").unwrap();
        assert_eq!(bytes[3], 0xE9);
        assert_eq!(decode(&bytes), "Café “quoted”");
    }

    #[test]
    fn test_rejects_unencodable() {
        assert!(matches!(
            encode("notes", "漢字"),
            Err(PuzError::InvalidText { .. })
        ));
        assert!(encode("notes", "a\0b").is_err());
    }

    #[test]
    fn test_single_chars() {
        assert_eq!(encode_char("cell", 'Q').unwrap(), b'Q');
        assert_eq!(decode_char(0xC9), 'É');
    }
}
