//! Locking, unlocking and key recovery on raw images.
//!
//! The cipher runs over the open-cell solution letters gathered column by
//! column (every row of column 1, then column 2, and so on), skipping blocks.

use crate::checksum::checksum;
use crate::cipher::{decrypt, encrypt, UnlockKey};
use crate::error::{PuzError, Result};
use crate::image::{
    self, is_block_byte, PuzImage, DECRYPTED_CHECKSUM, SOLUTION, SOLUTION_ENCRYPTED,
    SOLUTION_NORMAL, SOLUTION_TYPE,
};
use byteorder::{ByteOrder, LittleEndian};
use log::debug;
use puzkit_core::Coordinate;

/// Image offsets of the open solution cells in cipher order.
fn letter_offsets(width: usize, height: usize, solution: &[u8]) -> Vec<usize> {
    (0..width)
        .flat_map(|col| (0..height).map(move |row| row * width + col))
        .filter(|&i| !is_block_byte(solution[i]))
        .collect()
}

fn gather(image: &PuzImage<'_>) -> (Vec<usize>, Vec<u8>) {
    let solution = image.solution_bytes();
    let offsets = letter_offsets(image.width(), image.height(), solution);
    let letters = offsets.iter().map(|&i| solution[i]).collect();
    (offsets, letters)
}

fn scatter(bytes: &mut [u8], offsets: &[usize], letters: &[u8]) {
    for (&i, &letter) in offsets.iter().zip(letters) {
        bytes[SOLUTION + i] = letter;
    }
}

fn check_letters(image: &PuzImage<'_>, offsets: &[usize], letters: &[u8]) -> Result<()> {
    let width = image.width();
    match offsets
        .iter()
        .zip(letters)
        .find(|(_, b)| !b.is_ascii_uppercase())
    {
        Some((&i, &b)) => Err(PuzError::InvalidSolutionCharacter {
            at: Coordinate::new(i % width + 1, i / width + 1),
            found: Some(char::from(b)),
        }),
        None => Ok(()),
    }
}

/// Checksum of plaintext solution letters, as stored at 0x1E of a locked image.
pub fn decrypted_checksum(letters: &[u8]) -> u16 {
    checksum(letters, 0)
}

/// Recovers the key of a locked image by trying every key in ascending order.
///
/// Returns `None` when the image is not locked, is unreadable, or no key
/// reproduces the stored plaintext checksum.
pub fn find_unlock_key(bytes: &[u8]) -> Option<UnlockKey> {
    let image = PuzImage::new(bytes).ok()?;
    if !image.is_encrypted() {
        return None;
    }

    let (_, letters) = gather(&image);
    let target = image.decrypted_solution_checksum();
    let key = UnlockKey::all().find(|key| decrypted_checksum(&decrypt(&letters, key)) == target);

    match key {
        Some(key) => debug!("recovered unlock key {key}"),
        None => debug!("no key reproduces decrypted checksum {target:#06x}"),
    }
    key
}

/// Encrypts the solution of an unlocked image in place.
pub fn lock(bytes: &mut [u8], key: &UnlockKey) -> Result<()> {
    let (offsets, letters) = {
        let image = PuzImage::new(bytes)?;
        if image.is_encrypted() {
            return Err(PuzError::InvalidUnlockCode(
                "the solution is already locked".to_string(),
            ));
        }
        let (offsets, letters) = gather(&image);
        check_letters(&image, &offsets, &letters)?;
        (offsets, letters)
    };

    scatter(bytes, &offsets, &encrypt(&letters, key));
    LittleEndian::write_u16(
        &mut bytes[DECRYPTED_CHECKSUM..DECRYPTED_CHECKSUM + 2],
        decrypted_checksum(&letters),
    );
    LittleEndian::write_u16(&mut bytes[SOLUTION_TYPE..SOLUTION_TYPE + 2], SOLUTION_ENCRYPTED);
    image::write_checksums(bytes)?;
    debug!("locked {} solution letters", letters.len());
    Ok(())
}

/// Decrypts the solution of a locked image in place.
///
/// The key is checked against the stored plaintext checksum first; a wrong key
/// leaves the image untouched.
pub fn unlock(bytes: &mut [u8], key: &UnlockKey) -> Result<()> {
    let (offsets, plain) = {
        let image = PuzImage::new(bytes)?;
        if !image.is_encrypted() {
            return Err(PuzError::InvalidUnlockCode(
                "the solution is not locked".to_string(),
            ));
        }
        let (offsets, letters) = gather(&image);
        check_letters(&image, &offsets, &letters)?;
        let plain = decrypt(&letters, key);
        if decrypted_checksum(&plain) != image.decrypted_solution_checksum() {
            return Err(PuzError::InvalidUnlockCode(format!(
                "{key} does not unlock this solution"
            )));
        }
        (offsets, plain)
    };

    scatter(bytes, &offsets, &plain);
    LittleEndian::write_u16(&mut bytes[DECRYPTED_CHECKSUM..DECRYPTED_CHECKSUM + 2], 0);
    LittleEndian::write_u16(&mut bytes[SOLUTION_TYPE..SOLUTION_TYPE + 2], SOLUTION_NORMAL);
    image::write_checksums(bytes)?;
    debug!("unlocked {} solution letters with {key}", plain.len());
    Ok(())
}
