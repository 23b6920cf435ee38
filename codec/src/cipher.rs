//! The Across Lite solution-locking cipher.
//!
//! This is an obfuscation, not encryption; it is reproduced exactly so locked
//! files stay compatible. All transforms expect uppercase ASCII letters.

use crate::error::{PuzError, Result};
use std::fmt;
use std::str::FromStr;

/// A four-digit unlock code, each digit 1-9.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct UnlockKey([u8; 4]);

impl UnlockKey {
    pub fn new(digits: [u8; 4]) -> Result<Self> {
        if digits.iter().all(|d| (1..=9).contains(d)) {
            Ok(Self(digits))
        } else {
            Err(PuzError::InvalidUnlockCode(format!(
                "digits {digits:?} must each be between 1 and 9"
            )))
        }
    }

    pub fn digits(&self) -> [u8; 4] {
        self.0
    }

    /// Every valid key, 1111 through 9999, in ascending order.
    pub fn all() -> impl Iterator<Item = UnlockKey> {
        (0..9u32.pow(4)).map(|mut n| {
            let mut digits = [0u8; 4];
            for d in digits.iter_mut().rev() {
                *d = (n % 9) as u8 + 1;
                n /= 9;
            }
            UnlockKey(digits)
        })
    }
}

impl FromStr for UnlockKey {
    type Err = PuzError;

    fn from_str(s: &str) -> Result<Self> {
        let bytes = s.as_bytes();
        if bytes.len() != 4 || !bytes.iter().all(|b| (b'1'..=b'9').contains(b)) {
            return Err(PuzError::InvalidUnlockCode(format!(
                "{s:?} is not four digits in the range 1-9"
            )));
        }
        Ok(Self([
            bytes[0] - b'0',
            bytes[1] - b'0',
            bytes[2] - b'0',
            bytes[3] - b'0',
        ]))
    }
}

impl fmt::Display for UnlockKey {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        for d in self.0 {
            write!(f, "{d}")?;
        }
        Ok(())
    }
}

/// Interleaves the two halves: the first half lands on odd positions, the
/// second half on even positions.
pub fn scramble(data: &[u8]) -> Vec<u8> {
    let len = data.len();
    let half = len / 2;
    let mut out = vec![0u8; len];
    for (i, &b) in data.iter().enumerate() {
        let index = if i < half { 2 * i + 1 } else { (i - half) * 2 };
        out[index] = b;
    }
    out
}

pub fn unscramble(data: &[u8]) -> Vec<u8> {
    let len = data.len();
    let half = len / 2;
    let mut out = vec![0u8; len];
    for (i, &b) in data.iter().enumerate() {
        let index = if i % 2 == 0 { half + i / 2 } else { i / 2 };
        out[index] = b;
    }
    out
}

/// Cyclic rotation by `n`: the first `n` bytes move to the back.
///
/// `n` wraps modulo the length, so short solutions rotate instead of failing.
pub fn shift(data: &[u8], n: usize) -> Vec<u8> {
    let mut out = data.to_vec();
    let len = out.len();
    if len > 0 {
        out.rotate_left(n % len);
    }
    out
}

pub fn unshift(data: &[u8], n: usize) -> Vec<u8> {
    let mut out = data.to_vec();
    let len = out.len();
    if len > 0 {
        out.rotate_right(n % len);
    }
    out
}

pub fn encrypt(data: &[u8], key: &UnlockKey) -> Vec<u8> {
    let digits = key.digits();
    let mut out = data.to_vec();
    for &digit in &digits {
        for (i, b) in out.iter_mut().enumerate() {
            *b = b.wrapping_add(digits[i % 4]);
            if *b > b'Z' {
                *b = b.wrapping_sub(26);
            }
        }
        out = scramble(&shift(&out, usize::from(digit)));
    }
    out
}

pub fn decrypt(data: &[u8], key: &UnlockKey) -> Vec<u8> {
    let digits = key.digits();
    let mut out = data.to_vec();
    for &digit in digits.iter().rev() {
        out = unshift(&unscramble(&out), usize::from(digit));
        for (i, b) in out.iter_mut().enumerate() {
            *b = b.wrapping_sub(digits[i % 4]);
            if *b < b'A' {
                *b = b.wrapping_add(26);
            }
        }
    }
    out
}
