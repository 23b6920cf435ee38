//! Reading and writing Across Lite PUZ images.
//!
//! ```no_run
//! let bytes = std::fs::read("monday.puz").unwrap();
//! let puzzle = puzkit_codec::decode(&bytes, true).unwrap();
//! let again = puzkit_codec::encode(&puzzle).unwrap();
//! assert_eq!(puzkit_codec::decode(&again, true).unwrap(), puzzle);
//! ```

pub mod checksum;
pub mod cipher;
mod decode;
mod encode;
pub mod error;
pub mod image;
mod lock;
pub mod section;
pub mod text;
mod validate;

pub use cipher::UnlockKey;
pub use decode::decode;
pub use encode::{encode, encode_with, EncodeOptions};
pub use error::{ChecksumRegion, PuzError, Result};
pub use image::{write_checksums, ChecksumEntry, ChecksumReport, PuzImage};
pub use lock::{decrypted_checksum, find_unlock_key, lock, unlock};
pub use section::{CellFlags, ExtraSection};
pub use validate::validate;
