//! Identifier text handling: hex normalization, XOR LRC and record building.
//!
//! Everything here is pure; the stateful stream handling lives in
//! [`crate::framing`].

mod error;
mod hex;
mod lrc;
mod record;
mod types;

pub use error::{Error, Result};
pub use hex::{is_hex_digit, nibble, normalize, normalize_bytes};
pub use lrc::{Lrc, compute_lrc, lrc_of_bytes, try_compute_lrc};
pub use record::{ScanRecord, build_record, classify};
pub use types::{RecordOrigin, Validity};

/// Hex digits in a bare UID (5 bytes)
pub const UID_DIGITS: usize = 10;

/// Hex digits in a UID with its checksum byte appended
pub const UID_WITH_LRC_DIGITS: usize = UID_DIGITS + LRC_DIGITS;

/// Hex digits in one checksum byte
pub const LRC_DIGITS: usize = 2;

/// Shortest candidate the builder accepts, and the shortest hex run the
/// undelimited scan considers
pub const MIN_CANDIDATE_DIGITS: usize = 8;
