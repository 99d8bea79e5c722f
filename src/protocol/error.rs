//! Candidate and checksum error types

use thiserror::Error;

/// Reasons a candidate could not become a scan record.
///
/// None of these surface past the record builder; they exist so the framing
/// layer can log why a candidate was dropped.
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum Error {
    /// No hex digits to checksum
    #[error("empty hex input")]
    Empty,

    /// Hex digits do not pair into whole bytes
    #[error("odd hex length: {len} digits")]
    OddLength {
        /// Number of digits seen
        len: usize,
    },

    /// A digit pair is not valid hex
    #[error("invalid hex pair at offset {offset}")]
    InvalidHexPair {
        /// Offset of the first digit of the pair
        offset: usize,
    },

    /// Candidate shorter than the smallest accepted record
    #[error("candidate too short: {len} digits (min {min})")]
    TooShort {
        /// Number of digits seen
        len: usize,
        /// Minimum accepted
        min: usize,
    },
}

/// Result type alias
pub type Result<T> = std::result::Result<T, Error>;
