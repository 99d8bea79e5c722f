//! Record validity and origin markers

use std::fmt;

/// Outcome of checksum handling for a record.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub enum Validity {
    /// Checksum was computed, not verified (bare UID input)
    Unknown,
    /// Appended checksum matches the recomputed one
    Valid,
    /// Appended checksum differs from the recomputed one
    Invalid,
}

impl Validity {
    /// Status line shown to operators.
    ///
    /// A computed checksum reads as a generic "OK", distinct from an explicit
    /// pass or fail.
    #[must_use]
    pub const fn status_label(self) -> &'static str {
        match self {
            Self::Unknown => "OK",
            Self::Valid => "Valid LRC",
            Self::Invalid => "Invalid LRC",
        }
    }

    /// Whether a checksum was actually verified.
    #[must_use]
    pub const fn is_verified(self) -> bool {
        matches!(self, Self::Valid | Self::Invalid)
    }

    /// Whether the record should be trusted.
    #[must_use]
    pub const fn is_acceptable(self) -> bool {
        !matches!(self, Self::Invalid)
    }
}

impl fmt::Display for Validity {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let name = match self {
            Self::Unknown => "Unknown",
            Self::Valid => "Valid",
            Self::Invalid => "Invalid",
        };
        write!(f, "{name}")
    }
}

/// How a record left the frame assembler.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub enum RecordOrigin {
    /// Extracted from a CR/LF terminated segment; delivered exactly once
    Delimited,
    /// Best guess from an undelimited buffer; may be delivered repeatedly
    Preview,
}

impl RecordOrigin {
    /// Check if the record may be repeated on later chunks
    #[must_use]
    pub const fn is_speculative(self) -> bool {
        matches!(self, Self::Preview)
    }
}

impl fmt::Display for RecordOrigin {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let name = match self {
            Self::Delimited => "Delimited",
            Self::Preview => "Preview",
        };
        write!(f, "{name}")
    }
}
