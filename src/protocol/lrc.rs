//! Longitudinal redundancy check (bytewise XOR)
//!
//! The checksum is a plain XOR of every byte. It catches any single corrupted
//! byte but is blind to reordering and to pairs of identical errors, which is
//! all the reader firmware promises.

use std::fmt;

use super::hex::nibble;
use super::{Error, Result};

/// One LRC byte, rendered as two uppercase hex digits.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Hash)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct Lrc(u8);

impl Lrc {
    /// Wrap a raw checksum byte.
    #[must_use]
    pub const fn new(value: u8) -> Self {
        Self(value)
    }

    /// Raw checksum byte.
    #[must_use]
    pub const fn as_u8(self) -> u8 {
        self.0
    }

    /// Parse exactly two hex digits.
    #[must_use]
    pub fn from_hex(pair: &str) -> Option<Self> {
        match pair.as_bytes() {
            [hi, lo] => decode_pair(*hi, *lo).map(Self),
            _ => None,
        }
    }

    /// Two-digit uppercase hex form.
    #[must_use]
    pub fn to_hex(self) -> String {
        self.to_string()
    }
}

impl fmt::Display for Lrc {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{:02X}", self.0)
    }
}

impl From<u8> for Lrc {
    fn from(value: u8) -> Self {
        Self(value)
    }
}

#[inline]
fn decode_pair(hi: u8, lo: u8) -> Option<u8> {
    Some((nibble(hi)? << 4) | nibble(lo)?)
}

/// XOR every byte of `bytes`, starting from zero.
#[must_use]
pub fn lrc_of_bytes(bytes: &[u8]) -> Lrc {
    Lrc(bytes.iter().fold(0, |acc, byte| acc ^ byte))
}

/// Compute the LRC over hex text, reporting why it could not be computed.
///
/// The text is read two digits at a time, left to right. Only ASCII hex digits
/// are accepted in a pair; signs, whitespace or anything else fail with
/// [`Error::InvalidHexPair`].
pub fn try_compute_lrc(hex: &str) -> Result<Lrc> {
    let digits = hex.as_bytes();
    if digits.is_empty() {
        return Err(Error::Empty);
    }
    if digits.len() % 2 != 0 {
        return Err(Error::OddLength { len: digits.len() });
    }

    let mut acc = 0u8;
    for (index, pair) in digits.chunks_exact(2).enumerate() {
        let byte = decode_pair(pair[0], pair[1])
            .ok_or(Error::InvalidHexPair { offset: index * 2 })?;
        acc ^= byte;
    }
    Ok(Lrc(acc))
}

/// Compute the LRC over hex text.
///
/// Returns `None` for empty or odd-length input, or if any digit pair is not
/// valid hex.
///
/// ```
/// let lrc = tagscan::compute_lrc("0102030405").unwrap();
/// assert_eq!(lrc.to_string(), "01");
/// ```
#[must_use]
pub fn compute_lrc(hex: &str) -> Option<Lrc> {
    try_compute_lrc(hex).ok()
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_known_value() {
        assert_eq!(compute_lrc("0102030405"), Some(Lrc(0x01)));
        assert_eq!(compute_lrc("FF"), Some(Lrc(0xFF)));
        assert_eq!(compute_lrc("FFFF"), Some(Lrc(0x00)));
    }

    #[test]
    fn test_zero_padded_rendering() {
        assert_eq!(Lrc(0x05).to_string(), "05");
        assert_eq!(Lrc(0x00).to_hex(), "00");
        assert_eq!(Lrc(0xAB).to_hex(), "AB");
    }

    #[test]
    fn test_lowercase_digits_accepted() {
        assert_eq!(compute_lrc("0a0b"), Some(Lrc(0x01)));
    }

    #[test]
    fn test_empty_and_odd_rejected() {
        assert_eq!(try_compute_lrc(""), Err(Error::Empty));
        assert_eq!(try_compute_lrc("012"), Err(Error::OddLength { len: 3 }));
        assert_eq!(compute_lrc("0"), None);
    }

    #[test]
    fn test_invalid_pair_rejected() {
        assert_eq!(
            try_compute_lrc("01G2"),
            Err(Error::InvalidHexPair { offset: 2 })
        );
        // from_str_radix would accept a leading sign; the engine must not
        assert_eq!(compute_lrc("+5"), None);
        assert_eq!(compute_lrc(" 5"), None);
    }

    #[test]
    fn test_non_ascii_does_not_panic() {
        assert_eq!(compute_lrc("éé"), None);
        assert_eq!(compute_lrc("0é"), None);
    }

    #[test]
    fn test_lrc_from_hex() {
        assert_eq!(Lrc::from_hex("7F"), Some(Lrc(0x7F)));
        assert_eq!(Lrc::from_hex("7f"), Some(Lrc(0x7F)));
        assert_eq!(Lrc::from_hex("7"), None);
        assert_eq!(Lrc::from_hex("7FF"), None);
        assert_eq!(Lrc::from_hex("-1"), None);
    }

    #[test]
    fn test_lrc_of_bytes_matches_hex() {
        let bytes = [0xDE, 0xAD, 0xBE, 0xEF, 0x42];
        assert_eq!(lrc_of_bytes(&bytes), compute_lrc("DEADBEEF42").unwrap());
        assert_eq!(lrc_of_bytes(&[]), Lrc(0));
    }

    mod proptests {
        use super::*;
        use proptest::prelude::*;

        fn to_hex(bytes: &[u8]) -> String {
            bytes.iter().map(|b| format!("{b:02X}")).collect()
        }

        proptest! {
            /// Property: appending any byte twice cancels out
            #[test]
            fn prop_duplicate_byte_cancels(
                bytes in prop::collection::vec(any::<u8>(), 1..64),
                extra in any::<u8>(),
            ) {
                let base = to_hex(&bytes);
                let padded = format!("{base}{extra:02X}{extra:02X}");
                prop_assert_eq!(compute_lrc(&padded), compute_lrc(&base));
            }

            /// Property: the result depends only on the byte multiset
            #[test]
            fn prop_permutation_invariant(
                bytes in prop::collection::vec(any::<u8>(), 1..64),
                rotate in 0usize..64,
            ) {
                let mut rotated = bytes.clone();
                let len = rotated.len();
                rotated.rotate_left(rotate % len);
                prop_assert_eq!(compute_lrc(&to_hex(&bytes)), compute_lrc(&to_hex(&rotated)));
            }

            /// Property: hex and raw byte paths agree, in either case
            #[test]
            fn prop_hex_matches_bytes(bytes in prop::collection::vec(any::<u8>(), 1..64)) {
                let hex = to_hex(&bytes);
                prop_assert_eq!(compute_lrc(&hex), Some(lrc_of_bytes(&bytes)));
                prop_assert_eq!(compute_lrc(&hex.to_lowercase()), Some(lrc_of_bytes(&bytes)));
            }

            /// Property: rendering is always two uppercase hex digits
            #[test]
            fn prop_rendering_two_digits(value in any::<u8>()) {
                let rendered = Lrc(value).to_string();
                prop_assert_eq!(rendered.len(), 2);
                prop_assert_eq!(Lrc::from_hex(&rendered), Some(Lrc(value)));
                prop_assert!(
                    rendered
                        .chars()
                        .all(|c| c.is_ascii_digit() || c.is_ascii_uppercase())
                );
            }
        }
    }
}
