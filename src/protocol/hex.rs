//! Hex normalization
//!
//! Readers emit identifiers as ASCII hex mixed with whatever framing, spacing
//! or prompt text the firmware adds. Normalization keeps only the hex digits,
//! upper-cased, in the order they arrived.

/// Check whether a byte is an ASCII hex digit (either case).
#[inline]
#[must_use]
pub const fn is_hex_digit(byte: u8) -> bool {
    byte.is_ascii_hexdigit()
}

/// Value of a single ASCII hex digit, or `None` for any other byte.
#[inline]
#[must_use]
pub const fn nibble(byte: u8) -> Option<u8> {
    match byte {
        b'0'..=b'9' => Some(byte - b'0'),
        b'a'..=b'f' => Some(byte - b'a' + 10),
        b'A'..=b'F' => Some(byte - b'A' + 10),
        _ => None,
    }
}

/// Normalize text to an uppercase hex digit sequence.
///
/// Every non-hex character is dropped. Never fails; the empty string and
/// strings with no hex digits normalize to `""`.
///
/// ```
/// assert_eq!(tagscan::normalize("ab:cd 0x1f\r\n"), "ABCD01F");
/// ```
#[must_use]
pub fn normalize(input: &str) -> String {
    normalize_bytes(input.as_bytes())
}

/// Normalize raw bytes to an uppercase hex digit sequence.
///
/// Bytes outside ASCII are never hex digits, so this agrees with
/// [`normalize`] applied to the UTF-8 decoding of `input`, lossy or not.
#[must_use]
pub fn normalize_bytes(input: &[u8]) -> String {
    input
        .iter()
        .filter(|byte| is_hex_digit(**byte))
        .map(|byte| char::from(byte.to_ascii_uppercase()))
        .collect()
}
