//! Scan records and the length-keyed record builder
//!
//! A reader may send either a bare UID (the checksum must be computed) or a
//! UID with its checksum byte already appended (the checksum must be
//! verified). Nothing on the wire says which, so the builder decides purely
//! from the number of hex digits.

use std::fmt;

use super::lrc::{Lrc, try_compute_lrc};
use super::{Error, MIN_CANDIDATE_DIGITS, Result, UID_DIGITS, UID_WITH_LRC_DIGITS, Validity};

/// One identifier read from the device.
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct ScanRecord {
    uid: String,
    lrc: Lrc,
    final_code: String,
    validity: Validity,
}

impl ScanRecord {
    /// UID hex digits, without the checksum byte
    #[must_use]
    pub fn uid(&self) -> &str {
        &self.uid
    }

    /// Checksum byte: computed for bare UIDs, as received for UID+LRC input
    #[must_use]
    pub const fn lrc(&self) -> Lrc {
        self.lrc
    }

    /// UID followed by its checksum byte
    #[must_use]
    pub fn final_code(&self) -> &str {
        &self.final_code
    }

    /// Checksum outcome
    #[must_use]
    pub const fn validity(&self) -> Validity {
        self.validity
    }

    /// Operator-facing status line
    #[must_use]
    pub const fn status_label(&self) -> &'static str {
        self.validity.status_label()
    }
}

impl fmt::Display for ScanRecord {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{} ({})", self.final_code, self.validity.status_label())
    }
}

/// Build a record from a normalized candidate, or explain why not.
///
/// Policies, in priority order:
///
/// | digits              | action                                  | validity            |
/// |---------------------|-----------------------------------------|---------------------|
/// | 10                  | compute LRC, append                     | `Unknown`           |
/// | 12                  | verify last 2 digits against first 10   | `Valid` / `Invalid` |
/// | even, >= 8, other   | compute LRC over all, append            | `Unknown`           |
/// | anything else       | rejected                                |                     |
pub fn classify(candidate: &str) -> Result<ScanRecord> {
    match candidate.len() {
        UID_DIGITS => {
            let lrc = try_compute_lrc(candidate)?;
            Ok(append_lrc(candidate, lrc))
        }
        UID_WITH_LRC_DIGITS => {
            if !candidate.is_char_boundary(UID_DIGITS) {
                return Err(Error::InvalidHexPair {
                    offset: UID_DIGITS - 2,
                });
            }
            let (uid_part, lrc_part) = candidate.split_at(UID_DIGITS);
            let received =
                Lrc::from_hex(lrc_part).ok_or(Error::InvalidHexPair { offset: UID_DIGITS })?;
            let computed = try_compute_lrc(uid_part)?;
            let validity = if computed == received {
                Validity::Valid
            } else {
                Validity::Invalid
            };
            Ok(ScanRecord {
                uid: uid_part.to_owned(),
                lrc: received,
                final_code: candidate.to_owned(),
                validity,
            })
        }
        len if len < MIN_CANDIDATE_DIGITS => Err(Error::TooShort {
            len,
            min: MIN_CANDIDATE_DIGITS,
        }),
        len if len % 2 != 0 => Err(Error::OddLength { len }),
        _ => {
            let lrc = try_compute_lrc(candidate)?;
            Ok(append_lrc(candidate, lrc))
        }
    }
}

/// Build a record from a normalized candidate.
///
/// Returns `None` when the candidate is too short, has odd length, or does not
/// parse as hex. A checksum mismatch is not a failure; it yields a record with
/// [`Validity::Invalid`].
///
/// ```
/// use tagscan::{Validity, build_record};
///
/// let record = build_record("0102030405").unwrap();
/// assert_eq!(record.final_code(), "010203040501");
/// assert_eq!(record.validity(), Validity::Unknown);
/// ```
#[must_use]
pub fn build_record(candidate: &str) -> Option<ScanRecord> {
    classify(candidate).ok()
}

fn append_lrc(uid: &str, lrc: Lrc) -> ScanRecord {
    ScanRecord {
        uid: uid.to_owned(),
        lrc,
        final_code: format!("{uid}{lrc}"),
        validity: Validity::Unknown,
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_bare_uid_gets_computed_lrc() {
        let record = build_record("0102030405").unwrap();
        assert_eq!(record.uid(), "0102030405");
        assert_eq!(record.lrc().to_string(), "01");
        assert_eq!(record.final_code(), "010203040501");
        assert_eq!(record.validity(), Validity::Unknown);
        assert_eq!(record.status_label(), "OK");
    }

    #[test]
    fn test_uid_with_matching_lrc() {
        let record = build_record("010203040501").unwrap();
        assert_eq!(record.uid(), "0102030405");
        assert_eq!(record.lrc().to_string(), "01");
        assert_eq!(record.final_code(), "010203040501");
        assert_eq!(record.validity(), Validity::Valid);
        assert_eq!(record.status_label(), "Valid LRC");
    }

    #[test]
    fn test_uid_with_off_by_nibble_lrc() {
        // 01^02^03^04^05 is 01, so a trailing 05 does not verify
        let record = build_record("010203040505").unwrap();
        assert_eq!(record.lrc().to_string(), "05");
        assert_eq!(record.validity(), Validity::Invalid);
    }

    #[test]
    fn test_uid_with_wrong_lrc() {
        let record = build_record("01020304057F").unwrap();
        assert_eq!(record.uid(), "0102030405");
        assert_eq!(record.lrc().to_string(), "7F");
        assert_eq!(record.final_code(), "01020304057F");
        assert_eq!(record.validity(), Validity::Invalid);
        assert_eq!(record.to_string(), "01020304057F (Invalid LRC)");
    }

    #[test]
    fn test_other_even_lengths_get_computed_lrc() {
        let record = build_record("DEADBEEF").unwrap();
        assert_eq!(record.final_code(), "DEADBEEF22");
        assert_eq!(record.validity(), Validity::Unknown);

        let record = build_record("00112233445566").unwrap();
        assert_eq!(record.lrc().to_string(), "77");
        assert_eq!(record.final_code(), "0011223344556677");
    }

    #[test]
    fn test_rejections() {
        assert_eq!(classify(""), Err(Error::TooShort { len: 0, min: 8 }));
        assert_eq!(classify("AB"), Err(Error::TooShort { len: 2, min: 8 }));
        assert_eq!(classify("0102030"), Err(Error::TooShort { len: 7, min: 8 }));
        assert_eq!(classify("010203040"), Err(Error::OddLength { len: 9 }));
        assert_eq!(classify("01020304050"), Err(Error::OddLength { len: 11 }));
        assert_eq!(classify("0102030405060"), Err(Error::OddLength { len: 13 }));
    }

    #[test]
    fn test_unnormalized_input_rejected_not_panicking() {
        assert!(build_record("01020304ZZ").is_none());
        assert!(build_record("0102030405ZZ").is_none());
        assert!(build_record("ZZ02030405AA").is_none());
        // multi-byte character straddling the UID/LRC split
        assert!(build_record("012345678\u{e9}A").is_none());
    }

    mod proptests {
        use super::*;
        use proptest::prelude::*;

        proptest! {
            /// Property: a bare UID round-trips through the builder as Valid
            #[test]
            fn prop_uid_roundtrip_valid(uid in "[0-9A-F]{10}") {
                let record = build_record(&uid).unwrap();
                let lrc = crate::compute_lrc(&uid).unwrap();
                prop_assert_eq!(record.final_code(), format!("{uid}{lrc}"));

                let refed = build_record(record.final_code()).unwrap();
                prop_assert_eq!(refed.validity(), Validity::Valid);
                prop_assert_eq!(refed.uid(), uid.as_str());
            }

            /// Property: flipping bits in the checksum byte is always caught
            #[test]
            fn prop_corrupt_lrc_invalid(uid in "[0-9A-F]{10}", flip in 1u8..=255) {
                let lrc = crate::compute_lrc(&uid).unwrap();
                let corrupted = Lrc::new(lrc.as_u8() ^ flip);
                let record = build_record(&format!("{uid}{corrupted}")).unwrap();
                prop_assert_eq!(record.validity(), Validity::Invalid);
            }

            /// Property: odd-length candidates never produce a record
            #[test]
            fn prop_odd_rejected(candidate in "[0-9A-F]{1,40}") {
                prop_assume!(candidate.len() % 2 == 1);
                prop_assert!(build_record(&candidate).is_none());
            }
        }
    }
}
