//! Incremental hex run scanner for undelimited buffers.

use std::ops::Range;

use crate::protocol::{MIN_CANDIDATE_DIGITS, is_hex_digit};

/// Tracks maximal hex digit runs across successive appends to one buffer.
///
/// Only bytes appended since the last call are inspected, so a buffer that
/// grows chunk by chunk is scanned once in total.
#[derive(Debug, Default, Clone)]
pub(crate) struct RunScanner {
    /// Bytes before this offset have been classified
    cursor: usize,
    /// Start of the run still touching the end of the buffer
    open_start: Option<usize>,
    /// Right-most terminated run of at least `MIN_CANDIDATE_DIGITS`
    last_closed: Option<Range<usize>>,
}

impl RunScanner {
    /// Scan bytes appended since the previous call and return the right-most
    /// run of at least [`MIN_CANDIDATE_DIGITS`] hex digits.
    ///
    /// `buffer` must be the same buffer as before with bytes appended.
    pub(crate) fn advance(&mut self, buffer: &[u8]) -> Option<Range<usize>> {
        debug_assert!(self.cursor <= buffer.len(), "buffer shrank under scanner");

        for (index, &byte) in buffer.iter().enumerate().skip(self.cursor) {
            if is_hex_digit(byte) {
                self.open_start.get_or_insert(index);
            } else if let Some(start) = self.open_start.take() {
                if index - start >= MIN_CANDIDATE_DIGITS {
                    self.last_closed = Some(start..index);
                }
            }
        }
        self.cursor = buffer.len();

        match self.open_start {
            Some(start) if buffer.len() - start >= MIN_CANDIDATE_DIGITS => {
                Some(start..buffer.len())
            }
            _ => self.last_closed.clone(),
        }
    }

    /// Forget everything; the next call scans from offset zero.
    pub(crate) fn reset(&mut self) {
        *self = Self::default();
    }
}
