use std::sync::atomic::{AtomicU64, Ordering};

use crate::protocol::{RecordOrigin, Validity};

/// Counters for one assembler/session, shareable with a host thread.
///
/// The session mutates these from its reader thread; hosts hold an
/// `Arc<ScanMetrics>` and call [`ScanMetrics::snapshot`] whenever they like.
#[derive(Debug, Default)]
pub struct ScanMetrics {
    chunks: AtomicU64,
    bytes: AtomicU64,
    delimited_records: AtomicU64,
    preview_records: AtomicU64,
    valid: AtomicU64,
    invalid: AtomicU64,
    unverified: AtomicU64,
    dropped_candidates: AtomicU64,
    buffer_resets: AtomicU64,
    faults: AtomicU64,
    buffer_high_water: AtomicU64,
}

impl ScanMetrics {
    /// Fresh zeroed counters.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    #[inline]
    pub(crate) fn record_chunk(&self, len: usize) {
        self.chunks.fetch_add(1, Ordering::Relaxed);
        self.bytes.fetch_add(len as u64, Ordering::Relaxed);
    }

    #[inline]
    pub(crate) fn record_emitted(&self, origin: RecordOrigin, validity: Validity) {
        match origin {
            RecordOrigin::Delimited => self.delimited_records.fetch_add(1, Ordering::Relaxed),
            RecordOrigin::Preview => self.preview_records.fetch_add(1, Ordering::Relaxed),
        };
        match validity {
            Validity::Valid => self.valid.fetch_add(1, Ordering::Relaxed),
            Validity::Invalid => self.invalid.fetch_add(1, Ordering::Relaxed),
            Validity::Unknown => self.unverified.fetch_add(1, Ordering::Relaxed),
        };
    }

    #[inline]
    pub(crate) fn record_dropped(&self) {
        self.dropped_candidates.fetch_add(1, Ordering::Relaxed);
    }

    #[inline]
    pub(crate) fn record_buffer_reset(&self) {
        self.buffer_resets.fetch_add(1, Ordering::Relaxed);
    }

    #[inline]
    pub(crate) fn record_fault(&self) {
        self.faults.fetch_add(1, Ordering::Relaxed);
    }

    #[inline]
    pub(crate) fn observe_buffer_len(&self, len: usize) {
        update_max(&self.buffer_high_water, len as u64);
    }

    /// Copy the current counter values.
    #[must_use]
    pub fn snapshot(&self) -> MetricsSnapshot {
        MetricsSnapshot {
            chunks: self.chunks.load(Ordering::Relaxed),
            bytes: self.bytes.load(Ordering::Relaxed),
            delimited_records: self.delimited_records.load(Ordering::Relaxed),
            preview_records: self.preview_records.load(Ordering::Relaxed),
            valid: self.valid.load(Ordering::Relaxed),
            invalid: self.invalid.load(Ordering::Relaxed),
            unverified: self.unverified.load(Ordering::Relaxed),
            dropped_candidates: self.dropped_candidates.load(Ordering::Relaxed),
            buffer_resets: self.buffer_resets.load(Ordering::Relaxed),
            faults: self.faults.load(Ordering::Relaxed),
            buffer_high_water: self.buffer_high_water.load(Ordering::Relaxed),
        }
    }
}

fn update_max(target: &AtomicU64, candidate: u64) {
    let mut current = target.load(Ordering::Relaxed);
    while candidate > current {
        match target.compare_exchange_weak(
            current,
            candidate,
            Ordering::Relaxed,
            Ordering::Relaxed,
        ) {
            Ok(_) => return,
            Err(old) => current = old,
        }
    }
}

/// Point-in-time copy of [`ScanMetrics`].
#[allow(missing_docs)]
#[derive(Default, Debug, Clone, Copy, PartialEq, Eq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct MetricsSnapshot {
    pub chunks: u64,
    pub bytes: u64,
    pub delimited_records: u64,
    pub preview_records: u64,
    pub valid: u64,
    pub invalid: u64,
    pub unverified: u64,
    pub dropped_candidates: u64,
    pub buffer_resets: u64,
    pub faults: u64,
    pub buffer_high_water: u64,
}

impl MetricsSnapshot {
    /// Records emitted by either regime.
    #[must_use]
    pub const fn records(&self) -> u64 {
        self.delimited_records + self.preview_records
    }

    /// Share of verified records whose checksum failed, if any were verified.
    #[must_use]
    pub fn invalid_ratio(&self) -> Option<f64> {
        let verified = self.valid + self.invalid;
        if verified == 0 {
            return None;
        }
        #[allow(clippy::cast_precision_loss)]
        Some(self.invalid as f64 / verified as f64)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_counters_and_snapshot() {
        let metrics = ScanMetrics::new();
        metrics.record_chunk(4);
        metrics.record_chunk(6);
        metrics.record_emitted(RecordOrigin::Delimited, Validity::Valid);
        metrics.record_emitted(RecordOrigin::Preview, Validity::Unknown);
        metrics.record_emitted(RecordOrigin::Delimited, Validity::Invalid);
        metrics.record_dropped();

        let snap = metrics.snapshot();
        assert_eq!(snap.chunks, 2);
        assert_eq!(snap.bytes, 10);
        assert_eq!(snap.records(), 3);
        assert_eq!(snap.delimited_records, 2);
        assert_eq!(snap.preview_records, 1);
        assert_eq!(snap.dropped_candidates, 1);
        assert_eq!(snap.invalid_ratio(), Some(0.5));
    }

    #[test]
    fn test_high_water_only_grows() {
        let metrics = ScanMetrics::new();
        metrics.observe_buffer_len(12);
        metrics.observe_buffer_len(3);
        assert_eq!(metrics.snapshot().buffer_high_water, 12);
    }

    #[test]
    fn test_invalid_ratio_none_without_verified_records() {
        assert_eq!(MetricsSnapshot::default().invalid_ratio(), None);
    }
}
