//! Host-facing event surface.

use tracing::trace;

use super::error::TransportError;
use crate::protocol::{RecordOrigin, ScanRecord};

/// Placeholder shown before the first scan.
pub const EMPTY_FIELD: &str = "-";

/// Receiver of session events.
///
/// Records are handed over by value; the session keeps no reference.
pub trait ScanSink {
    /// A record was assembled.
    fn on_record(&mut self, record: ScanRecord, origin: RecordOrigin);

    /// The transport failed; the session stops after this call.
    fn on_fault(&mut self, error: &TransportError);

    /// The assembler dropped `discarded` bytes after overflowing.
    fn on_buffer_reset(&mut self, discarded: usize) {
        let _ = discarded;
    }
}

impl<S: ScanSink + ?Sized> ScanSink for &mut S {
    fn on_record(&mut self, record: ScanRecord, origin: RecordOrigin) {
        (**self).on_record(record, origin);
    }

    fn on_fault(&mut self, error: &TransportError) {
        (**self).on_fault(error);
    }

    fn on_buffer_reset(&mut self, discarded: usize) {
        (**self).on_buffer_reset(discarded);
    }
}

/// Keeps only the most recent scan, the way a display panel does.
#[derive(Debug, Default, Clone)]
pub struct LatestScan {
    record: Option<ScanRecord>,
    origin: Option<RecordOrigin>,
    error: Option<String>,
    records_seen: u64,
}

impl LatestScan {
    /// Empty panel.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Most recent record, if any
    #[must_use]
    pub fn record(&self) -> Option<&ScanRecord> {
        self.record.as_ref()
    }

    /// Origin of the most recent record
    #[must_use]
    pub fn origin(&self) -> Option<RecordOrigin> {
        self.origin
    }

    /// UID text, or `"-"` before the first scan
    #[must_use]
    pub fn uid(&self) -> &str {
        self.record.as_ref().map_or(EMPTY_FIELD, ScanRecord::uid)
    }

    /// LRC text, or `"-"` before the first scan
    #[must_use]
    pub fn lrc(&self) -> String {
        self.record
            .as_ref()
            .map_or_else(|| EMPTY_FIELD.to_owned(), |record| record.lrc().to_hex())
    }

    /// Final code text, or `"-"` before the first scan
    #[must_use]
    pub fn final_code(&self) -> &str {
        self.record.as_ref().map_or(EMPTY_FIELD, ScanRecord::final_code)
    }

    /// Status line, empty before the first scan
    #[must_use]
    pub fn status(&self) -> &'static str {
        self.record.as_ref().map_or("", ScanRecord::status_label)
    }

    /// Last transport fault message
    #[must_use]
    pub fn error(&self) -> Option<&str> {
        self.error.as_deref()
    }

    /// Number of records received, repeats included
    #[must_use]
    pub const fn records_seen(&self) -> u64 {
        self.records_seen
    }

    /// Back to the empty panel.
    pub fn clear(&mut self) {
        *self = Self::default();
    }
}

impl ScanSink for LatestScan {
    fn on_record(&mut self, record: ScanRecord, origin: RecordOrigin) {
        self.records_seen += 1;
        self.origin = Some(origin);
        self.record = Some(record);
    }

    fn on_fault(&mut self, error: &TransportError) {
        self.error = Some(error.to_string());
    }
}

/// Forwards a record only when it differs from the last one forwarded.
///
/// Preview records are delivered at least once; wrap a sink in this to see
/// each distinct value once per change.
#[derive(Debug)]
pub struct DedupSink<S> {
    inner: S,
    last: Option<ScanRecord>,
    suppressed: u64,
}

impl<S: ScanSink> DedupSink<S> {
    /// Wrap a sink.
    #[must_use]
    pub fn new(inner: S) -> Self {
        Self {
            inner,
            last: None,
            suppressed: 0,
        }
    }

    /// Wrapped sink
    #[must_use]
    pub fn inner(&self) -> &S {
        &self.inner
    }

    /// Records dropped as repeats
    #[must_use]
    pub const fn suppressed(&self) -> u64 {
        self.suppressed
    }

    /// Unwrap the sink.
    #[must_use]
    pub fn into_inner(self) -> S {
        self.inner
    }
}

impl<S: ScanSink> ScanSink for DedupSink<S> {
    fn on_record(&mut self, record: ScanRecord, origin: RecordOrigin) {
        if self.last.as_ref() == Some(&record) {
            self.suppressed += 1;
            trace!(final_code = record.final_code(), %origin, "suppressing repeated record");
            return;
        }
        self.last = Some(record.clone());
        self.inner.on_record(record, origin);
    }

    fn on_fault(&mut self, error: &TransportError) {
        self.inner.on_fault(error);
    }

    fn on_buffer_reset(&mut self, discarded: usize) {
        self.last = None;
        self.inner.on_buffer_reset(discarded);
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::protocol::build_record;

    #[test]
    fn test_latest_scan_placeholders() {
        let panel = LatestScan::new();
        assert_eq!(panel.uid(), "-");
        assert_eq!(panel.lrc(), "-");
        assert_eq!(panel.final_code(), "-");
        assert_eq!(panel.status(), "");
        assert_eq!(panel.error(), None);
    }

    #[test]
    fn test_latest_scan_keeps_last() {
        let mut panel = LatestScan::new();
        panel.on_record(build_record("0102030405").unwrap(), RecordOrigin::Preview);
        panel.on_record(build_record("01020304057F").unwrap(), RecordOrigin::Delimited);

        assert_eq!(panel.uid(), "0102030405");
        assert_eq!(panel.lrc(), "7F");
        assert_eq!(panel.final_code(), "01020304057F");
        assert_eq!(panel.status(), "Invalid LRC");
        assert_eq!(panel.origin(), Some(RecordOrigin::Delimited));
        assert_eq!(panel.records_seen(), 2);

        panel.on_fault(&TransportError::fault("device lost"));
        assert_eq!(panel.error(), Some("transport fault: device lost"));

        panel.clear();
        assert_eq!(panel.uid(), "-");
    }

    #[test]
    fn test_dedup_suppresses_repeats_only() {
        let mut sink = DedupSink::new(LatestScan::new());
        let a = build_record("0102030405").unwrap();
        let b = build_record("010203040505").unwrap();

        sink.on_record(a.clone(), RecordOrigin::Preview);
        sink.on_record(a.clone(), RecordOrigin::Preview);
        sink.on_record(b, RecordOrigin::Preview);
        sink.on_record(a, RecordOrigin::Delimited);

        assert_eq!(sink.suppressed(), 1);
        assert_eq!(sink.inner().records_seen(), 3);
    }

    #[test]
    fn test_dedup_forgets_after_reset() {
        let mut sink = DedupSink::new(LatestScan::new());
        let a = build_record("0102030405").unwrap();
        sink.on_record(a.clone(), RecordOrigin::Preview);
        sink.on_buffer_reset(5000);
        sink.on_record(a, RecordOrigin::Preview);
        assert_eq!(sink.suppressed(), 0);
        assert_eq!(sink.into_inner().records_seen(), 2);
    }
}
