//! Frame assembler: turns arbitrary reader chunks into scan records.
//!
//! Two boundary regimes are applied to every chunk:
//!
//! - **Delimited**: once a CR or LF arrives, every CR/LF terminated segment in
//!   the buffer is normalized and built into a record, and only the trailing
//!   partial segment is kept.
//! - **Preview**: while no delimiter has arrived, the right-most run of at
//!   least eight hex digits is located. A run of exactly 10 or 12 digits is
//!   reported as a [`RecordOrigin::Preview`] record without consuming the
//!   buffer, so the same record may be reported on several chunks.
//!
//! # Example
//!
//! ```
//! use tagscan::framing::{FrameAssembler, FrameEvent};
//! use tagscan::Validity;
//!
//! let mut assembler = FrameAssembler::default();
//! assert!(assembler.push(b"0102030405").len() == 1); // preview
//!
//! let events = assembler.push(b"01\r\n");
//! match &events[..] {
//!     [FrameEvent::Record { record, .. }] => {
//!         assert_eq!(record.final_code(), "010203040501");
//!         assert_eq!(record.validity(), Validity::Valid);
//!     }
//!     other => panic!("unexpected events: {other:?}"),
//! }
//! ```

use std::ops::Range;
use std::sync::Arc;

use bytes::BytesMut;
use tracing::{debug, instrument, trace, warn};

use super::metrics::ScanMetrics;
use super::scanner::RunScanner;
use crate::protocol::{
    RecordOrigin, ScanRecord, UID_DIGITS, UID_WITH_LRC_DIGITS, classify, normalize_bytes,
};

/// Default cap on undelimited buffered bytes.
pub const DEFAULT_MAX_BUFFER_LEN: usize = 4096;

/// Assembler configuration options.
#[derive(Debug, Clone, PartialEq, Eq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
#[cfg_attr(feature = "serde", serde(default))]
pub struct AssemblerConfig {
    /// Largest buffer kept while waiting for a delimiter; exceeding it resets
    /// the buffer.
    pub max_buffer_len: usize,
    /// Report preview records from undelimited data.
    pub live_preview: bool,
    /// Initial buffer allocation in bytes.
    pub initial_capacity: usize,
}

impl Default for AssemblerConfig {
    fn default() -> Self {
        Self {
            max_buffer_len: DEFAULT_MAX_BUFFER_LEN,
            live_preview: true,
            initial_capacity: 256,
        }
    }
}

/// Boundary detection state between chunks.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum FramingState {
    /// Buffer holds no hex run long enough to consider.
    AwaitingDelimiter,
    /// Buffer holds a hex run of at least eight digits; `run` is the
    /// right-most one, as byte offsets into the buffer.
    ScanningHeuristic {
        /// Byte range of the run
        run: Range<usize>,
    },
}

/// Output of [`FrameAssembler::push`].
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum FrameEvent {
    /// A record was built from a candidate.
    Record {
        /// The record; ownership passes to the caller
        record: ScanRecord,
        /// Which regime produced it
        origin: RecordOrigin,
    },
    /// The buffer overflowed without a delimiter and was cleared.
    BufferReset {
        /// Bytes thrown away, including the chunk that overflowed
        discarded: usize,
    },
}

/// Accumulates reader chunks and extracts records.
#[derive(Debug)]
pub struct FrameAssembler {
    buffer: BytesMut,
    state: FramingState,
    scanner: RunScanner,
    config: AssemblerConfig,
    metrics: Arc<ScanMetrics>,
}

#[inline]
const fn is_delimiter(byte: u8) -> bool {
    matches!(byte, b'\r' | b'\n')
}

impl FrameAssembler {
    /// Create an assembler with its own metrics.
    #[must_use]
    pub fn new(config: AssemblerConfig) -> Self {
        Self::with_metrics(config, Arc::new(ScanMetrics::new()))
    }

    /// Create an assembler that reports into shared metrics.
    #[must_use]
    pub fn with_metrics(config: AssemblerConfig, metrics: Arc<ScanMetrics>) -> Self {
        Self {
            buffer: BytesMut::with_capacity(config.initial_capacity),
            state: FramingState::AwaitingDelimiter,
            scanner: RunScanner::default(),
            config,
            metrics,
        }
    }

    /// Feed one chunk and collect the records it completes.
    ///
    /// Chunks containing CR or LF are handled by the delimited regime only;
    /// the trailing partial segment is not previewed until the next chunk.
    #[instrument(level = "trace", skip(self, chunk), fields(len = chunk.len()))]
    pub fn push(&mut self, chunk: &[u8]) -> Vec<FrameEvent> {
        self.metrics.record_chunk(chunk.len());
        let mut events = Vec::new();

        if chunk.iter().any(|byte| is_delimiter(*byte)) {
            self.buffer.extend_from_slice(chunk);
            self.metrics.observe_buffer_len(self.buffer.len());
            self.extract_delimited(&mut events);
            if self.buffer.len() > self.config.max_buffer_len {
                let discarded = self.buffer.len();
                self.overflow(discarded, &mut events);
            }
        } else if self.buffer.len() + chunk.len() > self.config.max_buffer_len {
            let discarded = self.buffer.len() + chunk.len();
            self.overflow(discarded, &mut events);
        } else {
            self.buffer.extend_from_slice(chunk);
            self.metrics.observe_buffer_len(self.buffer.len());
            self.rescan();
            if self.config.live_preview {
                self.preview(&mut events);
            }
        }

        events
    }

    /// Bytes buffered since the last extracted record.
    #[must_use]
    pub fn buffered(&self) -> &[u8] {
        &self.buffer
    }

    /// Current boundary detection state.
    #[must_use]
    pub const fn state(&self) -> &FramingState {
        &self.state
    }

    /// Active configuration.
    #[must_use]
    pub const fn config(&self) -> &AssemblerConfig {
        &self.config
    }

    /// Counters this assembler reports into.
    #[must_use]
    pub fn metrics(&self) -> &Arc<ScanMetrics> {
        &self.metrics
    }

    /// Drop all buffered bytes, returning how many were dropped.
    pub fn reset(&mut self) -> usize {
        let discarded = self.buffer.len();
        self.buffer.clear();
        self.scanner.reset();
        self.transition(FramingState::AwaitingDelimiter);
        discarded
    }

    /// End of stream: trailing bytes are discarded, never turned into a
    /// record. Returns how many bytes were dropped.
    pub fn finish(&mut self) -> usize {
        let discarded = self.reset();
        if discarded > 0 {
            debug!(discarded, "stream finished with partial data; dropping");
        }
        discarded
    }

    fn extract_delimited(&mut self, events: &mut Vec<FrameEvent>) {
        let Some(last) = self.buffer.iter().rposition(|byte| is_delimiter(*byte)) else {
            return;
        };
        let complete = self.buffer.split_to(last + 1);

        for segment in complete[..].split(|byte| is_delimiter(*byte)) {
            if !segment.is_empty() {
                self.emit(&normalize_bytes(segment), RecordOrigin::Delimited, events);
            }
        }

        // the kept tail may already hold a run; track it but do not preview
        self.scanner.reset();
        self.rescan();
    }

    fn rescan(&mut self) {
        let next = match self.scanner.advance(&self.buffer) {
            Some(run) => FramingState::ScanningHeuristic { run },
            None => FramingState::AwaitingDelimiter,
        };
        self.transition(next);
    }

    fn preview(&self, events: &mut Vec<FrameEvent>) {
        let FramingState::ScanningHeuristic { run } = &self.state else {
            return;
        };
        if !matches!(run.len(), UID_DIGITS | UID_WITH_LRC_DIGITS) {
            trace!(len = run.len(), "hex run length not previewable");
            return;
        }
        let candidate = normalize_bytes(&self.buffer[run.clone()]);
        self.emit(&candidate, RecordOrigin::Preview, events);
    }

    fn overflow(&mut self, discarded: usize, events: &mut Vec<FrameEvent>) {
        warn!(
            discarded,
            max = self.config.max_buffer_len,
            "no delimiter within buffer limit; resetting"
        );
        self.reset();
        self.metrics.record_buffer_reset();
        events.push(FrameEvent::BufferReset { discarded });
    }

    fn emit(&self, candidate: &str, origin: RecordOrigin, events: &mut Vec<FrameEvent>) {
        if candidate.is_empty() {
            return;
        }
        match classify(candidate) {
            Ok(record) => {
                debug!(
                    final_code = record.final_code(),
                    validity = %record.validity(),
                    %origin,
                    "record assembled"
                );
                self.metrics.record_emitted(origin, record.validity());
                events.push(FrameEvent::Record { record, origin });
            }
            Err(err) => {
                trace!(error = %err, len = candidate.len(), %origin, "candidate dropped");
                self.metrics.record_dropped();
            }
        }
    }

    fn transition(&mut self, next: FramingState) {
        if self.state != next {
            trace!(from = ?self.state, to = ?next, "framing state transition");
            self.state = next;
        }
    }
}

impl Default for FrameAssembler {
    fn default() -> Self {
        Self::new(AssemblerConfig::default())
    }
}
