//! Scan session: the read loop between a chunk source and a host sink.

use std::sync::Arc;
use std::sync::atomic::{AtomicBool, Ordering};
use std::thread::{self, JoinHandle};

use tracing::{debug, instrument, trace, warn};
use uuid::Uuid;

use super::error::TransportError;
use super::settings::LinkSettings;
use super::sink::ScanSink;
use super::source::{ChunkSource, ReadOutcome};
use crate::framing::{AssemblerConfig, FrameAssembler, FrameEvent, MetricsSnapshot, ScanMetrics};

/// Session configuration options.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
#[cfg_attr(feature = "serde", serde(default))]
pub struct SessionConfig {
    /// Framing behaviour.
    pub assembler: AssemblerConfig,
    /// Line settings the host opened the port with; logged with the session.
    pub link: LinkSettings,
}

/// Cooperative disconnect signal, cloneable across threads.
#[derive(Debug, Clone, Default)]
pub struct DisconnectHandle {
    flag: Arc<AtomicBool>,
}

impl DisconnectHandle {
    /// Fresh, not-yet-triggered handle.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Ask the session to stop. Takes effect before the next read, or when
    /// the in-flight read returns.
    pub fn disconnect(&self) {
        self.flag.store(true, Ordering::Release);
    }

    /// Whether a disconnect was requested.
    #[must_use]
    pub fn is_disconnected(&self) -> bool {
        self.flag.load(Ordering::Acquire)
    }
}

/// Why a session stopped.
#[derive(Debug)]
pub enum SessionEnd {
    /// The source reported end of stream.
    EndOfStream,
    /// A disconnect was requested.
    Disconnected,
    /// The source failed; the sink has already seen this error.
    Fault(TransportError),
}

impl SessionEnd {
    /// Whether the session ended because of a transport failure.
    #[must_use]
    pub const fn is_fault(&self) -> bool {
        matches!(self, Self::Fault(_))
    }
}

/// Summary returned when a session stops.
#[derive(Debug)]
pub struct SessionReport {
    /// Session identifier used in logs
    pub id: Uuid,
    /// Why it stopped
    pub end: SessionEnd,
    /// Counters at the time it stopped
    pub metrics: MetricsSnapshot,
    /// Partial trailing bytes dropped at the end
    pub discarded_tail: usize,
}

/// Single-threaded read loop feeding one [`FrameAssembler`].
///
/// Each chunk is processed to completion before the next read. Partial data
/// left in the buffer when the session stops is dropped, never emitted.
#[derive(Debug)]
pub struct ScanSession<S> {
    id: Uuid,
    source: S,
    assembler: FrameAssembler,
    disconnect: DisconnectHandle,
    link: LinkSettings,
}

impl<S: ChunkSource> ScanSession<S> {
    /// Create a session over `source`.
    #[must_use]
    pub fn new(source: S, config: SessionConfig) -> Self {
        Self {
            id: Uuid::new_v4(),
            source,
            assembler: FrameAssembler::new(config.assembler),
            disconnect: DisconnectHandle::new(),
            link: config.link,
        }
    }

    /// Use an externally created disconnect handle.
    #[must_use]
    pub fn with_disconnect(mut self, disconnect: DisconnectHandle) -> Self {
        self.disconnect = disconnect;
        self
    }

    /// Session identifier used in logs.
    #[must_use]
    pub const fn id(&self) -> Uuid {
        self.id
    }

    /// Handle that stops this session.
    #[must_use]
    pub fn disconnect_handle(&self) -> DisconnectHandle {
        self.disconnect.clone()
    }

    /// Live counters, readable while the session runs.
    #[must_use]
    pub fn metrics(&self) -> Arc<ScanMetrics> {
        Arc::clone(self.assembler.metrics())
    }

    /// Run until end of stream, disconnect, or a transport fault.
    ///
    /// A fault is passed to [`ScanSink::on_fault`] exactly once and returned
    /// in the report. There is no retry.
    #[instrument(level = "debug", skip_all, fields(session = %self.id, link = %self.link))]
    pub fn run<K: ScanSink + ?Sized>(mut self, sink: &mut K) -> SessionReport {
        debug!("scan session started");

        let end = loop {
            if self.disconnect.is_disconnected() {
                break SessionEnd::Disconnected;
            }

            match self.source.read() {
                Ok(ReadOutcome::Chunk(chunk)) => {
                    if self.disconnect.is_disconnected() {
                        trace!(len = chunk.len(), "dropping chunk read after disconnect");
                        break SessionEnd::Disconnected;
                    }
                    for event in self.assembler.push(&chunk) {
                        match event {
                            FrameEvent::Record { record, origin } => {
                                sink.on_record(record, origin);
                            }
                            FrameEvent::BufferReset { discarded } => {
                                sink.on_buffer_reset(discarded);
                            }
                        }
                    }
                }
                Ok(ReadOutcome::Idle) => {}
                Ok(ReadOutcome::EndOfStream) => break SessionEnd::EndOfStream,
                Err(err) => {
                    warn!(error = %err, "transport fault; ending session");
                    self.assembler.metrics().record_fault();
                    sink.on_fault(&err);
                    break SessionEnd::Fault(err);
                }
            }
        };

        let discarded_tail = self.assembler.finish();
        debug!(?end, discarded_tail, "scan session ended");

        SessionReport {
            id: self.id,
            end,
            metrics: self.assembler.metrics().snapshot(),
            discarded_tail,
        }
    }
}

impl<S: ChunkSource + Send + 'static> ScanSession<S> {
    /// Run on a dedicated reader thread, handing the sink back at the end.
    pub fn spawn<K: ScanSink + Send + 'static>(
        self,
        mut sink: K,
    ) -> JoinHandle<(SessionReport, K)> {
        thread::spawn(move || {
            let report = self.run(&mut sink);
            (report, sink)
        })
    }
}
