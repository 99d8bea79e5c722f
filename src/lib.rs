//! Stream framing and XOR LRC validation for serial badge/tag readers.
//!
//! Readers push identifiers over a serial line as ASCII hex, sometimes
//! terminated by CR/LF and sometimes not, sometimes with a checksum byte and
//! sometimes without. This crate turns that chunked byte stream into
//! [`ScanRecord`]s whose checksum has been computed or verified.
//!
//! # Quick Start
//!
//! ```rust
//! use tagscan::framing::{FrameAssembler, FrameEvent};
//! use tagscan::{RecordOrigin, Validity};
//!
//! let mut assembler = FrameAssembler::default();
//! let mut events = assembler.push(b"0102 0304");
//! events.extend(assembler.push(b" 0501\r\n"));
//!
//! let delimited: Vec<_> = events
//!     .iter()
//!     .filter_map(|event| match event {
//!         FrameEvent::Record { record, origin: RecordOrigin::Delimited } => Some(record),
//!         _ => None,
//!     })
//!     .collect();
//! assert_eq!(delimited[0].final_code(), "010203040501");
//! assert_eq!(delimited[0].validity(), Validity::Valid);
//! ```
//!
//! # Layout
//!
//! - [`protocol`] - hex normalization, the LRC and the record builder (pure)
//! - [`framing`] - the frame assembler and its counters
//! - [`transport`] - chunk sources, the session read loop and host sinks

#![warn(missing_docs)]
#![warn(clippy::all)]
#![warn(clippy::pedantic)]
#![allow(clippy::missing_errors_doc)]
#![allow(clippy::missing_panics_doc)]

pub mod framing;
pub mod protocol;
pub mod transport;

pub use framing::{AssemblerConfig, FrameAssembler, FrameEvent, MetricsSnapshot, ScanMetrics};
pub use protocol::{
    Error, Lrc, RecordOrigin, Result, ScanRecord, Validity, build_record, compute_lrc, normalize,
};
pub use transport::{
    ChunkSource, DisconnectHandle, ScanSession, ScanSink, SessionConfig, TransportError,
};

/// Crate version
pub const VERSION: &str = env!("CARGO_PKG_VERSION");
