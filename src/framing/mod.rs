//! Stream framing for reader output
//!
//! Turns an unbounded sequence of chunks into [`ScanRecord`](crate::ScanRecord)s
//! and keeps counters about what it saw.

mod assembler;
mod metrics;
mod scanner;

pub use assembler::{
    AssemblerConfig, DEFAULT_MAX_BUFFER_LEN, FrameAssembler, FrameEvent, FramingState,
};
pub use metrics::{MetricsSnapshot, ScanMetrics};
