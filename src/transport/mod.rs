//! Reader transport boundary: chunk sources, the read loop, and host sinks.

mod error;
mod session;
mod settings;
mod sink;
mod source;

pub use error::TransportError;
pub use session::{DisconnectHandle, ScanSession, SessionConfig, SessionEnd, SessionReport};
pub use settings::{DEFAULT_BAUD_RATE, FlowControl, LinkSettings, Parity};
pub use sink::{DedupSink, EMPTY_FIELD, LatestScan, ScanSink};
pub use source::{
    ChannelSource, ChunkSource, DEFAULT_READ_SIZE, IoSource, ReadOutcome, chunk_channel,
};
