//! Chunk sources: the read side of whatever the reader is plugged into.

use std::io::{self, Read};
use std::sync::mpsc::{self, Receiver, RecvTimeoutError, Sender};
use std::time::Duration;

use bytes::Bytes;

use super::error::TransportError;

/// Default read size for [`IoSource`].
pub const DEFAULT_READ_SIZE: usize = 256;

/// Result of one read from a [`ChunkSource`].
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ReadOutcome {
    /// Bytes in arrival order, with no alignment to record boundaries.
    Chunk(Bytes),
    /// Nothing arrived before the source's timeout; the caller may poll again.
    Idle,
    /// The peer closed the stream.
    EndOfStream,
}

/// Blocking source of raw reader chunks.
///
/// Only one read is ever in flight. Implementations that can block
/// indefinitely should time out and return [`ReadOutcome::Idle`] so a
/// disconnect request is noticed promptly.
pub trait ChunkSource {
    /// Wait for the next chunk, end of stream, or a fault.
    fn read(&mut self) -> Result<ReadOutcome, TransportError>;
}

impl<S: ChunkSource + ?Sized> ChunkSource for &mut S {
    fn read(&mut self) -> Result<ReadOutcome, TransportError> {
        (**self).read()
    }
}

impl<S: ChunkSource + ?Sized> ChunkSource for Box<S> {
    fn read(&mut self) -> Result<ReadOutcome, TransportError> {
        (**self).read()
    }
}

/// Adapter for anything implementing [`std::io::Read`], such as an open
/// serial port or a pipe.
///
/// `Ok(0)` is end of stream; `WouldBlock`, `TimedOut` and `Interrupted`
/// are reported as [`ReadOutcome::Idle`].
#[derive(Debug)]
pub struct IoSource<R> {
    reader: R,
    buf: Vec<u8>,
}

impl<R: Read> IoSource<R> {
    /// Wrap a reader using [`DEFAULT_READ_SIZE`] reads.
    #[must_use]
    pub fn new(reader: R) -> Self {
        Self::with_read_size(reader, DEFAULT_READ_SIZE)
    }

    /// Wrap a reader with a custom read size; zero is treated as one byte.
    #[must_use]
    pub fn with_read_size(reader: R, read_size: usize) -> Self {
        Self {
            reader,
            buf: vec![0u8; read_size.max(1)],
        }
    }

    /// Unwrap the reader.
    #[must_use]
    pub fn into_inner(self) -> R {
        self.reader
    }
}

impl<R: Read> ChunkSource for IoSource<R> {
    fn read(&mut self) -> Result<ReadOutcome, TransportError> {
        match self.reader.read(&mut self.buf) {
            Ok(0) => Ok(ReadOutcome::EndOfStream),
            Ok(len) => Ok(ReadOutcome::Chunk(Bytes::copy_from_slice(&self.buf[..len]))),
            Err(err)
                if matches!(
                    err.kind(),
                    io::ErrorKind::WouldBlock | io::ErrorKind::TimedOut | io::ErrorKind::Interrupted
                ) =>
            {
                Ok(ReadOutcome::Idle)
            }
            Err(err) => Err(TransportError::Io(err)),
        }
    }
}

/// Source fed from another thread through a channel.
///
/// Useful when the host owns the port and pushes chunks as they arrive.
/// Dropping every sender ends the stream; sending an `Err` reports a fault.
#[derive(Debug)]
pub struct ChannelSource {
    rx: Receiver<Result<Bytes, TransportError>>,
    poll_interval: Duration,
}

impl ChannelSource {
    /// Wrap an existing receiver. `poll_interval` bounds how long one read
    /// blocks before returning [`ReadOutcome::Idle`].
    #[must_use]
    pub fn new(rx: Receiver<Result<Bytes, TransportError>>, poll_interval: Duration) -> Self {
        Self { rx, poll_interval }
    }
}

impl ChunkSource for ChannelSource {
    fn read(&mut self) -> Result<ReadOutcome, TransportError> {
        match self.rx.recv_timeout(self.poll_interval) {
            Ok(Ok(chunk)) => Ok(ReadOutcome::Chunk(chunk)),
            Ok(Err(err)) => Err(err),
            Err(RecvTimeoutError::Timeout) => Ok(ReadOutcome::Idle),
            Err(RecvTimeoutError::Disconnected) => Ok(ReadOutcome::EndOfStream),
        }
    }
}

/// Create a sender and a [`ChannelSource`] reading from it.
#[must_use]
pub fn chunk_channel(
    poll_interval: Duration,
) -> (Sender<Result<Bytes, TransportError>>, ChannelSource) {
    let (tx, rx) = mpsc::channel();
    (tx, ChannelSource::new(rx, poll_interval))
}
