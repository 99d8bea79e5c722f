//! Transport-level error types for chunk sources.

use core::fmt;
use std::io;

/// Failure reported by a [`ChunkSource`](super::ChunkSource).
///
/// Any of these ends the scan session; the session never retries.
#[derive(Debug)]
pub enum TransportError {
    /// Underlying I/O failure on the port or pipe.
    Io(io::Error),
    /// Fault reported by the host's transport without an I/O error.
    Fault(String),
}

impl TransportError {
    /// Build a fault from any message.
    #[must_use]
    pub fn fault(message: impl Into<String>) -> Self {
        Self::Fault(message.into())
    }
}

impl fmt::Display for TransportError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Io(err) => write!(f, "transport I/O error: {err}"),
            Self::Fault(message) => write!(f, "transport fault: {message}"),
        }
    }
}

impl std::error::Error for TransportError {
    fn source(&self) -> Option<&(dyn std::error::Error + 'static)> {
        match self {
            Self::Io(err) => Some(err),
            Self::Fault(_) => None,
        }
    }
}

impl From<io::Error> for TransportError {
    fn from(err: io::Error) -> Self {
        Self::Io(err)
    }
}
