use samplebridge_core::ServiceIdentity;
use thiserror::Error;

/// Failures of the sample reader contract
///
/// "No sample available" is never one of these; it is reported as `None`,
/// `false` or a zero count by the operation itself.
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum ReaderError {
    #[error("Reader is not connected")]
    NotConnected,

    #[error("Invalid receive buffer")]
    InvalidRecvBuffer,

    /// The pending sample does not have the size the caller asked for.
    /// `taken` counts the samples already placed in the buffer by a batch
    /// take before the mismatch was hit.
    #[error("Sample size mismatch: expected {expected} bytes, got {actual} ({taken} taken)")]
    SampleSizeMismatch {
        expected: usize,
        actual: usize,
        taken: usize,
    },

    #[error("Receive buffer too small: {buffer_size} bytes for {sample_size}-byte samples")]
    RecvBufferTooSmall {
        buffer_size: usize,
        sample_size: usize,
    },
}

/// Fieldless discriminant of [`ReaderError`]
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum ReaderErrorKind {
    NotConnected,
    InvalidRecvBuffer,
    SampleSizeMismatch,
    RecvBufferTooSmall,
}

impl ReaderErrorKind {
    /// Stable name for logs and metrics labels
    pub fn as_str(self) -> &'static str {
        match self {
            Self::NotConnected => "NOT_CONNECTED",
            Self::InvalidRecvBuffer => "INVALID_RECV_BUFFER",
            Self::SampleSizeMismatch => "SAMPLE_SIZE_MISMATCH",
            Self::RecvBufferTooSmall => "RECV_BUFFER_TOO_SMALL",
        }
    }
}

impl ReaderError {
    pub fn kind(&self) -> ReaderErrorKind {
        match self {
            Self::NotConnected => ReaderErrorKind::NotConnected,
            Self::InvalidRecvBuffer => ReaderErrorKind::InvalidRecvBuffer,
            Self::SampleSizeMismatch { .. } => ReaderErrorKind::SampleSizeMismatch,
            Self::RecvBufferTooSmall { .. } => ReaderErrorKind::RecvBufferTooSmall,
        }
    }
}

pub type ReaderResult<T> = std::result::Result<T, ReaderError>;

#[derive(Error, Debug)]
pub enum Error {
    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),

    #[error("Codec error: {0}")]
    Codec(String),

    #[error("Connection closed")]
    ConnectionClosed,

    #[error("Invalid frame: {0}")]
    InvalidFrame(String),

    #[error("Identity error: {0}")]
    Identity(#[from] samplebridge_core::Error),

    #[error("Duplicate reader identity: {0}")]
    DuplicateIdentity(ServiceIdentity),

    #[error("{0}")]
    Custom(String),
}

pub type Result<T> = std::result::Result<T, Error>;

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn kind_names_are_stable() {
        let names: Vec<_> = [
            ReaderError::NotConnected,
            ReaderError::InvalidRecvBuffer,
            ReaderError::SampleSizeMismatch {
                expected: 8,
                actual: 4,
                taken: 0,
            },
            ReaderError::RecvBufferTooSmall {
                buffer_size: 2,
                sample_size: 8,
            },
        ]
        .iter()
        .map(|e| e.kind().as_str())
        .collect();

        assert_eq!(
            names,
            [
                "NOT_CONNECTED",
                "INVALID_RECV_BUFFER",
                "SAMPLE_SIZE_MISMATCH",
                "RECV_BUFFER_TOO_SMALL"
            ]
        );
    }
}
