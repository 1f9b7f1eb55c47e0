//! Error types for binary cursors

use std::io;
use thiserror::Error;

/// Result type alias for cursor operations
pub type Result<T> = std::result::Result<T, Error>;

/// Main error type for cursor operations
#[derive(Error, Debug)]
pub enum Error {
    /// I/O error reported by the underlying file or blob
    #[error("I/O error: {0}")]
    Io(#[from] io::Error),

    /// Seek or read target lies outside `[0, size]` under strict range checking
    #[error("Position out of range: {position} (valid range is 0..={size})")]
    InvalidPosition {
        /// The rejected target position
        position: i128,
        /// Size of the source
        size: u64,
    },

    /// A primitive was decoded from a window too short to hold it
    #[error("Offset {offset} out of bounds: need {required} bytes, window has {available}")]
    Bounds {
        /// Offset the decode started at
        offset: usize,
        /// Width of the primitive in bytes
        required: usize,
        /// Length of the window
        available: usize,
    },

    /// The cursor was closed before the operation started
    #[error("Cursor is closed")]
    Closed,

    /// An option value could not be understood
    #[error("Invalid configuration: {0}")]
    InvalidConfiguration(String),
}

impl Error {
    /// Create a new InvalidConfiguration error
    pub fn invalid_configuration<S: Into<String>>(msg: S) -> Self {
        Error::InvalidConfiguration(msg.into())
    }

    /// I/O error for a source that delivered fewer bytes than it reported
    pub(crate) fn short_read(copied: usize, required: usize, pos: u64) -> Self {
        Error::Io(io::Error::new(
            io::ErrorKind::UnexpectedEof,
            format!("source delivered {copied} of {required} bytes at {pos}"),
        ))
    }

    /// Check if this error comes from a position or window range check
    pub fn is_range_error(&self) -> bool {
        matches!(self, Error::InvalidPosition { .. } | Error::Bounds { .. })
    }

    /// Check if this error means the cursor was already closed
    pub fn is_closed(&self) -> bool {
        matches!(self, Error::Closed)
    }
}

impl From<Error> for io::Error {
    fn from(err: Error) -> Self {
        match err {
            Error::Io(e) => e,
            Error::InvalidPosition { .. } | Error::Bounds { .. } => {
                io::Error::new(io::ErrorKind::InvalidInput, err)
            }
            Error::Closed => io::Error::new(io::ErrorKind::NotConnected, err),
            Error::InvalidConfiguration(_) => io::Error::new(io::ErrorKind::InvalidInput, err),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_error_display() {
        let err = Error::InvalidPosition {
            position: -5,
            size: 10,
        };
        assert_eq!(
            err.to_string(),
            "Position out of range: -5 (valid range is 0..=10)"
        );

        let err = Error::Bounds {
            offset: 3,
            required: 4,
            available: 5,
        };
        assert_eq!(
            err.to_string(),
            "Offset 3 out of bounds: need 4 bytes, window has 5"
        );

        let err = Error::invalid_configuration("unknown byte order 'middle'");
        assert_eq!(
            err.to_string(),
            "Invalid configuration: unknown byte order 'middle'"
        );
    }

    #[test]
    fn test_error_classification() {
        let err = Error::InvalidPosition {
            position: 20,
            size: 10,
        };
        assert!(err.is_range_error());
        assert!(!err.is_closed());

        assert!(Error::Closed.is_closed());
        assert!(!Error::Closed.is_range_error());

        let io_err: Error = io::Error::new(io::ErrorKind::NotFound, "gone").into();
        assert!(matches!(io_err, Error::Io(_)));
        assert!(!io_err.is_range_error());
    }

    #[test]
    fn test_into_io_error() {
        let err: io::Error = Error::Closed.into();
        assert_eq!(err.kind(), io::ErrorKind::NotConnected);

        let inner = io::Error::new(io::ErrorKind::PermissionDenied, "denied");
        let err: io::Error = Error::Io(inner).into();
        assert_eq!(err.kind(), io::ErrorKind::PermissionDenied);
    }
}
