//! Stream-related errors.
use std::io::{Error, ErrorKind};

use crate::codec::SpecError;

/// Errors that can occur when opening a stream.
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
#[non_exhaustive]
pub enum OpenError {
    /// Buffer specification could not be parsed
    #[error(transparent)]
    Spec(SpecError),

    /// Size is negative, or the region runs past the end of the address
    /// space. Carries the size as written.
    #[error("Invalid region size '{0}'")]
    InvalidSize(String),

    /// Mode is not one of `r`, `w` or `rw`
    #[error("Unsupported mode '{0}'")]
    UnsupportedMode(String),

    /// No wrapper is registered for the protocol
    #[error("No stream wrapper registered for '{0}'")]
    UnknownProtocol(String),
}

impl From<SpecError> for OpenError {
    fn from(err: SpecError) -> OpenError {
        match err {
            SpecError::InvalidSize(size) => OpenError::InvalidSize(size),
            e => OpenError::Spec(e),
        }
    }
}

impl OpenError {
    /// Wrap into i/o error.
    pub fn into_io_error(self) -> Error {
        match self {
            OpenError::Spec(e) => e.into_io_error(),
            OpenError::UnknownProtocol(_) => Error::new(ErrorKind::NotFound, self),
            e => Error::new(ErrorKind::InvalidInput, e),
        }
    }
}

/// Errors that can occur on an open stream.
#[derive(Debug, Clone, Copy, PartialEq, Eq, thiserror::Error)]
#[non_exhaustive]
pub enum StreamError {
    /// Read attempted on a stream opened without read access
    #[error("Stream is not readable")]
    NotReadable,

    /// Write attempted on a stream opened without write access
    #[error("Stream is not writable")]
    NotWritable,

    /// Operation attempted on a closed handle
    #[error("Stream is closed")]
    Closed,
}

impl StreamError {
    /// Wrap into i/o error.
    pub fn into_io_error(self) -> Error {
        match self {
            StreamError::NotReadable | StreamError::NotWritable => {
                Error::new(ErrorKind::PermissionDenied, self)
            }
            StreamError::Closed => Error::new(ErrorKind::NotConnected, self),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn negative_size_is_open_error() {
        let err = OpenError::from(SpecError::InvalidSize("-4".to_string()));
        assert_eq!(err, OpenError::InvalidSize("-4".to_string()));
        assert_eq!(err.to_string(), "Invalid region size '-4'");
        assert_eq!(err.into_io_error().kind(), ErrorKind::InvalidInput);
    }

    #[test]
    fn other_spec_errors_pass_through() {
        let err = OpenError::from(SpecError::Malformed("x".to_string()));
        assert_eq!(err, OpenError::Spec(SpecError::Malformed("x".to_string())));
    }
}
