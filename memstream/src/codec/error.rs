//! Buffer specification errors.
use std::io::{Error, ErrorKind};

/// Errors that can occur when parsing a buffer specification.
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
#[non_exhaustive]
pub enum SpecError {
    /// Text does not match `<protocol>://<hex-address>;<size>`
    #[error("Incorrect buffer specification '{0}'")]
    Malformed(String),

    /// Address carries more digits than a native pointer can hold
    #[error("Address has {digits} hex digits, a native pointer holds at most {max}")]
    AddressOverflow {
        /// Number of digits found in the address field
        digits: usize,
        /// Number of digits a native pointer holds
        max: usize,
    },

    /// Size field is negative
    #[error("Invalid buffer size '{0}'")]
    InvalidSize(String),
}

impl SpecError {
    /// Wrap into i/o error.
    pub fn into_io_error(self) -> Error {
        Error::new(ErrorKind::InvalidInput, self)
    }
}
