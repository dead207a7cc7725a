//! The `<protocol>://<hex-address>;<size>` buffer specification.
use std::fmt;
use std::str::FromStr;

use serde::{Deserialize, Serialize};

use super::address::{decode_address, encode_address, PointerAddress};
use super::error::SpecError;
use crate::constants::{PROTOCOL, PROTOCOL_SEPARATOR, SIZE_SEPARATOR};

/// A memory region as carried by a buffer specification.
#[derive(Copy, Clone, Debug, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct BufferSpec {
    /// First byte of the region.
    pub address: PointerAddress,
    /// Length of the region in bytes.
    pub size: u64,
}

impl BufferSpec {
    /// Describe `size` bytes starting at `address`.
    pub const fn new(address: PointerAddress, size: u64) -> BufferSpec {
        BufferSpec { address, size }
    }

    /// Parse a full `ffi.memory://<hex-address>;<size>` specification.
    pub fn parse(text: &str) -> Result<BufferSpec, SpecError> {
        let malformed = || SpecError::Malformed(text.to_string());

        let rest = text
            .strip_prefix(PROTOCOL)
            .and_then(|rest| rest.strip_prefix(PROTOCOL_SEPARATOR))
            .ok_or_else(malformed)?;
        let (address, size) = rest.split_once(SIZE_SEPARATOR).ok_or_else(malformed)?;

        let address = decode_address(address).map_err(|e| match e {
            SpecError::Malformed(_) => malformed(),
            e => e,
        })?;
        let size = parse_size(size).map_err(|e| match e {
            SpecError::Malformed(_) => malformed(),
            e => e,
        })?;

        Ok(BufferSpec { address, size })
    }

    /// One past the last byte, or `None` if the region wraps the pointer range.
    pub fn end(&self) -> Option<PointerAddress> {
        self.address.checked_add(self.size)
    }
}

fn parse_size(field: &str) -> Result<u64, SpecError> {
    let is_digits = |s: &str| !s.is_empty() && s.bytes().all(|b| b.is_ascii_digit());

    if is_digits(field) {
        // Too many digits for u64 is not representable either.
        return field
            .parse::<u64>()
            .map_err(|_| SpecError::Malformed(field.to_string()));
    }

    match field.strip_prefix('-') {
        Some(magnitude) if is_digits(magnitude) => Err(SpecError::InvalidSize(field.to_string())),
        _ => Err(SpecError::Malformed(field.to_string())),
    }
}

/// Protocol part of any `<protocol>://...` text.
pub fn protocol_of(text: &str) -> Option<&str> {
    text.split_once(PROTOCOL_SEPARATOR)
        .map(|(protocol, _)| protocol)
        .filter(|protocol| !protocol.is_empty())
}

impl fmt::Display for BufferSpec {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(
            f,
            "{}{}0x{}{}{}",
            PROTOCOL,
            PROTOCOL_SEPARATOR,
            encode_address(self.address),
            SIZE_SEPARATOR,
            self.size
        )
    }
}

impl FromStr for BufferSpec {
    type Err = SpecError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        BufferSpec::parse(s)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::constants::MAX_ADDRESS_DIGITS;
    use proptest::prelude::*;

    #[test]
    fn parse_basic() {
        let spec = BufferSpec::parse("ffi.memory://0x80004dfe5;1024").unwrap();
        assert_eq!(spec.address, PointerAddress::new(0x80004dfe5));
        assert_eq!(spec.size, 1024);
    }

    #[test]
    fn parse_without_prefix() {
        let spec = BufferSpec::parse("ffi.memory://123;0").unwrap();
        assert_eq!(spec, BufferSpec::new(PointerAddress::new(0x123), 0));
    }

    #[test]
    fn parse_rejects_missing_size() {
        assert!(matches!(
            BufferSpec::parse("ffi.memory://abc"),
            Err(SpecError::Malformed(_))
        ));
        assert!(matches!(
            BufferSpec::parse("ffi.memory://abc;"),
            Err(SpecError::Malformed(_))
        ));
    }

    #[test]
    fn parse_rejects_other_protocols() {
        assert!(matches!(
            BufferSpec::parse("file://0x10;4"),
            Err(SpecError::Malformed(_))
        ));
        assert!(matches!(
            BufferSpec::parse("ffi.memory:/0x10;4"),
            Err(SpecError::Malformed(_))
        ));
    }

    #[test]
    fn malformed_reports_whole_specification() {
        assert_eq!(
            BufferSpec::parse("ffi.memory://zz;4"),
            Err(SpecError::Malformed("ffi.memory://zz;4".to_string()))
        );
    }

    #[test]
    fn parse_rejects_bad_sizes() {
        assert_eq!(
            BufferSpec::parse("ffi.memory://0x10;-4"),
            Err(SpecError::InvalidSize("-4".to_string()))
        );
        assert!(matches!(
            BufferSpec::parse("ffi.memory://0x10;+4"),
            Err(SpecError::Malformed(_))
        ));
        assert!(matches!(
            BufferSpec::parse("ffi.memory://0x10;4 "),
            Err(SpecError::Malformed(_))
        ));
        assert!(matches!(
            BufferSpec::parse("ffi.memory://0x10;99999999999999999999999"),
            Err(SpecError::Malformed(_))
        ));
    }

    #[test]
    fn parse_rejects_long_address() {
        let text = format!("ffi.memory://0x{};1", "1".repeat(MAX_ADDRESS_DIGITS + 1));
        assert!(matches!(
            BufferSpec::parse(&text),
            Err(SpecError::AddressOverflow { .. })
        ));
    }

    #[test]
    fn display_is_canonical() {
        let spec = BufferSpec::new(PointerAddress::new(0xbeef), 16);
        let text = spec.to_string();
        assert!(text.starts_with("ffi.memory://0x"));
        assert!(text.ends_with("beef;16"));
        assert_eq!(text.parse::<BufferSpec>(), Ok(spec));
    }

    #[test]
    fn end_detects_wrap() {
        let spec = BufferSpec::new(PointerAddress::new(usize::MAX), 1);
        assert_eq!(spec.end(), None);
        let spec = BufferSpec::new(PointerAddress::new(usize::MAX - 1), 1);
        assert_eq!(spec.end(), Some(PointerAddress::new(usize::MAX)));
    }

    #[test]
    fn protocol_lookup() {
        assert_eq!(protocol_of("ffi.memory://0x1;1"), Some("ffi.memory"));
        assert_eq!(protocol_of("://0x1;1"), None);
        assert_eq!(protocol_of("no protocol"), None);
    }

    #[test]
    fn serializes_to_json() {
        let spec = BufferSpec::new(PointerAddress::new(32), 8);
        let json = serde_json::to_string(&spec).unwrap();
        assert_eq!(json, r#"{"address":32,"size":8}"#);
    }

    proptest! {
        #[test]
        fn prop_specification_round_trip(address in any::<usize>(), size in any::<u64>()) {
            let spec = BufferSpec::new(PointerAddress::new(address), size);
            prop_assert_eq!(BufferSpec::parse(&spec.to_string()), Ok(spec));
        }
    }
}
