//! Native pointer values and their hexadecimal form.
use std::fmt;

use serde::{Deserialize, Serialize};

use super::error::SpecError;
use crate::constants::{MAX_ADDRESS_DIGITS, POINTER_WIDTH};

/// A native pointer value.
///
/// The address identifies a region of memory but says nothing about its
/// validity or lifetime; those remain the caller's responsibility.
#[derive(Copy, Clone, Debug, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(transparent)]
pub struct PointerAddress(usize);

impl PointerAddress {
    /// Null address.
    pub const NULL: PointerAddress = PointerAddress(0);

    /// Wrap a raw address value.
    #[inline(always)]
    pub const fn new(value: usize) -> PointerAddress {
        PointerAddress(value)
    }

    /// Take the address of a pointer.
    #[inline(always)]
    pub fn from_ptr<T>(ptr: *const T) -> PointerAddress {
        PointerAddress(ptr as usize)
    }

    /// Raw address value.
    #[inline(always)]
    pub const fn get(self) -> usize {
        self.0
    }

    /// The address as a byte pointer.
    #[inline(always)]
    pub fn as_ptr(self) -> *const u8 {
        self.0 as *const u8
    }

    /// The address as a mutable byte pointer.
    #[inline(always)]
    pub fn as_mut_ptr(self) -> *mut u8 {
        self.0 as *mut u8
    }

    /// Address `offset` bytes further, or `None` if that leaves the pointer range.
    pub fn checked_add(self, offset: u64) -> Option<PointerAddress> {
        usize::try_from(offset)
            .ok()
            .and_then(|offset| self.0.checked_add(offset))
            .map(PointerAddress)
    }

    /// Raw bytes of the address in native memory layout.
    pub fn to_ne_bytes(self) -> [u8; POINTER_WIDTH] {
        self.0.to_ne_bytes()
    }

    /// Assemble an address from raw bytes in native memory layout.
    pub fn from_ne_bytes(bytes: [u8; POINTER_WIDTH]) -> PointerAddress {
        PointerAddress(usize::from_ne_bytes(bytes))
    }
}

impl fmt::LowerHex for PointerAddress {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        fmt::LowerHex::fmt(&self.0, f)
    }
}

impl fmt::Display for PointerAddress {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "0x{}", encode_address(*self))
    }
}

/// Render native pointer bytes as big-endian hex, two lowercase digits per byte.
pub fn encode_native_bytes(bytes: [u8; POINTER_WIDTH]) -> String {
    let mut be = bytes;
    if cfg!(target_endian = "little") {
        be.reverse();
    }
    hex::encode(be)
}

/// Hex digits of an address, without prefix, always full pointer width.
pub fn encode_address(address: PointerAddress) -> String {
    encode_native_bytes(address.to_ne_bytes())
}

/// Parse the address field of a buffer specification.
///
/// An optional `0x`/`0X` prefix is stripped and digits are case-insensitive.
/// Short fields are left-padded with zeros. A field with more digits than
/// fit in a native pointer is rejected, never truncated.
pub fn decode_address(field: &str) -> Result<PointerAddress, SpecError> {
    let digits = field
        .strip_prefix("0x")
        .or_else(|| field.strip_prefix("0X"))
        .unwrap_or(field);

    if digits.is_empty() || !digits.bytes().all(|b| b.is_ascii_hexdigit()) {
        return Err(SpecError::Malformed(field.to_string()));
    }

    if digits.len() > MAX_ADDRESS_DIGITS {
        return Err(SpecError::AddressOverflow {
            digits: digits.len(),
            max: MAX_ADDRESS_DIGITS,
        });
    }

    let padded = format!("{:0>width$}", digits, width = MAX_ADDRESS_DIGITS);
    let mut bytes = [0u8; POINTER_WIDTH];
    hex::decode_to_slice(&padded, &mut bytes)
        .map_err(|_| SpecError::Malformed(field.to_string()))?;

    // Text is most significant byte first.
    if cfg!(target_endian = "little") {
        bytes.reverse();
    }

    Ok(PointerAddress::from_ne_bytes(bytes))
}
