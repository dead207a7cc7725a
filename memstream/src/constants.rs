//! Fixed values shared by the codec and the stream wrapper.

/// Protocol literal the memory stream wrapper is registered under.
pub const PROTOCOL: &str = "ffi.memory";

/// Separator between the protocol and the rest of a specification.
pub const PROTOCOL_SEPARATOR: &str = "://";

/// Separator between the address and the size fields.
pub const SIZE_SEPARATOR: char = ';';

/// Number of bytes in a native pointer.
pub const POINTER_WIDTH: usize = std::mem::size_of::<usize>();

/// Maximum number of hex digits an address field may carry.
pub const MAX_ADDRESS_DIGITS: usize = POINTER_WIDTH * 2;

#[cfg(test)]
mod tests {
    #![allow(non_snake_case)]
    use super::*;

    #[test]
    fn test_POINTER_WIDTH() {
        assert!(POINTER_WIDTH == std::mem::size_of::<*const u8>());
    }

    #[test]
    fn test_MAX_ADDRESS_DIGITS() {
        let c = format!("{:x}", usize::MAX).len();

        assert!(MAX_ADDRESS_DIGITS == c);
    }
}
