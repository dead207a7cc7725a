//! Textual encoding of memory regions.
//!
//! A region travels as `ffi.memory://0x<hex-address>;<size>`. The address
//! is written most significant byte first regardless of the native byte
//! order; this module is the only place that converts between the two.

pub mod address;
pub mod buffer;
pub mod error;

pub use self::address::{decode_address, encode_address, encode_native_bytes, PointerAddress};
pub use self::buffer::{protocol_of, BufferSpec};
pub use self::error::SpecError;
