//! Protocol dispatch for stream specifications.
//!
//! Streams are opened by specification text such as
//! `ffi.memory://0x7ffd5c1c;16`. The protocol part selects a
//! [`StreamWrapper`] from a process-wide registry, which produces the
//! [`Stream`] behind the returned [`Handle`].

use std::sync::{Arc, OnceLock};

use hashbrown::HashMap;
use parking_lot::RwLock;

use crate::codec::{protocol_of, BufferSpec, PointerAddress, SpecError};
use crate::stream::OpenError;

mod handle;
mod memory;

pub use self::handle::{Handle, Stream};
pub use self::memory::MemoryStreamWrapper;

/// Opens streams for one protocol.
pub trait StreamWrapper: Send + Sync {
    /// Open `specification` with the given mode literal.
    ///
    /// # Safety
    ///
    /// Implementations may hand out access to whatever the specification
    /// names; the caller upholds the wrapper's validity contract.
    unsafe fn open(&self, specification: &str, mode: &str) -> Result<Box<dyn Stream>, OpenError>;
}

type Registry = RwLock<HashMap<String, Arc<dyn StreamWrapper>>>;

fn registry() -> &'static Registry {
    static REGISTRY: OnceLock<Registry> = OnceLock::new();
    REGISTRY.get_or_init(|| RwLock::new(HashMap::new()))
}

/// Register `wrapper` for `protocol`.
///
/// Returns `false`, leaving the existing registration in place, if the
/// protocol is already taken.
pub fn register_wrapper(protocol: &str, wrapper: Arc<dyn StreamWrapper>) -> bool {
    let mut wrappers = registry().write();
    if wrappers.contains_key(protocol) {
        return false;
    }

    log::debug!("registered stream wrapper for {}", protocol);
    wrappers.insert(protocol.to_string(), wrapper);
    true
}

/// Names of all registered protocols.
pub fn wrappers() -> Vec<String> {
    registry().read().keys().cloned().collect()
}

/// Open a stream through whichever wrapper is registered for its protocol.
///
/// # Safety
///
/// See the contract of the wrapper serving the protocol; for
/// `ffi.memory` that is [`crate::stream::MemoryStream::open`].
pub unsafe fn open(specification: &str, mode: &str) -> Result<Handle, OpenError> {
    let protocol = protocol_of(specification)
        .ok_or_else(|| SpecError::Malformed(specification.to_string()))?;

    let wrapper = registry()
        .read()
        .get(protocol)
        .cloned()
        .ok_or_else(|| OpenError::UnknownProtocol(protocol.to_string()))?;

    let stream = wrapper.open(specification, mode)?;
    Ok(Handle::new(protocol, stream))
}

/// Open `size` bytes at `ptr` as a stream.
///
/// Registers the memory wrapper on first use, encodes the pointer into a
/// buffer specification and opens it through the registry.
///
/// # Safety
///
/// `ptr` must be valid for reads (modes `r`, `rw`) and writes (modes `w`,
/// `rw`) of `size` bytes until the handle is closed or dropped, and must
/// not be accessed through any other reference while a stream operation
/// is running.
pub unsafe fn memory_open<T>(ptr: *mut T, mode: &str, size: u64) -> Result<Handle, OpenError> {
    MemoryStreamWrapper::register();

    let spec = BufferSpec::new(PointerAddress::from_ptr(ptr), size);
    open(&spec.to_string(), mode)
}
