use std::sync::Arc;

use super::{register_wrapper, wrappers, Stream, StreamWrapper};
use crate::constants::PROTOCOL;
use crate::stream::{MemoryStream, OpenError};

/// Serves `ffi.memory://<hex-address>;<size>` specifications.
#[derive(Debug, Default, Clone, Copy)]
pub struct MemoryStreamWrapper;

impl MemoryStreamWrapper {
    /// Register under `ffi.memory` unless already registered.
    pub fn register() {
        if !wrappers().iter().any(|p| p == PROTOCOL) {
            register_wrapper(PROTOCOL, Arc::new(MemoryStreamWrapper));
        }
    }
}

impl StreamWrapper for MemoryStreamWrapper {
    unsafe fn open(&self, specification: &str, mode: &str) -> Result<Box<dyn Stream>, OpenError> {
        let stream = MemoryStream::open(specification, mode)?;
        Ok(Box::new(stream))
    }
}
