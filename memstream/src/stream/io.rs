//! `std::io` adapters.
//!
//! `Seek` follows the stream's saturating semantics: out-of-range targets
//! are clamped instead of reported as errors.

use std::io::{Read, Result, Seek, SeekFrom, Write};

use super::{MemoryStream, StreamError};

impl Read for MemoryStream {
    fn read(&mut self, buf: &mut [u8]) -> Result<usize> {
        self.read_into(buf).map_err(StreamError::into_io_error)
    }
}

impl Write for MemoryStream {
    fn write(&mut self, buf: &[u8]) -> Result<usize> {
        self.write_bytes(buf)
            .map(|n| n as usize)
            .map_err(StreamError::into_io_error)
    }

    #[inline(always)]
    fn flush(&mut self) -> Result<()> {
        Ok(())
    }
}

impl Seek for MemoryStream {
    #[inline(always)]
    fn seek(&mut self, pos: SeekFrom) -> Result<u64> {
        Ok(self.seek_from(pos))
    }
}
