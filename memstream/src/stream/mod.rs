//! Bounded streams over a raw memory region.
//!
//! A [`MemoryStream`] treats `size` bytes starting at a base address as a
//! fixed window. Reads stop at the end of the window, writes are truncated
//! to it and seeks saturate at either bound, so the cursor always stays in
//! `0..=size`. No byte outside the window is ever touched.

use std::fmt;
use std::io::SeekFrom;
use std::str::FromStr;

use serde::{Deserialize, Serialize};

use crate::codec::{BufferSpec, PointerAddress};
use crate::raw;

pub mod error;
mod io;

pub use self::error::{OpenError, StreamError};

/// Access mode of a stream.
#[derive(Copy, Clone, Debug, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum Mode {
    /// `r`
    Read,
    /// `w`
    Write,
    /// `rw`
    ReadWrite,
}

impl Mode {
    /// Mode literal as accepted by `from_str`.
    pub const fn as_str(self) -> &'static str {
        match self {
            Mode::Read => "r",
            Mode::Write => "w",
            Mode::ReadWrite => "rw",
        }
    }

    /// Whether reads are permitted.
    pub const fn is_readable(self) -> bool {
        matches!(self, Mode::Read | Mode::ReadWrite)
    }

    /// Whether writes are permitted.
    pub const fn is_writable(self) -> bool {
        matches!(self, Mode::Write | Mode::ReadWrite)
    }
}

impl FromStr for Mode {
    type Err = OpenError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "r" => Ok(Mode::Read),
            "w" => Ok(Mode::Write),
            "rw" => Ok(Mode::ReadWrite),
            other => Err(OpenError::UnsupportedMode(other.to_string())),
        }
    }
}

impl fmt::Display for Mode {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Origin of a seek.
#[derive(Copy, Clone, Debug, PartialEq, Eq, Hash)]
pub enum Whence {
    /// Offset from the start of the region.
    Start,
    /// Offset from the cursor.
    Current,
    /// Offset from the end of the region.
    End,
}

impl Whence {
    /// Map a C `SEEK_SET`/`SEEK_CUR`/`SEEK_END` value.
    pub fn from_raw(raw: libc::c_int) -> Option<Whence> {
        match raw {
            libc::SEEK_SET => Some(Whence::Start),
            libc::SEEK_CUR => Some(Whence::Current),
            libc::SEEK_END => Some(Whence::End),
            _ => None,
        }
    }
}

/// Metadata of a stream. Only the size is meaningful for a memory region.
#[derive(Copy, Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct Stat {
    /// Region length in bytes.
    pub size: u64,
}

/// A seekable, bounded byte stream over foreign memory.
#[derive(Debug)]
pub struct MemoryStream {
    base: PointerAddress,
    size: u64,
    cursor: u64,
    mode: Mode,
}

impl MemoryStream {
    /// Open a stream from a textual buffer specification and a mode literal.
    ///
    /// Nothing is read or validated at the target address here; a bad
    /// address only shows up on first access.
    ///
    /// # Safety
    ///
    /// For as long as the stream lives, the region named by `specification`
    /// must be valid for reads (modes `r`, `rw`) and writes (modes `w`,
    /// `rw`), and must not be accessed through any other reference while a
    /// stream operation is running.
    pub unsafe fn open(specification: &str, mode: &str) -> Result<MemoryStream, OpenError> {
        let spec = BufferSpec::parse(specification).map_err(|e| {
            log::warn!("{}: {}", specification, e);
            OpenError::from(e)
        })?;

        let mode = mode.parse::<Mode>().map_err(|e| {
            log::warn!("{}", e);
            e
        })?;

        MemoryStream::from_spec(spec, mode)
    }

    /// Open a stream over an already decoded region.
    ///
    /// # Safety
    ///
    /// Same contract as [`MemoryStream::open`].
    pub unsafe fn from_spec(spec: BufferSpec, mode: Mode) -> Result<MemoryStream, OpenError> {
        if spec.end().is_none() {
            log::warn!("{} bytes at {} run past the address space", spec.size, spec.address);
            return Err(OpenError::InvalidSize(spec.size.to_string()));
        }

        log::debug!("open {} ({})", spec, mode);

        Ok(MemoryStream {
            base: spec.address,
            size: spec.size,
            cursor: 0,
            mode,
        })
    }

    /// First byte of the region.
    #[inline(always)]
    pub fn base(&self) -> PointerAddress {
        self.base
    }

    /// Access mode the stream was opened with.
    #[inline(always)]
    pub fn mode(&self) -> Mode {
        self.mode
    }

    /// Region length in bytes.
    #[inline(always)]
    pub fn len(&self) -> u64 {
        self.size
    }

    /// Whether the region is zero bytes long.
    #[inline(always)]
    pub fn is_empty(&self) -> bool {
        self.size == 0
    }

    /// Bytes between the cursor and the end of the region.
    #[inline(always)]
    pub fn remaining(&self) -> u64 {
        self.size - self.cursor
    }

    /// Read up to `count` bytes at the cursor.
    ///
    /// Returns an empty vector once the end of the region is reached.
    pub fn read_bytes(&mut self, count: usize) -> Result<Vec<u8>, StreamError> {
        self.check_readable()?;

        let len = self.window(self.cursor, count as u64);
        let mut buf = vec![0u8; len];
        self.read_into(&mut buf)?;
        Ok(buf)
    }

    /// Fill as much of `buf` as the region allows, advancing the cursor.
    pub fn read_into(&mut self, buf: &mut [u8]) -> Result<usize, StreamError> {
        let n = self.read_at(buf, self.cursor)?;
        self.cursor += n as u64;
        log::trace!("read {} bytes, cursor at {}", n, self.cursor);
        Ok(n)
    }

    /// Read into `buf` at `offset` without moving the cursor.
    pub fn read_at(&self, buf: &mut [u8], offset: u64) -> Result<usize, StreamError> {
        self.check_readable()?;

        let len = self.window(offset, buf.len() as u64);
        // Offset and length are within the region, which `open` vouched for.
        unsafe { raw::copy_from(self.base, offset as usize, &mut buf[..len]) };
        Ok(len)
    }

    /// Write `data` at the cursor, truncated to the end of the region.
    ///
    /// Returns the number of bytes actually written, which is less than
    /// `data.len()` when the write would run past the end.
    pub fn write_bytes(&mut self, data: &[u8]) -> Result<u64, StreamError> {
        let n = self.write_at(data, self.cursor)?;
        self.cursor += n;
        log::trace!("wrote {} bytes, cursor at {}", n, self.cursor);
        Ok(n)
    }

    /// Write `data` at `offset` without moving the cursor.
    pub fn write_at(&mut self, data: &[u8], offset: u64) -> Result<u64, StreamError> {
        if !self.mode.is_writable() {
            log::warn!("{}", StreamError::NotWritable);
            return Err(StreamError::NotWritable);
        }

        let len = self.window(offset, data.len() as u64);
        if len < data.len() {
            log::warn!(
                "Failed to write {} bytes past end of buffer.",
                data.len() - len
            );
        }

        // Offset and length are within the region, which `open` vouched for.
        unsafe { raw::copy_to(self.base, offset as usize, &data[..len]) };
        Ok(len as u64)
    }

    /// Move the cursor, clamping the target into `0..=len()`.
    ///
    /// Never fails; returns the new cursor.
    pub fn seek_to(&mut self, offset: i64, whence: Whence) -> u64 {
        let origin = match whence {
            Whence::Start => 0,
            Whence::Current => self.cursor as i128,
            Whence::End => self.size as i128,
        };

        self.cursor = (origin + offset as i128).clamp(0, self.size as i128) as u64;
        log::trace!("seek {:?}{:+} -> {}", whence, offset, self.cursor);
        self.cursor
    }

    /// Same as [`MemoryStream::seek_to`], taking a `std::io::SeekFrom`.
    pub fn seek_from(&mut self, pos: SeekFrom) -> u64 {
        match pos {
            SeekFrom::Start(offset) => {
                self.cursor = offset.min(self.size);
                self.cursor
            }
            SeekFrom::Current(offset) => self.seek_to(offset, Whence::Current),
            SeekFrom::End(offset) => self.seek_to(offset, Whence::End),
        }
    }

    /// Current cursor position.
    #[inline(always)]
    pub fn tell(&self) -> u64 {
        self.cursor
    }

    /// Whether the cursor is at the end of the region.
    #[inline(always)]
    pub fn eof(&self) -> bool {
        self.cursor >= self.size
    }

    /// Region metadata.
    pub fn stat(&self) -> Stat {
        Stat { size: self.size }
    }

    fn check_readable(&self) -> Result<(), StreamError> {
        if self.mode.is_readable() {
            Ok(())
        } else {
            log::warn!("{}", StreamError::NotReadable);
            Err(StreamError::NotReadable)
        }
    }

    /// Number of bytes of a `len` byte access at `offset` that lie inside the region.
    fn window(&self, offset: u64, len: u64) -> usize {
        // The region fits in the address space, so this fits in usize.
        len.min(self.size.saturating_sub(offset)) as usize
    }
}
