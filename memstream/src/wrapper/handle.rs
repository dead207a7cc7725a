use std::fmt::Debug;
use std::io::{self, Read, Seek, SeekFrom, Write};

use crate::stream::{MemoryStream, Stat, StreamError, Whence};

/// Callbacks a wrapper's streams answer to.
pub trait Stream: Send + Debug {
    /// Read up to `count` bytes; empty at end of stream.
    fn read_bytes(&mut self, count: usize) -> Result<Vec<u8>, StreamError>;
    /// Fill as much of `buf` as possible.
    fn read_into(&mut self, buf: &mut [u8]) -> Result<usize, StreamError>;
    /// Write `data`, returning how many bytes were taken.
    fn write_bytes(&mut self, data: &[u8]) -> Result<u64, StreamError>;
    /// Move the cursor; returns the new position.
    fn seek_to(&mut self, offset: i64, whence: Whence) -> u64;
    /// Current cursor position.
    fn tell(&self) -> u64;
    /// Whether the cursor is at the end.
    fn eof(&self) -> bool;
    /// Stream metadata.
    fn stat(&self) -> Stat;
}

impl Stream for MemoryStream {
    #[inline(always)]
    fn read_bytes(&mut self, count: usize) -> Result<Vec<u8>, StreamError> {
        MemoryStream::read_bytes(self, count)
    }

    #[inline(always)]
    fn read_into(&mut self, buf: &mut [u8]) -> Result<usize, StreamError> {
        MemoryStream::read_into(self, buf)
    }

    #[inline(always)]
    fn write_bytes(&mut self, data: &[u8]) -> Result<u64, StreamError> {
        MemoryStream::write_bytes(self, data)
    }

    #[inline(always)]
    fn seek_to(&mut self, offset: i64, whence: Whence) -> u64 {
        MemoryStream::seek_to(self, offset, whence)
    }

    #[inline(always)]
    fn tell(&self) -> u64 {
        MemoryStream::tell(self)
    }

    #[inline(always)]
    fn eof(&self) -> bool {
        MemoryStream::eof(self)
    }

    #[inline(always)]
    fn stat(&self) -> Stat {
        MemoryStream::stat(self)
    }
}

/// An open stream resource.
///
/// Every operation after [`Handle::close`] fails with
/// [`StreamError::Closed`]; the underlying stream, and with it any access
/// to its memory, is gone by then.
#[derive(Debug)]
pub struct Handle {
    protocol: String,
    stream: Option<Box<dyn Stream>>,
}

impl Handle {
    pub(crate) fn new(protocol: &str, stream: Box<dyn Stream>) -> Handle {
        Handle {
            protocol: protocol.to_string(),
            stream: Some(stream),
        }
    }

    /// Protocol the handle was opened through.
    pub fn protocol(&self) -> &str {
        &self.protocol
    }

    /// Whether the handle has been closed.
    pub fn is_closed(&self) -> bool {
        self.stream.is_none()
    }

    fn stream(&self) -> Result<&dyn Stream, StreamError> {
        self.stream.as_deref().ok_or(StreamError::Closed)
    }

    fn stream_mut(&mut self) -> Result<&mut (dyn Stream + 'static), StreamError> {
        self.stream.as_deref_mut().ok_or(StreamError::Closed)
    }

    /// Read up to `count` bytes.
    pub fn read_bytes(&mut self, count: usize) -> Result<Vec<u8>, StreamError> {
        self.stream_mut()?.read_bytes(count)
    }

    /// Fill as much of `buf` as the stream allows.
    pub fn read_into(&mut self, buf: &mut [u8]) -> Result<usize, StreamError> {
        self.stream_mut()?.read_into(buf)
    }

    /// Write `data`, returning how many bytes were taken.
    pub fn write_bytes(&mut self, data: &[u8]) -> Result<u64, StreamError> {
        self.stream_mut()?.write_bytes(data)
    }

    /// Move the cursor; returns the new position.
    pub fn seek_to(&mut self, offset: i64, whence: Whence) -> Result<u64, StreamError> {
        Ok(self.stream_mut()?.seek_to(offset, whence))
    }

    /// Current cursor position.
    pub fn tell(&self) -> Result<u64, StreamError> {
        Ok(self.stream()?.tell())
    }

    /// Whether the cursor is at the end.
    pub fn eof(&self) -> Result<bool, StreamError> {
        Ok(self.stream()?.eof())
    }

    /// Stream metadata.
    pub fn stat(&self) -> Result<Stat, StreamError> {
        Ok(self.stream()?.stat())
    }

    /// Release the stream. Closing twice is a use-after-close.
    pub fn close(&mut self) -> Result<(), StreamError> {
        match self.stream.take() {
            Some(_) => {
                log::debug!("closed {} stream", self.protocol);
                Ok(())
            }
            None => Err(StreamError::Closed),
        }
    }
}

impl Read for Handle {
    fn read(&mut self, buf: &mut [u8]) -> io::Result<usize> {
        self.read_into(buf).map_err(StreamError::into_io_error)
    }
}

impl Write for Handle {
    fn write(&mut self, buf: &[u8]) -> io::Result<usize> {
        self.write_bytes(buf)
            .map(|n| n as usize)
            .map_err(StreamError::into_io_error)
    }

    fn flush(&mut self) -> io::Result<()> {
        self.stream().map(|_| ()).map_err(StreamError::into_io_error)
    }
}

impl Seek for Handle {
    fn seek(&mut self, pos: SeekFrom) -> io::Result<u64> {
        let stream = self.stream_mut().map_err(StreamError::into_io_error)?;
        let cursor = match pos {
            SeekFrom::Start(offset) => {
                // Saturate rather than wrap into a negative offset.
                let offset = i64::try_from(offset).unwrap_or(i64::MAX);
                stream.seek_to(offset, Whence::Start)
            }
            SeekFrom::Current(offset) => stream.seek_to(offset, Whence::Current),
            SeekFrom::End(offset) => stream.seek_to(offset, Whence::End),
        };
        Ok(cursor)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::codec::{BufferSpec, PointerAddress};
    use crate::stream::Mode;

    fn handle(buf: &mut [u8], mode: Mode) -> Handle {
        let spec = BufferSpec::new(PointerAddress::from_ptr(buf.as_mut_ptr()), buf.len() as u64);
        let stream = unsafe { MemoryStream::from_spec(spec, mode) }.unwrap();
        Handle::new("ffi.memory", Box::new(stream))
    }

    #[test]
    fn use_after_close() {
        let mut data = *b"abc";
        let mut handle = handle(&mut data, Mode::ReadWrite);

        assert!(!handle.is_closed());
        handle.close().unwrap();
        assert!(handle.is_closed());

        assert_eq!(handle.read_bytes(1), Err(StreamError::Closed));
        assert_eq!(handle.write_bytes(b"x"), Err(StreamError::Closed));
        assert_eq!(handle.seek_to(0, Whence::Start), Err(StreamError::Closed));
        assert_eq!(handle.tell(), Err(StreamError::Closed));
        assert_eq!(handle.eof(), Err(StreamError::Closed));
        assert_eq!(handle.stat(), Err(StreamError::Closed));
        assert_eq!(handle.close(), Err(StreamError::Closed));

        let err = handle.read(&mut [0u8; 1]).unwrap_err();
        assert_eq!(err.kind(), io::ErrorKind::NotConnected);
        assert_eq!(&data, b"abc");
    }

    #[test]
    fn io_traits() {
        let mut data = [0u8; 3];
        let mut handle = handle(&mut data, Mode::ReadWrite);

        handle.write_all(b"foo").unwrap();
        handle.flush().unwrap();
        assert_eq!(handle.seek(SeekFrom::Start(0)).unwrap(), 0);

        let mut out = String::new();
        handle.read_to_string(&mut out).unwrap();
        assert_eq!(out, "foo");
        assert_eq!(handle.seek(SeekFrom::Start(u64::MAX)).unwrap(), 3);
        assert_eq!(handle.eof(), Ok(true));
    }
}
