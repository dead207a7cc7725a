use std::io::{Read, Seek, SeekFrom, Write};

use memstream::codec::{encode_address, BufferSpec, PointerAddress, SpecError};
use memstream::constants::{MAX_ADDRESS_DIGITS, PROTOCOL};
use memstream::stream::{OpenError, Stat, StreamError, Whence};
use memstream::wrapper::{self, memory_open, MemoryStreamWrapper};

#[test]
fn test_open() {
    let mut data = [0u8; 1];
    let handle = unsafe { memory_open(data.as_mut_ptr(), "r", 1) }.unwrap();
    assert!(!handle.is_closed());
}

#[test]
fn test_open_error() {
    MemoryStreamWrapper::register();

    let err = unsafe { wrapper::open("ffi.memory://abc", "r") }.unwrap_err();
    assert!(matches!(err, OpenError::Spec(SpecError::Malformed(_))));

    let err = unsafe { wrapper::open("ffi.memory://123;0", "a+") }.unwrap_err();
    assert_eq!(err, OpenError::UnsupportedMode("a+".to_string()));

    let long = format!("{}://0x{};4", PROTOCOL, "f".repeat(MAX_ADDRESS_DIGITS + 1));
    let err = unsafe { wrapper::open(&long, "r") }.unwrap_err();
    assert!(matches!(err, OpenError::Spec(SpecError::AddressOverflow { .. })));

    let err = unsafe { wrapper::open("ffi.memory://0x10;-4", "r") }.unwrap_err();
    assert_eq!(err, OpenError::InvalidSize("-4".to_string()));

    let wraps = BufferSpec::new(PointerAddress::new(usize::MAX), 2).to_string();
    let err = unsafe { wrapper::open(&wraps, "r") }.unwrap_err();
    assert_eq!(err, OpenError::InvalidSize("2".to_string()));
}

#[test]
fn test_read() {
    let mut data = *b"0123456789";
    let mut stream = unsafe { memory_open(data.as_mut_ptr(), "r", 10) }.unwrap();

    assert_eq!(stream.read_bytes(5).unwrap(), b"01234");
    assert_eq!(stream.tell(), Ok(5));
    assert_eq!(stream.read_bytes(7).unwrap(), b"56789");
    assert_eq!(stream.tell(), Ok(10));
    assert_eq!(stream.read_bytes(2).unwrap(), b"");
    assert_eq!(stream.eof(), Ok(true));
}

#[test]
fn test_read_error_not_readable() {
    let mut data = [0u8; 1];
    let mut stream = unsafe { memory_open(data.as_mut_ptr(), "w", 1) }.unwrap();
    assert_eq!(stream.read_bytes(1), Err(StreamError::NotReadable));
}

#[test]
fn test_write() {
    let mut data = [0u8; 11];
    let mut stream = unsafe { memory_open(data.as_mut_ptr(), "w", 11) }.unwrap();

    assert_eq!(stream.write_bytes(b"hello"), Ok(5));
    assert_eq!(stream.write_bytes(b" world"), Ok(6));
    assert_eq!(stream.eof(), Ok(true));
    drop(stream);
    assert_eq!(&data, b"hello world");
}

#[test]
fn test_write_error_not_writable() {
    let mut data = [0u8; 1];
    let mut stream = unsafe { memory_open(data.as_mut_ptr(), "r", 1) }.unwrap();
    assert_eq!(stream.write_bytes(b"a"), Err(StreamError::NotWritable));
}

#[test]
fn test_write_error_past_buffer() {
    let mut data = [0u8; 3];
    let mut stream = unsafe { memory_open(data.as_mut_ptr(), "w", 3) }.unwrap();

    assert_eq!(stream.write_bytes(b"hello"), Ok(3));
    assert_eq!(stream.write_bytes(b"hello"), Ok(0));
    drop(stream);
    assert_eq!(&data, b"hel");
}

#[test]
fn test_read_write() {
    let mut data = [0u8; 3];
    let mut stream = unsafe { memory_open(data.as_mut_ptr(), "rw", 3) }.unwrap();

    assert_eq!(stream.write(b"foo").unwrap(), 3);
    assert_eq!(stream.seek(SeekFrom::Start(0)).unwrap(), 0);

    let mut contents = String::new();
    stream.read_to_string(&mut contents).unwrap();
    assert_eq!(contents, "foo");
}

#[test]
fn test_seek_tell() {
    let mut data = *b"0123456789";
    let mut stream = unsafe { memory_open(data.as_mut_ptr(), "r", 10) }.unwrap();

    assert_eq!(stream.seek_to(-1, Whence::End), Ok(9));
    assert_eq!(stream.read_bytes(1).unwrap(), b"9");
    assert_eq!(stream.seek_to(3, Whence::Start), Ok(3));
    assert_eq!(stream.seek_to(2, Whence::Current), Ok(5));
    assert_eq!(stream.seek_to(-50, Whence::Current), Ok(0));
    assert_eq!(stream.seek_to(50, Whence::Current), Ok(10));
    assert_eq!(stream.tell(), Ok(10));
}

#[test]
fn test_zero_size() {
    let mut data = [0u8; 1];
    let mut stream = unsafe { memory_open(data.as_mut_ptr(), "r", 0) }.unwrap();

    assert_eq!(stream.eof(), Ok(true));
    assert_eq!(stream.read_bytes(1).unwrap(), b"");
    assert_eq!(stream.stat(), Ok(Stat { size: 0 }));
}

#[test]
fn test_stat() {
    let mut data = [0u8; 16];
    let stream = unsafe { memory_open(data.as_mut_ptr(), "rw", 16) }.unwrap();
    assert_eq!(stream.stat(), Ok(Stat { size: 16 }));
}

#[test]
fn test_close() {
    let mut data = *b"abc";
    let mut stream = unsafe { memory_open(data.as_mut_ptr(), "rw", 3) }.unwrap();

    stream.close().unwrap();
    assert_eq!(stream.read_bytes(1), Err(StreamError::Closed));
    assert_eq!(stream.write_bytes(b"x"), Err(StreamError::Closed));
    assert!(stream.flush().is_err());
    assert_eq!(&data, b"abc");
}

#[test]
fn test_specification_text() {
    let mut data = [0u8; 4];
    let address = PointerAddress::from_ptr(data.as_mut_ptr());
    let text = BufferSpec::new(address, 4).to_string();

    assert_eq!(text, format!("ffi.memory://0x{};4", encode_address(address)));

    let upper = text.to_uppercase().replace("FFI.MEMORY://0X", "ffi.memory://0x");
    assert_eq!(BufferSpec::parse(&upper), Ok(BufferSpec::new(address, 4)));

    MemoryStreamWrapper::register();
    let mut stream = unsafe { wrapper::open(&upper, "w") }.unwrap();
    stream.write_all(b"abcd").unwrap();
    drop(stream);
    assert_eq!(&data, b"abcd");
}
