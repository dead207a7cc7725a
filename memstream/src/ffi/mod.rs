//! C ABI for opening and driving memory streams from foreign code.
//!
//! Handles returned by `memstream_open` must be released with
//! `memstream_close`; error strings with `memstream_error_free`.

#![allow(clippy::not_unsafe_ptr_arg_deref)]

use libc::{c_char, c_int, c_void, size_t, ssize_t};
use std::ffi::{CStr, CString};
use std::ptr::null_mut;

use crate::stream::{StreamError, Whence};
use crate::wrapper::{memory_open, Handle};

fn set_error(error: *mut *mut c_char, message: String) {
    if error.is_null() {
        return;
    }

    // Interior NULs cannot cross the boundary; drop them.
    let message = CString::new(message.replace('\0', "")).unwrap_or_default();
    unsafe {
        *error = message.into_raw();
    }
}

/// Route log records to stderr through `env_logger`.
#[cfg(feature = "logging")]
#[no_mangle]
pub extern "C" fn memstream_enable_logging() {
    let _ = env_logger::try_init();
}

/// Open `size` bytes at `ptr` with mode `r`, `w` or `rw`.
///
/// Returns null on failure and stores a message in `error` when it is not
/// null.
#[no_mangle]
pub extern "C" fn memstream_open(
    ptr: *mut c_void,
    raw_mode: *const c_char,
    size: u64,
    error: *mut *mut c_char,
) -> *mut Handle {
    if raw_mode.is_null() {
        set_error(error, "mode is null".to_string());
        return null_mut();
    }

    let mode = match unsafe { CStr::from_ptr(raw_mode) }.to_str() {
        Ok(v) => v,
        Err(err) => {
            set_error(error, format!("{}", err));
            return null_mut();
        }
    };

    match unsafe { memory_open(ptr, mode, size) } {
        Ok(handle) => Box::into_raw(Box::new(handle)),
        Err(err) => {
            set_error(error, format!("{}", err));
            null_mut()
        }
    }
}

/// Returns bytes read, 0 at end of stream, -1 on error.
#[no_mangle]
pub extern "C" fn memstream_read(handle: *mut Handle, buf: *mut u8, count: size_t) -> ssize_t {
    if handle.is_null() || (buf.is_null() && count > 0) {
        return -1;
    }

    let handle = unsafe { &mut *handle };
    if count == 0 {
        return 0;
    }

    let buf = unsafe { std::slice::from_raw_parts_mut(buf, count) };
    match handle.read_into(buf) {
        Ok(n) => n as ssize_t,
        Err(_) => -1,
    }
}

/// Returns bytes written; a stream without write access takes 0 bytes.
/// -1 on a closed handle.
#[no_mangle]
pub extern "C" fn memstream_write(handle: *mut Handle, data: *const u8, len: size_t) -> ssize_t {
    if handle.is_null() || (data.is_null() && len > 0) {
        return -1;
    }

    let handle = unsafe { &mut *handle };
    let data = if len == 0 {
        &[][..]
    } else {
        unsafe { std::slice::from_raw_parts(data, len) }
    };

    match handle.write_bytes(data) {
        Ok(n) => n as ssize_t,
        Err(StreamError::NotWritable) => 0,
        Err(_) => -1,
    }
}

/// `whence` is one of `SEEK_SET`, `SEEK_CUR`, `SEEK_END`.
#[no_mangle]
pub extern "C" fn memstream_seek(handle: *mut Handle, offset: i64, whence: c_int) -> i64 {
    if handle.is_null() {
        return -1;
    }

    let whence = match Whence::from_raw(whence) {
        Some(v) => v,
        None => return -1,
    };

    let handle = unsafe { &mut *handle };
    match handle.seek_to(offset, whence) {
        Ok(cursor) => cursor as i64,
        Err(_) => -1,
    }
}

/// Returns the cursor, -1 on a null or closed handle.
#[no_mangle]
pub extern "C" fn memstream_tell(handle: *const Handle) -> i64 {
    if handle.is_null() {
        return -1;
    }

    let handle = unsafe { &*handle };
    handle.tell().map(|v| v as i64).unwrap_or(-1)
}

/// Returns 1 at end of stream, 0 before it, -1 on a null or closed handle.
#[no_mangle]
pub extern "C" fn memstream_eof(handle: *const Handle) -> c_int {
    if handle.is_null() {
        return -1;
    }

    let handle = unsafe { &*handle };
    match handle.eof() {
        Ok(true) => 1,
        Ok(false) => 0,
        Err(_) => -1,
    }
}

/// Returns the region size, -1 on a null or closed handle.
#[no_mangle]
pub extern "C" fn memstream_size(handle: *const Handle) -> i64 {
    if handle.is_null() {
        return -1;
    }

    let handle = unsafe { &*handle };
    handle.stat().map(|s| s.size as i64).unwrap_or(-1)
}

/// Close and free a handle. Null is ignored.
#[no_mangle]
pub extern "C" fn memstream_close(handle: *mut Handle) {
    if handle.is_null() {
        return;
    }

    let mut handle = unsafe { Box::from_raw(handle) };
    let _ = handle.close();
}

/// Free an error string stored by `memstream_open`.
#[no_mangle]
pub extern "C" fn memstream_error_free(error: *mut c_char) {
    if error.is_null() {
        return;
    }

    unsafe { drop(CString::from_raw(error)) };
}
