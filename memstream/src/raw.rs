//! Copies between foreign memory and Rust buffers.
//!
//! This is the only module that dereferences a `PointerAddress`. Callers
//! bounds-check offsets against the region first; everything here trusts
//! that `address + offset .. + len` is mapped for the duration of the call.

use std::ptr;

use crate::codec::PointerAddress;

/// Copy `buf.len()` bytes from `address + offset` into `buf`.
///
/// # Safety
///
/// `address + offset` must be valid for reads of `buf.len()` bytes and
/// must not overlap `buf`.
#[inline(always)]
pub(crate) unsafe fn copy_from(address: PointerAddress, offset: usize, buf: &mut [u8]) {
    if buf.is_empty() {
        return;
    }
    ptr::copy_nonoverlapping(address.as_ptr().add(offset), buf.as_mut_ptr(), buf.len());
}

/// Copy all of `data` to `address + offset`.
///
/// # Safety
///
/// `address + offset` must be valid for writes of `data.len()` bytes and
/// must not overlap `data`.
#[inline(always)]
pub(crate) unsafe fn copy_to(address: PointerAddress, offset: usize, data: &[u8]) {
    if data.is_empty() {
        return;
    }
    ptr::copy_nonoverlapping(data.as_ptr(), address.as_mut_ptr().add(offset), data.len());
}
