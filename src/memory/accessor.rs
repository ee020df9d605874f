//! Low-level memory accessor
//!
//! All raw memory I/O in the crate goes through [`MemoryAccessor`]; the
//! patch and detour types never touch memory directly. Reads are direct
//! in-process pointer reads guarded by a readability probe: an unreadable
//! range is softened into a default value plus a `tracing` diagnostic
//! instead of a fault. Writes go through the OS write primitive with a
//! freshly opened handle to the current process.

use crate::core::types::Address;
use crate::memory::protection::ProtectionFlags;
use crate::os::{self, ProcessHandle};
use std::mem;

/// Fixed ceiling for [`MemoryAccessor::read_string`]. Strings longer than
/// this are silently truncated; this is not a dynamic scan.
pub const MAX_STRING_BYTES: usize = 512;

/// Primitive typed and raw memory operations against the current process.
///
/// The accessor is stateless; it can be freely copied into every patch or
/// detour that needs one.
#[derive(Debug, Clone, Copy, Default)]
pub struct MemoryAccessor;

impl MemoryAccessor {
    /// Create a new accessor
    pub const fn new() -> Self {
        MemoryAccessor
    }

    /// Read a value of type `T` from `address`.
    ///
    /// If the range is not readable the fault is softened: a diagnostic is
    /// emitted and `T::default()` is returned. The process never
    /// terminates because of a bad read.
    pub fn read<T: Copy + Default>(&self, address: Address) -> T {
        let size = mem::size_of::<T>();
        if size == 0 {
            return T::default();
        }
        if !os::is_readable(address.as_usize(), size) {
            tracing::warn!(
                address = %address,
                ty = std::any::type_name::<T>(),
                "access violation softened: returning default value"
            );
            return T::default();
        }

        // Probe said the range is mapped and readable; alignment is not
        // assumed.
        unsafe { std::ptr::read_unaligned(address.as_ptr::<T>()) }
    }

    /// Read `count` bytes starting at `address`, one byte at a time.
    ///
    /// Returns an empty buffer (plus a diagnostic) if the range is not
    /// readable.
    pub fn read_bytes(&self, address: Address, count: usize) -> Vec<u8> {
        if count == 0 {
            return Vec::new();
        }
        if !os::is_readable(address.as_usize(), count) {
            tracing::warn!(
                address = %address,
                count,
                "access violation softened: returning empty byte range"
            );
            return Vec::new();
        }

        let ptr = address.as_ptr::<u8>();
        let mut out = Vec::with_capacity(count);
        for i in 0..count {
            out.push(unsafe { *ptr.add(i) });
        }
        out
    }

    /// Read a single-byte-encoded string from `address`.
    ///
    /// Reads up to [`MAX_STRING_BYTES`] and truncates at the first NUL; if
    /// no NUL appears within the window the full decoded window is
    /// returned.
    pub fn read_string(&self, address: Address) -> String {
        let buffer = self.read_bytes(address, MAX_STRING_BYTES);
        if buffer.is_empty() {
            return String::new();
        }

        let len = buffer.iter().position(|&b| b == 0).unwrap_or(buffer.len());
        buffer[..len].iter().map(|&b| b as char).collect()
    }

    /// Write a value of type `T` at `address` through [`write_bytes`].
    ///
    /// Returns the number of bytes written.
    ///
    /// [`write_bytes`]: MemoryAccessor::write_bytes
    pub fn write<T: Copy>(&self, address: Address, value: T) -> usize {
        let size = mem::size_of::<T>();
        let ptr = &value as *const T as *const u8;
        let data = unsafe { std::slice::from_raw_parts(ptr, size) };
        self.write_bytes(address, data)
    }

    /// Write bytes at `address` and return the count actually written.
    ///
    /// A null address is a no-op returning 0 without touching the OS
    /// surface. Otherwise a handle to the current process is opened with
    /// the fixed patching access mask, the page range is made
    /// execute+read+write *before* the write (the previous protection is
    /// discarded), the cross-process write primitive runs, and the handle
    /// is closed. Callers must treat a count below `bytes.len()` as a
    /// partial-write failure.
    pub fn write_bytes(&self, address: Address, bytes: &[u8]) -> usize {
        if address.is_null() {
            return 0;
        }
        if bytes.is_empty() {
            return 0;
        }

        let handle = match ProcessHandle::current() {
            Ok(handle) => handle,
            Err(e) => {
                tracing::warn!(address = %address, error = %e, "failed to open current process");
                return 0;
            }
        };

        // Raise protection before writing so write-protected code pages
        // can be patched. Failure is not fatal: the range may already be
        // writable.
        if let Err(e) = os::protect(
            address.as_usize(),
            bytes.len(),
            ProtectionFlags::execute_read_write(),
        ) {
            tracing::debug!(address = %address, error = %e, "protection change failed");
        }

        match handle.write_memory(address.as_usize(), bytes) {
            Ok(written) => {
                if written < bytes.len() {
                    tracing::warn!(
                        address = %address,
                        expected = bytes.len(),
                        written,
                        "partial memory write"
                    );
                }
                written
            }
            Err(e) => {
                tracing::warn!(address = %address, error = %e, "memory write failed");
                0
            }
        }
    }
}
