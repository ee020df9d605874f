//! Windows primitives for process and memory operations
//!
//! Thin safe wrappers around the kernel32 calls the hooking core consumes:
//! `OpenProcess`, `WriteProcessMemory`, `VirtualProtect`, `VirtualQuery`
//! and `CloseHandle`. All unsafe FFI is contained here.

use crate::core::types::{HookError, HookResult};
use crate::memory::protection::ProtectionFlags;
use std::mem;
use winapi::shared::minwindef::{FALSE, LPVOID};
use winapi::um::handleapi::CloseHandle;
use winapi::um::memoryapi::{VirtualProtect, VirtualQuery, WriteProcessMemory};
use winapi::um::processthreadsapi::OpenProcess;
use winapi::um::winnt::{MEMORY_BASIC_INFORMATION, MEM_COMMIT};

use super::handle::RawHandle;

/// Safe wrapper for OpenProcess
pub fn open_process(pid: u32, desired_access: u32) -> HookResult<RawHandle> {
    unsafe {
        let handle = OpenProcess(desired_access, FALSE, pid);
        if handle.is_null() {
            Err(HookError::ProcessNotFound(format!("PID: {}", pid)))
        } else {
            Ok(handle)
        }
    }
}

/// Safe wrapper for CloseHandle
pub fn close_handle(handle: RawHandle) -> HookResult<()> {
    if handle.is_null() {
        return Ok(());
    }

    unsafe {
        if CloseHandle(handle) == FALSE {
            Err(HookError::OsApi("Failed to close handle".to_string()))
        } else {
            Ok(())
        }
    }
}

/// Safe wrapper for WriteProcessMemory
///
/// Returns the number of bytes actually written, which may be less than
/// `data.len()` on partial failure.
pub fn write_process_memory(
    handle: RawHandle,
    address: usize,
    data: &[u8],
) -> HookResult<usize> {
    let mut bytes_written = 0;

    unsafe {
        let result = WriteProcessMemory(
            handle,
            address as LPVOID,
            data.as_ptr() as LPVOID,
            data.len(),
            &mut bytes_written,
        );

        if result == FALSE {
            Err(HookError::write_failed(
                format!("0x{:X}", address),
                "WriteProcessMemory failed",
            ))
        } else {
            Ok(bytes_written)
        }
    }
}

/// Change page protection of `[address, address + len)` in this process.
///
/// The previous protection value is discarded.
pub fn protect(address: usize, len: usize, protection: ProtectionFlags) -> HookResult<()> {
    let mut old_protect = 0u32;

    unsafe {
        let result = VirtualProtect(
            address as LPVOID,
            len,
            protection.raw(),
            &mut old_protect,
        );

        if result == FALSE {
            Err(HookError::ProtectionError(format!(
                "VirtualProtect failed for 0x{:X} ({} bytes)",
                address, len
            )))
        } else {
            Ok(())
        }
    }
}

/// Check whether every byte of `[address, address + len)` is committed and
/// readable in this process. Used as the fault-softening probe.
pub fn is_readable(address: usize, len: usize) -> bool {
    if address == 0 || len == 0 {
        return false;
    }

    let mut cursor = address;
    let end = address.saturating_add(len);

    while cursor < end {
        let mut mbi: MEMORY_BASIC_INFORMATION = unsafe { mem::zeroed() };
        let queried = unsafe {
            VirtualQuery(
                cursor as LPVOID,
                &mut mbi,
                mem::size_of::<MEMORY_BASIC_INFORMATION>(),
            )
        };
        if queried == 0 || mbi.State != MEM_COMMIT {
            return false;
        }

        let flags = ProtectionFlags::new(mbi.Protect);
        if !flags.is_readable() || flags.is_guard() {
            return false;
        }

        let region_end = mbi.BaseAddress as usize + mbi.RegionSize;
        if region_end <= cursor {
            return false;
        }
        cursor = region_end;
    }

    true
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    #[cfg_attr(miri, ignore = "FFI not supported in Miri")]
    fn test_open_invalid_process() {
        assert!(open_process(0, 0x1FFFFF).is_err());
    }

    #[test]
    #[cfg_attr(miri, ignore = "FFI not supported in Miri")]
    fn test_close_null_handle() {
        assert!(close_handle(std::ptr::null_mut()).is_ok());
    }

    #[test]
    #[cfg_attr(miri, ignore = "FFI not supported in Miri")]
    fn test_readable_probe() {
        let value = 0xA5A5A5A5u32;
        let addr = &value as *const u32 as usize;
        assert!(is_readable(addr, 4));
        assert!(!is_readable(0, 4));
    }
}
