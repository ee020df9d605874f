//! Unix primitives for process and memory operations
//!
//! The equivalents of the Windows surface the hooking core consumes: page
//! protection changes go through the `region` crate, cross-process writes
//! through `process_vm_writev`, and in-process writes are plain pointer
//! copies once the target range is known to be writable.

use crate::core::types::{HookError, HookResult};
use crate::memory::protection::ProtectionFlags;

use super::handle::RawHandle;

/// "Open" a process by verifying the pid exists.
///
/// Unix has no handle object or access mask for this; the desired-access
/// value is accepted for signature parity and ignored.
pub fn open_process(pid: u32, _desired_access: u32) -> HookResult<RawHandle> {
    let pid = pid as libc::pid_t;
    if pid <= 0 {
        return Err(HookError::ProcessNotFound(format!("PID: {}", pid)));
    }

    // kill(pid, 0) probes existence without delivering a signal. EPERM
    // still means the process exists.
    let rc = unsafe { libc::kill(pid, 0) };
    if rc == 0 || std::io::Error::last_os_error().raw_os_error() == Some(libc::EPERM) {
        Ok(pid)
    } else {
        Err(HookError::ProcessNotFound(format!("PID: {}", pid)))
    }
}

/// Release a process handle. Nothing to do on Unix.
pub fn close_handle(_handle: RawHandle) -> HookResult<()> {
    Ok(())
}

/// Write bytes into the address space of the process behind `handle`.
///
/// Returns the number of bytes actually written. For the current process
/// this is a direct copy and requires the range to already be writable;
/// for any other pid it goes through `process_vm_writev`.
pub fn write_process_memory(
    handle: RawHandle,
    address: usize,
    data: &[u8],
) -> HookResult<usize> {
    if handle == std::process::id() as libc::pid_t {
        if !range_is(address, data.len(), |r| r.is_writable()) {
            return Err(HookError::write_failed(
                format!("0x{:X}", address),
                "target range is not writable",
            ));
        }
        unsafe {
            std::ptr::copy_nonoverlapping(data.as_ptr(), address as *mut u8, data.len());
        }
        return Ok(data.len());
    }

    let local = libc::iovec {
        iov_base: data.as_ptr() as *mut libc::c_void,
        iov_len: data.len(),
    };
    let remote = libc::iovec {
        iov_base: address as *mut libc::c_void,
        iov_len: data.len(),
    };

    let written = unsafe { libc::process_vm_writev(handle, &local, 1, &remote, 1, 0) };
    if written < 0 {
        Err(HookError::write_failed(
            format!("0x{:X}", address),
            format!("process_vm_writev: {}", std::io::Error::last_os_error()),
        ))
    } else {
        Ok(written as usize)
    }
}

/// Change page protection of `[address, address + len)` in this process.
///
/// The previous protection value is discarded.
pub fn protect(address: usize, len: usize, protection: ProtectionFlags) -> HookResult<()> {
    unsafe {
        region::protect(address as *const u8, len, to_region(protection)).map_err(|e| {
            HookError::ProtectionError(format!(
                "mprotect failed for 0x{:X} ({} bytes): {}",
                address, len, e
            ))
        })
    }
}

/// Check whether every byte of `[address, address + len)` is mapped and
/// readable in this process. Used as the fault-softening probe.
pub fn is_readable(address: usize, len: usize) -> bool {
    if address == 0 || len == 0 {
        return false;
    }
    range_is(address, len, |r| r.is_readable() && !r.is_guarded())
}

/// Walk the mapped regions covering `[address, address + len)` and check
/// `pred` on each. Gaps in the mapping fail the check.
fn range_is(address: usize, len: usize, pred: impl Fn(&region::Region) -> bool) -> bool {
    let iter = match region::query_range(address as *const u8, len) {
        Ok(iter) => iter,
        Err(_) => return false,
    };

    let end = address.saturating_add(len);
    let mut cursor = address;
    for item in iter {
        let reg = match item {
            Ok(reg) => reg,
            Err(_) => return false,
        };
        let range = reg.as_range();
        if range.start > cursor || !pred(&reg) {
            return false;
        }
        cursor = range.end;
        if cursor >= end {
            break;
        }
    }

    cursor >= end
}

fn to_region(protection: ProtectionFlags) -> region::Protection {
    match (
        protection.is_readable(),
        protection.is_writable(),
        protection.is_executable(),
    ) {
        (_, true, true) => region::Protection::READ_WRITE_EXECUTE,
        (_, true, false) => region::Protection::READ_WRITE,
        (true, false, true) => region::Protection::READ_EXECUTE,
        (true, false, false) => region::Protection::READ,
        (false, false, true) => region::Protection::EXECUTE,
        (false, false, false) => region::Protection::NONE,
    }
}
