//! OS primitive surface consumed by the hooking core
//!
//! Everything platform-specific lives under this module: process handle
//! acquisition, the cross-process-capable byte write, page-protection
//! changes and the readability probe. The rest of the crate only sees
//! [`ProcessHandle`], [`ProcessAccess`] and the two free functions
//! [`protect`] and [`is_readable`].

pub mod handle;

#[cfg(windows)]
#[path = "windows.rs"]
pub(crate) mod sys;

#[cfg(unix)]
#[path = "unix.rs"]
pub(crate) mod sys;

pub use handle::{Handle, RawHandle};
pub use sys::{is_readable, protect};

use crate::core::types::{HookError, HookResult, ProcessId};
use std::fmt;

/// Access rights requested when opening a process handle
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct ProcessAccess {
    value: u32,
}

impl ProcessAccess {
    /// All possible access rights
    pub const ALL_ACCESS: Self = Self { value: 0x1F_FFFF };
    /// Thread creation
    pub const CREATE_THREAD: Self = Self { value: 0x0002 };
    /// Query information access
    pub const QUERY_INFORMATION: Self = Self { value: 0x0400 };
    /// Set information access
    pub const SET_INFORMATION: Self = Self { value: 0x0200 };
    /// Terminate access
    pub const TERMINATE: Self = Self { value: 0x0001 };
    /// Memory operation access (protection changes)
    pub const VM_OPERATION: Self = Self { value: 0x0008 };
    /// Read memory access
    pub const VM_READ: Self = Self { value: 0x0010 };
    /// Write memory access
    pub const VM_WRITE: Self = Self { value: 0x0020 };
    /// Synchronize access
    pub const SYNCHRONIZE: Self = Self { value: 0x0010_0000 };

    /// Combine access rights
    pub const fn combine(rights: &[Self]) -> Self {
        let mut value = 0;
        let mut i = 0;
        while i < rights.len() {
            value |= rights[i].value;
            i += 1;
        }
        Self { value }
    }

    /// The fixed mask used for patch writes: memory operations plus thread
    /// creation, information access, terminate and synchronize.
    pub const fn patching() -> Self {
        Self::combine(&[
            Self::CREATE_THREAD,
            Self::QUERY_INFORMATION,
            Self::SET_INFORMATION,
            Self::TERMINATE,
            Self::VM_OPERATION,
            Self::VM_READ,
            Self::VM_WRITE,
            Self::SYNCHRONIZE,
        ])
    }

    /// Get the raw mask value
    pub const fn value(&self) -> u32 {
        self.value
    }
}

/// Owned handle to a process, opened with a specific access mask.
///
/// The underlying handle is closed when this is dropped, so heavy
/// patch/unpatch cycles do not accumulate open handles.
pub struct ProcessHandle {
    handle: Handle,
    pid: ProcessId,
    access: ProcessAccess,
}

impl ProcessHandle {
    /// Open a process with the given access rights
    pub fn open(pid: ProcessId, access: ProcessAccess) -> HookResult<Self> {
        let raw = sys::open_process(pid, access.value())?;
        Ok(ProcessHandle {
            handle: Handle::new(raw),
            pid,
            access,
        })
    }

    /// Open the current process with the patching access mask
    pub fn current() -> HookResult<Self> {
        Self::open(std::process::id(), ProcessAccess::patching())
    }

    /// Get the process ID
    pub fn pid(&self) -> ProcessId {
        self.pid
    }

    /// Get the access rights the handle was opened with
    pub fn access(&self) -> ProcessAccess {
        self.access
    }

    /// Check if the handle is valid
    pub fn is_valid(&self) -> bool {
        self.handle.is_valid()
    }

    /// Write bytes into the process's address space.
    ///
    /// Returns the number of bytes actually written; callers must treat a
    /// count below `data.len()` as a partial-write failure.
    pub fn write_memory(&self, address: usize, data: &[u8]) -> HookResult<usize> {
        if !self.is_valid() {
            return Err(HookError::InvalidHandle(
                "Process handle is not open".to_string(),
            ));
        }
        sys::write_process_memory(self.handle.raw(), address, data)
    }
}

impl fmt::Debug for ProcessHandle {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("ProcessHandle")
            .field("pid", &self.pid)
            .field("valid", &self.is_valid())
            .field("access", &format!("0x{:X}", self.access.value()))
            .finish()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_access_constants() {
        assert_eq!(ProcessAccess::ALL_ACCESS.value(), 0x1FFFFF);
        assert_eq!(ProcessAccess::VM_READ.value(), 0x0010);
        assert_eq!(ProcessAccess::VM_WRITE.value(), 0x0020);
        assert_eq!(ProcessAccess::VM_OPERATION.value(), 0x0008);
        assert_eq!(ProcessAccess::SYNCHRONIZE.value(), 0x0010_0000);
    }

    #[test]
    fn test_access_combine() {
        let combined = ProcessAccess::combine(&[ProcessAccess::VM_READ, ProcessAccess::VM_WRITE]);
        assert_eq!(combined.value(), 0x0030);
    }

    #[test]
    fn test_patching_mask() {
        // create-thread | query-info | set-info | terminate | vm-op |
        // vm-read | vm-write | synchronize
        assert_eq!(ProcessAccess::patching().value(), 0x10_063B);
    }

    #[test]
    #[cfg_attr(miri, ignore = "FFI not supported in Miri")]
    fn test_open_current_process() {
        let handle = ProcessHandle::current().expect("current process must be openable");
        assert_eq!(handle.pid(), std::process::id());
        assert!(handle.is_valid());
    }

    #[test]
    #[cfg_attr(miri, ignore = "FFI not supported in Miri")]
    fn test_open_invalid_pid() {
        assert!(ProcessHandle::open(0, ProcessAccess::patching()).is_err());
    }

    #[test]
    fn test_debug_format() {
        let handle = ProcessHandle {
            handle: Handle::invalid(),
            pid: 1234,
            access: ProcessAccess::VM_READ,
        };
        let debug = format!("{:?}", handle);
        assert!(debug.contains("pid: 1234"));
        assert!(debug.contains("valid: false"));
    }
}
