//! RAII wrapper around the platform's raw process handle
//!
//! On Windows this owns a kernel HANDLE and closes it on drop. On Unix a
//! "process handle" is just the process id; there is nothing to release,
//! but the wrapper keeps one code path for both platforms.

/// Raw process handle type for the target platform
#[cfg(windows)]
pub type RawHandle = winapi::um::winnt::HANDLE;

/// Raw process handle type for the target platform
#[cfg(unix)]
pub type RawHandle = libc::pid_t;

/// Owned process handle with automatic cleanup
pub struct Handle {
    raw: RawHandle,
}

impl Handle {
    /// Wrap a raw handle, taking ownership of it
    pub fn new(raw: RawHandle) -> Self {
        Handle { raw }
    }

    /// Create an invalid handle
    #[cfg(windows)]
    pub fn invalid() -> Self {
        Handle {
            raw: std::ptr::null_mut(),
        }
    }

    /// Create an invalid handle
    #[cfg(unix)]
    pub fn invalid() -> Self {
        Handle { raw: 0 }
    }

    /// Check whether the handle refers to anything
    #[cfg(windows)]
    pub fn is_valid(&self) -> bool {
        !self.raw.is_null()
    }

    /// Check whether the handle refers to anything
    #[cfg(unix)]
    pub fn is_valid(&self) -> bool {
        self.raw > 0
    }

    /// Get the raw handle value
    pub fn raw(&self) -> RawHandle {
        self.raw
    }
}

impl Drop for Handle {
    fn drop(&mut self) {
        if self.is_valid() {
            // Errors on cleanup are ignored
            let _ = super::sys::close_handle(self.raw);
        }
    }
}

// Handles are process-local kernel object references
unsafe impl Send for Handle {}
unsafe impl Sync for Handle {}
