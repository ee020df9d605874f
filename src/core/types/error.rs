//! Custom error types for memhook

use std::fmt;
use thiserror::Error;

/// Main error type for hooking and patching operations
#[derive(Error, Debug)]
pub enum HookError {
    #[error("Invalid memory address: {0}")]
    InvalidAddress(String),

    #[error("Process not found: {0}")]
    ProcessNotFound(String),

    #[error("Invalid handle: {0}")]
    InvalidHandle(String),

    #[error("Failed to read memory at {address}: {reason}")]
    ReadFailed { address: String, reason: String },

    #[error("Failed to write memory at {address}: {reason}")]
    WriteFailed { address: String, reason: String },

    #[error("Memory protection error: {0}")]
    ProtectionError(String),

    #[error("Hook address {address} does not fit a {arch} redirect stub")]
    StubEncoding { address: String, arch: &'static str },

    #[error("Unsupported operation: {0}")]
    UnsupportedOperation(String),

    #[error("OS API error: {0}")]
    OsApi(String),

    #[error("I/O error: {0}")]
    IoError(#[from] std::io::Error),
}

/// Result type alias for hooking operations
pub type HookResult<T> = Result<T, HookError>;

impl HookError {
    /// Creates an OS API error carrying the last OS error code
    pub fn last_os_error() -> Self {
        HookError::IoError(std::io::Error::last_os_error())
    }

    /// Creates a read failed error
    pub fn read_failed(address: impl fmt::Display, reason: impl Into<String>) -> Self {
        HookError::ReadFailed {
            address: address.to_string(),
            reason: reason.into(),
        }
    }

    /// Creates a write failed error
    pub fn write_failed(address: impl fmt::Display, reason: impl Into<String>) -> Self {
        HookError::WriteFailed {
            address: address.to_string(),
            reason: reason.into(),
        }
    }

    /// Creates a stub encoding error
    pub fn stub_encoding(address: impl fmt::Display, arch: &'static str) -> Self {
        HookError::StubEncoding {
            address: address.to_string(),
            arch,
        }
    }
}
