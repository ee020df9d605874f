//! Core module containing fundamental types for memhook
//!
//! This module provides the building blocks used throughout the crate:
//! address handling and error types.

pub mod types;

// Re-export commonly used types for convenience
pub use types::{Address, HookError, HookResult};

// Version information
pub const VERSION: &str = env!("CARGO_PKG_VERSION");
pub const AUTHORS: &str = env!("CARGO_PKG_AUTHORS");

// Platform verification at compile time
#[cfg(not(any(windows, unix)))]
compile_error!("memhook supports Windows and Unix platforms only");
