//! Core type definitions for memhook
//!
//! This module contains the fundamental types used throughout the crate:
//! the address wrapper and the error types.

mod address;
mod error;

// Re-export all public types
pub use address::Address;
pub use error::{HookError, HookResult};

// Common type aliases
pub type ProcessId = u32;
