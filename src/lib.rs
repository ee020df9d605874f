//! In-process function hooking and reversible memory patching
//!
//! memhook lets a host process redirect calls from one of its functions
//! to a replacement handler, call through to the original while the hook
//! is live, and patch arbitrary byte ranges with the ability to revert to
//! the pristine bytes. Three pieces make this reversible:
//!
//! - [`MemoryAccessor`]: typed and raw reads/writes with fault-softening
//!   and page-protection handling; every other type writes through it.
//! - [`Patch`]: a named byte replacement that snapshots the original
//!   bytes and restores them on `remove` or drop.
//! - [`Detour`]: a function redirection built from a generated stub,
//!   with `call_original` for transparent call-through.
//!
//! Hooking your own code pages is inherently unsafe at a distance: the
//! caller is responsible for target addresses being valid, for target
//! functions being long enough for the stub, and for no thread executing
//! through a target while a detour is mid-transition.

pub mod core;
pub mod hooks;
pub mod memory;
pub mod os;

// Re-export the main types at the crate root
pub use crate::core::types::{Address, HookError, HookResult, ProcessId};
pub use hooks::{Callable, Detour, Patch, StubArch};
pub use memory::{MemoryAccessor, ProtectionFlags, MAX_STRING_BYTES};
pub use os::{ProcessAccess, ProcessHandle};
