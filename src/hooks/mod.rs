//! Hooking primitives: reversible patches and function detours
//!
//! Both types snapshot the bytes they overwrite and restore them on
//! demand or on drop. There is no registry of instances; each patch or
//! detour is independent and caller-managed. What *is* process-wide is
//! the per-address lock registry in [`lock`], which serializes everyone
//! toggling the same target address.

pub mod callable;
pub mod detour;
pub mod lock;
pub mod patch;
pub mod stub;

pub use callable::Callable;
pub use detour::Detour;
pub use patch::Patch;
pub use stub::{StubArch, X64_STUB_LEN, X86_STUB_LEN};
