//! Memory access layer
//!
//! Provides the low-level accessor every hook writes through, plus the
//! page-protection flag type shared with the OS surface.

pub mod accessor;
pub mod protection;

pub use accessor::{MemoryAccessor, MAX_STRING_BYTES};
pub use protection::ProtectionFlags;
