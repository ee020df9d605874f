//! Redirect stub generation
//!
//! A redirect stub is the short instruction sequence written over a
//! function's prologue to transfer control to the hook. Stub encoding is
//! a strategy keyed by target architecture: the 32-bit stub is the
//! classic 6-byte `push imm32 / ret`, which reaches any 32-bit address
//! without clobbering a register; the 64-bit stub is a 14-byte
//! `jmp [rip+0]` followed by the absolute address.
//!
//! The target function must be at least `stub.len()` bytes long and must
//! not be entered mid-prologue from elsewhere while hooked.

use crate::core::types::{Address, HookError, HookResult};

/// Length of the x86 `push imm32 / ret` stub
pub const X86_STUB_LEN: usize = 6;

/// Length of the x86-64 `jmp [rip+0]` stub
pub const X64_STUB_LEN: usize = 14;

/// Architecture a redirect stub targets
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum StubArch {
    /// 32-bit x86: `push imm32` then `ret` (6 bytes)
    X86,
    /// x86-64: `jmp qword [rip+0]` with the absolute address inline (14 bytes)
    X64,
}

impl StubArch {
    /// The stub architecture matching this build's pointer width
    pub const fn host() -> Self {
        if cfg!(target_pointer_width = "64") {
            StubArch::X64
        } else {
            StubArch::X86
        }
    }

    /// Encoded stub length in bytes; also the number of prologue bytes a
    /// detour overwrites and snapshots.
    pub const fn stub_len(self) -> usize {
        match self {
            StubArch::X86 => X86_STUB_LEN,
            StubArch::X64 => X64_STUB_LEN,
        }
    }

    /// Architecture name for diagnostics
    pub const fn name(self) -> &'static str {
        match self {
            StubArch::X86 => "x86",
            StubArch::X64 => "x86-64",
        }
    }

    /// Encode a stub that transfers control to `hook`.
    ///
    /// Fails if the hook address does not fit the encoding, rather than
    /// silently truncating it.
    pub fn encode(self, hook: Address) -> HookResult<Vec<u8>> {
        match self {
            StubArch::X86 => {
                let hook32 = u32::try_from(hook.as_usize())
                    .map_err(|_| HookError::stub_encoding(hook, self.name()))?;
                Ok(push_ret(hook32).to_vec())
            }
            StubArch::X64 => {
                let hook64 = hook.as_usize() as u64;
                Ok(jmp_abs(hook64).to_vec())
            }
        }
    }
}

/// `push imm32 / ret`: pushes the hook address and "returns" into it,
/// leaving every register untouched.
fn push_ret(hook: u32) -> [u8; X86_STUB_LEN] {
    let addr = hook.to_le_bytes();
    [0x68, addr[0], addr[1], addr[2], addr[3], 0xC3]
}

/// `jmp qword [rip+0]`: indirect absolute jump through the 8 address
/// bytes placed immediately after the instruction.
fn jmp_abs(hook: u64) -> [u8; X64_STUB_LEN] {
    let mut stub = [0u8; X64_STUB_LEN];
    stub[0] = 0xFF;
    stub[1] = 0x25;
    // 4-byte displacement of zero
    stub[6..].copy_from_slice(&hook.to_le_bytes());
    stub
}

#[cfg(test)]
mod tests {
    use super::*;
    use proptest::prelude::*;

    #[test]
    fn test_x86_stub_shape() {
        for hook in [0u32, 1, 0x1234_5678, u32::MAX] {
            let stub = StubArch::X86.encode(Address::new(hook as usize)).unwrap();
            assert_eq!(stub.len(), X86_STUB_LEN);
            assert_eq!(stub[0], 0x68);
            assert_eq!(stub[5], 0xC3);
            assert_eq!(u32::from_le_bytes(stub[1..5].try_into().unwrap()), hook);
        }
    }

    #[test]
    fn test_x86_rejects_wide_address() {
        if usize::BITS == 64 {
            let too_wide = Address::new(u32::MAX as usize + 1);
            assert!(matches!(
                StubArch::X86.encode(too_wide),
                Err(HookError::StubEncoding { .. })
            ));
        }
    }

    #[test]
    fn test_x64_stub_shape() {
        let hook = 0x7FFE_DEAD_BEEF_0010u64;
        let stub = StubArch::X64.encode(Address::new(hook as usize)).unwrap();
        assert_eq!(stub.len(), X64_STUB_LEN);
        assert_eq!(&stub[..2], &[0xFF, 0x25]);
        assert_eq!(&stub[2..6], &[0, 0, 0, 0]);
        assert_eq!(u64::from_le_bytes(stub[6..].try_into().unwrap()), hook);
    }

    #[test]
    fn test_host_arch_matches_pointer_width() {
        let expected = if usize::BITS == 64 {
            StubArch::X64
        } else {
            StubArch::X86
        };
        assert_eq!(StubArch::host(), expected);
    }

    proptest! {
        #[test]
        fn prop_x86_stub_always_six_bytes(hook in any::<u32>()) {
            let stub = StubArch::X86.encode(Address::new(hook as usize)).unwrap();
            prop_assert_eq!(stub.len(), X86_STUB_LEN);
            prop_assert_eq!(stub[0], 0x68);
            prop_assert_eq!(stub[5], 0xC3);
            let encoded = u32::from_le_bytes([stub[1], stub[2], stub[3], stub[4]]);
            prop_assert_eq!(encoded, hook);
        }
    }
}
